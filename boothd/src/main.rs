//! Photobooth appliance daemon.
//!
//! Loads the configuration, wires every role onto the bus, runs the
//! orchestrator on the main thread and relaunches the whole assembly
//! when a sitting ends with a restart request. Ctrl-C lands as a
//! shutdown press so an interrupted appliance winds down through the
//! ordinary teardown path.

use booth_bus::Bus;
use booth_camera::{CameraWorker, LastShotCompositor, backend_by_name};
use booth_common::config::{BoothConfig, ConfigError, ConfigLoader, LogLevel};
use booth_common::consts::{EXIT_INITIALIZING, EXIT_SHUTDOWN, is_relaunch_code};
use booth_common::message::{BoothEvent, ButtonId, Message};
use booth_common::role::Role;
use booth_core::machine::SessionPolicy;
use booth_core::orchestrator::Orchestrator;
use booth_core::supervisor::Supervisor;
use booth_display::{DisplayTiming, DisplayWorker, HeadlessDisplay};
use booth_input::{InputWorker, NoButtons};
use booth_lamp::{LampWorker, NoRelay};
use booth_worker::{PictureSaver, PictureTracker, PostprocessTask, PostprocessWorker};
use clap::Parser;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
enum BoothdError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("unknown camera backend {0:?}")]
    UnknownCameraBackend(String),

    #[error("spawn failure: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("signal handler: {0}")]
    Signal(#[from] ctrlc::Error),
}

#[derive(Parser, Debug)]
#[command(name = "boothd", about = "Photobooth appliance daemon", version)]
struct Cli {
    /// Path to the appliance configuration file.
    #[arg(short, long, default_value = "photobooth.toml")]
    config: PathBuf,

    /// Start a sitting immediately after startup.
    #[arg(long)]
    run: bool,

    /// Force debug logging regardless of the configured level.
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    json: bool,
}

fn init_tracing(level: LogLevel, verbose: bool, json: bool) {
    let fallback = if verbose {
        "debug"
    } else {
        match level {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

/// Wire every role and run one appliance launch to its exit code.
fn launch(
    config: &BoothConfig,
    run_on_startup: bool,
    signal_bus: &Mutex<Option<Arc<Bus>>>,
) -> Result<i32, BoothdError> {
    let bus = Arc::new(Bus::new());
    *signal_bus.lock() = Some(Arc::clone(&bus));
    let supervisor = Supervisor::new(Arc::clone(&bus));

    let camera_backend = backend_by_name(&config.camera.backend)
        .ok_or_else(|| BoothdError::UnknownCameraBackend(config.camera.backend.clone()))?;
    supervisor.spawn(Box::new(CameraWorker::new(
        camera_backend,
        Box::new(LastShotCompositor),
        config.session.show_preview,
    )))?;

    supervisor.spawn(Box::new(DisplayWorker::new(
        Box::new(HeadlessDisplay::new()),
        DisplayTiming::from_secs(config.session.greeter_time_s, config.session.countdown_time_s),
    )))?;

    supervisor.spawn(Box::new(InputWorker::new(Box::new(NoButtons))))?;

    if config.relay.enable {
        info!(lamp_id = config.relay.lamp_id, "lamp role enabled");
        supervisor.spawn(Box::new(LampWorker::new(Box::new(NoRelay))))?;
    }

    let tracker = PictureTracker::new(&config.storage.basedir, &config.storage.prefix);
    let tasks: Vec<Box<dyn PostprocessTask>> = vec![Box::new(PictureSaver)];
    supervisor.spawn(Box::new(PostprocessWorker::new(
        tracker,
        tasks,
        Duration::from_secs_f64(config.session.review_time_s),
    )))?;

    if let Some(stall_timeout_s) = config.supervisor.stall_timeout_s {
        supervisor.start_stall_monitor(Duration::from_secs(stall_timeout_s))?;
    }

    let policy = SessionPolicy::new(config.session.num_shots, config.session.keep_pictures);
    let mut orchestrator = Orchestrator::new(Arc::clone(&bus), policy, run_on_startup);
    let code = orchestrator.run();

    supervisor.join_all();
    *signal_bus.lock() = None;
    Ok(code)
}

/// Drive appliance launches until a non-relaunch exit code comes back.
///
/// The configuration is loaded and validated fresh before every launch,
/// so edits made while the previous launch ran take effect after a
/// restart. An interrupt that lands between launches, when no bus is
/// live to receive a shutdown press, ends the appliance here instead of
/// being lost.
fn run_until_exit<C, L>(
    interrupted: &AtomicBool,
    mut load: C,
    mut launch_one: L,
) -> Result<i32, BoothdError>
where
    C: FnMut() -> Result<BoothConfig, BoothdError>,
    L: FnMut(&BoothConfig, bool) -> Result<i32, BoothdError>,
{
    let mut code = EXIT_INITIALIZING;
    let mut first = true;
    while is_relaunch_code(code) {
        if interrupted.load(Ordering::SeqCst) {
            info!("interrupt received, shutting down instead of relaunching");
            return Ok(EXIT_SHUTDOWN);
        }
        if !first {
            info!(code, "relaunching appliance with freshly loaded configuration");
        }
        let config = load()?;
        config.validate()?;
        code = launch_one(&config, first)?;
        first = false;
    }
    Ok(code)
}

fn run(cli: &Cli) -> Result<i32, BoothdError> {
    // First load only sets up tracing; every launch re-reads the file.
    {
        let config = BoothConfig::load(&cli.config)?;
        config.validate()?;
        init_tracing(config.shared.log_level, cli.verbose, cli.json);
        info!(
            service = %config.shared.service_name,
            config = %cli.config.display(),
            "photobooth starting"
        );
    }

    // Ctrl-C becomes a shutdown press on whichever launch is live; the
    // latch covers a press landing between launches.
    let signal_bus: Arc<Mutex<Option<Arc<Bus>>>> = Arc::new(Mutex::new(None));
    let interrupted = Arc::new(AtomicBool::new(false));
    let handler_bus = Arc::clone(&signal_bus);
    let handler_latch = Arc::clone(&interrupted);
    ctrlc::set_handler(move || {
        handler_latch.store(true, Ordering::SeqCst);
        if let Some(bus) = handler_bus.lock().as_ref() {
            bus.send(
                Role::Orchestrator,
                Message::Event(BoothEvent::input(ButtonId::Shutdown)),
            );
        }
    })?;

    let code = run_until_exit(
        &interrupted,
        || Ok(BoothConfig::load(&cli.config)?),
        |config, first| {
            // --run applies to the first launch only; a restart goes
            // back to whatever the config says.
            let run_on_startup = config.session.run_on_startup || (first && cli.run);
            launch(config, run_on_startup, &signal_bus)
        },
    )?;
    info!(code, "photobooth exiting");
    Ok(code)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            // Tracing may not be up yet (config errors), so use stderr.
            eprintln!("boothd: {e}");
            ExitCode::FAILURE
        }
    }
}
