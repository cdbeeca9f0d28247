//! Role lifecycle supervision.
//!
//! The supervisor owns one OS thread per worker role. All roles share
//! one `Arc<Bus>`; mailboxes are created before any role starts and are
//! never recreated, so a role restart loses no in-flight message.
//!
//! A faulting role never takes the appliance down silently: both `Err`
//! returns and panics are converted to error events on the
//! orchestrator's mailbox. Recoverable roles re-enter their run-loop;
//! the rest stay down until the orchestrator decides what the fault
//! means for the session.

use crate::worker::RoleWorker;
use booth_bus::Bus;
use booth_common::message::{BoothEvent, Message};
use booth_common::role::Role;
use parking_lot::Mutex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// How often the stall monitor wakes to check the shutdown flag.
const MONITOR_TICK: Duration = Duration::from_millis(200);

struct RoleHandle {
    role: Role,
    thread: JoinHandle<()>,
}

/// Spawns, monitors and joins the worker roles.
pub struct Supervisor {
    bus: Arc<Bus>,
    handles: Mutex<Vec<RoleHandle>>,
    shutting_down: Arc<AtomicBool>,
}

impl Supervisor {
    pub fn new(bus: Arc<Bus>) -> Self {
        Self {
            bus,
            handles: Mutex::new(Vec::new()),
            shutting_down: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Spawn a supervised thread for `worker`.
    ///
    /// The wrapper loop re-enters `worker.run()` after a reported fault
    /// while the role is recoverable and the appliance is not shutting
    /// down. The worker's mailbox is untouched across restarts.
    pub fn spawn(&self, mut worker: Box<dyn RoleWorker>) -> std::io::Result<()> {
        let role = worker.role();
        let bus = Arc::clone(&self.bus);
        let shutting_down = Arc::clone(&self.shutting_down);

        let thread = thread::Builder::new().name(role.to_string()).spawn(move || {
            loop {
                debug!(%role, "role loop entering");
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| worker.run(&bus)));
                match outcome {
                    Ok(Ok(())) => {
                        debug!(%role, "role loop exited cleanly");
                        break;
                    }
                    Ok(Err(e)) => {
                        error!(%role, error = %e, "role loop failed");
                        bus.send(
                            Role::Orchestrator,
                            Message::Event(BoothEvent::error(role, e.to_string())),
                        );
                    }
                    Err(payload) => {
                        let message = panic_message(payload.as_ref());
                        error!(%role, message, "role loop panicked");
                        bus.send(
                            Role::Orchestrator,
                            Message::Event(BoothEvent::error(role, message)),
                        );
                    }
                }

                if shutting_down.load(Ordering::SeqCst) || !role.is_recoverable() {
                    warn!(%role, "role loop not restarted");
                    break;
                }
                warn!(%role, "restarting role loop");
            }
        })?;

        self.handles.lock().push(RoleHandle { role, thread });
        Ok(())
    }

    /// Start the optional stall monitor.
    ///
    /// Synthesizes an error event when a worker role has mail queued but
    /// has not dequeued anything within `timeout`. Hardening against
    /// hung hardware backends; disabled unless configured.
    pub fn start_stall_monitor(&self, timeout: Duration) -> std::io::Result<()> {
        let bus = Arc::clone(&self.bus);
        let shutting_down = Arc::clone(&self.shutting_down);

        let thread = thread::Builder::new()
            .name("stall-monitor".to_string())
            .spawn(move || {
                let mut reported = [false; Role::COUNT];
                while !shutting_down.load(Ordering::SeqCst) {
                    thread::sleep(MONITOR_TICK);
                    for role in Role::ALL {
                        if role == Role::Orchestrator {
                            continue;
                        }
                        let stalled = !bus.is_empty(role) && bus.idle_for(role) > timeout;
                        if stalled && !reported[role.index()] {
                            warn!(%role, ?timeout, "role appears stalled");
                            bus.send(
                                Role::Orchestrator,
                                Message::Event(BoothEvent::error(
                                    role,
                                    format!("no mailbox activity for {timeout:?}"),
                                )),
                            );
                            reported[role.index()] = true;
                        } else if !stalled {
                            reported[role.index()] = false;
                        }
                    }
                }
                debug!("stall monitor exiting");
            })?;

        self.handles.lock().push(RoleHandle {
            role: Role::Orchestrator, // bookkeeping slot; joined like the rest
            thread,
        });
        Ok(())
    }

    /// Wait for every supervised thread to finish.
    ///
    /// Called after the orchestrator broadcast the Stop sentinels; each
    /// role finishes its current unit of work, drains up to the
    /// sentinel, and exits.
    pub fn join_all(self) {
        self.shutting_down.store(true, Ordering::SeqCst);
        let handles = self.handles.into_inner();
        for handle in handles {
            if handle.thread.join().is_err() {
                // The wrapper catches worker panics; reaching this means
                // the wrapper itself died. Nothing left to do but log.
                error!(role = %handle.role, "supervised thread terminated abnormally");
            }
        }
        info!("all roles joined");
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unidentified panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worker::WorkerError;
    use booth_common::message::BoothState;
    use std::sync::atomic::AtomicU32;

    /// Scripted worker: fails `failures` times (alternating panic and
    /// error), then drains cleanly.
    struct FlakyWorker {
        role: Role,
        failures: u32,
        attempts: Arc<AtomicU32>,
    }

    impl RoleWorker for FlakyWorker {
        fn role(&self) -> Role {
            self.role
        }

        fn run(&mut self, bus: &Bus) -> Result<(), WorkerError> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
            if attempt < self.failures {
                if attempt % 2 == 0 {
                    panic!("scripted panic {attempt}");
                }
                return Err(WorkerError::Backend(format!("scripted error {attempt}")));
            }
            for _message in bus.drain(self.role) {}
            Ok(())
        }
    }

    fn error_events(bus: &Bus) -> Vec<(Role, String)> {
        let mut events = Vec::new();
        while let Some(message) = bus.receive(Role::Orchestrator, false) {
            if let Message::Event(BoothEvent::Error { source, message }) = message {
                events.push((source, message));
            }
        }
        events
    }

    #[test]
    fn recoverable_role_is_restarted_and_faults_are_reported() {
        let bus = Arc::new(Bus::new());
        let supervisor = Supervisor::new(Arc::clone(&bus));
        let attempts = Arc::new(AtomicU32::new(0));

        supervisor
            .spawn(Box::new(FlakyWorker {
                role: Role::Camera,
                failures: 2,
                attempts: Arc::clone(&attempts),
            }))
            .unwrap();

        // Give the wrapper time to fail twice and settle into draining,
        // then release it.
        thread::sleep(Duration::from_millis(100));
        bus.send(Role::Camera, Message::Stop);
        supervisor.join_all();

        assert_eq!(attempts.load(Ordering::SeqCst), 3, "2 failures + 1 clean run");
        let events = error_events(&bus);
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|(source, _)| *source == Role::Camera));
        assert!(events[0].1.contains("scripted panic 0"));
        assert!(events[1].1.contains("scripted error 1"));
    }

    #[test]
    fn non_recoverable_role_is_not_restarted() {
        let bus = Arc::new(Bus::new());
        let supervisor = Supervisor::new(Arc::clone(&bus));
        let attempts = Arc::new(AtomicU32::new(0));

        supervisor
            .spawn(Box::new(FlakyWorker {
                role: Role::Display,
                failures: 5,
                attempts: Arc::clone(&attempts),
            }))
            .unwrap();

        thread::sleep(Duration::from_millis(100));
        supervisor.join_all();

        assert_eq!(attempts.load(Ordering::SeqCst), 1, "no restart after fault");
        assert_eq!(error_events(&bus).len(), 1);
    }

    #[test]
    fn clean_worker_joins_after_stop() {
        let bus = Arc::new(Bus::new());
        let supervisor = Supervisor::new(Arc::clone(&bus));
        let attempts = Arc::new(AtomicU32::new(0));

        supervisor
            .spawn(Box::new(FlakyWorker {
                role: Role::Lamp,
                failures: 0,
                attempts: Arc::clone(&attempts),
            }))
            .unwrap();

        bus.send(Role::Lamp, Message::Stop);
        supervisor.join_all();
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert!(error_events(&bus).is_empty());
    }

    #[test]
    fn stall_monitor_reports_a_role_sitting_on_mail() {
        let bus = Arc::new(Bus::new());
        let supervisor = Supervisor::new(Arc::clone(&bus));
        supervisor
            .start_stall_monitor(Duration::from_millis(50))
            .unwrap();

        // Nobody drains the camera mailbox.
        bus.send(Role::Camera, Message::State(BoothState::Startup));
        thread::sleep(Duration::from_millis(600));

        let events = error_events(&bus);
        assert_eq!(events.len(), 1, "exactly one report per stall episode");
        assert_eq!(events[0].0, Role::Camera);

        supervisor.join_all();
    }
}
