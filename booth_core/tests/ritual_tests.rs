//! End-to-end ritual tests.
//!
//! Runs the real orchestrator loop and supervisor against scripted role
//! workers that answer state broadcasts the way the hardware roles do,
//! with no timing and no devices. Verifies the liveness property: one
//! trigger press drives the machine through the whole ritual and back to
//! idle, regardless of preview interleaving.

use booth_bus::Bus;
use booth_common::message::{
    BoothEvent, BoothState, ButtonId, CameraEvent, Message, WorkerEvent,
};
use booth_common::picture::{Picture, PictureFormat};
use booth_common::role::Role;
use booth_common::consts::EXIT_SHUTDOWN;
use booth_core::machine::SessionPolicy;
use booth_core::orchestrator::Orchestrator;
use booth_core::supervisor::Supervisor;
use booth_core::worker::{RoleWorker, StateLatch, WorkerError};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn pic(tag: u8) -> Picture {
    Picture::new(PictureFormat::Jpeg, vec![tag; 16])
}

/// Camera stand-in: answers broadcasts with the events a real camera
/// role emits, including preview frames during countdown.
struct ScriptedCamera {
    latch: StateLatch,
    previews_per_countdown: u32,
}

impl RoleWorker for ScriptedCamera {
    fn role(&self) -> Role {
        Role::Camera
    }

    fn run(&mut self, bus: &Bus) -> Result<(), WorkerError> {
        for message in bus.drain(Role::Camera) {
            let Message::State(state) = message else {
                continue;
            };
            if !self.latch.admit(&state) {
                continue;
            }
            match state {
                BoothState::Startup => {
                    bus.send(
                        Role::Orchestrator,
                        Message::Event(BoothEvent::Camera(CameraEvent::Ready)),
                    );
                }
                BoothState::Countdown { .. } => {
                    // Viewfinder stream goes straight to the display.
                    for _ in 0..self.previews_per_countdown {
                        if !bus.is_empty(Role::Camera) {
                            break;
                        }
                        bus.send(
                            Role::Display,
                            Message::Event(BoothEvent::Camera(CameraEvent::Preview(pic(0)))),
                        );
                    }
                }
                BoothState::Capture { shot, total } => {
                    bus.send(
                        Role::Orchestrator,
                        Message::Event(BoothEvent::Camera(CameraEvent::Capture(pic(shot as u8)))),
                    );
                    if shot == total {
                        bus.send(
                            Role::Orchestrator,
                            Message::Event(BoothEvent::Camera(CameraEvent::Assemble)),
                        );
                    }
                }
                BoothState::Assemble => {
                    bus.send(
                        Role::Orchestrator,
                        Message::Event(BoothEvent::Camera(CameraEvent::Review(pic(99)))),
                    );
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Display stand-in: records every broadcast state and advances the
/// timed screens immediately.
struct ScriptedDisplay {
    latch: StateLatch,
    seen: Arc<Mutex<Vec<BoothState>>>,
}

impl RoleWorker for ScriptedDisplay {
    fn role(&self) -> Role {
        Role::Display
    }

    fn run(&mut self, bus: &Bus) -> Result<(), WorkerError> {
        for message in bus.drain(Role::Display) {
            let Message::State(state) = message else {
                continue; // preview frames
            };
            if !self.latch.admit(&state) {
                continue;
            }
            self.seen.lock().push(state.clone());
            match state {
                BoothState::Greeter => {
                    bus.send(
                        Role::Orchestrator,
                        Message::Event(BoothEvent::input(ButtonId::Advance)),
                    );
                }
                BoothState::Countdown { .. } => {
                    bus.send(
                        Role::Orchestrator,
                        Message::Event(BoothEvent::Camera(CameraEvent::Countdown)),
                    );
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Postprocess stand-in: reports idle as soon as the composite arrives.
struct ScriptedPostprocess {
    latch: StateLatch,
    shots: Arc<Mutex<Vec<Picture>>>,
}

impl RoleWorker for ScriptedPostprocess {
    fn role(&self) -> Role {
        Role::Postprocess
    }

    fn run(&mut self, bus: &Bus) -> Result<(), WorkerError> {
        for message in bus.drain(Role::Postprocess) {
            match message {
                Message::State(state) => {
                    if !self.latch.admit(&state) {
                        continue;
                    }
                    if let BoothState::Review { .. } = state {
                        bus.send(
                            Role::Orchestrator,
                            Message::Event(BoothEvent::Worker(WorkerEvent::Idle)),
                        );
                    }
                }
                Message::Event(BoothEvent::Camera(CameraEvent::Capture(picture))) => {
                    self.shots.lock().push(picture);
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Drains its mailbox and does nothing, like an idle lamp/input role.
struct SilentRole(Role);

impl RoleWorker for SilentRole {
    fn role(&self) -> Role {
        self.0
    }

    fn run(&mut self, bus: &Bus) -> Result<(), WorkerError> {
        for _message in bus.drain(self.0) {}
        Ok(())
    }
}

fn wait_for_state(seen: &Arc<Mutex<Vec<BoothState>>>, wanted: &BoothState, timeout: Duration) {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if seen.lock().iter().any(|s| s == wanted) {
            return;
        }
        thread::sleep(Duration::from_millis(5));
    }
    panic!("state {wanted} not observed within {timeout:?}; saw {:?}", seen.lock());
}

#[test]
fn one_trigger_drives_the_full_ritual_back_to_idle() {
    let bus = Arc::new(Bus::new());
    let supervisor = Supervisor::new(Arc::clone(&bus));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let shots = Arc::new(Mutex::new(Vec::new()));

    supervisor
        .spawn(Box::new(ScriptedCamera {
            latch: StateLatch::new(),
            previews_per_countdown: 4,
        }))
        .unwrap();
    supervisor
        .spawn(Box::new(ScriptedDisplay {
            latch: StateLatch::new(),
            seen: Arc::clone(&seen),
        }))
        .unwrap();
    supervisor
        .spawn(Box::new(ScriptedPostprocess {
            latch: StateLatch::new(),
            shots: Arc::clone(&shots),
        }))
        .unwrap();
    supervisor.spawn(Box::new(SilentRole(Role::Input))).unwrap();
    supervisor.spawn(Box::new(SilentRole(Role::Lamp))).unwrap();

    let orchestrator_bus = Arc::clone(&bus);
    let orchestrator = thread::spawn(move || {
        let mut orch = Orchestrator::new(orchestrator_bus, SessionPolicy::new(3, true), false);
        orch.run()
    });

    // The camera reports ready, the machine idles; press the button.
    wait_for_state(&seen, &BoothState::Idle, Duration::from_secs(5));
    bus.send(
        Role::Orchestrator,
        Message::Event(BoothEvent::input(ButtonId::Trigger)),
    );

    // The ritual must complete and return to idle without further input.
    wait_for_state(&seen, &BoothState::Review { picture: pic(99) }, Duration::from_secs(5));
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        {
            let states = seen.lock();
            let idles = states.iter().filter(|s| **s == BoothState::Idle).count();
            if idles >= 2 {
                break;
            }
        }
        assert!(Instant::now() < deadline, "ritual did not return to idle");
        thread::sleep(Duration::from_millis(5));
    }

    // Shut down and collect everything.
    bus.send(
        Role::Orchestrator,
        Message::Event(BoothEvent::input(ButtonId::Shutdown)),
    );
    assert_eq!(orchestrator.join().unwrap(), EXIT_SHUTDOWN);
    supervisor.join_all();

    // The display saw the ritual in order.
    let states = seen.lock();
    let positions: Vec<usize> = [
        BoothState::Startup,
        BoothState::Idle,
        BoothState::Greeter,
        BoothState::Countdown { remaining: 3 },
        BoothState::Capture { shot: 1, total: 3 },
        BoothState::Countdown { remaining: 2 },
        BoothState::Capture { shot: 2, total: 3 },
        BoothState::Countdown { remaining: 1 },
        BoothState::Capture { shot: 3, total: 3 },
        BoothState::Assemble,
        BoothState::Review { picture: pic(99) },
    ]
    .iter()
    .map(|wanted| {
        states
            .iter()
            .position(|s| s == wanted)
            .unwrap_or_else(|| panic!("missing state {wanted}; saw {states:?}"))
    })
    .collect();
    assert!(
        positions.windows(2).all(|w| w[0] < w[1]),
        "ritual states out of order: {states:?}"
    );

    // All three shots reached postprocessing, in order.
    let shots = shots.lock();
    let tags: Vec<u8> = shots.iter().map(|p| p.bytes()[0]).collect();
    assert_eq!(tags, vec![1, 2, 3]);
}

#[test]
fn run_on_startup_needs_no_button_press() {
    let bus = Arc::new(Bus::new());
    let supervisor = Supervisor::new(Arc::clone(&bus));
    let seen = Arc::new(Mutex::new(Vec::new()));

    supervisor
        .spawn(Box::new(ScriptedCamera {
            latch: StateLatch::new(),
            previews_per_countdown: 0,
        }))
        .unwrap();
    supervisor
        .spawn(Box::new(ScriptedDisplay {
            latch: StateLatch::new(),
            seen: Arc::clone(&seen),
        }))
        .unwrap();
    supervisor
        .spawn(Box::new(ScriptedPostprocess {
            latch: StateLatch::new(),
            shots: Arc::new(Mutex::new(Vec::new())),
        }))
        .unwrap();
    supervisor.spawn(Box::new(SilentRole(Role::Input))).unwrap();
    supervisor.spawn(Box::new(SilentRole(Role::Lamp))).unwrap();

    let orchestrator_bus = Arc::clone(&bus);
    let orchestrator = thread::spawn(move || {
        let mut orch = Orchestrator::new(orchestrator_bus, SessionPolicy::new(2, true), true);
        orch.run()
    });

    // The sitting starts by itself.
    wait_for_state(&seen, &BoothState::Greeter, Duration::from_secs(5));
    wait_for_state(&seen, &BoothState::Review { picture: pic(99) }, Duration::from_secs(5));

    bus.send(
        Role::Orchestrator,
        Message::Event(BoothEvent::input(ButtonId::Shutdown)),
    );
    assert_eq!(orchestrator.join().unwrap(), EXIT_SHUTDOWN);
    supervisor.join_all();
}
