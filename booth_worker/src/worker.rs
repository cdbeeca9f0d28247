//! Postprocess role run-loop.

use crate::tasks::PostprocessTask;
use crate::tracker::PictureTracker;
use booth_bus::Bus;
use booth_common::message::{BoothEvent, BoothState, CameraEvent, Message, WorkerEvent};
use booth_common::picture::Picture;
use booth_common::role::Role;
use booth_core::worker::{RoleWorker, StateLatch, WorkerError};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Runs the follow-up tasks and reports idle after the review hold.
pub struct PostprocessWorker {
    tracker: PictureTracker,
    tasks: Vec<Box<dyn PostprocessTask>>,
    /// Minimum time the review screen stays up after the tasks finish.
    review_hold: Duration,
    latch: StateLatch,
}

impl PostprocessWorker {
    pub fn new(
        tracker: PictureTracker,
        tasks: Vec<Box<dyn PostprocessTask>>,
        review_hold: Duration,
    ) -> Self {
        Self {
            tracker,
            tasks,
            review_hold,
            latch: StateLatch::new(),
        }
    }

    /// Feed `picture` at `path` to the selected tasks, swallowing
    /// failures per task.
    fn run_tasks(&mut self, picture: &Picture, shots_only: bool, path: &std::path::Path) {
        for task in &mut self.tasks {
            if shots_only && !task.wants_shots() {
                continue;
            }
            if let Err(e) = task.process(picture, path) {
                warn!(task = task.name(), path = %path.display(), error = %e, "task failed");
            }
        }
    }
}

impl RoleWorker for PostprocessWorker {
    fn role(&self) -> Role {
        Role::Postprocess
    }

    fn run(&mut self, bus: &Bus) -> Result<(), WorkerError> {
        self.latch.reset();

        for message in bus.drain(Role::Postprocess) {
            match message {
                Message::Event(BoothEvent::Camera(CameraEvent::Capture(picture))) => {
                    let path = self.tracker.next_shot_path(picture.format());
                    debug!(path = %path.display(), "shot received");
                    self.run_tasks(&picture, true, &path);
                }
                Message::Event(event) => {
                    warn!(%event, "unexpected event in postprocess mailbox");
                }
                Message::State(state) => {
                    if !self.latch.admit(&state) {
                        continue;
                    }
                    match state {
                        BoothState::Greeter => self.tracker.start_session(),
                        BoothState::Review { picture } => {
                            let path = self.tracker.composite_path(picture.format());
                            self.run_tasks(&picture, false, &path);
                            thread::sleep(self.review_hold);
                            bus.send(
                                Role::Orchestrator,
                                Message::Event(BoothEvent::Worker(WorkerEvent::Idle)),
                            );
                        }
                        _ => {}
                    }
                }
                Message::Stop => break,
            }
        }
        Ok(())
    }
}
