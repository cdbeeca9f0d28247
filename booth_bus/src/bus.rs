//! The bus itself: mailbox array, delivery operations, drain iteration.

use booth_common::message::Message;
use booth_common::role::Role;
use crossbeam_channel::{Receiver, Sender, unbounded};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::trace;

/// One mailbox: producers clone `tx`, only the owning role reads `rx`.
struct Mailbox {
    tx: Sender<Message>,
    rx: Receiver<Message>,
    /// Milliseconds since bus creation at the owner's last dequeue.
    /// Feeds the supervisor's optional stall monitor.
    last_dequeue_ms: AtomicU64,
}

/// The per-role mailbox bus.
///
/// Shared between all role execution contexts via `Arc<Bus>`. All methods
/// take `&self`; the bus is the only genuinely shared resource in the
/// appliance.
pub struct Bus {
    mailboxes: [Mailbox; Role::COUNT],
    started: Instant,
}

impl Bus {
    /// Create the bus with one empty mailbox per role.
    pub fn new() -> Self {
        let mailboxes = core::array::from_fn(|_| {
            let (tx, rx) = unbounded();
            Mailbox {
                tx,
                rx,
                last_dequeue_ms: AtomicU64::new(0),
            }
        });
        Self {
            mailboxes,
            started: Instant::now(),
        }
    }

    /// Enqueue `message` onto `role`'s mailbox. Never blocks.
    pub fn send(&self, role: Role, message: Message) {
        trace!(%role, "bus send");
        // Cannot fail: the bus owns every receiver for its whole lifetime.
        let _ = self.mailboxes[role.index()].tx.send(message);
    }

    /// Enqueue `message` onto every mailbox except the orchestrator's own.
    ///
    /// Broadcasts originate from the orchestrator and target all worker
    /// roles; delivery order across roles is unspecified, order within a
    /// single mailbox is FIFO.
    pub fn broadcast(&self, message: Message) {
        for role in Role::ALL {
            if role != Role::Orchestrator {
                self.send(role, message.clone());
            }
        }
    }

    /// Dequeue the next message for `role`.
    ///
    /// With `blocking` set, suspends the caller until a message arrives.
    /// Otherwise returns `None` immediately when the mailbox is empty.
    pub fn receive(&self, role: Role, blocking: bool) -> Option<Message> {
        let mailbox = &self.mailboxes[role.index()];
        let message = if blocking {
            mailbox.rx.recv().ok()
        } else {
            mailbox.rx.try_recv().ok()
        };
        if message.is_some() {
            self.touch(role);
        }
        message
    }

    /// Blocking iterator over `role`'s mailbox, ending when a
    /// [`Message::Stop`] sentinel is dequeued. All messages enqueued
    /// before the sentinel are yielded first.
    pub fn drain(&self, role: Role) -> Drain<'_> {
        Drain { bus: self, role }
    }

    /// O(1) peek: is `role`'s mailbox empty right now?
    ///
    /// The camera role uses this between preview frames to stop streaming
    /// as soon as the orchestrator has queued a new directive.
    #[inline]
    pub fn is_empty(&self, role: Role) -> bool {
        self.mailboxes[role.index()].rx.is_empty()
    }

    /// Number of messages currently queued for `role`.
    #[inline]
    pub fn len(&self, role: Role) -> usize {
        self.mailboxes[role.index()].rx.len()
    }

    /// Time since `role` last dequeued a message (or since bus creation
    /// if it never has). Used by the stall monitor.
    pub fn idle_for(&self, role: Role) -> Duration {
        let last = self.mailboxes[role.index()]
            .last_dequeue_ms
            .load(Ordering::Relaxed);
        self.started
            .elapsed()
            .saturating_sub(Duration::from_millis(last))
    }

    fn touch(&self, role: Role) {
        let ms = self.started.elapsed().as_millis() as u64;
        self.mailboxes[role.index()]
            .last_dequeue_ms
            .store(ms, Ordering::Relaxed);
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator returned by [`Bus::drain`].
///
/// Blocks between elements; terminates only on the `Stop` sentinel.
pub struct Drain<'a> {
    bus: &'a Bus,
    role: Role,
}

impl Iterator for Drain<'_> {
    type Item = Message;

    fn next(&mut self) -> Option<Message> {
        match self.bus.receive(self.role, true)? {
            Message::Stop => None,
            message => Some(message),
        }
    }
}
