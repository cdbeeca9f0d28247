//! # Photobooth Mailbox Bus
//!
//! One unbounded FIFO mailbox per worker role. Any role may enqueue onto
//! any mailbox; only the owning role dequeues. The orchestrator talks to
//! the workers by broadcasting state; workers talk back by sending events
//! to the orchestrator's mailbox.
//!
//! Mailboxes are created once at startup and live for the whole appliance
//! launch. A worker restart reuses its existing mailbox, so no in-flight
//! message is lost across a restart.
//!
//! ## Guarantees
//!
//! - `send` never blocks (unbounded queues).
//! - FIFO per destination mailbox: messages sent to the same role are
//!   dequeued in enqueue order. This is stronger than the required
//!   per-sender FIFO and costs nothing with a single queue per role.
//! - `is_empty` is O(1) and performs no I/O; the camera role polls it
//!   between preview frames.
//!
//! ## Drain idiom
//!
//! Every worker run-loop is a `for` over [`Bus::drain`]:
//!
//! ```rust
//! # use booth_bus::Bus;
//! # use booth_common::prelude::*;
//! # let bus = Bus::new();
//! # bus.send(Role::Lamp, Message::Stop);
//! for message in bus.drain(Role::Lamp) {
//!     // handle message; iteration ends when a Stop sentinel arrives
//! }
//! ```

mod bus;

pub use bus::{Bus, Drain};
