//! # Photobooth Orchestration Core
//!
//! The only part of the appliance with real coordination logic. Three
//! pieces:
//!
//! 1. **Transition function** ([`machine`]) — a pure, total mapping from
//!    (current state, incoming event) to a [`machine::Reaction`]. Owns no
//!    I/O, no clocks, no bus handle; unit-testable in isolation.
//! 2. **Orchestrator** ([`orchestrator`]) — drains its own mailbox,
//!    applies the transition function, broadcasts each new state, and
//!    returns the appliance exit code once a teardown state is reached.
//! 3. **Supervisor** ([`supervisor`]) — one supervised execution context
//!    per worker role; converts panics and errors into error events on
//!    the bus and restarts recoverable roles without recreating their
//!    mailboxes.
//!
//! The shared worker-role contract (run-loop shape, idempotent state
//! application) lives in [`worker`].

pub mod machine;
pub mod orchestrator;
pub mod supervisor;
pub mod worker;
