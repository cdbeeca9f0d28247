//! Photobooth Common Library
//!
//! This crate provides the shared vocabulary of the photobooth workspace:
//! the worker role identities, the closed message/state/event model that
//! flows over the mailbox bus, and configuration loading utilities.
//!
//! # Module Structure
//!
//! - [`role`] - Worker role identities
//! - [`message`] - The closed `Message`/`BoothState`/`BoothEvent` unions
//! - [`picture`] - Opaque encoded image buffers
//! - [`config`] - Configuration loading traits and types
//! - [`consts`] - Process exit codes and fixed defaults
//! - [`prelude`] - Common re-exports for convenience

pub mod config;
pub mod consts;
pub mod message;
pub mod picture;
pub mod prelude;
pub mod role;
