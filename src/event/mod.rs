//! Change propagation: listener groups and update events.
//!
//! - [`ListenerGroup`] — ordered observer list with synchronous fan-out.
//! - [`PropertyUpdate`] — a single property value change.
//! - [`ClassUpdate`] — class-level stream (property, rename, extend, override).

pub mod listener;
pub mod update;

pub use listener::{ListenerGroup, ListenerId};
pub use update::{ClassUpdate, PropertyUpdate};
