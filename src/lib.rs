//! # control-classes
//!
//! Control class trees for dialog editors: configuration entities that
//! describe widget definitions, carry named properties, and inherit from at
//! most one other class.
//!
//! The crate resolves, on demand, which property values apply to a class
//! (its own, its overrides, and those inherited along the extends chain),
//! and turns low-level property changes into class-level update events so a
//! renderer can redraw exactly once per change.
//!
//! ## Core Systems
//!
//! - **[`property`]** — Property lookups, typed values, observable slots
//! - **[`spec`]** — Requirement catalogs per class kind, persisted class shapes
//! - **[`class`]** — Slotmap-backed class tree, extends resolution, overrides
//! - **[`event`]** — Listener groups and update events
//! - **[`config`]** — Tree configuration
//! - **[`error`]** — Error taxonomy
//! - **[`testing`]** — Plain-text dumps for snapshot assertions
//!
//! Everything is single-threaded and synchronous: a mutation notifies every
//! listener before it returns.

// Foundation
pub mod config;
pub mod error;

// Core systems
pub mod class;
pub mod property;
pub mod spec;

// Change propagation
pub mod event;

// Test helpers
pub mod testing;

pub use class::{ClassId, ClassTree, ControlClass, SubClassSlot};
pub use config::TreeConfig;
pub use error::{ClassError, ErrorKind, Result};
