//! Test helpers: plain-text dumps of resolved class views.
//!
//! Use [`describe_class`] to capture what a renderer or property editor
//! would see for a class, for snapshot-style assertions.

pub mod snapshot;

pub use snapshot::describe_class;
