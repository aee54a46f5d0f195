//! Control classes: slotmap-backed class tree with extends resolution.

pub mod node;
pub mod resolve;
pub mod tree;

pub use node::{ClassId, ControlClass, SubClassSlot};
pub use tree::ClassTree;
