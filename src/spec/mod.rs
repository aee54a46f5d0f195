//! Specifications: class kind catalogs and persisted class shapes.

pub mod class_spec;
pub mod registry;
pub mod requirement;

pub use class_spec::{ClassSpecification, PropertySpecification};
pub use registry::{CatalogError, SpecRegistry};
pub use requirement::RequirementSpec;
