//! Properties: identities, typed values and observable slots.

pub mod control_property;
pub mod lookup;
pub mod value;

pub use control_property::ControlProperty;
pub use lookup::PropertyLookup;
pub use value::{PropertyType, Rgba, Value, ValueError};
