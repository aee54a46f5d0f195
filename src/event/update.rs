//! Update events published by properties and control classes.
//!
//! [`PropertyUpdate`] is the low-level event a [`ControlProperty`] emits.
//! [`ClassUpdate`] is the class-level stream: every property update of a
//! class's own properties is re-published as [`ClassUpdate::Property`], next
//! to renames, extend changes, and override additions/removals.
//!
//! [`ControlProperty`]: crate::property::ControlProperty

use crate::class::ClassId;
use crate::property::{PropertyLookup, Value};

/// A property value changed from `old` to `new`.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyUpdate {
    pub lookup: PropertyLookup,
    pub old: Option<Value>,
    pub new: Option<Value>,
}

/// Something about a control class changed.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassUpdate {
    /// One of the class's own required/optional properties changed.
    Property {
        class: ClassId,
        update: PropertyUpdate,
    },
    /// The class was renamed. Sent even when `old == new`.
    Rename {
        class: ClassId,
        old: String,
        new: String,
    },
    /// The extended class changed.
    Extend {
        class: ClassId,
        old: Option<ClassId>,
        new: Option<ClassId>,
    },
    /// An inherited property was overridden, seeded with `value`.
    OverrideAdded {
        class: ClassId,
        lookup: PropertyLookup,
        value: Option<Value>,
    },
    /// An override was removed; `value` is what it held at removal.
    OverrideRemoved {
        class: ClassId,
        lookup: PropertyLookup,
        value: Option<Value>,
    },
}

impl ClassUpdate {
    /// The class this update is about.
    pub fn class(&self) -> ClassId {
        match self {
            ClassUpdate::Property { class, .. }
            | ClassUpdate::Rename { class, .. }
            | ClassUpdate::Extend { class, .. }
            | ClassUpdate::OverrideAdded { class, .. }
            | ClassUpdate::OverrideRemoved { class, .. } => *class,
        }
    }

    /// Short name of the update kind, for logs.
    pub fn update_name(&self) -> &'static str {
        match self {
            ClassUpdate::Property { .. } => "Property",
            ClassUpdate::Rename { .. } => "Rename",
            ClassUpdate::Extend { .. } => "Extend",
            ClassUpdate::OverrideAdded { .. } => "OverrideAdded",
            ClassUpdate::OverrideRemoved { .. } => "OverrideRemoved",
        }
    }
}
