//! Observable property slots.

use super::lookup::PropertyLookup;
use super::value::Value;
use crate::event::{ListenerGroup, PropertyUpdate};

/// A named, typed, observable value slot.
///
/// The lookup never changes after construction; the value may be replaced
/// any number of times. Every effective change is published on
/// [`ControlProperty::update_group`] with the old and new values.
#[derive(Debug)]
pub struct ControlProperty {
    lookup: PropertyLookup,
    value: Option<Value>,
    update_group: ListenerGroup<PropertyUpdate>,
}

impl ControlProperty {
    /// An unset property.
    pub fn new(lookup: PropertyLookup) -> Self {
        Self::with_value(lookup, None)
    }

    pub fn with_value(lookup: PropertyLookup, value: Option<Value>) -> Self {
        Self {
            lookup,
            value,
            update_group: ListenerGroup::new(),
        }
    }

    pub fn lookup(&self) -> &PropertyLookup {
        &self.lookup
    }

    pub fn name(&self) -> &str {
        self.lookup.name()
    }

    /// Current value, or `None` if not set.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Replace the value. Publishes a [`PropertyUpdate`] unless the new value
    /// is the same as the current one (see [`Value::same_as`]).
    pub fn set(&mut self, value: Option<Value>) {
        let unchanged = match (&self.value, &value) {
            (Some(current), Some(new)) => current.same_as(new),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }
        let old = std::mem::replace(&mut self.value, value);
        tracing::trace!(property = %self.lookup, "property value changed");
        let update = PropertyUpdate {
            lookup: self.lookup.clone(),
            old,
            new: self.value.clone(),
        };
        self.update_group.notify_all(&update);
    }

    /// A new, unobserved property with the same lookup and a deep copy of
    /// the value.
    pub fn deep_copy(&self) -> Self {
        Self::with_value(self.lookup.clone(), self.value.clone())
    }

    /// Listeners notified on every value change.
    pub fn update_group(&self) -> &ListenerGroup<PropertyUpdate> {
        &self.update_group
    }
}
