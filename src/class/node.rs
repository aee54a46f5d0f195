//! Control class nodes: ClassId, ControlClass.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use slotmap::new_key_type;

use crate::error::{ClassError, Result, Scope};
use crate::event::{ClassUpdate, ListenerGroup, PropertyUpdate};
use crate::property::{ControlProperty, PropertyLookup};
use crate::spec::RequirementSpec;

new_key_type! {
    /// Unique identifier for a control class in a [`ClassTree`](super::ClassTree).
    pub struct ClassId;
}

/// Which sub-class list a class is placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubClassSlot {
    Required,
    Optional,
}

/// A control class: its own properties, overrides of inherited ones, an
/// optional extended class and owned sub-classes.
///
/// The required/optional property lists mirror the class's
/// [`RequirementSpec`] and never grow or shrink; only their values change.
/// Sub-classes and the extended class are referenced by [`ClassId`]; only
/// the sub-classes are owned.
pub struct ControlClass {
    id: ClassId,
    name: String,
    requirements: Arc<RequirementSpec>,
    extend: Option<ClassId>,
    required_properties: Vec<ControlProperty>,
    optional_properties: Vec<ControlProperty>,
    overridden_properties: Vec<ControlProperty>,
    pub(crate) required_sub_classes: Vec<ClassId>,
    pub(crate) optional_sub_classes: Vec<ClassId>,
    property_update_group: Rc<ListenerGroup<PropertyUpdate>>,
    class_update_group: Rc<ListenerGroup<ClassUpdate>>,
}

impl ControlClass {
    pub(crate) fn new(
        id: ClassId,
        name: String,
        requirements: Arc<RequirementSpec>,
        required_properties: Vec<ControlProperty>,
        optional_properties: Vec<ControlProperty>,
    ) -> Self {
        let class = Self {
            id,
            name,
            requirements,
            extend: None,
            required_properties,
            optional_properties,
            overridden_properties: Vec::new(),
            required_sub_classes: Vec::new(),
            optional_sub_classes: Vec::new(),
            property_update_group: Rc::new(ListenerGroup::new()),
            class_update_group: Rc::new(ListenerGroup::new()),
        };
        class.forward_property_updates();
        class
    }

    /// Subscribe to every own property so its updates reach both groups of
    /// this class. Overrides are not wired.
    fn forward_property_updates(&self) {
        let id = self.id;
        for property in self.required_properties.iter().chain(&self.optional_properties) {
            let properties = Rc::clone(&self.property_update_group);
            let classes = Rc::clone(&self.class_update_group);
            property
                .update_group()
                .add_listener(move |update: &PropertyUpdate| {
                    properties.notify_all(update);
                    classes.notify_all(&ClassUpdate::Property {
                        class: id,
                        update: update.clone(),
                    });
                });
        }
    }

    pub fn id(&self) -> ClassId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the class. Publishes [`ClassUpdate::Rename`] even when the name
    /// is unchanged; listeners rely on it to refresh.
    pub fn set_name(&mut self, name: impl Into<String>) {
        let old = std::mem::replace(&mut self.name, name.into());
        tracing::debug!(old = %old, new = %self.name, "renamed control class");
        self.class_update_group.notify_all(&ClassUpdate::Rename {
            class: self.id,
            old,
            new: self.name.clone(),
        });
    }

    /// The catalog this class was built from.
    pub fn requirements(&self) -> &Arc<RequirementSpec> {
        &self.requirements
    }

    /// The extended class as stored. May be stale if that class was removed;
    /// use [`ClassTree::extend_class`](super::ClassTree::extend_class) for a
    /// checked lookup.
    pub fn extend_class(&self) -> Option<ClassId> {
        self.extend
    }

    pub(crate) fn replace_extend(&mut self, extend: Option<ClassId>) {
        let old = std::mem::replace(&mut self.extend, extend);
        self.class_update_group.notify_all(&ClassUpdate::Extend {
            class: self.id,
            old,
            new: extend,
        });
    }

    /// Set the extended class during construction, before anyone listens.
    pub(crate) fn init_extend(&mut self, extend: Option<ClassId>) {
        self.extend = extend;
    }

    pub fn required_properties(&self) -> &[ControlProperty] {
        &self.required_properties
    }

    pub fn optional_properties(&self) -> &[ControlProperty] {
        &self.optional_properties
    }

    pub fn overridden_properties(&self) -> &[ControlProperty] {
        &self.overridden_properties
    }

    pub fn required_sub_classes(&self) -> &[ClassId] {
        &self.required_sub_classes
    }

    pub fn optional_sub_classes(&self) -> &[ClassId] {
        &self.optional_sub_classes
    }

    /// Required sub-classes followed by optional ones.
    pub fn all_sub_classes(&self) -> Vec<ClassId> {
        self.required_sub_classes
            .iter()
            .chain(&self.optional_sub_classes)
            .copied()
            .collect()
    }

    pub(crate) fn sub_classes_mut(&mut self, slot: SubClassSlot) -> &mut Vec<ClassId> {
        match slot {
            SubClassSlot::Required => &mut self.required_sub_classes,
            SubClassSlot::Optional => &mut self.optional_sub_classes,
        }
    }

    // -- lookups --------------------------------------------------------

    pub fn find_required(&self, lookup: &PropertyLookup) -> Result<&ControlProperty> {
        find_in(&self.required_properties, lookup, Scope::Required)
    }

    pub fn find_optional(&self, lookup: &PropertyLookup) -> Result<&ControlProperty> {
        find_in(&self.optional_properties, lookup, Scope::Optional)
    }

    /// Search required, then optional properties.
    pub fn find(&self, lookup: &PropertyLookup) -> Result<&ControlProperty> {
        self.find_required(lookup)
            .or_else(|_| self.find_optional(lookup))
            .map_err(|_| not_found(lookup, Scope::Class))
    }

    pub fn find_required_mut(&mut self, lookup: &PropertyLookup) -> Result<&mut ControlProperty> {
        find_in_mut(&mut self.required_properties, lookup, Scope::Required)
    }

    pub fn find_optional_mut(&mut self, lookup: &PropertyLookup) -> Result<&mut ControlProperty> {
        find_in_mut(&mut self.optional_properties, lookup, Scope::Optional)
    }

    /// Mutable [`ControlClass::find`]. Setting the returned property
    /// publishes on this class's groups.
    pub fn find_mut(&mut self, lookup: &PropertyLookup) -> Result<&mut ControlProperty> {
        if self.has_required_property(lookup) {
            return self.find_required_mut(lookup);
        }
        self.find_optional_mut(lookup)
            .map_err(|_| not_found(lookup, Scope::Class))
    }

    fn has_required_property(&self, lookup: &PropertyLookup) -> bool {
        self.required_properties.iter().any(|p| p.lookup() == lookup)
    }

    pub fn find_override(&self, lookup: &PropertyLookup) -> Option<&ControlProperty> {
        self.overridden_properties
            .iter()
            .find(|p| p.lookup() == lookup)
    }

    /// Edit an override's value. Override edits are not published on the
    /// class groups.
    pub fn find_override_mut(&mut self, lookup: &PropertyLookup) -> Option<&mut ControlProperty> {
        self.overridden_properties
            .iter_mut()
            .find(|p| p.lookup() == lookup)
    }

    // -- overrides ------------------------------------------------------

    /// Append `property` as an override, replacing any earlier override of
    /// the same lookup, and publish [`ClassUpdate::OverrideAdded`].
    pub(crate) fn push_override(&mut self, property: ControlProperty) {
        self.overridden_properties
            .retain(|p| p.lookup() != property.lookup());
        let update = ClassUpdate::OverrideAdded {
            class: self.id,
            lookup: property.lookup().clone(),
            value: property.value().cloned(),
        };
        tracing::debug!(class = %self.name, property = %property.lookup(), "overrode property");
        self.overridden_properties.push(property);
        self.class_update_group.notify_all(&update);
    }

    /// Restore an override during construction, before anyone listens.
    pub(crate) fn init_override(&mut self, property: ControlProperty) {
        self.overridden_properties
            .retain(|p| p.lookup() != property.lookup());
        self.overridden_properties.push(property);
    }

    /// Remove the override of `lookup`. Publishes
    /// [`ClassUpdate::OverrideRemoved`] carrying the removed entry; does
    /// nothing if there was no such override.
    pub fn remove_override(&mut self, lookup: &PropertyLookup) -> Option<ControlProperty> {
        let index = self
            .overridden_properties
            .iter()
            .position(|p| p.lookup() == lookup)?;
        let removed = self.overridden_properties.remove(index);
        tracing::debug!(class = %self.name, property = %lookup, "removed override");
        self.class_update_group.notify_all(&ClassUpdate::OverrideRemoved {
            class: self.id,
            lookup: removed.lookup().clone(),
            value: removed.value().cloned(),
        });
        Some(removed)
    }

    // -- local views ----------------------------------------------------

    /// Own required and optional properties that have a value. Values
    /// inherited from extended classes are not included.
    pub fn defined_properties(&self) -> Vec<&ControlProperty> {
        self.required_properties
            .iter()
            .chain(&self.optional_properties)
            .filter(|p| p.is_set())
            .collect()
    }

    /// Overrides that have a value.
    pub fn overridden_defined_properties(&self) -> Vec<&ControlProperty> {
        self.overridden_properties
            .iter()
            .filter(|p| p.is_set())
            .collect()
    }

    /// [`defined_properties`](Self::defined_properties) followed by
    /// [`overridden_defined_properties`](Self::overridden_defined_properties).
    ///
    /// The two lists are concatenated as-is; when a lookup appears in both,
    /// consumers should prefer the override entry.
    pub fn all_defined_properties(&self) -> Vec<&ControlProperty> {
        let mut all = self.defined_properties();
        all.extend(self.overridden_defined_properties());
        all
    }

    /// Required properties whose lookup does not appear in
    /// [`all_defined_properties`](Self::all_defined_properties). Values only
    /// inherited from an extended class do not count.
    pub fn missing_required_properties(&self) -> Vec<&ControlProperty> {
        let defined = self.all_defined_properties();
        self.required_properties
            .iter()
            .filter(|req| !defined.iter().any(|d| d.lookup() == req.lookup()))
            .collect()
    }

    /// Own properties whose lookup is an event handler.
    pub fn event_properties(&self) -> Vec<&ControlProperty> {
        self.required_properties
            .iter()
            .chain(&self.optional_properties)
            .filter(|p| p.lookup().is_event())
            .collect()
    }

    // -- listener groups ------------------------------------------------

    /// Fan-out of every update to this class's own required/optional
    /// properties. Extended classes publish on their own groups only.
    pub fn property_update_group(&self) -> &ListenerGroup<PropertyUpdate> {
        &self.property_update_group
    }

    /// Every class-level update: property, rename, extend, override.
    pub fn class_update_group(&self) -> &ListenerGroup<ClassUpdate> {
        &self.class_update_group
    }
}

fn not_found(lookup: &PropertyLookup, scope: Scope) -> ClassError {
    ClassError::PropertyNotFound {
        property: lookup.name().to_owned(),
        scope,
    }
}

fn find_in<'a>(
    properties: &'a [ControlProperty],
    lookup: &PropertyLookup,
    scope: Scope,
) -> Result<&'a ControlProperty> {
    properties
        .iter()
        .find(|p| p.lookup() == lookup)
        .ok_or_else(|| not_found(lookup, scope))
}

fn find_in_mut<'a>(
    properties: &'a mut [ControlProperty],
    lookup: &PropertyLookup,
    scope: Scope,
) -> Result<&'a mut ControlProperty> {
    properties
        .iter_mut()
        .find(|p| p.lookup() == lookup)
        .ok_or_else(|| not_found(lookup, scope))
}

impl fmt::Display for ControlClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for ControlClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlClass")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("extend", &self.extend)
            .field("required_properties", &self.required_properties.len())
            .field("optional_properties", &self.optional_properties.len())
            .field("overridden_properties", &self.overridden_properties.len())
            .finish()
    }
}
