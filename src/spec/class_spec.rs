//! Persisted class specifications.
//!
//! [`ClassSpecification`] is the hand-off shape between a class tree and
//! whatever persists it. It names the extended class instead of pointing at
//! it; the name is resolved against the project's top-level classes on load.

use serde::{Deserialize, Serialize};

use super::requirement::{first_duplicate, RequirementSpec};
use crate::class::{ClassId, ClassTree};
use crate::error::{ClassError, Result};
use crate::property::{ControlProperty, PropertyLookup, Value};

/// A property lookup with its saved value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySpecification {
    pub lookup: PropertyLookup,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl PropertySpecification {
    pub fn new(lookup: PropertyLookup, value: Option<Value>) -> Self {
        Self { lookup, value }
    }

    /// Build a fresh property holding a deep copy of the saved value.
    pub fn construct(&self) -> ControlProperty {
        ControlProperty::with_value(self.lookup.clone(), self.value.clone())
    }

    fn of(property: &ControlProperty) -> Self {
        Self::new(property.lookup().clone(), property.value().cloned())
    }
}

/// The persisted form of a control class and its sub-classes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassSpecification {
    pub name: String,
    /// Name of the extended class, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extend: Option<String>,
    #[serde(default)]
    pub required_properties: Vec<PropertySpecification>,
    #[serde(default)]
    pub optional_properties: Vec<PropertySpecification>,
    #[serde(default)]
    pub overridden_properties: Vec<PropertySpecification>,
    #[serde(default)]
    pub required_sub_classes: Vec<ClassSpecification>,
    #[serde(default)]
    pub optional_sub_classes: Vec<ClassSpecification>,
}

impl ClassSpecification {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the extended class name (builder).
    pub fn with_extend(mut self, name: impl Into<String>) -> Self {
        self.extend = Some(name.into());
        self
    }

    /// Add a required property with a saved value (builder).
    pub fn with_required(mut self, lookup: PropertyLookup, value: Option<Value>) -> Self {
        self.required_properties
            .push(PropertySpecification::new(lookup, value));
        self
    }

    /// Add an optional property with a saved value (builder).
    pub fn with_optional(mut self, lookup: PropertyLookup, value: Option<Value>) -> Self {
        self.optional_properties
            .push(PropertySpecification::new(lookup, value));
        self
    }

    /// Add an overridden property (builder).
    pub fn with_override(mut self, lookup: PropertyLookup, value: Option<Value>) -> Self {
        self.overridden_properties
            .push(PropertySpecification::new(lookup, value));
        self
    }

    /// Add a required sub-class (builder).
    pub fn with_required_sub_class(mut self, sub: ClassSpecification) -> Self {
        self.required_sub_classes.push(sub);
        self
    }

    /// Add an optional sub-class (builder).
    pub fn with_optional_sub_class(mut self, sub: ClassSpecification) -> Self {
        self.optional_sub_classes.push(sub);
        self
    }

    /// The first lookup this specification, or a nested sub-class, lists
    /// more than once. Own properties are checked across both lists, and
    /// overrides among themselves.
    pub fn find_duplicate(&self) -> Option<&PropertyLookup> {
        let own = self
            .required_properties
            .iter()
            .chain(&self.optional_properties)
            .map(|p| &p.lookup);
        first_duplicate(own)
            .or_else(|| first_duplicate(self.overridden_properties.iter().map(|p| &p.lookup)))
            .or_else(|| self.sub_classes().find_map(Self::find_duplicate))
    }

    fn sub_classes(&self) -> impl Iterator<Item = &ClassSpecification> {
        self.required_sub_classes
            .iter()
            .chain(&self.optional_sub_classes)
    }

    /// The catalog a class loaded from this specification carries: its saved
    /// property lookups, and its saved sub-classes as templates.
    pub fn requirements(&self) -> RequirementSpec {
        RequirementSpec {
            required_properties: self
                .required_properties
                .iter()
                .map(|p| p.lookup.clone())
                .collect(),
            optional_properties: self
                .optional_properties
                .iter()
                .map(|p| p.lookup.clone())
                .collect(),
            required_sub_classes: self.required_sub_classes.clone(),
            optional_sub_classes: self.optional_sub_classes.clone(),
        }
    }

    /// Snapshot a live class (and its sub-classes) into persisted form.
    ///
    /// Fails with [`ClassError::ExtendSubClass`] if a captured class extends
    /// a class that has since become a sub-class; its name could not be
    /// resolved on load.
    pub fn capture(tree: &ClassTree, id: ClassId) -> Result<Self> {
        let class = tree.get(id).ok_or(ClassError::UnknownClass(id))?;
        if let Some(parent) = tree.extend_class(id) {
            if tree.owner(parent).is_some() {
                return Err(ClassError::ExtendSubClass(parent));
            }
        }
        let capture_all = |ids: &[ClassId]| -> Result<Vec<ClassSpecification>> {
            ids.iter().map(|&sub| Self::capture(tree, sub)).collect()
        };
        Ok(Self {
            name: class.name().to_owned(),
            extend: tree
                .extend_class(id)
                .and_then(|parent| tree.get(parent))
                .map(|parent| parent.name().to_owned()),
            required_properties: class
                .required_properties()
                .iter()
                .map(PropertySpecification::of)
                .collect(),
            optional_properties: class
                .optional_properties()
                .iter()
                .map(PropertySpecification::of)
                .collect(),
            overridden_properties: class
                .overridden_properties()
                .iter()
                .map(PropertySpecification::of)
                .collect(),
            required_sub_classes: capture_all(class.required_sub_classes())?,
            optional_sub_classes: capture_all(class.optional_sub_classes())?,
        })
    }
}
