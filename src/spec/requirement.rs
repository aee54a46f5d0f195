//! Requirement specifications: the fixed catalog of a class kind.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::class_spec::ClassSpecification;
use crate::property::PropertyLookup;

/// Which properties and sub-classes a class kind declares.
///
/// Shared read-only by every class built from it. A lookup appears at most
/// once across both property lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementSpec {
    #[serde(default)]
    pub required_properties: Vec<PropertyLookup>,
    #[serde(default)]
    pub optional_properties: Vec<PropertyLookup>,
    /// Templates for sub-classes every instance must carry.
    #[serde(default)]
    pub required_sub_classes: Vec<ClassSpecification>,
    /// Templates for sub-classes an instance may carry.
    #[serde(default)]
    pub optional_sub_classes: Vec<ClassSpecification>,
}

impl RequirementSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a required property (builder). Ignored if already declared.
    pub fn with_required(mut self, lookup: PropertyLookup) -> Self {
        if !self.declares(&lookup) {
            self.required_properties.push(lookup);
        }
        self
    }

    /// Declare several required properties (builder).
    pub fn with_required_all(mut self, lookups: impl IntoIterator<Item = PropertyLookup>) -> Self {
        for lookup in lookups {
            self = self.with_required(lookup);
        }
        self
    }

    /// Declare an optional property (builder). Ignored if already declared.
    pub fn with_optional(mut self, lookup: PropertyLookup) -> Self {
        if !self.declares(&lookup) {
            self.optional_properties.push(lookup);
        }
        self
    }

    /// Declare several optional properties (builder).
    pub fn with_optional_all(mut self, lookups: impl IntoIterator<Item = PropertyLookup>) -> Self {
        for lookup in lookups {
            self = self.with_optional(lookup);
        }
        self
    }

    /// Add a required sub-class template (builder).
    pub fn with_required_sub_class(mut self, template: ClassSpecification) -> Self {
        self.required_sub_classes.push(template);
        self
    }

    /// Add an optional sub-class template (builder).
    pub fn with_optional_sub_class(mut self, template: ClassSpecification) -> Self {
        self.optional_sub_classes.push(template);
        self
    }

    /// Whether `lookup` is declared as required or optional.
    pub fn declares(&self, lookup: &PropertyLookup) -> bool {
        self.required_properties.contains(lookup) || self.optional_properties.contains(lookup)
    }

    /// Whether `lookup` is declared as required.
    pub fn requires(&self, lookup: &PropertyLookup) -> bool {
        self.required_properties.contains(lookup)
    }

    /// The first lookup declared more than once, either across both
    /// property lists or inside a sub-class template.
    pub fn find_duplicate(&self) -> Option<&PropertyLookup> {
        let own = self
            .required_properties
            .iter()
            .chain(&self.optional_properties);
        first_duplicate(own).or_else(|| {
            self.required_sub_classes
                .iter()
                .chain(&self.optional_sub_classes)
                .find_map(ClassSpecification::find_duplicate)
        })
    }
}

pub(crate) fn first_duplicate<'a>(
    lookups: impl IntoIterator<Item = &'a PropertyLookup>,
) -> Option<&'a PropertyLookup> {
    let mut seen = HashSet::new();
    lookups.into_iter().find(|lookup| !seen.insert(*lookup))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropertyType;

    fn lookup(name: &str) -> PropertyLookup {
        PropertyLookup::new(name, PropertyType::String)
    }

    #[test]
    fn builder_dedups_across_lists() {
        let spec = RequirementSpec::new()
            .with_required(lookup("text"))
            .with_required(lookup("text"))
            .with_optional(lookup("text"))
            .with_optional(lookup("tooltip"));
        assert_eq!(spec.required_properties, vec![lookup("text")]);
        assert_eq!(spec.optional_properties, vec![lookup("tooltip")]);
    }

    #[test]
    fn declares_and_requires() {
        let spec = RequirementSpec::new()
            .with_required_all([lookup("idc"), lookup("type")])
            .with_optional_all([lookup("tooltip")]);
        assert!(spec.declares(&lookup("tooltip")));
        assert!(spec.requires(&lookup("idc")));
        assert!(!spec.requires(&lookup("tooltip")));
        assert!(!spec.declares(&lookup("missing")));
    }

    #[test]
    fn sub_class_templates() {
        let spec = RequirementSpec::new()
            .with_required_sub_class(ClassSpecification::new("ScrollBar"))
            .with_optional_sub_class(ClassSpecification::new("Hints"));
        assert_eq!(spec.required_sub_classes[0].name, "ScrollBar");
        assert_eq!(spec.optional_sub_classes[0].name, "Hints");
    }

    #[test]
    fn find_duplicate_looks_inside_templates() {
        let mut spec = RequirementSpec::new().with_required(lookup("text"));
        assert_eq!(spec.find_duplicate(), None);

        spec.optional_properties.push(lookup("text"));
        assert_eq!(spec.find_duplicate(), Some(&lookup("text")));

        let spec = RequirementSpec::new().with_optional_sub_class(
            ClassSpecification::new("Inner")
                .with_required(lookup("width"), None)
                .with_optional(lookup("width"), None),
        );
        assert_eq!(spec.find_duplicate(), Some(&lookup("width")));
    }
}
