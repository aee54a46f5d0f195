//! Process-wide catalog of requirement specifications, keyed by kind name.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;

use super::requirement::RequirementSpec;

/// Errors from loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("kind `{kind}` lists `{property}` more than once")]
    DuplicateProperty { kind: String, property: String },
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    kinds: HashMap<String, RequirementSpec>,
}

/// Read-only lookup of [`RequirementSpec`]s by kind.
///
/// Specifications are handed out as `Arc`s; every class of a kind shares
/// the same instance.
#[derive(Debug, Clone, Default)]
pub struct SpecRegistry {
    kinds: HashMap<String, Arc<RequirementSpec>>,
}

impl SpecRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML catalog of the form:
    ///
    /// ```toml
    /// [kinds.Button]
    /// required_properties = [{ name = "text", type = "string" }]
    /// optional_properties = [{ name = "action", type = "string", event = true }]
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(text)?;
        let mut registry = Self::new();
        for (kind, spec) in file.kinds {
            check_unique(&kind, &spec)?;
            registry.register(kind, spec);
        }
        tracing::debug!(kinds = registry.len(), "loaded requirement catalog");
        Ok(registry)
    }

    /// Register (or replace) the specification for `kind`.
    pub fn register(&mut self, kind: impl Into<String>, spec: RequirementSpec) -> Arc<RequirementSpec> {
        let spec = Arc::new(spec);
        self.kinds.insert(kind.into(), Arc::clone(&spec));
        spec
    }

    pub fn get(&self, kind: &str) -> Option<Arc<RequirementSpec>> {
        self.kinds.get(kind).cloned()
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.kinds.contains_key(kind)
    }

    /// Registered kind names, sorted.
    pub fn kinds(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.kinds.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

fn check_unique(kind: &str, spec: &RequirementSpec) -> Result<(), CatalogError> {
    match spec.find_duplicate() {
        Some(lookup) => Err(CatalogError::DuplicateProperty {
            kind: kind.to_owned(),
            property: lookup.name().to_owned(),
        }),
        None => Ok(()),
    }
}
