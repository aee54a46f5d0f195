//! Property identities.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::value::PropertyType;

/// The identity of a property inside a class catalog.
///
/// Two lookups are the same property iff their names match; the type tag
/// and event flag are descriptive only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyLookup {
    name: String,
    #[serde(rename = "type")]
    value_type: PropertyType,
    /// Whether this property holds an event handler (e.g. `onButtonClick`).
    #[serde(default)]
    event: bool,
}

impl PropertyLookup {
    pub fn new(name: impl Into<String>, value_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            value_type,
            event: false,
        }
    }

    /// An event-handler property (always string typed).
    pub fn event(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_type: PropertyType::String,
            event: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> PropertyType {
        self.value_type
    }

    pub fn is_event(&self) -> bool {
        self.event
    }
}

impl PartialEq for PropertyLookup {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for PropertyLookup {}

impl Hash for PropertyLookup {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for PropertyLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
