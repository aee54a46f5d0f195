//! Property resolution across extends chains.
//!
//! Views are computed on demand from the current tree; nothing is cached.
//! The walk along an extends chain is nearest-first and carries a visited
//! set, so a cyclic chain ends at the first repeated class instead of
//! looping.

use std::collections::HashSet;

use super::node::ClassId;
use super::tree::ClassTree;
use crate::error::{ClassError, Result};
use crate::property::{ControlProperty, PropertyLookup};

impl ClassTree {
    /// The extends chain of `id`, nearest first, excluding `id` itself.
    ///
    /// Stops at a class that extends nothing, at a removed class, or at the
    /// first class already visited.
    pub fn ancestors(&self, id: ClassId) -> Vec<ClassId> {
        let mut chain = Vec::new();
        let mut visited = HashSet::from([id]);
        let mut current = id;
        while let Some(parent) = self.extend_class(current) {
            if !visited.insert(parent) {
                tracing::warn!(class = ?id, repeated = ?parent, "extends chain is cyclic");
                break;
            }
            chain.push(parent);
            current = parent;
        }
        if chain.len() > self.config().chain_depth_warning {
            tracing::warn!(
                class = ?id,
                depth = chain.len(),
                limit = self.config().chain_depth_warning,
                "extends chain is unusually deep"
            );
        }
        chain
    }

    /// Defined properties of every extended class, de-duplicated by lookup.
    ///
    /// The nearest class defining a lookup wins; farther classes never
    /// shadow it. Only the ancestors' own defined properties count, not
    /// their overrides. Empty if `id` does not exist or extends nothing.
    pub fn inherited_properties(&self, id: ClassId) -> Vec<&ControlProperty> {
        let mut inherited: Vec<&ControlProperty> = Vec::new();
        for ancestor in self.ancestors(id) {
            let Some(class) = self.get(ancestor) else {
                continue;
            };
            for property in class.defined_properties() {
                if !inherited.iter().any(|p| p.lookup() == property.lookup()) {
                    inherited.push(property);
                }
            }
        }
        inherited
    }

    /// [`inherited_properties`](Self::inherited_properties) that hold a
    /// value.
    pub fn defined_inherited_properties(&self, id: ClassId) -> Vec<&ControlProperty> {
        self.inherited_properties(id)
            .into_iter()
            .filter(|p| p.is_set())
            .collect()
    }

    /// The inherited property for `lookup`, if any extended class defines it.
    pub fn find_inherited(&self, id: ClassId, lookup: &PropertyLookup) -> Option<&ControlProperty> {
        self.inherited_properties(id)
            .into_iter()
            .find(|p| p.lookup() == lookup)
    }

    /// Whether `start`, or a class it extends, declares `lookup` (set or
    /// not).
    pub(crate) fn chain_declares(&self, start: ClassId, lookup: &PropertyLookup) -> bool {
        std::iter::once(start)
            .chain(self.ancestors(start))
            .filter_map(|id| self.get(id))
            .any(|class| class.find(lookup).is_ok())
    }

    /// Override an inherited property of class `id`.
    ///
    /// The new override is seeded with a deep copy of the value resolved
    /// through the extends chain. A lookup that is declared by some
    /// extended class but set nowhere yields an unset override. Any earlier
    /// override of the same lookup is replaced. Publishes
    /// [`ClassUpdate::OverrideAdded`](crate::event::ClassUpdate::OverrideAdded).
    ///
    /// Fails with [`ClassError::NotExtending`] if `id` extends nothing, and
    /// [`ClassError::NotInherited`] if no extended class declares `lookup`.
    pub fn override_property(&mut self, id: ClassId, lookup: &PropertyLookup) -> Result<()> {
        self.require(id)?;
        if self.extend_class(id).is_none() {
            return Err(ClassError::NotExtending);
        }
        let seed = match self.find_inherited(id, lookup) {
            Some(resolved) => resolved.deep_copy(),
            None => self
                .ancestors(id)
                .into_iter()
                .filter_map(|a| self.get(a))
                .find_map(|class| class.find(lookup).ok())
                .map(|declared| ControlProperty::new(declared.lookup().clone()))
                .ok_or_else(|| ClassError::NotInherited(lookup.name().to_owned()))?,
        };
        if let Some(class) = self.get_mut(id) {
            class.push_override(seed);
        }
        Ok(())
    }

    /// Remove the override of `lookup` from class `id`. See
    /// [`ControlClass::remove_override`](super::ControlClass::remove_override).
    pub fn remove_override(
        &mut self,
        id: ClassId,
        lookup: &PropertyLookup,
    ) -> Result<Option<ControlProperty>> {
        let class = self.get_mut(id).ok_or(ClassError::UnknownClass(id))?;
        Ok(class.remove_override(lookup))
    }

    /// Structural compatibility check of `a` against `b`.
    ///
    /// True iff the names match, every required lookup of `a` is required by
    /// `b`, and every required sub-class of `a` has a compatible counterpart
    /// among `b`'s required sub-classes. Asymmetric: `b` may require more.
    pub fn class_equals(&self, a: ClassId, b: ClassId) -> bool {
        let (Some(x), Some(y)) = (self.get(a), self.get(b)) else {
            return false;
        };
        if x.name() != y.name() {
            return false;
        }
        let requires_all = x.required_properties().iter().all(|req| {
            y.required_properties()
                .iter()
                .any(|other| other.lookup() == req.lookup())
        });
        if !requires_all {
            return false;
        }
        x.required_sub_classes().iter().all(|&sub| {
            y.required_sub_classes()
                .iter()
                .any(|&other| self.class_equals(sub, other))
        })
    }
}
