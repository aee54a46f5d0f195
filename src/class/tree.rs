//! The class tree: construction, removal, ownership and extends links.

use std::collections::VecDeque;
use std::sync::Arc;

use slotmap::{SecondaryMap, SlotMap};

use super::node::{ClassId, ControlClass, SubClassSlot};
use crate::config::TreeConfig;
use crate::error::{ClassError, Result};
use crate::property::{ControlProperty, PropertyLookup, Value};
use crate::spec::{ClassSpecification, RequirementSpec, SpecRegistry};

/// Every control class of a project, backed by a slotmap arena.
///
/// Top-level classes form the project-wide name index used to resolve
/// extend names. Sub-classes are owned by their parent: removing a class
/// removes its sub-classes too. Extends links are plain [`ClassId`]s and
/// never keep a class alive.
pub struct ClassTree {
    classes: SlotMap<ClassId, ControlClass>,
    owner: SecondaryMap<ClassId, ClassId>,
    top_level: Vec<ClassId>,
    registry: Arc<SpecRegistry>,
    config: TreeConfig,
}

impl ClassTree {
    /// Create an empty tree with the default configuration.
    pub fn new(registry: Arc<SpecRegistry>) -> Self {
        Self::with_config(registry, TreeConfig::default())
    }

    pub fn with_config(registry: Arc<SpecRegistry>, config: TreeConfig) -> Self {
        Self {
            classes: SlotMap::with_key(),
            owner: SecondaryMap::new(),
            top_level: Vec::new(),
            registry,
            config,
        }
    }

    pub fn registry(&self) -> &SpecRegistry {
        &self.registry
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    // -- construction ---------------------------------------------------

    /// Create a top-level class of the registered `kind`, all properties
    /// unset.
    pub fn create_class(&mut self, name: impl Into<String>, kind: &str) -> Result<ClassId> {
        let spec = self
            .registry
            .get(kind)
            .ok_or_else(|| ClassError::UnknownKind(kind.to_owned()))?;
        self.create_class_with(name, spec)
    }

    /// Create a top-level class from an explicit requirement specification.
    /// Sub-classes are built from the specification's templates.
    ///
    /// Fails with [`ClassError::DuplicateProperty`] if a lookup is declared
    /// twice, here or in a template. Templates are checked like
    /// [`load_class`](Self::load_class) input.
    pub fn create_class_with(
        &mut self,
        name: impl Into<String>,
        spec: Arc<RequirementSpec>,
    ) -> Result<ClassId> {
        if let Some(lookup) = spec.find_duplicate() {
            return Err(ClassError::DuplicateProperty(lookup.name().to_owned()));
        }
        for template in spec.required_sub_classes.iter().chain(&spec.optional_sub_classes) {
            self.check_loadable(template)?;
        }
        let name = name.into();
        tracing::debug!(class = %name, "creating control class");
        let id = self.build_fresh(name, spec);
        self.top_level.push(id);
        Ok(id)
    }

    /// Rebuild a top-level class (and its sub-classes) from its persisted
    /// form. The extend name must match a top-level class already in the
    /// tree.
    ///
    /// Every class in `spec` is checked before anything is built; on error
    /// the tree is unchanged. Fails with:
    /// - [`ClassError::DuplicateProperty`] if a class lists a lookup twice;
    /// - [`ClassError::UnknownExtendName`] if an extend name doesn't resolve;
    /// - [`ClassError::NotExtending`] if a class saves overrides but extends
    ///   nothing;
    /// - [`ClassError::NotInherited`] if a saved override isn't declared
    ///   along the extends chain.
    pub fn load_class(&mut self, spec: &ClassSpecification) -> Result<ClassId> {
        if let Some(lookup) = spec.find_duplicate() {
            return Err(ClassError::DuplicateProperty(lookup.name().to_owned()));
        }
        self.check_loadable(spec)?;
        tracing::debug!(class = %spec.name, "loading control class");
        let id = self.build_loaded(spec);
        self.top_level.push(id);
        Ok(id)
    }

    fn check_loadable(&self, spec: &ClassSpecification) -> Result<()> {
        let extend = match &spec.extend {
            Some(name) => Some(
                self.find_class_by_name(name)
                    .ok_or_else(|| ClassError::UnknownExtendName(name.clone()))?,
            ),
            None => None,
        };
        if !spec.overridden_properties.is_empty() {
            let extend = extend.ok_or(ClassError::NotExtending)?;
            for saved in &spec.overridden_properties {
                if !self.chain_declares(extend, &saved.lookup) {
                    return Err(ClassError::NotInherited(saved.lookup.name().to_owned()));
                }
            }
        }
        spec.required_sub_classes
            .iter()
            .chain(&spec.optional_sub_classes)
            .try_for_each(|sub| self.check_loadable(sub))
    }

    fn build_fresh(&mut self, name: String, spec: Arc<RequirementSpec>) -> ClassId {
        let required = spec
            .required_properties
            .iter()
            .cloned()
            .map(ControlProperty::new)
            .collect();
        let optional = spec
            .optional_properties
            .iter()
            .cloned()
            .map(ControlProperty::new)
            .collect();
        let id = self.classes.insert_with_key(|id| {
            ControlClass::new(id, name, Arc::clone(&spec), required, optional)
        });
        for template in &spec.required_sub_classes {
            self.build_sub_class(id, template, SubClassSlot::Required);
        }
        for template in &spec.optional_sub_classes {
            self.build_sub_class(id, template, SubClassSlot::Optional);
        }
        id
    }

    fn build_loaded(&mut self, spec: &ClassSpecification) -> ClassId {
        let requirements = Arc::new(spec.requirements());
        let required = spec.required_properties.iter().map(|p| p.construct()).collect();
        let optional = spec.optional_properties.iter().map(|p| p.construct()).collect();
        let extend = spec
            .extend
            .as_deref()
            .and_then(|name| self.find_class_by_name(name));
        let id = self.classes.insert_with_key(|id| {
            ControlClass::new(id, spec.name.clone(), requirements, required, optional)
        });
        let class = &mut self.classes[id];
        class.init_extend(extend);
        for saved in &spec.overridden_properties {
            class.init_override(saved.construct());
        }
        for sub in &spec.required_sub_classes {
            self.build_sub_class(id, sub, SubClassSlot::Required);
        }
        for sub in &spec.optional_sub_classes {
            self.build_sub_class(id, sub, SubClassSlot::Optional);
        }
        id
    }

    fn build_sub_class(&mut self, parent: ClassId, spec: &ClassSpecification, slot: SubClassSlot) {
        let sub = self.build_loaded(spec);
        self.owner.insert(sub, parent);
        self.classes[parent].sub_classes_mut(slot).push(sub);
    }

    // -- removal and ownership -------------------------------------------

    /// Remove a class and all its sub-classes.
    ///
    /// Classes that extend a removed class are left alone; their extends
    /// link simply stops resolving. Returns the removed class, or `None` if
    /// it didn't exist.
    pub fn remove_class(&mut self, id: ClassId) -> Option<ControlClass> {
        if !self.classes.contains_key(id) {
            return None;
        }
        self.detach(id);

        let mut to_remove = VecDeque::new();
        to_remove.push_back(id);
        let mut removed_root = None;
        while let Some(current) = to_remove.pop_front() {
            self.owner.remove(current);
            if let Some(class) = self.classes.remove(current) {
                to_remove.extend(class.all_sub_classes());
                if current == id {
                    removed_root = Some(class);
                }
            }
        }
        tracing::debug!(removed = ?id, "removed control class");
        removed_root
    }

    /// Move `child` (with its sub-classes) under `parent`.
    pub fn attach_sub_class(
        &mut self,
        parent: ClassId,
        child: ClassId,
        slot: SubClassSlot,
    ) -> Result<()> {
        self.require(parent)?;
        self.require(child)?;
        if parent == child {
            return Err(ClassError::SelfSubClass);
        }
        if self.owners(parent).contains(&child) {
            return Err(ClassError::SubClassCycle { parent, child });
        }
        self.detach(child);
        self.owner.insert(child, parent);
        self.classes[parent].sub_classes_mut(slot).push(child);
        Ok(())
    }

    /// Unlink `id` from its owner's sub-class lists, or from the top level.
    fn detach(&mut self, id: ClassId) {
        match self.owner.remove(id) {
            Some(owner) => {
                if let Some(class) = self.classes.get_mut(owner) {
                    class.required_sub_classes.retain(|&c| c != id);
                    class.optional_sub_classes.retain(|&c| c != id);
                }
            }
            None => self.top_level.retain(|&c| c != id),
        }
    }

    /// The class owning `id` as a sub-class, if any.
    pub fn owner(&self, id: ClassId) -> Option<ClassId> {
        self.owner.get(id).copied()
    }

    /// Owners of `id` from the nearest up to a top-level class.
    pub fn owners(&self, id: ClassId) -> Vec<ClassId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(o) = self.owner.get(current).copied() {
            result.push(o);
            current = o;
        }
        result
    }

    // -- extends --------------------------------------------------------

    /// Set or clear the class `id` extends.
    ///
    /// Only top-level classes can be extended, since extends links are saved
    /// by name and names resolve against the top level. Fails with
    /// [`ClassError::SelfExtend`] when `target == Some(id)` and
    /// [`ClassError::ExtendSubClass`] when `target` is a sub-class. With
    /// [`TreeConfig::reject_extend_cycles`] set, longer cycles are rejected
    /// as well. On failure the extends link is unchanged.
    pub fn extend(&mut self, id: ClassId, target: Option<ClassId>) -> Result<()> {
        self.require(id)?;
        if let Some(target) = target {
            if target == id {
                return Err(ClassError::SelfExtend);
            }
            self.require(target)?;
            if self.owner.contains_key(target) {
                return Err(ClassError::ExtendSubClass(target));
            }
            if self.config.reject_extend_cycles && self.ancestors(target).contains(&id) {
                return Err(ClassError::ExtendCycle { class: id, target });
            }
        }
        tracing::debug!(class = ?id, extend = ?target, "changed extended class");
        self.classes[id].replace_extend(target);
        Ok(())
    }

    /// The class `id` extends, if it still exists.
    pub fn extend_class(&self, id: ClassId) -> Option<ClassId> {
        self.classes
            .get(id)?
            .extend_class()
            .filter(|parent| self.classes.contains_key(*parent))
    }

    // -- access ---------------------------------------------------------

    pub fn get(&self, id: ClassId) -> Option<&ControlClass> {
        self.classes.get(id)
    }

    pub fn get_mut(&mut self, id: ClassId) -> Option<&mut ControlClass> {
        self.classes.get_mut(id)
    }

    pub(crate) fn require(&self, id: ClassId) -> Result<&ControlClass> {
        self.classes.get(id).ok_or(ClassError::UnknownClass(id))
    }

    fn require_mut(&mut self, id: ClassId) -> Result<&mut ControlClass> {
        self.classes.get_mut(id).ok_or(ClassError::UnknownClass(id))
    }

    /// Set an own (required or optional) property of class `id`.
    pub fn set_property(
        &mut self,
        id: ClassId,
        lookup: &PropertyLookup,
        value: Option<Value>,
    ) -> Result<()> {
        self.require_mut(id)?.find_mut(lookup)?.set(value);
        Ok(())
    }

    /// Rename class `id`. See [`ControlClass::set_name`].
    pub fn rename(&mut self, id: ClassId, name: impl Into<String>) -> Result<()> {
        self.require_mut(id)?.set_name(name);
        Ok(())
    }

    /// Top-level class named `name`.
    ///
    /// Names are not unique: a class loaded next to a fresh class of the
    /// same name is how the two are compared with
    /// [`class_equals`](Self::class_equals). When several top-level classes
    /// share a name, the one created first wins.
    pub fn find_class_by_name(&self, name: &str) -> Option<ClassId> {
        self.top_level
            .iter()
            .copied()
            .find(|&id| self.classes.get(id).is_some_and(|c| c.name() == name))
    }

    /// Top-level classes in creation order.
    pub fn top_level(&self) -> &[ClassId] {
        &self.top_level
    }

    pub fn contains(&self, id: ClassId) -> bool {
        self.classes.contains_key(id)
    }

    /// Number of classes, sub-classes included.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::event::ClassUpdate;
    use crate::property::PropertyType;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn text() -> PropertyLookup {
        PropertyLookup::new("text", PropertyType::String)
    }

    fn idc() -> PropertyLookup {
        PropertyLookup::new("idc", PropertyType::Integer)
    }

    fn registry() -> Arc<SpecRegistry> {
        let mut registry = SpecRegistry::new();
        registry.register(
            "Static",
            RequirementSpec::new()
                .with_required_all([idc(), text()])
                .with_optional(PropertyLookup::new("tooltip", PropertyType::String)),
        );
        registry.register(
            "ListBox",
            RequirementSpec::new()
                .with_required(idc())
                .with_required_sub_class(
                    ClassSpecification::new("ListScrollBar")
                        .with_required(PropertyLookup::new("width", PropertyType::Float), None),
                )
                .with_optional_sub_class(ClassSpecification::new("Hints")),
        );
        Arc::new(registry)
    }

    fn record(tree: &ClassTree, id: ClassId) -> Rc<RefCell<Vec<ClassUpdate>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_c = log.clone();
        tree.get(id)
            .unwrap()
            .class_update_group()
            .add_listener(move |u: &ClassUpdate| log_c.borrow_mut().push(u.clone()));
        log
    }

    #[test]
    fn create_class_from_kind() {
        let mut tree = ClassTree::new(registry());
        let id = tree.create_class("MyStatic", "Static").unwrap();
        let class = tree.get(id).unwrap();
        assert_eq!(class.name(), "MyStatic");
        assert_eq!(class.required_properties().len(), 2);
        assert_eq!(class.optional_properties().len(), 1);
        assert!(class.defined_properties().is_empty());
        assert_eq!(tree.top_level(), &[id]);
        assert_eq!(tree.find_class_by_name("MyStatic"), Some(id));
    }

    #[test]
    fn create_class_unknown_kind() {
        let mut tree = ClassTree::new(registry());
        let err = tree.create_class("X", "Slider").unwrap_err();
        assert_eq!(err, ClassError::UnknownKind("Slider".into()));
        assert!(tree.is_empty());
    }

    #[test]
    fn kind_instances_share_requirements() {
        let mut tree = ClassTree::new(registry());
        let a = tree.create_class("A", "Static").unwrap();
        let b = tree.create_class("B", "Static").unwrap();
        assert!(Arc::ptr_eq(
            tree.get(a).unwrap().requirements(),
            tree.get(b).unwrap().requirements()
        ));
    }

    #[test]
    fn create_class_builds_sub_classes() {
        let mut tree = ClassTree::new(registry());
        let list = tree.create_class("MyList", "ListBox").unwrap();
        assert_eq!(tree.len(), 3);
        let class = tree.get(list).unwrap();
        let scroll = class.required_sub_classes()[0];
        let hints = class.optional_sub_classes()[0];
        assert_eq!(class.all_sub_classes(), vec![scroll, hints]);
        assert_eq!(tree.get(scroll).unwrap().name(), "ListScrollBar");
        assert_eq!(tree.owner(scroll), Some(list));
        assert_eq!(tree.owner(list), None);
        // Sub-classes are not part of the name index.
        assert_eq!(tree.find_class_by_name("ListScrollBar"), None);
    }

    #[test]
    fn load_class_copies_values_and_resolves_extend() {
        let mut tree = ClassTree::new(registry());
        let base = tree.create_class("Base", "Static").unwrap();
        let spec = ClassSpecification::new("Child")
            .with_extend("Base")
            .with_required(text(), Some(Value::text("saved")))
            .with_optional(idc(), None)
            .with_override(PropertyLookup::new("tooltip", PropertyType::String), None)
            .with_required_sub_class(ClassSpecification::new("Inner"));
        let child = tree.load_class(&spec).unwrap();
        let class = tree.get(child).unwrap();
        assert_eq!(tree.extend_class(child), Some(base));
        assert_eq!(
            class.find_required(&text()).unwrap().value(),
            Some(&Value::text("saved"))
        );
        assert!(class.find_optional(&idc()).is_ok());
        assert_eq!(class.overridden_properties().len(), 1);
        assert_eq!(class.required_sub_classes().len(), 1);
    }

    #[test]
    fn load_class_unknown_extend_leaves_tree_unchanged() {
        let mut tree = ClassTree::new(registry());
        let spec = ClassSpecification::new("Child")
            .with_required_sub_class(ClassSpecification::new("Inner").with_extend("Missing"));
        let err = tree.load_class(&spec).unwrap_err();
        assert_eq!(err, ClassError::UnknownExtendName("Missing".into()));
        assert!(tree.is_empty());
    }

    #[test]
    fn load_class_rejects_override_without_extend() {
        let mut tree = ClassTree::new(registry());
        let spec = ClassSpecification::new("Orphan").with_override(text(), Some(Value::text("x")));
        let err = tree.load_class(&spec).unwrap_err();
        assert_eq!(err, ClassError::NotExtending);
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert!(tree.is_empty());
    }

    #[test]
    fn load_class_rejects_override_not_declared_along_chain() {
        let mut tree = ClassTree::new(registry());
        let base = tree.create_class("Base", "Static").unwrap();
        let middle = tree.create_class("Middle", "ListBox").unwrap();
        tree.extend(middle, Some(base)).unwrap();

        // Declared by the grandparent only: accepted.
        let ok = ClassSpecification::new("Child")
            .with_extend("Middle")
            .with_override(text(), None);
        assert!(tree.load_class(&ok).is_ok());

        let bad = ClassSpecification::new("Child")
            .with_extend("Middle")
            .with_override(PropertyLookup::new("colorText", PropertyType::Color), None);
        assert_eq!(
            tree.load_class(&bad),
            Err(ClassError::NotInherited("colorText".into()))
        );

        let nested = ClassSpecification::new("Outer").with_optional_sub_class(
            ClassSpecification::new("Inner").with_override(text(), None),
        );
        assert_eq!(tree.load_class(&nested), Err(ClassError::NotExtending));
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn load_class_rejects_duplicate_lookups() {
        let mut tree = ClassTree::new(registry());
        let twice = ClassSpecification::new("Twice")
            .with_required(text(), Some(Value::text("a")))
            .with_required(text(), None);
        assert_eq!(
            tree.load_class(&twice),
            Err(ClassError::DuplicateProperty("text".into()))
        );

        let nested = ClassSpecification::new("Outer").with_required_sub_class(
            ClassSpecification::new("Inner")
                .with_required(idc(), None)
                .with_optional(idc(), None),
        );
        let err = tree.load_class(&nested).unwrap_err();
        assert_eq!(err, ClassError::DuplicateProperty("idc".into()));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(tree.is_empty());
    }

    #[test]
    fn create_class_with_rejects_duplicate_lookups() {
        let mut tree = ClassTree::new(registry());
        let mut spec = RequirementSpec::new().with_required(text());
        spec.optional_properties.push(text());
        assert_eq!(
            tree.create_class_with("Bad", Arc::new(spec)),
            Err(ClassError::DuplicateProperty("text".into()))
        );

        let spec = RequirementSpec::new().with_required_sub_class(
            ClassSpecification::new("Inner")
                .with_required(idc(), None)
                .with_required(idc(), None),
        );
        assert_eq!(
            tree.create_class_with("Bad", Arc::new(spec)),
            Err(ClassError::DuplicateProperty("idc".into()))
        );
        assert!(tree.is_empty());
    }

    #[test]
    fn capture_then_load_round_trips() {
        let mut tree = ClassTree::new(registry());
        tree.create_class("Base", "Static").unwrap();
        let list = tree.create_class("MyList", "ListBox").unwrap();
        let base = tree.find_class_by_name("Base").unwrap();
        tree.set_property(base, &text(), Some(Value::text("hi"))).unwrap();
        tree.extend(list, Some(base)).unwrap();
        tree.set_property(list, &idc(), Some(Value::Integer(4))).unwrap();
        tree.override_property(list, &text()).unwrap();

        let saved = ClassSpecification::capture(&tree, list).unwrap();
        let mut other = ClassTree::new(registry());
        other.create_class("Base", "Static").unwrap();
        let loaded = other.load_class(&saved).unwrap();
        assert_eq!(ClassSpecification::capture(&other, loaded).unwrap(), saved);
        assert_eq!(saved.extend.as_deref(), Some("Base"));
        assert_eq!(saved.overridden_properties[0].value, Some(Value::text("hi")));
    }

    #[test]
    fn extend_rejects_sub_class_target() {
        let mut tree = ClassTree::new(registry());
        let list = tree.create_class("MyList", "ListBox").unwrap();
        let scroll = tree.get(list).unwrap().required_sub_classes()[0];
        let child = tree.create_class("Child", "Static").unwrap();
        let err = tree.extend(child, Some(scroll)).unwrap_err();
        assert_eq!(err, ClassError::ExtendSubClass(scroll));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(tree.extend_class(child), None);
    }

    #[test]
    fn capture_rejects_extend_of_attached_class() {
        let mut tree = ClassTree::new(registry());
        let list = tree.create_class("MyList", "ListBox").unwrap();
        let inner = tree.create_class("Inner", "Static").unwrap();
        let child = tree.create_class("Child", "Static").unwrap();
        tree.extend(child, Some(inner)).unwrap();
        tree.attach_sub_class(list, inner, SubClassSlot::Optional).unwrap();

        assert_eq!(
            ClassSpecification::capture(&tree, child),
            Err(ClassError::ExtendSubClass(inner))
        );
        // The owner still captures and reloads with the attached class.
        let saved = ClassSpecification::capture(&tree, list).unwrap();
        let mut other = ClassTree::new(registry());
        let loaded = other.load_class(&saved).unwrap();
        assert_eq!(other.get(loaded).unwrap().optional_sub_classes().len(), 2);
    }

    #[test]
    fn duplicate_top_level_names_resolve_to_first() {
        let mut tree = ClassTree::new(registry());
        let first = tree.create_class("Base", "Static").unwrap();
        let second = tree.create_class("Base", "Static").unwrap();
        assert_ne!(first, second);
        assert_eq!(tree.find_class_by_name("Base"), Some(first));

        let child = tree
            .load_class(&ClassSpecification::new("Child").with_extend("Base"))
            .unwrap();
        assert_eq!(tree.extend_class(child), Some(first));

        tree.remove_class(first);
        assert_eq!(tree.find_class_by_name("Base"), Some(second));
    }

    #[test]
    fn remove_class_removes_sub_classes() {
        let mut tree = ClassTree::new(registry());
        let list = tree.create_class("MyList", "ListBox").unwrap();
        let scroll = tree.get(list).unwrap().required_sub_classes()[0];
        let removed = tree.remove_class(list).unwrap();
        assert_eq!(removed.name(), "MyList");
        assert!(!tree.contains(scroll));
        assert!(tree.is_empty());
        assert!(tree.top_level().is_empty());
        assert!(tree.remove_class(list).is_none());
    }

    #[test]
    fn remove_sub_class_detaches_from_owner() {
        let mut tree = ClassTree::new(registry());
        let list = tree.create_class("MyList", "ListBox").unwrap();
        let hints = tree.get(list).unwrap().optional_sub_classes()[0];
        tree.remove_class(hints);
        assert!(tree.get(list).unwrap().optional_sub_classes().is_empty());
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn removing_extended_class_keeps_extender() {
        let mut tree = ClassTree::new(registry());
        let base = tree.create_class("Base", "Static").unwrap();
        let child = tree.create_class("Child", "Static").unwrap();
        tree.extend(child, Some(base)).unwrap();
        tree.remove_class(base);
        assert!(tree.contains(child));
        assert_eq!(tree.get(child).unwrap().extend_class(), Some(base));
        assert_eq!(tree.extend_class(child), None);
    }

    #[test]
    fn attach_sub_class_moves_top_level_class() {
        let mut tree = ClassTree::new(registry());
        let list = tree.create_class("MyList", "ListBox").unwrap();
        let extra = tree.create_class("Extra", "Static").unwrap();
        tree.attach_sub_class(list, extra, SubClassSlot::Optional).unwrap();
        assert_eq!(tree.owner(extra), Some(list));
        assert_eq!(tree.top_level(), &[list]);
        assert_eq!(tree.get(list).unwrap().optional_sub_classes().len(), 2);
    }

    #[test]
    fn attach_rejects_self_and_cycles() {
        let mut tree = ClassTree::new(registry());
        let list = tree.create_class("MyList", "ListBox").unwrap();
        let scroll = tree.get(list).unwrap().required_sub_classes()[0];
        assert_eq!(
            tree.attach_sub_class(list, list, SubClassSlot::Required),
            Err(ClassError::SelfSubClass)
        );
        assert_eq!(
            tree.attach_sub_class(scroll, list, SubClassSlot::Required),
            Err(ClassError::SubClassCycle {
                parent: scroll,
                child: list
            })
        );
        assert_eq!(tree.owners(scroll), vec![list]);
    }

    #[test]
    fn extend_publishes_and_self_extend_fails() {
        let mut tree = ClassTree::new(registry());
        let base = tree.create_class("Base", "Static").unwrap();
        let child = tree.create_class("Child", "Static").unwrap();
        let log = record(&tree, child);

        tree.extend(child, Some(base)).unwrap();
        let err = tree.extend(child, Some(child)).unwrap_err();
        assert_eq!(err, ClassError::SelfExtend);
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(tree.extend_class(child), Some(base));
        tree.extend(child, None).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                ClassUpdate::Extend {
                    class: child,
                    old: None,
                    new: Some(base)
                },
                ClassUpdate::Extend {
                    class: child,
                    old: Some(base),
                    new: None
                },
            ]
        );
    }

    #[test]
    fn longer_cycles_allowed_by_default() {
        let mut tree = ClassTree::new(registry());
        let a = tree.create_class("A", "Static").unwrap();
        let b = tree.create_class("B", "Static").unwrap();
        tree.extend(a, Some(b)).unwrap();
        assert!(tree.extend(b, Some(a)).is_ok());
    }

    #[test]
    fn longer_cycles_rejected_when_configured() {
        let config = TreeConfig::new().with_reject_extend_cycles(true);
        let mut tree = ClassTree::with_config(registry(), config);
        let a = tree.create_class("A", "Static").unwrap();
        let b = tree.create_class("B", "Static").unwrap();
        let c = tree.create_class("C", "Static").unwrap();
        tree.extend(a, Some(b)).unwrap();
        tree.extend(b, Some(c)).unwrap();
        assert_eq!(
            tree.extend(c, Some(a)),
            Err(ClassError::ExtendCycle { class: c, target: a })
        );
        assert_eq!(tree.extend_class(c), None);
    }

    #[test]
    fn extend_unknown_target() {
        let mut tree = ClassTree::new(registry());
        let a = tree.create_class("A", "Static").unwrap();
        let gone = tree.create_class("Gone", "Static").unwrap();
        tree.remove_class(gone);
        assert_eq!(tree.extend(a, Some(gone)), Err(ClassError::UnknownClass(gone)));
    }

    #[test]
    fn rename_and_set_property_through_tree() {
        let mut tree = ClassTree::new(registry());
        let id = tree.create_class("A", "Static").unwrap();
        let log = record(&tree, id);
        tree.rename(id, "B").unwrap();
        tree.set_property(id, &idc(), Some(Value::Integer(3))).unwrap();
        let err = tree
            .set_property(id, &PropertyLookup::new("nope", PropertyType::Float), None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        let kinds: Vec<_> = log.borrow().iter().map(ClassUpdate::update_name).collect();
        assert_eq!(kinds, ["Rename", "Property"]);
        assert_eq!(tree.find_class_by_name("B"), Some(id));
    }
}
