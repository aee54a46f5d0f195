//! Snapshot helpers.
//!
//! Render a class's resolved property views as plain text, suitable for
//! snapshot testing and assertions.

use crate::class::{ClassId, ClassTree};
use crate::property::ControlProperty;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Describe class `id` as stable plain text.
///
/// The first line names the class and the class it extends. Following lines
/// list, in order, the defined, overridden, inherited and missing required
/// properties, then the sub-classes. Empty sections print `-`. Returns an
/// empty string if `id` does not exist.
///
/// # Examples
///
/// ```ignore
/// use control_classes::testing::describe_class;
///
/// let text = describe_class(&tree, child);
/// assert!(text.starts_with("class Child extends Base"));
/// ```
pub fn describe_class(tree: &ClassTree, id: ClassId) -> String {
    let Some(class) = tree.get(id) else {
        return String::new();
    };

    let mut header = format!("class {}", class.name());
    if let Some(parent) = tree.extend_class(id).and_then(|p| tree.get(p)) {
        header.push_str(" extends ");
        header.push_str(parent.name());
    }

    let missing: Vec<String> = class
        .missing_required_properties()
        .iter()
        .map(|p| p.name().to_owned())
        .collect();
    let sub_classes: Vec<String> = class
        .required_sub_classes()
        .iter()
        .map(|&sub| sub_class_label(tree, sub, "required"))
        .chain(
            class
                .optional_sub_classes()
                .iter()
                .map(|&sub| sub_class_label(tree, sub, "optional")),
        )
        .collect();

    [
        header,
        section("defined", &assignments(&class.defined_properties())),
        section("overridden", &assignments(&overrides(class.overridden_properties()))),
        section("inherited", &assignments(&tree.inherited_properties(id))),
        section("missing", &missing),
        section("sub-classes", &sub_classes),
    ]
    .join("\n")
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn overrides(properties: &[ControlProperty]) -> Vec<&ControlProperty> {
    properties.iter().collect()
}

fn assignments(properties: &[&ControlProperty]) -> Vec<String> {
    properties
        .iter()
        .map(|p| match p.value() {
            Some(value) => format!("{} = {value}", p.name()),
            None => format!("{} = <unset>", p.name()),
        })
        .collect()
}

fn sub_class_label(tree: &ClassTree, id: ClassId, slot: &str) -> String {
    let name = tree.get(id).map_or("<removed>", |c| c.name());
    format!("{name} ({slot})")
}

fn section(title: &str, items: &[String]) -> String {
    if items.is_empty() {
        format!("  {title}: -")
    } else {
        format!("  {title}: {}", items.join(", "))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
