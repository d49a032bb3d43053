//! The snapshot tree node.

use super::{FeatureBag, PropertyValue};
use crate::error::{Result, WidgetDiffError};
use crate::live::LiveWidget;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point-in-time capture of one live widget and its subtree.
///
/// A `SnapshotNode` is fully decoupled from the live tree: its feature bag,
/// attribute maps, and child list are independent copies that a diff/patch
/// engine may mutate freely without touching the original hierarchy. The one
/// live artifact it holds is `underlying`, the exclusively owned duplicate
/// produced at build time, used only by [`to_component`](Self::to_component)
/// and never read during matching.
///
/// Nodes are created by the snapshot builder; there is no public constructor.
#[derive(Serialize, Deserialize)]
pub struct SnapshotNode {
    widget_type: String,
    feature: FeatureBag,
    attributes: IndexMap<String, PropertyValue>,
    extension_properties: IndexMap<String, PropertyValue>,
    children: Vec<SnapshotNode>,
    #[serde(skip)]
    underlying: Option<Box<dyn LiveWidget>>,
    /// Reserved for an external patch engine: this node's own attributes and
    /// structure have been patched. Never set by this crate.
    pub outer_applied: bool,
    /// Reserved for an external patch engine: this node's children have been
    /// reconciled. Never set by this crate.
    pub inner_applied: bool,
}

impl SnapshotNode {
    pub(crate) fn new(
        widget_type: String,
        feature: FeatureBag,
        attributes: IndexMap<String, PropertyValue>,
        extension_properties: IndexMap<String, PropertyValue>,
        underlying: Option<Box<dyn LiveWidget>>,
    ) -> Self {
        Self {
            widget_type,
            feature,
            attributes,
            extension_properties,
            children: Vec::new(),
            underlying,
            outer_applied: false,
            inner_applied: false,
        }
    }

    // ------------------------------------------------------------------
    // Derived accessors
    // ------------------------------------------------------------------

    /// The captured widget type name. Set once at capture time.
    #[must_use]
    pub fn widget_type(&self) -> &str {
        &self.widget_type
    }

    /// The captured `"id"` property, if present and a string.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.feature.get_property("id").and_then(PropertyValue::as_str)
    }

    /// The user-visible text of this widget, if any.
    ///
    /// Which property carries the text depends on the widget kind: a
    /// `"label"` widget's text is its `"value"` property; any other widget
    /// prefers its `"label"` property and falls back to `"_value"` (the
    /// convention for input-like widgets). The priority order is part of the
    /// contract.
    #[must_use]
    pub fn text_value(&self) -> Option<&PropertyValue> {
        if self.widget_type == "label" {
            return self.feature.get_property("value");
        }
        if let Some(label) = self.feature.get_property("label") {
            return Some(label);
        }
        self.feature.get_property("_value")
    }

    /// Coarse match-candidate descriptors, most generic first: the widget
    /// type; `type.class` when an `"sclass"` property exists (spaces in the
    /// class list become dots, forming a single compound token); `type#id`
    /// when an id exists.
    #[must_use]
    pub fn descriptors(&self) -> Vec<String> {
        let mut output = Vec::with_capacity(3);
        output.push(self.widget_type.clone());
        if let Some(sclass) = self
            .feature
            .get_property("sclass")
            .and_then(PropertyValue::as_str)
        {
            output.push(format!("{}.{}", self.widget_type, sclass.replace(' ', ".")));
        }
        if let Some(id) = self.id() {
            output.push(format!("{}#{}", self.widget_type, id));
        }
        output
    }

    /// Total number of nodes in this subtree, including this one.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    // ------------------------------------------------------------------
    // Feature bag
    // ------------------------------------------------------------------

    /// The captured rendered output.
    #[must_use]
    pub fn feature(&self) -> &FeatureBag {
        &self.feature
    }

    /// Mutable view of the captured rendered output.
    ///
    /// A live handle, not a copy: edits are immediately visible to
    /// [`matches`](Self::matches). Patch engines edit snapshots in place
    /// through this and the other `_mut` accessors.
    pub fn feature_mut(&mut self) -> &mut FeatureBag {
        &mut self.feature
    }

    /// Look up one rendered property.
    #[must_use]
    pub fn get_property(&self, name: &str) -> Option<&PropertyValue> {
        self.feature.get_property(name)
    }

    /// Set or update a rendered property.
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.feature.set_property(name, value);
    }

    /// Remove a rendered property, returning the previous value if any.
    pub fn remove_property(&mut self, name: &str) -> Option<PropertyValue> {
        self.feature.remove_property(name)
    }

    /// The widget-override group, if it was ever written.
    #[must_use]
    pub fn widget_overrides(&self) -> Option<&IndexMap<String, String>> {
        self.feature.widget_overrides()
    }

    /// Set or update a widget override.
    pub fn set_widget_override(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.feature.set_widget_override(name, value);
    }

    /// Remove a widget override, returning the previous value if any.
    pub fn remove_widget_override(&mut self, name: &str) -> Option<String> {
        self.feature.remove_widget_override(name)
    }

    /// The client-attribute group, if it was ever written.
    #[must_use]
    pub fn client_attributes(&self) -> Option<&IndexMap<String, String>> {
        self.feature.client_attributes()
    }

    /// Set or update a client attribute.
    pub fn set_client_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.feature.set_client_attribute(name, value);
    }

    /// Remove a client attribute, returning the previous value if any.
    pub fn remove_client_attribute(&mut self, name: &str) -> Option<String> {
        self.feature.remove_client_attribute(name)
    }

    /// The widget-attribute group, if it was ever written.
    #[must_use]
    pub fn widget_attributes(&self) -> Option<&IndexMap<String, String>> {
        self.feature.widget_attributes()
    }

    /// Set or update a widget attribute.
    pub fn set_widget_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.feature.set_widget_attribute(name, value);
    }

    /// Remove a widget attribute, returning the previous value if any.
    pub fn remove_widget_attribute(&mut self, name: &str) -> Option<String> {
        self.feature.remove_widget_attribute(name)
    }

    /// The widget-listener group, if it was ever written.
    #[must_use]
    pub fn widget_listeners(&self) -> Option<&IndexMap<String, String>> {
        self.feature.widget_listeners()
    }

    /// Set or update a listener binding.
    pub fn set_widget_listener(&mut self, event: impl Into<String>, script: impl Into<String>) {
        self.feature.set_widget_listener(event, script);
    }

    /// Remove a listener binding, returning the previous value if any.
    pub fn remove_widget_listener(&mut self, event: &str) -> Option<String> {
        self.feature.remove_widget_listener(event)
    }

    // ------------------------------------------------------------------
    // Ad hoc attributes and extension properties
    // ------------------------------------------------------------------

    /// The ad hoc attributes copied from the live widget at capture time.
    #[must_use]
    pub fn attributes(&self) -> &IndexMap<String, PropertyValue> {
        &self.attributes
    }

    /// Mutable view of the ad hoc attributes. A live handle, not a copy.
    pub fn attributes_mut(&mut self) -> &mut IndexMap<String, PropertyValue> {
        &mut self.attributes
    }

    /// Set or update an ad hoc attribute.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Remove an ad hoc attribute, returning the previous value if any.
    pub fn remove_attribute(&mut self, name: &str) -> Option<PropertyValue> {
        self.attributes.shift_remove(name)
    }

    /// The extension properties copied from the live widget at capture time
    /// (empty when the widget lacked the capability).
    #[must_use]
    pub fn extension_properties(&self) -> &IndexMap<String, PropertyValue> {
        &self.extension_properties
    }

    /// Mutable view of the extension properties. A live handle, not a copy.
    pub fn extension_properties_mut(&mut self) -> &mut IndexMap<String, PropertyValue> {
        &mut self.extension_properties
    }

    /// Set or update an extension property.
    pub fn set_extension_property(
        &mut self,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) {
        self.extension_properties.insert(name.into(), value.into());
    }

    /// Remove an extension property, returning the previous value if any.
    pub fn remove_extension_property(&mut self, name: &str) -> Option<PropertyValue> {
        self.extension_properties.shift_remove(name)
    }

    // ------------------------------------------------------------------
    // Children
    // ------------------------------------------------------------------

    /// All children, in captured sibling order.
    #[must_use]
    pub fn children(&self) -> &[SnapshotNode] {
        &self.children
    }

    /// Mutable view of the child list. A live handle, not a copy.
    pub fn children_mut(&mut self) -> &mut Vec<SnapshotNode> {
        &mut self.children
    }

    /// Append a child after the current last child.
    pub fn append_child(&mut self, child: SnapshotNode) {
        self.children.push(child);
    }

    /// Insert a child at `index`, shifting later children right.
    /// Panics when `index > len`, like [`Vec::insert`].
    pub fn insert_child(&mut self, index: usize, child: SnapshotNode) {
        self.children.insert(index, child);
    }

    /// Remove and return the child at `index`, shifting later children left.
    /// Panics when `index` is out of range, like [`Vec::remove`].
    pub fn remove_child(&mut self, index: usize) -> SnapshotNode {
        self.children.remove(index)
    }

    /// Replace the child at `index`, returning the displaced child.
    /// Panics when `index` is out of range.
    pub fn replace_child(&mut self, index: usize, child: SnapshotNode) -> SnapshotNode {
        std::mem::replace(&mut self.children[index], child)
    }

    // ------------------------------------------------------------------
    // Matching, duplication, materialization
    // ------------------------------------------------------------------

    /// Structural equivalence with another snapshot node.
    ///
    /// True for the same instance; otherwise purely a function of the two
    /// feature bags (see [`FeatureBag::matches`]). Children, ad hoc
    /// attributes, extension properties, and even the widget type are
    /// excluded; a diff engine treats those separately.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || self.feature.matches(&other.feature)
    }

    /// Total deep copy of this subtree.
    ///
    /// Field by field: the widget type is copied; the feature bag, attribute
    /// map, and extension-property map are duplicated independently; children
    /// are deep-cloned recursively in order. The backing widget is
    /// deliberately *not* carried: a clone has no live duplicate of its own,
    /// so [`to_component`](Self::to_component) is unavailable on it until a
    /// caller re-captures. The two patch flags reset to `false`; a clone is a
    /// fresh, unpatched snapshot.
    #[must_use]
    pub fn deep_clone(&self) -> Self {
        Self {
            widget_type: self.widget_type.clone(),
            feature: self.feature.deep_clone(),
            attributes: self.attributes.clone(),
            extension_properties: self.extension_properties.clone(),
            children: self.children.iter().map(Self::deep_clone).collect(),
            underlying: None,
            outer_applied: false,
            inner_applied: false,
        }
    }

    /// Whether this node still owns a backing widget for materialization.
    #[must_use]
    pub fn has_backing_widget(&self) -> bool {
        self.underlying.is_some()
    }

    /// Materialize this subtree as a fresh, independent live widget.
    ///
    /// Duplicates the backing widget on demand (nothing is cached or
    /// consumed) and re-attaches materialized children depth-first in
    /// captured order, so child edits made on the snapshot are reflected in
    /// the result. Fails with a precondition violation when this node, or
    /// any node in the subtree, has no backing widget (deep clones and
    /// deserialized snapshots do not).
    pub fn to_component(&self) -> Result<Box<dyn LiveWidget>> {
        let base = self.underlying.as_deref().ok_or_else(|| {
            WidgetDiffError::precondition(format!(
                "cannot materialize '{}': snapshot has no backing widget",
                self.widget_type
            ))
        })?;
        let mut fresh = base.duplicate();
        for child in &self.children {
            fresh.append_child(child.to_component()?);
        }
        Ok(fresh)
    }
}

impl fmt::Debug for SnapshotNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotNode")
            .field("widget_type", &self.widget_type)
            .field("feature", &self.feature)
            .field("attributes", &self.attributes)
            .field("extension_properties", &self.extension_properties)
            .field("children", &self.children)
            .field("has_backing_widget", &self.underlying.is_some())
            .field("outer_applied", &self.outer_applied)
            .field("inner_applied", &self.inner_applied)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(widget_type: &str) -> SnapshotNode {
        SnapshotNode::new(
            widget_type.to_string(),
            FeatureBag::new(),
            IndexMap::new(),
            IndexMap::new(),
            None,
        )
    }

    fn node_with_properties(widget_type: &str, props: &[(&str, PropertyValue)]) -> SnapshotNode {
        let mut n = node(widget_type);
        for (name, value) in props {
            n.set_property(*name, value.clone());
        }
        n
    }

    #[test]
    fn test_descriptors_full_ordering() {
        let n = node_with_properties(
            "button",
            &[
                ("sclass", PropertyValue::from("a b")),
                ("id", PropertyValue::from("x")),
            ],
        );
        assert_eq!(n.descriptors(), ["button", "button.a.b", "button#x"]);
    }

    #[test]
    fn test_descriptors_omit_missing_parts() {
        let n = node("button");
        assert_eq!(n.descriptors(), ["button"]);

        let n = node_with_properties("button", &[("id", PropertyValue::from("x"))]);
        assert_eq!(n.descriptors(), ["button", "button#x"]);

        let n = node_with_properties("button", &[("sclass", PropertyValue::from("primary"))]);
        assert_eq!(n.descriptors(), ["button", "button.primary"]);
    }

    #[test]
    fn test_id_requires_string_property() {
        let n = node_with_properties("button", &[("id", PropertyValue::from(42))]);
        assert_eq!(n.id(), None);
    }

    #[test]
    fn test_text_value_label_widget_uses_value() {
        let n = node_with_properties(
            "label",
            &[
                ("value", PropertyValue::from("shown")),
                ("label", PropertyValue::from("ignored")),
            ],
        );
        assert_eq!(n.text_value().and_then(PropertyValue::as_str), Some("shown"));
    }

    #[test]
    fn test_text_value_label_widget_without_value_is_absent() {
        let n = node_with_properties("label", &[("label", PropertyValue::from("ignored"))]);
        assert_eq!(n.text_value(), None);
    }

    #[test]
    fn test_text_value_prefers_label_over_underscore_value() {
        let n = node_with_properties(
            "textbox",
            &[
                ("label", PropertyValue::from("preferred")),
                ("_value", PropertyValue::from("typed")),
            ],
        );
        assert_eq!(
            n.text_value().and_then(PropertyValue::as_str),
            Some("preferred")
        );
    }

    #[test]
    fn test_text_value_falls_back_to_underscore_value() {
        let n = node_with_properties("textbox", &[("_value", PropertyValue::from("typed"))]);
        assert_eq!(n.text_value().and_then(PropertyValue::as_str), Some("typed"));
    }

    #[test]
    fn test_matches_is_feature_only() {
        let mut a = node_with_properties("button", &[("label", PropertyValue::from("Go"))]);
        let mut b = node_with_properties("toolbar", &[("label", PropertyValue::from("Go"))]);

        // Different widget types, attributes, and children; features equal.
        b.set_attribute("bookkeeping", "yes");
        b.append_child(node("child"));
        a.outer_applied = true;

        assert!(a.matches(&b));
        assert!(b.matches(&a));
    }

    #[test]
    fn test_matches_same_instance() {
        let n = node_with_properties("button", &[("label", PropertyValue::from("Go"))]);
        assert!(n.matches(&n));
    }

    #[test]
    fn test_child_operations_preserve_order() {
        let mut parent = node("hbox");
        parent.append_child(node("a"));
        parent.append_child(node("c"));
        parent.insert_child(1, node("b"));

        let types: Vec<&str> = parent.children().iter().map(SnapshotNode::widget_type).collect();
        assert_eq!(types, ["a", "b", "c"]);

        let removed = parent.remove_child(0);
        assert_eq!(removed.widget_type(), "a");

        let displaced = parent.replace_child(0, node("z"));
        assert_eq!(displaced.widget_type(), "b");

        let types: Vec<&str> = parent.children().iter().map(SnapshotNode::widget_type).collect();
        assert_eq!(types, ["z", "c"]);
    }

    #[test]
    fn test_deep_clone_resets_patch_flags_and_backing() {
        let mut source = node("window");
        source.outer_applied = true;
        source.inner_applied = true;

        let clone = source.deep_clone();
        assert!(!clone.outer_applied);
        assert!(!clone.inner_applied);
        assert!(!clone.has_backing_widget());
    }

    #[test]
    fn test_deep_clone_child_independence() {
        let mut source = node("window");
        source.append_child(node_with_properties(
            "button",
            &[("label", PropertyValue::from("Go"))],
        ));

        let mut clone = source.deep_clone();
        clone.children_mut().clear();
        clone.set_attribute("only-on-clone", true);

        assert_eq!(source.children().len(), 1);
        assert!(source.attributes().is_empty());
    }

    #[test]
    fn test_materialize_without_backing_fails() {
        let n = node("window");
        let err = n.to_component().unwrap_err();
        assert!(err.is_precondition());
    }

    #[test]
    fn test_node_count() {
        let mut root = node("window");
        let mut row = node("hbox");
        row.append_child(node("button"));
        row.append_child(node("button"));
        root.append_child(row);
        assert_eq!(root.node_count(), 4);
    }
}
