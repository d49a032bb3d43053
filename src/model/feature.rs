//! Captured rendered output for a single widget.

use super::PropertyValue;
use crate::live::FeatureSink;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;

/// The rendered output of one widget: its generic properties plus four
/// optional string-map groups (widget overrides, client attributes, widget
/// attributes, listener bindings).
///
/// The four groups are lazily allocated: each stays `None` until its first
/// write. `None` and `Some(empty map)` are deliberately distinct states;
/// [`matches`](Self::matches) treats a group that was never rendered as
/// different from one rendered empty.
///
/// A `FeatureBag` is also the sink a live widget renders into during capture
/// (see [`FeatureSink`]).
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureBag {
    properties: IndexMap<String, PropertyValue>,
    overrides: Option<IndexMap<String, String>>,
    client_attrs: Option<IndexMap<String, String>>,
    widget_attrs: Option<IndexMap<String, String>>,
    listeners: Option<IndexMap<String, String>>,
}

impl FeatureBag {
    /// Create an empty bag: no properties, all four groups absent.
    #[must_use]
    pub fn new() -> Self {
        Self {
            properties: IndexMap::new(),
            overrides: None,
            client_attrs: None,
            widget_attrs: None,
            listeners: None,
        }
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    /// All rendered properties.
    #[must_use]
    pub fn properties(&self) -> &IndexMap<String, PropertyValue> {
        &self.properties
    }

    /// Mutable view of the rendered properties.
    ///
    /// This is a live handle, not a copy: edits made through it are
    /// immediately visible to [`matches`](Self::matches) and every other
    /// reader. Callers such as a patch engine edit snapshots in place
    /// through this accessor.
    pub fn properties_mut(&mut self) -> &mut IndexMap<String, PropertyValue> {
        &mut self.properties
    }

    /// Look up one rendered property.
    #[must_use]
    pub fn get_property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Set or update a rendered property.
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.properties.insert(name.into(), value.into());
    }

    /// Remove a rendered property, returning the previous value if any.
    pub fn remove_property(&mut self, name: &str) -> Option<PropertyValue> {
        self.properties.shift_remove(name)
    }

    /// Number of rendered properties.
    #[must_use]
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Whether a rendered property with the given name exists.
    #[must_use]
    pub fn contains_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Names of all rendered properties, in capture order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    // ------------------------------------------------------------------
    // Optional string-map groups
    // ------------------------------------------------------------------

    /// The widget-override group, if it was ever written.
    #[must_use]
    pub fn widget_overrides(&self) -> Option<&IndexMap<String, String>> {
        self.overrides.as_ref()
    }

    /// Set or update a widget override, allocating the group on first write.
    pub fn set_widget_override(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.overrides
            .get_or_insert_with(|| IndexMap::with_capacity(4))
            .insert(name.into(), value.into());
    }

    /// Remove a widget override, returning the previous value if any.
    pub fn remove_widget_override(&mut self, name: &str) -> Option<String> {
        self.overrides.as_mut()?.shift_remove(name)
    }

    /// The client-attribute group, if it was ever written.
    #[must_use]
    pub fn client_attributes(&self) -> Option<&IndexMap<String, String>> {
        self.client_attrs.as_ref()
    }

    /// Set or update a client attribute, allocating the group on first write.
    pub fn set_client_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.client_attrs
            .get_or_insert_with(|| IndexMap::with_capacity(4))
            .insert(name.into(), value.into());
    }

    /// Remove a client attribute, returning the previous value if any.
    pub fn remove_client_attribute(&mut self, name: &str) -> Option<String> {
        self.client_attrs.as_mut()?.shift_remove(name)
    }

    /// The widget-attribute group, if it was ever written.
    #[must_use]
    pub fn widget_attributes(&self) -> Option<&IndexMap<String, String>> {
        self.widget_attrs.as_ref()
    }

    /// Set or update a widget attribute, allocating the group on first write.
    pub fn set_widget_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.widget_attrs
            .get_or_insert_with(|| IndexMap::with_capacity(4))
            .insert(name.into(), value.into());
    }

    /// Remove a widget attribute, returning the previous value if any.
    pub fn remove_widget_attribute(&mut self, name: &str) -> Option<String> {
        self.widget_attrs.as_mut()?.shift_remove(name)
    }

    /// The widget-listener group, if it was ever written.
    #[must_use]
    pub fn widget_listeners(&self) -> Option<&IndexMap<String, String>> {
        self.listeners.as_ref()
    }

    /// Set or update a listener binding, allocating the group on first write.
    pub fn set_widget_listener(&mut self, event: impl Into<String>, script: impl Into<String>) {
        self.listeners
            .get_or_insert_with(|| IndexMap::with_capacity(4))
            .insert(event.into(), script.into());
    }

    /// Remove a listener binding, returning the previous value if any.
    pub fn remove_widget_listener(&mut self, event: &str) -> Option<String> {
        self.listeners.as_mut()?.shift_remove(event)
    }

    // ------------------------------------------------------------------
    // Equivalence and duplication
    // ------------------------------------------------------------------

    /// Structural equivalence of rendered output.
    ///
    /// All five maps must match pairwise: a group that is absent equals only
    /// an absent group; present groups must have the same key count and deep
    /// value equality per key. Key order never matters.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        maps_match(&self.properties, &other.properties)
            && optional_maps_match(&self.overrides, &other.overrides)
            && optional_maps_match(&self.client_attrs, &other.client_attrs)
            && optional_maps_match(&self.widget_attrs, &other.widget_attrs)
            && optional_maps_match(&self.listeners, &other.listeners)
    }

    /// Total deep copy.
    ///
    /// Every map is duplicated independently; absent groups stay absent.
    /// The copy shares no mutable state with the source.
    #[must_use]
    pub fn deep_clone(&self) -> Self {
        Self {
            properties: self.properties.clone(),
            overrides: self.overrides.clone(),
            client_attrs: self.client_attrs.clone(),
            widget_attrs: self.widget_attrs.clone(),
            listeners: self.listeners.clone(),
        }
    }
}

impl Default for FeatureBag {
    fn default() -> Self {
        Self::new()
    }
}

/// Live widgets render directly into a `FeatureBag` during snapshot capture.
impl FeatureSink for FeatureBag {
    fn write(&mut self, name: &str, value: PropertyValue) -> io::Result<()> {
        self.properties.insert(name.to_string(), value);
        Ok(())
    }

    fn set_widget_overrides(&mut self, overrides: IndexMap<String, String>) {
        self.overrides = Some(overrides);
    }

    fn set_client_attributes(&mut self, attrs: IndexMap<String, String>) {
        self.client_attrs = Some(attrs);
    }

    fn set_widget_attributes(&mut self, attrs: IndexMap<String, String>) {
        self.widget_attrs = Some(attrs);
    }

    fn set_widget_listeners(&mut self, listeners: IndexMap<String, String>) {
        self.listeners = Some(listeners);
    }
}

impl fmt::Display for FeatureBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.properties {
            write!(f, "{name}={value};")?;
        }
        Ok(())
    }
}

/// Pairwise map equality: same key count, deep value equality per key.
fn maps_match<V: PartialEq>(a: &IndexMap<String, V>, b: &IndexMap<String, V>) -> bool {
    a.len() == b.len() && a.iter().all(|(key, value)| b.get(key) == Some(value))
}

/// Absent equals only absent; one absent and one present are unequal
/// regardless of the present map's size.
fn optional_maps_match<V: PartialEq>(
    a: &Option<IndexMap<String, V>>,
    b: &Option<IndexMap<String, V>>,
) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => maps_match(a, b),
        (None, None) => true,
        _ => false,
    }
}
