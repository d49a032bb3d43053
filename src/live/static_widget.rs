//! An in-memory widget tree.
//!
//! `StaticWidget` is a self-contained [`LiveWidget`] implementation with no
//! runtime behind it: its rendered output is whatever was configured on it.
//! It exists as a reference implementation and a test double: both this
//! crate's tests and downstream consumers use it to exercise snapshot
//! building without a real UI runtime.

use super::{FeatureSink, LiveWidget, RenderCapture};
use crate::model::PropertyValue;
use indexmap::IndexMap;
use std::io;

/// An in-memory [`LiveWidget`] with builder-style construction.
///
/// ```
/// use widget_diff::StaticWidget;
///
/// let login = StaticWidget::new("window")
///     .with_property("title", "Log in")
///     .with_child(StaticWidget::new("textbox").with_property("id", "user"))
///     .with_child(StaticWidget::new("button").with_property("label", "Go"));
/// ```
pub struct StaticWidget {
    widget_type: String,
    properties: IndexMap<String, PropertyValue>,
    overrides: Option<IndexMap<String, String>>,
    client_attrs: Option<IndexMap<String, String>>,
    widget_attrs: Option<IndexMap<String, String>>,
    listeners: Option<IndexMap<String, String>>,
    attributes: IndexMap<String, PropertyValue>,
    extension_properties: Option<IndexMap<String, PropertyValue>>,
    children: Vec<Box<dyn LiveWidget>>,
    overlays: Vec<Box<dyn LiveWidget>>,
    capturable: bool,
    fail_capture: bool,
}

impl StaticWidget {
    /// Create a widget of the given type with no content.
    #[must_use]
    pub fn new(widget_type: impl Into<String>) -> Self {
        Self {
            widget_type: widget_type.into(),
            properties: IndexMap::new(),
            overrides: None,
            client_attrs: None,
            widget_attrs: None,
            listeners: None,
            attributes: IndexMap::new(),
            extension_properties: None,
            children: Vec::new(),
            overlays: Vec::new(),
            capturable: true,
            fail_capture: false,
        }
    }

    /// Add a rendered property.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Add a widget override.
    #[must_use]
    pub fn with_override(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Add a client attribute.
    #[must_use]
    pub fn with_client_attribute(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.client_attrs
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Add a widget attribute.
    #[must_use]
    pub fn with_widget_attribute(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.widget_attrs
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Add a listener binding.
    #[must_use]
    pub fn with_listener(mut self, event: impl Into<String>, script: impl Into<String>) -> Self {
        self.listeners
            .get_or_insert_with(IndexMap::new)
            .insert(event.into(), script.into());
        self
    }

    /// Add an ad hoc attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Add an extension property. The first call enables the
    /// extension-property capability.
    #[must_use]
    pub fn with_extension_property(
        mut self,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.extension_properties
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Append a structural child.
    #[must_use]
    pub fn with_child(mut self, child: StaticWidget) -> Self {
        self.children.push(Box::new(child));
        self
    }

    /// Attach an auxiliary overlay subtree.
    #[must_use]
    pub fn with_overlay(mut self, overlay: StaticWidget) -> Self {
        self.overlays.push(Box::new(overlay));
        self
    }

    /// Disable the render-capture capability on this widget.
    #[must_use]
    pub fn without_capture(mut self) -> Self {
        self.capturable = false;
        self
    }

    /// Make the render pass fail with an I/O error. Used to exercise the
    /// fatal capture-failure path.
    #[must_use]
    pub fn with_failing_capture(mut self) -> Self {
        self.fail_capture = true;
        self
    }

    /// Number of attached overlay subtrees.
    #[must_use]
    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }
}

impl Clone for StaticWidget {
    fn clone(&self) -> Self {
        Self {
            widget_type: self.widget_type.clone(),
            properties: self.properties.clone(),
            overrides: self.overrides.clone(),
            client_attrs: self.client_attrs.clone(),
            widget_attrs: self.widget_attrs.clone(),
            listeners: self.listeners.clone(),
            attributes: self.attributes.clone(),
            extension_properties: self.extension_properties.clone(),
            children: self.children.iter().map(|c| c.duplicate()).collect(),
            overlays: self.overlays.iter().map(|o| o.duplicate()).collect(),
            capturable: self.capturable,
            fail_capture: self.fail_capture,
        }
    }
}

impl LiveWidget for StaticWidget {
    fn widget_type(&self) -> &str {
        &self.widget_type
    }

    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn remove_child(&mut self, index: usize) -> Option<Box<dyn LiveWidget>> {
        if index < self.children.len() {
            Some(self.children.remove(index))
        } else {
            None
        }
    }

    fn take_children(&mut self) -> Vec<Box<dyn LiveWidget>> {
        std::mem::take(&mut self.children)
    }

    fn append_child(&mut self, child: Box<dyn LiveWidget>) {
        self.children.push(child);
    }

    fn attributes(&self) -> IndexMap<String, PropertyValue> {
        self.attributes.clone()
    }

    fn extension_properties(&self) -> Option<IndexMap<String, PropertyValue>> {
        self.extension_properties.clone()
    }

    fn duplicate(&self) -> Box<dyn LiveWidget> {
        Box::new(self.clone())
    }

    fn detach_overlays(&mut self) -> Vec<Box<dyn LiveWidget>> {
        std::mem::take(&mut self.overlays)
    }

    fn render_capture(&self) -> Option<&dyn RenderCapture> {
        if self.capturable {
            Some(self)
        } else {
            None
        }
    }
}

impl RenderCapture for StaticWidget {
    fn render_features(&self, sink: &mut dyn FeatureSink) -> io::Result<()> {
        if self.fail_capture {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "render sink rejected the widget",
            ));
        }
        for (name, value) in &self.properties {
            sink.write(name, value.clone())?;
        }
        if let Some(overrides) = &self.overrides {
            sink.set_widget_overrides(overrides.clone());
        }
        if let Some(attrs) = &self.client_attrs {
            sink.set_client_attributes(attrs.clone());
        }
        if let Some(attrs) = &self.widget_attrs {
            sink.set_widget_attributes(attrs.clone());
        }
        if let Some(listeners) = &self.listeners {
            sink.set_widget_listeners(listeners.clone());
        }
        Ok(())
    }
}
