//! Interfaces consumed from the live widget-tree runtime.
//!
//! The live tree is owned and mutated by an external runtime; this crate only
//! observes it. These traits are the full surface the snapshot subsystem
//! needs: enumeration of a node's declared type, children, and ad hoc data;
//! independent subtree duplication; detachment of auxiliary overlay subtrees;
//! and the render-capture contract through which a widget writes its rendered
//! state into a [`FeatureSink`].
//!
//! The capture capability is optional per widget ([`LiveWidget::render_capture`]
//! returns `None` when absent), mirroring runtimes where only fully realized
//! widgets can render. Building a snapshot from a widget without it is a
//! precondition violation.

mod static_widget;

pub use static_widget::StaticWidget;

use crate::model::PropertyValue;
use indexmap::IndexMap;
use std::fmt;
use std::io;

/// Sink into which a live widget writes its rendered output.
///
/// A widget's render pass calls [`write`](Self::write) once per rendered
/// property and at most once per optional string-map group. The four group
/// setters replace the whole group; a group never set stays absent, which is
/// distinct from a group set to an empty map.
pub trait FeatureSink {
    /// Write one rendered property.
    fn write(&mut self, name: &str, value: PropertyValue) -> io::Result<()>;

    /// Set the widget-override group.
    fn set_widget_overrides(&mut self, overrides: IndexMap<String, String>);

    /// Set the client-attribute group.
    fn set_client_attributes(&mut self, attrs: IndexMap<String, String>);

    /// Set the widget-attribute group.
    fn set_widget_attributes(&mut self, attrs: IndexMap<String, String>);

    /// Set the widget-listener group.
    fn set_widget_listeners(&mut self, listeners: IndexMap<String, String>);
}

/// A live widget's ability to emit its current rendered state.
pub trait RenderCapture {
    /// Write every rendered property, override, client attribute, widget
    /// attribute, and listener binding into `sink`, synchronously.
    ///
    /// A returned error is treated as fatal by the snapshot builder: the
    /// whole in-progress build aborts with no partial result.
    fn render_features(&self, sink: &mut dyn FeatureSink) -> io::Result<()>;
}

/// A node in the externally owned, mutable widget hierarchy.
///
/// Implementations hand out *copies* of their ad hoc data
/// ([`attributes`](Self::attributes), [`extension_properties`](Self::extension_properties))
/// so snapshots never alias live state.
pub trait LiveWidget {
    /// The widget's declared type name.
    fn widget_type(&self) -> &str;

    /// Number of structural children.
    fn child_count(&self) -> usize;

    /// Remove and return the child at `index`, shifting later children left.
    /// Returns `None` when the index is out of range.
    fn remove_child(&mut self, index: usize) -> Option<Box<dyn LiveWidget>>;

    /// Detach all children into an owned list, preserving sibling order.
    ///
    /// The returned list is stable: later mutation of this widget cannot
    /// affect it, which is what makes recursive capture safe against
    /// concurrent tree edits.
    fn take_children(&mut self) -> Vec<Box<dyn LiveWidget>> {
        let mut children = Vec::with_capacity(self.child_count());
        while let Some(child) = self.remove_child(0) {
            children.push(child);
        }
        children
    }

    /// Append a child after the current last child.
    fn append_child(&mut self, child: Box<dyn LiveWidget>);

    /// A copy of the widget's ad hoc attribute store.
    fn attributes(&self) -> IndexMap<String, PropertyValue>;

    /// A copy of the widget's extension-property store, if the widget has
    /// that capability.
    fn extension_properties(&self) -> Option<IndexMap<String, PropertyValue>>;

    /// Produce an independent duplicate of this widget and its full subtree.
    /// The original must not be observably affected.
    fn duplicate(&self) -> Box<dyn LiveWidget>;

    /// Detach every auxiliary overlay subtree from this widget.
    ///
    /// Overlays are parallel, non-structural sub-hierarchies; they must never
    /// appear in a diffable snapshot.
    fn detach_overlays(&mut self) -> Vec<Box<dyn LiveWidget>>;

    /// The render-capture capability, if this widget has one.
    fn render_capture(&self) -> Option<&dyn RenderCapture>;
}

impl fmt::Debug for dyn LiveWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveWidget")
            .field("widget_type", &self.widget_type())
            .field("child_count", &self.child_count())
            .finish()
    }
}
