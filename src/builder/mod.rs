//! Builds snapshot trees from live widgets.
//!
//! Two entry points exist. [`SnapshotBuilder::build`] is the isolating one:
//! it duplicates the live tree, strips auxiliary overlay subtrees, applies
//! the optional child-range restriction, and only then captures; the live
//! tree is never read again after duplication. [`SnapshotBuilder::build_nested`]
//! captures a node the caller already owns, without duplicating it; `build`
//! uses it internally and callers holding an isolated subtree can use it
//! directly.
//!
//! Capture is a synchronous, single-threaded, depth-first descent. Any sink
//! failure aborts the whole build; there is no partial-snapshot recovery.

mod options;

pub use options::{BuildOptions, ChildRange};

use crate::error::{Result, WidgetDiffError};
use crate::live::LiveWidget;
use crate::model::{FeatureBag, SnapshotNode};

/// Builds [`SnapshotNode`] trees from live widgets.
///
/// ```
/// use widget_diff::{SnapshotBuilder, StaticWidget};
///
/// let live = StaticWidget::new("window")
///     .with_child(StaticWidget::new("button").with_property("label", "OK"));
///
/// let snapshot = SnapshotBuilder::new().build(&live)?;
/// assert_eq!(snapshot.children().len(), 1);
/// # Ok::<(), widget_diff::WidgetDiffError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SnapshotBuilder {
    options: BuildOptions,
}

impl SnapshotBuilder {
    /// Builder with default options (full tree, no range restriction).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder with explicit options.
    #[must_use]
    pub const fn with_options(options: BuildOptions) -> Self {
        Self { options }
    }

    /// Capture an isolated snapshot of `source` and its subtree.
    ///
    /// The source is duplicated first and never mutated; the returned root's
    /// backing widgets all belong to the duplicate. Fails with a
    /// precondition violation when the root lacks the render-capture
    /// capability, or with a capture error when any node's render pass
    /// fails; in both cases no partial snapshot is returned.
    pub fn build(&self, source: &dyn LiveWidget) -> Result<SnapshotNode> {
        if source.render_capture().is_none() {
            return Err(WidgetDiffError::precondition(format!(
                "widget '{}' does not expose the render-capture capability",
                source.widget_type()
            )));
        }

        let mut duplicate = source.duplicate();

        let overlays = duplicate.detach_overlays();
        if !overlays.is_empty() {
            tracing::debug!(
                widget_type = source.widget_type(),
                overlay_count = overlays.len(),
                "stripped auxiliary overlay subtrees from snapshot"
            );
        }

        if let Some(range) = self.options.child_range {
            restrict_children(&mut *duplicate, range);
        }

        let root = Self::build_nested(duplicate)?;
        tracing::debug!(
            widget_type = root.widget_type(),
            nodes = root.node_count(),
            "captured snapshot"
        );
        Ok(root)
    }

    /// Capture a snapshot of a node the caller already owns, without
    /// duplicating it. The node itself becomes the snapshot's backing
    /// widget.
    ///
    /// Children are detached into a stable owned list before any recursion,
    /// so mutation of the source during the descent cannot corrupt
    /// iteration. Each resulting node ends up exclusively owning its own
    /// backing widget.
    pub fn build_nested(mut source: Box<dyn LiveWidget>) -> Result<SnapshotNode> {
        let widget_type = source.widget_type().to_string();
        tracing::trace!(widget_type = widget_type.as_str(), "capturing widget");

        let attributes = source.attributes();
        let extension_properties = source.extension_properties().unwrap_or_default();

        let mut feature = FeatureBag::new();
        {
            let capture = source.render_capture().ok_or_else(|| {
                WidgetDiffError::precondition(format!(
                    "widget '{widget_type}' does not expose the render-capture capability"
                ))
            })?;
            capture
                .render_features(&mut feature)
                .map_err(|err| WidgetDiffError::capture(widget_type.clone(), err))?;
        }

        let children = source.take_children();

        let mut node = SnapshotNode::new(
            widget_type,
            feature,
            attributes,
            extension_properties,
            Some(source),
        );
        for child in children {
            node.append_child(Self::build_nested(child)?);
        }
        Ok(node)
    }
}

/// Capture an isolated snapshot of `source` with the given options.
///
/// Convenience wrapper over [`SnapshotBuilder`].
pub fn build_snapshot(source: &dyn LiveWidget, options: &BuildOptions) -> Result<SnapshotNode> {
    SnapshotBuilder::with_options(options.clone()).build(source)
}

/// Restrict a root's direct children to the window by forward traversal with
/// in-place removal. `cursor` is the current child's shifting index inside
/// the mutating list; retained children keep their relative order.
fn restrict_children(root: &mut dyn LiveWidget, range: ChildRange) {
    let total = root.child_count();
    let mut cursor = 0;
    for position in 0..total {
        if range.contains(position) {
            cursor += 1;
        } else {
            root.remove_child(cursor);
        }
    }
}
