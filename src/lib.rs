//! **Snapshot capture and structural matching for live widget trees.**
//!
//! `widget-diff` turns a live, mutable UI hierarchy into an independent,
//! point-in-time snapshot that a reconciliation engine can diff and patch
//! without ever touching the live tree during comparison. The crate owns the
//! snapshot side of that pipeline: capturing rendered output through a
//! generic sink, deriving coarse match-candidate descriptors, testing the
//! narrow structural equivalence a diff engine uses as its match predicate,
//! and producing deep, ownership-safe duplicates of snapshot data.
//!
//! The diff/patch algorithm itself, the live tree's rendering runtime, and
//! any transport of patches live outside this crate; the boundary to the
//! runtime is the trait surface in [`live`].
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: the snapshot data structures. [`SnapshotNode`] is one
//!   captured widget: its [`FeatureBag`] of rendered output, copies of the
//!   widget's ad hoc data, and an independent child list. Accessors hand out
//!   live mutable views so a patch engine can edit snapshots in place.
//! - **[`builder`]**: [`SnapshotBuilder`] captures snapshots. The cloning
//!   entry point isolates a duplicate of the live tree (overlay subtrees
//!   stripped, optionally restricted to a child-index window) before
//!   capturing; the nested entry point captures a node the caller already
//!   owns.
//! - **[`live`]**: the interfaces the external widget runtime implements:
//!   [`LiveWidget`], the optional [`RenderCapture`] capability, and the
//!   [`FeatureSink`] a widget renders into. [`StaticWidget`] is a
//!   self-contained in-memory implementation useful as a test double.
//!
//! ## Getting Started
//!
//! ```
//! use widget_diff::{build_snapshot, BuildOptions, StaticWidget};
//!
//! let live = StaticWidget::new("window")
//!     .with_property("title", "Settings")
//!     .with_child(StaticWidget::new("button").with_property("label", "OK"));
//!
//! let snapshot = build_snapshot(&live, &BuildOptions::default())?;
//!
//! assert_eq!(snapshot.widget_type(), "window");
//! assert_eq!(snapshot.children().len(), 1);
//! assert_eq!(snapshot.descriptors(), ["window"]);
//! # Ok::<(), widget_diff::WidgetDiffError>(())
//! ```
//!
//! ## Matching
//!
//! Two snapshots match when, and only when, their rendered output is
//! equivalent. Children, ad hoc attributes, and even the widget type are excluded
//! from the predicate, because a diff engine reconciles those separately:
//!
//! ```
//! use widget_diff::{build_snapshot, BuildOptions, StaticWidget};
//!
//! let old = build_snapshot(
//!     &StaticWidget::new("button").with_property("label", "Save"),
//!     &BuildOptions::default(),
//! )?;
//! let new = build_snapshot(
//!     &StaticWidget::new("button").with_property("label", "Saved!"),
//!     &BuildOptions::default(),
//! )?;
//!
//! assert!(!old.matches(&new));
//! # Ok::<(), widget_diff::WidgetDiffError>(())
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]

pub mod builder;
pub mod error;
pub mod live;
pub mod model;

// Re-export main types for convenience
pub use builder::{build_snapshot, BuildOptions, ChildRange, SnapshotBuilder};
pub use error::{Result, WidgetDiffError};
pub use live::{FeatureSink, LiveWidget, RenderCapture, StaticWidget};
pub use model::{FeatureBag, PropertyValue, SnapshotNode};
