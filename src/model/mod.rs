//! Snapshot data model.
//!
//! A snapshot is an independent, diffable capture of a live widget tree:
//! [`SnapshotNode`] per widget, each owning a [`FeatureBag`] of rendered
//! output whose values are [`PropertyValue`]s. Everything here is decoupled
//! from the live tree: a diff/patch engine mutates snapshots freely without
//! observing or disturbing the original hierarchy.

mod feature;
mod node;
mod value;

pub use feature::FeatureBag;
pub use node::SnapshotNode;
pub use value::PropertyValue;
