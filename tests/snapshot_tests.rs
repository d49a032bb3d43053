//! Integration tests for widget-diff.
//!
//! These tests exercise the full pipeline over in-memory widget trees:
//! isolated capture, range restriction, overlay exclusion, feature matching,
//! deep cloning, and materialization.

use widget_diff::{
    build_snapshot, BuildOptions, LiveWidget, PropertyValue, SnapshotBuilder, SnapshotNode,
    StaticWidget,
};

// ============================================================================
// Test Fixtures
// ============================================================================

/// A small login form: window → [textbox#user, textbox#pass, button].
fn login_form() -> StaticWidget {
    StaticWidget::new("window")
        .with_property("title", "Log in")
        .with_property("sclass", "modal compact")
        .with_attribute("session", "abc123")
        .with_child(
            StaticWidget::new("textbox")
                .with_property("id", "user")
                .with_property("_value", "admin"),
        )
        .with_child(
            StaticWidget::new("textbox")
                .with_property("id", "pass")
                .with_listener("onChange", "validate()"),
        )
        .with_child(StaticWidget::new("button").with_property("label", "Go"))
}

/// A flat row with `count` cells identified c0..c{count-1}.
fn row_of(count: usize) -> StaticWidget {
    let mut root = StaticWidget::new("hbox");
    for i in 0..count {
        root = root.with_child(StaticWidget::new("cell").with_property("id", format!("c{i}")));
    }
    root
}

fn snapshot(live: &StaticWidget) -> SnapshotNode {
    build_snapshot(live, &BuildOptions::default()).expect("build should succeed")
}

/// Recursive structural comparison used by the clone and materialization
/// tests: widget types, feature bags, and child lists must all agree.
fn assert_same_structure(a: &SnapshotNode, b: &SnapshotNode) {
    assert_eq!(a.widget_type(), b.widget_type());
    assert!(a.matches(b), "feature bags differ for '{}'", a.widget_type());
    assert_eq!(a.attributes(), b.attributes());
    assert_eq!(a.extension_properties(), b.extension_properties());
    assert_eq!(
        a.children().len(),
        b.children().len(),
        "child count differs under '{}'",
        a.widget_type()
    );
    for (ca, cb) in a.children().iter().zip(b.children()) {
        assert_same_structure(ca, cb);
    }
}

// ============================================================================
// Capture
// ============================================================================

mod capture_tests {
    use super::*;

    #[test]
    fn test_capture_records_types_features_and_order() {
        let root = snapshot(&login_form());

        assert_eq!(root.widget_type(), "window");
        assert_eq!(
            root.get_property("title").and_then(PropertyValue::as_str),
            Some("Log in")
        );
        assert_eq!(
            root.attributes().get("session").and_then(PropertyValue::as_str),
            Some("abc123")
        );

        let child_types: Vec<&str> = root
            .children()
            .iter()
            .map(SnapshotNode::widget_type)
            .collect();
        assert_eq!(child_types, ["textbox", "textbox", "button"]);
        assert_eq!(root.children()[0].id(), Some("user"));
        assert_eq!(root.children()[1].id(), Some("pass"));
        assert_eq!(
            root.children()[1]
                .widget_listeners()
                .and_then(|l| l.get("onChange"))
                .map(String::as_str),
            Some("validate()")
        );
        assert_eq!(root.node_count(), 4);
    }

    #[test]
    fn test_extension_properties_copied_when_capability_present() {
        let live = StaticWidget::new("grid").with_extension_property("rowCount", 40);
        let root = snapshot(&live);
        assert_eq!(
            root.extension_properties().get("rowCount").and_then(PropertyValue::as_int),
            Some(40)
        );

        let plain = snapshot(&StaticWidget::new("grid"));
        assert!(plain.extension_properties().is_empty());
    }

    #[test]
    fn test_build_fails_on_root_without_capture_capability() {
        let live = StaticWidget::new("window").without_capture();
        let err = build_snapshot(&live, &BuildOptions::default()).unwrap_err();
        assert!(err.is_precondition());
    }

    #[test]
    fn test_capture_failure_anywhere_aborts_the_build() {
        let live = StaticWidget::new("window")
            .with_child(StaticWidget::new("ok"))
            .with_child(
                StaticWidget::new("list")
                    .with_child(StaticWidget::new("item").with_failing_capture()),
            );
        let err = build_snapshot(&live, &BuildOptions::default()).unwrap_err();
        assert!(err.is_capture());
        assert!(err.to_string().contains("item"));
    }
}

// ============================================================================
// Isolation
// ============================================================================

mod isolation_tests {
    use super::*;

    #[test]
    fn test_snapshot_mutation_never_reaches_the_live_tree() {
        let live = login_form();
        let mut root = snapshot(&live);

        root.set_attribute("session", "hijacked");
        root.set_property("title", "Changed");
        root.children_mut().clear();

        assert_eq!(
            live.attributes().get("session").and_then(PropertyValue::as_str),
            Some("abc123")
        );
        assert_eq!(live.child_count(), 3);
    }

    #[test]
    fn test_live_mutation_after_build_never_reaches_the_snapshot() {
        let mut live = login_form();
        let root = snapshot(&live);

        live.append_child(Box::new(StaticWidget::new("intruder")));
        let removed = live.remove_child(0);
        assert!(removed.is_some());

        assert_eq!(root.children().len(), 3);
        assert_eq!(root.children()[0].id(), Some("user"));
    }
}

// ============================================================================
// Range restriction and overlays
// ============================================================================

mod restriction_tests {
    use super::*;

    #[test]
    fn test_child_range_keeps_exactly_the_window() {
        let live = row_of(10);
        let root = build_snapshot(&live, &BuildOptions::with_child_range(2, 5)).unwrap();

        let ids: Vec<&str> = root.children().iter().filter_map(SnapshotNode::id).collect();
        assert_eq!(ids, ["c2", "c3", "c4"]);
        assert_eq!(live.child_count(), 10, "restriction runs on the duplicate");
    }

    #[test]
    fn test_overlays_are_absent_from_the_snapshot() {
        let live = StaticWidget::new("window")
            .with_overlay(StaticWidget::new("tooltip").with_property("id", "tip"))
            .with_overlay(StaticWidget::new("mask"))
            .with_child(StaticWidget::new("button"));

        let root = snapshot(&live);

        assert_eq!(root.children().len(), 1);
        assert_eq!(root.node_count(), 2);
        // The live tree keeps its overlays; only the duplicate is stripped.
        assert_eq!(live.overlay_count(), 2);
    }
}

// ============================================================================
// Matching
// ============================================================================

mod match_tests {
    use super::*;

    #[test]
    fn test_match_is_reflexive_and_symmetric() {
        let a = snapshot(&login_form());
        let b = snapshot(&login_form());

        assert!(a.matches(&a));
        assert_eq!(a.matches(&b), b.matches(&a));
        assert!(a.matches(&b));
    }

    #[test]
    fn test_match_ignores_children_attributes_and_type() {
        let a = snapshot(
            &StaticWidget::new("button")
                .with_property("label", "Go")
                .with_attribute("k", "v1")
                .with_child(StaticWidget::new("icon")),
        );
        let b = snapshot(
            &StaticWidget::new("toolbarbutton")
                .with_property("label", "Go")
                .with_attribute("k", "v2"),
        );

        assert!(a.matches(&b), "matching is a function of rendered output only");
    }

    #[test]
    fn test_match_detects_feature_difference() {
        let a = snapshot(&StaticWidget::new("button").with_property("label", "Go"));
        let b = snapshot(
            &StaticWidget::new("button")
                .with_property("label", "Go")
                .with_override("open", "function(){}"),
        );
        assert!(!a.matches(&b));
    }
}

// ============================================================================
// Descriptors and text values
// ============================================================================

mod descriptor_tests {
    use super::*;

    #[test]
    fn test_descriptor_ordering_is_type_class_id() {
        let root = snapshot(
            &StaticWidget::new("button")
                .with_property("sclass", "a b")
                .with_property("id", "x"),
        );
        assert_eq!(root.descriptors(), ["button", "button.a.b", "button#x"]);
    }

    #[test]
    fn test_text_value_prefers_label_unless_widget_is_a_label() {
        let input = snapshot(
            &StaticWidget::new("textbox")
                .with_property("label", "Name")
                .with_property("_value", "typed"),
        );
        assert_eq!(
            input.text_value().and_then(PropertyValue::as_str),
            Some("Name")
        );

        let label = snapshot(
            &StaticWidget::new("label")
                .with_property("label", "ignored")
                .with_property("value", "shown"),
        );
        assert_eq!(
            label.text_value().and_then(PropertyValue::as_str),
            Some("shown")
        );
    }
}

// ============================================================================
// Cloning
// ============================================================================

mod clone_tests {
    use super::*;

    #[test]
    fn test_clone_reproduces_structure_at_all_depths() {
        let source = snapshot(&login_form());
        let clone = source.deep_clone();
        assert_same_structure(&source, &clone);
    }

    #[test]
    fn test_clone_independence_both_ways() {
        let mut source = snapshot(&login_form());
        let mut clone = source.deep_clone();

        clone.set_property("title", "clone title");
        clone.children_mut().remove(0);
        source.set_attribute("session", "rotated");

        assert_eq!(
            source.get_property("title").and_then(PropertyValue::as_str),
            Some("Log in")
        );
        assert_eq!(source.children().len(), 3);
        assert_eq!(
            clone.attributes().get("session").and_then(PropertyValue::as_str),
            Some("abc123")
        );
    }

    #[test]
    fn test_clone_has_no_backing_widget() {
        let source = snapshot(&login_form());
        let clone = source.deep_clone();

        assert!(source.has_backing_widget());
        assert!(!clone.has_backing_widget());
        assert!(clone.to_component().unwrap_err().is_precondition());

        // Clone of a clone still has nothing to materialize from.
        let second = clone.deep_clone();
        assert!(second.to_component().unwrap_err().is_precondition());
    }
}

// ============================================================================
// Materialization
// ============================================================================

mod materialize_tests {
    use super::*;

    #[test]
    fn test_materialized_tree_captures_back_to_an_equal_snapshot() {
        let source = snapshot(&login_form());
        let component = source.to_component().expect("built snapshots materialize");

        let recaptured = SnapshotBuilder::build_nested(component).unwrap();
        assert_same_structure(&source, &recaptured);
    }

    #[test]
    fn test_materialization_reflects_snapshot_child_edits() {
        let mut source = snapshot(&login_form());
        source.remove_child(1);

        let component = source.to_component().unwrap();
        assert_eq!(component.child_count(), 2);
    }

    #[test]
    fn test_materialization_is_repeatable() {
        let source = snapshot(&login_form());
        let first = source.to_component().unwrap();
        let second = source.to_component().unwrap();
        assert_eq!(first.child_count(), second.child_count());
        assert!(source.has_backing_widget(), "materialization never consumes");
    }

    #[test]
    fn test_materialization_fails_when_a_descendant_is_clone_born() {
        let mut source = snapshot(&login_form());
        let cloned_child = source.children()[0].deep_clone();
        source.replace_child(0, cloned_child);

        assert!(source.to_component().unwrap_err().is_precondition());
    }
}

// ============================================================================
// Serialization
// ============================================================================

mod serde_tests {
    use super::*;

    #[test]
    fn test_snapshot_round_trips_through_json() {
        let source = snapshot(&login_form());
        let encoded = serde_json::to_string(&source).expect("snapshot serializes");
        let decoded: SnapshotNode = serde_json::from_str(&encoded).expect("snapshot deserializes");

        assert_same_structure(&source, &decoded);
    }

    #[test]
    fn test_deserialized_snapshot_has_no_backing_widget() {
        let source = snapshot(&login_form());
        let encoded = serde_json::to_string(&source).unwrap();
        let decoded: SnapshotNode = serde_json::from_str(&encoded).unwrap();

        assert!(!decoded.has_backing_widget());
        assert!(decoded.to_component().unwrap_err().is_precondition());
    }

    #[test]
    fn test_round_trip_preserves_absent_groups() {
        let source = snapshot(
            &StaticWidget::new("button").with_override("open", "function(){}"),
        );
        let encoded = serde_json::to_string(&source).unwrap();
        let decoded: SnapshotNode = serde_json::from_str(&encoded).unwrap();

        assert!(decoded.widget_overrides().is_some());
        assert!(decoded.widget_listeners().is_none());
        assert!(source.matches(&decoded));
    }
}
