/*!
 * Tests for the timeline store and edit history
 */

use hansub::app_config::OverlapPolicy;
use hansub::errors::EditError;
use hansub::subtitle::{Position, SubtitleStyle, TimeRange};
use hansub::timeline::{EditCommand, EditEvent, EditHistory, FieldChange, Timeline};

use crate::common;

fn timeline(items: &[(&str, u64, u64, &str)]) -> Timeline {
    let mut timeline = Timeline::new(OverlapPolicy::Resolve, 100);
    timeline.insert_or_replace(common::entries(items)).unwrap();
    timeline
}

/// Test that any single move leaves the timeline free of overlaps with the moved entry
#[test]
fn test_moveEntry_acrossManyTargets_shouldNeverOverlapMovedEntry() {
    for target in (0..6000).step_by(250) {
        let mut timeline = timeline(&[
            ("a", 0, 1000, "one"),
            ("b", 1200, 2200, "two"),
            ("c", 2400, 3400, "three"),
            ("d", 3600, 4600, "four"),
        ]);

        timeline.move_entry("b", target).unwrap();

        let moved = timeline.get("b").unwrap().clone();
        assert_eq!(moved.duration_ms(), 1000);
        for other in timeline.entries().iter().filter(|e| e.id != "b") {
            assert!(!moved.overlaps(other), "target {}: {} overlaps {}", target, moved, other);
        }
    }
}

/// Test that the full sweep clears every overlap, including cascades
#[test]
fn test_resolveAllOverlaps_withPackedTimeline_shouldCascade() {
    let mut timeline = timeline(&[
        ("a", 0, 1000, "one"),
        ("b", 500, 1500, "two"),
        ("c", 600, 1600, "three"),
        ("d", 5000, 6000, "four"),
    ]);

    let resolved = timeline.resolve_all_overlaps();

    assert_eq!(resolved.len(), 2);
    assert_eq!(timeline.get("b").unwrap().time_range(), TimeRange::new(1100, 2100));
    assert_eq!(timeline.get("c").unwrap().time_range(), TimeRange::new(2200, 3200));
    assert_eq!(timeline.get("d").unwrap().start_time_ms, 5000);
    common::assert_no_overlaps(timeline.entries());
}

/// Test split then merge reconstructs the trimmed text
#[test]
fn test_splitThenMerge_shouldReconstructText() {
    let mut timeline = timeline(&[("x", 1000, 4000, "  하나 둘 셋 넷  ")]);

    timeline.split_at("x", 5).unwrap();
    let merged = timeline.merge(&["x_1", "x_2"]).unwrap();

    assert_eq!(merged.inserted[0].text, "하나 둘 셋 넷");
    assert_eq!(merged.inserted[0].id, "x_1");
    assert_eq!(merged.inserted[0].time_range(), TimeRange::new(1000, 4000));
    assert_eq!(timeline.len(), 1);
}

/// Test that split refuses to create an id that already exists
#[test]
fn test_splitAt_withCollidingDerivedId_shouldFailAtomically() {
    let mut timeline = timeline(&[("a", 0, 1000, "hello world"), ("a_1", 2000, 3000, "taken")]);

    assert_eq!(timeline.split_at("a", 5), Err(EditError::DuplicateEntryId("a_1".to_string())));
    assert!(timeline.contains("a"));
    assert_eq!(timeline.len(), 2);
}

/// Test merge inherits style and position from the earliest entry
#[test]
fn test_merge_shouldInheritEarliestStyle() {
    let mut timeline = timeline(&[("late", 2000, 3000, "둘"), ("early", 0, 1000, "하나")]);
    let style = SubtitleStyle { font_weight: 700, ..SubtitleStyle::default() };
    timeline.set_style("early", Some(style.clone())).unwrap();
    timeline.set_position("early", Some(Position::Top)).unwrap();

    let change = timeline.merge(&["late", "early"]).unwrap();

    let merged = &change.inserted[0];
    assert_eq!(merged.text, "하나 둘");
    assert_eq!(merged.style, Some(style));
    assert_eq!(merged.position, Some(Position::Top));
}

/// Test merge with an unknown id leaves the timeline unchanged
#[test]
fn test_merge_withUnknownId_shouldFail() {
    let mut timeline = timeline(&[("a", 0, 1000, "one"), ("b", 1000, 2000, "two")]);
    assert_eq!(timeline.merge(&["a", "nope"]), Err(EditError::EntryNotFound("nope".to_string())));
    assert_eq!(timeline.len(), 2);
}

/// Test that history reverts a batched timing command in one step
#[test]
fn test_history_withBatchedTimingCommand_shouldRevertTogether() {
    let mut timeline = timeline(&[("a", 0, 1000, "one"), ("b", 1000, 2000, "two")]);
    let mut history = EditHistory::new(10);

    let outcome = timeline.move_entry("a", 500).unwrap();
    let mut events = vec![EditEvent::new("a", FieldChange::Timing { old: outcome.old, new: outcome.new })];
    for resolution in &outcome.resolved {
        events.push(EditEvent::new(
            resolution.id.as_str(),
            FieldChange::Timing { old: resolution.old, new: resolution.new },
        ));
    }
    history.record(EditCommand::Fields(events));

    history.undo(&mut timeline).unwrap();
    assert_eq!(timeline.get("a").unwrap().time_range(), TimeRange::new(0, 1000));
    assert_eq!(timeline.get("b").unwrap().time_range(), TimeRange::new(1000, 2000));

    history.redo(&mut timeline).unwrap();
    assert_eq!(timeline.get("a").unwrap().time_range(), TimeRange::new(500, 1500));
    assert_eq!(timeline.get("b").unwrap().time_range(), TimeRange::new(1600, 2600));
}

/// Test style changes are typed and restore exactly
#[test]
fn test_history_withStyleCommand_shouldRestoreNone() {
    let mut timeline = timeline(&[("a", 0, 1000, "one")]);
    let mut history = EditHistory::default();

    let style = SubtitleStyle::default();
    let old = timeline.set_style("a", Some(style.clone())).unwrap();
    history.record(EditCommand::Fields(vec![EditEvent::new("a", FieldChange::Style { old, new: Some(style) })]));

    history.undo(&mut timeline).unwrap();
    assert_eq!(timeline.get("a").unwrap().style, None);
}
