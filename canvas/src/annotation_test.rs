use serde_json::json;

use super::*;

fn assigned(worker_id: &str) -> Annotation {
    Annotation {
        id: Uuid::new_v4(),
        kind: AnnotationKind::Pipe,
        points: vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)],
        assignee: Some(Assignee { worker_id: worker_id.to_owned(), name: "Dana".to_owned() }),
        completed: false,
        in_progress: false,
    }
}

// =============================================================
// AnnotationKind
// =============================================================

#[test]
fn kind_serializes_lowercase() {
    assert_eq!(serde_json::to_value(AnnotationKind::Pipe).unwrap(), json!("pipe"));
    assert_eq!(serde_json::to_value(AnnotationKind::Connection).unwrap(), json!("connection"));
}

#[test]
fn kind_rejects_unknown_value() {
    assert!(serde_json::from_value::<AnnotationKind>(json!("valve")).is_err());
}

// =============================================================
// Annotation serde
// =============================================================

#[test]
fn in_progress_is_never_serialized() {
    let mut ann = assigned("w1");
    ann.in_progress = true;
    let value = serde_json::to_value(&ann).unwrap();
    assert!(value.get("in_progress").is_none());
}

#[test]
fn deserialized_annotation_is_not_in_progress() {
    let id = Uuid::new_v4();
    let ann: Annotation = serde_json::from_value(json!({
        "id": id,
        "kind": "connection",
        "points": [{ "x": 1.0, "y": 2.0 }, { "x": 3.0, "y": 4.0 }],
        "assignee": null,
        "completed": true,
        "in_progress": true,
    }))
    .unwrap();
    assert_eq!(ann.id, id);
    assert_eq!(ann.kind, AnnotationKind::Connection);
    assert_eq!(ann.points.len(), 2);
    assert!(ann.completed);
    assert!(!ann.in_progress);
}

#[test]
fn deserialize_fills_missing_optional_fields() {
    let ann: Annotation = serde_json::from_value(json!({ "id": Uuid::new_v4(), "kind": "pipe" })).unwrap();
    assert!(ann.points.is_empty());
    assert!(ann.assignee.is_none());
    assert!(!ann.completed);
}

// =============================================================
// begin / is_finished
// =============================================================

#[test]
fn begin_creates_empty_in_progress_annotation() {
    let mut ids = SequentialIds::starting_at(7);
    let ann = Annotation::begin(&mut ids, AnnotationKind::Connection);
    assert_eq!(ann.id, Uuid::from_u128(7));
    assert_eq!(ann.kind, AnnotationKind::Connection);
    assert!(ann.points.is_empty());
    assert!(ann.in_progress);
    assert!(!ann.completed);
    assert!(ann.assignee.is_none());
}

#[test]
fn in_progress_annotation_is_not_finished() {
    let mut ann = assigned("w1");
    ann.in_progress = true;
    assert!(!ann.is_finished());
}

#[test]
fn empty_annotation_is_not_finished() {
    let mut ann = assigned("w1");
    ann.points.clear();
    assert!(!ann.is_finished());
}

#[test]
fn drawn_annotation_is_finished() {
    assert!(assigned("w1").is_finished());
}

// =============================================================
// Ownership
// =============================================================

#[test]
fn owned_by_assignee() {
    assert!(assigned("w1").is_owned_by(Some("w1")));
}

#[test]
fn not_owned_by_other_viewer() {
    assert!(!assigned("w1").is_owned_by(Some("w2")));
}

#[test]
fn not_owned_without_viewer() {
    assert!(!assigned("w1").is_owned_by(None));
}

#[test]
fn unassigned_is_owned_by_nobody() {
    let mut ann = assigned("w1");
    ann.assignee = None;
    assert!(!ann.is_owned_by(Some("w1")));
}

#[test]
fn ownership_follows_reassignment() {
    let mut ann = assigned("w1");
    ann.assignee = Some(Assignee { worker_id: "w2".to_owned(), name: "Lee".to_owned() });
    assert!(!ann.is_owned_by(Some("w1")));
    assert!(ann.is_owned_by(Some("w2")));
}

// =============================================================
// Id generators
// =============================================================

#[test]
fn sequential_ids_count_up() {
    let mut ids = SequentialIds::default();
    assert_eq!(ids.next_id(), Uuid::from_u128(0));
    assert_eq!(ids.next_id(), Uuid::from_u128(1));
    assert_eq!(ids.next_id(), Uuid::from_u128(2));
}

#[test]
fn uuid_ids_are_unique() {
    let mut ids = UuidIds;
    assert_ne!(ids.next_id(), ids.next_id());
}

#[test]
fn find_returns_matching_annotation() {
    let a = assigned("w1");
    let b = assigned("w2");
    let list = vec![a.clone(), b.clone()];
    assert_eq!(find(&list, b.id), Some(&b));
    assert!(find(&list, Uuid::new_v4()).is_none());
}
