//! Topology editing integration tests.
//!
//! Each test loads a synthetic track through the document layer, applies
//! an edit, and checks the invariants that must survive every edit:
//! ids match indices, links are reciprocal, DLONGs are a monotone walk
//! from zero, and the derived state tracks the ring.

mod common;

use trackgeom::core::Point2D;
use trackgeom::{TrackDocument, TrackRing};

fn assert_dlong_walk(ring: &TrackRing) {
    let mut expected = 0.0;
    for (i, section) in ring.sections.iter().enumerate() {
        assert_eq!(section.id, i, "section id must equal its index");
        assert!(
            (section.start_dlong - expected).abs() < 1e-6,
            "section {i} start DLONG {} != cumulative {expected}",
            section.start_dlong
        );
        expected += section.length;
    }
    assert!(
        (ring.track_length - expected).abs() < 1e-6,
        "track length must be the sum of section lengths"
    );
}

// ============================================================================
// Delete
// ============================================================================

#[test]
fn test_delete_bridges_the_gap() {
    let mut doc = TrackDocument::from_sg(common::polygon_file(8, 200_000.0)).unwrap();
    doc.delete_section(3).unwrap();

    assert_eq!(doc.ring.len(), 7);
    // former neighbors 2 and 4 (now 3) point at each other and meet
    assert_eq!(doc.ring.sections[2].next_id, 3);
    assert_eq!(doc.ring.sections[3].prev_id, 2);
    assert_eq!(doc.ring.sections[2].end, doc.ring.sections[3].start);
    assert_dlong_walk(&doc.ring);
}

#[test]
fn test_delete_first_section_renumbers() {
    let mut doc = TrackDocument::from_sg(common::square_file(50_000)).unwrap();
    doc.delete_section(0).unwrap();

    assert_eq!(doc.ring.len(), 3);
    assert_dlong_walk(&doc.ring);
    assert!(doc.ring.is_closed_loop(), "deleting from a loop reconnects it");
}

#[test]
fn test_delete_out_of_range_is_an_error() {
    let mut doc = TrackDocument::from_sg(common::square_file(50_000)).unwrap();
    assert!(doc.delete_section(4).is_err());
    assert_eq!(doc.ring.len(), 4, "failed edit must not change the ring");
}

// ============================================================================
// Split
// ============================================================================

#[test]
fn test_split_straight_preserves_closure() {
    let mut doc = TrackDocument::from_sg(common::square_file(60_000)).unwrap();
    doc.split_straight(1, Point2D::new(60_000.0, 20_000.0)).unwrap();

    assert_eq!(doc.ring.len(), 5);
    assert!(doc.ring.is_closed_loop());
    assert_dlong_walk(&doc.ring);

    // both halves keep the original chord
    assert_eq!(doc.ring.sections[1].start, Point2D::new(60_000.0, 0.0));
    assert_eq!(doc.ring.sections[1].end, Point2D::new(60_000.0, 20_000.0));
    assert_eq!(doc.ring.sections[2].start, Point2D::new(60_000.0, 20_000.0));
    assert_eq!(doc.ring.sections[2].end, Point2D::new(60_000.0, 60_000.0));
}

#[test]
fn test_split_too_close_to_an_end_is_rejected() {
    let mut doc = TrackDocument::from_sg(common::square_file(60_000)).unwrap();
    let err = doc.split_straight(0, Point2D::new(100.0, 0.0));
    assert!(err.is_err(), "split at 0.17% of the length must be rejected");
    assert_eq!(doc.ring.len(), 4);
}

#[test]
fn test_split_copies_surface_strips() {
    let mut doc = TrackDocument::from_sg(common::square_file(60_000)).unwrap();
    doc.split_straight(0, Point2D::new(30_000.0, 0.0)).unwrap();
    assert_eq!(doc.ring.sections[0].fsects, common::standard_fsects());
    assert_eq!(doc.ring.sections[1].fsects, common::standard_fsects());
}

// ============================================================================
// Start/finish
// ============================================================================

#[test]
fn test_set_start_finish_rotates_the_ring() {
    let mut doc = TrackDocument::from_sg(common::polygon_file(6, 150_000.0)).unwrap();
    let old_start = doc.ring.sections[2].start;
    doc.set_start_finish(2).unwrap();

    assert_eq!(doc.ring.sections[0].start, old_start);
    assert_eq!(doc.ring.sections[0].start_dlong, 0.0);
    assert!(doc.ring.is_closed_loop());
    assert_dlong_walk(&doc.ring);
}

#[test]
fn test_set_start_finish_requires_a_closed_loop() {
    let mut doc = TrackDocument::from_sg(common::square_file(50_000)).unwrap();
    doc.ring.sections[0].next_id = -1;
    doc.ring.sections[1].prev_id = -1;
    assert!(doc.set_start_finish(2).is_err());
}

// ============================================================================
// Save after edits
// ============================================================================

#[test]
fn test_edited_document_reparses_cleanly() {
    let mut doc = TrackDocument::from_sg(common::square_file(60_000)).unwrap();
    doc.delete_section(2).unwrap();
    // integer midpoint keeps every persisted coordinate exact
    doc.split_straight(0, Point2D::new(30_000.0, 0.0)).unwrap();

    let bytes = doc.to_bytes();
    let reloaded = TrackDocument::from_sg(
        trackgeom::SgFile::decode(&bytes).expect("edited output must reparse"),
    )
    .unwrap();
    assert_eq!(reloaded.ring.len(), 4);
    assert_dlong_walk(&reloaded.ring);
}
