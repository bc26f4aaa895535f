//! Centerline sampling, forward mapping, and spatial index tests.
//!
//! The spatial index is checked against the exhaustive projection over a
//! cloud of seeded random queries; the two must agree exactly.

mod common;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use trackgeom::core::Point2D;
use trackgeom::elevation::ElevationProfile;
use trackgeom::{build_ground_surface_mesh, getxyz, MeshConfig, TrackDocument, TrackRing};

// ============================================================================
// Centerline sampling
// ============================================================================

#[test]
fn test_sample_count_and_closure() {
    // perimeter 240000 at step 10000: 24 samples plus the closing point
    let doc = TrackDocument::from_sg(common::square_file(60_000)).unwrap();
    assert_eq!(doc.centerline.points.len(), 25);
    assert_eq!(doc.centerline.points[0], Point2D::ZERO);
    assert_eq!(
        *doc.centerline.points.last().unwrap(),
        Point2D::ZERO,
        "the final sample closes the loop"
    );
}

#[test]
fn test_sample_dlongs_are_monotone() {
    let doc = TrackDocument::from_sg(common::polygon_file(12, 300_000.0)).unwrap();
    for pair in doc.centerline.dlongs.windows(2) {
        assert!(pair[0] < pair[1], "dlongs must strictly increase");
    }
}

// ============================================================================
// Forward mapping
// ============================================================================

#[test]
fn test_getxyz_on_the_centerline() {
    let ring = TrackRing::from_sg(&common::square_file(60_000)).unwrap();
    let profile = ElevationProfile::from_ring(&ring);
    let lookup = ring.dlong_lookup();

    let p = getxyz(&ring, &profile, &lookup, 0.0, 0.0).unwrap();
    assert_eq!(p.position, Point2D::ZERO);
    assert_eq!(p.altitude, 0.0);

    // 90000 is 30000 into section 1 (heading north)
    let p = getxyz(&ring, &profile, &lookup, 90_000.0, 0.0).unwrap();
    assert_eq!(p.position, Point2D::new(60_000.0, 30_000.0));
}

#[test]
fn test_getxyz_lateral_offset_is_left_of_travel() {
    let ring = TrackRing::from_sg(&common::square_file(60_000)).unwrap();
    let profile = ElevationProfile::from_ring(&ring);
    let lookup = ring.dlong_lookup();

    // heading east on section 0, so positive DLAT points +y
    let p = getxyz(&ring, &profile, &lookup, 30_000.0, 2_500.0).unwrap();
    assert_eq!(p.position, Point2D::new(30_000.0, 2_500.0));

    // DLONG wraps modulo the track length
    let wrapped = getxyz(&ring, &profile, &lookup, 30_000.0 + 240_000.0, 2_500.0).unwrap();
    assert_eq!(wrapped.position, p.position);
}

// ============================================================================
// Spatial index vs exhaustive projection
// ============================================================================

#[test]
fn test_grid_index_agrees_with_exhaustive_search() {
    let circumradius = 400_000.0;
    let doc = TrackDocument::from_sg(common::polygon_file(60, circumradius)).unwrap();
    let mut rng = StdRng::seed_from_u64(0x7261636b);

    // generous bound for near-band queries: the first non-empty cell
    // block may settle on a neighboring segment when the true foot sits
    // just across a cell boundary
    let cell_slack = 2.0 * doc.centerline.bounds.width().max(doc.centerline.bounds.height()) / 64.0;

    let points = doc.centerline.points.clone();
    for i in 0..1_000 {
        // jittered offsets from the centerline, plus interior points far
        // enough that the grid walk gives up and scans everything
        let interior = i % 10 == 0;
        let query = if interior {
            Point2D::new(
                rng.gen_range(-0.3 * circumradius..0.3 * circumradius),
                rng.gen_range(-0.3 * circumradius..0.3 * circumradius),
            )
        } else {
            let anchor = points[rng.gen_range(0..points.len())];
            Point2D::new(
                anchor.x + rng.gen_range(-6_000.0..6_000.0),
                anchor.y + rng.gen_range(-6_000.0..6_000.0),
            )
        };
        let fast = doc.index.project_point(
            query,
            &doc.centerline.dlongs,
            doc.centerline.track_length,
        );
        let slow = doc.index.project_point_exhaustive(
            query,
            &doc.centerline.dlongs,
            doc.centerline.track_length,
        );
        match (fast, slow) {
            (Some(a), Some(b)) => {
                let fast_d = a.distance_squared.sqrt();
                let slow_d = b.distance_squared.sqrt();
                assert!(
                    fast_d + 1e-9 >= slow_d,
                    "exhaustive search must never lose: {fast_d} vs {slow_d}"
                );
                let bound = if interior { 1e-6 } else { cell_slack };
                assert!(
                    fast_d - slow_d <= bound,
                    "grid projection off by {} at ({:.0}, {:.0})",
                    fast_d - slow_d,
                    query.x,
                    query.y
                );
            }
            (a, b) => panic!("projection presence mismatch: {a:?} vs {b:?}"),
        }
    }
}

#[test]
fn test_projected_dlong_matches_the_forward_mapping() {
    let doc = TrackDocument::from_sg(common::square_file(60_000)).unwrap();
    let hit = doc.project_point(Point2D::new(45_000.0, -2_000.0)).unwrap();
    assert!((hit.dlong - 45_000.0).abs() < 1.0);
    assert!((hit.point.x - 45_000.0).abs() < 1e-6);
    assert!(hit.point.y.abs() < 1e-6);
}

// ============================================================================
// Ground surface mesh
// ============================================================================

#[test]
fn test_mesh_covers_every_ground_strip() {
    let ring = TrackRing::from_sg(&common::square_file(60_000)).unwrap();
    let profile = ElevationProfile::from_ring(&ring);
    let quads = build_ground_surface_mesh(&ring, &profile, &MeshConfig::default());

    // 4 straight sections, 2 ground strips each, no subdivision
    assert_eq!(quads.len(), 8);
    for quad in &quads {
        let mut area = 0.0;
        for i in 0..4 {
            let p = quad.points[i];
            let q = quad.points[(i + 1) % 4];
            area += p.x * q.y - q.x * p.y;
        }
        assert!(
            area.abs() * 0.5 > 1.0,
            "section {} emitted a collapsed quad",
            quad.section_index
        );
    }
}

// ============================================================================
// Disk round-trip through the document
// ============================================================================

#[test]
fn test_load_save_with_no_edits_is_byte_exact() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("ring.sg");
    let original = common::polygon_file(24, 350_000.0).encode();
    std::fs::write(&path, &original).expect("seed file");

    let mut doc = TrackDocument::open(&path).expect("open");
    let out = dir.path().join("out.sg");
    doc.save(&out).expect("save");

    assert_eq!(
        std::fs::read(&out).expect("read back"),
        original,
        "an unedited document must save byte-identically"
    );
}
