//! Shared builders for the integration tests.
//!
//! All tracks built here are closed loops with reciprocal links, zeroed
//! elevation, and headings encoded the way the SG format stores them
//! (unit sin/cos scaled by 2^30).

use trackgeom::codec::sg::{SECTION_TYPE_STRAIGHT, SgHeader, SgSection};
use trackgeom::codec::{SgFile, SgFsect};

/// Scale for the on-disk heading sin/cos integers.
pub const HEADING_SCALE: f64 = (1i64 << 30) as f64;

pub fn heading_words(dx: f64, dy: f64) -> (i32, i32) {
    let len = (dx * dx + dy * dy).sqrt();
    (
        (dx / len * HEADING_SCALE).round() as i32,
        (dy / len * HEADING_SCALE).round() as i32,
    )
}

/// A standard two-strip lane: asphalt left of center, grass right, with
/// a wall boundary outside.
pub fn standard_fsects() -> Vec<SgFsect> {
    vec![
        SgFsect {
            ftype1: 0,
            ftype2: 0,
            fstart: -9_000,
            fend: 0,
        },
        SgFsect {
            ftype1: 2,
            ftype2: 0,
            fstart: 0,
            fend: 9_000,
        },
        SgFsect {
            ftype1: 100,
            ftype2: 0,
            fstart: 10_000,
            fend: 10_000,
        },
    ]
}

/// Closed ring of `n` straight sections tracing a regular n-gon of the
/// given circumradius. Useful for exercising many-section code paths.
pub fn polygon_file(n: usize, circumradius: f64) -> SgFile {
    assert!(n >= 3);
    let vertex = |i: usize| {
        let angle = std::f64::consts::TAU * (i % n) as f64 / n as f64;
        (circumradius * angle.cos(), circumradius * angle.sin())
    };

    let mut sections = Vec::with_capacity(n);
    let mut dlong = 0i64;
    for i in 0..n {
        let (sx, sy) = vertex(i);
        let (ex, ey) = vertex(i + 1);
        let (h1, h2) = heading_words(ex - sx, ey - sy);
        let length = ((ex - sx).hypot(ey - sy)).round() as i32;
        sections.push(SgSection {
            section_type: SECTION_TYPE_STRAIGHT,
            next: ((i + 1) % n) as i32,
            prev: ((i + n - 1) % n) as i32,
            start_x: sx.round() as i32,
            start_y: sy.round() as i32,
            end_x: ex.round() as i32,
            end_y: ey.round() as i32,
            start_dlong: dlong as i32,
            length,
            center_x: 0,
            center_y: 0,
            sang1: h1,
            sang2: h2,
            eang1: h1,
            eang2: h2,
            radius: 0,
            num1: 0,
            alt: vec![0, 0, 0],
            grade: vec![0, 0, 0],
            fsects: standard_fsects(),
        });
        dlong += length as i64;
    }

    SgFile {
        header: SgHeader {
            file_type: 1,
            unknown: [0, 0, 0],
            num_sects: n as i32,
            num_xsects: 3,
        },
        xsect_dlats: vec![-9_000, 0, 9_000],
        sections,
    }
}

/// Four-section square ring with side length `side`.
pub fn square_file(side: i32) -> SgFile {
    let corners = [(0, 0), (side, 0), (side, side), (0, side)];
    let mut sections = Vec::with_capacity(4);
    for i in 0..4 {
        let (sx, sy) = corners[i];
        let (ex, ey) = corners[(i + 1) % 4];
        let (h1, h2) = heading_words((ex - sx) as f64, (ey - sy) as f64);
        sections.push(SgSection {
            section_type: SECTION_TYPE_STRAIGHT,
            next: ((i + 1) % 4) as i32,
            prev: ((i + 3) % 4) as i32,
            start_x: sx,
            start_y: sy,
            end_x: ex,
            end_y: ey,
            start_dlong: i as i32 * side,
            length: side,
            center_x: 0,
            center_y: 0,
            sang1: h1,
            sang2: h2,
            eang1: h1,
            eang2: h2,
            radius: 0,
            num1: 0,
            alt: vec![0, 0, 0],
            grade: vec![0, 0, 0],
            fsects: standard_fsects(),
        });
    }
    SgFile {
        header: SgHeader {
            file_type: 1,
            unknown: [0, 0, 0],
            num_sects: 4,
            num_xsects: 3,
        },
        xsect_dlats: vec![-9_000, 0, 9_000],
        sections,
    }
}
