//! # Trackgeom: ICR2 Track Geometry Engine
//!
//! A geometry engine for the IndyCar Racing 2 track formats: the editable
//! SG section files and the compiled TRK files the game loads. It parses
//! both byte-exactly, maintains an editable ring of track sections, and
//! derives everything a track editor needs from that ring.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use trackgeom::{Point2D, TrackDocument};
//!
//! # fn main() -> Result<(), trackgeom::DocumentError> {
//! let mut doc = TrackDocument::open(Path::new("track.sg"))?;
//!
//! // Where on the track is this point?
//! if let Some(hit) = doc.project_point(Point2D::new(120_000.0, -4_500.0)) {
//!     println!("DLONG {:.0}, {:.1} units off the centerline",
//!         hit.dlong, hit.distance_squared.sqrt());
//! }
//!
//! // Edit, then write back. An unedited document saves byte-identically.
//! doc.delete_section(3)?;
//! doc.save(Path::new("track.sg"))?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Coordinates
//!
//! Everything lives in the game's fixed-point world units (500 per inch,
//! [`UNITS_PER_FOOT`] = 6000). Longitudinal position along the track is
//! called DLONG; lateral offset from the centerline is DLAT, positive to
//! the left of the direction of travel. On disk both are i32; in memory
//! all geometry is f64 and only persisted values are rounded back.
//!
//! ## Architecture
//!
//! - [`core`]: points, bounds, angle helpers
//! - [`codec`]: SG and TRK binary parsing and serialization
//! - [`section`]: one track section (straight or arc) and its polyline
//! - [`ring`]: the linked section list, DLONG lookup, topology edits
//! - [`solver`]: tangency-preserving circle fitting for curve edits
//! - [`elevation`]: per-column cubic altitude profiles
//! - [`centerline`]: sampled centerline, spatial index, (DLONG, DLAT)
//!   to world mapping
//! - [`surface`]: ground surface quad mesh
//! - [`document`]: the editing session tying all of the above together
//! - [`config`]: tunable tolerances and step sizes
//!
//! ## Data Flow
//!
//! ```text
//!   SG bytes ──decode──► SgFile ──► TrackRing (sections, links, DLONGs)
//!                                       │
//!                          ┌────────────┼──────────────┐
//!                          ▼            ▼              ▼
//!                   ElevationProfile  Centerline   edits (delete,
//!                          │            │ + index   split, drag)
//!                          └────┬───────┘              │
//!                               ▼                      ▼
//!                        getxyz / surface mesh    apply_to_sg ──► SG bytes
//! ```

pub mod centerline;
pub mod codec;
pub mod config;
pub mod core;
pub mod document;
pub mod elevation;
pub mod ring;
pub mod section;
pub mod solver;
pub mod surface;

// Re-export the main editing surface at the crate root
pub use document::{DocumentError, TrackDocument};

pub use centerline::{getxyz, sample_centerline, Centerline, CenterlineIndex, Projection, TrackPoint};
pub use codec::{CodecError, SgFile, TrkFile};
pub use config::{MeshConfig, SamplerConfig, SolverConfig};
pub use core::{Bounds, Point2D, UNITS_PER_FOOT, UNITS_PER_INCH};
pub use elevation::ElevationProfile;
pub use ring::{DlongLookup, SectionPosition, TopologyError, TrackRing};
pub use section::{GeometryError, Section, SectionKind};
pub use solver::{solve_drag, solve_fixed_heading, CurveFit, SolverError};
pub use surface::{build_ground_surface_mesh, mesh_bounds, SurfaceQuad};
