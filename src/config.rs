//! Tunable tolerances and step sizes.
//!
//! All values are plain data with serde defaults so a front end can load
//! overrides from a settings file; the engine itself only ever reads them.

use serde::{Deserialize, Serialize};

mod defaults {
    pub fn fit_tolerance() -> f64 {
        1.0
    }

    pub fn tangency_tolerance() -> f64 {
        1.0e-4
    }

    pub fn min_arc_span() -> f64 {
        1.0e-6
    }

    pub fn sample_step() -> f64 {
        10_000.0
    }

    pub fn grid_target_cells() -> f64 {
        64.0
    }

    pub fn min_quad_area() -> f64 {
        1.0e-3
    }

    pub fn curve_subsection_length() -> f64 {
        60_000.0
    }
}

/// Curve solver tolerances.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Maximum world-unit deviation a drag fit may have from exact
    /// tangency/radius before the fit is rejected.
    #[serde(default = "defaults::fit_tolerance")]
    pub fit_tolerance: f64,
    /// Maximum angular error (radians) between a fixed heading and the
    /// solved tangent.
    #[serde(default = "defaults::tangency_tolerance")]
    pub tangency_tolerance: f64,
    /// Arcs spanning less than this (radians) are rejected as degenerate.
    #[serde(default = "defaults::min_arc_span")]
    pub min_arc_span: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            fit_tolerance: defaults::fit_tolerance(),
            tangency_tolerance: defaults::tangency_tolerance(),
            min_arc_span: defaults::min_arc_span(),
        }
    }
}

/// Centerline sampling parameters.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// DLONG step between centerline samples, in fixed-point units.
    #[serde(default = "defaults::sample_step")]
    pub step: f64,
    /// Target grid cell count along the longer bounding-box axis.
    #[serde(default = "defaults::grid_target_cells")]
    pub grid_target_cells: f64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            step: defaults::sample_step(),
            grid_target_cells: defaults::grid_target_cells(),
        }
    }
}

/// Ground surface mesh parameters.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MeshConfig {
    /// Quads with area below this (world units squared) are dropped.
    #[serde(default = "defaults::min_quad_area")]
    pub min_quad_area: f64,
    /// Target DLONG length of one curve subsection.
    #[serde(default = "defaults::curve_subsection_length")]
    pub curve_subsection_length: f64,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            min_quad_area: defaults::min_quad_area(),
            curve_subsection_length: defaults::curve_subsection_length(),
        }
    }
}
