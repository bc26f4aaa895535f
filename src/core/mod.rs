//! Fundamental geometry types shared across the crate.

pub mod bounds;
pub mod math;
pub mod point;

pub use bounds::Bounds;
pub use point::{Point2D, UNITS_PER_FOOT, UNITS_PER_INCH};
