pub mod distance_2d;
pub mod intersect_2d;
pub mod newton;
pub mod polygon_2d;
pub mod refine;
pub mod simplify;
pub mod vector_2d;

pub use vector_2d::{
    angle_of, cross, from_coord, is_same_point, lerp, normalize_angle, orient, rotate, to_coord,
};

/// 2D point type. Also used as a position vector where the kernel mixes the two.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 2x2 matrix used by the Newton solvers.
pub type Matrix2 = nalgebra::Matrix2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const EPSILON: f64 = 1e-10;

/// Absolute slack applied when testing whether a computed crossing lies
/// within a finite segment.
pub const SEGMENT_TOLERANCE: f64 = 5e-14;

/// Scale applied to coordinates handed to the polygon offsetting library.
pub const OFFSET_SCALE: f64 = 1e8;
