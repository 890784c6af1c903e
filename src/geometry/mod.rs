pub mod aabb;
pub mod curve;
pub mod polygon;
pub mod polyline;
pub mod shape;
pub mod triangle;

pub use aabb::AabbRect;
pub use curve::{Arc, BSpline, Bezier, Circle, Curve, CurveDomain, Ellipse, Line, SplineKind};
pub use polygon::Polygon;
pub use polyline::Polyline;
pub use shape::{Shape, ShapeKind};
pub use triangle::Triangle;
