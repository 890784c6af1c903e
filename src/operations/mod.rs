pub mod boolean;
pub mod curve;
pub mod intersect;
pub mod offset;
pub mod query;
pub mod triangulate;
