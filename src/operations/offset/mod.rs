//! Offsetting: the miter offset for polylines, polygons and circular
//! shapes, and a library-backed offset with configurable joins and ends.

mod library;
mod miter;
mod trim;

pub use library::{EndType, JoinType, LibraryOffset, OffsetOptions};
pub use miter::{offset_arc, offset_circle, offset_polygon, offset_polyline};
