use std::f64::consts::{FRAC_PI_2, PI};

use i_overlay::mesh::outline::offset::OutlineOffset;
use i_overlay::mesh::stroke::offset::StrokeOffset;
use i_overlay::mesh::style::{LineCap, LineJoin, OutlineStyle, StrokeStyle};
use tracing::debug;

use crate::error::{OperationError, Result};
use crate::geometry::{Polygon, Polyline};
use crate::math::polygon_2d::{dedup_points, open_ring, signed_area_2d};
use crate::math::{Point2, EPSILON, OFFSET_SCALE};

/// Corner style of the library offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    /// Sharp corners, cut back to a bevel beyond the miter limit.
    #[default]
    Miter,
    /// Arc corners.
    Round,
    /// Corners sharper than a right angle are squared off.
    Square,
    /// Corners cut straight across.
    Bevel,
}

/// How the library offset treats path ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndType {
    /// Paths are closed rings offset as filled areas.
    #[default]
    Polygon,
    /// Paths are closed rings offset as bands on both sides of the line.
    Joined,
    /// Open paths with flat ends at the endpoints.
    Butt,
    /// Open paths extended by the offset distance past the endpoints.
    Square,
    /// Open paths with semicircular ends.
    Round,
}

impl EndType {
    fn is_open(self) -> bool {
        matches!(self, Self::Butt | Self::Square | Self::Round)
    }
}

/// Options for [`LibraryOffset`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetOptions {
    pub join: JoinType,
    pub end: EndType,
    /// Largest miter length as a multiple of the offset distance.
    pub miter_limit: f64,
    /// Largest distance between a round join or cap and its true arc.
    pub arc_tolerance: f64,
}

impl Default for OffsetOptions {
    fn default() -> Self {
        Self {
            join: JoinType::Miter,
            end: EndType::Polygon,
            miter_limit: 2.0,
            arc_tolerance: 0.01,
        }
    }
}

impl OffsetOptions {
    #[must_use]
    pub fn join(mut self, join: JoinType) -> Self {
        self.join = join;
        self
    }

    #[must_use]
    pub fn end(mut self, end: EndType) -> Self {
        self.end = end;
        self
    }

    #[must_use]
    pub fn miter_limit(mut self, miter_limit: f64) -> Self {
        self.miter_limit = miter_limit;
        self
    }

    #[must_use]
    pub fn arc_tolerance(mut self, arc_tolerance: f64) -> Self {
        self.arc_tolerance = arc_tolerance;
        self
    }
}

/// Offsets paths through the `i_overlay` outline and stroke builders.
///
/// Unlike the miter offset this always yields simple, non-overlapping
/// contours, at the price of vertex placement chosen by the library.
/// Input coordinates are quantized to a `1 / OFFSET_SCALE` grid first.
///
/// # Sign convention
///
/// With [`EndType::Polygon`], counter-clockwise paths are outer boundaries
/// and clockwise paths holes; a positive distance grows the filled area.
/// The other end types offset by `|distance|` on both sides of each path.
///
/// Results are outer boundaries (counter-clockwise) followed by their holes
/// (clockwise), shape by shape.
#[derive(Debug, Clone)]
pub struct LibraryOffset {
    paths: Vec<Vec<Point2>>,
    distance: f64,
    options: OffsetOptions,
}

impl LibraryOffset {
    #[must_use]
    pub fn new(paths: Vec<Vec<Point2>>, distance: f64, options: OffsetOptions) -> Self {
        Self {
            paths,
            distance,
            options,
        }
    }

    /// Offset of a single polygon. The polygon is taken as an outer boundary
    /// whatever its orientation.
    #[must_use]
    pub fn from_polygon(polygon: &Polygon, distance: f64, options: OffsetOptions) -> Self {
        Self::new(vec![polygon.oriented(false).vertices().to_vec()], distance, options)
    }

    #[must_use]
    pub fn from_polyline(polyline: &Polyline, distance: f64, options: OffsetOptions) -> Self {
        Self::new(vec![polyline.points.clone()], distance, options)
    }

    /// Runs the offset.
    ///
    /// A polygon offset that shrinks every contour away yields an empty
    /// list, as does a zero distance on open paths.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if there are no paths, a path
    /// has too few distinct points for its end type, or the distance or
    /// options are not finite and positive where required.
    pub fn execute(&self) -> Result<Vec<Polygon>> {
        self.validate()?;
        let closed = !self.options.end.is_open();
        let paths: Vec<Vec<[f64; 2]>> = self.paths.iter().map(|p| quantized(p, closed)).collect();
        let min_points = if closed { 3 } else { 2 };
        if let Some(short) = paths.iter().find(|p| p.len() < min_points) {
            return Err(OperationError::InvalidInput(format!(
                "offset path has {} distinct points, at least {min_points} required",
                short.len()
            ))
            .into());
        }

        let d = self.distance;
        let shapes: Vec<Vec<Vec<[f64; 2]>>> = match self.options.end {
            EndType::Polygon if d.abs() < EPSILON => {
                return Ok(paths.iter().map(|p| to_polygon(p, is_hole(p))).collect());
            }
            EndType::Polygon => {
                // The library takes outer boundaries clockwise.
                let rings: Vec<Vec<[f64; 2]>> = paths.into_iter().map(|p| p.into_iter().rev().collect()).collect();
                let style = OutlineStyle::new(d).line_join(self.line_join(d.abs()));
                rings.outline(style)
            }
            _ if d.abs() < EPSILON => return Ok(Vec::new()),
            end => {
                let style: StrokeStyle<[f64; 2], f64> = StrokeStyle::new(2.0 * d.abs())
                    .line_join(self.line_join(d.abs()))
                    .start_cap(self.line_cap(end, d.abs()))
                    .end_cap(self.line_cap(end, d.abs()));
                paths.stroke(style, closed)
            }
        };

        let polygons: Vec<Polygon> = shapes
            .iter()
            .flat_map(|shape| shape.iter().enumerate().map(|(k, contour)| to_polygon(contour, k > 0)))
            .filter(|p| !p.is_empty())
            .collect();
        debug!(
            end = ?self.options.end,
            join = ?self.options.join,
            shapes = shapes.len(),
            contours = polygons.len(),
            "library offset"
        );
        Ok(polygons)
    }

    fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| -> Result<()> { Err(OperationError::InvalidInput(msg.to_owned()).into()) };
        if self.paths.is_empty() {
            return invalid("no paths to offset");
        }
        if !self.distance.is_finite() {
            return invalid("offset distance must be finite");
        }
        if !(self.options.miter_limit.is_finite() && self.options.miter_limit >= 1.0) {
            return invalid("miter limit must be at least 1");
        }
        if !(self.options.arc_tolerance.is_finite() && self.options.arc_tolerance > 0.0) {
            return invalid("arc tolerance must be positive");
        }
        Ok(())
    }

    fn line_join(&self, radius: f64) -> LineJoin<f64> {
        match self.options.join {
            // Corners sharper than this angle would exceed the miter limit.
            JoinType::Miter => LineJoin::Miter(2.0 * (1.0 / self.options.miter_limit).asin()),
            JoinType::Square => LineJoin::Miter(FRAC_PI_2),
            JoinType::Round => LineJoin::Round(self.arc_step(radius)),
            JoinType::Bevel => LineJoin::Bevel,
        }
    }

    fn line_cap(&self, end: EndType, radius: f64) -> LineCap<[f64; 2], f64> {
        match end {
            EndType::Square => LineCap::Square,
            EndType::Round => LineCap::Round(self.arc_step(radius)),
            _ => LineCap::Butt,
        }
    }

    /// Angle subtended by one chord of an arc of `radius` whose sagitta
    /// equals the arc tolerance.
    fn arc_step(&self, radius: f64) -> f64 {
        let ratio = (self.options.arc_tolerance / radius).min(1.0);
        (2.0 * (1.0 - ratio).acos()).min(PI)
    }
}

fn quantize(v: f64) -> f64 {
    (v * OFFSET_SCALE).round() / OFFSET_SCALE
}

/// Path snapped to the offset grid, without repeated points. Closed paths
/// also lose a repeated closing point.
fn quantized(path: &[Point2], closed: bool) -> Vec<[f64; 2]> {
    let snapped: Vec<Point2> = path.iter().map(|p| Point2::new(quantize(p.x), quantize(p.y))).collect();
    let mut points = dedup_points(&snapped);
    if closed {
        points = open_ring(&points);
    }
    points.iter().map(|p| [p.x, p.y]).collect()
}

fn is_hole(path: &[[f64; 2]]) -> bool {
    let pts: Vec<Point2> = path.iter().map(|p| Point2::new(p[0], p[1])).collect();
    signed_area_2d(&pts) < 0.0
}

fn to_polygon(contour: &[[f64; 2]], hole: bool) -> Polygon {
    Polygon::new(contour.iter().map(|p| Point2::new(p[0], p[1])).collect()).oriented(hole)
}
