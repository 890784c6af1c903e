//! Planar debug runner: prints kernel results for a handful of scenes.
//!
//! Usage:
//! ```text
//! cargo run --example debug                    # every scene
//! cargo run --example debug -- boolean         # one scene
//! RUST_LOG=planar=trace cargo run --example debug -- offset
//! ```

use std::f64::consts::PI;

use planar::geometry::{Arc, Bezier, Circle, Ellipse, Line, Polygon, Polyline, Shape};
use planar::math::Point2;
use planar::operations::boolean::{polygon_boolean, BooleanOp};
use planar::operations::curve::{closest_point, foot_points, split_bezier, tangency_points};
use planar::operations::intersect::find_intersections;
use planar::operations::offset::{offset_polygon, offset_polyline, EndType, JoinType, LibraryOffset, OffsetOptions};
use planar::operations::query::{distance, is_inside};
use planar::operations::triangulate::{ear_cut, is_convex};

const SCENES: [(&str, fn() -> planar::Result<()>); 5] = [
    ("intersect", intersect_scene),
    ("curve", curve_scene),
    ("boolean", boolean_scene),
    ("offset", offset_scene),
    ("triangulate", triangulate_scene),
];

fn main() -> planar::Result<()> {
    // Default: WARN for everything, INFO for planar.
    // Override with RUST_LOG (e.g. RUST_LOG=planar=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("planar=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let wanted = std::env::args().nth(1);
    for (name, scene) in SCENES {
        if wanted.as_deref().is_none_or(|w| w == name) {
            println!("== {name}");
            scene()?;
        }
    }
    Ok(())
}

fn p(x: f64, y: f64) -> Point2 {
    Point2::new(x, y)
}

fn square(x: f64, y: f64, size: f64) -> Polygon {
    Polygon::new(vec![p(x, y), p(x + size, y), p(x + size, y + size), p(x, y + size)])
}

fn print_polygons(label: &str, polygons: Option<&[Polygon]>) {
    match polygons {
        None => println!("{label}: none"),
        Some(polygons) => {
            for (i, poly) in polygons.iter().enumerate() {
                println!(
                    "{label}[{i}]: {} vertices, area {:.4}{}",
                    poly.vertex_count(),
                    poly.area(),
                    if poly.is_cw() { " (hole)" } else { "" }
                );
            }
        }
    }
}

fn intersect_scene() -> planar::Result<()> {
    let circle: Shape = Circle::new(p(0.0, 0.0), 5.0)?.into();
    let pairs: [(&str, Shape, Shape); 4] = [
        (
            "segment x segment",
            Line::new(p(0.0, 0.0), p(10.0, 0.0)).into(),
            Line::new(p(5.0, -5.0), p(5.0, 5.0)).into(),
        ),
        ("circle x segment", circle.clone(), Line::new(p(-10.0, 0.0), p(10.0, 0.0)).into()),
        ("circle x ellipse", circle, Ellipse::new(p(0.0, 0.0), 7.0, 3.0, 0.4)?.into()),
        (
            "bezier x arc",
            Bezier::new(3, vec![p(-6.0, -2.0), p(-2.0, 8.0), p(2.0, -8.0), p(6.0, 2.0)])?.into(),
            Arc::from_center(p(0.0, 0.0), 4.0, 0.0, PI, true)?.into(),
        ),
    ];
    for (label, a, b) in &pairs {
        let points = find_intersections(a, b);
        println!("{label}: {} point(s)", points.len());
        for q in points {
            println!("  ({:.6}, {:.6})", q.x, q.y);
        }
    }

    let probe = p(1.0, 1.0);
    let ring: Shape = square(0.0, 0.0, 4.0).into();
    println!("distance to square boundary: {:.6}", distance(&probe, &ring));
    println!("inside square: {}", is_inside(&probe, &ring, false));
    Ok(())
}

fn curve_scene() -> planar::Result<()> {
    let curve = Bezier::new(3, vec![p(0.0, 0.0), p(1.0, 3.0), p(3.0, 3.0), p(4.0, 0.0)])?;
    let shape: Shape = curve.clone().into();
    let query = p(2.0, 5.0);

    if let Some(r) = closest_point(&query, &shape) {
        println!("closest: ({:.6}, {:.6}) at t = {:.6}", r.point.x, r.point.y, r.parameter);
    }
    println!("foot points: {:?}", foot_points(&query, &shape));
    println!("tangency points: {:?}", tangency_points(&query, &shape));

    match split_bezier(&curve, 0.3) {
        Some((left, right)) => println!(
            "split at 0.3: {} + {} control points",
            left.control_points().len(),
            right.control_points().len()
        ),
        None => println!("split at 0.3 rejected"),
    }
    Ok(())
}

fn boolean_scene() -> planar::Result<()> {
    let a = square(0.0, 0.0, 10.0);
    let b = square(5.0, 5.0, 10.0);
    for op in [BooleanOp::Union, BooleanOp::Intersection, BooleanOp::Difference, BooleanOp::Xor] {
        print_polygons(&format!("{op:?}"), polygon_boolean(&a, &b, op).as_deref());
    }
    let inner = square(3.0, 3.0, 2.0);
    print_polygons("square minus inner", polygon_boolean(&a, &inner, BooleanOp::Difference).as_deref());
    Ok(())
}

fn offset_scene() -> planar::Result<()> {
    let u = Polygon::new(vec![
        p(0.0, 0.0),
        p(10.0, 0.0),
        p(10.0, 10.0),
        p(6.0, 10.0),
        p(6.0, 2.0),
        p(4.0, 2.0),
        p(4.0, 10.0),
        p(0.0, 10.0),
    ]);
    for d in [-1.5, -0.5, 0.5, 1.5] {
        let result = offset_polygon(&u, d).map(|poly| vec![poly]);
        print_polygons(&format!("miter {d:+}"), result.as_deref());
    }

    let path = Polyline::new(vec![p(0.0, 0.0), p(5.0, 0.0), p(5.0, 5.0), p(9.0, 1.0)]);
    if let Some(left) = offset_polyline(&path, 0.5) {
        println!("polyline left offset: {:?}", left.points);
    }

    for join in [JoinType::Miter, JoinType::Round, JoinType::Square, JoinType::Bevel] {
        let options = OffsetOptions::default().join(join);
        let polygons = LibraryOffset::from_polygon(&u, 1.5, options).execute()?;
        print_polygons(&format!("library {join:?}"), Some(&polygons));
    }
    for end in [EndType::Joined, EndType::Butt, EndType::Square, EndType::Round] {
        let options = OffsetOptions::default().end(end).join(JoinType::Round);
        let polygons = LibraryOffset::from_polyline(&path, 0.5, options).execute()?;
        print_polygons(&format!("stroke {end:?}"), Some(&polygons));
    }
    Ok(())
}

fn triangulate_scene() -> planar::Result<()> {
    let l_shape = Polygon::new(vec![p(0.0, 0.0), p(6.0, 0.0), p(6.0, 2.0), p(2.0, 2.0), p(2.0, 6.0), p(0.0, 6.0)]);
    let triangles = ear_cut(&l_shape);
    println!("L-shape: {} triangles, convex: {}", triangles.len(), is_convex(&l_shape));
    println!("square convex: {}", is_convex(&square(0.0, 0.0, 1.0)));
    Ok(())
}
