//! Path tree traversal and curve flattening.

use emboss_math::Point2;
use emboss_mesh::Ring;
use tracing::debug;
use usvg::tiny_skia_path::PathSegment;

use crate::ImportOptions;

/// Walk a resolved usvg group and flatten every path into rings.
///
/// Subpaths that are not explicitly closed are closed for fill
/// purposes, matching how a fill operation treats an open boundary.
pub(crate) fn collect_rings(group: &usvg::Group, options: &ImportOptions) -> Vec<Ring> {
    let mut rings = Vec::new();
    walk(group, options, &mut rings);
    debug!(rings = rings.len(), "flattened SVG paths");
    rings
}

fn walk(group: &usvg::Group, options: &ImportOptions, rings: &mut Vec<Ring>) {
    for node in group.children() {
        match node {
            usvg::Node::Group(g) => walk(g, options, rings),
            usvg::Node::Path(path) => flatten_path(path, options, rings),
            // Text is pre-converted to outline groups by usvg.
            usvg::Node::Text(text) => walk(text.flattened(), options, rings),
            usvg::Node::Image(_) => {}
        }
    }
}

fn flatten_path(path: &usvg::Path, options: &ImportOptions, rings: &mut Vec<Ring>) {
    // Path data is stored in local coordinates; bake in the absolute
    // transform. A non-invertible transform collapses the path.
    let Some(data) = path.data().clone().transform(path.abs_transform()) else {
        return;
    };

    let segments = options.curve_segments.max(1);
    let mut current: Vec<Point2> = Vec::new();

    for segment in data.segments() {
        match segment {
            PathSegment::MoveTo(p) => {
                flush(&mut current, rings);
                current.push(to_point(p));
            }
            PathSegment::LineTo(p) => current.push(to_point(p)),
            PathSegment::QuadTo(c, p) => {
                let p0 = last_or_origin(&current);
                let (c, p) = (to_point(c), to_point(p));
                for i in 1..=segments {
                    let t = i as f64 / segments as f64;
                    current.push(quad_at(p0, c, p, t));
                }
            }
            PathSegment::CubicTo(c1, c2, p) => {
                let p0 = last_or_origin(&current);
                let (c1, c2, p) = (to_point(c1), to_point(c2), to_point(p));
                for i in 1..=segments {
                    let t = i as f64 / segments as f64;
                    current.push(cubic_at(p0, c1, c2, p, t));
                }
            }
            PathSegment::Close => flush(&mut current, rings),
        }
    }
    flush(&mut current, rings);
}

fn flush(current: &mut Vec<Point2>, rings: &mut Vec<Ring>) {
    if !current.is_empty() {
        rings.push(Ring::new(std::mem::take(current)));
    }
}

/// Map an SVG point (y-down) to the modeling plane (y-up).
fn to_point(p: usvg::tiny_skia_path::Point) -> Point2 {
    Point2::new(p.x as f64, -(p.y as f64))
}

fn last_or_origin(points: &[Point2]) -> Point2 {
    points.last().copied().unwrap_or_else(Point2::origin)
}

fn quad_at(p0: Point2, c: Point2, p1: Point2, t: f64) -> Point2 {
    let u = 1.0 - t;
    Point2::new(
        u * u * p0.x + 2.0 * u * t * c.x + t * t * p1.x,
        u * u * p0.y + 2.0 * u * t * c.y + t * t * p1.y,
    )
}

fn cubic_at(p0: Point2, c1: Point2, c2: Point2, p1: Point2, t: f64) -> Point2 {
    let u = 1.0 - t;
    let (uu, tt) = (u * u, t * t);
    Point2::new(
        u * uu * p0.x + 3.0 * uu * t * c1.x + 3.0 * u * tt * c2.x + t * tt * p1.x,
        u * uu * p0.y + 3.0 * uu * t * c1.y + 3.0 * u * tt * c2.y + t * tt * p1.y,
    )
}
