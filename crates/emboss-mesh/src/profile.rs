//! Closed 2D rings and profiles.

use emboss_math::{Point2, Tolerance};

use crate::{MeshError, Result};

/// A closed polyline in the drawing plane.
///
/// Points are stored without a repeated closing point; the edge from
/// the last point back to the first is implicit.
#[derive(Debug, Clone)]
pub struct Ring {
    /// The ring's vertices in order.
    pub points: Vec<Point2>,
}

impl Ring {
    /// Create a ring from a point list, dropping consecutive
    /// duplicates and a trailing point that repeats the first.
    pub fn new(points: Vec<Point2>) -> Self {
        let tol = Tolerance::DEFAULT;
        let mut cleaned: Vec<Point2> = Vec::with_capacity(points.len());
        for p in points {
            if cleaned.last().map_or(true, |last| !tol.points_equal(last, &p)) {
                cleaned.push(p);
            }
        }
        if cleaned.len() > 1 {
            let first = cleaned[0];
            if tol.points_equal(cleaned.last().unwrap(), &first) {
                cleaned.pop();
            }
        }
        Self { points: cleaned }
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the ring has no vertices.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Signed area by the shoelace formula. Positive for
    /// counter-clockwise winding.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            sum += a.x * b.y - b.x * a.y;
        }
        sum / 2.0
    }

    /// Whether the ring winds counter-clockwise.
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Reverse the winding direction in place.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Whether the ring encloses too little area to fill.
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < 3 || self.signed_area().abs() < Tolerance::DEFAULT.area
    }

    /// Even-odd point containment by ray casting along +X.
    pub fn contains(&self, p: &Point2) -> bool {
        let n = self.points.len();
        let mut inside = false;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Scale every point uniformly about the origin.
    pub fn scale_uniform(&mut self, factor: f64) {
        for p in &mut self.points {
            p.coords *= factor;
        }
    }

    /// Axis-aligned bounds as `(min, max)`.
    pub fn bounds(&self) -> (Point2, Point2) {
        let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in &self.points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        (min, max)
    }
}

/// A fillable region: one outer boundary plus zero or more holes.
///
/// Windings are normalized on construction: the outer ring goes
/// counter-clockwise, holes clockwise. That orientation makes the
/// extruded side walls face outward without per-ring special cases.
#[derive(Debug, Clone)]
pub struct Profile {
    /// Outer boundary, counter-clockwise.
    pub outer: Ring,
    /// Holes, clockwise.
    pub holes: Vec<Ring>,
}

impl Profile {
    /// Create a profile, normalizing windings.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::DegenerateProfile`] if the outer ring or
    /// any hole is degenerate.
    pub fn new(mut outer: Ring, mut holes: Vec<Ring>) -> Result<Self> {
        if outer.is_degenerate() {
            return Err(MeshError::DegenerateProfile(format!(
                "outer ring has {} points, area {:.3e}",
                outer.len(),
                outer.signed_area()
            )));
        }
        if !outer.is_ccw() {
            outer.reverse();
        }
        for (i, hole) in holes.iter_mut().enumerate() {
            if hole.is_degenerate() {
                return Err(MeshError::DegenerateProfile(format!("hole ring {i}")));
            }
            if hole.is_ccw() {
                hole.reverse();
            }
        }
        Ok(Self { outer, holes })
    }

    /// Total number of vertices over all rings.
    pub fn vertex_count(&self) -> usize {
        self.outer.len() + self.holes.iter().map(Ring::len).sum::<usize>()
    }

    /// Scale the whole profile uniformly about the origin.
    ///
    /// The factor must be positive; a negative factor would flip the
    /// normalized windings.
    pub fn scale_uniform(&mut self, factor: f64) {
        self.outer.scale_uniform(factor);
        for hole in &mut self.holes {
            hole.scale_uniform(factor);
        }
    }

    /// Axis-aligned bounds of the outer boundary as `(min, max)`.
    pub fn bounds(&self) -> (Point2, Point2) {
        self.outer.bounds()
    }
}

/// Group loose rings into profiles by containment parity.
///
/// A ring contained in an even number of other rings is an outer
/// boundary; a ring at odd depth becomes a hole of its innermost
/// even-depth container. Degenerate rings are dropped. This mirrors
/// the even-odd fill rule the drawing was authored under.
pub fn group_rings(rings: Vec<Ring>) -> Result<Vec<Profile>> {
    let rings: Vec<Ring> = rings.into_iter().filter(|r| !r.is_degenerate()).collect();
    if rings.is_empty() {
        return Ok(Vec::new());
    }

    // Nesting depth of each ring: how many other rings contain its
    // first vertex.
    let depths: Vec<usize> = rings
        .iter()
        .enumerate()
        .map(|(i, ring)| {
            let probe = ring.points[0];
            rings
                .iter()
                .enumerate()
                .filter(|(j, other)| *j != i && other.contains(&probe))
                .count()
        })
        .collect();

    let mut outers: Vec<(usize, Ring)> = Vec::new();
    let mut holes: Vec<Ring> = Vec::new();
    for (ring, &depth) in rings.into_iter().zip(&depths) {
        if depth % 2 == 0 {
            outers.push((depth, ring));
        } else {
            holes.push(ring);
        }
    }

    // Assign each hole to the smallest-area outer that contains it.
    let mut hole_sets: Vec<Vec<Ring>> = vec![Vec::new(); outers.len()];
    for hole in holes {
        let probe = hole.points[0];
        let mut owner: Option<(usize, f64)> = None;
        for (idx, (_, outer)) in outers.iter().enumerate() {
            if !outer.contains(&probe) {
                continue;
            }
            let area = outer.signed_area().abs();
            if owner.map_or(true, |(_, best)| area < best) {
                owner = Some((idx, area));
            }
        }
        if let Some((idx, _)) = owner {
            hole_sets[idx].push(hole);
        }
        // An odd-depth ring always has a container; nothing to do
        // otherwise.
    }

    outers
        .into_iter()
        .zip(hole_sets)
        .map(|((_, outer), holes)| Profile::new(outer, holes))
        .collect()
}
