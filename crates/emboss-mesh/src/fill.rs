//! Profile fill: ear-clipping triangulation with hole bridging.
//!
//! Holes are merged into the outer boundary by inserting a zero-width
//! bridge between each hole and the closest boundary vertex, then the
//! merged simple polygon is ear-clipped. Because the outer ring winds
//! counter-clockwise and holes clockwise, the merged polygon stays
//! counter-clockwise and every output triangle faces +Z.

use std::collections::HashSet;

use emboss_math::Point2;
use tracing::debug;

use crate::{MeshError, Profile, Result};

/// Triangulate a profile.
///
/// Returned triangles index into the profile's concatenated vertex
/// list: outer ring points first, then each hole's points in order.
/// Winding is counter-clockwise viewed from +Z.
///
/// # Errors
///
/// Returns [`MeshError::DegenerateProfile`] if ear-clipping cannot
/// make progress (self-intersecting input).
pub fn fill_profile(profile: &Profile) -> Result<Vec<[u32; 3]>> {
    // Concatenated vertex list and the start offset of each hole.
    let mut verts: Vec<Point2> = profile.outer.points.clone();
    let mut hole_starts: Vec<usize> = Vec::with_capacity(profile.holes.len());
    for hole in &profile.holes {
        hole_starts.push(verts.len());
        verts.extend_from_slice(&hole.points);
    }

    // The polygon under construction, as indices into `verts`.
    let mut poly: Vec<usize> = (0..profile.outer.len()).collect();

    // Polygon vertices already serving as a bridge endpoint. Routing
    // two bridges through the same vertex creates coincident edges
    // that can stall ear clipping.
    let mut used_bridges: HashSet<usize> = HashSet::new();

    for (hole, &start) in profile.holes.iter().zip(&hole_starts) {
        let n = hole.len();

        // Closest (hole vertex, polygon vertex) pair becomes the
        // bridge, preferring polygon vertices no earlier bridge uses.
        let mut best = (f64::INFINITY, 0usize, 0usize); // (dist2, hole_idx, poly_pos)
        let mut best_unused = (f64::INFINITY, 0usize, 0usize);
        for h in 0..n {
            let hp = verts[start + h];
            for (pos, &pi) in poly.iter().enumerate() {
                let d = (verts[pi] - hp).norm_squared();
                if d < best.0 {
                    best = (d, h, pos);
                }
                if d < best_unused.0 && !used_bridges.contains(&pi) {
                    best_unused = (d, h, pos);
                }
            }
        }
        let (_, bridge_hole, bridge_pos) = if best_unused.0.is_finite() {
            best_unused
        } else {
            best
        };
        used_bridges.insert(poly[bridge_pos]);

        // Splice the hole loop in after the bridge vertex, walking the
        // hole from its bridge point and returning over the bridge.
        let hole_loop: Vec<usize> = (0..n).map(|i| start + (bridge_hole + i) % n).collect();
        used_bridges.insert(hole_loop[0]);
        let bridge_outer = poly[bridge_pos];
        let mut merged = Vec::with_capacity(poly.len() + n + 2);
        merged.extend_from_slice(&poly[..=bridge_pos]);
        merged.extend_from_slice(&hole_loop);
        merged.push(hole_loop[0]);
        merged.push(bridge_outer);
        merged.extend_from_slice(&poly[bridge_pos + 1..]);
        poly = merged;
    }

    ear_clip(&verts, poly)
}

fn ear_clip(verts: &[Point2], mut poly: Vec<usize>) -> Result<Vec<[u32; 3]>> {
    let mut triangles = Vec::with_capacity(poly.len().saturating_sub(2));

    while poly.len() > 3 {
        let n = poly.len();
        let mut clipped = false;

        for i in 0..n {
            let prev = (i + n - 1) % n;
            let next = (i + 1) % n;
            let a = verts[poly[prev]];
            let b = verts[poly[i]];
            let c = verts[poly[next]];

            // Convex corner of a counter-clockwise polygon.
            let cross = (b - a).x * (c - a).y - (b - a).y * (c - a).x;
            if cross <= 0.0 {
                continue;
            }

            // No other polygon vertex may lie inside the candidate ear.
            let blocked = (0..n).any(|j| {
                j != prev
                    && j != i
                    && j != next
                    && point_in_triangle(verts[poly[j]], a, b, c)
            });
            if blocked {
                continue;
            }

            triangles.push([poly[prev] as u32, poly[i] as u32, poly[next] as u32]);
            poly.remove(i);
            clipped = true;
            break;
        }

        if !clipped {
            debug!(remaining = poly.len(), "ear clipping stalled");
            return Err(MeshError::DegenerateProfile(
                "ear clipping stalled; boundary may self-intersect".into(),
            ));
        }
    }

    if poly.len() == 3 {
        triangles.push([poly[0] as u32, poly[1] as u32, poly[2] as u32]);
    }

    Ok(triangles)
}

/// Barycentric point-in-triangle test, open on the boundary so bridge
/// vertices shared between loops are not treated as blockers.
fn point_in_triangle(p: Point2, a: Point2, b: Point2, c: Point2) -> bool {
    let v0 = c - a;
    let v1 = b - a;
    let v2 = p - a;

    let dot00 = v0.dot(&v0);
    let dot01 = v0.dot(&v1);
    let dot02 = v0.dot(&v2);
    let dot11 = v1.dot(&v1);
    let dot12 = v1.dot(&v2);

    let denom = dot00 * dot11 - dot01 * dot01;
    if denom.abs() < 1e-30 {
        return false;
    }
    let inv = 1.0 / denom;
    let u = (dot11 * dot02 - dot01 * dot12) * inv;
    let v = (dot00 * dot12 - dot01 * dot02) * inv;

    let eps = 1e-10;
    u > eps && v > eps && (u + v) < 1.0 - eps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Ring;

    fn ring(points: &[(f64, f64)]) -> Ring {
        Ring::new(points.iter().map(|&(x, y)| Point2::new(x, y)).collect())
    }

    fn triangle_area(verts: &[Point2], t: &[u32; 3]) -> f64 {
        let a = verts[t[0] as usize];
        let b = verts[t[1] as usize];
        let c = verts[t[2] as usize];
        ((b - a).x * (c - a).y - (b - a).y * (c - a).x) / 2.0
    }

    fn profile_verts(profile: &Profile) -> Vec<Point2> {
        let mut v = profile.outer.points.clone();
        for h in &profile.holes {
            v.extend_from_slice(&h.points);
        }
        v
    }

    #[test]
    fn test_fill_square() {
        let profile = Profile::new(
            ring(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]),
            vec![],
        )
        .unwrap();
        let tris = fill_profile(&profile).unwrap();
        assert_eq!(tris.len(), 2);

        let verts = profile_verts(&profile);
        let area: f64 = tris.iter().map(|t| triangle_area(&verts, t)).sum();
        assert!((area - 16.0).abs() < 1e-9);
        // All triangles wound counter-clockwise.
        assert!(tris.iter().all(|t| triangle_area(&verts, t) > 0.0));
    }

    #[test]
    fn test_fill_concave() {
        // An L-shape: fan triangulation would produce triangles
        // outside the boundary, ear clipping must not.
        let profile = Profile::new(
            ring(&[
                (0.0, 0.0),
                (4.0, 0.0),
                (4.0, 2.0),
                (2.0, 2.0),
                (2.0, 4.0),
                (0.0, 4.0),
            ]),
            vec![],
        )
        .unwrap();
        let tris = fill_profile(&profile).unwrap();
        assert_eq!(tris.len(), 4);

        let verts = profile_verts(&profile);
        let area: f64 = tris.iter().map(|t| triangle_area(&verts, t)).sum();
        assert!((area - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_fill_square_with_hole() {
        let profile = Profile::new(
            ring(&[(-5.0, -5.0), (5.0, -5.0), (5.0, 5.0), (-5.0, 5.0)]),
            vec![ring(&[(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)])],
        )
        .unwrap();
        let tris = fill_profile(&profile).unwrap();

        let verts = profile_verts(&profile);
        let area: f64 = tris.iter().map(|t| triangle_area(&verts, t)).sum();
        assert!((area - 96.0).abs() < 1e-9, "area was {area}");
        assert!(tris.iter().all(|t| triangle_area(&verts, t) >= 0.0));
    }

    #[test]
    fn test_fill_two_holes() {
        let profile = Profile::new(
            ring(&[(-10.0, -5.0), (10.0, -5.0), (10.0, 5.0), (-10.0, 5.0)]),
            vec![
                ring(&[(-6.0, -1.0), (-4.0, -1.0), (-4.0, 1.0), (-6.0, 1.0)]),
                ring(&[(4.0, -1.0), (6.0, -1.0), (6.0, 1.0), (4.0, 1.0)]),
            ],
        )
        .unwrap();
        let tris = fill_profile(&profile).unwrap();

        let verts = profile_verts(&profile);
        let area: f64 = tris.iter().map(|t| triangle_area(&verts, t)).sum();
        assert!((area - 192.0).abs() < 1e-9, "area was {area}");
    }

    #[test]
    fn test_fill_holes_crowding_one_corner() {
        // Both holes sit near the origin corner, so the closest
        // boundary vertex for the second bridge is already taken by
        // the first. The bridges must route through distinct vertices.
        let profile = Profile::new(
            ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]),
            vec![
                ring(&[(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 2.0)]),
                ring(&[(1.0, 0.2), (2.0, 0.2), (2.0, 0.8), (1.0, 0.8)]),
            ],
        )
        .unwrap();
        let tris = fill_profile(&profile).unwrap();

        let verts = profile_verts(&profile);
        let area: f64 = tris.iter().map(|t| triangle_area(&verts, t)).sum();
        assert!((area - 98.4).abs() < 1e-9, "area was {area}");
        assert!(tris.iter().all(|t| triangle_area(&verts, t) >= 0.0));
    }
}
