//! Linear extrusion of a filled profile into a closed solid.

use emboss_math::Point3;
use tracing::debug;

use crate::{fill_profile, ExtrudeParams, MeshError, Profile, Result, TriangleMesh};

/// Extrude a profile along +Z into a watertight solid spanning
/// `z ∈ [0, height]`.
///
/// The bottom cap is the fill triangulation wound downward, the top
/// cap the same triangulation wound upward, and each boundary edge
/// contributes one side quad (two triangles). The profile's winding
/// convention (outer counter-clockwise, holes clockwise) makes all
/// side normals point out of the solid.
///
/// # Errors
///
/// Returns [`MeshError::InvalidHeight`] for a non-positive height, or
/// a fill error for profiles that cannot be triangulated.
///
/// # Example
///
/// ```
/// use emboss_math::Point2;
/// use emboss_mesh::{extrude_profile, ExtrudeParams, Profile, Ring};
///
/// let tri = Ring::new(vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(4.0, 0.0),
///     Point2::new(2.0, 3.0),
/// ]);
/// let profile = Profile::new(tri, vec![]).unwrap();
/// let solid = extrude_profile(&profile, &ExtrudeParams { height: 2.0 }).unwrap();
/// // 2 caps + 3 side quads
/// assert_eq!(solid.num_triangles(), 2 + 6);
/// ```
pub fn extrude_profile(profile: &Profile, params: &ExtrudeParams) -> Result<TriangleMesh> {
    if params.height <= 0.0 {
        return Err(MeshError::InvalidHeight(params.height));
    }

    let cap = fill_profile(profile)?;
    let v = profile.vertex_count() as u32;

    let mut mesh = TriangleMesh::new();
    mesh.vertices.reserve(2 * v as usize * 3);
    mesh.indices.reserve((2 * cap.len() + 2 * v as usize) * 3);

    // Bottom ring vertices at z = 0, in fill order (outer, then holes).
    for ring in std::iter::once(&profile.outer).chain(&profile.holes) {
        for p in &ring.points {
            mesh.push_vertex(Point3::new(p.x, p.y, 0.0));
        }
    }
    // Top ring vertices at z = height, same order.
    for i in 0..v as usize {
        let p = mesh.vertex(i);
        mesh.push_vertex(Point3::new(p.x, p.y, params.height));
    }

    // Caps: fill winding is counter-clockwise from +Z, so the top cap
    // uses it as-is and the bottom cap reversed.
    for [a, b, c] in &cap {
        mesh.push_triangle(*a, *c, *b);
    }
    for [a, b, c] in &cap {
        mesh.push_triangle(a + v, b + v, c + v);
    }

    // Side walls, one quad per boundary edge.
    let mut offset = 0u32;
    for ring in std::iter::once(&profile.outer).chain(&profile.holes) {
        let n = ring.len() as u32;
        for i in 0..n {
            let b_i = offset + i;
            let b_next = offset + (i + 1) % n;
            mesh.push_triangle(b_i, b_next, b_next + v);
            mesh.push_triangle(b_i, b_next + v, b_i + v);
        }
        offset += n;
    }

    debug!(
        vertices = mesh.num_vertices(),
        triangles = mesh.num_triangles(),
        height = params.height,
        "extruded profile"
    );
    Ok(mesh)
}
