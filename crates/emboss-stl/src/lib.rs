#![warn(missing_docs)]

//! STL export for emboss triangle meshes.
//!
//! Writes binary STL (80-byte header, u32 triangle count, 50-byte
//! facet records, little-endian) or ASCII STL. An optional global
//! transform carries the export axis conversion; the pipeline passes
//! the identity Y-forward/Z-up conversion at unit scale.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;
use tracing::info;

use emboss_math::{Point3, Transform, Vec3};
use emboss_mesh::{MeshError, TriangleMesh};

/// Errors from STL export.
#[derive(Debug, Error)]
pub enum StlError {
    /// Writing the output failed.
    #[error("failed to write STL: {0}")]
    Io(#[from] std::io::Error),

    /// The mesh has nothing to export.
    #[error("{0}")]
    Mesh(#[from] MeshError),
}

/// Result type for STL export.
pub type Result<T> = std::result::Result<T, StlError>;

/// Output flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StlFormat {
    /// Compact binary STL (the exporter default).
    #[default]
    Binary,
    /// Human-readable ASCII STL.
    Ascii,
}

/// Write a mesh to `path`, creating or truncating the file.
///
/// # Errors
///
/// Fails on I/O errors or if the mesh is empty.
pub fn export_stl(
    path: &Path,
    mesh: &TriangleMesh,
    format: StlFormat,
    global: &Transform,
) -> Result<()> {
    if mesh.num_triangles() == 0 {
        return Err(StlError::Mesh(MeshError::EmptyMesh));
    }
    let mut out = BufWriter::new(File::create(path)?);
    match format {
        StlFormat::Binary => write_binary(&mut out, mesh, global)?,
        StlFormat::Ascii => write_ascii(&mut out, mesh, "emboss", global)?,
    }
    out.flush()?;
    info!(
        path = %path.display(),
        triangles = mesh.num_triangles(),
        ?format,
        "exported STL"
    );
    Ok(())
}

/// Write binary STL to an arbitrary writer.
pub fn write_binary<W: Write>(out: &mut W, mesh: &TriangleMesh, global: &Transform) -> Result<()> {
    let num_triangles = mesh.num_triangles();

    let mut header = [b' '; 80];
    let tag = b"emboss binary STL";
    header[..tag.len()].copy_from_slice(tag);
    out.write_all(&header)?;
    out.write_all(&(num_triangles as u32).to_le_bytes())?;

    for tri in mesh.indices.chunks(3) {
        let (v0, v1, v2) = facet_vertices(mesh, tri, global);
        let n = facet_normal(&v0, &v1, &v2);

        for value in [n.x, n.y, n.z] {
            out.write_all(&(value as f32).to_le_bytes())?;
        }
        for v in [v0, v1, v2] {
            for value in [v.x, v.y, v.z] {
                out.write_all(&(value as f32).to_le_bytes())?;
            }
        }
        // Attribute byte count.
        out.write_all(&0u16.to_le_bytes())?;
    }
    Ok(())
}

/// Write ASCII STL to an arbitrary writer.
pub fn write_ascii<W: Write>(
    out: &mut W,
    mesh: &TriangleMesh,
    name: &str,
    global: &Transform,
) -> Result<()> {
    writeln!(out, "solid {name}")?;
    for tri in mesh.indices.chunks(3) {
        let (v0, v1, v2) = facet_vertices(mesh, tri, global);
        let n = facet_normal(&v0, &v1, &v2);
        writeln!(out, "  facet normal {:e} {:e} {:e}", n.x, n.y, n.z)?;
        writeln!(out, "    outer loop")?;
        for v in [v0, v1, v2] {
            writeln!(out, "      vertex {:e} {:e} {:e}", v.x, v.y, v.z)?;
        }
        writeln!(out, "    endloop")?;
        writeln!(out, "  endfacet")?;
    }
    writeln!(out, "endsolid {name}")?;
    Ok(())
}

fn facet_vertices(mesh: &TriangleMesh, tri: &[u32], global: &Transform) -> (Point3, Point3, Point3) {
    let v0 = global.apply_point(&mesh.vertex(tri[0] as usize));
    let v1 = global.apply_point(&mesh.vertex(tri[1] as usize));
    let v2 = global.apply_point(&mesh.vertex(tri[2] as usize));
    (v0, v1, v2)
}

/// Right-hand-rule facet normal; degenerate facets get +Z.
fn facet_normal(v0: &Point3, v1: &Point3, v2: &Point3) -> Vec3 {
    let n = (v1 - v0).cross(&(v2 - v0));
    let len = n.norm();
    if len > 1e-12 {
        n / len
    } else {
        Vec3::z()
    }
}
