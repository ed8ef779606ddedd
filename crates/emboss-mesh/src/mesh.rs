//! Triangle mesh storage and whole-mesh transforms.

use emboss_math::{Point3, Vec3};

use crate::{MeshError, Result};

/// Output triangle mesh for export.
///
/// Vertices are a flat f32 array `[x0, y0, z0, x1, ...]`, indices a
/// flat u32 array with three entries per triangle.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    /// Flat vertex positions.
    pub vertices: Vec<f32>,
    /// Flat triangle indices.
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Vertex position at `index`.
    pub fn vertex(&self, index: usize) -> Point3 {
        let i = index * 3;
        Point3::new(
            self.vertices[i] as f64,
            self.vertices[i + 1] as f64,
            self.vertices[i + 2] as f64,
        )
    }

    /// Append a vertex, returning its index.
    pub fn push_vertex(&mut self, p: Point3) -> u32 {
        let idx = self.num_vertices() as u32;
        self.vertices.push(p.x as f32);
        self.vertices.push(p.y as f32);
        self.vertices.push(p.z as f32);
        idx
    }

    /// Append a triangle by vertex indices.
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.push(a);
        self.indices.push(b);
        self.indices.push(c);
    }

    /// Merge another mesh into this one.
    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.num_vertices() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|&i| i + offset));
    }

    /// Axis-aligned bounding box as `(min, max)`.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::EmptyMesh`] if the mesh has no vertices.
    pub fn bounds(&self) -> Result<(Point3, Point3)> {
        if self.vertices.is_empty() {
            return Err(MeshError::EmptyMesh);
        }
        let mut min = Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
        let mut max = Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for i in 0..self.num_vertices() {
            let p = self.vertex(i);
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
        }
        Ok((min, max))
    }

    /// Bounding-box extents along x, y, z.
    pub fn dimensions(&self) -> Result<Vec3> {
        let (min, max) = self.bounds()?;
        Ok(max - min)
    }

    /// Bounding-box center.
    pub fn center(&self) -> Result<Point3> {
        let (min, max) = self.bounds()?;
        Ok(min + (max - min) / 2.0)
    }

    /// Scale every vertex uniformly about the origin.
    pub fn scale_uniform(&mut self, factor: f64) {
        let f = factor as f32;
        for v in &mut self.vertices {
            *v *= f;
        }
    }

    /// Translate every vertex by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        for i in 0..self.num_vertices() {
            let base = i * 3;
            self.vertices[base] += offset.x as f32;
            self.vertices[base + 1] += offset.y as f32;
            self.vertices[base + 2] += offset.z as f32;
        }
    }

    /// Translate so the bounding-box center lands on `target`.
    pub fn recenter_to(&mut self, target: Point3) -> Result<()> {
        let center = self.center()?;
        self.translate(target - center);
        Ok(())
    }
}
