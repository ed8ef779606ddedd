#![warn(missing_docs)]

//! Math types for the emboss pipeline.
//!
//! Thin wrappers around nalgebra providing the few geometric types the
//! pipeline needs: 2D/3D points and vectors, an affine transform, a
//! tolerance bundle, and forward/up axis conversion for export.

use nalgebra::{Matrix4, Vector2, Vector3, Vector4};
use thiserror::Error;

/// A point in 2D drawing space.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in 2D space.
pub type Vec2 = Vector2<f64>;

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A 4x4 affine transformation matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Uniform scale by `s` on all three axes.
    pub fn uniform_scale(s: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 0)] = s;
        m[(1, 1)] = s;
        m[(2, 2)] = s;
        Self { matrix: m }
    }

    /// Compose: apply `other` first, then `self` (self * other).
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Transform a direction vector (ignores translation).
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        let r = self.matrix * Vector4::new(v.x, v.y, v.z, 0.0);
        Vec3::new(r.x, r.y, r.z)
    }

    /// Whether this is the identity transform (exact comparison).
    pub fn is_identity(&self) -> bool {
        self.matrix == Matrix4::identity()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in mm.
    pub linear: f64,
    /// Area tolerance in mm^2, for degenerate ring rejection.
    pub area: f64,
}

impl Tolerance {
    /// Default tolerances (1e-6 mm linear, 1e-9 mm^2 area).
    pub const DEFAULT: Self = Self {
        linear: 1e-6,
        area: 1e-9,
    };

    /// Check if two 2D points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point2, b: &Point2) -> bool {
        (a - b).norm() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A signed coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// +X
    PosX,
    /// -X
    NegX,
    /// +Y
    PosY,
    /// -Y
    NegY,
    /// +Z
    PosZ,
    /// -Z
    NegZ,
}

impl Axis {
    /// Unit vector for this axis.
    pub fn vector(self) -> Vec3 {
        match self {
            Axis::PosX => Vec3::x(),
            Axis::NegX => -Vec3::x(),
            Axis::PosY => Vec3::y(),
            Axis::NegY => -Vec3::y(),
            Axis::PosZ => Vec3::z(),
            Axis::NegZ => -Vec3::z(),
        }
    }
}

/// Errors from axis conversion.
#[derive(Debug, Clone, Error)]
pub enum AxisError {
    /// Forward and up axes lie on the same line.
    #[error("forward and up axes are parallel")]
    ParallelAxes,
}

/// Build the rotation that maps the modeling convention (+Y forward,
/// +Z up, right-handed) onto the requested export convention.
///
/// `axis_conversion(Axis::PosY, Axis::PosZ)` is the identity, which is
/// what an STL export at unit scale uses.
///
/// # Errors
///
/// Returns [`AxisError::ParallelAxes`] if `to_forward` and `to_up`
/// are the same or opposite axes.
pub fn axis_conversion(to_forward: Axis, to_up: Axis) -> Result<Transform, AxisError> {
    let f = to_forward.vector();
    let u = to_up.vector();
    if f.cross(&u).norm() < 0.5 {
        return Err(AxisError::ParallelAxes);
    }
    // Right-handed frame with Y forward, Z up has X = Y x Z.
    let r = f.cross(&u);

    let mut m = Matrix4::identity();
    for i in 0..3 {
        m[(i, 0)] = r[i];
        m[(i, 1)] = f[i];
        m[(i, 2)] = u[i];
    }
    Ok(Transform { matrix: m })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_translation() {
        let t = Transform::translation(10.0, -20.0, 5.0);
        let p = t.apply_point(&Point3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(p.x, 11.0);
        assert_relative_eq!(p.y, -18.0);
        assert_relative_eq!(p.z, 8.0);
    }

    #[test]
    fn test_uniform_scale() {
        let t = Transform::uniform_scale(2.5);
        let p = t.apply_point(&Point3::new(1.0, 2.0, -4.0));
        assert_relative_eq!(p.x, 2.5);
        assert_relative_eq!(p.y, 5.0);
        assert_relative_eq!(p.z, -10.0);
    }

    #[test]
    fn test_translation_ignored_for_vectors() {
        let t = Transform::translation(100.0, 100.0, 100.0);
        let v = t.apply_vec(&Vec3::new(0.0, 0.0, 1.0));
        assert_relative_eq!(v.norm(), 1.0);
        assert_relative_eq!(v.z, 1.0);
    }

    #[test]
    fn test_compose_order() {
        // then(): argument applies first.
        let scale = Transform::uniform_scale(2.0);
        let shift = Transform::translation(1.0, 0.0, 0.0);
        let composed = scale.then(&shift);
        let p = composed.apply_point(&Point3::origin());
        assert_relative_eq!(p.x, 2.0);
    }

    #[test]
    fn test_axis_conversion_identity() {
        // The exporter's Y-forward/Z-up target is a no-op from the
        // modeling convention.
        let t = axis_conversion(Axis::PosY, Axis::PosZ).unwrap();
        assert!(t.is_identity());
    }

    #[test]
    fn test_axis_conversion_z_forward() {
        // Y forward -> Z forward, Z up -> -Y up: a rotation about X.
        let t = axis_conversion(Axis::PosZ, Axis::NegY).unwrap();
        let p = t.apply_point(&Point3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 1.0, epsilon = 1e-12);
        // Still a rotation: preserves lengths.
        let v = t.apply_vec(&Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(v.norm(), (14.0f64).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_axis_conversion_parallel_errors() {
        assert!(matches!(
            axis_conversion(Axis::PosZ, Axis::PosZ),
            Err(AxisError::ParallelAxes)
        ));
        assert!(matches!(
            axis_conversion(Axis::PosZ, Axis::NegZ),
            Err(AxisError::ParallelAxes)
        ));
    }

    #[test]
    fn test_tolerance_points_equal() {
        let tol = Tolerance::DEFAULT;
        let a = Point2::new(1.0, 2.0);
        assert!(tol.points_equal(&a, &Point2::new(1.0 + 1e-8, 2.0)));
        assert!(!tol.points_equal(&a, &Point2::new(1.001, 2.0)));
    }
}
