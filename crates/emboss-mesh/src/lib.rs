#![warn(missing_docs)]

//! Profile fill and linear extrusion for the emboss pipeline.
//!
//! This crate turns closed 2D profiles (an outer boundary plus
//! optional holes) into watertight triangle meshes:
//! 1. Triangulating the profile via ear-clipping with hole bridging
//! 2. Sweeping the boundary along +Z to build the side walls
//! 3. Capping both ends with the fill triangulation
//!
//! # Example
//!
//! ```
//! use emboss_math::Point2;
//! use emboss_mesh::{extrude_profile, ExtrudeParams, Profile, Ring};
//!
//! let square = Ring::new(vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(10.0, 0.0),
//!     Point2::new(10.0, 10.0),
//!     Point2::new(0.0, 10.0),
//! ]);
//! let profile = Profile::new(square, vec![]).unwrap();
//! let solid = extrude_profile(&profile, &ExtrudeParams { height: 5.0 }).unwrap();
//! assert_eq!(solid.num_vertices(), 8);
//! ```

mod extrude;
mod fill;
mod mesh;
mod profile;

pub use extrude::extrude_profile;
pub use fill::fill_profile;
pub use mesh::TriangleMesh;
pub use profile::{group_rings, Profile, Ring};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from profile and mesh operations.
#[derive(Debug, Clone, Error)]
pub enum MeshError {
    /// The mesh has no vertices or triangles.
    #[error("mesh is empty")]
    EmptyMesh,

    /// A ring has fewer than 3 distinct points or near-zero area.
    #[error("degenerate profile ring: {0}")]
    DegenerateProfile(String),

    /// Extrusion height must be positive.
    #[error("extrusion height must be positive, got {0}")]
    InvalidHeight(f64),

    /// Geometry has zero extent, so no scale factor exists.
    #[error("geometry has zero extent, cannot rescale")]
    ZeroExtent,
}

/// Result type for mesh operations.
pub type Result<T> = std::result::Result<T, MeshError>;

/// Parameters for the extrusion step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExtrudeParams {
    /// Extrusion depth along +Z, in mm.
    pub height: f64,
}

impl Default for ExtrudeParams {
    fn default() -> Self {
        Self { height: 10.0 }
    }
}
