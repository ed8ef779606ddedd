#![warn(missing_docs)]

//! SVG curve import for the emboss pipeline.
//!
//! Parsing is delegated to `usvg`, which resolves shapes, transforms,
//! CSS, and path syntax into a normalized path tree. This crate walks
//! that tree, flattens every curve segment into straight line rings,
//! and groups the rings into fillable [`Profile`]s.
//!
//! Coordinates come out in millimeters at unit scale (1 SVG user unit
//! = 1 mm) with the Y axis mirrored, so a drawing viewed on screen and
//! the printed part agree.
//!
//! # Example
//!
//! ```
//! use emboss_svg::{profiles_from_str, ImportOptions};
//!
//! let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="40">
//!     <rect x="5" y="5" width="30" height="20"/>
//! </svg>"#;
//! let profiles = profiles_from_str(svg, &ImportOptions::default()).unwrap();
//! assert_eq!(profiles.len(), 1);
//! ```

mod flatten;

pub use emboss_mesh::{Profile, Ring};

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use emboss_mesh::{group_rings, MeshError};

/// Errors from SVG import.
#[derive(Debug, Error)]
pub enum SvgError {
    /// Reading the input file failed.
    #[error("failed to read SVG file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a well-formed SVG.
    #[error("failed to parse SVG: {0}")]
    Parse(#[from] usvg::Error),

    /// The document contains no fillable closed curve.
    #[error("SVG contains no closed curves to extrude")]
    NoClosedCurves,

    /// Ring grouping produced an invalid profile.
    #[error("invalid profile geometry: {0}")]
    Profile(#[from] MeshError),
}

/// Result type for SVG import.
pub type Result<T> = std::result::Result<T, SvgError>;

/// Controls how curved path segments are flattened.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Straight segments per quadratic/cubic Bézier span.
    pub curve_segments: u32,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self { curve_segments: 16 }
    }
}

/// Load all fillable profiles from an SVG file.
///
/// # Errors
///
/// Fails on I/O or parse errors, and with
/// [`SvgError::NoClosedCurves`] if nothing fillable remains after
/// degenerate rings are dropped.
pub fn load_profiles(path: &Path, options: &ImportOptions) -> Result<Vec<Profile>> {
    let data = std::fs::read(path)?;
    let profiles = profiles_from_data(&data, options)?;
    info!(
        path = %path.display(),
        profiles = profiles.len(),
        "imported SVG"
    );
    Ok(profiles)
}

/// Parse profiles from in-memory SVG text.
pub fn profiles_from_str(svg: &str, options: &ImportOptions) -> Result<Vec<Profile>> {
    profiles_from_data(svg.as_bytes(), options)
}

/// Parse profiles from raw SVG bytes.
pub fn profiles_from_data(data: &[u8], options: &ImportOptions) -> Result<Vec<Profile>> {
    let tree = usvg::Tree::from_data(data, &usvg::Options::default())?;
    let rings = flatten::collect_rings(tree.root(), options);
    let profiles = group_rings(rings)?;
    if profiles.is_empty() {
        return Err(SvgError::NoClosedCurves);
    }
    Ok(profiles)
}
