//! The one linear procedure: import, scale, fill+extrude, recenter,
//! export.

use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use tracing::info;

use emboss_math::{axis_conversion, Axis, Point2, Point3};
use emboss_mesh::{extrude_profile, ExtrudeParams, MeshError, Profile, TriangleMesh};
use emboss_stl::{export_stl, StlFormat};
use emboss_svg::ImportOptions;

/// Everything the pipeline needs, resolved from the CLI.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Input SVG path.
    pub input: PathBuf,
    /// Output STL path.
    pub output: PathBuf,
    /// Extrusion depth in mm.
    pub extrude_height_in_mm: f64,
    /// Optional target for the largest bounding-box dimension, in mm.
    pub max_size_in_mm: Option<f64>,
}

/// Run the full pipeline and write the STL.
pub fn run(settings: &RunSettings) -> Result<()> {
    let mesh = build_solid(settings)?;
    let global = axis_conversion(Axis::PosY, Axis::PosZ)?;
    export_stl(&settings.output, &mesh, StlFormat::default(), &global)
        .with_context(|| format!("writing {}", settings.output.display()))?;
    Ok(())
}

/// Build the recentered solid without exporting it.
pub fn build_solid(settings: &RunSettings) -> Result<TriangleMesh> {
    let mut profiles = emboss_svg::load_profiles(&settings.input, &ImportOptions::default())
        .with_context(|| format!("importing {}", settings.input.display()))?;

    if let Some(max_size) = settings.max_size_in_mm {
        ensure!(max_size > 0.0, "max size must be positive, got {max_size}");
        let factor = scale_factor(&profiles, max_size)?;
        for profile in &mut profiles {
            profile.scale_uniform(factor);
        }
        info!(factor, max_size, "rescaled drawing");
    }

    let params = ExtrudeParams {
        height: settings.extrude_height_in_mm,
    };
    let mut mesh = TriangleMesh::new();
    for profile in &profiles {
        mesh.merge(&extrude_profile(profile, &params)?);
    }

    // Base at z = 0, centered on the z axis.
    mesh.recenter_to(Point3::new(0.0, 0.0, params.height / 2.0))?;

    let dims = mesh.dimensions()?;
    info!(
        profiles = profiles.len(),
        triangles = mesh.num_triangles(),
        dims = format!("{:.2} x {:.2} x {:.2} mm", dims.x, dims.y, dims.z),
        "built solid"
    );
    Ok(mesh)
}

/// `target / max(bbox dimensions)` over the whole drawing.
fn scale_factor(profiles: &[Profile], target: f64) -> Result<f64, MeshError> {
    let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for profile in profiles {
        let (lo, hi) = profile.bounds();
        min.x = min.x.min(lo.x);
        min.y = min.y.min(lo.y);
        max.x = max.x.max(hi.x);
        max.y = max.y.max(hi.y);
    }
    let current_max = (max.x - min.x).max(max.y - min.y);
    if !current_max.is_finite() || current_max <= f64::EPSILON {
        return Err(MeshError::ZeroExtent);
    }
    Ok(target / current_max)
}
