//! File export of finished assemblies.

pub mod step;
pub mod stl;

use crate::adapter::Assembly;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Errors raised while writing output files.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("std::io::Error: {0}")]
    StdIo(#[from] std::io::Error),
    #[error("The path is malformed: {0}")]
    MalformedPath(String),
}

/// Encoding of the mesh file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StlFormat {
    #[default]
    Binary,
    Ascii,
}

/// Paths written by [`save_exports`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub stl: PathBuf,
    pub step: PathBuf,
}

/// Write `<basename>.stl` and `<basename>.step` for `assembly` into `dir`,
/// creating `dir` when needed.
pub fn save_exports(
    assembly: &Assembly,
    dir: &Path,
    basename: &str,
    format: StlFormat,
) -> Result<ExportedFiles, IoError> {
    if basename.is_empty() || basename.contains(['/', '\\']) {
        return Err(IoError::MalformedPath(format!(
            "base name {basename:?} must be a plain file name"
        )));
    }
    fs::create_dir_all(dir)?;

    let mesh = assembly.to_mesh();
    let stl_path = dir.join(format!("{basename}.stl"));
    match format {
        StlFormat::Binary => fs::write(&stl_path, stl::to_stl_binary(&mesh)?)?,
        StlFormat::Ascii => fs::write(&stl_path, stl::to_stl_ascii(&mesh, basename))?,
    }
    info!(path = %stl_path.display(), triangles = mesh.triangle_count(), ?format, "wrote STL");

    let bodies: Vec<(&str, &_)> = assembly
        .bodies
        .iter()
        .map(|b| (b.name.as_str(), &b.mesh))
        .collect();
    let step_path = dir.join(format!("{basename}.step"));
    fs::write(&step_path, step::to_step(&bodies, basename))?;
    info!(path = %step_path.display(), bodies = bodies.len(), "wrote STEP");

    Ok(ExportedFiles {
        stl: stl_path,
        step: step_path,
    })
}

impl Assembly {
    /// Binary STL plus STEP, see [`save_exports`].
    pub fn export(&self, dir: &Path, basename: &str) -> Result<ExportedFiles, IoError> {
        save_exports(self, dir, basename, StlFormat::Binary)
    }
}
