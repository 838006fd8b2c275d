use std::fs;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::Result;

pub fn prepare_output_dir(output_dir: &Path) -> Result<()> {
    // Remove old output and recreate
    if output_dir.exists() {
        info!("Cleaning output directory: {}", output_dir.display());
        fs::remove_dir_all(output_dir)?;
    }
    fs::create_dir_all(output_dir)?;
    Ok(())
}

pub fn process_asset(path: &Path, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    debug!("Copying asset: {} -> {}", path.display(), output_path.display());
    fs::copy(path, output_path)?;
    Ok(())
}

/// Copies every file under `static_dir` into `output_dir`, keeping the
/// relative layout. Returns the number of files copied; a missing
/// `static_dir` copies nothing.
pub fn copy_static_dir(static_dir: &Path, output_dir: &Path) -> Result<usize> {
    if !static_dir.is_dir() {
        return Ok(0);
    }
    let mut copied = 0;
    for entry in WalkDir::new(static_dir).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        // WalkDir only yields paths below its root.
        let Ok(relative_path) = path.strip_prefix(static_dir) else {
            continue;
        };
        process_asset(path, &output_dir.join(relative_path))?;
        copied += 1;
    }
    Ok(copied)
}

pub fn write_page(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    debug!("Wrote page: {}", path.display());
    Ok(())
}
