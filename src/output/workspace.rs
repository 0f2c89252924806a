//! Temporary and output directory handling

use crate::config::OutputConfig;
use crate::HarvestError;
use std::path::Path;

fn workspace_error(path: &Path, source: std::io::Error) -> HarvestError {
    HarvestError::Workspace {
        path: path.display().to_string(),
        source,
    }
}

/// Creates both directories and, unless resuming, empties the temporary one
pub fn prepare_workspace(config: &OutputConfig, resume: bool) -> Result<(), HarvestError> {
    let temp_dir = Path::new(&config.temp_dir);
    let out_dir = Path::new(&config.out_dir);

    std::fs::create_dir_all(temp_dir).map_err(|e| workspace_error(temp_dir, e))?;
    std::fs::create_dir_all(out_dir).map_err(|e| workspace_error(out_dir, e))?;

    if resume {
        tracing::info!(
            "Resuming: keeping existing page files in {}",
            temp_dir.display()
        );
    } else {
        clean_dir(temp_dir)?;
    }
    Ok(())
}

/// Removes everything inside `dir`, leaving the directory itself
///
/// Entries that cannot be removed are logged and skipped.
pub fn clean_dir(dir: &Path) -> Result<usize, HarvestError> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| workspace_error(dir, e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| workspace_error(dir, e))?;

    if !entries.is_empty() {
        tracing::info!("Cleaning {}", dir.display());
    }

    let mut removed = 0;
    for entry in entries {
        let path = entry.path();
        let result = if path.is_dir() {
            std::fs::remove_dir_all(&path)
        } else {
            std::fs::remove_file(&path)
        };
        match result {
            Ok(()) => removed += 1,
            Err(e) => tracing::warn!("Couldn't remove {}: {}", path.display(), e),
        }
    }
    Ok(removed)
}

/// Deletes the temporary directory unless configured to keep it
pub fn finish_workspace(config: &OutputConfig) -> Result<(), HarvestError> {
    let temp_dir = Path::new(&config.temp_dir);
    if config.keep_temp {
        tracing::info!("Keeping page files in {}", temp_dir.display());
        return Ok(());
    }
    std::fs::remove_dir_all(temp_dir).map_err(|e| workspace_error(temp_dir, e))
}
