pub mod filesystem;
pub mod xml;

use crate::config::RunSettings;
use crate::error::{DashboardError, Result};
use filesystem::list_dirs;
use std::path::PathBuf;
use tracing::debug;

/// A tool log folder found under the log root.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolFolder {
    pub id: String,
    pub path: PathBuf,
}

pub fn discover(settings: &RunSettings) -> Result<Vec<ToolFolder>> {
    if !settings.log_root.is_dir() {
        return Err(DashboardError::PathNotFound(
            settings.log_root.display().to_string(),
        ));
    }

    let folders = list_dirs(&settings.log_root)
        .into_iter()
        .filter_map(|path| {
            let id = path.file_name()?.to_string_lossy().to_string();
            Some(ToolFolder { id, path })
        })
        .filter(|folder| {
            let ignored = settings.is_ignored(&folder.id);
            if ignored {
                debug!(folder = %folder.id, "skipping ignored log folder");
            }
            !ignored
        })
        .collect();
    Ok(folders)
}
