use crate::error::{DashboardError, Result};
use crate::types::config::{DashboardConfig, PhpUnitMode};
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;

pub const DEFAULT_CONFIG_FILE: &str = "qa-dashboard.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/qa-dashboard/config.toml";

/// Values the scoring run reads once CLI flags and config files are merged.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub log_root: PathBuf,
    pub build_release: Option<String>,
    pub acceptance: Option<f64>,
    pub phpunit_mode: PhpUnitMode,
    pub summary_file: String,
    pub ignore: Vec<String>,
}

impl RunSettings {
    pub fn from_config(log_root: &Path, config: &DashboardConfig) -> Self {
        Self {
            log_root: log_root.to_path_buf(),
            build_release: None,
            acceptance: config.acceptance.threshold,
            phpunit_mode: config.phpunit.mode,
            summary_file: config.output.summary_file.trim().to_string(),
            ignore: config
                .tools
                .ignore
                .iter()
                .map(|folder| folder.trim().to_string())
                .collect(),
        }
    }

    pub fn summary_path(&self) -> PathBuf {
        self.log_root.join(&self.summary_file)
    }

    pub fn is_ignored(&self, folder: &str) -> bool {
        self.ignore.iter().any(|ignored| ignored == folder)
    }
}

pub fn load_config(log_root: &Path, explicit: Option<&Path>) -> Result<DashboardConfig> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(log_root, explicit, global.as_deref())
}

pub(crate) fn load_config_with_global(
    log_root: &Path,
    explicit: Option<&Path>,
    global_path: Option<&Path>,
) -> Result<DashboardConfig> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(DashboardError::ConfigNotFound(path.display().to_string()));
        }
    }

    let mut merged = Value::Table(Map::new());
    if let Some(path) = global_path {
        merge_file_if_exists(&mut merged, path)?;
    }
    merge_file_if_exists(&mut merged, &log_root.join(DEFAULT_CONFIG_FILE))?;
    if let Some(path) = explicit {
        merge_file_if_exists(&mut merged, path)?;
    }

    let cfg: DashboardConfig = merged.try_into()?;
    cfg.validate()?;
    Ok(cfg)
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let value = read_toml_value(path)?;
    merge_toml(merged, value);
    Ok(())
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| DashboardError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}
