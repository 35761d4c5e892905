use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("unknown tool name \"{0}\" found in log folder")]
    UnknownTool(String),

    #[error("config file not found: {0}")]
    ConfigNotFound(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("malformed report {path}: {reason}")]
    MalformedReport { path: String, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),
}

impl DashboardError {
    pub fn malformed(path: &std::path::Path, reason: impl Into<String>) -> Self {
        Self::MalformedReport {
            path: path.display().to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
