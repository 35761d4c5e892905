use crate::error::DashboardError;
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub acceptance: AcceptanceConfig,
    #[serde(default)]
    pub phpunit: PhpUnitConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AcceptanceConfig {
    pub threshold: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhpUnitMode {
    /// One score per JUnit suite plus a coverage score.
    Suites,
    /// A single score: success ratio times coverage ratio.
    #[default]
    Combined,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhpUnitConfig {
    #[serde(default)]
    pub mode: PhpUnitMode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_summary_file")]
    pub summary_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            summary_file: default_summary_file(),
        }
    }
}

fn default_summary_file() -> String {
    "summary.json".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl DashboardConfig {
    pub fn validate(&self) -> Result<(), DashboardError> {
        if let Some(threshold) = self.acceptance.threshold {
            validate_threshold(threshold)?;
        }

        let summary_file = self.output.summary_file.trim();
        if summary_file.is_empty() {
            return Err(DashboardError::ConfigParse(
                "output.summary_file cannot be empty".to_string(),
            ));
        }
        if summary_file.contains(|c: char| c == '/' || c == '\\')
            || matches!(summary_file, "." | "..")
        {
            return Err(DashboardError::ConfigParse(format!(
                "output.summary_file must be a bare file name: {summary_file}"
            )));
        }

        let mut seen = HashSet::new();
        for folder in &self.tools.ignore {
            let normalized = folder.trim();
            if normalized.is_empty() {
                return Err(DashboardError::ConfigParse(
                    "tools.ignore entries must be non-empty folder names".to_string(),
                ));
            }
            if !seen.insert(normalized) {
                return Err(DashboardError::ConfigParse(format!(
                    "tools.ignore contains duplicate folder: {normalized}"
                )));
            }
        }

        Ok(())
    }
}

pub fn validate_threshold(threshold: f64) -> Result<(), DashboardError> {
    if !(0.0..=100.0).contains(&threshold) {
        return Err(DashboardError::ConfigParse(format!(
            "acceptance threshold must be between 0 and 100 (found {threshold})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_config_uses_defaults() {
        let cfg: DashboardConfig = toml::from_str("").expect("empty config should parse");
        assert!(cfg.acceptance.threshold.is_none());
        assert_eq!(cfg.phpunit.mode, PhpUnitMode::Combined);
        assert_eq!(cfg.output.summary_file, "summary.json");
        assert!(cfg.tools.ignore.is_empty());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
[acceptance]
threshold = 72.5

[phpunit]
mode = "suites"

[output]
summary_file = "quality.json"

[tools]
ignore = ["assets", "tmp"]
"#;
        let cfg: DashboardConfig = toml::from_str(toml_str).expect("full config should parse");
        assert_eq!(cfg.acceptance.threshold, Some(72.5));
        assert_eq!(cfg.phpunit.mode, PhpUnitMode::Suites);
        assert_eq!(cfg.output.summary_file, "quality.json");
        assert_eq!(cfg.tools.ignore, vec!["assets".to_string(), "tmp".to_string()]);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_threshold() {
        let cfg: DashboardConfig =
            toml::from_str("[acceptance]\nthreshold = 120.0\n").expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("between 0 and 100"));
    }

    #[test]
    fn validate_accepts_threshold_boundaries() {
        assert!(validate_threshold(0.0).is_ok());
        assert!(validate_threshold(100.0).is_ok());
        assert!(validate_threshold(-0.1).is_err());
    }

    #[test]
    fn validate_rejects_summary_file_with_path() {
        let cfg: DashboardConfig = toml::from_str("[output]\nsummary_file = \"../out.json\"\n")
            .expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("bare file name"));
    }

    #[test]
    fn validate_rejects_duplicate_ignore_entries() {
        let cfg: DashboardConfig = toml::from_str("[tools]\nignore = [\"assets\", \" assets\"]\n")
            .expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("duplicate folder: assets"));
    }

    #[test]
    fn validate_rejects_blank_ignore_entry() {
        let cfg: DashboardConfig =
            toml::from_str("[tools]\nignore = [\" \"]\n").expect("config should parse");
        let err = cfg.validate().expect_err("validation should fail");
        assert!(err.to_string().contains("non-empty folder names"));
    }

    #[test]
    fn unknown_phpunit_mode_fails_to_parse() {
        let parsed = toml::from_str::<DashboardConfig>("[phpunit]\nmode = \"legacy\"\n");
        assert!(parsed.is_err());
    }
}
