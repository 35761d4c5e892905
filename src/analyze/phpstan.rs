use super::{absorb, clamp_percent, ScoreProducer, ScoreSpec};
use crate::error::{DashboardError, Result};
use crate::scan::filesystem::{list_files_with_extension, read_report};
use crate::types::summary::{Score, ScoreElement};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

const SPEC: ScoreSpec = ScoreSpec::new("phpstan", "PHPStan", 6.0);

#[derive(Debug, Deserialize)]
struct LevelReport {
    totals: LevelTotals,
}

#[derive(Debug, Deserialize)]
struct LevelTotals {
    file_errors: i64,
}

/// Errors introduced at each analysis level, level 0 first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelErrors {
    pub per_level: Vec<i64>,
}

impl LevelErrors {
    /// Each level report counts every error up to that level; keep only the increments.
    pub fn from_cumulative(cumulative: &[i64]) -> Self {
        let per_level = cumulative
            .iter()
            .enumerate()
            .map(|(level, total)| match level {
                0 => *total,
                _ => total - cumulative[level - 1],
            })
            .collect();
        Self { per_level }
    }

    pub fn total(&self) -> i64 {
        self.per_level.iter().sum()
    }
}

/// One report per level, named so that natural order is level order.
pub fn read_level_errors(dir: &Path) -> Result<Option<LevelErrors>> {
    let reports = list_files_with_extension(dir, "json");
    if reports.is_empty() {
        return Ok(None);
    }

    let mut cumulative = Vec::with_capacity(reports.len());
    for path in &reports {
        let content = read_report(path)
            .ok_or_else(|| DashboardError::malformed(path, "level report is empty"))?;
        let report: LevelReport = serde_json::from_str(&content)
            .map_err(|e| DashboardError::malformed(path, e.to_string()))?;
        cumulative.push(report.totals.file_errors);
    }
    let errors = LevelErrors::from_cumulative(&cumulative);
    debug!(levels = errors.per_level.len(), total = errors.total(), "phpstan errors");
    Ok(Some(errors))
}

/// Level 0 errors cost a full point each, level k errors cost 1/(10k²).
pub fn level_score(errors: &LevelErrors) -> Score {
    let weighted: f64 = errors
        .per_level
        .iter()
        .enumerate()
        .map(|(level, count)| {
            let divisor = match level {
                0 => 1.0,
                k => 10.0 * (k * k) as f64,
            };
            *count as f64 / divisor
        })
        .sum();
    clamp_percent(100.0 * (1.0 - weighted))
}

#[derive(Debug, Clone, Copy)]
pub struct PhpStan;

impl ScoreProducer for PhpStan {
    fn specs(&self) -> Vec<ScoreSpec> {
        vec![SPEC]
    }

    fn produce_scores(&self, dir: &Path) -> Vec<ScoreElement> {
        let errors = absorb(SPEC.id, read_level_errors(dir));
        SPEC.element(errors.as_ref().map(level_score))
            .into_iter()
            .collect()
    }
}
