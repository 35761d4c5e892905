use super::{absorb, ScoreProducer, ScoreSpec};
use crate::error::{DashboardError, Result};
use crate::scan::filesystem::read_report;
use crate::types::summary::{Score, ScoreElement};
use serde::Deserialize;
use std::path::Path;

pub const REPORT: &str = "report.json";

const SPEC: ScoreSpec = ScoreSpec::new("phpcs", "PHP Code Sniffer", 8.0);

#[derive(Debug, Deserialize)]
struct PhpcsReport {
    totals: PhpcsTotals,
    #[serde(default)]
    files: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct PhpcsTotals {
    errors: u64,
    warnings: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LintTotals {
    pub errors: u64,
    pub warnings: u64,
    pub files: u64,
}

pub fn read_lint_totals(path: &Path) -> Result<Option<LintTotals>> {
    let Some(content) = read_report(path) else {
        return Ok(None);
    };
    let report: PhpcsReport = serde_json::from_str(&content)
        .map_err(|e| DashboardError::malformed(path, e.to_string()))?;
    // PHP encodes an empty file map as `[]`.
    let files = match &report.files {
        serde_json::Value::Object(map) => map.len(),
        serde_json::Value::Array(list) => list.len(),
        serde_json::Value::Null => 0,
        _ => return Err(DashboardError::malformed(path, "\"files\" is not a collection")),
    };

    Ok(Some(LintTotals {
        errors: report.totals.errors,
        warnings: report.totals.warnings,
        files: files as u64,
    }))
}

/// One point lost per issue per file, floored at zero.
pub fn lint_score(totals: &LintTotals) -> Option<Score> {
    if totals.files == 0 {
        return None;
    }
    let issues = (totals.errors + totals.warnings) as f64;
    Some((100.0 - 100.0 * issues / totals.files as f64).max(0.0))
}

#[derive(Debug, Clone, Copy)]
pub struct PhpCodeSniffer;

impl ScoreProducer for PhpCodeSniffer {
    fn specs(&self) -> Vec<ScoreSpec> {
        vec![SPEC]
    }

    fn produce_scores(&self, dir: &Path) -> Vec<ScoreElement> {
        let totals = absorb(SPEC.id, read_lint_totals(&dir.join(REPORT)));
        SPEC.element(totals.as_ref().and_then(lint_score))
            .into_iter()
            .collect()
    }
}
