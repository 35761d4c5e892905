use super::{absorb, clamp_percent, ScoreProducer, ScoreSpec};
use crate::error::{DashboardError, Result};
use crate::scan::filesystem::{read_to_string_if_exists, read_report};
use crate::scan::xml::parse_report;
use crate::types::summary::{Score, ScoreElement};
use std::path::Path;
use tracing::debug;

pub const REPORT: &str = "report.xml";
pub const PERCENTAGE_REPORT: &str = "percentage-report.txt";

const SPEC: ScoreSpec = ScoreSpec::new("phpcpd", "PHP Copy/Paste detector", 0.5);

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Duplication {
    pub blocks: usize,
    pub percentage: f64,
}

/// An empty XML report means phpcpd ran and found nothing.
pub fn read_duplication(dir: &Path) -> Result<Option<Duplication>> {
    let report_path = dir.join(REPORT);
    let Some(raw) = read_to_string_if_exists(&report_path) else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(Some(Duplication::default()));
    }

    let root = parse_report(&raw, &report_path)?;
    let blocks = root.children_named("duplication").count();

    let percentage_path = dir.join(PERCENTAGE_REPORT);
    let text = read_report(&percentage_path).ok_or_else(|| {
        DashboardError::malformed(&percentage_path, "duplication found but no percentage report")
    })?;
    let percentage = leading_number(&text).ok_or_else(|| {
        DashboardError::malformed(&percentage_path, format!("no percentage in {:?}", text.trim()))
    })?;

    let duplication = Duplication { blocks, percentage };
    debug!(
        blocks = duplication.blocks,
        percentage = duplication.percentage,
        "duplicated code"
    );
    Ok(Some(duplication))
}

/// `12.50%` and `12.50% duplicated lines` both read as 12.5.
fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let end = text
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.' || *c == '-' || *c == '+'))
        .map_or(text.len(), |(index, _)| index);
    text[..end].parse().ok()
}

pub fn duplication_score(duplication: &Duplication) -> Score {
    clamp_percent(100.0 - duplication.percentage)
}

#[derive(Debug, Clone, Copy)]
pub struct PhpCpd;

impl ScoreProducer for PhpCpd {
    fn specs(&self) -> Vec<ScoreSpec> {
        vec![SPEC]
    }

    fn produce_scores(&self, dir: &Path) -> Vec<ScoreElement> {
        let duplication = absorb(SPEC.id, read_duplication(dir));
        SPEC.element(duplication.as_ref().map(duplication_score))
            .into_iter()
            .collect()
    }
}
