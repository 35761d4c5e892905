use super::junit::{read_suite_totals, SuiteTotals};
use super::{absorb, ScoreProducer, ScoreSpec};
use crate::error::{DashboardError, Result};
use crate::scan::filesystem::read_report;
use crate::scan::xml::parse_report;
use crate::types::config::PhpUnitMode;
use crate::types::summary::{Score, ScoreElement};
use std::path::Path;

pub const TOOL_ID: &str = "phpunit";
pub const COVERAGE_REPORT: &str = "coverage-clover.xml";

const UNIT: ScoreSpec = ScoreSpec::new("phpunit_unit", "Unit tests", 8.0);
const UNIT_COVERAGE: ScoreSpec =
    ScoreSpec::new("phpunit_unit_coverage", "Unit tests - Coverage", 6.0);
const COMBINED: ScoreSpec = ScoreSpec::new("phpunit", "PHPUnit", 12.0);

/// JUnit report of every suite kind, unit first.
const SUITE_REPORTS: [(ScoreSpec, &str); 4] = [
    (UNIT, "phpunit-unit.xml"),
    (
        ScoreSpec::new("phpunit_functional_orm", "Functional tests (ORM)", 4.0),
        "phpunit-functional-orm.xml",
    ),
    (
        ScoreSpec::new("phpunit_functional_odm", "Functional tests (ODM)", 4.0),
        "phpunit-functional-odm.xml",
    ),
    (
        ScoreSpec::new("phpunit_functional_couchdb", "Functional tests (CouchDB)", 4.0),
        "phpunit-functional-couchdb.xml",
    ),
];

/// Project-level statement counters of a Clover report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoverageTotals {
    pub statements: u64,
    pub covered_statements: u64,
}

impl CoverageTotals {
    pub fn ratio(&self) -> Option<f64> {
        if self.statements == 0 {
            return None;
        }
        Some((self.covered_statements as f64 / self.statements as f64).clamp(0.0, 1.0))
    }
}

pub fn read_coverage(path: &Path) -> Result<Option<CoverageTotals>> {
    let Some(content) = read_report(path) else {
        return Ok(None);
    };
    let root = parse_report(&content, path)?;
    let metrics = root
        .child("project")
        .and_then(|project| project.child("metrics"))
        .ok_or_else(|| DashboardError::malformed(path, "no <project><metrics> element"))?;

    Ok(Some(CoverageTotals {
        statements: metrics.required_attr("statements", path)?,
        covered_statements: metrics.required_attr("coveredstatements", path)?,
    }))
}

pub fn suite_score(totals: &SuiteTotals) -> Option<Score> {
    totals.success_ratio().map(|ratio| (100.0 * ratio).max(0.0))
}

pub fn coverage_score(coverage: &CoverageTotals) -> Option<Score> {
    coverage.ratio().map(|ratio| 100.0 * ratio)
}

/// Both ratios are required; either one missing leaves the score undefined.
pub fn combined_score(success_ratio: Option<f64>, coverage_ratio: Option<f64>) -> Option<Score> {
    let (success, coverage) = (success_ratio?, coverage_ratio?);
    Some(100.0 * (success * coverage).clamp(0.0, 1.0))
}

#[derive(Debug, Clone, Copy)]
pub struct PhpUnit {
    mode: PhpUnitMode,
}

impl PhpUnit {
    pub fn new(mode: PhpUnitMode) -> Self {
        Self { mode }
    }

    fn suite_totals(&self, dir: &Path, report: &str) -> Option<SuiteTotals> {
        absorb(TOOL_ID, read_suite_totals(&dir.join(report)))
    }

    fn unit_coverage(&self, dir: &Path) -> Option<CoverageTotals> {
        absorb(TOOL_ID, read_coverage(&dir.join(COVERAGE_REPORT)))
    }

    fn per_suite_scores(&self, dir: &Path) -> Vec<ScoreElement> {
        let mut elements = Vec::new();
        for (index, (spec, report)) in SUITE_REPORTS.iter().enumerate() {
            let totals = self.suite_totals(dir, report);
            elements.extend(spec.element(totals.as_ref().and_then(suite_score)));
            if index == 0 {
                let coverage = self.unit_coverage(dir);
                elements.extend(
                    UNIT_COVERAGE.element(coverage.as_ref().and_then(coverage_score)),
                );
            }
        }
        elements
    }

    fn combined_scores(&self, dir: &Path) -> Vec<ScoreElement> {
        let totals = SUITE_REPORTS
            .iter()
            .filter_map(|(_, report)| self.suite_totals(dir, report))
            .fold(None, |acc: Option<SuiteTotals>, suite| {
                let mut merged = acc.unwrap_or_default();
                merged.merge(&suite);
                Some(merged)
            });
        let success = totals.as_ref().and_then(SuiteTotals::success_ratio);
        let coverage = self.unit_coverage(dir).as_ref().and_then(CoverageTotals::ratio);
        COMBINED
            .element(combined_score(success, coverage))
            .into_iter()
            .collect()
    }
}

impl ScoreProducer for PhpUnit {
    fn specs(&self) -> Vec<ScoreSpec> {
        match self.mode {
            PhpUnitMode::Combined => vec![COMBINED],
            PhpUnitMode::Suites => {
                let mut specs: Vec<ScoreSpec> =
                    SUITE_REPORTS.iter().map(|(spec, _)| *spec).collect();
                specs.insert(1, UNIT_COVERAGE);
                specs
            }
        }
    }

    fn produce_scores(&self, dir: &Path) -> Vec<ScoreElement> {
        match self.mode {
            PhpUnitMode::Combined => self.combined_scores(dir),
            PhpUnitMode::Suites => self.per_suite_scores(dir),
        }
    }
}
