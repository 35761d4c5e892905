use super::{absorb, clamp_percent, ScoreProducer, ScoreSpec};
use crate::error::{DashboardError, Result};
use crate::scan::filesystem::read_report;
use crate::scan::xml::{parse_report, XmlNode};
use crate::types::summary::{Score, ScoreElement};
use std::path::Path;
use tracing::debug;

pub const REPORT: &str = "summary.xml";

const SPEC: ScoreSpec = ScoreSpec::new("pdepend", "pDepend", 1.5);

/// Number of limits checked per method.
const CHECKS_PER_METHOD: u64 = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MethodMetrics {
    pub ccn2: f64,
    pub npath: f64,
    pub hb: f64,
    pub mi: f64,
}

impl MethodMetrics {
    pub fn violations(&self) -> u64 {
        [
            self.ccn2 > 1.0,
            self.npath > 1.0,
            self.hb > 0.5,
            self.mi <= 50.0,
        ]
        .into_iter()
        .filter(|violated| *violated)
        .count() as u64
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplexityTotals {
    /// Sum of `nom` over every class and trait.
    pub methods: u64,
    pub violations: u64,
    pub measured: u64,
    pub sums: MethodMetrics,
}

impl ComplexityTotals {
    fn record(&mut self, method: MethodMetrics) {
        self.violations += method.violations();
        self.measured += 1;
        self.sums.ccn2 += method.ccn2;
        self.sums.npath += method.npath;
        self.sums.hb += method.hb;
        self.sums.mi += method.mi;
    }

    pub fn averages(&self) -> Option<MethodMetrics> {
        if self.measured == 0 {
            return None;
        }
        let n = self.measured as f64;
        Some(MethodMetrics {
            ccn2: self.sums.ccn2 / n,
            npath: self.sums.npath / n,
            hb: self.sums.hb / n,
            mi: self.sums.mi / n,
        })
    }
}

pub fn read_complexity(path: &Path) -> Result<Option<ComplexityTotals>> {
    let Some(content) = read_report(path) else {
        return Ok(None);
    };
    let root = parse_report(&content, path)?;

    let mut totals = ComplexityTotals::default();
    for package in root.children_named("package") {
        let types = package
            .children
            .iter()
            .filter(|node| node.name == "class" || node.name == "trait");
        for class in types {
            read_type(class, path, &mut totals)?;
        }
    }

    if totals.violations > CHECKS_PER_METHOD * totals.methods {
        return Err(DashboardError::malformed(
            path,
            format!(
                "{} violations exceed the {} checks allowed by nom={}",
                totals.violations,
                CHECKS_PER_METHOD * totals.methods,
                totals.methods
            ),
        ));
    }

    if let Some(avg) = totals.averages() {
        debug!(
            methods = totals.methods,
            violations = totals.violations,
            ccn2 = avg.ccn2,
            npath = avg.npath,
            hb = avg.hb,
            mi = avg.mi,
            "pdepend averages"
        );
    }
    Ok(Some(totals))
}

fn read_type(class: &XmlNode, path: &Path, totals: &mut ComplexityTotals) -> Result<()> {
    totals.methods += class.required_attr::<u64>("nom", path)?;
    for method in class.children_named("method") {
        totals.record(MethodMetrics {
            ccn2: method.required_attr("ccn2", path)?,
            npath: method.required_attr("npath", path)?,
            hb: method.required_attr("hb", path)?,
            mi: method.required_attr("mi", path)?,
        });
    }
    Ok(())
}

pub fn complexity_score(totals: &ComplexityTotals) -> Option<Score> {
    if totals.methods == 0 {
        return None;
    }
    let potential = (CHECKS_PER_METHOD * totals.methods) as f64;
    Some(clamp_percent(
        100.0 * (potential - totals.violations as f64) / potential,
    ))
}

#[derive(Debug, Clone, Copy)]
pub struct Pdepend;

impl ScoreProducer for Pdepend {
    fn specs(&self) -> Vec<ScoreSpec> {
        vec![SPEC]
    }

    fn produce_scores(&self, dir: &Path) -> Vec<ScoreElement> {
        let totals = absorb(SPEC.id, read_complexity(&dir.join(REPORT)));
        SPEC.element(totals.as_ref().and_then(complexity_score))
            .into_iter()
            .collect()
    }
}
