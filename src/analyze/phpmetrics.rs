use super::{absorb, clamp_percent, ScoreProducer, ScoreSpec};
use crate::error::{DashboardError, Result};
use crate::scan::filesystem::read_report;
use crate::types::summary::{Score, ScoreElement};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

pub const TOOL_ID: &str = "phpmetrics";
pub const REPORT: &str = "js/latest.json";

const LCOM: ScoreSpec = ScoreSpec::new("phpmetrics_lcom", "Lack in cohesion of methods", 3.0);
const CC: ScoreSpec = ScoreSpec::new("phpmetrics_cc", "Cyclomatic complexity", 2.0);
const MI: ScoreSpec = ScoreSpec::new("phpmetrics_mi", "Maintainability index", 1.0);
const BUGS: ScoreSpec = ScoreSpec::new("phpmetrics_bugs", "Bugs probability", 0.5);
const VOLUME: ScoreSpec = ScoreSpec::new("phpmetrics_volume", "Volume of code", 0.5);

/// Maintainability index considered fully healthy.
const MI_TARGET: f64 = 85.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Averages {
    pub lcom: f64,
    pub ccn: f64,
    pub mi: f64,
    pub bugs: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sums {
    #[serde(default)]
    pub loc: u64,
    #[serde(default)]
    pub lloc: u64,
    #[serde(default)]
    pub cloc: u64,
    #[serde(default)]
    pub nb_methods: u64,
    #[serde(default)]
    pub nb_classes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct MetricsReport {
    pub avg: Averages,
    #[serde(default)]
    pub sum: Option<Sums>,
}

pub fn read_metrics(path: &Path) -> Result<Option<MetricsReport>> {
    let Some(content) = read_report(path) else {
        return Ok(None);
    };
    let report: MetricsReport = serde_json::from_str(&content)
        .map_err(|e| DashboardError::malformed(path, e.to_string()))?;
    if let Some(sum) = &report.sum {
        debug!(
            loc = sum.loc,
            lloc = sum.lloc,
            cloc = sum.cloc,
            methods = sum.nb_methods,
            classes = sum.nb_classes,
            "phpmetrics totals"
        );
    }
    Ok(Some(report))
}

/// Volume divisor placing 100 at full marks and 8000 at zero.
pub fn volume_leap_factor() -> f64 {
    ((8000f64.powf(1.5) - 100f64.powf(1.5)) / 100.0).powf(2.0 / 3.0)
}

pub fn lcom_score(avg: &Averages) -> Score {
    clamp_percent(100.0 * (2.0 - avg.lcom))
}

pub fn cc_score(avg: &Averages) -> Score {
    clamp_percent(100.0 * (2.0 - avg.ccn))
}

pub fn mi_score(avg: &Averages) -> Score {
    clamp_percent(100.0 * avg.mi / MI_TARGET)
}

pub fn bugs_score(avg: &Averages) -> Score {
    clamp_percent(100.49 - (5.0125 * avg.bugs).powi(2))
}

pub fn volume_score(avg: &Averages) -> Score {
    let scaled = avg.volume.max(0.0) / volume_leap_factor();
    clamp_percent(100.14 - scaled.powf(1.5))
}

#[derive(Debug, Clone, Copy)]
pub struct PhpMetrics;

impl ScoreProducer for PhpMetrics {
    fn specs(&self) -> Vec<ScoreSpec> {
        vec![LCOM, CC, MI, BUGS, VOLUME]
    }

    fn produce_scores(&self, dir: &Path) -> Vec<ScoreElement> {
        let Some(report) = absorb(TOOL_ID, read_metrics(&dir.join(REPORT))) else {
            return Vec::new();
        };
        let avg = report.avg;
        let scorers: [(ScoreSpec, fn(&Averages) -> Score); 5] = [
            (LCOM, lcom_score),
            (CC, cc_score),
            (MI, mi_score),
            (BUGS, bugs_score),
            (VOLUME, volume_score),
        ];
        scorers
            .iter()
            .filter_map(|(spec, score)| spec.element(Some(score(&avg))))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn averages(lcom: f64, ccn: f64, mi: f64, bugs: f64, volume: f64) -> Averages {
        Averages {
            lcom,
            ccn,
            mi,
            bugs,
            volume,
        }
    }

    #[test]
    fn leap_factor_maps_volume_bounds() {
        let k = volume_leap_factor();
        assert!((k - 370.981).abs() < 1e-3);
        assert!(volume_score(&averages(0.0, 0.0, 0.0, 0.0, 8000.0)) < 1e-3);
        assert_eq!(volume_score(&averages(0.0, 0.0, 0.0, 0.0, 100.0)), 100.0);
        assert!((volume_score(&averages(0.0, 0.0, 0.0, 0.0, 1000.0)) - 95.71).abs() < 0.01);
        assert_eq!(volume_score(&averages(0.0, 0.0, 0.0, 0.0, -5.0)), 100.0);
    }

    #[test]
    fn scores_stay_in_percent_range() {
        let good = averages(1.0, 1.5, 100.0, 0.0, 0.0);
        assert_eq!(lcom_score(&good), 100.0);
        assert_eq!(cc_score(&good), 50.0);
        assert_eq!(mi_score(&good), 100.0);
        assert_eq!(bugs_score(&good), 100.0);
        assert_eq!(volume_score(&good), 100.0);

        let bad = averages(3.0, 4.0, -10.0, 10.0, 20000.0);
        for score in [
            lcom_score(&bad),
            cc_score(&bad),
            mi_score(&bad),
            bugs_score(&bad),
            volume_score(&bad),
        ] {
            assert_eq!(score, 0.0);
        }
    }

    #[test]
    fn emits_five_weighted_elements() {
        let dir = TempDir::new().expect("temp dir should be created");
        fs::create_dir_all(dir.path().join("js")).expect("js dir should be created");
        fs::write(
            dir.path().join(REPORT),
            r#"{"avg":{"lcom":1.2,"ccn":1.1,"mi":68,"bugs":0.1,"volume":300},"sum":{"loc":1200,"lloc":800,"cloc":200,"nbMethods":40,"nbClasses":8,"nbInterfaces":1}}"#,
        )
        .expect("report should write");

        let elements = PhpMetrics.produce_scores(dir.path());
        let ids: Vec<&str> = elements.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "phpmetrics_lcom",
                "phpmetrics_cc",
                "phpmetrics_mi",
                "phpmetrics_bugs",
                "phpmetrics_volume"
            ]
        );
        assert!((elements[0].value.unwrap_or_default() - 80.0).abs() < 1e-9);
        assert!((elements[2].value.unwrap_or_default() - 80.0).abs() < 1e-9);
        let weight: f64 = elements.iter().map(|e| e.coefficient).sum();
        assert_eq!(weight, 7.0);
    }

    #[test]
    fn sum_section_is_optional_but_avg_is_not() {
        let dir = TempDir::new().expect("temp dir should be created");
        fs::create_dir_all(dir.path().join("js")).expect("js dir should be created");
        let path = dir.path().join(REPORT);

        fs::write(&path, r#"{"avg":{"lcom":1,"ccn":1,"mi":85,"bugs":0,"volume":0}}"#)
            .expect("report should write");
        let report = read_metrics(&path)
            .expect("report should parse")
            .expect("report should be present");
        assert_eq!(report.sum, None);

        fs::write(&path, r#"{"sum":{"loc":3}}"#).expect("report should write");
        assert!(read_metrics(&path).is_err());
        assert!(PhpMetrics.produce_scores(dir.path()).is_empty());
    }
}
