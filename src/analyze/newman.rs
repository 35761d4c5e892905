use super::{absorb, ScoreProducer, ScoreSpec};
use crate::error::Result;
use crate::scan::filesystem::read_report;
use crate::scan::xml::parse_report;
use crate::types::summary::{Score, ScoreElement};
use std::path::Path;
use tracing::debug;

pub const REPORT: &str = "newman-junit.xml";

const SPEC: ScoreSpec = ScoreSpec::new("newman", "Newman", 0.0);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestTotals {
    pub requests: u64,
    pub tests: u64,
    pub failures: u64,
}

impl RequestTotals {
    pub fn passed(&self) -> i64 {
        self.tests as i64 - self.failures as i64
    }
}

/// Root `tests` counts requests; each child suite holds the assertions of one request.
pub fn read_request_totals(path: &Path) -> Result<Option<RequestTotals>> {
    let Some(content) = read_report(path) else {
        return Ok(None);
    };
    let root = parse_report(&content, path)?;

    let mut totals = RequestTotals {
        requests: root.optional_attr("tests", path)?,
        ..RequestTotals::default()
    };
    for suite in &root.children {
        totals.tests += suite.optional_attr::<u64>("tests", path)?;
        totals.failures += suite.optional_attr::<u64>("failures", path)?;
        for case in suite.children_named("testcase") {
            if let Some(failure) = case.child("failure") {
                debug!(
                    request = suite.attr("name").unwrap_or_default(),
                    assertion = case.attr("name").unwrap_or_default(),
                    message = %failure.text,
                    "newman assertion failed"
                );
            }
        }
    }
    debug!(
        requests = totals.requests,
        tests = totals.tests,
        failures = totals.failures,
        "newman totals"
    );
    Ok(Some(totals))
}

pub fn request_score(totals: &RequestTotals) -> Option<Score> {
    if totals.tests == 0 {
        return None;
    }
    Some((100.0 * totals.passed() as f64 / totals.tests as f64).max(0.0))
}

#[derive(Debug, Clone, Copy)]
pub struct Newman;

impl ScoreProducer for Newman {
    fn specs(&self) -> Vec<ScoreSpec> {
        vec![SPEC]
    }

    fn produce_scores(&self, dir: &Path) -> Vec<ScoreElement> {
        let totals = absorb(SPEC.id, read_request_totals(&dir.join(REPORT)));
        SPEC.element(totals.as_ref().and_then(request_score))
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const NEWMAN_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuites name="API" tests="2" time="0.42">
  <testsuite name="GET /health" id="1" tests="3" failures="0" errors="0" time="0.1">
    <testcase name="status is 200" time="0.1"/>
  </testsuite>
  <testsuite name="POST /login" id="2" tests="5" failures="2" errors="0" time="0.3">
    <testcase name="token present" time="0.1"><failure type="AssertionFailure">missing</failure></testcase>
  </testsuite>
</testsuites>"#;

    #[test]
    fn sums_suites_under_the_root() {
        let dir = TempDir::new().expect("temp dir should be created");
        fs::write(dir.path().join(REPORT), NEWMAN_XML).expect("report should write");

        let totals = read_request_totals(&dir.path().join(REPORT))
            .expect("report should parse")
            .expect("report should be present");
        assert_eq!(
            totals,
            RequestTotals {
                requests: 2,
                tests: 8,
                failures: 2,
            }
        );
        assert_eq!(totals.passed(), 6);

        let elements = Newman.produce_scores(dir.path());
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].value, Some(75.0));
        assert_eq!(elements[0].coefficient, 0.0);
    }

    #[test]
    fn no_tests_is_undefined_and_failures_never_go_negative() {
        assert_eq!(request_score(&RequestTotals::default()), None);
        let odd = RequestTotals {
            requests: 1,
            tests: 1,
            failures: 3,
        };
        assert_eq!(request_score(&odd), Some(0.0));
    }
}
