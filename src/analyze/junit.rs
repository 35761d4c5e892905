use crate::error::{DashboardError, Result};
use crate::scan::filesystem::read_report;
use crate::scan::xml::{parse_report, XmlNode};
use std::path::Path;

/// Counters of the top-level `<testsuite>` of a JUnit report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuiteTotals {
    pub tests: u64,
    pub assertions: u64,
    pub errors: u64,
    pub failures: u64,
    pub skipped: u64,
}

impl SuiteTotals {
    pub fn unsuccessful(&self) -> u64 {
        self.errors + self.failures + self.skipped
    }

    /// Share of tests that neither errored, failed nor were skipped.
    pub fn success_ratio(&self) -> Option<f64> {
        if self.tests == 0 {
            return None;
        }
        let ratio = 1.0 - self.unsuccessful() as f64 / self.tests as f64;
        Some(ratio.clamp(0.0, 1.0))
    }

    pub fn merge(&mut self, other: &SuiteTotals) {
        self.tests += other.tests;
        self.assertions += other.assertions;
        self.errors += other.errors;
        self.failures += other.failures;
        self.skipped += other.skipped;
    }
}

pub fn read_suite_totals(path: &Path) -> Result<Option<SuiteTotals>> {
    let Some(content) = read_report(path) else {
        return Ok(None);
    };
    let root = parse_report(&content, path)?;
    let suite = top_suite(&root)
        .ok_or_else(|| DashboardError::malformed(path, "no <testsuite> element"))?;

    Ok(Some(SuiteTotals {
        tests: suite.required_attr("tests", path)?,
        assertions: suite.optional_attr("assertions", path)?,
        errors: suite.optional_attr("errors", path)?,
        failures: suite.optional_attr("failures", path)?,
        skipped: suite.optional_attr("skipped", path)?,
    }))
}

fn top_suite(root: &XmlNode) -> Option<&XmlNode> {
    if root.name == "testsuite" {
        Some(root)
    } else {
        root.child("testsuite")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const PHPUNIT_REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuites>
  <testsuite name="Unit" tests="40" assertions="120" errors="1" failures="2" skipped="1" time="1.5">
    <testsuite name="App\Tests\FooTest" tests="40" assertions="120" errors="1" failures="2" skipped="1">
      <testcase name="testA" file="/app/tests/FooTest.php" line="12"/>
    </testsuite>
  </testsuite>
</testsuites>"#;

    #[test]
    fn reads_first_testsuite_counters() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("phpunit-unit.xml");
        fs::write(&path, PHPUNIT_REPORT).expect("report should write");

        let totals = read_suite_totals(&path)
            .expect("report should parse")
            .expect("report should be present");
        assert_eq!(
            totals,
            SuiteTotals {
                tests: 40,
                assertions: 120,
                errors: 1,
                failures: 2,
                skipped: 1,
            }
        );
        assert_eq!(totals.success_ratio(), Some(0.9));
    }

    #[test]
    fn accepts_testsuite_as_document_root() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("junit.xml");
        fs::write(&path, r#"<testsuite tests="5" failures="1"/>"#).expect("report should write");

        let totals = read_suite_totals(&path)
            .expect("report should parse")
            .expect("report should be present");
        assert_eq!(totals.tests, 5);
        assert_eq!(totals.failures, 1);
        assert_eq!(totals.errors, 0);
    }

    #[test]
    fn missing_tests_attribute_is_malformed() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("junit.xml");
        fs::write(&path, r#"<testsuites><testsuite name="x"/></testsuites>"#)
            .expect("report should write");
        assert!(read_suite_totals(&path).is_err());
    }

    #[test]
    fn blank_report_is_absent() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("junit.xml");
        fs::write(&path, "\n").expect("report should write");
        assert_eq!(read_suite_totals(&path).ok(), Some(None));
    }

    #[test]
    fn success_ratio_is_undefined_without_tests_and_never_negative() {
        assert_eq!(SuiteTotals::default().success_ratio(), None);
        let broken = SuiteTotals {
            tests: 2,
            errors: 3,
            ..SuiteTotals::default()
        };
        assert_eq!(broken.success_ratio(), Some(0.0));
    }

    #[test]
    fn merge_sums_every_counter() {
        let mut total = SuiteTotals {
            tests: 10,
            failures: 1,
            ..SuiteTotals::default()
        };
        total.merge(&SuiteTotals {
            tests: 5,
            errors: 2,
            skipped: 1,
            assertions: 7,
            failures: 0,
        });
        assert_eq!(total.tests, 15);
        assert_eq!(total.unsuccessful(), 4);
        assert_eq!(total.assertions, 7);
    }
}
