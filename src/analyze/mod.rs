pub mod junit;
pub mod newman;
pub mod pdepend;
pub mod phpcpd;
pub mod phpcs;
pub mod phpmetrics;
pub mod phpstan;
pub mod phpunit;
pub mod placeholder;

use crate::config::RunSettings;
use crate::error::{DashboardError, Result};
use crate::scan::ToolFolder;
use crate::types::config::PhpUnitMode;
use crate::types::summary::{Score, ScoreElement, Summary};
use std::path::Path;
use tracing::{debug, info, warn};

/// Identity and weight of one score a handler can emit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub coefficient: f64,
}

impl ScoreSpec {
    pub const fn new(id: &'static str, name: &'static str, coefficient: f64) -> Self {
        Self {
            id,
            name,
            coefficient,
        }
    }

    pub fn element(&self, value: Option<Score>) -> Option<ScoreElement> {
        ScoreElement::scored(self.id, self.name, value, self.coefficient)
    }
}

/// Reads one tool's report folder and turns it into score elements.
///
/// Implementations never fail: an absent or malformed report yields no element.
pub trait ScoreProducer {
    fn specs(&self) -> Vec<ScoreSpec>;

    fn produce_scores(&self, dir: &Path) -> Vec<ScoreElement>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    PhpUnit,
    PhpCodeSniffer,
    PhpStan,
    PhpCpd,
    Pdepend,
    PhpMetrics,
    Newman,
    Behat,
    Gatling,
    PhpStorm,
    Sonar,
    Uml,
}

impl ToolKind {
    pub const ALL: [ToolKind; 12] = [
        ToolKind::Behat,
        ToolKind::Gatling,
        ToolKind::Newman,
        ToolKind::Pdepend,
        ToolKind::PhpCodeSniffer,
        ToolKind::PhpCpd,
        ToolKind::PhpMetrics,
        ToolKind::PhpStan,
        ToolKind::PhpStorm,
        ToolKind::PhpUnit,
        ToolKind::Sonar,
        ToolKind::Uml,
    ];

    /// Log folder name the tool writes its reports to.
    pub fn id(self) -> &'static str {
        match self {
            Self::PhpUnit => "phpunit",
            Self::PhpCodeSniffer => "phpcs",
            Self::PhpStan => "phpstan",
            Self::PhpCpd => "phpcpd",
            Self::Pdepend => "pdepend",
            Self::PhpMetrics => "phpmetrics",
            Self::Newman => "newman",
            Self::Behat => "behat",
            Self::Gatling => "gatling",
            Self::PhpStorm => "phpstorm",
            Self::Sonar => "sonar",
            Self::Uml => "uml",
        }
    }

    pub fn resolve(tool_id: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == tool_id)
            .ok_or_else(|| DashboardError::UnknownTool(tool_id.to_string()))
    }

    pub fn handler(self, phpunit_mode: PhpUnitMode) -> Box<dyn ScoreProducer> {
        match self {
            Self::PhpUnit => Box::new(phpunit::PhpUnit::new(phpunit_mode)),
            Self::PhpCodeSniffer => Box::new(phpcs::PhpCodeSniffer),
            Self::PhpStan => Box::new(phpstan::PhpStan),
            Self::PhpCpd => Box::new(phpcpd::PhpCpd),
            Self::Pdepend => Box::new(pdepend::Pdepend),
            Self::PhpMetrics => Box::new(phpmetrics::PhpMetrics),
            Self::Newman => Box::new(newman::Newman),
            Self::Behat => Box::new(placeholder::Placeholder::new("behat", "Behat", 4.0)),
            Self::Gatling => Box::new(placeholder::Placeholder::new("gatling", "Gatling", 0.0)),
            Self::PhpStorm => Box::new(placeholder::Placeholder::new(
                "phpstorm",
                "PHPStorm Inspections",
                0.0,
            )),
            Self::Sonar => Box::new(placeholder::Placeholder::new("sonar", "Sonar", 0.0)),
            Self::Uml => Box::new(placeholder::Placeholder::new("uml", "Uml", 0.0)),
        }
    }
}

/// Resolves every folder first, then scores them one by one.
pub fn analyze(folders: &[ToolFolder], settings: &RunSettings) -> Result<Summary> {
    let resolved = folders
        .iter()
        .map(|folder| ToolKind::resolve(&folder.id).map(|kind| (kind, folder)))
        .collect::<Result<Vec<_>>>()?;

    let mut summary = Summary::new();
    for (kind, folder) in resolved {
        let elements = kind
            .handler(settings.phpunit_mode)
            .produce_scores(&folder.path);
        if elements.is_empty() {
            debug!(tool = kind.id(), "no score produced");
        }
        for element in &elements {
            info!(
                tool = kind.id(),
                id = %element.id,
                value = element.value.unwrap_or_default(),
                coefficient = element.coefficient,
                "score computed"
            );
        }
        summary.extend(elements);
    }
    Ok(summary)
}

/// Turns a malformed report into "no data" at the handler boundary.
pub(crate) fn absorb<T>(tool: &str, extracted: Result<Option<T>>) -> Option<T> {
    match extracted {
        Ok(metrics) => {
            if metrics.is_none() {
                debug!(tool, "report absent or empty");
            }
            metrics
        }
        Err(e) => {
            warn!(tool, error = %e, "ignoring malformed report");
            None
        }
    }
}

pub(crate) fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}
