use super::{ScoreProducer, ScoreSpec};
use crate::types::summary::ScoreElement;
use std::path::Path;
use tracing::debug;

/// Tool whose folder is recognised but never scored.
#[derive(Debug, Clone, Copy)]
pub struct Placeholder {
    spec: ScoreSpec,
}

impl Placeholder {
    pub const fn new(id: &'static str, name: &'static str, coefficient: f64) -> Self {
        Self {
            spec: ScoreSpec::new(id, name, coefficient),
        }
    }
}

impl ScoreProducer for Placeholder {
    fn specs(&self) -> Vec<ScoreSpec> {
        vec![self.spec]
    }

    fn produce_scores(&self, dir: &Path) -> Vec<ScoreElement> {
        debug!(tool = self.spec.id, dir = %dir.display(), "tool has no scoring rule");
        Vec::new()
    }
}
