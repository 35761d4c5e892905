use crate::types::summary::{Score, Summary};

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Pass { global: Score },
    Fail { message: String },
    /// No weighted score exists, so there is nothing to compare.
    Ungraded,
}

pub fn check(summary: &Summary, threshold: f64) -> Outcome {
    if !summary.has_data() {
        return Outcome::Ungraded;
    }
    let global = summary.global();
    if global >= threshold {
        Outcome::Pass { global }
    } else {
        Outcome::Fail {
            message: format!(
                "acceptance value not reached: expected at least {threshold:.3}%, got {global:.3}%"
            ),
        }
    }
}
