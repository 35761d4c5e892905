use chrono::{NaiveDateTime, Timelike};
use std::fmt;
use tracing::warn;

const LABEL_FORMAT: &str = "%Y%m%d%H%M";

/// CI build identifier, usually a `YYYYMMDDhhmm` timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildLabel {
    raw: String,
    built_at: Option<NaiveDateTime>,
}

impl BuildLabel {
    /// Labels that are not timestamps are kept verbatim.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim().to_string();
        let built_at = match NaiveDateTime::parse_from_str(&raw, LABEL_FORMAT) {
            Ok(built_at) => Some(built_at),
            Err(e) => {
                warn!(label = %raw, error = %e, "build label is not a YYYYMMDDhhmm timestamp");
                None
            }
        };
        Self { raw, built_at }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn human(&self) -> String {
        match self.built_at {
            Some(at) if at.hour() == 0 && at.minute() == 0 => at.format("%A %d %B %Y").to_string(),
            Some(at) => at.format("%A %d %B %Y at %H:%M").to_string(),
            None => self.raw.clone(),
        }
    }
}

impl fmt::Display for BuildLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.human())
    }
}
