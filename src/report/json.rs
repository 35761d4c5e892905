use crate::types::summary::Summary;

/// Same document as the summary file, indented for terminals.
pub fn to_json(summary: &Summary) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(summary)
}
