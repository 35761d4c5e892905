use crate::build_label::BuildLabel;
use crate::types::summary::Summary;

pub fn to_markdown(summary: &Summary, build: Option<&BuildLabel>) -> String {
    let mut output = String::new();
    output.push_str("# QA Dashboard\n\n");
    if let Some(build) = build {
        output.push_str(&format!("Build: {build}\n\n"));
    }

    match summary.aggregate() {
        Some(global) => output.push_str(&format!("Global score: {global:.3}%\n\n")),
        None => output.push_str("Global score: n/a (no weighted scores)\n\n"),
    }

    output.push_str("## Scores\n\n");
    if summary.is_empty() {
        output.push_str("- none\n");
        return output;
    }

    output.push_str("| Tool | Score | Coefficient |\n");
    output.push_str("|------|------:|------------:|\n");
    for element in summary.elements() {
        output.push_str(&format!(
            "| {} | {:.3} | {} |\n",
            element.name,
            element.value.unwrap_or_default(),
            element.coefficient
        ));
    }

    output
}
