//! Report text extraction.
//!
//! Pulls the embeddable fields out of a project report in a fixed order and
//! joins them into one newline-separated string. Extraction never fails:
//! missing or mistyped fields simply contribute nothing.

use serde_json::Value;

/// Extract the embeddable text from a report document.
///
/// Segments are collected in a fixed order:
///
/// 1. `overview.summary`
/// 2. `overview.mainTech`
/// 3. `projectInfo.techStack`: string elements joined with `", "` into one
///    segment
/// 4. every `keyImplementations[i].title`, preserving list order
///
/// Only non-empty strings are appended. A `techStack` that is not an array is
/// skipped rather than coerced, as is any field holding a non-string value.
/// The collected segments are joined with a newline.
///
/// The result may be empty; deciding whether that is acceptable belongs to
/// the caller, not the extractor.
pub fn extract_embedding_text(report: &Value) -> String {
    let mut parts: Vec<String> = Vec::new();

    let overview = report.get("overview");
    if let Some(summary) = overview.and_then(|o| o.get("summary")).and_then(Value::as_str) {
        if !summary.is_empty() {
            parts.push(summary.to_owned());
        }
    }
    if let Some(main_tech) = overview.and_then(|o| o.get("mainTech")).and_then(Value::as_str) {
        if !main_tech.is_empty() {
            parts.push(main_tech.to_owned());
        }
    }

    let tech_stack = report
        .get("projectInfo")
        .and_then(|info| info.get("techStack"))
        .and_then(Value::as_array);
    if let Some(items) = tech_stack {
        let joined = items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        if !joined.is_empty() {
            parts.push(joined);
        }
    }

    if let Some(implementations) = report.get("keyImplementations").and_then(Value::as_array) {
        for entry in implementations {
            if let Some(title) = entry.get("title").and_then(Value::as_str) {
                if !title.is_empty() {
                    parts.push(title.to_owned());
                }
            }
        }
    }

    parts.join("\n")
}
