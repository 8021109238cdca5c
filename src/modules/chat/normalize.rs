use regex::Regex;
use std::sync::LazyLock;

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```[a-zA-Z]*$").expect("valid code fence pattern"));
static PDF_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.pdf").expect("valid pdf pattern"));
static PAGE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)page#\s*\d+").expect("valid page marker pattern"));

/// Strips model output artifacts (JSON array brackets on their own line, code
/// fences, `.pdf` suffixes, `page# N` markers) so the text can be displayed.
///
/// Idempotent: passes repeat until nothing changes, since a removal can glue
/// the surrounding text into a fresh artifact (`.p.pdfdf`).
pub fn normalize_response(text: &str) -> String {
    let mut current = single_pass(text);
    loop {
        let next = single_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn single_pass(text: &str) -> String {
    let kept: Vec<&str> = text
        .split('\n')
        .filter(|line| !is_artifact_line(line.trim()))
        .collect();

    let joined = kept.join("\n");
    let cleaned = PDF_SUFFIX.replace_all(joined.trim(), "");
    PAGE_MARKER.replace_all(&cleaned, "").into_owned()
}

fn is_artifact_line(trimmed: &str) -> bool {
    trimmed == "[" || trimmed == "]" || CODE_FENCE.is_match(trimmed)
}
