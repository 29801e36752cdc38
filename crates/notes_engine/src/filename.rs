pub const DEFAULT_EXPORT_STEM: &str = "ai-video-note";

/// File name for an exported note: the first `##` heading of the document,
/// stripped of characters file systems reject, plus `.md`. Falls back to
/// `ai-video-note.md`.
pub fn export_filename(markdown: &str) -> String {
    let stem = first_heading(markdown)
        .map(sanitize_title)
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| DEFAULT_EXPORT_STEM.to_string());
    format!("{stem}.md")
}

/// Text after the first `##`, skipping any whitespace (newlines included)
/// and running to the end of that line.
fn first_heading(markdown: &str) -> Option<&str> {
    let start = markdown.find("##")? + 2;
    let rest = markdown[start..].trim_start();
    let line = rest.split('\n').next().unwrap_or(rest);
    Some(line.trim())
}

/// Trims, then removes `\ / : * ? " < > |`. Nothing else is touched, so
/// dots, reserved device names and the space a removed leading character
/// leaves behind all survive.
fn sanitize_title(input: &str) -> String {
    input.trim().chars().filter(|c| !is_forbidden(*c)).collect()
}

fn is_forbidden(c: char) -> bool {
    matches!(c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
}
