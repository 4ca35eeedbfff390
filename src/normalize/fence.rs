const FENCE: &str = "```";

/// Strip the markdown fencing and quoting models sometimes wrap JSON in.
///
/// Recognizes a single convention: an opening run of backticks optionally
/// followed by a `json` tag, a closing triple backtick, and surrounding
/// double quotes.
pub fn strip_fences(text: &str) -> String {
    let mut cleaned = text.trim();

    if cleaned.starts_with(FENCE) {
        cleaned = cleaned.trim_start_matches('`');
        if let Some(rest) = cleaned.strip_prefix("json") {
            cleaned = rest.trim();
        }
    }
    if let Some(rest) = cleaned.strip_suffix(FENCE) {
        cleaned = rest.trim();
    }

    cleaned.trim_matches('"').trim().to_string()
}
