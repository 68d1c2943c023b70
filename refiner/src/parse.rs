//! Best-effort grammar for the model's reply: the first `[...]` group,
//! split on commas.

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

fn bracketed_list() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[(.*?)\]").expect("static pattern is valid"))
}

/// Extracts candidate synonyms from a raw model reply.
///
/// Returns an empty list when the reply holds no bracketed list. Tokens are
/// trimmed and empty ones dropped; order and duplicates are preserved. The
/// first token exactly equal to `original_word` is removed.
pub fn extract_candidates(raw_response: &str, original_word: &str) -> Vec<String> {
    let Some(inner) = bracketed_list()
        .captures(raw_response)
        .and_then(|caps| caps.get(1))
    else {
        debug!("No bracketed list found in model reply");
        return Vec::new();
    };

    let mut candidates: Vec<String> = inner
        .as_str()
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect();

    if let Some(pos) = candidates.iter().position(|c| c == original_word) {
        candidates.remove(pos);
    }

    candidates
}
