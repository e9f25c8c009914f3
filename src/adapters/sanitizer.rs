//! Extraction of a code fragment from a model's free-text reply.
//!
//! This is a heuristic, not a parser: it takes the first fenced block (or the
//! whole reply) and drops lines that read like conversational preamble.

use once_cell::sync::Lazy;
use regex::Regex;

/// First fenced block; an optional language tag must sit alone on the fence line.
static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```(?:[A-Za-z0-9_+.\-]*[ \t]*\r?\n)?(.*?)```").expect("fenced block pattern")
});

/// Lowercased line prefixes treated as conversational filler
pub const FILLER_PREFIXES: &[&str] = &[
    "here is",
    "here's",
    "i have generated",
    "i've generated",
    "below is",
    "sure,",
    "sure!",
    "certainly",
    "of course",
];

/// Strips a raw model reply down to a best-effort code fragment
pub fn sanitize(raw: &str) -> String {
    let code = FENCED_BLOCK
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map_or(raw, |m| m.as_str());

    code.lines()
        .filter(|line| !is_filler(line))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn is_filler(line: &str) -> bool {
    let lowered = line.trim().to_lowercase();
    FILLER_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
}
