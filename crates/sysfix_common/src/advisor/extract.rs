//! Recommendation extraction from free-form advisor output
//!
//! Thinking models ramble before they conclude. The scan runs from the end
//! of the text backwards, so the conclusion wins over the reasoning.
//! Pure string in, string out.

/// Lines shorter than this (in chars) are never picked as a conclusion
const MIN_RECOMMENDATION_CHARS: usize = 10;

/// Reasoning openers that are never a conclusion
const HEDGE_MARKERS: &[&str] = &[
    "okay",
    "ok,",
    "ok ",
    "wait",
    "first",
    "hmm",
    "let me",
    "alternatively",
    "actually",
    "thinking",
    "so,",
    "but ",
];

const MARKER: &str = "recommendation";

/// Characters used to decorate a marker line in markdown
const DECORATION: &[char] = &['*', '_', '#', '>', '-', '`'];

/// Extract the single final recommendation from raw advisor text.
///
/// 1. a line starting with `Recommendation:` (any case, optionally
///    decorated, e.g. `**Recommendation:**`) - the marker is stripped
/// 2. else the last line over 10 chars that is not a hedge
/// 3. else the last non-blank line, else the raw text itself
pub fn extract_recommendation(raw: &str) -> String {
    let body = strip_think_blocks(raw);
    let lines: Vec<&str> = body
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    for (idx, line) in lines.iter().enumerate().rev() {
        if let Some(rest) = strip_marker(line) {
            if !rest.is_empty() {
                return rest.to_string();
            }
            // Marker alone on its line: the recommendation follows it
            if let Some(next) = lines.get(idx + 1) {
                return next.trim_matches(DECORATION).trim().to_string();
            }
        }
    }

    if let Some(line) = lines
        .iter()
        .rev()
        .find(|l| l.chars().count() > MIN_RECOMMENDATION_CHARS && !is_hedge(l))
    {
        return line.to_string();
    }

    match lines.last() {
        Some(line) => line.to_string(),
        None => raw.to_string(),
    }
}

/// Strip a leading recommendation marker, returning the remainder
fn strip_marker(line: &str) -> Option<&str> {
    let undecorated = line.trim_start_matches(|c: char| DECORATION.contains(&c) || c.is_whitespace());
    let head = undecorated.get(..MARKER.len())?;
    if !head.eq_ignore_ascii_case(MARKER) {
        return None;
    }
    let after = undecorated[MARKER.len()..].trim_start_matches(DECORATION);
    let rest = after.strip_prefix(':')?;
    Some(rest.trim().trim_matches(DECORATION).trim())
}

fn is_hedge(line: &str) -> bool {
    let lower = line.to_lowercase();
    HEDGE_MARKERS.iter().any(|m| lower.starts_with(m))
}

/// Drop `<think>...</think>` blocks, unless nothing would remain
fn strip_think_blocks(raw: &str) -> std::borrow::Cow<'_, str> {
    const OPEN: &str = "<think>";
    const CLOSE: &str = "</think>";

    if !raw.contains(CLOSE) {
        return raw.into();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(close) = rest.find(CLOSE) {
        let open = rest[..close].find(OPEN).unwrap_or(0);
        out.push_str(&rest[..open]);
        rest = &rest[close + CLOSE.len()..];
    }
    out.push_str(rest);

    if out.trim().is_empty() {
        raw.into()
    } else {
        out.into()
    }
}
