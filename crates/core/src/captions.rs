//! Caption text cleanup for WebVTT and SRT tracks.

use std::sync::LazyLock;

use regex::Regex;

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*WEBVTT.*$").unwrap());
static CUE_INDEX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s*\d+\s*$").unwrap());
static HOURS_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*\d{1,2}:\d{2}:\d{2}[.,]\d{1,3}\s+-->.*$").unwrap()
});
static MINUTES_RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\d{1,2}:\d{2}[.,]\d{1,3}\s+-->.*$").unwrap());
static NOTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s*NOTE.*$").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>\n]+>").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static HMS_FRACTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{2}):([0-9]{2}):([0-9]{2})[.,]([0-9]{1,3})$").unwrap());
static MS_FRACTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{2}):([0-9]{2})[.,]([0-9]{1,3})$").unwrap());
static HMS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{2}):([0-9]{2}):([0-9]{2})$").unwrap());

/// Convert a raw caption track into a single line of plain text.
///
/// Headers, cue numbers, timestamp ranges, `NOTE` blocks and inline tags are
/// dropped. Empty input gives an empty string, and normalizing the output
/// again leaves it unchanged.
pub fn normalize(raw: &str) -> String {
    let mut text = normalize_pass(raw);
    // Joining lines can line up text that a removal pattern matches.
    loop {
        let next = normalize_pass(&text);
        if next == text {
            return text;
        }
        text = next;
    }
}

fn normalize_pass(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let text = strip_tags(raw);
    let text = HEADER_RE.replace_all(&text, "");
    let text = NOTE_RE.replace_all(&text, "");
    let text = CUE_INDEX_RE.replace_all(&text, "");
    let text = HOURS_RANGE_RE.replace_all(&text, "");
    let text = MINUTES_RANGE_RE.replace_all(&text, "");
    collapse_whitespace(&text)
}

pub fn strip_tags(line: &str) -> String {
    TAG_RE.replace_all(line, "").into_owned()
}

pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

/// Parse a cue timestamp into seconds.
///
/// Accepted shapes, tried in order: `HH:MM:SS.fff`, `MM:SS.fff`, `HH:MM:SS`.
/// The fraction separator may be `.` or `,`.
pub fn parse_timestamp(ts: &str) -> Option<f64> {
    let ts = ts.trim();

    if let Some(caps) = HMS_FRACTION_RE.captures(ts) {
        let h: f64 = caps[1].parse().ok()?;
        let m: f64 = caps[2].parse().ok()?;
        let s: f64 = caps[3].parse().ok()?;
        let ms: f64 = caps[4].parse().ok()?;
        return Some(h * 3600.0 + m * 60.0 + s + ms / 1000.0);
    }

    if let Some(caps) = MS_FRACTION_RE.captures(ts) {
        let m: f64 = caps[1].parse().ok()?;
        let s: f64 = caps[2].parse().ok()?;
        let ms: f64 = caps[3].parse().ok()?;
        return Some(m * 60.0 + s + ms / 1000.0);
    }

    if let Some(caps) = HMS_RE.captures(ts) {
        let h: f64 = caps[1].parse().ok()?;
        let m: f64 = caps[2].parse().ok()?;
        let s: f64 = caps[3].parse().ok()?;
        return Some(h * 3600.0 + m * 60.0 + s);
    }

    None
}
