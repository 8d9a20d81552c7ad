//! Section grammar for model advice text
//!
//! A marker line switches the active section:
//! - `INSIGHTS:`, `RECOMMENDATIONS:`, `POSITIVE:` (case-insensitive, text after the colon ignored)
//! - the same words as a bare heading, optionally wrapped in `#`, `**` or numbering
//!
//! Bullet lines (`-`, `*`, `•`, `–`, `1.`, `1)`) add an item to the active
//! section. Everything else is ignored, as are bullets outside the insights and
//! recommendations sections.

use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Insights,
    Recommendations,
    Positive,
}

/// Lists extracted from advice text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSections {
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
}

fn labeled_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(?:#+\s*)?(?:\*\*)?(?:\d+[.)]\s*)?(?:\*\*)?(insights|recommendations|positive)(?:\s+reinforcement)?(?:\s*\([^)]*\))?\s*(?:\*\*)?\s*:",
        )
        .expect("valid regex")
    })
}

fn heading_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^(?:#+\s*)?(?:\*\*)?(?:\d+[.)]\s*)?(?:\*\*)?(insights|recommendations|positive)(?:\s+reinforcement)?(?:\s*\([^)]*\))?\s*(?:\*\*)?\s*$",
        )
        .expect("valid regex")
    })
}

fn bullet() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:[-•–]\s*|\*\s+|\d{1,2}[.)]\s+)(\S.*)$").expect("valid regex")
    })
}

fn marker(line: &str) -> Option<Section> {
    let caps = labeled_marker()
        .captures(line)
        .or_else(|| heading_marker().captures(line))?;

    match caps[1].to_lowercase().as_str() {
        "insights" => Some(Section::Insights),
        "recommendations" => Some(Section::Recommendations),
        _ => Some(Section::Positive),
    }
}

fn bullet_item(line: &str) -> Option<String> {
    let caps = bullet().captures(line)?;
    let item = caps[1].replace("**", "");
    let item = item.trim();

    // Skip rules like `---` and other punctuation-only lines
    if !item.chars().any(char::is_alphanumeric) {
        return None;
    }
    Some(item.to_string())
}

/// Split advice text into insight and recommendation lists
pub fn parse_sections(text: &str) -> ParsedSections {
    let mut parsed = ParsedSections::default();
    let mut section: Option<Section> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(next) = marker(line) {
            section = Some(next);
            continue;
        }

        let Some(item) = bullet_item(line) else {
            continue;
        };

        match section {
            Some(Section::Insights) => parsed.insights.push(item),
            Some(Section::Recommendations) => parsed.recommendations.push(item),
            Some(Section::Positive) | None => {}
        }
    }

    parsed
}
