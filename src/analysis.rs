//! Parser for the light markup convention of AI analysis text.
//!
//! The model is prompted to answer with `**...**` section headings, bullet
//! lists and short paragraphs; this module turns that text into typed
//! blocks the rendering collaborator can lay out. Parsing never fails —
//! anything unrecognized is a paragraph.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static NUMBERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\s").expect("numbered-item pattern is valid"));

/// One rendered block of analysis text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum AnalysisBlock {
    Heading(String),
    Bullet(String),
    Numbered(String),
    Paragraph(String),
}

/// Split analysis text into typed blocks, one per non-blank line.
pub fn parse_markup(text: &str) -> Vec<AnalysisBlock> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(classify_line)
        .collect()
}

fn classify_line(line: &str) -> AnalysisBlock {
    if let Some(heading) = heading_text(line) {
        return AnalysisBlock::Heading(heading);
    }
    if let Some(item) = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("• "))
        .or_else(|| line.strip_prefix("* "))
    {
        return AnalysisBlock::Bullet(item.trim().to_string());
    }
    if NUMBERED_ITEM.is_match(line) {
        return AnalysisBlock::Numbered(line.to_string());
    }
    AnalysisBlock::Paragraph(line.to_string())
}

/// A heading is a whole line wrapped in `**...**`; `**Type**: value` lines
/// are prose, not headings.
fn heading_text(line: &str) -> Option<String> {
    if line.len() > 4 && line.starts_with("**") && line.ends_with("**") {
        let inner = &line[2..line.len() - 2];
        if !inner.is_empty() && !inner.contains("**") {
            return Some(inner.trim().to_string());
        }
    }
    None
}
