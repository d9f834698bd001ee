//! Completion Parsers
//!
//! Best-effort label extraction from free-form model output.
//! A miss is never an error: absent fields come back as `None` or an empty vector
//! and the caller applies its own fallbacks.

use std::sync::LazyLock;

use regex::Regex;

use super::{VideoResult, WorksheetQuestion};
use crate::constants::study as study_constants;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Title:\s*([^\n]+)").expect("valid title regex"));

static INSTRUCTIONS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Instructions:\s*([^\n]+)").expect("valid instructions regex")
});

static QUESTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Question:\s*([^\n]+)\s*Answer:\s*([^\n]+)").expect("valid question regex")
});

static VIDEO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)Title:([^\n]+).*?ID:([^\n]+).*?Description:([^\n]+)")
        .expect("valid video regex")
});

/// Whatever the worksheet parser managed to find
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedWorksheet {
    pub title: Option<String>,
    pub instructions: Option<String>,
    pub questions: Vec<WorksheetQuestion>,
}

/// Extract title, instructions and question/answer pairs
pub fn parse_worksheet(text: &str) -> ParsedWorksheet {
    let capture = |re: &Regex| {
        re.captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    };

    let questions = QUESTION_RE
        .captures_iter(text)
        .map(|c| WorksheetQuestion {
            question: c[1].trim().to_string(),
            answer: c[2].trim().to_string(),
        })
        .collect();

    ParsedWorksheet {
        title: capture(&TITLE_RE),
        instructions: capture(&INSTRUCTIONS_RE),
        questions,
    }
}

/// Extract `Title / ID / Description` groups
pub fn parse_videos(text: &str) -> Vec<VideoResult> {
    VIDEO_RE
        .captures_iter(text)
        .map(|c| VideoResult {
            title: c[1].trim().to_string(),
            video_id: normalize_video_id(&c[2]),
            description: c[3].trim().to_string(),
        })
        .collect()
}

/// Keep `[A-Za-z0-9_-]` and cut to the identifier length
pub fn normalize_video_id(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .take(study_constants::VIDEO_ID_LEN)
        .collect()
}
