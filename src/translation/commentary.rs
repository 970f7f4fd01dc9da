/*!
 * Removal of model meta-commentary from translated chunks.
 *
 * When a long article is sent in parts, small models sometimes stop
 * translating and start talking about the text ("It seems the text you
 * provided...", "Could you clarify...?"). Everything from the first such
 * paragraph to the end of the response is dropped.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::TranslationError;

/// Responses shorter than this (after trimming) are never filtered
pub const DEFAULT_MIN_LENGTH: usize = 50;

/// Observed off-task phrasings, English and Vietnamese
pub const DEFAULT_PATTERNS: &[&str] = &[
    r"it\s+seems\s+(the\s+)?text\s+you\s+provided",
    r"it\s+seems\s+like\s+you",
    r"could\s+you\s+clarify",
    r"clarify\s+what\s+you\s+need",
    r"if\s+you['\x{2019}]d\s+like\s*,\s*i\s+can\s*:",
    r"let\s+me\s+know\s*!",
    r"dường\s+như\s+bạn\s+đang\s+cố\s+gắng",
    r"hãy\s+cho\s+mình\s+biết\s+thêm\s+nhé",
    r"^\s*##\s+Ví dụ\s*$",
    r"cryptocurrency\s+holdings",
    r"listing\s+cryptocurrency",
    r"^\s*##\s*Phân\s+trích\s+số\s+liệu",
    r"phân\s+trích\s+số\s+liệu",
    r"dãy\s+số\s+có\s+vẻ",
    r#"repeated\s+["']?D["']?\s+character"#,
    r"message\s+consisting\s+of\s+repeated",
    r"Đề\s+bài\s*:\s*Người\s+dùng",
];

static DEFAULT_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    DEFAULT_PATTERNS
        .iter()
        .map(|p| compile(p).expect("built-in commentary pattern must compile"))
        .collect()
});

fn compile(pattern: &str) -> Result<Regex, TranslationError> {
    Ok(Regex::new(&format!("(?i){}", pattern))?)
}

/// Strips trailing off-task paragraphs from model output
#[derive(Debug, Clone)]
pub struct CommentaryFilter {
    patterns: Vec<Regex>,
    min_length: usize,
}

impl Default for CommentaryFilter {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_REGEXES.clone(),
            min_length: DEFAULT_MIN_LENGTH,
        }
    }
}

impl CommentaryFilter {
    /// Built-in patterns plus caller-supplied ones
    pub fn with_extra_patterns<S: AsRef<str>>(extra: &[S]) -> Result<Self, TranslationError> {
        let mut filter = Self::default();
        for pattern in extra {
            filter.patterns.push(compile(pattern.as_ref())?);
        }
        Ok(filter)
    }

    /// Override the length below which text passes through untouched
    pub fn min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    /// Number of active patterns
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Whether a single paragraph reads as commentary
    pub fn is_commentary(&self, paragraph: &str) -> bool {
        let paragraph = paragraph.trim();
        if paragraph.is_empty() {
            return false;
        }
        let first_line = paragraph.lines().next().unwrap_or_default().trim();
        self.patterns
            .iter()
            .any(|re| re.is_match(paragraph) || re.is_match(first_line))
    }

    /// Drop everything from the first commentary paragraph onwards.
    ///
    /// Returns the input unchanged when it is short, when nothing matches, or
    /// when the very first paragraph matches (an empty result is never produced).
    pub fn strip(&self, text: &str) -> String {
        if text.trim().chars().count() < self.min_length {
            return text.to_string();
        }

        let paragraphs: Vec<&str> = text.split("\n\n").collect();
        let Some(cut) = paragraphs.iter().position(|p| self.is_commentary(p)) else {
            return text.to_string();
        };

        let kept = paragraphs[..cut].join("\n\n").trim().to_string();
        if kept.is_empty() {
            return text.to_string();
        }

        debug!(
            "Stripped {} trailing paragraph(s) of model commentary ({} -> {} chars)",
            paragraphs.len() - cut,
            text.chars().count(),
            kept.chars().count()
        );
        kept
    }
}
