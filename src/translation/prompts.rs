/*!
 * Prompt templates for article translation and formatting.
 *
 * Small models frequently answer the text instead of translating it, or append
 * offers to summarize it. Every template therefore repeats the same negative
 * constraints, and multi-part prompts state explicitly that the content is
 * source material rather than a question.
 */

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::language_utils::get_language_name;
use crate::translation::chunker::Chunk;

/// Constraint appended to every translation prompt.
pub const ONLY_OUTPUT_TRANSLATION: &str = "Return only the translation itself: no explanations, \
no comments, no follow-up questions, no suggestions (summary, formatting or clarification). \
If the content is repetitive or long, still output only the translation.";

const SHORT_TEXT: &str = "Translate into {target_language}. Keep proper names, place names and \
company names unchanged. Return only the translation, without explanation.

{text}";

const SINGLE_CHUNK: &str = "Translate the entire content below into {target_language}. Keep proper \
names, place names and company names unchanged. {only_output}

Title: {title}

Content:
{content}";

const FIRST_CHUNK: &str = "This is part {index}/{total} of an article. Task: TRANSLATE all of the \
content below from {source_language} into {target_language}. This is source text to be translated, \
NOT a question from a user and NOT data to be analysed. Keep proper names, place names and company \
names unchanged. {only_output}

Title: {title}

Content to translate:
{content}";

const CONTINUATION_CHUNK: &str = "This is part {index}/{total} of the same article. Task: continue \
TRANSLATING the content below from {source_language} into {target_language}. This is source text \
(for example news, tables of figures or lists); translate it verbatim, do NOT explain it, do NOT \
analyse it, do NOT answer it as if it were a question. {only_output}

Content to translate:
{content}";

const FORMAT_INSTRUCTIONS: &str = "Reformat the following {target_language} content as follows:
1. Split it into clear paragraphs, separated by one blank line
2. Use bullet points (•) for lists or key points
3. Use bold (**text**) for important keywords or terms
4. Use subheadings (## Heading) if the content is long and has several parts
Return only the formatted content: no explanations, no comments, no follow-up questions, no \
suggestions. If the content is repetitive or short, still output only the formatted part.

Content:
";

const FORMAT_PART_MARKER: &str = "[Part {index}/{total} of the {target_language} content, format only this part.]

";

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([a-z_]+)\}").unwrap());

/// Builds the instruction strings sent to the inference service.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    source_language: String,
    target_language: String,
}

impl PromptBuilder {
    /// Create a builder from language display names
    pub fn new(source_language: &str, target_language: &str) -> Self {
        Self {
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
        }
    }

    /// Create a builder from ISO 639 codes
    pub fn from_codes(source_code: &str, target_code: &str) -> Result<Self> {
        Ok(Self::new(
            &get_language_name(source_code)?,
            &get_language_name(target_code)?,
        ))
    }

    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    /// Fill every placeholder in one pass; substituted text is never rescanned,
    /// so a title or body containing `{content}` stays literal.
    fn render(&self, template: &str, values: &[(&str, &str)]) -> String {
        PLACEHOLDER
            .replace_all(template, |caps: &Captures| match &caps[1] {
                "source_language" => self.source_language.clone(),
                "target_language" => self.target_language.clone(),
                "only_output" => ONLY_OUTPUT_TRANSLATION.to_string(),
                key => values
                    .iter()
                    .find(|(name, _)| *name == key)
                    .map(|(_, value)| value.to_string())
                    .unwrap_or_else(|| caps[0].to_string()),
            })
            .into_owned()
    }

    /// Title or summary: one direct instruction, no chunk framing.
    pub fn short_text(&self, text: &str) -> String {
        self.render(SHORT_TEXT, &[("text", text.trim())])
    }

    /// Whole body in one request, with the title as context.
    pub fn single_chunk(&self, title: &str, body: &str) -> String {
        self.render(SINGLE_CHUNK, &[("title", title), ("content", body)])
    }

    /// First of several parts; carries the title.
    pub fn first_chunk(&self, title: &str, chunk: &Chunk) -> String {
        let (index, total) = (chunk.index.to_string(), chunk.total.to_string());
        self.render(
            FIRST_CHUNK,
            &[("index", index.as_str()), ("total", total.as_str()), ("title", title), ("content", chunk.text.as_str())],
        )
    }

    /// Later parts; framed as a continuation, without the title.
    pub fn continuation_chunk(&self, chunk: &Chunk) -> String {
        let (index, total) = (chunk.index.to_string(), chunk.total.to_string());
        self.render(
            CONTINUATION_CHUNK,
            &[("index", index.as_str()), ("total", total.as_str()), ("content", chunk.text.as_str())],
        )
    }

    /// Picks the translation template for a chunk's position.
    pub fn translation_chunk(&self, title: &str, chunk: &Chunk) -> String {
        if chunk.total == 1 {
            self.single_chunk(title, &chunk.text)
        } else if chunk.is_first() {
            self.first_chunk(title, chunk)
        } else {
            self.continuation_chunk(chunk)
        }
    }

    /// Formatting pass over already translated text.
    pub fn format_chunk(&self, chunk: &Chunk) -> String {
        let mut prompt = self.render(FORMAT_INSTRUCTIONS, &[]);
        if chunk.total > 1 {
            let (index, total) = (chunk.index.to_string(), chunk.total.to_string());
            prompt.push_str(&self.render(FORMAT_PART_MARKER, &[("index", index.as_str()), ("total", total.as_str())]));
        }
        prompt.push_str(&chunk.text);
        prompt
    }
}
