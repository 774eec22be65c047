//! Description enrichment from README prose.
//!
//! The pipeline picks the most description-like block of the README,
//! cleans it down to plain sentences, and asks a [`Summarizer`] for a
//! one-sentence summary. Generated text must pass [`is_valid_summary`];
//! after two rejected attempts the first two cleaned sentences are used
//! instead, so enrichment always yields something when the README has
//! prose.
//!
//! # Example
//!
//! ```
//! use aibom_extract::{NoSummarizer, summarize_description};
//!
//! let readme = "---\nlicense: mit\n---\n# Model Description\n\n\
//!     Widget-7B is a decoder-only model designed for code completion. \
//!     It was trained on permissively licensed repositories. Weights are in bf16.\n";
//! let summary = summarize_description(readme, "acme/widget-7b", &NoSummarizer).unwrap();
//! assert_eq!(
//!     summary,
//!     "Widget-7B is a decoder-only model designed for code completion. \
//!      It was trained on permissively licensed repositories."
//! );
//! ```

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::context::split_front_matter;

/// Maximum length of a generated or fallback description.
pub const MAX_SUMMARY_CHARS: usize = 332;

const FALLBACK_CANDIDATE_CHARS: usize = 1000;

/// Text generator used to condense a description candidate.
///
/// Implementations may be slow; the engine calls this only when the caller
/// enabled enrichment for the run.
pub trait Summarizer: Send + Sync {
    /// Generates a completion for `prompt`, or `None` when generation is
    /// unavailable or failed.
    fn summarize(&self, prompt: &str) -> Option<String>;
}

/// Summarizer that never generates, leaving the cleaned-sentence fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSummarizer;

impl Summarizer for NoSummarizer {
    fn summarize(&self, _prompt: &str) -> Option<String> {
        None
    }
}

static PATTERNS: LazyLock<EnrichPatterns> = LazyLock::new(EnrichPatterns::new);

struct EnrichPatterns {
    description_heading: Regex,
    any_heading: Regex,
    inline_label: Regex,
    fine_tune_sentence: Regex,
    paragraph_break: Regex,
    script_or_style: Regex,
    html_tag: Regex,
    markdown_image: Regex,
    markdown_link: Regex,
    code_block: Regex,
    inline_code: Regex,
    table_rows: Regex,
    pipe_fragment: Regex,
    table_separator: Regex,
    output_prefix: Regex,
}

impl EnrichPatterns {
    fn new() -> Self {
        let compile = |pattern: &str| Regex::new(pattern).expect("static regex must compile");
        Self {
            description_heading: compile(
                r"(?i)^#+\s*(?:\d+[.)]?\s*)?(?:description|model description|model overview|overview|introduction|summary|モデル概要|model details)",
            ),
            any_heading: compile(r"^#+\s"),
            inline_label: compile(r"(?i)(?:### description:|description:|overview:)"),
            fine_tune_sentence: compile(
                r"(?im)^(?:the .*model is a .*|this model is a fine-tuned version of.*|this is a fine-tuned.*)",
            ),
            paragraph_break: compile(r"\n\s*\n"),
            script_or_style: compile(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>"),
            html_tag: compile(r"<[^>]+>"),
            markdown_image: compile(r"!\[.*?\]\([^)]+\)"),
            markdown_link: compile(r"\[([^\]]+)\]\([^)]+\)"),
            code_block: compile(r"(?s)```.*?```"),
            inline_code: compile(r"`[^`]*`"),
            table_rows: compile(r"(?m)^\s*\|.*\|\s*$"),
            pipe_fragment: compile(r"\|.*?\|"),
            table_separator: compile(r"(?m)^[-:| ]+$"),
            output_prefix: compile(r"(?i)^output:\s*"),
        }
    }
}

/// Lines dropped from cleaned text, as lowercase phrase sets that must all
/// appear.
const BOILERPLATE: &[&[&str]] = &[
    &["generated automatically", "model card"],
    &["completed by the model author"],
    &["model cards for model reporting"],
];

/// Runs the full enrichment pipeline over a README.
///
/// Returns `None` only when the README has no usable prose.
pub fn summarize_description(
    readme: &str,
    model_id: &str,
    summarizer: &dyn Summarizer,
) -> Option<String> {
    if readme.trim().is_empty() {
        return None;
    }
    let body = strip_front_matter(readme);

    let mut candidates = extract_candidates(body);
    if candidates.is_empty() {
        candidates.push(truncate_chars(body, FALLBACK_CANDIDATE_CHARS).to_string());
    }

    let best = best_candidate(&candidates)?;
    let cleaned = clean_text(best);
    if cleaned.is_empty() {
        return None;
    }

    let sentences = split_sentences(&cleaned);
    let short_text = sentences.iter().take(3).copied().collect::<Vec<_>>().join(" ");

    let prompts = [
        format!(
            "In one sentence, explain what this AI model is designed to do based on this description:\n\n{short_text}"
        ),
        format!("Summarize the main purpose of this AI model in one complete sentence:\n\n{cleaned}"),
    ];
    for (attempt, prompt) in prompts.iter().enumerate() {
        if let Some(summary) = summarizer.summarize(prompt).map(|raw| tidy_generated(&raw))
            && is_valid_summary(&summary, model_id)
        {
            debug!(attempt, "generated description accepted");
            return Some(summary);
        }
        debug!(attempt, "generated description rejected");
    }

    info!(model = model_id, "summaries rejected, using cleaned source sentences");
    let fallback = sentences.iter().take(2).copied().collect::<Vec<_>>().join(" ");
    Some(ellipsize(&fallback, MAX_SUMMARY_CHARS))
}

/// Removes a leading YAML front-matter block.
pub fn strip_front_matter(text: &str) -> &str {
    split_front_matter(text).map_or(text, |(_, body)| body)
}

/// Collects description candidates in discovery order.
///
/// Sources, in order: bodies under description-like headings, inline
/// `Description:` labels, fine-tune boilerplate sentences. When none of
/// those match, the first long paragraph that is not a heading, badge or
/// link list is used.
pub fn extract_candidates(text: &str) -> Vec<String> {
    let mut candidates = heading_sections(text);
    candidates.extend(inline_labels(text));
    candidates.extend(
        PATTERNS
            .fine_tune_sentence
            .find_iter(text)
            .map(|m| m.as_str().trim().to_string()),
    );
    if candidates.is_empty()
        && let Some(paragraph) = first_long_paragraph(text)
    {
        candidates.push(paragraph);
    }
    candidates
}

fn heading_sections(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    let mut sections = Vec::new();
    let mut index = 0;
    while index < lines.len() {
        if !PATTERNS.description_heading.is_match(lines[index]) {
            index += 1;
            continue;
        }
        let start = index + 1;
        let mut end = start;
        while end < lines.len() && !PATTERNS.any_heading.is_match(lines[end]) {
            end += 1;
        }
        let body = lines[start..end].join("\n");
        if !body.trim().is_empty() {
            sections.push(body.trim().to_string());
        }
        index = end.max(start);
    }
    sections
}

fn inline_labels(text: &str) -> Vec<String> {
    let mut labels = Vec::new();
    let mut cursor = 0;
    while let Some(found) = PATTERNS.inline_label.find_at(text, cursor) {
        let rest = &text[found.end()..];
        let start = found.end() + (rest.len() - rest.trim_start().len());
        let end = text[start..]
            .find("\n\n")
            .map_or(text.len(), |offset| start + offset);
        let value = text[start..end].trim();
        if !value.is_empty() {
            labels.push(value.to_string());
        }
        cursor = end.max(found.end());
    }
    labels
}

fn first_long_paragraph(text: &str) -> Option<String> {
    let stripped = PATTERNS.html_tag.replace_all(text, "");
    PATTERNS
        .paragraph_break
        .split(&stripped)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .filter(|p| !p.starts_with('#'))
        .filter(|p| !p.starts_with("[!") && !p.starts_with("<a href") && !p.starts_with("> [!"))
        .filter(|p| p.matches("](").count() <= 3 && p.matches("http").count() <= 3)
        .find(|p| p.chars().count() > 50)
        .map(str::to_string)
}

/// Heuristic description-likeness of a candidate block.
///
/// # Examples
///
/// ```
/// use aibom_extract::enrich::score_candidate;
///
/// let good = "Widget is a small language model designed for code completion on laptops.";
/// assert_eq!(score_candidate(good), 30.0);
/// assert_eq!(score_candidate("Run `pip install widget` to install."), -30.0);
/// ```
pub fn score_candidate(text: &str) -> f64 {
    let mut score = 0.0;
    let lowered = text.to_lowercase();
    let length = text.chars().count();

    if 50 < length && length < 1000 {
        score += 10.0;
    }
    if ["is a", "fine-tuned version of", "trained on", "designed for"]
        .iter()
        .any(|phrase| lowered.contains(phrase))
    {
        score += 20.0;
    }
    if ["leaderboard", "benchmark", "results"]
        .iter()
        .any(|phrase| lowered.contains(phrase))
    {
        score -= 50.0;
    }
    if ["install", "how to run", "pip install", "read our guide"]
        .iter()
        .any(|phrase| lowered.contains(phrase))
    {
        score -= 30.0;
    }
    let heavy = text.matches('|').count() > 5
        || text.contains("```")
        || text.matches("\n- ").count() > 2
        || text.matches("\n* ").count() > 2;
    if heavy {
        score -= 50.0;
    }
    score
}

/// Highest-scoring candidate; ties keep the earliest.
fn best_candidate(candidates: &[String]) -> Option<&str> {
    let mut best: Option<(&str, f64)> = None;
    for candidate in candidates {
        let score = score_candidate(candidate);
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((candidate, score));
        }
    }
    best.map(|(candidate, _)| candidate)
}

/// Reduces markdown/HTML prose to plain whitespace-collapsed text.
///
/// # Examples
///
/// ```
/// use aibom_extract::enrich::clean_text;
///
/// let raw = "<p>See the [docs](https://x) and ![badge](b.svg)</p>\n`code` here";
/// assert_eq!(clean_text(raw), "See the docs and here");
/// ```
pub fn clean_text(text: &str) -> String {
    let p = &*PATTERNS;
    let text = p.script_or_style.replace_all(text, " ");
    let text = p.html_tag.replace_all(&text, " ");
    let text = decode_entities(&text);
    let text = p.markdown_image.replace_all(&text, "");
    let text = p.markdown_link.replace_all(&text, "$1");
    let text = p.code_block.replace_all(&text, "");
    let text = p.inline_code.replace_all(&text, "");
    // Whole rows first, so a row never leaves its trailing cell behind.
    let text = p.table_rows.replace_all(&text, "");
    let text = p.pipe_fragment.replace_all(&text, "");
    let text = p.table_separator.replace_all(&text, "");

    let kept: Vec<&str> = text
        .lines()
        .filter(|line| {
            let lowered = line.to_lowercase();
            !BOILERPLATE
                .iter()
                .any(|phrases| phrases.iter().all(|phrase| lowered.contains(phrase)))
        })
        .collect();
    kept.join("\n").split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Splits after `.`, `!` or `?` followed by whitespace.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((_, ch)) = chars.next() {
        if !matches!(ch, '.' | '!' | '?') {
            continue;
        }
        let Some(&(next_offset, next)) = chars.peek() else {
            continue;
        };
        if next.is_whitespace() {
            sentences.push(&text[start..next_offset]);
            while chars.peek().is_some_and(|(_, c)| c.is_whitespace()) {
                chars.next();
            }
            start = chars.peek().map_or(text.len(), |(o, _)| *o);
        }
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

/// Acceptance check for generated summaries.
///
/// # Examples
///
/// ```
/// use aibom_extract::enrich::is_valid_summary;
///
/// assert!(is_valid_summary("A compact model for code completion.", "acme/widget"));
/// assert!(!is_valid_summary("widget model", "acme/widget"));
/// assert!(!is_valid_summary("## Widget is a model for code", "acme/widget"));
/// assert!(!is_valid_summary("To install, run the setup script first.", "acme/widget"));
/// ```
pub fn is_valid_summary(summary: &str, model_id: &str) -> bool {
    if summary.chars().count() < 15 {
        return false;
    }
    let lowered = summary.to_lowercase();
    let name = model_id.rsplit('/').next().unwrap_or(model_id).to_lowercase();
    if lowered == name || lowered == format!("{name} model") {
        return false;
    }
    if summary.contains(['#', '<', '>', '*']) {
        return false;
    }
    if lowered.starts_with("to install") || lowered.starts_with("how to") || lowered.contains("pip install") {
        return false;
    }
    if lowered.contains("- type:") || lowered.contains("number of parameters:") {
        return false;
    }
    true
}

fn tidy_generated(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_prefix = PATTERNS.output_prefix.replace(trimmed, "");
    ellipsize(without_prefix.trim(), MAX_SUMMARY_CHARS)
}

/// Truncates to `max_chars`, marking the cut with `...`.
pub fn ellipsize(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept = truncate_chars(text, max_chars.saturating_sub(3));
    format!("{kept}...")
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((offset, _)) => &text[..offset],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Replays canned generations and records prompts.
    struct ScriptedSummarizer {
        replies: Mutex<Vec<Option<String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedSummarizer {
        fn new(replies: &[Option<&str>]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().rev().map(|r| r.map(str::to_string)).collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    impl Summarizer for ScriptedSummarizer {
        fn summarize(&self, prompt: &str) -> Option<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies.lock().unwrap().pop().flatten()
        }
    }

    const README: &str = "---\nlicense: mit\n---\n\
        [![badge](https://img.shields.io/x.svg)](https://x)\n\n\
        ## 1. Introduction\n\n\
        Widget-7B is a decoder-only model designed for code completion. \
        It was trained on permissively licensed repositories. \
        It supports 80 languages. Weights ship in bf16.\n\n\
        ## Benchmark results\n\n\
        | task | score |\n|---|---|\n| humaneval | 41.2 |\n";

    #[test]
    fn test_heading_candidate_wins() {
        let body = strip_front_matter(README);
        let candidates = extract_candidates(body);
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].starts_with("Widget-7B is a decoder-only model"));
    }

    #[test]
    fn test_first_generation_accepted() {
        let summarizer = ScriptedSummarizer::new(&[Some("Output: Widget-7B completes source code.")]);
        let summary = summarize_description(README, "acme/widget-7b", &summarizer).unwrap();
        assert_eq!(summary, "Widget-7B completes source code.");

        let prompts = summarizer.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].ends_with(
            "Widget-7B is a decoder-only model designed for code completion. \
             It was trained on permissively licensed repositories. It supports 80 languages."
        ));
    }

    #[test]
    fn test_retry_then_fallback() {
        let summarizer = ScriptedSummarizer::new(&[Some("widget-7b"), Some("## heading")]);
        let summary = summarize_description(README, "acme/widget-7b", &summarizer).unwrap();
        assert_eq!(
            summary,
            "Widget-7B is a decoder-only model designed for code completion. \
             It was trained on permissively licensed repositories."
        );
        assert_eq!(summarizer.prompts.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_second_generation_accepted() {
        let summarizer =
            ScriptedSummarizer::new(&[None, Some("A code completion model for many languages.")]);
        let summary = summarize_description(README, "acme/widget-7b", &summarizer).unwrap();
        assert_eq!(summary, "A code completion model for many languages.");
        assert!(summarizer.prompts.lock().unwrap()[1].starts_with("Summarize the main purpose"));
    }

    #[test]
    fn test_inline_label_and_fine_tune_candidates() {
        let text = "Overview: compact encoder.\n\nThis model is a fine-tuned version of bert-base on squad.\n";
        let candidates = extract_candidates(text);
        assert_eq!(
            candidates,
            vec![
                "compact encoder.".to_string(),
                "This model is a fine-tuned version of bert-base on squad.".to_string(),
            ]
        );
    }

    #[test]
    fn test_paragraph_fallback_skips_badges_and_headings() {
        let text = "# Title\n\n[![a](b)](c)\n\nShort.\n\n\
            Widget is a compact model for running code completion on laptops and phones.\n";
        assert_eq!(
            extract_candidates(text),
            vec!["Widget is a compact model for running code completion on laptops and phones.".to_string()]
        );
    }

    #[test]
    fn test_scoring_penalties() {
        let table = "a | b | c | d | e | f | g";
        assert_eq!(score_candidate(table), -50.0);
        let leaderboard = "Our leaderboard entry is a strong result for everyone who tried it out.";
        assert_eq!(score_candidate(leaderboard), -20.0);
    }

    #[test]
    fn test_clean_text_drops_boilerplate_and_tables() {
        let raw = "This model card has been generated automatically.\n\
            <script>alert(1)</script>Real text &amp; more.\n\
            ```\ncode\n```\n| a | b |\n|---|---|\n";
        assert_eq!(clean_text(raw), "Real text & more.");
    }

    #[test]
    fn test_clean_text_drops_inline_pipe_fragments() {
        let raw = "Widget-7B scores 71.2 on MMLU | 5-shot | and beats the baseline.\n\
            | model | score |\n|---|---|\n| widget | 71.2 |\nThe end.";
        assert_eq!(
            clean_text(raw),
            "Widget-7B scores 71.2 on MMLU and beats the baseline. The end."
        );
    }

    #[test]
    fn test_split_sentences() {
        assert_eq!(
            split_sentences("One. Two!  Three? Four"),
            vec!["One.", "Two!", "Three?", "Four"]
        );
        assert_eq!(split_sentences("v1.5 is out."), vec!["v1.5 is out."]);
    }

    #[test]
    fn test_ellipsize() {
        let long = "a".repeat(400);
        let cut = ellipsize(&long, MAX_SUMMARY_CHARS);
        assert_eq!(cut.chars().count(), MAX_SUMMARY_CHARS);
        assert!(cut.ends_with("..."));
        assert_eq!(ellipsize("short", MAX_SUMMARY_CHARS), "short");
    }

    #[test]
    fn test_empty_readme_yields_nothing() {
        assert_eq!(summarize_description("  \n", "x/y", &NoSummarizer), None);
        assert_eq!(summarize_description("---\na: 1\n---\n", "x/y", &NoSummarizer), None);
    }
}
