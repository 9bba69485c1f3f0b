//! Ordered keyword classifier
//!
//! Deterministic heuristics only: region script first, then keyword lists in
//! a fixed order, then the short-question fallback. First match wins.

use std::sync::LazyLock;

use regex::Regex;

use crate::TaskCategory;

/// Keyword lists in the order they are tested
const KEYWORDS: &[(TaskCategory, &[&str])] = &[
    (
        TaskCategory::WebSearch,
        &["latest", "current", "today", "news", "search", "find", "what is happening", "recent"],
    ),
    (
        TaskCategory::CodeGeneration,
        &["code", "function", "script", "program", "implement", "algorithm", "debug"],
    ),
    (
        TaskCategory::ComplexReasoning,
        &["analyze", "explain why", "compare", "evaluate", "strategy", "plan", "reasoning"],
    ),
    (
        TaskCategory::EmailDraft,
        &["email", "draft", "write to", "reply to", "compose"],
    ),
    (TaskCategory::Translation, &["translate", "translation"]),
    (TaskCategory::Summarization, &["summarize", "summary", "tldr"]),
    (
        TaskCategory::CostSensitive,
        &["free", "cheap", "budget", "low cost", "cost effective"],
    ),
];

/// Questions shorter than this many words count as FAQ
const FAQ_MAX_WORDS: usize = 10;

static RULES: LazyLock<Vec<(TaskCategory, Regex)>> = LazyLock::new(|| {
    KEYWORDS
        .iter()
        .map(|(category, words)| (*category, keyword_pattern(words)))
        .collect()
});

fn keyword_pattern(words: &[&str]) -> Regex {
    let alternation = words.iter().map(|w| regex::escape(w)).collect::<Vec<_>>().join("|");
    Regex::new(&format!("(?i)(?:{alternation})")).expect("escaped keyword alternation must be valid regex")
}

/// Map free text to a task category
pub fn classify(text: &str) -> TaskCategory {
    let category = classify_inner(text);
    tracing::debug!(category = %category, chars = text.chars().count(), "request classified");
    category
}

fn classify_inner(text: &str) -> TaskCategory {
    if is_region_script(text) {
        return TaskCategory::RegionSpecificNlp;
    }

    if let Some((category, _)) = RULES.iter().find(|(_, pattern)| pattern.is_match(text)) {
        return *category;
    }

    if text.split_whitespace().count() < FAQ_MAX_WORDS && text.contains('?') {
        return TaskCategory::Faq;
    }

    TaskCategory::SimpleChat
}

/// Whether more than 10% of the characters are CJK unified ideographs
pub fn is_region_script(text: &str) -> bool {
    let (total, cjk) = text.chars().fold((0usize, 0usize), |(total, cjk), c| {
        (total + 1, cjk + usize::from(is_cjk_ideograph(c)))
    });

    // cjk / total > 1/10 without floating point
    total > 0 && cjk * 10 > total
}

const fn is_cjk_ideograph(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}')
}
