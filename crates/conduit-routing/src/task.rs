//! Task categories a request can be classified into

use serde::Serialize;
use strum::{Display, EnumIter, EnumString};

/// Kind of work a request represents
///
/// Exactly one category applies per request, either declared by the caller
/// or inferred by [`crate::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum TaskCategory {
    WebSearch,
    ComplexReasoning,
    CodeGeneration,
    Faq,
    SimpleChat,
    Sentiment,
    EmailDraft,
    Translation,
    Summarization,
    RegionSpecificNlp,
    CostSensitive,
    Creative,
    Unclassified,
}
