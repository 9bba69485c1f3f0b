//! Per-category policy chains
//!
//! Each sub-policy returns an ordered chain of candidates. The engine picks
//! the first one the tier permits, so later entries are degradations. Every
//! chain ends in a backend that all tiers may use.

use crate::{Backend, Priority, Region, TaskCategory, Tier};

/// Reasoning requests below this size stay on the local 70B model
const REASONING_LOCAL_BELOW_TOKENS: usize = 2000;

/// Code requests above this size go to the frontier model
const CODE_FRONTIER_ABOVE_TOKENS: usize = 4000;

/// Summaries above this size go to a cloud model
const SUMMARY_CLOUD_ABOVE_TOKENS: usize = 8000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Candidate {
    pub backend: Backend,
    pub confidence: f64,
    pub region: Region,
    pub reasoning: &'static str,
}

const fn global(backend: Backend, confidence: f64, reasoning: &'static str) -> Candidate {
    Candidate {
        backend,
        confidence,
        region: Region::Global,
        reasoning,
    }
}

const fn china(backend: Backend, confidence: f64, reasoning: &'static str) -> Candidate {
    Candidate {
        backend,
        confidence,
        region: Region::China,
        reasoning,
    }
}

/// Compliance-first chain used when the request is region flagged
pub(crate) fn region_compliance(tier: Tier) -> Vec<Candidate> {
    if tier.is_premium() {
        vec![
            china(Backend::ZhipuGlm4, 0.95, "Region compliance: GLM-4 is hosted in China"),
            china(Backend::OllamaQwen, 0.85, "Region compliance: local Qwen keeps data on premises"),
        ]
    } else {
        vec![china(Backend::OllamaQwen, 0.90, "Region compliance: local Qwen is optimized for Chinese at zero cost")]
    }
}

/// Chain for a task category
pub(crate) fn for_task(task: TaskCategory, tier: Tier, priority: Priority, tokens: usize) -> Vec<Candidate> {
    match task {
        TaskCategory::WebSearch => web_search(),
        TaskCategory::ComplexReasoning => complex_reasoning(tier, priority, tokens),
        TaskCategory::CodeGeneration => code_generation(tier, tokens),
        TaskCategory::RegionSpecificNlp => region_nlp(),
        TaskCategory::Faq | TaskCategory::SimpleChat | TaskCategory::Sentiment => vec![global(
            Backend::OllamaLlama,
            0.88,
            "Simple request handled by the free local generalist",
        )],
        TaskCategory::CostSensitive => vec![global(
            Backend::OllamaLlama,
            0.90,
            "Cost-sensitive request kept on the zero-cost local model",
        )],
        TaskCategory::EmailDraft => email_draft(tier),
        TaskCategory::Translation => vec![global(
            Backend::OllamaLlama,
            0.85,
            "Translation handled by the local multilingual model",
        )],
        TaskCategory::Summarization => summarization(tier, tokens),
        TaskCategory::Creative | TaskCategory::Unclassified => general(tier, priority),
    }
}

fn web_search() -> Vec<Candidate> {
    vec![
        global(Backend::Perplexity, 0.95, "Web search requires real-time data access"),
        global(Backend::OllamaLlama, 0.60, "Web search unavailable, answering from the local model's knowledge cutoff"),
    ]
}

fn complex_reasoning(tier: Tier, priority: Priority, tokens: usize) -> Vec<Candidate> {
    match priority {
        Priority::Quality => {
            let mut chain = Vec::with_capacity(6);
            if tier.is_premium() {
                chain.push(global(
                    Backend::ClaudeReasoning,
                    0.92,
                    "Complex reasoning with quality priority uses the dedicated reasoning model",
                ));
                chain.push(global(
                    Backend::Gpt5,
                    0.90,
                    "Complex reasoning with quality priority uses the frontier model",
                ));
            }
            chain.extend([
                global(Backend::ClaudeSonnet, 0.85, "Complex reasoning on the strongest permitted cloud model"),
                global(Backend::Gpt4oMini, 0.75, "Complex reasoning on the permitted budget cloud model"),
                global(Backend::OllamaLlama70b, 0.70, "Complex reasoning on the local 70B model"),
                global(Backend::OllamaLlama, 0.65, "Complex reasoning on the local generalist"),
            ]);
            chain
        }
        Priority::Cost => vec![
            global(Backend::DeepSeekR1, 0.85, "Cost-optimized reasoning with DeepSeek R1"),
            global(Backend::OllamaLlama70b, 0.70, "Zero-cost reasoning on the local 70B model"),
            global(Backend::OllamaLlama, 0.65, "Zero-cost reasoning on the local generalist"),
        ],
        Priority::Speed => vec![
            global(Backend::Gpt4oMini, 0.80, "Fast reasoning with GPT-4o mini"),
            global(Backend::OllamaLlama, 0.65, "Fast reasoning on the local generalist"),
        ],
        Priority::Balanced if tokens < REASONING_LOCAL_BELOW_TOKENS => vec![
            global(Backend::OllamaLlama70b, 0.75, "Short reasoning request handled by the local 70B model"),
            global(Backend::OllamaLlama, 0.70, "Short reasoning request handled by the local generalist"),
        ],
        Priority::Balanced => vec![
            global(Backend::ClaudeSonnet, 0.85, "Long reasoning request sent to the balanced cloud model"),
            global(Backend::OllamaLlama70b, 0.70, "Long reasoning request handled by the local 70B model"),
            global(Backend::OllamaLlama, 0.65, "Long reasoning request handled by the local generalist"),
        ],
    }
}

fn code_generation(tier: Tier, tokens: usize) -> Vec<Candidate> {
    if tokens > CODE_FRONTIER_ABOVE_TOKENS || tier == Tier::Enterprise {
        vec![
            global(Backend::Gpt5, 0.92, "Large or enterprise code request sent to the frontier model"),
            global(Backend::OllamaQwen, 0.80, "Large code request handled by the local code model"),
        ]
    } else {
        vec![global(Backend::OllamaQwen, 0.85, "Code request handled by the local code-specialized model")]
    }
}

fn region_nlp() -> Vec<Candidate> {
    vec![
        china(Backend::ZhipuGlm4, 0.95, "Chinese-language request served by GLM-4"),
        global(Backend::OllamaQwen, 0.85, "Chinese-language request served by local Qwen"),
    ]
}

fn email_draft(tier: Tier) -> Vec<Candidate> {
    let local = global(Backend::OllamaLlama, 0.75, "Email drafted by the local generalist");

    if tier.is_premium() {
        vec![
            global(Backend::ClaudeSonnet, 0.90, "Email drafting benefits from Claude's writing quality"),
            local,
        ]
    } else {
        vec![local]
    }
}

fn summarization(tier: Tier, tokens: usize) -> Vec<Candidate> {
    if tokens <= SUMMARY_CLOUD_ABOVE_TOKENS {
        return vec![global(
            Backend::OllamaLlama,
            0.85,
            "Summary fits comfortably in the local model's context",
        )];
    }

    let local = global(Backend::OllamaLlama, 0.70, "Long document summarized locally");

    if tier.is_premium() {
        vec![
            global(Backend::ClaudeSonnet, 0.90, "Long document summarized by Claude's large context window"),
            local,
        ]
    } else {
        vec![
            global(Backend::Gpt4oMini, 0.80, "Long document summarized by the budget cloud model"),
            local,
        ]
    }
}

fn general(tier: Tier, priority: Priority) -> Vec<Candidate> {
    match priority {
        Priority::Quality => {
            let cloud = if tier.is_premium() {
                global(Backend::Gpt4o, 0.80, "Quality-first general request on GPT-4o")
            } else {
                global(Backend::Gpt4oMini, 0.75, "Quality-first general request on GPT-4o mini")
            };
            vec![
                cloud,
                global(Backend::OllamaLlama, 0.65, "General request handled by the local generalist"),
            ]
        }
        Priority::Cost => vec![global(
            Backend::OllamaLlama,
            0.75,
            "Cost-first general request on the zero-cost local model",
        )],
        Priority::Speed | Priority::Balanced => vec![global(
            Backend::ZhipuGlm4Flash,
            0.80,
            "General request on the fast low-cost GLM-4 Flash",
        )],
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    fn token_samples() -> [usize; 8] {
        [0, 1999, 2000, 4000, 4001, 8000, 8001, 50_000]
    }

    #[test]
    fn every_chain_ends_in_a_universally_permitted_backend() {
        let mut chains = Vec::new();
        for tier in Tier::iter() {
            chains.push(region_compliance(tier));
            for task in TaskCategory::iter() {
                for priority in Priority::iter() {
                    for tokens in token_samples() {
                        chains.push(for_task(task, tier, priority, tokens));
                    }
                }
            }
        }

        for chain in chains {
            let last = chain.last().expect("chain is never empty");
            assert!(Tier::iter().all(|t| t.permits(last.backend)), "{:?}", last.backend);
        }
    }

    #[test]
    fn confidence_strictly_decreases_along_chains() {
        for tier in Tier::iter() {
            for task in TaskCategory::iter() {
                for priority in Priority::iter() {
                    for tokens in token_samples() {
                        let chain = for_task(task, tier, priority, tokens);
                        for pair in chain.windows(2) {
                            assert!(
                                pair[1].confidence < pair[0].confidence,
                                "{task} {tier} {priority} {tokens}"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn reasoning_texts_are_non_empty() {
        for tier in Tier::iter() {
            for task in TaskCategory::iter() {
                for candidate in for_task(task, tier, Priority::Quality, 10_000) {
                    assert!(!candidate.reasoning.is_empty());
                }
            }
        }
    }

    #[test]
    fn premium_quality_reasoning_starts_with_reasoning_model() {
        let chain = complex_reasoning(Tier::Pro, Priority::Quality, 100);
        assert_eq!(chain[0].backend, Backend::ClaudeReasoning);
        assert_eq!(chain[1].backend, Backend::Gpt5);

        let chain = complex_reasoning(Tier::Starter, Priority::Quality, 100);
        assert_eq!(chain[0].backend, Backend::ClaudeSonnet);
    }
}
