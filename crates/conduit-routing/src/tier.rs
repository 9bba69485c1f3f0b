//! Entitlement tiers and the backends each one may reach

use serde::Serialize;
use strum::{Display, EnumIter, EnumString};

use crate::Backend;

/// User entitlement level, ordered by increasing privilege
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter, Serialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Tier {
    #[default]
    Free,
    Starter,
    Pro,
    Enterprise,
}

const FREE: &[Backend] = &[
    Backend::OllamaLlama,
    Backend::OllamaQwen,
    Backend::OllamaLlama70b,
    Backend::ZhipuGlm4Flash,
];

const STARTER: &[Backend] = &[
    Backend::OllamaLlama,
    Backend::OllamaQwen,
    Backend::Gpt4oMini,
    Backend::ZhipuGlm4Flash,
];

const PRO: &[Backend] = &[
    Backend::OllamaLlama,
    Backend::OllamaQwen,
    Backend::Gpt4oMini,
    Backend::Gpt4o,
    Backend::ClaudeSonnet,
    Backend::Perplexity,
    Backend::ZhipuGlm4,
    Backend::ZhipuGlm4Flash,
];

impl Tier {
    /// Backends this tier may be routed to
    pub const fn permitted(self) -> &'static [Backend] {
        match self {
            Self::Free => FREE,
            Self::Starter => STARTER,
            Self::Pro => PRO,
            Self::Enterprise => &Backend::ALL,
        }
    }

    pub fn permits(self, backend: Backend) -> bool {
        self.permitted().contains(&backend)
    }

    /// Pro and enterprise unlock the quality cloud paths
    pub const fn is_premium(self) -> bool {
        matches!(self, Self::Pro | Self::Enterprise)
    }
}
