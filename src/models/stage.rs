use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Pipeline stage
///
/// Variants are declared in pipeline order. The order is what makes a move
/// "backward", so never reorder them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    New,
    Contacted,
    Qualified,
    Proposal,
    Negotiation,
    Won,
    Lost,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::New,
        Stage::Contacted,
        Stage::Qualified,
        Stage::Proposal,
        Stage::Negotiation,
        Stage::Won,
        Stage::Lost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::New => "new",
            Stage::Contacted => "contacted",
            Stage::Qualified => "qualified",
            Stage::Proposal => "proposal",
            Stage::Negotiation => "negotiation",
            Stage::Won => "won",
            Stage::Lost => "lost",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Stage::New => "New",
            Stage::Contacted => "Contacted",
            Stage::Qualified => "Qualified",
            Stage::Proposal => "Proposal",
            Stage::Negotiation => "Negotiation",
            Stage::Won => "Won",
            Stage::Lost => "Lost",
        }
    }

    /// Case-insensitive lookup by key or label
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.trim().to_lowercase();
        Self::ALL.iter().copied().find(|stage| stage.as_str() == lower)
    }

    /// Position in the fixed pipeline order
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Won | Stage::Lost)
    }

    pub fn default_wip_limit(&self) -> Option<usize> {
        match self {
            Stage::New => Some(10),
            Stage::Contacted => Some(10),
            Stage::Qualified => Some(8),
            Stage::Proposal => Some(6),
            Stage::Negotiation => Some(5),
            Stage::Won | Stage::Lost => None,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Advisory work-in-progress limits per stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WipLimits {
    limits: HashMap<Stage, usize>,
}

impl Default for WipLimits {
    fn default() -> Self {
        let limits = Stage::ALL
            .iter()
            .filter_map(|stage| stage.default_wip_limit().map(|limit| (*stage, limit)))
            .collect();
        Self { limits }
    }
}

impl WipLimits {
    pub fn get(&self, stage: Stage) -> Option<usize> {
        self.limits.get(&stage).copied()
    }

    /// Set or clear a stage limit. Terminal stages never carry one; returns
    /// false when the request was ignored for that reason.
    pub fn set(&mut self, stage: Stage, limit: Option<usize>) -> bool {
        if stage.is_terminal() {
            return false;
        }
        match limit {
            Some(limit) => {
                self.limits.insert(stage, limit);
            }
            None => {
                self.limits.remove(&stage);
            }
        }
        true
    }

    /// True when `load` leads would exceed the stage's limit
    pub fn is_over(&self, stage: Stage, load: usize) -> bool {
        matches!(self.get(stage), Some(limit) if load > limit)
    }
}
