//! Stage transition classification
//!
//! Every stage change is classified before it is applied. Rules are checked in
//! order and the first match wins:
//!
//! 1. target is `Lost` -> [`TransitionKind::Lost`] (confirm, optional reason)
//! 2. target is earlier in the pipeline -> [`TransitionKind::Backward`] (confirm)
//! 3. anything else -> [`TransitionKind::Forward`] (applied immediately)
//!
//! A drop on the lead's current stage falls into rule 3.

use serde::Serialize;
use crate::models::Stage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    Lost,
    Backward,
    Forward,
}

impl TransitionKind {
    pub fn requires_confirmation(&self) -> bool {
        !matches!(self, TransitionKind::Forward)
    }
}

/// True when `to` sits earlier than `from` in the fixed stage order
pub fn is_backward(from: Stage, to: Stage) -> bool {
    to.index() < from.index()
}

pub fn classify(from: Stage, to: Stage) -> TransitionKind {
    if to == Stage::Lost {
        TransitionKind::Lost
    } else if is_backward(from, to) {
        TransitionKind::Backward
    } else {
        TransitionKind::Forward
    }
}

/// A move held back until the user confirms it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PendingTransition {
    Backward {
        lead_id: i64,
        from: Stage,
        to: Stage,
    },
    Lost {
        lead_id: i64,
        from: Stage,
        reason: Option<String>,
    },
}

impl PendingTransition {
    /// Build the pending record for a gated move, or None if the move is not gated
    pub fn for_move(lead_id: i64, from: Stage, to: Stage, reason: Option<String>) -> Option<Self> {
        match classify(from, to) {
            TransitionKind::Lost => Some(PendingTransition::Lost {
                lead_id,
                from,
                reason: reason.filter(|r| !r.trim().is_empty()),
            }),
            TransitionKind::Backward => Some(PendingTransition::Backward { lead_id, from, to }),
            TransitionKind::Forward => None,
        }
    }

    pub fn lead_id(&self) -> i64 {
        match self {
            PendingTransition::Backward { lead_id, .. } | PendingTransition::Lost { lead_id, .. } => *lead_id,
        }
    }

    pub fn from(&self) -> Stage {
        match self {
            PendingTransition::Backward { from, .. } | PendingTransition::Lost { from, .. } => *from,
        }
    }

    pub fn to(&self) -> Stage {
        match self {
            PendingTransition::Backward { to, .. } => *to,
            PendingTransition::Lost { .. } => Stage::Lost,
        }
    }

    pub fn kind(&self) -> TransitionKind {
        match self {
            PendingTransition::Backward { .. } => TransitionKind::Backward,
            PendingTransition::Lost { .. } => TransitionKind::Lost,
        }
    }

    /// Reason attached to the move; backward moves never carry one
    pub fn reason(&self) -> Option<&str> {
        match self {
            PendingTransition::Backward { .. } => None,
            PendingTransition::Lost { reason, .. } => reason.as_deref(),
        }
    }

    /// Question to put to the user before applying
    pub fn prompt(&self) -> String {
        match self {
            PendingTransition::Backward { from, to, .. } => {
                format!("Move lead back from {} to {}?", from, to)
            }
            PendingTransition::Lost { from, .. } => {
                format!("Mark lead as Lost (currently {})?", from)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lost_wins_over_ordering() {
        // Lost is the last stage, so it is never "backward", but it is always gated
        for from in Stage::ALL {
            assert_eq!(classify(from, Stage::Lost), TransitionKind::Lost);
        }
    }

    #[test]
    fn test_backward_classification() {
        assert_eq!(classify(Stage::Contacted, Stage::New), TransitionKind::Backward);
        assert_eq!(classify(Stage::Won, Stage::Negotiation), TransitionKind::Backward);
        assert_eq!(classify(Stage::Lost, Stage::New), TransitionKind::Backward);
    }

    #[test]
    fn test_forward_and_lateral() {
        assert_eq!(classify(Stage::New, Stage::Contacted), TransitionKind::Forward);
        assert_eq!(classify(Stage::New, Stage::Won), TransitionKind::Forward);
        assert_eq!(classify(Stage::Proposal, Stage::Proposal), TransitionKind::Forward);
        assert!(!TransitionKind::Forward.requires_confirmation());
    }

    #[test]
    fn test_is_backward_matches_index_order() {
        for a in Stage::ALL {
            for b in Stage::ALL {
                assert_eq!(is_backward(a, b), b.index() < a.index(), "{:?} -> {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_pending_for_move() {
        assert!(PendingTransition::for_move(1, Stage::New, Stage::Qualified, None).is_none());

        let pending = PendingTransition::for_move(1, Stage::Qualified, Stage::Lost, Some("Budget".to_string())).unwrap();
        assert_eq!(pending.kind(), TransitionKind::Lost);
        assert_eq!(pending.to(), Stage::Lost);
        assert_eq!(pending.reason(), Some("Budget"));

        // Backward moves drop any reason offered
        let pending = PendingTransition::for_move(2, Stage::Contacted, Stage::New, Some("ignored".to_string())).unwrap();
        assert_eq!(pending.kind(), TransitionKind::Backward);
        assert_eq!(pending.reason(), None);
        assert_eq!(pending.prompt(), "Move lead back from Contacted to New?");
    }

    #[test]
    fn test_blank_lost_reason_is_dropped() {
        let pending = PendingTransition::for_move(1, Stage::Proposal, Stage::Lost, Some("   ".to_string())).unwrap();
        assert_eq!(pending.reason(), None);
    }
}
