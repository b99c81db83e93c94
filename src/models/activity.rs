use serde::{Deserialize, Serialize};
use crate::models::Stage;

/// Audit record of a stage change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// Row id once persisted
    pub id: Option<i64>,
    pub lead_id: i64,
    pub from_stage: Stage,
    pub to_stage: Stage,
    pub reason: Option<String>,
    pub timestamp: i64,
}

impl ActivityEntry {
    pub fn new(lead_id: i64, from_stage: Stage, to_stage: Stage, reason: Option<String>, timestamp: i64) -> Self {
        Self {
            id: None,
            lead_id,
            from_stage,
            to_stage,
            reason,
            timestamp,
        }
    }
}
