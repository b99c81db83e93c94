use serde::{Deserialize, Serialize};
use crate::models::Stage;

/// Lead priority, ordered from least to most pressing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Priority::Low, Priority::Medium, Priority::High, Priority::Urgent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            "urgent" => Some(Priority::Urgent),
            _ => None,
        }
    }
}

/// Lead model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: Option<i64>,
    pub uuid: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub assignee: Option<String>,
    pub source: Option<String>,
    /// Deal value in cents
    pub value_cents: i64,
    pub stage: Stage,
    pub priority: Priority,
    pub tags: Vec<String>,
    pub created_ts: i64,
    pub last_activity_ts: i64,
}

impl Lead {
    /// Create a new lead in the first pipeline stage
    pub fn new(name: String) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            id: None,
            uuid: uuid::Uuid::new_v4().to_string(),
            name,
            email: None,
            phone: None,
            company: None,
            assignee: None,
            source: None,
            value_cents: 0,
            stage: Stage::New,
            priority: Priority::default(),
            tags: Vec::new(),
            created_ts: now,
            last_activity_ts: now,
        }
    }

    /// Days since the last recorded activity, relative to `now`
    pub fn days_idle(&self, now: i64) -> i64 {
        (now - self.last_activity_ts).max(0) / 86400
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}
