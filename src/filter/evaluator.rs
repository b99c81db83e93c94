//! Filter evaluator
//!
//! Evaluates lead filters. A filter is a list of terms joined by AND; an empty
//! filter matches every lead.
//!
//! # Filter Terms
//!
//! - `Query` - case-insensitive substring of name, company, email or assignee
//! - `Assignee` / `Source` - case-insensitive equality
//! - `Priority` / `Stage` - equality
//! - `MinValue` - deal value >= threshold (cents)
//! - `ActiveWithin` - last activity no more than N days before now
//! - `Tag` - lead carries the tag

use crate::models::{Lead, Priority, Stage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterTerm {
    Query(String),
    Assignee(String),
    Source(String),
    Priority(Priority),
    Stage(Stage),
    MinValue(i64),
    ActiveWithin(i64),
    Tag(String),
}

impl FilterTerm {
    pub fn matches(&self, lead: &Lead, now: i64) -> bool {
        match self {
            FilterTerm::Query(text) => {
                let needle = text.trim().to_lowercase();
                if needle.is_empty() {
                    return true;
                }
                let contains = |field: &str| field.to_lowercase().contains(&needle);
                contains(&lead.name)
                    || lead.company.as_deref().map_or(false, contains)
                    || lead.email.as_deref().map_or(false, contains)
                    || lead.assignee.as_deref().map_or(false, contains)
            }
            FilterTerm::Assignee(name) => lead
                .assignee
                .as_deref()
                .map_or(false, |a| a.eq_ignore_ascii_case(name)),
            FilterTerm::Source(source) => lead
                .source
                .as_deref()
                .map_or(false, |s| s.eq_ignore_ascii_case(source)),
            FilterTerm::Priority(priority) => lead.priority == *priority,
            FilterTerm::Stage(stage) => lead.stage == *stage,
            FilterTerm::MinValue(cents) => lead.value_cents >= *cents,
            FilterTerm::ActiveWithin(days) => {
                now.saturating_sub(lead.last_activity_ts) <= days.saturating_mul(86400)
            }
            FilterTerm::Tag(tag) => lead.has_tag(tag),
        }
    }
}

/// Conjunction of filter terms
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadFilter {
    pub terms: Vec<FilterTerm>,
}

impl LeadFilter {
    pub fn new(terms: Vec<FilterTerm>) -> Self {
        Self { terms }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// True when the lead passes every term
    pub fn matches(&self, lead: &Lead, now: i64) -> bool {
        self.terms.iter().all(|term| term.matches(lead, now))
    }

    pub fn with(mut self, term: FilterTerm) -> Self {
        self.terms.push(term);
        self
    }

    pub fn with_query(self, text: &str) -> Self {
        self.with(FilterTerm::Query(text.to_string()))
    }

    pub fn with_assignee(self, name: &str) -> Self {
        self.with(FilterTerm::Assignee(name.to_string()))
    }

    pub fn with_source(self, source: &str) -> Self {
        self.with(FilterTerm::Source(source.to_string()))
    }

    pub fn with_priority(self, priority: Priority) -> Self {
        self.with(FilterTerm::Priority(priority))
    }

    pub fn with_stage(self, stage: Stage) -> Self {
        self.with(FilterTerm::Stage(stage))
    }

    pub fn with_min_value(self, cents: i64) -> Self {
        self.with(FilterTerm::MinValue(cents))
    }

    pub fn with_active_within(self, days: i64) -> Self {
        self.with(FilterTerm::ActiveWithin(days))
    }

    pub fn with_tag(self, tag: &str) -> Self {
        self.with(FilterTerm::Tag(tag.to_string()))
    }
}
