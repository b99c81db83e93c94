//! Derived board views
//!
//! Pure functions of the lead collection, the active filter and the WIP limits.
//! Nothing here is cached; callers rebuild the view after each change.

use serde::Serialize;
use crate::filter::LeadFilter;
use crate::models::{Lead, Stage, WipLimits};

/// One stage column of the board
#[derive(Debug, Clone)]
pub struct StageColumn<'a> {
    pub stage: Stage,
    /// Leads in this stage that pass the filter
    pub leads: Vec<&'a Lead>,
    /// Sum of deal values of `leads`, in cents
    pub value_cents: i64,
    /// All leads in this stage, filter or not; WIP limits apply to this
    pub load: usize,
    pub wip_limit: Option<usize>,
}

impl<'a> StageColumn<'a> {
    pub fn is_over_limit(&self) -> bool {
        matches!(self.wip_limit, Some(limit) if self.load > limit)
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }
}

/// Per-stage totals, as reported in summaries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageTotals {
    pub stage: Stage,
    pub count: usize,
    pub value_cents: i64,
    pub load: usize,
    pub wip_limit: Option<usize>,
    pub over_limit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSummary {
    pub lead_count: usize,
    pub value_cents: i64,
    pub won_count: usize,
    pub won_value_cents: i64,
    pub over_capacity: Vec<Stage>,
    pub stages: Vec<StageTotals>,
}

#[derive(Debug, Clone)]
pub struct BoardView<'a> {
    pub columns: Vec<StageColumn<'a>>,
    pub summary: BoardSummary,
}

impl<'a> BoardView<'a> {
    pub fn column(&self, stage: Stage) -> Option<&StageColumn<'a>> {
        self.columns.iter().find(|c| c.stage == stage)
    }
}

/// Leads passing `filter`, in collection order
pub fn filter_leads<'a>(leads: &'a [Lead], filter: &LeadFilter, now: i64) -> Vec<&'a Lead> {
    leads.iter().filter(|lead| filter.matches(lead, now)).collect()
}

/// Partition `filtered` by stage. Every stage gets a column, in pipeline order,
/// even when empty. `all` supplies the unfiltered load for WIP checks.
pub fn group_by_stage<'a>(filtered: &[&'a Lead], all: &[Lead], limits: &WipLimits) -> Vec<StageColumn<'a>> {
    Stage::ALL
        .iter()
        .map(|stage| {
            let leads: Vec<&Lead> = filtered.iter().copied().filter(|l| l.stage == *stage).collect();
            let value_cents = leads.iter().map(|l| l.value_cents).sum();
            StageColumn {
                stage: *stage,
                leads,
                value_cents,
                load: all.iter().filter(|l| l.stage == *stage).count(),
                wip_limit: limits.get(*stage),
            }
        })
        .collect()
}

pub fn summarize(columns: &[StageColumn<'_>]) -> BoardSummary {
    let stages: Vec<StageTotals> = columns
        .iter()
        .map(|c| StageTotals {
            stage: c.stage,
            count: c.leads.len(),
            value_cents: c.value_cents,
            load: c.load,
            wip_limit: c.wip_limit,
            over_limit: c.is_over_limit(),
        })
        .collect();

    let won = stages.iter().find(|s| s.stage == Stage::Won);

    BoardSummary {
        lead_count: stages.iter().map(|s| s.count).sum(),
        value_cents: stages.iter().map(|s| s.value_cents).sum(),
        won_count: won.map_or(0, |s| s.count),
        won_value_cents: won.map_or(0, |s| s.value_cents),
        over_capacity: stages.iter().filter(|s| s.over_limit).map(|s| s.stage).collect(),
        stages,
    }
}

pub fn build_board<'a>(leads: &'a [Lead], filter: &LeadFilter, limits: &WipLimits, now: i64) -> BoardView<'a> {
    let filtered = filter_leads(leads, filter, now);
    let columns = group_by_stage(&filtered, leads, limits);
    let summary = summarize(&columns);
    BoardView { columns, summary }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;

    fn lead(id: i64, stage: Stage, value_cents: i64) -> Lead {
        let mut lead = Lead::new(format!("Lead {}", id));
        lead.id = Some(id);
        lead.stage = stage;
        lead.value_cents = value_cents;
        lead
    }

    #[test]
    fn test_every_stage_has_a_column() {
        let leads = vec![lead(1, Stage::New, 100)];
        let view = build_board(&leads, &LeadFilter::default(), &WipLimits::default(), 0);
        let stages: Vec<Stage> = view.columns.iter().map(|c| c.stage).collect();
        assert_eq!(stages, Stage::ALL.to_vec());
        assert!(view.column(Stage::Won).unwrap().is_empty());
    }

    #[test]
    fn test_aggregates() {
        let leads = vec![
            lead(1, Stage::New, 1_000),
            lead(2, Stage::New, 2_500),
            lead(3, Stage::Won, 10_000),
            lead(4, Stage::Won, 5_000),
            lead(5, Stage::Lost, 700),
        ];
        let view = build_board(&leads, &LeadFilter::default(), &WipLimits::default(), 0);

        assert_eq!(view.column(Stage::New).unwrap().value_cents, 3_500);
        assert_eq!(view.summary.lead_count, 5);
        assert_eq!(view.summary.value_cents, 19_200);
        assert_eq!(view.summary.won_count, 2);
        assert_eq!(view.summary.won_value_cents, 15_000);
        assert!(view.summary.over_capacity.is_empty());
    }

    #[test]
    fn test_wip_uses_unfiltered_load() {
        let mut leads: Vec<Lead> = (1..=11).map(|id| lead(id, Stage::Proposal, 0)).collect();
        leads[0].priority = Priority::Urgent;
        let mut limits = WipLimits::default();
        limits.set(Stage::Proposal, Some(10));

        let filter = LeadFilter::default().with_priority(Priority::Urgent);
        let view = build_board(&leads, &filter, &limits, 0);
        let column = view.column(Stage::Proposal).unwrap();

        assert_eq!(column.leads.len(), 1);
        assert_eq!(column.load, 11);
        assert!(column.is_over_limit());
        assert_eq!(view.summary.over_capacity, vec![Stage::Proposal]);
    }
}
