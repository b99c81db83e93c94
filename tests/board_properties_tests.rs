// Board behavior through the public library API

use leadboard::board::{
    build_board, classify, is_backward, BoardStore, MemorySink, MoveOutcome, PendingTransition, TransitionKind,
};
use leadboard::filter::{parse_filter, LeadFilter};
use leadboard::models::{Lead, Priority, Stage, WipLimits};

const NOW: i64 = 1_700_000_000;

fn confirm_clock() -> i64 {
    NOW + 3600
}

fn lead(id: i64, stage: Stage) -> Lead {
    let mut lead = Lead::new(format!("Lead {}", id));
    lead.id = Some(id);
    lead.stage = stage;
    lead.last_activity_ts = NOW - 86400;
    lead
}

fn store_with(leads: Vec<Lead>) -> BoardStore<MemorySink> {
    BoardStore::new(leads, WipLimits::default(), MemorySink::new()).with_clock(confirm_clock)
}

#[test]
fn test_backward_follows_stage_order_only() {
    for a in Stage::ALL {
        for b in Stage::ALL {
            assert_eq!(is_backward(a, b), b.index() < a.index(), "{} -> {}", a, b);
        }
    }
}

#[test]
fn test_confirmation_required_classification() {
    for from in Stage::ALL {
        for to in Stage::ALL {
            let expected = to == Stage::Lost || to.index() < from.index();
            assert_eq!(classify(from, to).requires_confirmation(), expected, "{} -> {}", from, to);

            let mut store = store_with(vec![lead(1, from)]);
            let outcome = store.move_stage(1, to, None).unwrap();
            assert_eq!(matches!(outcome, MoveOutcome::NeedsConfirmation(_)), expected, "{} -> {}", from, to);
        }
    }
}

#[test]
fn test_cancel_is_a_no_op() {
    for (from, to) in [(Stage::Proposal, Stage::Contacted), (Stage::Negotiation, Stage::Lost)] {
        let mut store = store_with(vec![lead(1, from)]);
        store.move_stage(1, to, None).unwrap();
        assert!(store.cancel().is_some());

        let lead = store.get(1).unwrap();
        assert_eq!(lead.stage, from);
        assert_eq!(lead.last_activity_ts, NOW - 86400);
        assert!(store.sink().entries.is_empty());
        assert!(store.pending().is_none());
    }
}

#[test]
fn test_repeated_confirm_applies_once() {
    let mut store = store_with(vec![lead(1, Stage::Won)]);
    store.move_stage(1, Stage::Negotiation, None).unwrap();

    let first = store.confirm().unwrap();
    let second = store.confirm().unwrap();
    let third = store.confirm().unwrap();

    assert!(first.is_some());
    assert!(second.is_none());
    assert!(third.is_none());
    assert_eq!(store.get(1).unwrap().stage, Stage::Negotiation);
    assert_eq!(store.get(1).unwrap().last_activity_ts, confirm_clock());
    assert_eq!(store.sink().entries.len(), 1);
}

fn sample_leads() -> Vec<Lead> {
    let specs: [(Stage, &str, &str, Priority, i64, i64); 8] = [
        (Stage::New, "maria", "website", Priority::High, 500_000, 1),
        (Stage::New, "dev", "referral", Priority::Low, 100_000, 20),
        (Stage::Contacted, "maria", "referral", Priority::High, 2_000_000, 3),
        (Stage::Qualified, "sam", "event", Priority::Medium, 750_000, 2),
        (Stage::Proposal, "maria", "website", Priority::Urgent, 3_000_000, 10),
        (Stage::Negotiation, "dev", "website", Priority::High, 1_200_000, 0),
        (Stage::Won, "maria", "referral", Priority::Medium, 900_000, 40),
        (Stage::Lost, "sam", "event", Priority::Low, 50_000, 60),
    ];
    specs
        .iter()
        .enumerate()
        .map(|(i, (stage, assignee, source, priority, value, idle_days))| {
            let mut lead = lead(i as i64 + 1, *stage);
            lead.assignee = Some(assignee.to_string());
            lead.source = Some(source.to_string());
            lead.priority = *priority;
            lead.value_cents = *value;
            lead.last_activity_ts = NOW - idle_days * 86400;
            lead
        })
        .collect()
}

fn matching_ids(leads: &[Lead], filter: &LeadFilter) -> Vec<i64> {
    leads
        .iter()
        .filter(|l| filter.matches(l, NOW))
        .filter_map(|l| l.id)
        .collect()
}

#[test]
fn test_filters_intersect() {
    let leads = sample_leads();
    let single: Vec<Vec<&str>> = vec![
        vec!["assignee=maria"],
        vec!["source=website"],
        vec!["priority=high"],
        vec!["value>=5k"],
        vec!["active=7d"],
    ];

    for i in 0..single.len() {
        for j in (i + 1)..single.len() {
            let a = parse_filter(single[i].iter().map(|s| s.to_string()).collect()).unwrap();
            let b = parse_filter(single[j].iter().map(|s| s.to_string()).collect()).unwrap();
            let both_tokens: Vec<String> = single[i].iter().chain(single[j].iter()).map(|s| s.to_string()).collect();
            let both = parse_filter(both_tokens).unwrap();

            let ids_a = matching_ids(&leads, &a);
            let ids_b = matching_ids(&leads, &b);
            let expected: Vec<i64> = ids_a.iter().copied().filter(|id| ids_b.contains(id)).collect();
            assert_eq!(matching_ids(&leads, &both), expected, "{:?} + {:?}", single[i], single[j]);
        }
    }

    let cleared = parse_filter(Vec::new()).unwrap();
    assert_eq!(matching_ids(&leads, &cleared).len(), leads.len());
}

#[test]
fn test_grouping_partitions_filtered_set() {
    let leads = sample_leads();
    for tokens in [vec![], vec!["assignee=maria"], vec!["value>=10k"], vec!["priority=low"]] {
        let filter = parse_filter(tokens.iter().map(|s| s.to_string()).collect()).unwrap();
        let view = build_board(&leads, &filter, &WipLimits::default(), NOW);

        assert_eq!(view.columns.len(), Stage::ALL.len());
        let mut grouped: Vec<i64> = view
            .columns
            .iter()
            .flat_map(|c| {
                assert!(c.leads.iter().all(|l| l.stage == c.stage));
                c.leads.iter().filter_map(|l| l.id)
            })
            .collect();
        grouped.sort();
        assert_eq!(grouped, matching_ids(&leads, &filter), "{:?}", tokens);
    }
}

#[test]
fn test_scenario_contacted_back_to_new() {
    let mut store = store_with(vec![lead(1, Stage::Contacted)]);
    store.drag_start(1).unwrap();

    let outcome = store.drop_on(Stage::New).unwrap();
    let MoveOutcome::NeedsConfirmation(pending) = outcome else {
        panic!("backward move should need confirmation");
    };
    assert_eq!(pending.kind(), TransitionKind::Backward);
    assert_eq!(pending.to(), Stage::New);
    assert!(pending.prompt().contains("New"));

    store.confirm().unwrap();
    assert_eq!(store.get(1).unwrap().stage, Stage::New);
}

#[test]
fn test_scenario_qualified_to_lost_with_reason() {
    let mut store = store_with(vec![lead(1, Stage::Qualified)]);
    store.drag_start(1).unwrap();

    let outcome = store.drop_on(Stage::Lost).unwrap();
    let MoveOutcome::NeedsConfirmation(pending) = outcome else {
        panic!("lost move should need confirmation");
    };
    assert!(matches!(pending, PendingTransition::Lost { from: Stage::Qualified, reason: None, .. }));

    assert!(store.set_pending_reason(Some("Budget constraints".to_string())));
    let entry = store.confirm().unwrap().unwrap();

    assert_eq!(entry.lead_id, 1);
    assert_eq!(entry.from_stage, Stage::Qualified);
    assert_eq!(entry.to_stage, Stage::Lost);
    assert_eq!(entry.reason.as_deref(), Some("Budget constraints"));
    assert_eq!(store.sink().entries, vec![entry]);
}

#[test]
fn test_scenario_new_to_contacted_applies() {
    let mut store = store_with(vec![lead(1, Stage::New)]);
    store.drag_start(1).unwrap();

    let outcome = store.drop_on(Stage::Contacted).unwrap();
    assert!(matches!(outcome, MoveOutcome::Applied(_)));
    assert_eq!(store.get(1).unwrap().stage, Stage::Contacted);
    assert!(store.pending().is_none());
}

#[test]
fn test_wip_limit_flags_but_does_not_block() {
    let mut leads: Vec<Lead> = (1..=11).map(|id| lead(id, Stage::New)).collect();
    leads.push(lead(12, Stage::Contacted));

    let mut limits = WipLimits::default();
    limits.set(Stage::New, Some(10));
    let mut store = BoardStore::new(leads, limits, MemorySink::new());

    let summary = store.view(&LeadFilter::default()).summary;
    assert_eq!(summary.over_capacity, vec![Stage::New]);
    let totals = summary.stages.iter().find(|s| s.stage == Stage::New).unwrap();
    assert!(totals.over_limit);
    assert_eq!(totals.count, 11);

    // Backward into an over-capacity stage still goes through once confirmed
    store.move_stage(12, Stage::New, None).unwrap();
    assert!(store.confirm().unwrap().is_some());
    assert_eq!(store.load(Stage::New), 12);
}

#[test]
fn test_wip_flag_uses_unfiltered_load() {
    let leads: Vec<Lead> = (1..=11)
        .map(|id| {
            let mut lead = lead(id, Stage::Proposal);
            lead.assignee = Some(if id == 1 { "maria" } else { "dev" }.to_string());
            lead
        })
        .collect();
    let mut limits = WipLimits::default();
    limits.set(Stage::Proposal, Some(10));

    let filter = LeadFilter::default().with_assignee("maria");
    let view = build_board(&leads, &filter, &limits, NOW);
    let column = view.column(Stage::Proposal).unwrap();
    assert_eq!(column.leads.len(), 1);
    assert_eq!(column.load, 11);
    assert!(column.is_over_limit());
}
