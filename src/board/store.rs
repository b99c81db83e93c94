//! Board store: the single owner of the lead collection
//!
//! Every stage change goes through [`BoardStore`]. Moves are classified by
//! [`crate::board::transition::classify`]; gated moves wait in a pending slot
//! until [`BoardStore::confirm`] or [`BoardStore::cancel`].
//!
//! # Example
//!
//! ```
//! use leadboard::board::{BoardStore, MemorySink, MoveOutcome};
//! use leadboard::models::{Lead, Stage, WipLimits};
//!
//! let mut lead = Lead::new("Acme renewal".to_string());
//! lead.id = Some(1);
//! lead.stage = Stage::Contacted;
//!
//! let mut store = BoardStore::new(vec![lead], WipLimits::default(), MemorySink::new());
//! let outcome = store.move_stage(1, Stage::New, None).unwrap();
//! assert!(matches!(outcome, MoveOutcome::NeedsConfirmation(_)));
//!
//! store.confirm().unwrap();
//! assert_eq!(store.get(1).unwrap().stage, Stage::New);
//! ```

use crate::board::error::{BoardError, BoardResult};
use crate::board::sink::ActivitySink;
use crate::board::transition::PendingTransition;
use crate::board::view::{build_board, BoardView};
use crate::filter::LeadFilter;
use crate::models::{ActivityEntry, Lead, Stage, WipLimits};
use crate::utils::fuzzy;

/// Result of asking the board to move a lead
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Stage changed; the audit entry that was emitted
    Applied(ActivityEntry),
    /// Move is held until confirmed or cancelled
    NeedsConfirmation(PendingTransition),
    /// Drop without a dragged lead
    Ignored,
}

/// Notification sent to subscribers after each state change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    StageChanged(ActivityEntry),
    ConfirmationRequested(PendingTransition),
    ConfirmationCancelled(PendingTransition),
}

type Listener = Box<dyn FnMut(&BoardEvent)>;

fn system_clock() -> i64 {
    chrono::Utc::now().timestamp()
}

pub struct BoardStore<S: ActivitySink> {
    leads: Vec<Lead>,
    limits: WipLimits,
    sink: S,
    pending: Option<PendingTransition>,
    dragged: Option<i64>,
    listeners: Vec<Listener>,
    clock: fn() -> i64,
}

impl<S: ActivitySink> BoardStore<S> {
    pub fn new(leads: Vec<Lead>, limits: WipLimits, sink: S) -> Self {
        Self {
            leads,
            limits,
            sink,
            pending: None,
            dragged: None,
            listeners: Vec::new(),
            clock: system_clock,
        }
    }

    /// Replace the time source used for last-activity stamps
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn list(&self) -> &[Lead] {
        &self.leads
    }

    pub fn get(&self, lead_id: i64) -> Option<&Lead> {
        self.leads.iter().find(|lead| lead.id == Some(lead_id))
    }

    pub fn limits(&self) -> &WipLimits {
        &self.limits
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn pending(&self) -> Option<&PendingTransition> {
        self.pending.as_ref()
    }

    pub fn dragged(&self) -> Option<i64> {
        self.dragged
    }

    /// Number of leads currently in `stage`, ignoring any filter
    pub fn load(&self, stage: Stage) -> usize {
        self.leads.iter().filter(|lead| lead.stage == stage).count()
    }

    /// Stages whose load exceeds their WIP limit
    pub fn over_capacity(&self) -> Vec<Stage> {
        Stage::ALL
            .iter()
            .copied()
            .filter(|stage| self.limits.is_over(*stage, self.load(*stage)))
            .collect()
    }

    /// Derived board for the current collection
    pub fn view(&self, filter: &LeadFilter) -> BoardView<'_> {
        build_board(&self.leads, filter, &self.limits, (self.clock)())
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&BoardEvent) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Remember which lead is being dragged
    pub fn drag_start(&mut self, lead_id: i64) -> BoardResult<()> {
        if self.get(lead_id).is_none() {
            return Err(BoardError::LeadNotFound(lead_id));
        }
        self.dragged = Some(lead_id);
        Ok(())
    }

    pub fn drag_end(&mut self) {
        self.dragged = None;
    }

    /// Drop the dragged lead on `target`. Without a dragged lead this is a no-op.
    /// A drop that fails keeps the drag so it can be dropped again.
    pub fn drop_on(&mut self, target: Stage) -> BoardResult<MoveOutcome> {
        let Some(lead_id) = self.dragged else {
            return Ok(MoveOutcome::Ignored);
        };
        let outcome = self.move_stage(lead_id, target, None)?;
        self.dragged = None;
        Ok(outcome)
    }

    /// Request a stage change. Forward moves apply immediately; backward and
    /// lost moves wait for [`BoardStore::confirm`].
    pub fn move_stage(&mut self, lead_id: i64, target: Stage, reason: Option<String>) -> BoardResult<MoveOutcome> {
        if let Some(pending) = &self.pending {
            return Err(BoardError::ConfirmationPending(pending.lead_id()));
        }
        let from = self.get(lead_id).ok_or(BoardError::LeadNotFound(lead_id))?.stage;

        match PendingTransition::for_move(lead_id, from, target, reason) {
            Some(pending) => {
                log::debug!("lead {} {:?} move {} -> {} awaits confirmation", lead_id, pending.kind(), from, target);
                self.pending = Some(pending.clone());
                self.notify(&BoardEvent::ConfirmationRequested(pending.clone()));
                Ok(MoveOutcome::NeedsConfirmation(pending))
            }
            None => self.apply(lead_id, target, None).map(MoveOutcome::Applied),
        }
    }

    /// Same as [`BoardStore::move_stage`] with the target given by name
    pub fn move_stage_named(&mut self, lead_id: i64, stage_name: &str, reason: Option<String>) -> BoardResult<MoveOutcome> {
        let target = parse_stage(stage_name)?;
        self.move_stage(lead_id, target, reason)
    }

    /// Update the reason on a pending lost transition. Returns false when
    /// nothing pending can take a reason.
    pub fn set_pending_reason(&mut self, new_reason: Option<String>) -> bool {
        match &mut self.pending {
            Some(PendingTransition::Lost { reason, .. }) => {
                *reason = new_reason.filter(|r| !r.trim().is_empty());
                true
            }
            _ => false,
        }
    }

    /// Apply the pending transition. Returns `Ok(None)` when nothing is
    /// pending, so a repeated confirm never applies twice.
    pub fn confirm(&mut self) -> BoardResult<Option<ActivityEntry>> {
        let Some(pending) = self.pending.take() else {
            log::debug!("confirm with nothing pending ignored");
            return Ok(None);
        };
        let reason = pending.reason().map(str::to_string);
        self.apply(pending.lead_id(), pending.to(), reason).map(Some)
    }

    /// Discard the pending transition without touching the lead
    pub fn cancel(&mut self) -> Option<PendingTransition> {
        let pending = self.pending.take()?;
        log::debug!("lead {} move to {} cancelled", pending.lead_id(), pending.to());
        self.notify(&BoardEvent::ConfirmationCancelled(pending.clone()));
        Some(pending)
    }

    fn apply(&mut self, lead_id: i64, target: Stage, reason: Option<String>) -> BoardResult<ActivityEntry> {
        let now = (self.clock)();
        let lead = self
            .leads
            .iter_mut()
            .find(|lead| lead.id == Some(lead_id))
            .ok_or(BoardError::LeadNotFound(lead_id))?;

        let from = lead.stage;
        lead.stage = target;
        lead.last_activity_ts = now;

        let entry = ActivityEntry::new(lead_id, from, target, reason, now);
        log::debug!("lead {} moved {} -> {}", lead_id, from, target);

        if self.limits.is_over(target, self.load(target)) {
            log::info!("stage {} is over its WIP limit", target);
        }

        if let Err(e) = self.sink.record(&entry) {
            log::warn!("Failed to record activity for lead {}: {:#}", lead_id, e);
        }

        self.notify(&BoardEvent::StageChanged(entry.clone()));
        Ok(entry)
    }

    fn notify(&mut self, event: &BoardEvent) {
        for listener in self.listeners.iter_mut() {
            listener(event);
        }
    }
}

/// Parse a stage name, suggesting the closest stage when it is unknown
pub fn parse_stage(name: &str) -> BoardResult<Stage> {
    Stage::from_str(name).ok_or_else(|| {
        let keys: Vec<&str> = Stage::ALL.iter().map(|s| s.as_str()).collect();
        BoardError::UnknownStage {
            name: name.to_string(),
            suggestion: fuzzy::closest_match(name, &keys, 3),
        }
    })
}
