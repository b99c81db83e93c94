//! Sales pipeline board
//!
//! - [`transition`]: classifies stage moves and describes pending ones
//! - [`store`]: owns the leads and gates every stage change
//! - [`view`]: filtered per-stage grouping, aggregates and WIP flags
//! - [`sink`]: audit log receivers

pub mod error;
pub mod sink;
pub mod store;
pub mod transition;
pub mod view;

pub use error::{BoardError, BoardResult};
pub use sink::{ActivitySink, MemorySink, NullSink};
pub use store::{parse_stage, BoardEvent, BoardStore, MoveOutcome};
pub use transition::{classify, is_backward, PendingTransition, TransitionKind};
pub use view::{build_board, filter_leads, group_by_stage, summarize, BoardSummary, BoardView, StageColumn, StageTotals};
