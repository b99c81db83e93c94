// Core data models for the pipeline board

pub mod lead;
pub mod stage;
pub mod activity;

pub use lead::*;
pub use stage::*;
pub use activity::*;
