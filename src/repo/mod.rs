pub mod activity;
pub mod lead;

pub use activity::*;
pub use lead::*;
