pub mod evaluator;
pub mod parser;

pub use evaluator::{FilterTerm, LeadFilter};
pub use parser::parse_filter;
