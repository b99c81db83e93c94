//! Filter parser for lead queries
//!
//! All terms are joined by AND. Bare words form the free-text query.
//!
//! # Grammar
//!
//! ```text
//! filter := term*
//! term   := assignee=<name> | source=<name> | priority=<level> | stage=<stage>
//!         | value>=<amount> | active=<days>[d] | active<=<days>[d] | +tag | <word>
//! ```
//!
//! # Examples
//!
//! ```text
//! assignee=alice priority=high
//! acme value>=5k
//! stage=proposal active=7d +enterprise
//! ```

use crate::filter::evaluator::{FilterTerm, LeadFilter};
use crate::models::Priority;
use crate::utils::fuzzy;
use crate::utils::money::parse_money;

/// Comparison operators for filter expressions
#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonOp {
    Eq,    // =
    Gt,    // >
    Lt,    // <
    Gte,   // >=
    Lte,   // <=
}

fn format_op(op: &ComparisonOp) -> &'static str {
    match op {
        ComparisonOp::Eq => "=",
        ComparisonOp::Gt => ">",
        ComparisonOp::Lt => "<",
        ComparisonOp::Gte => ">=",
        ComparisonOp::Lte => "<=",
    }
}

/// Parse filter tokens into a LeadFilter
///
/// # Arguments
/// * `tokens` - Vector of filter tokens (e.g., `vec!["assignee=alice".to_string(), "acme".to_string()]`)
///
/// # Example
///
/// ```
/// use leadboard::filter::parse_filter;
///
/// let filter = parse_filter(vec!["assignee=alice".to_string(), "+enterprise".to_string()]).unwrap();
/// assert_eq!(filter.terms.len(), 2);
/// ```
pub fn parse_filter(tokens: Vec<String>) -> Result<LeadFilter, String> {
    let mut terms = Vec::new();
    let mut words: Vec<String> = Vec::new();

    for token in &tokens {
        match parse_filter_term(token)? {
            Some(term) => terms.push(term),
            None => words.push(token.clone()),
        }
    }

    if !words.is_empty() {
        terms.insert(0, FilterTerm::Query(words.join(" ")));
    }

    Ok(LeadFilter::new(terms))
}

/// Split a token into (key, operator, value) using operator detection.
/// Returns None if no operator is found.
fn split_on_operator(token: &str) -> Option<(String, ComparisonOp, String)> {
    let op_start = token.find(|c: char| c == '=' || c == '>' || c == '<')?;

    let key = token[..op_start].to_string();
    if key.is_empty() {
        return None;
    }

    let rest = &token[op_start..];

    let (op, op_len) = if rest.starts_with(">=") {
        (ComparisonOp::Gte, 2)
    } else if rest.starts_with("<=") {
        (ComparisonOp::Lte, 2)
    } else if rest.starts_with('=') {
        (ComparisonOp::Eq, 1)
    } else if rest.starts_with('>') {
        (ComparisonOp::Gt, 1)
    } else if rest.starts_with('<') {
        (ComparisonOp::Lt, 1)
    } else {
        return None;
    };

    let value = rest[op_len..].to_string();
    Some((key, op, value))
}

/// Known filter keys (exact match only)
const FILTER_KEYS: &[&str] = &[
    "assignee", "source", "priority", "stage", "value", "active",
];

fn expect_eq(key: &str, op: &ComparisonOp) -> Result<(), String> {
    if *op != ComparisonOp::Eq {
        return Err(format!("{} filter only supports '=' operator, got '{}'", key, format_op(op)));
    }
    Ok(())
}

/// Parse "7" or "7d" into a day count
fn parse_days(value: &str) -> Result<i64, String> {
    let digits = value.strip_suffix('d').unwrap_or(value);
    match digits.parse::<i64>() {
        Ok(days) if days >= 0 => Ok(days),
        _ => Err(format!("Invalid day count '{}'. Use a whole number of days, e.g. 'active=7d'.", value)),
    }
}

/// Parse a single filter term token. Returns Ok(None) for free-text words.
fn parse_filter_term(token: &str) -> Result<Option<FilterTerm>, String> {
    if let Some(tag) = token.strip_prefix('+') {
        if tag.is_empty() {
            return Err("Tag name cannot be empty. Use '+tagname' to filter by tag.".to_string());
        }
        return Ok(Some(FilterTerm::Tag(tag.to_string())));
    }

    let Some((key, op, value)) = split_on_operator(token) else {
        return Ok(None);
    };
    let key_lower = key.to_lowercase();

    if !FILTER_KEYS.contains(&key_lower.as_str()) {
        return match fuzzy::closest_match(&key_lower, FILTER_KEYS, 2) {
            Some(suggestion) => Err(format!("Unknown filter field '{}'. Did you mean '{}'?", key, suggestion)),
            None => Err(format!("Unknown filter field '{}'. Known fields: {}", key, FILTER_KEYS.join(", "))),
        };
    }

    if value.is_empty() {
        return Err(format!("Filter field '{}' needs a value", key_lower));
    }

    match key_lower.as_str() {
        "assignee" => {
            expect_eq("Assignee", &op)?;
            Ok(Some(FilterTerm::Assignee(value)))
        }
        "source" => {
            expect_eq("Source", &op)?;
            Ok(Some(FilterTerm::Source(value)))
        }
        "priority" => {
            expect_eq("Priority", &op)?;
            let priority = Priority::from_str(&value).ok_or_else(|| {
                format!("Invalid priority '{}'. Valid values: low, medium, high, urgent", value)
            })?;
            Ok(Some(FilterTerm::Priority(priority)))
        }
        "stage" => {
            expect_eq("Stage", &op)?;
            let stage = crate::board::parse_stage(&value).map_err(|e| e.to_string())?;
            Ok(Some(FilterTerm::Stage(stage)))
        }
        "value" => {
            // value=X reads as "at least X"
            if op != ComparisonOp::Gte && op != ComparisonOp::Eq {
                return Err(format!("Value filter only supports '>=' operator, got '{}'", format_op(&op)));
            }
            let cents = parse_money(&value).map_err(|e| e.to_string())?;
            Ok(Some(FilterTerm::MinValue(cents)))
        }
        "active" => {
            if op != ComparisonOp::Lte && op != ComparisonOp::Eq {
                return Err(format!("Active filter only supports '=' and '<=' operators, got '{}'", format_op(&op)));
            }
            Ok(Some(FilterTerm::ActiveWithin(parse_days(&value)?)))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Stage;

    fn tokens(input: &[&str]) -> Vec<String> {
        input.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_filter() {
        let filter = parse_filter(Vec::new()).unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn test_words_form_query() {
        let filter = parse_filter(tokens(&["acme", "corp", "priority=high"])).unwrap();
        assert_eq!(
            filter.terms,
            vec![FilterTerm::Query("acme corp".to_string()), FilterTerm::Priority(Priority::High)]
        );
    }

    #[test]
    fn test_structured_terms() {
        let filter = parse_filter(tokens(&[
            "assignee=alice", "source=web", "stage=proposal", "value>=5k", "active=7d", "+vip",
        ]))
        .unwrap();
        assert_eq!(
            filter.terms,
            vec![
                FilterTerm::Assignee("alice".to_string()),
                FilterTerm::Source("web".to_string()),
                FilterTerm::Stage(Stage::Proposal),
                FilterTerm::MinValue(500_000),
                FilterTerm::ActiveWithin(7),
                FilterTerm::Tag("vip".to_string()),
            ]
        );
    }

    #[test]
    fn test_unknown_field_error() {
        let err = parse_filter(tokens(&["asignee=bob"])).unwrap_err();
        assert!(err.contains("Did you mean 'assignee'"));

        let err = parse_filter(tokens(&["color=red"])).unwrap_err();
        assert!(err.contains("Known fields"));
    }

    #[test]
    fn test_invalid_values() {
        assert!(parse_filter(tokens(&["priority=critical"])).is_err());
        assert!(parse_filter(tokens(&["stage=closed"])).is_err());
        assert!(parse_filter(tokens(&["value>=lots"])).is_err());
        assert!(parse_filter(tokens(&["active=soon"])).is_err());
        assert!(parse_filter(tokens(&["assignee="])).is_err());
        assert!(parse_filter(tokens(&["+"])).is_err());
    }

    #[test]
    fn test_operator_restrictions() {
        assert!(parse_filter(tokens(&["priority>=high"])).is_err());
        assert!(parse_filter(tokens(&["value<100"])).is_err());
        assert!(parse_filter(tokens(&["active<=3"])).is_ok());
        assert!(parse_filter(tokens(&["active>3"])).is_err());
    }
}
