// Parsing of `field=value` and `+tag` tokens for lead add/modify

use crate::utils::fuzzy::closest_match;

/// Parsed lead arguments from the command line
#[derive(Debug, Default, PartialEq)]
pub struct ParsedLeadArgs {
    pub name: Vec<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub assignee: Option<String>,
    pub source: Option<String>,
    pub value: Option<String>,
    pub priority: Option<String>,
    pub stage: Option<String>,
    pub tags_add: Vec<String>,
    pub tags_remove: Vec<String>,
}

impl ParsedLeadArgs {
    /// True when no field, tag or name token was given
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug)]
pub enum FieldParseError {
    InvalidFieldName {
        field: String,
        suggestion: String,
    },
    ReadOnlyField {
        field: String,
        hint: String,
    },
    UnknownFieldToken {
        token: String,
    },
    InvalidTag {
        message: String,
    },
}

impl std::fmt::Display for FieldParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldParseError::InvalidFieldName { field, suggestion } => {
                write!(f, "Unrecognized field name '{}'\n  Did you mean '{}'?", field, suggestion)
            }
            FieldParseError::ReadOnlyField { field, hint } => {
                write!(f, "Field '{}' cannot be modified directly.\n  {}", field, hint)
            }
            FieldParseError::UnknownFieldToken { token } => {
                write!(f, "Unrecognized field token '{}'\n  If this is part of the lead name, remove the equals sign or quote the name.", token)
            }
            FieldParseError::InvalidTag { message } => {
                write!(f, "{}", message)
            }
        }
    }
}

/// Valid field names (exact match only)
pub const FIELD_NAMES: &[&str] = &[
    "email", "phone", "company", "assignee", "source", "value", "priority", "stage",
];

const READ_ONLY_FIELDS: &[&str] = &["id", "uuid", "created", "activity"];

fn read_only_hint(field: &str) -> String {
    match field.to_lowercase().as_str() {
        "id" | "uuid" => "Lead IDs are assigned automatically and cannot be changed.".to_string(),
        "created" => "Created timestamp is set automatically and cannot be changed.".to_string(),
        "activity" => "Last activity is updated whenever the lead changes stage.".to_string(),
        _ => "This field is read-only.".to_string(),
    }
}

/// Error for `stage=` on an existing lead: stage changes go through `move`
pub fn stage_not_modifiable(lead_id: i64) -> FieldParseError {
    FieldParseError::ReadOnlyField {
        field: "stage".to_string(),
        hint: format!("Use 'leadboard move {} <stage>' so the change is confirmed and logged.", lead_id),
    }
}

/// Split `field=value`. Empty values become `none` (clear the field).
fn parse_field_token(token: &str) -> Result<Option<(String, String)>, FieldParseError> {
    let Some((field, value)) = token.split_once('=') else {
        return Ok(None);
    };
    let value = if value.is_empty() { "none" } else { value };

    if READ_ONLY_FIELDS.iter().any(|f| f.eq_ignore_ascii_case(field)) {
        return Err(FieldParseError::ReadOnlyField {
            field: field.to_string(),
            hint: read_only_hint(field),
        });
    }

    if FIELD_NAMES.contains(&field) {
        return Ok(Some((field.to_string(), value.to_string())));
    }

    match closest_match(&field.to_lowercase(), FIELD_NAMES, 3) {
        Some(suggestion) => Err(FieldParseError::InvalidFieldName {
            field: field.to_string(),
            suggestion,
        }),
        None => Ok(None),
    }
}

/// Looks like `word=...` rather than free text containing '='
fn looks_like_field(token: &str) -> bool {
    match token.split_once('=') {
        Some((field, _)) => {
            field.len() >= 2 && field.chars().all(|c| c.is_ascii_alphabetic() || c == '_' || c == '.')
        }
        None => false,
    }
}

/// Parse a tag token (+tag or -tag), returning the sign and name
fn parse_tag_token(token: &str) -> Result<Option<(char, String)>, FieldParseError> {
    let sign = match token.chars().next() {
        Some(c @ ('+' | '-')) => c,
        _ => return Ok(None),
    };
    let tag = &token[1..];

    if tag.is_empty() {
        return Err(FieldParseError::InvalidTag {
            message: "Tag name cannot be empty. Use '+tagname' to add a tag.".to_string(),
        });
    }
    match crate::cli::error::validate_tag(tag) {
        Ok(()) => Ok(Some((sign, tag.to_string()))),
        Err(message) => Err(FieldParseError::InvalidTag { message }),
    }
}

/// Parse lead add/modify arguments.
/// Tokens that are neither fields, tags nor flags form the lead name.
pub fn parse_lead_args(args: Vec<String>) -> Result<ParsedLeadArgs, FieldParseError> {
    let mut parsed = ParsedLeadArgs::default();

    for arg in args {
        if arg.starts_with("--") {
            continue;
        }

        if let Some((field, value)) = parse_field_token(&arg)? {
            let slot = match field.as_str() {
                "email" => &mut parsed.email,
                "phone" => &mut parsed.phone,
                "company" => &mut parsed.company,
                "assignee" => &mut parsed.assignee,
                "source" => &mut parsed.source,
                "value" => &mut parsed.value,
                "priority" => &mut parsed.priority,
                _ => &mut parsed.stage,
            };
            *slot = Some(value);
            continue;
        }

        if looks_like_field(&arg) {
            return Err(FieldParseError::UnknownFieldToken { token: arg });
        }

        match parse_tag_token(&arg)? {
            Some(('+', tag)) => parsed.tags_add.push(tag),
            Some((_, tag)) => parsed.tags_remove.push(tag),
            None => parsed.name.push(arg),
        }
    }

    Ok(parsed)
}

/// Join name parts into a single string
pub fn join_name(parts: &[String]) -> String {
    parts.join(" ")
}

/// `none` (from `field=` or `field=none`) clears an optional text field
pub fn optional_text(value: &str) -> Option<String> {
    if value.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_name_only() {
        let parsed = parse_lead_args(args(&["Acme", "Corp", "renewal"])).unwrap();
        assert_eq!(join_name(&parsed.name), "Acme Corp renewal");
        assert!(parsed.company.is_none());
    }

    #[test]
    fn test_parse_fields_and_tags_any_order() {
        let parsed = parse_lead_args(args(&[
            "company=Acme", "Jane", "Doe", "value=$12,500", "+vip", "-cold", "assignee=maria",
        ]))
        .unwrap();
        assert_eq!(parsed.name, vec!["Jane", "Doe"]);
        assert_eq!(parsed.company.as_deref(), Some("Acme"));
        assert_eq!(parsed.value.as_deref(), Some("$12,500"));
        assert_eq!(parsed.assignee.as_deref(), Some("maria"));
        assert_eq!(parsed.tags_add, vec!["vip"]);
        assert_eq!(parsed.tags_remove, vec!["cold"]);
    }

    #[test]
    fn test_empty_value_clears() {
        let parsed = parse_lead_args(args(&["phone="])).unwrap();
        assert_eq!(parsed.phone.as_deref(), Some("none"));
        assert_eq!(optional_text("none"), None);
        assert_eq!(optional_text("555-0100"), Some("555-0100".to_string()));
    }

    #[test]
    fn test_typo_suggests_field() {
        match parse_lead_args(args(&["asignee=maria"])) {
            Err(FieldParseError::InvalidFieldName { field, suggestion }) => {
                assert_eq!(field, "asignee");
                assert_eq!(suggestion, "assignee");
            }
            other => panic!("expected InvalidFieldName, got {:?}", other),
        }
    }

    #[test]
    fn test_read_only_and_unknown_fields() {
        assert!(matches!(
            parse_lead_args(args(&["id=4"])),
            Err(FieldParseError::ReadOnlyField { .. })
        ));
        assert!(matches!(
            parse_lead_args(args(&["budgetcode=77"])),
            Err(FieldParseError::UnknownFieldToken { .. })
        ));
        // Free text with '=' is still part of the name
        let parsed = parse_lead_args(args(&["2+2=4", "deal"])).unwrap();
        assert_eq!(parsed.name, vec!["2+2=4", "deal"]);
    }

    #[test]
    fn test_invalid_tag() {
        assert!(matches!(parse_lead_args(args(&["+"])), Err(FieldParseError::InvalidTag { .. })));
        assert!(matches!(parse_lead_args(args(&["+hot!"])), Err(FieldParseError::InvalidTag { .. })));
    }

    #[test]
    fn test_stage_field_parsed() {
        let parsed = parse_lead_args(args(&["Deal", "stage=qualified"])).unwrap();
        assert_eq!(parsed.stage.as_deref(), Some("qualified"));
        assert!(stage_not_modifiable(3).to_string().contains("leadboard move 3"));
    }
}
