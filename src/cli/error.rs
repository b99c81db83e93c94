// Error helpers for consistent messages and exit codes

use std::process;

/// Exit with a user error (exit code 1)
pub fn user_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Exit with an internal error (exit code 2)
/// Internal errors are unexpected system failures: database trouble, I/O.
pub fn internal_error(message: &str) -> ! {
    eprintln!("Internal error: {}", message);
    process::exit(2);
}

/// Validate that a string is not empty
pub fn validate_non_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate that a lead ID is a positive integer
pub fn validate_lead_id(id_str: &str) -> Result<i64, String> {
    id_str.parse::<i64>()
        .map_err(|_| format!("Invalid lead ID: '{}'. Lead ID must be a number.", id_str))
        .and_then(|id| {
            if id > 0 {
                Ok(id)
            } else {
                Err(format!("Invalid lead ID: {}. Lead ID must be positive.", id))
            }
        })
}

/// Validate tag format
pub fn validate_tag(tag: &str) -> Result<(), String> {
    if tag.trim().is_empty() {
        return Err("Tag cannot be empty".to_string());
    }

    // Tag charset: [A-Za-z0-9_\-\.]+
    if tag.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.') {
        Ok(())
    } else {
        Err(format!("Invalid tag: '{}'. Tags can only contain letters, numbers, underscores, hyphens, and dots.", tag))
    }
}

/// Validate an email address loosely: one '@' with text on both sides
pub fn validate_email(email: &str) -> Result<(), String> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') && !domain.contains('@') => Ok(()),
        _ => Err(format!("Invalid email: '{}'", email)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_non_empty() {
        assert!(validate_non_empty("Acme", "Name").is_ok());
        assert!(validate_non_empty("", "Name").is_err());
        assert!(validate_non_empty("   ", "Name").is_err());
    }

    #[test]
    fn test_validate_lead_id() {
        assert_eq!(validate_lead_id("1"), Ok(1));
        assert_eq!(validate_lead_id("42"), Ok(42));
        assert!(validate_lead_id("0").is_err());
        assert!(validate_lead_id("-1").is_err());
        assert!(validate_lead_id("abc").is_err());
    }

    #[test]
    fn test_validate_tag() {
        assert!(validate_tag("vip").is_ok());
        assert!(validate_tag("q3-renewal").is_ok());
        assert!(validate_tag("").is_err());
        assert!(validate_tag("hot lead").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("jane@acme.com").is_ok());
        assert!(validate_email("jane").is_err());
        assert!(validate_email("@acme.com").is_err());
        assert!(validate_email("jane@acme").is_err());
    }
}
