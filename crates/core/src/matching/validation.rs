//! Input validation for matching-related writes.
//!
//! Validators return `Result<(), String>`; handlers wrap the message in
//! `CoreError::Validation`.

use std::collections::HashSet;

use crate::matching::MAX_PREFERENCES;
use crate::types::DbId;

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_REASON_LEN: usize = 500;
pub const MAX_MENTEES_LIMIT: i32 = 50;
pub const MAX_RESPONSE_WINDOW_DAYS: i32 = 60;
pub const MAX_TAGS: usize = 30;

/// Validate a mentee's ranked mentor choices.
pub fn validate_preferences(preferred: &[DbId], mentee_user_id: DbId) -> Result<(), String> {
    if preferred.len() > MAX_PREFERENCES {
        return Err(format!(
            "At most {MAX_PREFERENCES} preferred mentors may be listed, got {}",
            preferred.len()
        ));
    }
    let mut seen = HashSet::new();
    for id in preferred {
        if *id == mentee_user_id {
            return Err("A mentee cannot list themselves as a preferred mentor".to_string());
        }
        if !seen.insert(*id) {
            return Err(format!("Preferred mentor {id} is listed more than once"));
        }
    }
    Ok(())
}

pub fn validate_name(field: &str, value: &str) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} is required"));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(format!("{field} must be at most {MAX_NAME_LEN} characters"));
    }
    Ok(())
}

/// Minimal shape check; the auth service owns real address verification.
pub fn validate_email(email: &str) -> Result<(), String> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(format!("Invalid email address '{email}'")),
    }
}

pub fn validate_reason(reason: Option<&str>) -> Result<(), String> {
    match reason {
        Some(r) if r.chars().count() > MAX_REASON_LEN => Err(format!(
            "Reason must be at most {MAX_REASON_LEN} characters"
        )),
        _ => Ok(()),
    }
}

pub fn validate_max_mentees(max_mentees: i32) -> Result<(), String> {
    if (1..=MAX_MENTEES_LIMIT).contains(&max_mentees) {
        Ok(())
    } else {
        Err(format!(
            "max_mentees must be between 1 and {MAX_MENTEES_LIMIT}, got {max_mentees}"
        ))
    }
}

pub fn validate_response_window(days: i32) -> Result<(), String> {
    if (1..=MAX_RESPONSE_WINDOW_DAYS).contains(&days) {
        Ok(())
    } else {
        Err(format!(
            "response_window_days must be between 1 and {MAX_RESPONSE_WINDOW_DAYS}, got {days}"
        ))
    }
}

pub fn validate_class_year(year: i32) -> Result<(), String> {
    if (1900..=2100).contains(&year) {
        Ok(())
    } else {
        Err(format!("class_year {year} is out of range"))
    }
}

/// Skills and areas of interest: bounded count, no blank entries.
pub fn validate_tags(field: &str, tags: &[String]) -> Result<(), String> {
    if tags.len() > MAX_TAGS {
        return Err(format!("{field} may contain at most {MAX_TAGS} entries"));
    }
    if tags.iter().any(|t| t.trim().is_empty()) {
        return Err(format!("{field} must not contain blank entries"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preferences_within_limit_pass() {
        assert!(validate_preferences(&[], 1).is_ok());
        assert!(validate_preferences(&[2, 3, 4], 1).is_ok());
    }

    #[test]
    fn too_many_preferences_fail() {
        let err = validate_preferences(&[2, 3, 4, 5], 1).unwrap_err();
        assert!(err.contains("At most 3"));
    }

    #[test]
    fn duplicate_preferences_fail() {
        let err = validate_preferences(&[2, 2], 1).unwrap_err();
        assert!(err.contains("more than once"));
    }

    #[test]
    fn self_preference_fails() {
        assert!(validate_preferences(&[1], 1).is_err());
    }

    #[test]
    fn names_must_be_present_and_bounded() {
        assert!(validate_name("name", "Ada").is_ok());
        assert!(validate_name("name", "  ").is_err());
        assert!(validate_name("name", &"x".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn email_shape() {
        assert!(validate_email("ada@example.edu").is_ok());
        assert!(validate_email("ada@localhost").is_err());
        assert!(validate_email("@example.edu").is_err());
        assert!(validate_email("ada").is_err());
    }

    #[test]
    fn reason_length_is_bounded() {
        assert!(validate_reason(None).is_ok());
        assert!(validate_reason(Some("busy")).is_ok());
        assert!(validate_reason(Some(&"r".repeat(MAX_REASON_LEN + 1))).is_err());
    }

    #[test]
    fn numeric_ranges() {
        assert!(validate_max_mentees(1).is_ok());
        assert!(validate_max_mentees(0).is_err());
        assert!(validate_max_mentees(MAX_MENTEES_LIMIT + 1).is_err());
        assert!(validate_response_window(7).is_ok());
        assert!(validate_response_window(0).is_err());
        assert!(validate_class_year(2019).is_ok());
        assert!(validate_class_year(1850).is_err());
    }

    #[test]
    fn tags_reject_blank_entries() {
        assert!(validate_tags("skills", &["rust".to_string()]).is_ok());
        assert!(validate_tags("skills", &[" ".to_string()]).is_err());
        let many: Vec<String> = (0..=MAX_TAGS).map(|i| format!("t{i}")).collect();
        assert!(validate_tags("skills", &many).is_err());
    }
}
