//! The single, non-repeatable personal-information section and its per-field
//! validation rules.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::form::duration::parse_date;
use crate::form::error::FormError;

pub const MIN_AGE_YEARS: i64 = 18;
pub const MAX_AGE_YEARS: i64 = 100;
const DAYS_PER_YEAR: f64 = 365.25;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub location: String,
    pub linkedin: String,
    pub social: String,
    pub objective: String,
    pub signature: String,
    /// Whether the preview shows a photo slot.
    pub show_photo: bool,
}

/// `(field, label)` pairs in form order.
pub const PERSONAL_FIELDS: &[(&str, &str)] = &[
    ("full_name", "Full Name"),
    ("email", "Email"),
    ("phone", "Phone Number"),
    ("date_of_birth", "Date of Birth"),
    ("location", "Location"),
    ("linkedin", "LinkedIn"),
    ("social", "GitHub/Portfolio"),
    ("objective", "Career Objective"),
    ("signature", "Signature"),
];

impl PersonalInfo {
    pub fn get(&self, field: &str) -> Option<&str> {
        let value = match field {
            "full_name" => &self.full_name,
            "email" => &self.email,
            "phone" => &self.phone,
            "date_of_birth" => &self.date_of_birth,
            "location" => &self.location,
            "linkedin" => &self.linkedin,
            "social" => &self.social,
            "objective" => &self.objective,
            "signature" => &self.signature,
            _ => return None,
        };
        Some(value.as_str())
    }

    pub fn set(&mut self, field: &str, value: String) -> Result<(), FormError> {
        let slot = match field {
            "full_name" => &mut self.full_name,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "date_of_birth" => &mut self.date_of_birth,
            "location" => &mut self.location,
            "linkedin" => &mut self.linkedin,
            "social" => &mut self.social,
            "objective" => &mut self.objective,
            "signature" => &mut self.signature,
            _ => {
                return Err(FormError::InvalidOperation(format!(
                    "Unknown personal field '{field}'"
                )))
            }
        };
        *slot = value;
        Ok(())
    }
}

pub fn label(field: &str) -> &str {
    PERSONAL_FIELDS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, label)| *label)
        .unwrap_or(field)
}

// ────────────────────────────────────────────────────────────────────────────
// Format checks
// ────────────────────────────────────────────────────────────────────────────

/// `local@domain.tld` with no whitespace and a single `@`.
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

pub fn phone_digit_count(value: &str) -> usize {
    value.chars().filter(|c| c.is_ascii_digit()).count()
}

pub fn is_valid_phone(value: &str) -> bool {
    phone_digit_count(value) == 10
}

/// Whole years between `dob` and `today`, on a 365.25-day year.
pub fn age_in_years(dob: NaiveDate, today: NaiveDate) -> i64 {
    ((today - dob).num_days() as f64 / DAYS_PER_YEAR).floor() as i64
}

/// Unparseable dates are out of range.
pub fn is_valid_age(date_of_birth: &str, today: NaiveDate) -> bool {
    parse_date(date_of_birth)
        .map(|dob| age_in_years(dob, today))
        .is_some_and(|age| (MIN_AGE_YEARS..=MAX_AGE_YEARS).contains(&age))
}

pub fn has_http_scheme(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Inline warning shown when a personal field loses focus. Blank values never warn;
/// required-ness is checked by the preview gate.
pub fn validate_field(field: &str, value: &str, today: NaiveDate) -> Option<&'static str> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match field {
        "email" if !is_valid_email(value) => Some("Invalid email format"),
        "phone" if !is_valid_phone(value) => Some("Must be 10 digits"),
        "date_of_birth" if !is_valid_age(value, today) => Some("Age must be 18-100"),
        "linkedin" if !has_http_scheme(value) => Some("URL must start with http:// or https://"),
        "linkedin" if !value.contains("linkedin.com") => Some("Must be a LinkedIn URL"),
        "social" if !has_http_scheme(value) => Some("URL must start with http:// or https://"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn test_set_and_get_round_trip() {
        let mut info = PersonalInfo::default();
        info.set("location", "Pune".to_string()).unwrap();
        assert_eq!(info.get("location"), Some("Pune"));
    }

    #[test]
    fn test_set_unknown_field_rejected() {
        let mut info = PersonalInfo::default();
        let err = info.set("photo", "data:".to_string()).unwrap_err();
        assert!(matches!(err, FormError::InvalidOperation(_)));
        assert_eq!(info, PersonalInfo::default());
    }

    #[test]
    fn test_every_listed_field_is_settable() {
        let mut info = PersonalInfo::default();
        for (field, _) in PERSONAL_FIELDS {
            info.set(field, "x".to_string()).unwrap();
            assert_eq!(info.get(field), Some("x"));
        }
    }

    #[test]
    fn test_email_accepts_plain_address() {
        assert!(is_valid_email("jane.doe@example.co.in"));
    }

    #[test]
    fn test_email_rejects_malformed() {
        assert!(!is_valid_email("jane@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("jane@@example.com"));
        assert!(!is_valid_email("jane doe@example.com"));
        assert!(!is_valid_email("jane@.com"));
        assert!(!is_valid_email("jane@example."));
    }

    #[test]
    fn test_phone_counts_digits_only() {
        assert!(is_valid_phone("(987) 654-3210"));
        assert!(!is_valid_phone("98765"));
        assert!(!is_valid_phone("+91 98765 43210"));
    }

    #[test]
    fn test_age_bounds() {
        assert!(is_valid_age("2000-01-01", today()));
        assert!(!is_valid_age("2010-01-01", today()), "15 years old");
        assert!(!is_valid_age("1900-01-01", today()), "125 years old");
        assert!(!is_valid_age("not a date", today()));
    }

    #[test]
    fn test_age_floor_at_birthday_eve() {
        let dob = NaiveDate::from_ymd_opt(2007, 6, 2).unwrap();
        assert_eq!(age_in_years(dob, today()), 17);
    }

    #[test]
    fn test_validate_field_messages() {
        assert_eq!(validate_field("email", "nope", today()), Some("Invalid email format"));
        assert_eq!(validate_field("phone", "123", today()), Some("Must be 10 digits"));
        assert_eq!(
            validate_field("linkedin", "linkedin.com/in/jane", today()),
            Some("URL must start with http:// or https://")
        );
        assert_eq!(
            validate_field("linkedin", "https://example.com/jane", today()),
            Some("Must be a LinkedIn URL")
        );
        assert_eq!(
            validate_field("social", "github.com/jane", today()),
            Some("URL must start with http:// or https://")
        );
        assert_eq!(validate_field("social", "https://github.com/jane", today()), None);
    }

    #[test]
    fn test_validate_field_blank_never_warns() {
        for (field, _) in PERSONAL_FIELDS {
            assert_eq!(validate_field(field, "  ", today()), None);
        }
    }
}
