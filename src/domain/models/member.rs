use crate::domain::services::{expiry, token};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row per cooperative member. `customer_number` is the stable business
/// key across import cycles; `token` may be regenerated without affecting it.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Member {
    pub customer_number: String,
    pub salutation: String,
    pub first_name: String,
    pub last_name: String,
    pub name2: String,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub communication_preference: Option<String>,
    pub notes: String,
    pub token: String,
    pub expiry_date: DateTime<Utc>,
    pub modified: bool,
    pub modified_at: Option<DateTime<Utc>>,
    pub original_street: Option<String>,
    pub original_postal_code: Option<String>,
    pub original_city: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A normalized import row after column mapping has been applied.
/// Unmapped columns end up as empty strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberImport {
    pub customer_number: String,
    pub salutation: String,
    pub first_name: String,
    pub last_name: String,
    pub name2: String,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    pub email: String,
    pub phone: String,
    pub mobile: String,
    pub communication_preference: String,
}

/// Editable fields a member may change through their edit link.
#[derive(Debug, Clone)]
pub struct AddressUpdate {
    pub street: String,
    pub postal_code: String,
    pub city: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub communication_preference: Option<String>,
    pub notes: String,
}

impl Member {
    /// Builds a brand-new member from an import row: fresh token, default
    /// expiry window, never modified.
    pub fn from_import(import: MemberImport, now: DateTime<Utc>) -> Self {
        Self {
            customer_number: import.customer_number,
            salutation: import.salutation,
            first_name: import.first_name,
            last_name: import.last_name,
            name2: import.name2,
            street: import.street,
            postal_code: import.postal_code,
            city: import.city,
            email: none_if_blank(import.email),
            phone: none_if_blank(import.phone),
            mobile: none_if_blank(import.mobile),
            communication_preference: none_if_blank(import.communication_preference),
            notes: String::new(),
            token: token::generate(),
            expiry_date: expiry::default_expiry(now),
            modified: false,
            modified_at: None,
            original_street: None,
            original_postal_code: None,
            original_city: None,
            created_at: now,
        }
    }

    pub fn edit_link(&self, base_url: &str) -> String {
        format!("{}/mitglied?token={}", base_url.trim_end_matches('/'), self.token)
    }
}

pub fn none_if_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::token::is_valid_format;

    #[test]
    fn test_from_import_generates_valid_token_and_default_expiry() {
        let now = Utc::now();
        let import = MemberImport {
            customer_number: "1001".into(),
            first_name: "Max".into(),
            last_name: "Mustermann".into(),
            street: "Hauptstraße 1".into(),
            postal_code: "80331".into(),
            city: "München".into(),
            ..Default::default()
        };

        let member = Member::from_import(import, now);
        assert!(is_valid_format(&member.token));
        assert_eq!(member.expiry_date, now + chrono::Duration::weeks(4));
        assert!(!member.modified);
        assert!(member.modified_at.is_none());
        assert!(member.email.is_none());
    }

    #[test]
    fn test_blank_contact_fields_become_none() {
        let import = MemberImport {
            customer_number: "1".into(),
            email: "  ".into(),
            phone: "089 123".into(),
            ..Default::default()
        };
        let member = Member::from_import(import, Utc::now());
        assert!(member.email.is_none());
        assert_eq!(member.phone.as_deref(), Some("089 123"));
    }

    #[test]
    fn test_edit_link_strips_trailing_slash() {
        let mut member = Member::from_import(MemberImport::default(), Utc::now());
        member.token = "abcdefghij0123456789abcd".into();
        assert_eq!(
            member.edit_link("https://portal.example.org/"),
            "https://portal.example.org/mitglied?token=abcdefghij0123456789abcd"
        );
    }
}
