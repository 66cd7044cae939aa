use chrono::{DateTime, Duration, Utc};

/// Fresh imports and re-imports get this validity window.
pub const DEFAULT_EXPIRY_WEEKS: i64 = 4;

/// Renewal durations offered to the admin.
pub const RENEWAL_PRESET_WEEKS: &[i64] = &[1, 2, 4, 8, 12, 26, 52];

pub fn default_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::weeks(DEFAULT_EXPIRY_WEEKS)
}

pub fn expiry_after_weeks(now: DateTime<Utc>, weeks: i64) -> DateTime<Utc> {
    now + Duration::weeks(weeks)
}

pub fn is_renewal_preset(weeks: i64) -> bool {
    RENEWAL_PRESET_WEEKS.contains(&weeks)
}

/// Buckets the remaining validity of a live token into a human-friendly
/// phrase. Days are rounded up, matching what the member sees in the portal.
pub fn format_remaining_validity(expiry: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (expiry - now).num_seconds();
    let days = (seconds + 86_399) / 86_400;

    if days <= 1 {
        "today".to_string()
    } else if days <= 7 {
        format!("in {} days", days)
    } else if days <= 14 {
        "in about 2 weeks".to_string()
    } else {
        format!("in {} weeks", (days + 6) / 7)
    }
}
