use crate::domain::models::member::Member;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Sort keys the admin table offers. Sorting and filtering happen over an
/// already-fetched page, never in the datastore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    CustomerNumber,
    Name,
    Address,
    Modified,
    Validity,
}

impl SortKey {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "customer_number" => Some(Self::CustomerNumber),
            "name" => Some(Self::Name),
            "address" => Some(Self::Address),
            "modified" => Some(Self::Modified),
            "validity" => Some(Self::Validity),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TableQuery {
    pub search: Option<String>,
    pub sort: SortKey,
    pub descending: bool,
}

/// Filters a page by substring search and sorts it by the requested key.
/// Pure function over the fetched page, so it stays testable without any
/// datastore or rendering.
pub fn filter_and_sort(members: Vec<Member>, query: &TableQuery, now: DateTime<Utc>) -> Vec<Member> {
    let mut rows: Vec<Member> = match query.search.as_deref().map(str::trim) {
        Some(needle) if !needle.is_empty() => {
            let needle = needle.to_lowercase();
            members.into_iter().filter(|m| matches_search(m, &needle)).collect()
        }
        _ => members,
    };

    rows.sort_by(|a, b| {
        let ord = match query.sort {
            SortKey::CustomerNumber => compare_customer_numbers(&a.customer_number, &b.customer_number),
            SortKey::Name => (&a.last_name, &a.first_name).cmp(&(&b.last_name, &b.first_name)),
            SortKey::Address => {
                (&a.street, &a.postal_code, &a.city).cmp(&(&b.street, &b.postal_code, &b.city))
            }
            SortKey::Modified => a.modified.cmp(&b.modified),
            SortKey::Validity => (a.expiry_date - now).cmp(&(b.expiry_date - now)),
        };
        if query.descending { ord.reverse() } else { ord }
    });

    rows
}

fn matches_search(member: &Member, needle: &str) -> bool {
    [
        member.customer_number.as_str(),
        member.first_name.as_str(),
        member.last_name.as_str(),
        member.street.as_str(),
        member.postal_code.as_str(),
        member.city.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

/// Numeric-aware comparison: "9" sorts before "10" when both sides parse as
/// numbers, otherwise plain string order.
fn compare_customer_numbers(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}
