use std::cmp::Ordering;

use chrono::{DateTime, NaiveDateTime, Utc};

use super::ExpenseItem;

/// Fixed `expense_date` format: UTC with millisecond precision.
pub const EXPENSE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.%3fZ";

pub fn format_expense_date(at: DateTime<Utc>) -> String {
    at.format(EXPENSE_DATE_FORMAT).to_string()
}

pub fn parse_expense_date(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, EXPENSE_DATE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Order two items by `expense_date`, earliest first.
///
/// Dates that do not parse compare equal to each other and sort before every
/// parsable date, so they land at the end of a newest-first listing.
pub fn compare_by_expense_date(a: &ExpenseItem, b: &ExpenseItem) -> Ordering {
    match (instant_or_warn(a), instant_or_warn(b)) {
        (Some(left), Some(right)) => left.cmp(&right),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Return a copy of `items` sorted most recent first.
///
/// The sort is stable: items with equal dates keep their stored order.
pub fn newest_first(items: &[ExpenseItem]) -> Vec<ExpenseItem> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| compare_by_expense_date(b, a));
    sorted
}

fn instant_or_warn(item: &ExpenseItem) -> Option<DateTime<Utc>> {
    let instant = item.expense_instant();
    if instant.is_none() {
        tracing::warn!(
            expense_id = %item.id,
            expense_date = %item.expense_date,
            "Unparsable expense date, ordering as oldest"
        );
    }
    instant
}
