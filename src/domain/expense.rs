use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, format_expense_date, parse_expense_date};

pub type ExpenseId = Uuid;

/// A single expense record owned by an email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseItem {
    pub id: ExpenseId,
    /// Owner of the record
    pub email: String,
    pub title: String,
    /// Absent only while a draft is being validated
    pub amount: Option<Cents>,
    /// Timestamp in `yyyy-MM-ddTHH:mm:ss.sssZ` form
    pub expense_date: String,
}

impl ExpenseItem {
    /// Build a fresh item with a random id, dated at `at`.
    pub fn new(
        email: impl Into<String>,
        title: impl Into<String>,
        amount: Option<Cents>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            title: title.into(),
            amount,
            expense_date: format_expense_date(at),
        }
    }

    pub fn with_expense_date(mut self, expense_date: impl Into<String>) -> Self {
        self.expense_date = expense_date.into();
        self
    }

    /// The parsed `expense_date`, or `None` if it is not in the fixed format.
    pub fn expense_instant(&self) -> Option<DateTime<Utc>> {
        parse_expense_date(&self.expense_date)
    }
}

/// Unvalidated create/update payload as it arrives from a caller.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExpenseInput {
    pub email: String,
    pub title: String,
    #[serde(default)]
    pub amount: Option<Cents>,
}

impl ExpenseInput {
    pub fn new(email: impl Into<String>, title: impl Into<String>, amount: Option<Cents>) -> Self {
        Self {
            email: email.into(),
            title: title.into(),
            amount,
        }
    }
}
