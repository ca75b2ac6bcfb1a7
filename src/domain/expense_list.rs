use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ExpenseId, ExpenseItem, newest_first};

pub type ExpenseListId = Uuid;

/// A named grouping of one owner's expense items.
///
/// The list references items by id; it never owns their lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseItemList {
    pub id: ExpenseListId,
    pub email: String,
    pub title: String,
    #[serde(default)]
    pub items: Vec<ExpenseItem>,
}

impl ExpenseItemList {
    pub fn new(id: ExpenseListId, email: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            title: title.into(),
            items: Vec::new(),
        }
    }

    pub fn with_items(mut self, items: Vec<ExpenseItem>) -> Self {
        self.items = items;
        self
    }

    /// Membership is keyed by item id.
    pub fn contains(&self, item_id: ExpenseId) -> bool {
        self.items.iter().any(|item| item.id == item_id)
    }

    pub fn is_owned_by(&self, email: &str) -> bool {
        self.email == email
    }

    /// A copy of this list with its items ordered most recent first.
    pub fn sorted_newest_first(&self) -> Self {
        Self {
            id: self.id,
            email: self.email.clone(),
            title: self.title.clone(),
            items: newest_first(&self.items),
        }
    }
}
