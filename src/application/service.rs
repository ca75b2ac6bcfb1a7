use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{ExpenseId, ExpenseInput, ExpenseItem, ExpenseItemList, ExpenseListId};
use crate::storage::{ExpenseStore, Repository};

use super::{AppError, ItemConverter, SystemItemConverter};

/// Application service for expense items and expense lists.
///
/// Every argument is validated here and every cross-entity rule (ownership,
/// membership) is checked here before the store is asked to write anything.
/// This is the primary interface for any client (CLI, API, etc.).
pub struct ExpenseService<S = Repository, C = SystemItemConverter> {
    store: S,
    converter: C,
}

impl ExpenseService {
    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo, SystemItemConverter))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo, SystemItemConverter))
    }
}

impl<S: ExpenseStore, C: ItemConverter> ExpenseService<S, C> {
    pub fn new(store: S, converter: C) -> Self {
        Self { store, converter }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // ========================
    // Expense operations
    // ========================

    /// Look up an expense. A well-formed id that matches nothing yields `None`.
    pub async fn get_expense_by_id(&self, id: &str) -> Result<Option<ExpenseItem>, AppError> {
        let id = parse_expense_id(id)?;
        Ok(self.store.get_expense_by_id(id).await?)
    }

    /// All expenses owned by `email`, in store order.
    pub async fn get_expenses_by_email(&self, email: &str) -> Result<Vec<ExpenseItem>, AppError> {
        require_email(email)?;
        Ok(self.store.get_expenses_by_email(email).await?)
    }

    /// Create an expense and return its new id.
    ///
    /// The amount is checked before anything is written, so a rejected
    /// payload never reaches the store.
    pub async fn create_expense(&self, input: &ExpenseInput) -> Result<ExpenseId, AppError> {
        let item = self.converter.convert(input);
        if item.amount.is_none() {
            return Err(rejected(AppError::invalid_data("Amount is invalid")));
        }

        self.store.create_expense(&item).await?;
        info!(expense_id = %item.id, email = %item.email, "Created expense");
        Ok(item.id)
    }

    /// Overwrite the title and amount of an existing expense.
    ///
    /// `email`, `id` and `expense_date` are never touched. An update without
    /// an amount keeps the stored one.
    pub async fn update_expense(&self, id: &str, update: &ExpenseInput) -> Result<(), AppError> {
        let id = parse_expense_id(id)?;

        if self.store.get_expense_by_id(id).await?.is_none() {
            return Err(rejected(AppError::not_found("Expense does not exist")));
        }

        self.store
            .update_expense(id, &update.title, update.amount)
            .await?;
        info!(expense_id = %id, "Updated expense");
        Ok(())
    }

    /// Delete an expense. Deleting an id that matches nothing is not an error.
    pub async fn delete_expense(&self, id: &str) -> Result<(), AppError> {
        let id = parse_expense_id(id)?;
        self.store.delete_expense(id).await?;
        info!(expense_id = %id, "Deleted expense");
        Ok(())
    }

    // ========================
    // Expense list operations
    // ========================

    /// Create an empty list for `email` and return its new id.
    pub async fn create_expense_list(
        &self,
        email: &str,
        title: &str,
    ) -> Result<ExpenseListId, AppError> {
        let id = Uuid::new_v4();
        self.store.create_expense_list(id, email, title).await?;
        info!(list_id = %id, email, "Created expense list");
        Ok(id)
    }

    /// Attach an expense to a list owned by the same email.
    pub async fn add_expense_item_to_list(
        &self,
        list_id: &str,
        item_id: &str,
    ) -> Result<(), AppError> {
        let (list, item) = self.resolve_membership(list_id, item_id).await?;

        if list.contains(item.id) {
            return Err(rejected(AppError::not_found(
                "Expense is already in the list",
            )));
        }

        self.store.add_expense_item_to_list(list.id, &item).await?;
        info!(list_id = %list.id, expense_id = %item.id, "Added expense to list");
        Ok(())
    }

    /// Detach an expense from a list. The expense itself is kept.
    pub async fn remove_expense_item_from_list(
        &self,
        list_id: &str,
        item_id: &str,
    ) -> Result<(), AppError> {
        let (list, item) = self.resolve_membership(list_id, item_id).await?;

        if !list.contains(item.id) {
            return Err(rejected(AppError::not_found("Expense is not in the list")));
        }

        self.store
            .remove_expense_item_from_list(list.id, &item)
            .await?;
        info!(list_id = %list.id, expense_id = %item.id, "Removed expense from list");
        Ok(())
    }

    /// All lists owned by `email`, each with its items ordered newest first.
    pub async fn get_expense_lists_by_email(
        &self,
        email: &str,
    ) -> Result<Vec<ExpenseItemList>, AppError> {
        require_email(email)?;

        let lists = self.store.get_expense_lists_by_email(email).await?;
        debug!(email, count = lists.len(), "Fetched expense lists");

        Ok(lists
            .iter()
            .map(ExpenseItemList::sorted_newest_first)
            .collect())
    }

    /// Fetch both sides of a membership change and check they belong together.
    async fn resolve_membership(
        &self,
        list_id: &str,
        item_id: &str,
    ) -> Result<(ExpenseItemList, ExpenseItem), AppError> {
        if item_id.is_empty() {
            return Err(rejected(AppError::not_found("Expense id is missing")));
        }
        if list_id.is_empty() {
            return Err(rejected(AppError::not_found("Expense list id is missing")));
        }

        // A string that is not a UUID cannot address a stored record.
        let item = match Uuid::parse_str(item_id) {
            Ok(id) => self.store.get_expense_by_id(id).await?,
            Err(_) => None,
        };
        let list = match Uuid::parse_str(list_id) {
            Ok(id) => self.store.get_expense_list_by_id(id).await?,
            Err(_) => None,
        };

        let Some(item) = item else {
            return Err(rejected(AppError::not_found(format!(
                "Expense {item_id} does not exist"
            ))));
        };
        let Some(list) = list else {
            return Err(rejected(AppError::not_found(format!(
                "Expense list {list_id} does not exist"
            ))));
        };

        if !list.is_owned_by(&item.email) {
            return Err(rejected(AppError::not_found(
                "Expense email does not match expense list email",
            )));
        }

        Ok((list, item))
    }
}

fn parse_expense_id(id: &str) -> Result<ExpenseId, AppError> {
    if id.is_empty() {
        return Err(rejected(AppError::invalid_data("Expense id is not present")));
    }
    Uuid::parse_str(id).map_err(|_| {
        rejected(AppError::invalid_data(format!(
            "Expense id is not a valid UUID: {id}"
        )))
    })
}

fn require_email(email: &str) -> Result<(), AppError> {
    if email.is_empty() {
        return Err(rejected(AppError::invalid_data("Email is not present")));
    }
    Ok(())
}

fn rejected(err: AppError) -> AppError {
    warn!(error = %err, "Rejected request");
    err
}
