use std::future::Future;

use anyhow::Result;

use crate::domain::{Cents, ExpenseId, ExpenseItem, ExpenseItemList, ExpenseListId};

/// Persistence collaborator used by the expense service.
///
/// Implementations only store and fetch. Every consistency rule (ownership,
/// membership, id validity) is enforced by the caller before a write reaches
/// the store. Errors are infrastructure failures and are passed through
/// untouched.
pub trait ExpenseStore {
    fn get_expense_by_id(
        &self,
        id: ExpenseId,
    ) -> impl Future<Output = Result<Option<ExpenseItem>>> + Send;

    fn get_expenses_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Vec<ExpenseItem>>> + Send;

    fn create_expense(&self, item: &ExpenseItem) -> impl Future<Output = Result<()>> + Send;

    /// Overwrite title and amount. `None` keeps the stored amount.
    fn update_expense(
        &self,
        id: ExpenseId,
        title: &str,
        amount: Option<Cents>,
    ) -> impl Future<Output = Result<()>> + Send;

    fn delete_expense(&self, id: ExpenseId) -> impl Future<Output = Result<()>> + Send;

    fn create_expense_list(
        &self,
        id: ExpenseListId,
        email: &str,
        title: &str,
    ) -> impl Future<Output = Result<()>> + Send;

    fn get_expense_list_by_id(
        &self,
        id: ExpenseListId,
    ) -> impl Future<Output = Result<Option<ExpenseItemList>>> + Send;

    fn get_expense_lists_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Vec<ExpenseItemList>>> + Send;

    /// Append `item` to the end of the list.
    fn add_expense_item_to_list(
        &self,
        list_id: ExpenseListId,
        item: &ExpenseItem,
    ) -> impl Future<Output = Result<()>> + Send;

    fn remove_expense_item_from_list(
        &self,
        list_id: ExpenseListId,
        item: &ExpenseItem,
    ) -> impl Future<Output = Result<()>> + Send;
}
