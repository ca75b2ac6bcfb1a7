// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use expense_tracker::application::{ExpenseService, ItemConverter};
use expense_tracker::domain::{
    Cents, ExpenseId, ExpenseInput, ExpenseItem, ExpenseItemList, ExpenseListId,
};
use expense_tracker::storage::ExpenseStore;
use tempfile::TempDir;
use uuid::Uuid;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(ExpenseService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = ExpenseService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to build an item with a fixed date
pub fn item(email: &str, title: &str, amount: Option<Cents>, date: &str) -> ExpenseItem {
    ExpenseItem {
        id: Uuid::new_v4(),
        email: email.to_string(),
        title: title.to_string(),
        amount,
        expense_date: date.to_string(),
    }
}

/// Converter that hands out a prepared item, like a stubbed collaborator.
pub struct FixedConverter(pub ExpenseItem);

impl ItemConverter for FixedConverter {
    fn convert(&self, _input: &ExpenseInput) -> ExpenseItem {
        self.0.clone()
    }
}

/// In-memory store that records every call it receives.
#[derive(Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<ExpenseId, ExpenseItem>>,
    lists: Mutex<Vec<(ExpenseListId, String, String, Vec<ExpenseId>)>>,
    calls: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn with_item(self, item: ExpenseItem) -> Self {
        self.items.lock().unwrap().insert(item.id, item);
        self
    }

    pub fn with_list(self, list: ExpenseItemList) -> Self {
        let ids = list.items.iter().map(|i| i.id).collect();
        for item in list.items {
            self.items.lock().unwrap().entry(item.id).or_insert(item);
        }
        self.lists
            .lock()
            .unwrap()
            .push((list.id, list.email, list.title, ids));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn was_called(&self, name: &str) -> bool {
        self.calls().iter().any(|c| c == name)
    }

    pub fn item_count(&self) -> usize {
        self.items.lock().unwrap().len()
    }

    fn record(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
    }

    fn build_list(&self, entry: &(ExpenseListId, String, String, Vec<ExpenseId>)) -> ExpenseItemList {
        let items = self.items.lock().unwrap();
        let (id, email, title, ids) = entry;
        ExpenseItemList::new(*id, email.clone(), title.clone())
            .with_items(ids.iter().filter_map(|i| items.get(i).cloned()).collect())
    }
}

impl ExpenseStore for MemoryStore {
    async fn get_expense_by_id(&self, id: ExpenseId) -> Result<Option<ExpenseItem>> {
        self.record("get_expense_by_id");
        Ok(self.items.lock().unwrap().get(&id).cloned())
    }

    async fn get_expenses_by_email(&self, email: &str) -> Result<Vec<ExpenseItem>> {
        self.record("get_expenses_by_email");
        Ok(self
            .items
            .lock()
            .unwrap()
            .values()
            .filter(|i| i.email == email)
            .cloned()
            .collect())
    }

    async fn create_expense(&self, item: &ExpenseItem) -> Result<()> {
        self.record("create_expense");
        self.items.lock().unwrap().insert(item.id, item.clone());
        Ok(())
    }

    async fn update_expense(&self, id: ExpenseId, title: &str, amount: Option<Cents>) -> Result<()> {
        self.record("update_expense");
        if let Some(item) = self.items.lock().unwrap().get_mut(&id) {
            item.title = title.to_string();
            if amount.is_some() {
                item.amount = amount;
            }
        }
        Ok(())
    }

    async fn delete_expense(&self, id: ExpenseId) -> Result<()> {
        self.record("delete_expense");
        self.items.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn create_expense_list(&self, id: ExpenseListId, email: &str, title: &str) -> Result<()> {
        self.record("create_expense_list");
        self.lists
            .lock()
            .unwrap()
            .push((id, email.to_string(), title.to_string(), Vec::new()));
        Ok(())
    }

    async fn get_expense_list_by_id(&self, id: ExpenseListId) -> Result<Option<ExpenseItemList>> {
        self.record("get_expense_list_by_id");
        let entry = self
            .lists
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.0 == id)
            .cloned();
        Ok(entry.map(|e| self.build_list(&e)))
    }

    async fn get_expense_lists_by_email(&self, email: &str) -> Result<Vec<ExpenseItemList>> {
        self.record("get_expense_lists_by_email");
        let entries: Vec<_> = self
            .lists
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.1 == email)
            .cloned()
            .collect();
        Ok(entries.iter().map(|e| self.build_list(e)).collect())
    }

    async fn add_expense_item_to_list(&self, list_id: ExpenseListId, item: &ExpenseItem) -> Result<()> {
        self.record("add_expense_item_to_list");
        if let Some(entry) = self.lists.lock().unwrap().iter_mut().find(|l| l.0 == list_id) {
            entry.3.push(item.id);
        }
        Ok(())
    }

    async fn remove_expense_item_from_list(
        &self,
        list_id: ExpenseListId,
        item: &ExpenseItem,
    ) -> Result<()> {
        self.record("remove_expense_item_from_list");
        if let Some(entry) = self.lists.lock().unwrap().iter_mut().find(|l| l.0 == list_id) {
            entry.3.retain(|id| *id != item.id);
        }
        Ok(())
    }
}

/// Store whose every call fails, standing in for an unavailable backend.
pub struct UnavailableStore;

impl ExpenseStore for UnavailableStore {
    async fn get_expense_by_id(&self, _id: ExpenseId) -> Result<Option<ExpenseItem>> {
        Err(anyhow!("store unavailable"))
    }

    async fn get_expenses_by_email(&self, _email: &str) -> Result<Vec<ExpenseItem>> {
        Err(anyhow!("store unavailable"))
    }

    async fn create_expense(&self, _item: &ExpenseItem) -> Result<()> {
        Err(anyhow!("store unavailable"))
    }

    async fn update_expense(&self, _id: ExpenseId, _title: &str, _amount: Option<Cents>) -> Result<()> {
        Err(anyhow!("store unavailable"))
    }

    async fn delete_expense(&self, _id: ExpenseId) -> Result<()> {
        Err(anyhow!("store unavailable"))
    }

    async fn create_expense_list(&self, _id: ExpenseListId, _email: &str, _title: &str) -> Result<()> {
        Err(anyhow!("store unavailable"))
    }

    async fn get_expense_list_by_id(&self, _id: ExpenseListId) -> Result<Option<ExpenseItemList>> {
        Err(anyhow!("store unavailable"))
    }

    async fn get_expense_lists_by_email(&self, _email: &str) -> Result<Vec<ExpenseItemList>> {
        Err(anyhow!("store unavailable"))
    }

    async fn add_expense_item_to_list(&self, _list_id: ExpenseListId, _item: &ExpenseItem) -> Result<()> {
        Err(anyhow!("store unavailable"))
    }

    async fn remove_expense_item_from_list(
        &self,
        _list_id: ExpenseListId,
        _item: &ExpenseItem,
    ) -> Result<()> {
        Err(anyhow!("store unavailable"))
    }
}

/// Service over an in-memory store with a converter that returns `item`.
pub fn memory_service(
    store: MemoryStore,
    item: ExpenseItem,
) -> ExpenseService<MemoryStore, FixedConverter> {
    ExpenseService::new(store, FixedConverter(item))
}
