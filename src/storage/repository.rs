use anyhow::{Context, Result};
use sqlx::{Row, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{Cents, ExpenseId, ExpenseItem, ExpenseItemList, ExpenseListId};

use super::{ExpenseStore, MIGRATION_001_INITIAL};

/// SQLite-backed store for expense items and expense lists.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Items currently referenced by a list, in insertion order.
    ///
    /// Memberships pointing at deleted items are skipped.
    async fn list_items(&self, list_id: ExpenseListId) -> Result<Vec<ExpenseItem>> {
        let rows = sqlx::query(
            r#"
            SELECT i.id, i.email, i.title, i.amount_cents, i.expense_date
            FROM expense_list_items li
            JOIN expense_items i ON i.id = li.item_id
            WHERE li.list_id = ?
            ORDER BY li.position
            "#,
        )
        .bind(list_id.to_string())
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch expense list items")?;

        rows.iter().map(Self::row_to_item).collect()
    }

    async fn with_items(&self, rows: Vec<sqlx::sqlite::SqliteRow>) -> Result<Vec<ExpenseItemList>> {
        let mut lists = Vec::with_capacity(rows.len());
        for row in rows {
            let list = Self::row_to_list(&row)?;
            let items = self.list_items(list.id).await?;
            lists.push(list.with_items(items));
        }
        Ok(lists)
    }

    fn row_to_item(row: &sqlx::sqlite::SqliteRow) -> Result<ExpenseItem> {
        let id_str: String = row.get("id");

        Ok(ExpenseItem {
            id: Uuid::parse_str(&id_str).context("Invalid expense ID")?,
            email: row.get("email"),
            title: row.get("title"),
            amount: row.get::<Option<Cents>, _>("amount_cents"),
            expense_date: row.get("expense_date"),
        })
    }

    fn row_to_list(row: &sqlx::sqlite::SqliteRow) -> Result<ExpenseItemList> {
        let id_str: String = row.get("id");
        let id = Uuid::parse_str(&id_str).context("Invalid expense list ID")?;
        let email: String = row.get("email");
        let title: String = row.get("title");

        Ok(ExpenseItemList::new(id, email, title))
    }
}

impl ExpenseStore for Repository {
    async fn get_expense_by_id(&self, id: ExpenseId) -> Result<Option<ExpenseItem>> {
        let row = sqlx::query(
            "SELECT id, email, title, amount_cents, expense_date FROM expense_items WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch expense")?;

        row.as_ref().map(Self::row_to_item).transpose()
    }

    async fn get_expenses_by_email(&self, email: &str) -> Result<Vec<ExpenseItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, email, title, amount_cents, expense_date
            FROM expense_items
            WHERE email = ?
            ORDER BY rowid
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list expenses by email")?;

        rows.iter().map(Self::row_to_item).collect()
    }

    async fn create_expense(&self, item: &ExpenseItem) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO expense_items (id, email, title, amount_cents, expense_date)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(item.id.to_string())
        .bind(&item.email)
        .bind(&item.title)
        .bind(item.amount)
        .bind(&item.expense_date)
        .execute(&self.pool)
        .await
        .context("Failed to save expense")?;

        debug!(expense_id = %item.id, "Stored expense");
        Ok(())
    }

    async fn update_expense(&self, id: ExpenseId, title: &str, amount: Option<Cents>) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE expense_items
            SET title = ?, amount_cents = COALESCE(?, amount_cents)
            WHERE id = ?
            "#,
        )
        .bind(title)
        .bind(amount)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .context("Failed to update expense")?;

        debug!(expense_id = %id, "Updated expense");
        Ok(())
    }

    async fn delete_expense(&self, id: ExpenseId) -> Result<()> {
        let result = sqlx::query("DELETE FROM expense_items WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete expense")?;

        debug!(expense_id = %id, rows = result.rows_affected(), "Deleted expense");
        Ok(())
    }

    async fn create_expense_list(&self, id: ExpenseListId, email: &str, title: &str) -> Result<()> {
        sqlx::query("INSERT INTO expense_lists (id, email, title) VALUES (?, ?, ?)")
            .bind(id.to_string())
            .bind(email)
            .bind(title)
            .execute(&self.pool)
            .await
            .context("Failed to save expense list")?;

        debug!(list_id = %id, "Stored expense list");
        Ok(())
    }

    async fn get_expense_list_by_id(&self, id: ExpenseListId) -> Result<Option<ExpenseItemList>> {
        let row = sqlx::query("SELECT id, email, title FROM expense_lists WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch expense list")?;

        match row {
            Some(row) => Ok(self.with_items(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn get_expense_lists_by_email(&self, email: &str) -> Result<Vec<ExpenseItemList>> {
        let rows = sqlx::query(
            "SELECT id, email, title FROM expense_lists WHERE email = ? ORDER BY rowid",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list expense lists by email")?;

        self.with_items(rows).await
    }

    async fn add_expense_item_to_list(&self, list_id: ExpenseListId, item: &ExpenseItem) -> Result<()> {
        let list_id_str = list_id.to_string();

        sqlx::query(
            r#"
            INSERT INTO expense_list_items (list_id, item_id, position)
            VALUES (?, ?, (SELECT COALESCE(MAX(position), 0) + 1 FROM expense_list_items WHERE list_id = ?))
            "#,
        )
        .bind(&list_id_str)
        .bind(item.id.to_string())
        .bind(&list_id_str)
        .execute(&self.pool)
        .await
        .context("Failed to add expense to list")?;

        debug!(list_id = %list_id, expense_id = %item.id, "Added expense to list");
        Ok(())
    }

    async fn remove_expense_item_from_list(
        &self,
        list_id: ExpenseListId,
        item: &ExpenseItem,
    ) -> Result<()> {
        sqlx::query("DELETE FROM expense_list_items WHERE list_id = ? AND item_id = ?")
            .bind(list_id.to_string())
            .bind(item.id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to remove expense from list")?;

        debug!(list_id = %list_id, expense_id = %item.id, "Removed expense from list");
        Ok(())
    }
}
