//! SQLite-backed record store.
//!
//! Amounts are stored as canonical decimal strings and dates as
//! `YYYY-MM-DD`, so values survive a round trip without float drift.

use crate::domain::{
    AdvanceRow, Client, ClientId, CreditRow, Decimal, DrawBalanceRow, NewTransaction, SaleRow,
    Transaction, TransactionPatch,
};
use crate::store::{RecordStore, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d";

const TRANSACTION_COLUMNS: &str = "id, client_id, date, description, category_label, amount, operation, column_name, is_visible";

/// Record store over a SQLite connection pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

fn corrupt(id: &str, reason: impl std::fmt::Display) -> StoreError {
    StoreError::Corrupt {
        id: id.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_date(id: &str, raw: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| corrupt(id, format!("date {:?}: {}", raw, e)))
}

fn parse_decimal(id: &str, field: &str, raw: &str) -> Result<Decimal, StoreError> {
    Decimal::from_str(raw).map_err(|e| corrupt(id, format!("{} {:?}: {}", field, raw, e)))
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn client_from_row(row: &SqliteRow) -> Result<Client, StoreError> {
    let id: String = row.get("id");
    let category: String = row.get("category");
    let created_at: String = row.get("created_at");
    Ok(Client {
        category: category.parse().map_err(|e| corrupt(&id, e))?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| corrupt(&id, e))?
            .with_timezone(&Utc),
        code: row.get("code"),
        name: row.get("name"),
        phone: row.get("phone"),
        id: ClientId::new(id),
    })
}

fn transaction_from_row(row: &SqliteRow) -> Result<Transaction, StoreError> {
    let id: String = row.get("id");
    let client_id: String = row.get("client_id");
    let date: String = row.get("date");
    let amount: String = row.get("amount");
    let operation: String = row.get("operation");
    let column: String = row.get("column_name");
    let is_visible: i64 = row.get("is_visible");

    Ok(Transaction {
        client_id: ClientId::new(client_id),
        date: parse_date(&id, &date)?,
        description: row.get("description"),
        category_label: row.get("category_label"),
        amount: parse_decimal(&id, "amount", &amount)?,
        operation: operation.parse().map_err(|e| corrupt(&id, e))?,
        column: column.parse().map_err(|e| corrupt(&id, e))?,
        is_visible: is_visible != 0,
        id,
    })
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteStore { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // =========================================================================
    // Seeding: rows owned by other subsystems
    // =========================================================================

    /// Insert a client idempotently. Returns false if the id already exists.
    pub async fn insert_client(&self, client: &Client) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO clients (id, code, name, phone, category, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO NOTHING
            "#,
        )
        .bind(client.id.as_str())
        .bind(&client.code)
        .bind(&client.name)
        .bind(client.phone.as_deref())
        .bind(client.category.as_str())
        .bind(client.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn insert_sale(&self, row: &SaleRow) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO sales (id, client_id, date, b, s, a, c)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO NOTHING
            "#,
        )
        .bind(&row.id)
        .bind(row.client_id.as_str())
        .bind(format_date(row.date))
        .bind(row.b.to_canonical_string())
        .bind(row.s.to_canonical_string())
        .bind(row.a.to_canonical_string())
        .bind(row.c.to_canonical_string())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_amount_row(
        &self,
        table: &str,
        amount_column: &str,
        id: &str,
        client_id: &ClientId,
        date: NaiveDate,
        amount: Decimal,
    ) -> Result<bool, StoreError> {
        let sql = format!(
            "INSERT INTO {table} (id, client_id, date, {amount_column}) VALUES (?, ?, ?, ?) ON CONFLICT(id) DO NOTHING"
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(client_id.as_str())
            .bind(format_date(date))
            .bind(amount.to_canonical_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn insert_advance(&self, row: &AdvanceRow) -> Result<bool, StoreError> {
        self.insert_amount_row("advances", "amount", &row.id, &row.client_id, row.date, row.amount)
            .await
    }

    pub async fn insert_credit(&self, row: &CreditRow) -> Result<bool, StoreError> {
        self.insert_amount_row("credits", "amount", &row.id, &row.client_id, row.date, row.amount)
            .await
    }

    pub async fn insert_draw_balance(&self, row: &DrawBalanceRow) -> Result<bool, StoreError> {
        self.insert_amount_row(
            "draw_balances",
            "balance",
            &row.id,
            &row.client_id,
            row.date,
            row.balance,
        )
        .await
    }

    /// Rows of an `(id, client_id, date, <amount_column>)` table for one client.
    async fn query_amount_rows(
        &self,
        table: &str,
        amount_column: &str,
        client_id: &ClientId,
    ) -> Result<Vec<(String, NaiveDate, Decimal)>, StoreError> {
        let sql = format!(
            "SELECT id, date, {amount_column} AS amount FROM {table} WHERE client_id = ? ORDER BY seq ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(client_id.as_str())
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| {
                let id: String = row.get("id");
                let date: String = row.get("date");
                let amount: String = row.get("amount");
                let date = parse_date(&id, &date)?;
                let amount = parse_decimal(&id, amount_column, &amount)?;
                Ok((id, date, amount))
            })
            .collect()
    }

    async fn fetch_transaction(&self, id: &str) -> Result<Option<Transaction>, StoreError> {
        let sql = format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(transaction_from_row).transpose()
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn list_clients(&self) -> Result<Vec<Client>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, code, name, phone, category, created_at FROM clients ORDER BY code ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(client_from_row).collect()
    }

    async fn get_client(&self, id: &ClientId) -> Result<Option<Client>, StoreError> {
        let row = sqlx::query(
            "SELECT id, code, name, phone, category, created_at FROM clients WHERE id = ?",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(client_from_row).transpose()
    }

    async fn list_manual_transactions(
        &self,
        client_id: &ClientId,
    ) -> Result<Vec<Transaction>, StoreError> {
        let sql = format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE client_id = ? ORDER BY seq ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(client_id.as_str())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(transaction_from_row).collect()
    }

    async fn list_sales(&self, client_id: &ClientId) -> Result<Vec<SaleRow>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, date, b, s, a, c FROM sales WHERE client_id = ? ORDER BY seq ASC",
        )
        .bind(client_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let id: String = row.get("id");
                let date: String = row.get("date");
                let bucket = |name: &str| -> Result<Decimal, StoreError> {
                    let raw: String = row.get(name);
                    parse_decimal(&id, name, &raw)
                };
                Ok(SaleRow {
                    client_id: client_id.clone(),
                    date: parse_date(&id, &date)?,
                    b: bucket("b")?,
                    s: bucket("s")?,
                    a: bucket("a")?,
                    c: bucket("c")?,
                    id: id.clone(),
                })
            })
            .collect()
    }

    async fn list_advances(&self, client_id: &ClientId) -> Result<Vec<AdvanceRow>, StoreError> {
        let rows = self.query_amount_rows("advances", "amount", client_id).await?;
        Ok(rows
            .into_iter()
            .map(|(id, date, amount)| AdvanceRow {
                id,
                client_id: client_id.clone(),
                date,
                amount,
            })
            .collect())
    }

    async fn list_credits(&self, client_id: &ClientId) -> Result<Vec<CreditRow>, StoreError> {
        let rows = self.query_amount_rows("credits", "amount", client_id).await?;
        Ok(rows
            .into_iter()
            .map(|(id, date, amount)| CreditRow {
                id,
                client_id: client_id.clone(),
                date,
                amount,
            })
            .collect())
    }

    async fn list_draw_balances(
        &self,
        client_id: &ClientId,
    ) -> Result<Vec<DrawBalanceRow>, StoreError> {
        let rows = self
            .query_amount_rows("draw_balances", "balance", client_id)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(id, date, balance)| DrawBalanceRow {
                id,
                client_id: client_id.clone(),
                date,
                balance,
            })
            .collect())
    }

    async fn create_transaction(&self, tx: NewTransaction) -> Result<Transaction, StoreError> {
        let created = tx.into_transaction(uuid::Uuid::new_v4().to_string());
        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, client_id, date, description, category_label,
                amount, operation, column_name, is_visible
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&created.id)
        .bind(created.client_id.as_str())
        .bind(format_date(created.date))
        .bind(&created.description)
        .bind(&created.category_label)
        .bind(created.amount.to_canonical_string())
        .bind(created.operation.as_str())
        .bind(created.column.as_str())
        .bind(created.is_visible as i64)
        .execute(&self.pool)
        .await?;

        debug!(id = %created.id, column = %created.column, "Inserted transaction");
        Ok(created)
    }

    async fn update_transaction(
        &self,
        id: &str,
        patch: &TransactionPatch,
    ) -> Result<(), StoreError> {
        let mut tx = self
            .fetch_transaction(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        tx.apply_patch(patch);

        sqlx::query(
            r#"
            UPDATE transactions
            SET date = ?, description = ?, category_label = ?, amount = ?,
                operation = ?, column_name = ?, is_visible = ?
            WHERE id = ?
            "#,
        )
        .bind(format_date(tx.date))
        .bind(&tx.description)
        .bind(&tx.category_label)
        .bind(tx.amount.to_canonical_string())
        .bind(tx.operation.as_str())
        .bind(tx.column.as_str())
        .bind(tx.is_visible as i64)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_transaction(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
