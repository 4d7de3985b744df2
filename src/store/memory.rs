//! In-memory record store for tests and embedding.

use super::{RecordStore, StoreError};
use crate::domain::{
    AdvanceRow, Client, ClientId, Column, CreditRow, DrawBalanceRow, NewTransaction, SaleRow,
    Transaction, TransactionPatch,
};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Entity collections a store serves; used to inject read failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreTable {
    Clients,
    Transactions,
    Sales,
    Advances,
    Credits,
    DrawBalances,
}

#[derive(Debug, Default)]
struct MemoryState {
    clients: Vec<Client>,
    transactions: Vec<Transaction>,
    sales: Vec<SaleRow>,
    advances: Vec<AdvanceRow>,
    credits: Vec<CreditRow>,
    draw_balances: Vec<DrawBalanceRow>,
}

/// Record store backed by vectors, with optional fault injection.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
    failing_reads: HashSet<StoreTable>,
    failing_columns: HashSet<Column>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state_mut(&mut self) -> &mut MemoryState {
        self.state.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn check_read(&self, table: StoreTable) -> Result<(), StoreError> {
        if self.failing_reads.contains(&table) {
            return Err(StoreError::Unavailable(format!("{:?} read failed", table)));
        }
        Ok(())
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.state_mut().clients.push(client);
        self
    }

    /// Seed a manual transaction with a caller-chosen id.
    pub fn with_transaction(mut self, tx: Transaction) -> Self {
        self.state_mut().transactions.push(tx);
        self
    }

    pub fn with_sale(mut self, row: SaleRow) -> Self {
        self.state_mut().sales.push(row);
        self
    }

    pub fn with_advance(mut self, row: AdvanceRow) -> Self {
        self.state_mut().advances.push(row);
        self
    }

    pub fn with_credit(mut self, row: CreditRow) -> Self {
        self.state_mut().credits.push(row);
        self
    }

    pub fn with_draw_balance(mut self, row: DrawBalanceRow) -> Self {
        self.state_mut().draw_balances.push(row);
        self
    }

    /// Make every read of `table` fail.
    pub fn with_failing_reads(mut self, table: StoreTable) -> Self {
        self.failing_reads.insert(table);
        self
    }

    /// Make every write that targets `column` fail.
    pub fn with_failing_column(mut self, column: Column) -> Self {
        self.failing_columns.insert(column);
        self
    }

    /// Snapshot of every stored manual transaction.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.read()
            .map(|state| state.transactions.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list_clients(&self) -> Result<Vec<Client>, StoreError> {
        self.check_read(StoreTable::Clients)?;
        Ok(self.read()?.clients.clone())
    }

    async fn get_client(&self, id: &ClientId) -> Result<Option<Client>, StoreError> {
        self.check_read(StoreTable::Clients)?;
        Ok(self.read()?.clients.iter().find(|c| &c.id == id).cloned())
    }

    async fn list_manual_transactions(
        &self,
        client_id: &ClientId,
    ) -> Result<Vec<Transaction>, StoreError> {
        self.check_read(StoreTable::Transactions)?;
        Ok(self
            .read()?
            .transactions
            .iter()
            .filter(|t| &t.client_id == client_id)
            .cloned()
            .collect())
    }

    async fn list_sales(&self, client_id: &ClientId) -> Result<Vec<SaleRow>, StoreError> {
        self.check_read(StoreTable::Sales)?;
        Ok(self
            .read()?
            .sales
            .iter()
            .filter(|r| &r.client_id == client_id)
            .cloned()
            .collect())
    }

    async fn list_advances(&self, client_id: &ClientId) -> Result<Vec<AdvanceRow>, StoreError> {
        self.check_read(StoreTable::Advances)?;
        Ok(self
            .read()?
            .advances
            .iter()
            .filter(|r| &r.client_id == client_id)
            .cloned()
            .collect())
    }

    async fn list_credits(&self, client_id: &ClientId) -> Result<Vec<CreditRow>, StoreError> {
        self.check_read(StoreTable::Credits)?;
        Ok(self
            .read()?
            .credits
            .iter()
            .filter(|r| &r.client_id == client_id)
            .cloned()
            .collect())
    }

    async fn list_draw_balances(
        &self,
        client_id: &ClientId,
    ) -> Result<Vec<DrawBalanceRow>, StoreError> {
        self.check_read(StoreTable::DrawBalances)?;
        Ok(self
            .read()?
            .draw_balances
            .iter()
            .filter(|r| &r.client_id == client_id)
            .cloned()
            .collect())
    }

    async fn create_transaction(&self, tx: NewTransaction) -> Result<Transaction, StoreError> {
        if self.failing_columns.contains(&tx.column) {
            return Err(StoreError::Unavailable(format!(
                "write to {} column failed",
                tx.column
            )));
        }
        let created = tx.into_transaction(uuid::Uuid::new_v4().to_string());
        self.write()?.transactions.push(created.clone());
        debug!(id = %created.id, column = %created.column, "Created transaction");
        Ok(created)
    }

    async fn update_transaction(
        &self,
        id: &str,
        patch: &TransactionPatch,
    ) -> Result<(), StoreError> {
        let mut state = self.write()?;
        let tx = state
            .transactions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let target = patch.column.unwrap_or(tx.column);
        if self.failing_columns.contains(&target) {
            return Err(StoreError::Unavailable(format!(
                "write to {} column failed",
                target
            )));
        }
        tx.apply_patch(patch);
        Ok(())
    }

    async fn delete_transaction(&self, id: &str) -> Result<(), StoreError> {
        let mut state = self.write()?;
        let before = state.transactions.len();
        state.transactions.retain(|t| t.id != id);
        if state.transactions.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
