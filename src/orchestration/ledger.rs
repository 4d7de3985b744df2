use crate::domain::{
    labels, Client, ClientId, ClientSources, Column, Decimal, NewTransaction, Operation, Origin,
    Transaction, TransactionPatch,
};
use crate::engine::{
    merge_client_ledger, BalanceCalculator, ClientBalances, ColumnView, LedgerWindow,
    WeekCalendar,
};
use crate::error::{LedgerError, PayoutSaveError};
use crate::payout::{reprice_description, PayoutSession};
use crate::store::RecordStore;
use chrono::NaiveDate;
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Entry point for reading balances and writing manual entries and payouts.
///
/// Balances are recomputed from the store on every call; nothing is cached.
#[derive(Debug, Clone)]
pub struct LedgerService {
    store: Arc<dyn RecordStore>,
    calculator: BalanceCalculator,
    calendar: Arc<dyn WeekCalendar>,
}

fn ensure_manual(id: &str) -> Result<(), LedgerError> {
    if Origin::from_id(id).is_virtual() {
        return Err(LedgerError::VirtualRecord(id.to_string()));
    }
    Ok(())
}

fn ensure_non_negative(amount: Decimal) -> Result<(), LedgerError> {
    if amount.is_negative() {
        return Err(LedgerError::InvalidAmount(amount));
    }
    Ok(())
}

impl LedgerService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        calculator: BalanceCalculator,
        calendar: Arc<dyn WeekCalendar>,
    ) -> Self {
        Self {
            store,
            calculator,
            calendar,
        }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Read every source a client's ledger is built from.
    ///
    /// The five reads run concurrently; the first failure aborts the load.
    pub async fn load_sources(&self, client_id: &ClientId) -> Result<ClientSources, LedgerError> {
        let (manual, sales, advances, credits, draw_balances) = tokio::try_join!(
            self.store.list_manual_transactions(client_id),
            self.store.list_sales(client_id),
            self.store.list_advances(client_id),
            self.store.list_credits(client_id),
            self.store.list_draw_balances(client_id),
        )?;

        debug!(
            client = %client_id,
            manual = manual.len(),
            sales = sales.len(),
            advances = advances.len(),
            credits = credits.len(),
            draw_balances = draw_balances.len(),
            "Loaded client sources"
        );

        Ok(ClientSources {
            manual,
            sales,
            advances,
            credits,
            draw_balances,
        })
    }

    /// Manual and synthesized transactions for a client, ordered.
    pub async fn client_transactions(
        &self,
        client_id: &ClientId,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let sources = self.load_sources(client_id).await?;
        Ok(merge_client_ledger(client_id, &sources))
    }

    pub async fn column_view(
        &self,
        client: &Client,
        window: LedgerWindow,
        column: Column,
    ) -> Result<ColumnView, LedgerError> {
        let txs = self.client_transactions(&client.id).await?;
        Ok(self.calculator.column_view(&client.code, &txs, window, column))
    }

    pub async fn client_balances(
        &self,
        client: &Client,
        window: LedgerWindow,
    ) -> Result<ClientBalances, LedgerError> {
        let txs = self.client_transactions(&client.id).await?;
        Ok(self
            .calculator
            .client_balances(&client.id, &client.code, &txs, window))
    }

    pub async fn balances_for(
        &self,
        client_id: &ClientId,
        window: LedgerWindow,
    ) -> Result<ClientBalances, LedgerError> {
        let client = self
            .store
            .get_client(client_id)
            .await?
            .ok_or_else(|| LedgerError::ClientNotFound(client_id.clone()))?;
        self.client_balances(&client, window).await
    }

    pub fn week_containing(&self, date: NaiveDate) -> Result<LedgerWindow, LedgerError> {
        self.calendar
            .week_containing(date)
            .ok_or(LedgerError::NoReportingWeek(date))
    }

    /// Balances of every paper client for `window`, in store order.
    pub async fn paper_report(
        &self,
        window: LedgerWindow,
    ) -> Result<Vec<ClientBalances>, LedgerError> {
        let clients = self.store.list_clients().await?;
        let total = clients.len();
        let paper: Vec<Client> = clients.into_iter().filter(Client::is_paper).collect();

        info!(
            from = %window.from,
            to = %window.to,
            clients = paper.len(),
            skipped = total - paper.len(),
            "Building paper ledger report"
        );

        let loads = paper
            .iter()
            .map(|client| self.client_balances(client, window));
        try_join_all(loads).await
    }

    /// Paper report for the reporting week that contains `date`.
    pub async fn weekly_paper_report(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<ClientBalances>, LedgerError> {
        let window = self.week_containing(date)?;
        self.paper_report(window).await
    }

    // =========================================================================
    // Manual writes
    // =========================================================================

    pub async fn record_manual(&self, tx: NewTransaction) -> Result<Transaction, LedgerError> {
        ensure_non_negative(tx.amount)?;
        let created = self.store.create_transaction(tx).await?;
        info!(
            id = %created.id,
            client = %created.client_id,
            column = %created.column,
            "Recorded manual transaction"
        );
        Ok(created)
    }

    pub async fn update_manual(
        &self,
        id: &str,
        patch: &TransactionPatch,
    ) -> Result<(), LedgerError> {
        ensure_manual(id)?;
        if let Some(amount) = patch.amount {
            ensure_non_negative(amount)?;
        }
        if patch.is_empty() {
            return Ok(());
        }
        self.store.update_transaction(id, patch).await?;
        Ok(())
    }

    pub async fn delete_manual(&self, id: &str) -> Result<(), LedgerError> {
        ensure_manual(id)?;
        self.store.delete_transaction(id).await?;
        info!(id, "Deleted manual transaction");
        Ok(())
    }

    // =========================================================================
    // Payouts
    // =========================================================================

    /// Write a payout as two entries: the itemized `panel1` row, then the
    /// balance-bearing `main` row. Returns `(panel1, main)`.
    ///
    /// No rollback is attempted if the second write fails.
    pub async fn save_payout(
        &self,
        client_id: &ClientId,
        date: NaiveDate,
        session: &PayoutSession,
    ) -> Result<(Transaction, Transaction), PayoutSaveError> {
        if session.is_empty() {
            return Err(PayoutSaveError::EmptySession);
        }
        let total = session.total_winnings();
        let entry = |column: Column| {
            NewTransaction::new(
                client_id.clone(),
                date,
                labels::WIN_SETTLEMENT,
                total,
                Operation::Subtract,
            )
            .in_column(column)
        };

        let panel = self
            .store
            .create_transaction(entry(Column::Panel1).with_description(session.description()))
            .await
            .map_err(PayoutSaveError::NothingWritten)?;
        debug!(id = %panel.id, total = %total, "Itemized payout written");

        let main = match self.store.create_transaction(entry(Column::Main)).await {
            Ok(main) => main,
            Err(source) => {
                warn!(
                    panel_id = %panel.id,
                    error = %source,
                    "Main payout entry failed after itemized entry was written"
                );
                return Err(PayoutSaveError::MainWriteFailed { panel, source });
            }
        };

        info!(
            client = %client_id,
            date = %date,
            total = %total,
            entries = session.entries().len(),
            "Payout saved"
        );
        Ok((panel, main))
    }

    /// Apply per-entry win overrides to a saved payout and rewrite its
    /// description and amount.
    ///
    /// `tx` is the itemized `panel1` row. Its paired `main` row, written by
    /// [`save_payout`](Self::save_payout) with the same client, date and old
    /// total, is moved to the new total as well. A missing pair is logged and
    /// left alone.
    pub async fn edit_payout(
        &self,
        tx: &Transaction,
        edits: &[(usize, Decimal)],
    ) -> Result<PayoutSession, LedgerError> {
        ensure_manual(&tx.id)?;
        let session = reprice_description(&tx.description, edits)?
            .ok_or_else(|| LedgerError::NotPayout(tx.id.clone()))?;
        let total = session.total_winnings();

        let paired = self.find_paired_main(tx).await?;

        let patch = TransactionPatch {
            description: Some(session.description()),
            amount: Some(total),
            ..Default::default()
        };
        self.store.update_transaction(&tx.id, &patch).await?;

        match paired {
            Some(main) => {
                let patch = TransactionPatch {
                    amount: Some(total),
                    ..Default::default()
                };
                self.store.update_transaction(&main.id, &patch).await?;
                debug!(panel_id = %tx.id, main_id = %main.id, "Paired main entry repriced");
            }
            None => warn!(
                panel_id = %tx.id,
                "No paired main entry found for payout, only the itemized entry was updated"
            ),
        }

        info!(id = %tx.id, edits = edits.len(), total = %total, "Payout edited");
        Ok(session)
    }

    async fn find_paired_main(
        &self,
        panel: &Transaction,
    ) -> Result<Option<Transaction>, LedgerError> {
        let manual = self.store.list_manual_transactions(&panel.client_id).await?;
        Ok(manual.into_iter().find(|t| {
            t.id != panel.id
                && t.column == Column::Main
                && t.date == panel.date
                && t.category_label == panel.category_label
                && t.operation == panel.operation
                && t.amount == panel.amount
                && t.description.is_empty()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FixedWeekdayCalendar;
    use crate::store::MemoryStore;

    fn service(store: MemoryStore) -> LedgerService {
        LedgerService::new(
            Arc::new(store),
            BalanceCalculator::default(),
            Arc::new(FixedWeekdayCalendar::default()),
        )
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    #[tokio::test]
    async fn test_negative_amount_rejected_before_write() {
        let svc = service(MemoryStore::new());
        let tx = NewTransaction::new(
            ClientId::new("c1"),
            date(1),
            "Lunch",
            Decimal::from_i64(-5),
            Operation::Subtract,
        );
        assert!(matches!(
            svc.record_manual(tx).await,
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[tokio::test]
    async fn test_virtual_records_are_read_only() {
        let svc = service(MemoryStore::new());
        let id = Origin::Sale.virtual_id(["c1", "s1"]);
        assert!(matches!(
            svc.delete_manual(&id).await,
            Err(LedgerError::VirtualRecord(_))
        ));
        assert!(matches!(
            svc.update_manual(&id, &TransactionPatch::default()).await,
            Err(LedgerError::VirtualRecord(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_session_not_saved() {
        let svc = service(MemoryStore::new());
        let err = svc
            .save_payout(&ClientId::new("c1"), date(1), &PayoutSession::new())
            .await
            .unwrap_err();
        assert!(matches!(err, PayoutSaveError::EmptySession));
    }

    #[tokio::test]
    async fn test_week_containing_uses_calendar() {
        let svc = service(MemoryStore::new());
        // 2024-05-01 is a Wednesday; first week runs to Sunday the 5th.
        let window = svc.week_containing(date(3)).unwrap();
        assert_eq!(window, LedgerWindow::new(date(1), date(5)));
    }

    #[tokio::test]
    async fn test_unknown_client() {
        let svc = service(MemoryStore::new());
        let window = LedgerWindow::new(date(1), date(5));
        assert!(matches!(
            svc.balances_for(&ClientId::new("ghost"), window).await,
            Err(LedgerError::ClientNotFound(_))
        ));
    }
}
