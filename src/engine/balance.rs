//! Per-column balance computation over a reporting window.

use crate::domain::{ClientId, Column, Decimal, Transaction};
use crate::engine::aggregate::aggregate_sales;
use crate::engine::overrides::OverrideTable;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive calendar-day window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl LedgerWindow {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        LedgerWindow { from, to }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// One column of a client's ledger for one window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnView {
    pub column: Column,
    pub window: LedgerWindow,
    /// Ordered, including invisible entries for greyed-out display.
    pub transactions: Vec<Transaction>,
    /// Sum of net effects of the visible entries only.
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientBalances {
    pub client_id: ClientId,
    pub client_code: String,
    pub window: LedgerWindow,
    pub main: ColumnView,
    pub panel1: ColumnView,
    pub panel2: ColumnView,
}

impl ClientBalances {
    pub fn column(&self, column: Column) -> &ColumnView {
        match column {
            Column::Main => &self.main,
            Column::Panel1 => &self.panel1,
            Column::Panel2 => &self.panel2,
        }
    }
}

/// Sum of net effects of the visible transactions.
pub fn visible_balance(txs: &[Transaction]) -> Decimal {
    txs.iter()
        .filter(|t| t.is_visible)
        .map(Transaction::net_effect)
        .sum()
}

#[derive(Debug, Clone, Default)]
pub struct BalanceCalculator {
    overrides: OverrideTable,
}

impl BalanceCalculator {
    pub fn new(overrides: OverrideTable) -> Self {
        Self { overrides }
    }

    pub fn overrides(&self) -> &OverrideTable {
        &self.overrides
    }

    /// Compute one column for a client.
    ///
    /// `txs` is the client's full ordered transaction set. Exclusions happen
    /// before summation, so dropped entries never reach the balance.
    pub fn column_view(
        &self,
        client_code: &str,
        txs: &[Transaction],
        window: LedgerWindow,
        column: Column,
    ) -> ColumnView {
        let selected: Vec<Transaction> = txs
            .iter()
            .filter(|t| t.column == column && window.contains(t.date))
            .filter(|t| column != Column::Main || !self.overrides.excludes_from_main(client_code, t))
            .cloned()
            .collect();

        let transactions = if column == Column::Main {
            aggregate_sales(selected)
        } else {
            selected
        };
        let balance = visible_balance(&transactions);

        ColumnView {
            column,
            window,
            transactions,
            balance,
        }
    }

    pub fn client_balances(
        &self,
        client_id: &ClientId,
        client_code: &str,
        txs: &[Transaction],
        window: LedgerWindow,
    ) -> ClientBalances {
        ClientBalances {
            client_id: client_id.clone(),
            client_code: client_code.to_string(),
            window,
            main: self.column_view(client_code, txs, window, Column::Main),
            panel1: self.column_view(client_code, txs, window, Column::Panel1),
            panel2: self.column_view(client_code, txs, window, Column::Panel2),
        }
    }
}
