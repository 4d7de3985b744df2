//! Turns auxiliary subsystem rows into virtual ledger transactions.
//!
//! Every mapping is fixed: one row yields at most one transaction, the
//! amount is always the absolute source quantity, and the sign is carried
//! by `operation`. Rows that net to zero produce nothing.

use crate::domain::{
    labels, sort_transactions, AdvanceRow, ClientId, ClientSources, Column, CreditRow, Decimal,
    DrawBalanceRow, Operation, Origin, SaleRow, Transaction,
};
use chrono::NaiveDate;
use tracing::{debug, warn};

#[allow(clippy::too_many_arguments)]
fn virtual_transaction(
    origin: Origin,
    client_id: &ClientId,
    row_id: &str,
    date: NaiveDate,
    label: &str,
    description: String,
    quantity: Decimal,
    operation: Operation,
) -> Transaction {
    Transaction {
        id: origin.virtual_id([client_id.as_str(), row_id]),
        client_id: client_id.clone(),
        date,
        description,
        category_label: label.to_string(),
        amount: quantity.abs(),
        operation,
        column: Column::Main,
        is_visible: true,
    }
}

/// Sales post as an addition; a negative bucket total flips to a subtraction.
pub fn synthesize_sale(row: &SaleRow) -> Option<Transaction> {
    let total = row.total();
    if total.is_zero() {
        return None;
    }
    let breakdown = format!("B {} / S {} / A {} / C {}", row.b, row.s, row.a, row.c);
    Some(virtual_transaction(
        Origin::Sale,
        &row.client_id,
        &row.id,
        row.date,
        labels::SALES_OPENING,
        breakdown,
        total,
        Operation::for_signed(total),
    ))
}

pub fn synthesize_advance(row: &AdvanceRow) -> Option<Transaction> {
    if row.amount.is_zero() {
        return None;
    }
    Some(virtual_transaction(
        Origin::Advance,
        &row.client_id,
        &row.id,
        row.date,
        labels::CASH_ADVANCE,
        String::new(),
        row.amount,
        Operation::Add,
    ))
}

pub fn synthesize_credit(row: &CreditRow) -> Option<Transaction> {
    if row.amount.is_zero() {
        return None;
    }
    Some(virtual_transaction(
        Origin::Credit,
        &row.client_id,
        &row.id,
        row.date,
        labels::CASH_CREDIT,
        String::new(),
        row.amount,
        Operation::Subtract,
    ))
}

pub fn synthesize_draw_balance(row: &DrawBalanceRow) -> Option<Transaction> {
    if row.balance.is_zero() {
        return None;
    }
    Some(virtual_transaction(
        Origin::DrawBalance,
        &row.client_id,
        &row.id,
        row.date,
        labels::PREVIOUS_BALANCE,
        String::new(),
        row.balance,
        Operation::for_signed(row.balance),
    ))
}

fn owned_by(client_id: &ClientId, row_client: &ClientId, source: &str, row_id: &str) -> bool {
    if row_client == client_id {
        return true;
    }
    warn!(
        client_id = %client_id,
        row_client = %row_client,
        source,
        row_id,
        "Skipping source row that belongs to another client"
    );
    false
}

/// Synthesize the virtual transactions for one client.
///
/// Rows whose `client_id` does not match are skipped rather than attributed.
pub fn synthesize(client_id: &ClientId, sources: &ClientSources) -> Vec<Transaction> {
    let sales = sources
        .sales
        .iter()
        .filter(|r| owned_by(client_id, &r.client_id, "sales", &r.id))
        .filter_map(synthesize_sale);
    let advances = sources
        .advances
        .iter()
        .filter(|r| owned_by(client_id, &r.client_id, "advances", &r.id))
        .filter_map(synthesize_advance);
    let credits = sources
        .credits
        .iter()
        .filter(|r| owned_by(client_id, &r.client_id, "credits", &r.id))
        .filter_map(synthesize_credit);
    let draws = sources
        .draw_balances
        .iter()
        .filter(|r| owned_by(client_id, &r.client_id, "draw_balances", &r.id))
        .filter_map(synthesize_draw_balance);

    let virtual_txs: Vec<Transaction> = sales.chain(advances).chain(credits).chain(draws).collect();
    debug!(
        client_id = %client_id,
        count = virtual_txs.len(),
        "Synthesized virtual transactions"
    );
    virtual_txs
}

/// Manual plus virtual transactions for one client, in ledger order.
pub fn merge_client_ledger(client_id: &ClientId, sources: &ClientSources) -> Vec<Transaction> {
    let mut all: Vec<Transaction> = sources
        .manual
        .iter()
        .filter(|t| owned_by(client_id, &t.client_id, "manual", &t.id))
        .cloned()
        .collect();
    all.extend(synthesize(client_id, sources));
    sort_transactions(&mut all);
    all
}
