//! Stable transaction ordering for display and aggregation.

use crate::domain::{Origin, Transaction};
use chrono::NaiveDate;

/// Same-day precedence of a transaction, derived from origin and label.
///
/// Variants are declared in priority order, so the derived `Ord` is the
/// tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CategoryRank {
    PriorBalance = 1,
    Sales = 2,
    Telecom = 3,
    Winnings = 4,
    Credit = 5,
    Advance = 6,
    Other = 7,
}

impl CategoryRank {
    pub fn of(tx: &Transaction) -> Self {
        match tx.origin() {
            Origin::DrawBalance => return CategoryRank::PriorBalance,
            Origin::Sale | Origin::SaleAggregate => return CategoryRank::Sales,
            _ => {}
        }

        let label = tx.category_label.to_lowercase();
        if label.contains("previous balance") || label.contains("prior balance") {
            CategoryRank::PriorBalance
        } else if has_word(&label, &["sale", "sales"]) {
            CategoryRank::Sales
        } else if has_word(&label, &["phone", "telecom"]) {
            CategoryRank::Telecom
        } else if has_word(&label, &["win", "wins", "winning", "winnings", "prize", "prizes"]) {
            CategoryRank::Winnings
        } else if tx.origin() == Origin::Credit || has_word(&label, &["credit"]) {
            CategoryRank::Credit
        } else if tx.origin() == Origin::Advance || has_word(&label, &["advance"]) {
            CategoryRank::Advance
        } else {
            CategoryRank::Other
        }
    }

    pub fn priority(&self) -> u8 {
        *self as u8
    }
}

/// True if any whole word of `label` is one of `words`.
fn has_word(label: &str, words: &[&str]) -> bool {
    label
        .split(|c: char| !c.is_alphanumeric())
        .any(|w| words.contains(&w))
}

/// Ordering key: date first, then category rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TransactionOrderingKey {
    pub date: NaiveDate,
    pub rank: CategoryRank,
}

impl TransactionOrderingKey {
    pub fn from_transaction(tx: &Transaction) -> Self {
        TransactionOrderingKey {
            date: tx.date,
            rank: CategoryRank::of(tx),
        }
    }

    /// Returns true if `a` sorts strictly before `b`.
    pub fn should_come_before(a: &Transaction, b: &Transaction) -> bool {
        Self::from_transaction(a) < Self::from_transaction(b)
    }
}

/// Sort transactions by (date, category rank).
///
/// The sort is stable: equal keys keep their store order.
pub fn sort_transactions(txs: &mut [Transaction]) {
    txs.sort_by_cached_key(TransactionOrderingKey::from_transaction);
}
