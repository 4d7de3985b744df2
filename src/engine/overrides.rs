//! Per-client carve-outs applied to the `main` column before summation.

use crate::domain::{CategoryRank, Transaction};
use std::collections::HashMap;

/// How "prior balance" transactions are treated in a client's `main` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorBalanceRule {
    /// Zero-amount placeholders are dropped; everything else counts.
    #[default]
    DropZeroAmount,
    /// Every prior-balance transaction is dropped.
    ExcludeAll,
}

impl PriorBalanceRule {
    fn excludes(&self, tx: &Transaction) -> bool {
        match self {
            PriorBalanceRule::DropZeroAmount => tx.amount.is_zero(),
            PriorBalanceRule::ExcludeAll => true,
        }
    }
}

/// Client code → rule table. Codes not listed get the default rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideTable {
    prior_balance: HashMap<String, PriorBalanceRule>,
}

impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table where each listed code excludes all prior-balance entries.
    pub fn with_exempt_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        codes.into_iter().fold(Self::new(), |table, code| {
            table.with_rule(code, PriorBalanceRule::ExcludeAll)
        })
    }

    pub fn with_rule(mut self, code: impl Into<String>, rule: PriorBalanceRule) -> Self {
        self.prior_balance.insert(code.into(), rule);
        self
    }

    pub fn prior_balance_rule(&self, client_code: &str) -> PriorBalanceRule {
        self.prior_balance
            .get(client_code)
            .copied()
            .unwrap_or_default()
    }

    /// Whether `tx` is removed from the client's `main` column.
    pub fn excludes_from_main(&self, client_code: &str, tx: &Transaction) -> bool {
        CategoryRank::of(tx) == CategoryRank::PriorBalance
            && self.prior_balance_rule(client_code).excludes(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClientId, Decimal, NewTransaction, Operation};
    use chrono::NaiveDate;

    fn tx(id: &str, label: &str, amount: i64) -> Transaction {
        NewTransaction::new(
            ClientId::new("c1"),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            label,
            Decimal::from_i64(amount),
            Operation::Add,
        )
        .into_transaction(id.to_string())
    }

    #[test]
    fn test_default_rule_drops_only_zero_placeholders() {
        let table = OverrideTable::new();
        assert!(table.excludes_from_main("A1", &tx("m1", "Previous Balance", 0)));
        assert!(!table.excludes_from_main("A1", &tx("m2", "Previous Balance", 10)));
        assert!(!table.excludes_from_main("A1", &tx("m3", "Lunch", 0)));
    }

    #[test]
    fn test_exempt_codes_drop_every_prior_balance() {
        let table = OverrideTable::with_exempt_codes(["K7", "K9"]);
        assert_eq!(table.prior_balance_rule("K7"), PriorBalanceRule::ExcludeAll);
        assert_eq!(table.prior_balance_rule("A1"), PriorBalanceRule::DropZeroAmount);
        assert!(table.excludes_from_main("K9", &tx("draw:1", "Previous Balance", 500)));
        assert!(!table.excludes_from_main("K9", &tx("sale:1", "Sales Opening", 500)));
    }

    #[test]
    fn test_rule_applies_to_draw_origin_regardless_of_label() {
        let table = OverrideTable::with_exempt_codes(["K7"]);
        assert!(table.excludes_from_main("K7", &tx("draw:abc", "Carried", 40)));
    }
}
