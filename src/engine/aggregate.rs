//! Window-level merge of sale rows into one aggregate transaction.

use crate::domain::{labels, sort_transactions, Column, Decimal, Operation, Origin, Transaction};
use tracing::debug;

/// Replace two or more sale-origin transactions with a single aggregate.
///
/// `txs` must already be restricted to one reporting window and sorted. The
/// aggregate carries the net of the merged rows, is dated on the latest of
/// them, and takes its place in ledger order. Fewer than two sales leaves the
/// input untouched.
pub fn aggregate_sales(txs: Vec<Transaction>) -> Vec<Transaction> {
    let (sales, mut rest): (Vec<Transaction>, Vec<Transaction>) =
        txs.into_iter().partition(|t| t.is_sale() && t.column == Column::Main);

    if sales.len() < 2 {
        rest.extend(sales);
        sort_transactions(&mut rest);
        return rest;
    }

    let net: Decimal = sales
        .iter()
        .filter(|t| t.is_visible)
        .map(Transaction::net_effect)
        .sum();
    let latest = sales.iter().map(|t| t.date).fold(sales[0].date, std::cmp::max);
    let client_id = sales[0].client_id.clone();
    let id = Origin::SaleAggregate.virtual_id(
        std::iter::once(client_id.as_str()).chain(sales.iter().map(|t| t.id.as_str())),
    );

    debug!(
        client_id = %client_id,
        merged = sales.len(),
        net = %net,
        "Merged sale rows into window aggregate"
    );

    rest.push(Transaction {
        id,
        client_id,
        date: latest,
        description: format!("{} sales", sales.len()),
        category_label: labels::SALES_OPENING.to_string(),
        amount: net.abs(),
        operation: Operation::for_signed(net),
        column: Column::Main,
        is_visible: true,
    });
    sort_transactions(&mut rest);
    rest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClientId, NewTransaction};
    use chrono::NaiveDate;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, n).unwrap()
    }

    fn tx(id: &str, date: NaiveDate, label: &str, amount: &str, op: Operation) -> Transaction {
        NewTransaction::new(ClientId::new("c1"), date, label, d(amount), op)
            .into_transaction(id.to_string())
    }

    #[test]
    fn test_single_sale_is_kept() {
        let out = aggregate_sales(vec![tx("sale:1", day(1), "Sales Opening", "100", Operation::Add)]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "sale:1");
    }

    #[test]
    fn test_sales_merge_to_net_on_latest_date() {
        let out = aggregate_sales(vec![
            tx("sale:1", day(1), "Sales Opening", "100", Operation::Add),
            tx("m1", day(2), "Lunch", "5", Operation::Subtract),
            tx("sale:2", day(3), "Sales Opening", "30", Operation::Subtract),
            tx("sale:3", day(2), "Sales Opening", "10", Operation::Add),
        ]);
        assert_eq!(out.len(), 2);
        let agg = out.iter().find(|t| t.origin() == Origin::SaleAggregate).unwrap();
        assert_eq!(agg.amount, d("80"));
        assert_eq!(agg.operation, Operation::Add);
        assert_eq!(agg.date, day(3));
        assert_eq!(agg.description, "3 sales");
        // Lunch on day 2 sorts before the aggregate on day 3.
        assert_eq!(out[0].id, "m1");
    }

    #[test]
    fn test_negative_net_subtracts() {
        let out = aggregate_sales(vec![
            tx("sale:1", day(1), "Sales Opening", "10", Operation::Add),
            tx("sale:2", day(1), "Sales Opening", "40", Operation::Subtract),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].amount, d("30"));
        assert_eq!(out[0].operation, Operation::Subtract);
    }

    #[test]
    fn test_aggregate_id_is_deterministic() {
        let input = vec![
            tx("sale:1", day(1), "Sales Opening", "10", Operation::Add),
            tx("sale:2", day(2), "Sales Opening", "20", Operation::Add),
        ];
        let a = aggregate_sales(input.clone());
        let b = aggregate_sales(input);
        assert_eq!(a[0].id, b[0].id);
        assert!(a[0].id.starts_with("sale-agg:"));
    }
}
