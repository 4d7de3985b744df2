use chrono::{NaiveDate, TimeZone, Utc};
use creditbook::db::init_db;
use creditbook::domain::{AdvanceRow, DrawBalanceRow, SaleRow};
use creditbook::engine::{FixedWeekdayCalendar, OverrideTable};
use creditbook::payout::{BetType, Channel, DrawMode, Position, Stake, StakeKind};
use creditbook::{
    BalanceCalculator, BetRequest, Client, ClientCategory, ClientId, Column, Decimal,
    LedgerService, LedgerWindow, NewTransaction, Operation, PayoutSession, RecordStore,
    SqliteStore,
};
use std::sync::Arc;
use tempfile::TempDir;

fn d(s: &str) -> Decimal {
    Decimal::from_str_canonical(s).unwrap()
}

fn may(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
}

fn client(id: &str, code: &str, category: ClientCategory) -> Client {
    Client {
        id: ClientId::new(id),
        code: code.to_string(),
        name: format!("Client {}", code),
        phone: Some("012-3456789".to_string()),
        category,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 8, 30, 0).unwrap(),
    }
}

async fn setup_ledger(overrides: OverrideTable) -> (LedgerService, Arc<SqliteStore>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();

    let pool = init_db(&db_path).await.expect("init_db failed");
    let store = Arc::new(SqliteStore::new(pool));
    let ledger = LedgerService::new(
        store.clone(),
        BalanceCalculator::new(overrides),
        Arc::new(FixedWeekdayCalendar::default()),
    );
    (ledger, store, temp_dir)
}

async fn seed(store: &SqliteStore) {
    store
        .insert_client(&client("c1", "A1", ClientCategory::Paper))
        .await
        .unwrap();
    store
        .insert_client(&client("c2", "M9", ClientCategory::Mobile))
        .await
        .unwrap();
    store
        .insert_client(&client("c3", "K7", ClientCategory::Paper))
        .await
        .unwrap();

    let sales = [
        ("s1", "c1", 2, "120.50"),
        ("s2", "c1", 4, "79.50"),
        ("s3", "c2", 2, "10"),
    ];
    for (id, client_id, day, b) in sales {
        store
            .insert_sale(&SaleRow {
                id: id.to_string(),
                client_id: ClientId::new(client_id),
                date: may(day),
                b: d(b),
                s: d("0"),
                a: d("0"),
                c: d("0"),
            })
            .await
            .unwrap();
    }
    store
        .insert_draw_balance(&DrawBalanceRow {
            id: "p1".to_string(),
            client_id: ClientId::new("c3"),
            date: may(1),
            balance: d("-150"),
        })
        .await
        .unwrap();
    store
        .insert_advance(&AdvanceRow {
            id: "a1".to_string(),
            client_id: ClientId::new("c3"),
            date: may(3),
            amount: d("75"),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_weekly_report_over_sqlite() {
    let (ledger, store, _temp) = setup_ledger(OverrideTable::new()).await;
    seed(&store).await;

    let report = ledger.weekly_paper_report(may(3)).await.unwrap();
    assert_eq!(report.len(), 2);

    let a1 = report.iter().find(|b| b.client_code == "A1").unwrap();
    assert_eq!(a1.window, LedgerWindow::new(may(1), may(5)));
    assert_eq!(a1.main.transactions.len(), 1);
    assert_eq!(a1.main.balance, d("200"));

    let k7 = report.iter().find(|b| b.client_code == "K7").unwrap();
    assert_eq!(k7.main.balance, d("-75"));
}

#[tokio::test]
async fn test_exempt_code_over_sqlite() {
    let (ledger, store, _temp) = setup_ledger(OverrideTable::with_exempt_codes(["K7"])).await;
    seed(&store).await;

    let balances = ledger
        .balances_for(&ClientId::new("c3"), LedgerWindow::new(may(1), may(5)))
        .await
        .unwrap();
    assert_eq!(balances.main.balance, d("75"));
}

#[tokio::test]
async fn test_manual_and_payout_writes_persist() {
    let (ledger, store, _temp) = setup_ledger(OverrideTable::new()).await;
    seed(&store).await;
    let c1 = ClientId::new("c1");

    ledger
        .record_manual(
            NewTransaction::new(c1.clone(), may(2), "Phone Bill", d("12.34"), Operation::Subtract)
                .in_column(Column::Panel2),
        )
        .await
        .unwrap();

    let mut session = PayoutSession::new();
    session
        .add(&BetRequest {
            mode: DrawMode::FourD,
            number: "8888".to_string(),
            position: Position::Special,
            sides: vec![Channel::Magnum, Channel::Toto],
            bet_type: BetType::Straight,
            stakes: vec![Stake::new(StakeKind::Big, d("2"))],
        })
        .unwrap();
    assert_eq!(session.total_winnings(), d("220"));
    ledger.save_payout(&c1, may(5), &session).await.unwrap();

    let stored = store.list_manual_transactions(&c1).await.unwrap();
    assert_eq!(stored.len(), 3);
    assert_eq!(stored[1].description, "MT 8888 Straight Big 2 = 220.00 Special");

    let balances = ledger
        .balances_for(&c1, LedgerWindow::new(may(1), may(5)))
        .await
        .unwrap();
    assert_eq!(balances.main.balance, d("-20"));
    assert_eq!(balances.panel1.balance, d("-220"));
    assert_eq!(balances.panel2.balance, d("-12.34"));
}
