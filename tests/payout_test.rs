use chrono::{NaiveDate, TimeZone, Utc};
use creditbook::domain::labels;
use creditbook::engine::FixedWeekdayCalendar;
use creditbook::payout::{
    parse_description, BetType, Channel, DrawMode, Position, Stake, StakeKind,
};
use creditbook::{
    BalanceCalculator, BetRequest, Client, ClientCategory, ClientId, Column, Decimal,
    LedgerError, LedgerService, LedgerWindow, MemoryStore, NewTransaction, Operation, PayoutError,
    PayoutSaveError, PayoutSession,
};
use std::sync::Arc;

fn d(s: &str) -> Decimal {
    Decimal::from_str_canonical(s).unwrap()
}

fn settlement_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 3).unwrap()
}

fn service(store: Arc<MemoryStore>) -> LedgerService {
    LedgerService::new(
        store,
        BalanceCalculator::default(),
        Arc::new(FixedWeekdayCalendar::default()),
    )
}

fn paper_client() -> Client {
    Client {
        id: ClientId::new("c1"),
        code: "A1".to_string(),
        name: "Client A1".to_string(),
        phone: None,
        category: ClientCategory::Paper,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

fn three_d_third(stake: &str) -> BetRequest {
    BetRequest {
        mode: DrawMode::ThreeD,
        number: "123".to_string(),
        position: Position::Third,
        sides: vec![Channel::Toto],
        bet_type: BetType::Straight,
        stakes: vec![Stake::new(StakeKind::ThreeAbc, d(stake))],
    }
}

fn four_d_box() -> BetRequest {
    BetRequest {
        mode: DrawMode::FourD,
        number: "1234".to_string(),
        position: Position::First,
        sides: vec![Channel::Magnum],
        bet_type: BetType::Box,
        stakes: vec![Stake::new(StakeKind::Big, d("240"))],
    }
}

/// Session whose total is 1200: 8 x 150 at the 3D third tier.
fn session_of_1200() -> PayoutSession {
    let mut session = PayoutSession::new();
    session.add(&three_d_third("8")).unwrap();
    assert_eq!(session.total_winnings(), d("1200"));
    session
}

#[test]
fn test_box_example_from_permutations() {
    let mut session = PayoutSession::new();
    assert_eq!(session.add(&four_d_box()).unwrap(), 1);
    assert_eq!(session.total_winnings(), d("27500"));
    assert_eq!(session.description(), "M 1234 Box Big 240 = 27500.00 1st");
}

#[test]
fn test_invalid_request_blocks_session() {
    let mut session = PayoutSession::new();
    let mut bad = four_d_box();
    bad.number = "12345".to_string();
    assert!(matches!(
        session.add(&bad),
        Err(PayoutError::InvalidNumberLength { expected: 4, actual: 5, .. })
    ));
    assert!(session.is_empty());
}

#[tokio::test]
async fn test_save_writes_itemized_and_main_entries() {
    let store = Arc::new(MemoryStore::new());
    let svc = service(store.clone());
    let client_id = ClientId::new("c1");

    let (panel, main) = svc
        .save_payout(&client_id, settlement_date(), &session_of_1200())
        .await
        .unwrap();

    assert_eq!(store.transactions().len(), 2);
    for tx in [&panel, &main] {
        assert_eq!(tx.amount, d("1200"));
        assert_eq!(tx.operation, Operation::Subtract);
        assert_eq!(tx.date, settlement_date());
        assert_eq!(tx.category_label, labels::WIN_SETTLEMENT);
        assert!(tx.is_visible);
        assert_eq!(tx.client_id, client_id);
    }
    assert_eq!(panel.column, Column::Panel1);
    assert_eq!(panel.description, "T 123 Straight 3ABC 8 = 1200.00 3rd");
    assert_eq!(main.column, Column::Main);
    assert!(main.description.is_empty());
}

#[tokio::test]
async fn test_main_failure_reports_itemized_entry() {
    let store = Arc::new(MemoryStore::new().with_failing_column(Column::Main));
    let svc = service(store.clone());

    let err = svc
        .save_payout(&ClientId::new("c1"), settlement_date(), &session_of_1200())
        .await
        .unwrap_err();

    let orphan = err.orphaned().cloned().expect("panel1 entry should be reported");
    assert!(matches!(err, PayoutSaveError::MainWriteFailed { .. }));
    assert_eq!(orphan.column, Column::Panel1);
    assert_eq!(store.transactions(), vec![orphan]);
}

#[tokio::test]
async fn test_first_write_failure_leaves_store_untouched() {
    let store = Arc::new(MemoryStore::new().with_failing_column(Column::Panel1));
    let svc = service(store.clone());

    let err = svc
        .save_payout(&ClientId::new("c1"), settlement_date(), &session_of_1200())
        .await
        .unwrap_err();

    assert!(matches!(err, PayoutSaveError::NothingWritten(_)));
    assert!(err.orphaned().is_none());
    assert!(store.transactions().is_empty());
}

#[tokio::test]
async fn test_edit_rederives_amount_from_entries() {
    let store = Arc::new(MemoryStore::new());
    let svc = service(store.clone());

    let mut session = session_of_1200();
    session.add(&four_d_box()).unwrap();
    let (panel, main) = svc
        .save_payout(&ClientId::new("c1"), settlement_date(), &session)
        .await
        .unwrap();
    assert_eq!(panel.amount, d("28700"));

    let edited = svc
        .edit_payout(&panel, &[(1, d("25000"))])
        .await
        .unwrap();
    assert_eq!(edited.total_winnings(), d("26200"));

    let stored = store.transactions();
    let panel_now = stored.iter().find(|t| t.id == panel.id).unwrap();
    assert_eq!(panel_now.amount, d("26200"));
    let entries = parse_description(&panel_now.description).unwrap();
    assert_eq!(entries[1].win_amount, d("25000"));
    assert_eq!(entries[0].win_amount, d("1200"));

    let main_now = stored.iter().find(|t| t.id == main.id).unwrap();
    assert_eq!(main_now.amount, d("26200"));
    assert!(main_now.description.is_empty());

    let window = LedgerWindow::new(settlement_date(), settlement_date());
    let view = svc
        .column_view(&paper_client(), window, Column::Main)
        .await
        .unwrap();
    assert_eq!(view.balance, d("-26200"));
}

#[tokio::test]
async fn test_edit_leaves_unrelated_main_entries_alone() {
    let store = Arc::new(MemoryStore::new());
    let svc = service(store.clone());
    let client_id = ClientId::new("c1");

    let (panel, main) = svc
        .save_payout(&client_id, settlement_date(), &session_of_1200())
        .await
        .unwrap();
    let other_day = svc
        .save_payout(
            &client_id,
            settlement_date().succ_opt().unwrap(),
            &session_of_1200(),
        )
        .await
        .unwrap()
        .1;

    svc.edit_payout(&panel, &[(0, d("1000"))]).await.unwrap();

    let stored = store.transactions();
    let amount_of = |id: &str| stored.iter().find(|t| t.id == id).unwrap().amount;
    assert_eq!(amount_of(&main.id), d("1000"));
    assert_eq!(amount_of(&other_day.id), d("1200"));
}

#[tokio::test]
async fn test_saved_amount_matches_description() {
    let store = Arc::new(MemoryStore::new());
    let svc = service(store.clone());

    let mut session = PayoutSession::new();
    session
        .add(&BetRequest {
            mode: DrawMode::FourD,
            number: "1123".to_string(),
            position: Position::First,
            sides: vec![Channel::Magnum, Channel::Toto, Channel::Singapore],
            bet_type: BetType::Box,
            stakes: vec![Stake::new(StakeKind::Big, d("1"))],
        })
        .unwrap();

    let (panel, main) = svc
        .save_payout(&ClientId::new("c1"), settlement_date(), &session)
        .await
        .unwrap();
    assert_eq!(panel.description, "MTS 1123 Box Big 1 = 76.39 1st");

    let described: Decimal = parse_description(&panel.description)
        .unwrap()
        .iter()
        .map(|e| e.win_amount)
        .sum();
    assert_eq!(panel.amount, described);
    assert_eq!(main.amount, described);

    // Re-deriving without edits changes nothing.
    let repriced = svc.edit_payout(&panel, &[]).await.unwrap();
    assert_eq!(repriced.total_winnings(), d("76.39"));
    let stored = store.transactions();
    assert!(stored.iter().all(|t| t.amount == d("76.39")));
}

#[test]
fn test_oversized_stake_is_rejected() {
    let mut session = PayoutSession::new();
    let mut huge = four_d_box();
    huge.bet_type = BetType::Straight;
    huge.stakes = vec![Stake::new(StakeKind::Big, d("79228162514264337593543950335"))];
    assert_eq!(session.add(&huge), Err(PayoutError::AmountOverflow));
    assert!(session.is_empty());
}

#[tokio::test]
async fn test_edit_rejects_non_payout_and_bad_edits() {
    let store = Arc::new(MemoryStore::new());
    let svc = service(store.clone());

    let plain = svc
        .record_manual(NewTransaction::new(
            ClientId::new("c1"),
            settlement_date(),
            "Phone Bill",
            d("30"),
            Operation::Subtract,
        ))
        .await
        .unwrap();
    assert!(matches!(
        svc.edit_payout(&plain, &[]).await,
        Err(LedgerError::NotPayout(_))
    ));

    let (panel, _) = svc
        .save_payout(&ClientId::new("c1"), settlement_date(), &session_of_1200())
        .await
        .unwrap();
    assert!(matches!(
        svc.edit_payout(&panel, &[(3, d("1"))]).await,
        Err(LedgerError::Payout(PayoutError::EntryOutOfRange(3)))
    ));
    assert!(matches!(
        svc.edit_payout(&panel, &[(0, d("-1"))]).await,
        Err(LedgerError::Payout(PayoutError::NegativeWinAmount(0)))
    ));
}
