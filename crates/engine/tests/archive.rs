use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use engine::{
    AccountKind, AccountStatus, ArchiveQuery, ArchivedRecord, DebtKind, DebtStatus, Engine,
    EngineError, EntityKind, Money, NewTransaction, PageRequest, Store, TransactionKind,
};

fn engine() -> Engine {
    Engine::builder().store(Store::new()).build()
}

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
}

fn account(engine: &mut Engine, name: &str, balance_minor: i64) -> Uuid {
    engine
        .new_account(name, AccountKind::Checking, Money::new(balance_minor), None, at(1, 0))
        .unwrap()
        .id
}

fn default_query() -> ArchiveQuery {
    ArchiveQuery {
        page: PageRequest::new(1, 10).unwrap(),
        search: None,
        start_date: None,
        end_date: None,
        tx_kind: None,
    }
}

#[test]
fn archive_restore_round_trip_changes_only_status_and_updated_at() {
    let mut engine = engine();
    let id = account(&mut engine, "Checking", 120_00);
    let before = engine.account(id).unwrap().clone();

    engine.archive_entity(EntityKind::Account, id, at(2, 0)).unwrap();
    assert_eq!(engine.account(id).unwrap().status, AccountStatus::Archived);

    engine.restore_entity(EntityKind::Account, id, at(3, 0)).unwrap();
    let after = engine.account(id).unwrap().clone();

    assert_eq!(after.status, AccountStatus::Active);
    let mut normalized = after.clone();
    normalized.updated_at = before.updated_at;
    assert_eq!(normalized, before);
}

#[test]
fn archive_transitions_reject_the_wrong_state() {
    let mut engine = engine();
    let id = account(&mut engine, "Checking", 0);

    let err = engine
        .restore_entity(EntityKind::Account, id, at(2, 0))
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    engine.archive_entity(EntityKind::Account, id, at(2, 0)).unwrap();
    let err = engine
        .archive_entity(EntityKind::Account, id, at(3, 0))
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    let err = engine
        .archive_entity(EntityKind::Account, Uuid::new_v4(), at(3, 0))
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[test]
fn delete_requires_the_archived_state() {
    let mut engine = engine();
    let id = account(&mut engine, "Checking", 0);

    let err = engine.delete_archived(EntityKind::Account, id).unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    let err = engine
        .delete_archived(EntityKind::Account, Uuid::new_v4())
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));

    engine.archive_entity(EntityKind::Account, id, at(2, 0)).unwrap();
    engine.delete_archived(EntityKind::Account, id).unwrap();
    assert!(engine.account(id).is_err());
}

#[test]
fn deleting_an_account_freezes_labels_into_dependents() {
    let mut engine = engine();
    let a = account(&mut engine, "Old checking", 500_00);
    let b = account(&mut engine, "Savings", 0);
    engine
        .transfer(a, b, Money::new(100_00), None, at(1, 1), at(1, 1))
        .unwrap();
    let goal = engine.new_goal("Bike", Money::new(400_00), at(1, 0)).unwrap();
    engine
        .record_goal_transfer(goal.id, a, Money::new(50_00), at(1, 2), at(1, 2))
        .unwrap();
    let tx_id = engine.account(b).unwrap().history[0].transaction_id.unwrap();

    engine.archive_entity(EntityKind::Account, a, at(2, 0)).unwrap();
    engine.delete_archived(EntityKind::Account, a).unwrap();

    let tx = engine.transaction(tx_id).unwrap();
    assert_eq!(tx.account_label.as_deref(), Some("Old checking"));
    assert_eq!(
        engine.account_display_name(tx.account_id, tx.account_label.as_deref()),
        Some("Old checking (removed)".to_string())
    );
    // The surviving side still resolves live.
    assert_eq!(
        engine.account_display_name(b, tx.to_account_label.as_deref()),
        Some("Savings".to_string())
    );

    let goal = engine.goal(goal.id).unwrap();
    assert_eq!(
        goal.transfers[0].from_account_label.as_deref(),
        Some("Old checking")
    );
}

#[test]
fn deleting_a_category_freezes_labels_into_transactions() {
    let mut engine = engine();
    let account_id = account(&mut engine, "Checking", 100_00);
    let category = engine
        .new_category("Groceries", engine::CategoryKind::Expense, at(1, 0))
        .unwrap();
    let tx = engine
        .record_transaction(
            NewTransaction {
                account_id,
                kind: TransactionKind::Expense,
                amount: Money::new(10_00),
                category_id: Some(category.id),
                note: None,
                occurred_at: at(1, 1),
            },
            at(1, 1),
        )
        .unwrap();

    engine
        .archive_entity(EntityKind::Category, category.id, at(2, 0))
        .unwrap();
    engine.delete_archived(EntityKind::Category, category.id).unwrap();

    let tx = engine.transaction(tx.id).unwrap();
    assert_eq!(tx.category_label.as_deref(), Some("Groceries"));
    assert_eq!(
        engine.category_display_name(category.id, tx.category_label.as_deref()),
        Some("Groceries (removed)".to_string())
    );
}

#[test]
fn restore_always_lands_on_active() {
    let mut engine = engine();
    let debt = engine
        .new_debt("Loan", DebtKind::Owed, Money::new(100_00), at(1, 0))
        .unwrap();
    engine
        .record_debt_payment(debt.id, Money::new(100_00), None, at(1, 1), at(1, 1))
        .unwrap();
    assert_eq!(engine.debt(debt.id).unwrap().status, DebtStatus::Paid);

    engine.archive_entity(EntityKind::Debt, debt.id, at(2, 0)).unwrap();
    engine.restore_entity(EntityKind::Debt, debt.id, at(3, 0)).unwrap();

    // The paid status is not remembered across the archive.
    assert_eq!(engine.debt(debt.id).unwrap().status, DebtStatus::Active);
    assert_eq!(engine.debt(debt.id).unwrap().remaining, Money::ZERO);
}

#[test]
fn stats_count_per_collection_and_track_the_oldest() {
    let mut engine = engine();
    let a = account(&mut engine, "A", 0);
    let b = account(&mut engine, "B", 0);
    let category = engine
        .new_category("Misc", engine::CategoryKind::Expense, at(1, 0))
        .unwrap();

    assert_eq!(engine.archive_stats().total, 0);
    assert_eq!(engine.archive_stats().oldest, None);

    engine.archive_entity(EntityKind::Account, a, at(5, 0)).unwrap();
    engine.archive_entity(EntityKind::Account, b, at(3, 0)).unwrap();
    engine
        .archive_entity(EntityKind::Category, category.id, at(4, 0))
        .unwrap();

    let stats = engine.archive_stats();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.accounts, 2);
    assert_eq!(stats.categories, 1);
    assert_eq!(stats.transactions, 0);
    assert_eq!(stats.oldest, Some(at(3, 0)));
}

#[test]
fn listing_filters_searches_and_paginates() {
    let mut engine = engine();
    let mut ids = Vec::new();
    for (index, name) in ["Rainy day", "Bike fund", "Holiday"].iter().enumerate() {
        let goal = engine.new_goal(name, Money::new(100_00), at(1, 0)).unwrap();
        engine
            .archive_entity(EntityKind::Goal, goal.id, at(10 + index as u32, 0))
            .unwrap();
        ids.push(goal.id);
    }

    // Newest archived first.
    let page = engine.list_archived(EntityKind::Goal, &default_query()).unwrap();
    assert_eq!(page.total, 3);
    let first = match &page.items[0] {
        ArchivedRecord::Goal(goal) => goal.id,
        other => panic!("expected a goal, got {other:?}"),
    };
    assert_eq!(first, ids[2]);

    // Case-insensitive search on the name.
    let page = engine
        .list_archived(
            EntityKind::Goal,
            &ArchiveQuery {
                search: Some("bike".to_string()),
                ..default_query()
            },
        )
        .unwrap();
    assert_eq!(page.total, 1);

    // Date range on updated_at.
    let page = engine
        .list_archived(
            EntityKind::Goal,
            &ArchiveQuery {
                start_date: Some(at(11, 0)),
                end_date: Some(at(12, 0)),
                ..default_query()
            },
        )
        .unwrap();
    assert_eq!(page.total, 2);

    // Pagination slices after filtering.
    let page = engine
        .list_archived(
            EntityKind::Goal,
            &ArchiveQuery {
                page: PageRequest::new(2, 2).unwrap(),
                ..default_query()
            },
        )
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 1);

    let err = engine
        .list_archived(
            EntityKind::Goal,
            &ArchiveQuery {
                start_date: Some(at(12, 0)),
                end_date: Some(at(11, 0)),
                ..default_query()
            },
        )
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[test]
fn archived_transactions_can_be_filtered_by_kind() {
    let mut engine = engine();
    let a = account(&mut engine, "A", 1000_00);
    let b = account(&mut engine, "B", 0);

    let expense = engine
        .record_transaction(
            NewTransaction {
                account_id: a,
                kind: TransactionKind::Expense,
                amount: Money::new(10_00),
                category_id: None,
                note: Some("coffee".to_string()),
                occurred_at: at(1, 1),
            },
            at(1, 1),
        )
        .unwrap();
    engine
        .transfer(a, b, Money::new(100_00), None, at(1, 2), at(1, 2))
        .unwrap();
    let transfer_id = engine.account(b).unwrap().history[0].transaction_id.unwrap();

    engine
        .archive_entity(EntityKind::Transaction, expense.id, at(2, 0))
        .unwrap();
    engine
        .archive_entity(EntityKind::Transaction, transfer_id, at(2, 1))
        .unwrap();

    let page = engine
        .list_archived(
            EntityKind::Transaction,
            &ArchiveQuery {
                tx_kind: Some(TransactionKind::Transfer),
                ..default_query()
            },
        )
        .unwrap();
    assert_eq!(page.total, 1);
    match &page.items[0] {
        ArchivedRecord::Transaction(tx) => assert_eq!(tx.kind, TransactionKind::Transfer),
        other => panic!("expected a transaction, got {other:?}"),
    }

    // The sub-filter is meaningless for other collections.
    let err = engine
        .list_archived(
            EntityKind::Goal,
            &ArchiveQuery {
                tx_kind: Some(TransactionKind::Expense),
                ..default_query()
            },
        )
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[test]
fn unknown_archive_type_is_rejected_at_parse_time() {
    assert!("accounts".parse::<EntityKind>().is_ok());
    assert!("subscriptions".parse::<EntityKind>().is_ok());
    let err = "wallets".parse::<EntityKind>().unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}
