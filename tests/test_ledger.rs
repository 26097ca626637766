//! Ledger tests: the in-memory collection cache and its verified-delta
//! mutation strategy, against the stub API.

mod common;

use agakayi_sdk::models::{Category, TransactionDraft, TransactionType};
use agakayi_sdk::pipeline::{Filter, SortKey, SortOrder};
use agakayi_sdk::Ledger;

// ---------------------------------------------------------------------------
// load / refresh
// ---------------------------------------------------------------------------

#[test]
fn load_builds_the_collection() {
    let stub = common::spawn_agakayi_stub();
    let (sdk, _tmp) = common::logged_in_sdk(&stub);

    let ledger = Ledger::load(&sdk.transactions()).unwrap();
    assert_eq!(ledger.len(), 3);
    assert!(!ledger.is_empty());
}

#[test]
fn refresh_failure_keeps_previous_contents() {
    let stub = common::spawn_agakayi_stub();
    let (sdk, _tmp) = common::logged_in_sdk(&stub);

    let mut ledger = Ledger::load(&sdk.transactions()).unwrap();
    assert_eq!(ledger.len(), 3);

    // Invalidate the session; the refresh fails and the view does not
    // silently reset to empty.
    sdk.auth().logout().unwrap();
    assert!(ledger.refresh(&sdk.transactions()).is_err());
    assert_eq!(ledger.len(), 3);
}

// ---------------------------------------------------------------------------
// add / remove
// ---------------------------------------------------------------------------

#[test]
fn add_appends_the_verified_server_record() {
    let stub = common::spawn_agakayi_stub();
    let (sdk, _tmp) = common::logged_in_sdk(&stub);

    let mut ledger = Ledger::load(&sdk.transactions()).unwrap();
    let draft = TransactionDraft {
        title: "Freelance gig".to_string(),
        amount: 400.0,
        kind: TransactionType::Income,
        category: Category::Freelance,
        date: "2024-03-12".to_string(),
        note: Some("invoice #12".to_string()),
    };

    let created = ledger.add(&sdk.transactions(), &draft).unwrap();
    assert_eq!(created.id, "tx-004");
    assert_eq!(ledger.len(), 4);

    // The local copy is the server's record, not the draft.
    let local = ledger.transactions().last().unwrap();
    assert_eq!(local.id, "tx-004");
    assert_eq!(local.user_id, common::TEST_USER_ID);
    assert_eq!(local.amount, 400.0);
}

#[test]
fn remove_drops_the_row_after_the_server_acknowledges() {
    let stub = common::spawn_agakayi_stub();
    let (sdk, _tmp) = common::logged_in_sdk(&stub);

    let mut ledger = Ledger::load(&sdk.transactions()).unwrap();
    let removed = ledger.remove(&sdk.transactions(), "tx-003").unwrap();
    assert!(removed);
    assert_eq!(ledger.len(), 2);

    // Remote state agrees.
    assert_eq!(sdk.transactions().list().unwrap().len(), 2);
}

#[test]
fn remove_absent_id_is_a_local_noop() {
    let stub = common::spawn_agakayi_stub();
    let (sdk, _tmp) = common::logged_in_sdk(&stub);

    let mut ledger = Ledger::load(&sdk.transactions()).unwrap();

    // No such row locally: no request, no error, collection unchanged.
    let removed = ledger.remove(&sdk.transactions(), "tx-999").unwrap();
    assert!(!removed);
    assert_eq!(ledger.len(), 3);
}

#[test]
fn remove_failure_leaves_local_state_unchanged() {
    let stub = common::spawn_agakayi_stub();
    let (sdk, _tmp) = common::logged_in_sdk(&stub);

    let mut ledger = Ledger::load(&sdk.transactions()).unwrap();

    // Delete the row behind the ledger's back, then try through it: the
    // remote call fails and the local row stays.
    sdk.transactions().delete("tx-002").unwrap();
    assert!(ledger.remove(&sdk.transactions(), "tx-002").is_err());
    assert_eq!(ledger.len(), 3);
}

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

#[test]
fn summary_and_breakdown_cover_the_full_collection() {
    let stub = common::spawn_agakayi_stub();
    let (sdk, _tmp) = common::logged_in_sdk(&stub);

    let ledger = Ledger::load(&sdk.transactions()).unwrap();

    let summary = ledger.summary();
    assert_eq!(summary.total_income, 1000.0);
    assert_eq!(summary.total_expenses, 250.0);
    assert_eq!(summary.balance, 750.0);

    let breakdown = ledger.breakdown();
    assert_eq!(breakdown.len(), 2);
    assert_eq!(breakdown[0].category, Category::Food);
    assert_eq!(breakdown[0].amount, 200.0);
    assert!((breakdown[0].percentage - 80.0).abs() < 1e-9);
    assert_eq!(breakdown[1].category, Category::Transport);
    assert!((breakdown[1].percentage - 20.0).abs() < 1e-9);
}

#[test]
fn view_applies_filter_and_sort() {
    let stub = common::spawn_agakayi_stub();
    let (sdk, _tmp) = common::logged_in_sdk(&stub);

    let ledger = Ledger::load(&sdk.transactions()).unwrap();

    let expenses_only = Filter {
        date_from: Some("2024-03-02".to_string()),
        ..Filter::default()
    };
    let view = ledger.view(&expenses_only, SortKey::Amount, SortOrder::Desc);
    assert_eq!(view.len(), 2);
    assert_eq!(view[0].id, "tx-002");
    assert_eq!(view[1].id, "tx-003");

    // The summary ignores the filter.
    assert_eq!(ledger.summary().total_income, 1000.0);
}

#[test]
fn export_csv_covers_the_derived_view() {
    let stub = common::spawn_agakayi_stub();
    let (sdk, _tmp) = common::logged_in_sdk(&stub);

    let ledger = Ledger::load(&sdk.transactions()).unwrap();
    let csv = ledger
        .export_csv(&Filter::default(), SortKey::Date, SortOrder::Asc)
        .unwrap();

    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Title,Amount,Date,Category,Type");
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1], "Monthly salary,1000,2024-03-01,Salary,income");
    assert_eq!(lines[2], "Groceries,-200,2024-03-05,Food,expense");
    assert_eq!(lines[3], "Bus pass,-50,2024-03-07,Transport,expense");
}
