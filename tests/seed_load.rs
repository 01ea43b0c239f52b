//! Load and validation scenarios against a live PostgreSQL.
//!
//! Run with `cargo test --test seed_load -- --ignored` and point
//! `MANS360_TEST_DB_URL` at a scratch database.

use seed_loader::testing::{column_sum, fixture_path, fresh_test_db, row_count, DB_LOCK};
use seed_populate_postgresql::{LoadState, LoaderError, SeedLoader};
use seed_source::{OpenedSource, SeedSource};
use seed_types::TransformError;
use seed_verify_postgresql::{Check, Verifier, CHECKS, VIEWS};
use std::io::Write;
use tokio_postgres::Client;

async fn open(source: SeedSource) -> OpenedSource {
    source.open().await.unwrap()
}

async fn workbook() -> OpenedSource {
    open(SeedSource::Workbook(fixture_path("seed_minimal.xlsx"))).await
}

async fn script() -> OpenedSource {
    open(SeedSource::Script(fixture_path("seed_minimal.sql"))).await
}

async fn totals(client: &Client) -> Vec<String> {
    let mut totals = Vec::new();
    for table in ["users", "subscriptions", "wallets", "sessions"] {
        totals.push(row_count(client, table).await.unwrap().to_string());
    }
    totals.push(column_sum(client, "wallets", "balance").await.unwrap());
    totals.push(column_sum(client, "wallets", "total_earned").await.unwrap());
    totals.push(column_sum(client, "sessions", "phq9_delta").await.unwrap());
    totals
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at MANS360_TEST_DB_URL"]
async fn test_workbook_load_is_idempotent() {
    let _guard = DB_LOCK.lock().await;
    let mut conn = fresh_test_db().await.unwrap();

    let first = SeedLoader::new(&mut conn.client)
        .load(workbook().await)
        .await
        .unwrap();
    let users = first.entity("users").unwrap();
    assert_eq!(users.read, 2);
    assert_eq!(users.skipped, 1);
    assert_eq!(first.entity("sessions").unwrap().written, 1);

    let before = totals(&conn.client).await;
    assert_eq!(&before[..4], ["2", "1", "2", "1"]);

    // Edit one write-once column and one updatable column.
    conn.client
        .batch_execute(
            "UPDATE users SET first_name = 'Edited', notes = 'edited' WHERE id = 'USR-PAT-001'",
        )
        .await
        .unwrap();

    let second = SeedLoader::new(&mut conn.client)
        .load(workbook().await)
        .await
        .unwrap();
    let sessions = second.entity("sessions").unwrap();
    assert_eq!(sessions.written, 0);
    assert_eq!(sessions.unchanged, 1);
    assert_eq!(totals(&conn.client).await, before);

    let row = conn
        .client
        .query_one(
            "SELECT first_name, notes FROM users WHERE id = 'USR-PAT-001'",
            &[],
        )
        .await
        .unwrap();
    assert_eq!(row.get::<_, String>(0), "Edited");
    assert_eq!(row.get::<_, String>(1), "first load");

    conn.close().await;
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at MANS360_TEST_DB_URL"]
async fn test_workbook_coercions_reach_the_database() {
    let _guard = DB_LOCK.lock().await;
    let mut conn = fresh_test_db().await.unwrap();
    SeedLoader::new(&mut conn.client)
        .load(workbook().await)
        .await
        .unwrap();

    let session = conn
        .client
        .query_one(
            "SELECT provider_role::text, fee_payment_status::text, provider_payout::text, phq9_delta \
             FROM sessions WHERE id = 'SES-001'",
            &[],
        )
        .await
        .unwrap();
    assert_eq!(session.get::<_, String>(0), "therapist");
    assert_eq!(session.get::<_, String>(1), "unpaid");
    assert_eq!(session.get::<_, String>(2), "0.00");
    assert_eq!(session.get::<_, i32>(3), -4);

    let wallet = conn
        .client
        .query_one(
            "SELECT payout_status::text FROM wallets WHERE user_id = 'USR-PAT-001'",
            &[],
        )
        .await
        .unwrap();
    assert_eq!(wallet.get::<_, String>(0), "N/A");

    let user = conn
        .client
        .query_one(
            "SELECT languages_all FROM users WHERE id = 'USR-THR-001'",
            &[],
        )
        .await
        .unwrap();
    assert_eq!(user.get::<_, Vec<String>>(0), vec!["ta", "en"]);

    conn.close().await;
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at MANS360_TEST_DB_URL"]
async fn test_script_and_workbook_are_equivalent() {
    let _guard = DB_LOCK.lock().await;

    let mut conn = fresh_test_db().await.unwrap();
    SeedLoader::new(&mut conn.client)
        .load(script().await)
        .await
        .unwrap();
    let from_script = totals(&conn.client).await;
    conn.close().await;

    let mut conn = fresh_test_db().await.unwrap();
    SeedLoader::new(&mut conn.client)
        .load(workbook().await)
        .await
        .unwrap();
    let from_workbook = totals(&conn.client).await;
    conn.close().await;

    assert_eq!(from_script, from_workbook);
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at MANS360_TEST_DB_URL"]
async fn test_failed_load_leaves_nothing_behind() {
    let _guard = DB_LOCK.lock().await;
    let mut conn = fresh_test_db().await.unwrap();

    let mut file = tempfile::Builder::new().suffix(".sql").tempfile().unwrap();
    writeln!(
        file,
        "INSERT INTO users (id, role) VALUES ('USR-PAT-900', 'patient');\n\
         INSERT INTO sessions (id, patient_id, provider_id) \
         VALUES ('SES-900', 'USR-PAT-404', 'USR-PAT-900');"
    )
    .unwrap();

    let mut loader = SeedLoader::new(&mut conn.client);
    let err = loader
        .load(open(SeedSource::Script(file.path().to_path_buf())).await)
        .await
        .unwrap_err();
    assert!(matches!(err, LoaderError::PostgreSQL(_)));
    assert_eq!(loader.state(), LoadState::Failed);
    assert!(matches!(
        loader.load(script().await).await,
        Err(LoaderError::InvalidState { .. })
    ));

    assert_eq!(row_count(&conn.client, "users").await.unwrap(), 0);
    assert_eq!(row_count(&conn.client, "sessions").await.unwrap(), 0);
    conn.close().await;
}

async fn assert_all_empty(client: &Client) {
    for table in ["users", "subscriptions", "wallets", "sessions"] {
        assert_eq!(row_count(client, table).await.unwrap(), 0, "{table}");
    }
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at MANS360_TEST_DB_URL"]
async fn test_rejected_last_session_rolls_back_every_sheet() {
    let _guard = DB_LOCK.lock().await;
    let mut conn = fresh_test_db().await.unwrap();

    // SES-001 points at a patient that does not exist.
    let source = open(SeedSource::Workbook(fixture_path("seed_dangling_session.xlsx"))).await;
    let mut loader = SeedLoader::new(&mut conn.client);
    let err = loader.load(source).await.unwrap_err();
    match &err {
        LoaderError::Write { table, key, .. } => {
            assert_eq!(*table, "sessions");
            assert_eq!(key, "SES-001");
        }
        other => panic!("expected a write error, got {other:?}"),
    }
    assert_eq!(loader.state(), LoadState::Failed);

    assert_all_empty(&conn.client).await;
    conn.close().await;
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at MANS360_TEST_DB_URL"]
async fn test_unparseable_wallet_rolls_back_earlier_sheets() {
    let _guard = DB_LOCK.lock().await;
    let mut conn = fresh_test_db().await.unwrap();

    // The second wallet row has a balance of "lots".
    let source = open(SeedSource::Workbook(fixture_path("seed_bad_balance.xlsx"))).await;
    let mut loader = SeedLoader::new(&mut conn.client);
    let err = loader.load(source).await.unwrap_err();
    match &err {
        LoaderError::Transform { table, key, error } => {
            assert_eq!(*table, "wallets");
            assert_eq!(key, "USR-THR-001");
            assert_eq!(
                *error,
                TransformError::InvalidNumber {
                    column: "balance",
                    value: "lots".to_string()
                }
            );
        }
        other => panic!("expected a transform error, got {other:?}"),
    }
    assert_eq!(loader.state(), LoadState::Failed);

    assert_all_empty(&conn.client).await;
    conn.close().await;
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at MANS360_TEST_DB_URL"]
async fn test_reset_drops_prior_dataset() {
    let _guard = DB_LOCK.lock().await;
    let mut conn = fresh_test_db().await.unwrap();
    conn.client
        .batch_execute("INSERT INTO users (id, role) VALUES ('USR-OLD-001', 'admin')")
        .await
        .unwrap();

    let mut loader = SeedLoader::new(&mut conn.client);
    loader.reset().await.unwrap();
    assert_eq!(loader.state(), LoadState::Reset);

    let leftovers = conn
        .client
        .query_one(
            "SELECT \
               (SELECT COUNT(*) FROM pg_tables WHERE schemaname = 'public' \
                  AND tablename IN ('users', 'subscriptions', 'wallets', 'sessions')) \
             + (SELECT COUNT(*) FROM pg_type WHERE typname IN ('user_role', 'session_type', 'payout_status'))",
            &[],
        )
        .await
        .unwrap();
    assert_eq!(leftovers.get::<_, i64>(0), 0);

    conn.client
        .batch_execute(seed_loader::testing::FIXTURE_SCHEMA)
        .await
        .unwrap();
    SeedLoader::new(&mut conn.client)
        .load(workbook().await)
        .await
        .unwrap();

    let old = conn
        .client
        .query_opt("SELECT id FROM users WHERE id = 'USR-OLD-001'", &[])
        .await
        .unwrap();
    assert!(old.is_none());
    assert_eq!(row_count(&conn.client, "users").await.unwrap(), 2);
    conn.close().await;
}

static ISOLATION_CHECKS: &[Check] = &[
    Check {
        label: "Users by role",
        sql: "SELECT role, COUNT(*) FROM users GROUP BY role ORDER BY role",
    },
    Check {
        label: "Crisis sessions",
        sql: "SELECT COUNT(*) FROM sessions WHERE crisis_flag = TRUE",
    },
];

#[tokio::test]
#[ignore = "Requires PostgreSQL at MANS360_TEST_DB_URL"]
async fn test_missing_view_is_one_warning() {
    let _guard = DB_LOCK.lock().await;
    let mut conn = fresh_test_db().await.unwrap();
    SeedLoader::new(&mut conn.client)
        .load(workbook().await)
        .await
        .unwrap();

    // The fixture schema has no v_provider_dashboard.
    let report = Verifier::new(&conn.client)
        .with_battery(ISOLATION_CHECKS, VIEWS)
        .run()
        .await
        .unwrap();
    let text = report.to_string();

    assert_eq!(report.outcomes.len(), 5);
    assert_eq!(report.failures(), 1);
    assert_eq!(text.lines().filter(|l| l.contains("WARNING")).count(), 1);
    assert!(text.contains("  View v_provider_dashboard: WARNING: "));
    assert!(text.contains("    patient | 1\n"));
    assert!(text.contains("    therapist | 1\n"));
    assert!(text.contains("  Crisis sessions:\n    0\n"));
    assert!(text.contains("  View v_patient_360: 1 rows"));
    assert!(text.contains("  View v_session_outcomes: 1 rows"));

    conn.close().await;
}

#[tokio::test]
#[ignore = "Requires PostgreSQL at MANS360_TEST_DB_URL"]
async fn test_full_battery_reports_every_check() {
    let _guard = DB_LOCK.lock().await;
    let conn = fresh_test_db().await.unwrap();

    let report = Verifier::new(&conn.client).run().await.unwrap();
    assert_eq!(report.outcomes.len(), CHECKS.len() + VIEWS.len());
    for check in CHECKS {
        assert!(report.get(check.label).is_some(), "{}", check.label);
    }
    // Tables the loader never creates are missing from the fixture schema.
    assert!(report.get("Leads").unwrap().is_failure());
    assert!(!report.get("Users by role").unwrap().is_failure());

    conn.close().await;
}
