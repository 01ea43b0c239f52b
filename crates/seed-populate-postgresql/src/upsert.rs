//! Conflict-aware writes for seed entities.

use crate::error::LoaderError;
use seed_types::{
    Record, SessionRecord, SessionRow, SheetRow, SqlValue, SubscriptionRecord, SubscriptionRow,
    TransformError, UserRecord, UserRow, WalletRecord, WalletRow,
};
use tokio_postgres::types::ToSql;
use tokio_postgres::{Statement, Transaction};

/// What happens when a written record collides with an existing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Overwrite only these columns; every other column keeps its value.
    UpdateColumns(&'static [&'static str]),
    /// Leave the existing row as it is.
    DoNothing,
}

/// The write declared for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityWrite {
    pub table: &'static str,
    pub conflict_key: &'static str,
    pub columns: &'static [&'static str],
    pub policy: ConflictPolicy,
}

pub const USERS: EntityWrite = EntityWrite {
    table: UserRecord::TABLE,
    conflict_key: "id",
    columns: UserRecord::COLUMNS,
    policy: ConflictPolicy::UpdateColumns(&["last_login", "is_active", "notes"]),
};

pub const SUBSCRIPTIONS: EntityWrite = EntityWrite {
    table: SubscriptionRecord::TABLE,
    conflict_key: "user_id",
    columns: SubscriptionRecord::COLUMNS,
    policy: ConflictPolicy::UpdateColumns(&["tier", "status", "days_remaining", "notes"]),
};

pub const WALLETS: EntityWrite = EntityWrite {
    table: WalletRecord::TABLE,
    conflict_key: "user_id",
    columns: WalletRecord::COLUMNS,
    policy: ConflictPolicy::UpdateColumns(&["balance", "total_earned", "notes"]),
};

/// Sessions are immutable once written.
pub const SESSIONS: EntityWrite = EntityWrite {
    table: SessionRecord::TABLE,
    conflict_key: "id",
    columns: SessionRecord::COLUMNS,
    policy: ConflictPolicy::DoNothing,
};

/// A record type loaded from a workbook sheet.
pub trait SeedEntity: Record + TryFrom<Self::Row, Error = TransformError> {
    type Row: SheetRow;
    const WRITE: EntityWrite;
}

impl SeedEntity for UserRecord {
    type Row = UserRow;
    const WRITE: EntityWrite = USERS;
}

impl SeedEntity for SubscriptionRecord {
    type Row = SubscriptionRow;
    const WRITE: EntityWrite = SUBSCRIPTIONS;
}

impl SeedEntity for WalletRecord {
    type Row = WalletRow;
    const WRITE: EntityWrite = WALLETS;
}

impl SeedEntity for SessionRecord {
    type Row = SessionRow;
    const WRITE: EntityWrite = SESSIONS;
}

/// Render the upsert statement for `write`, one `$n` placeholder per column.
pub fn upsert_sql(write: &EntityWrite) -> String {
    let placeholders = (1..=write.columns.len())
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ");

    let action = match write.policy {
        ConflictPolicy::UpdateColumns(columns) => format!(
            "DO UPDATE SET {}",
            columns
                .iter()
                .map(|c| format!("{c} = EXCLUDED.{c}"))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        ConflictPolicy::DoNothing => "DO NOTHING".to_string(),
    };

    format!(
        "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT ({}) {}",
        write.table,
        write.columns.join(", "),
        placeholders,
        write.conflict_key,
        action
    )
}

/// Prepare the upsert for `R` inside `tx`. The prepared statement carries
/// the column types the bind values adapt to.
pub async fn prepare<R: SeedEntity>(tx: &Transaction<'_>) -> Result<Statement, LoaderError> {
    Ok(tx.prepare(&upsert_sql(&R::WRITE)).await?)
}

/// Write one record. Returns the number of rows inserted or updated: 0 when
/// the conflict policy left an existing row untouched.
pub async fn upsert<R: SeedEntity>(
    tx: &Transaction<'_>,
    statement: &Statement,
    record: R,
) -> Result<u64, LoaderError> {
    let key = record.key().to_string();
    let params = record.into_params();
    let refs: Vec<&(dyn ToSql + Sync)> = params
        .iter()
        .map(|p: &SqlValue| p as &(dyn ToSql + Sync))
        .collect();

    tx.execute(statement, &refs)
        .await
        .map_err(|error| LoaderError::Write {
            table: R::WRITE.table,
            key,
            error,
        })
}
