//! Transactional seed loading.
//!
//! A [`SeedLoader`] drives one run against one connection:
//!
//! ```text
//! Idle -> Connected -> [Reset] -> Loading -> Committed
//!                                    |
//!                                    +-> RolledBack -> Failed
//! ```
//!
//! A reset is its own committed step. The load is a single transaction:
//! either every record is committed or none is.

use crate::error::LoaderError;
use crate::reset::reset_statements;
use crate::upsert::{prepare, upsert, SeedEntity};
use seed_source::{OpenedSource, Workbook};
use seed_types::{SessionRecord, SheetRow, SubscriptionRecord, UserRecord, WalletRecord};
use std::fmt;
use std::time::{Duration, Instant};
use tokio_postgres::{Client, Transaction};
use tracing::{debug, info, warn};

/// Lifecycle of a loader run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// No connection yet.
    #[default]
    Idle,
    Connected,
    Reset,
    Loading,
    Committed,
    RolledBack,
    Failed,
}

impl LoadState {
    fn can_move_to(self, next: LoadState) -> bool {
        use LoadState::*;
        matches!(
            (self, next),
            (Idle, Connected)
                | (Connected, Reset)
                | (Connected, Loading)
                | (Reset, Loading)
                | (Loading, Committed)
                | (Loading, RolledBack)
                | (RolledBack, Failed)
                | (Connected, Failed)
                | (Reset, Failed)
        )
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoadState::Idle => "idle",
            LoadState::Connected => "connected",
            LoadState::Reset => "reset",
            LoadState::Loading => "loading",
            LoadState::Committed => "committed",
            LoadState::RolledBack => "rolled back",
            LoadState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Per-entity counters from a workbook load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityCount {
    pub table: &'static str,
    /// Rows with a key, read from the sheet.
    pub read: usize,
    /// Rows inserted or updated.
    pub written: u64,
    /// Rows whose conflict policy left the existing row untouched.
    pub unchanged: u64,
    /// Rows skipped for a blank key.
    pub skipped: usize,
}

/// Outcome of a committed load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Size of the executed script, for script loads.
    pub script_bytes: Option<usize>,
    /// Per-entity counters in load order, for workbook loads.
    pub entities: Vec<EntityCount>,
    pub duration: Duration,
}

impl LoadSummary {
    pub fn entity(&self, table: &str) -> Option<&EntityCount> {
        self.entities.iter().find(|e| e.table == table)
    }
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(bytes) = self.script_bytes {
            write!(f, "executed {bytes} bytes of SQL")?;
        }
        for (i, e) in self.entities.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(
                f,
                "{}: {} read, {} written, {} unchanged, {} skipped",
                e.table, e.read, e.written, e.unchanged, e.skipped
            )?;
        }
        write!(f, " in {:?}", self.duration)
    }
}

/// Runs a reset and a load over one borrowed connection.
pub struct SeedLoader<'a> {
    client: &'a mut Client,
    state: LoadState,
}

impl<'a> SeedLoader<'a> {
    /// Wrap a live connection. The loader starts in [`LoadState::Connected`].
    pub fn new(client: &'a mut Client) -> Self {
        Self {
            client,
            state: LoadState::Connected,
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    fn transition(&mut self, next: LoadState) -> Result<(), LoaderError> {
        if !self.state.can_move_to(next) {
            return Err(LoaderError::InvalidState {
                from: self.state,
                to: next,
            });
        }
        debug!("Loader state: {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }

    /// Drop every seed table and enumerated type, then commit.
    ///
    /// A failure leaves the loader in [`LoadState::Failed`].
    pub async fn reset(&mut self) -> Result<(), LoaderError> {
        if !self.state.can_move_to(LoadState::Reset) {
            return Err(LoaderError::InvalidState {
                from: self.state,
                to: LoadState::Reset,
            });
        }

        match run_reset(self.client).await {
            Ok(count) => {
                self.transition(LoadState::Reset)?;
                info!("Reset complete: dropped {} objects", count);
                Ok(())
            }
            Err(e) => {
                self.transition(LoadState::Failed)?;
                Err(e)
            }
        }
    }

    /// Load `source` in one transaction and commit.
    ///
    /// On any error every write of this load is rolled back, the loader ends
    /// in [`LoadState::Failed`] and the error is returned.
    pub async fn load(&mut self, source: OpenedSource) -> Result<LoadSummary, LoaderError> {
        self.transition(LoadState::Loading)?;
        let start = Instant::now();

        let tx = match self.client.transaction().await {
            Ok(tx) => tx,
            Err(e) => {
                self.state = LoadState::Failed;
                return Err(e.into());
            }
        };

        match apply(&tx, source).await {
            Ok(mut summary) => match tx.commit().await {
                Ok(()) => {
                    summary.duration = start.elapsed();
                    self.transition(LoadState::Committed)?;
                    info!("Load committed: {}", summary);
                    Ok(summary)
                }
                Err(e) => {
                    // A failed COMMIT leaves nothing applied.
                    self.transition(LoadState::RolledBack)?;
                    self.transition(LoadState::Failed)?;
                    Err(e.into())
                }
            },
            Err(e) => {
                warn!("Load failed, rolling back: {}", e);
                if let Err(rollback) = tx.rollback().await {
                    warn!("Rollback error: {}", rollback);
                }
                self.transition(LoadState::RolledBack)?;
                self.transition(LoadState::Failed)?;
                Err(e)
            }
        }
    }
}

async fn run_reset(client: &mut Client) -> Result<usize, LoaderError> {
    let statements = reset_statements()?;
    info!("Resetting schema");

    let tx = client.transaction().await?;
    for statement in &statements {
        debug!("{}", statement);
        if let Err(error) = tx.batch_execute(statement).await {
            return Err(LoaderError::Reset {
                statement: statement.clone(),
                error,
            });
        }
    }
    tx.commit().await?;
    Ok(statements.len())
}

async fn apply(tx: &Transaction<'_>, source: OpenedSource) -> Result<LoadSummary, LoaderError> {
    match source {
        OpenedSource::Script(sql) => {
            info!("Executing seed script ({} bytes)", sql.len());
            tx.batch_execute(&sql).await?;
            Ok(LoadSummary {
                script_bytes: Some(sql.len()),
                ..Default::default()
            })
        }
        OpenedSource::Workbook(mut workbook) => {
            info!("Loading workbook {}", workbook.path().display());
            // Users first; sessions reference two users each.
            let entities = vec![
                load_sheet::<UserRecord>(tx, &mut workbook).await?,
                load_sheet::<SubscriptionRecord>(tx, &mut workbook).await?,
                load_sheet::<WalletRecord>(tx, &mut workbook).await?,
                load_sheet::<SessionRecord>(tx, &mut workbook).await?,
            ];
            Ok(LoadSummary {
                entities,
                ..Default::default()
            })
        }
    }
}

async fn load_sheet<R: SeedEntity>(
    tx: &Transaction<'_>,
    workbook: &mut Workbook,
) -> Result<EntityCount, LoaderError> {
    let table = R::WRITE.table;
    let mut rows = workbook.sheet::<R::Row>()?;
    let statement = prepare::<R>(tx).await?;

    let mut count = EntityCount {
        table,
        ..Default::default()
    };

    for row in rows.by_ref() {
        let key = row.key().to_string();
        let record = R::try_from(row).map_err(|error| LoaderError::Transform {
            table,
            key: key.clone(),
            error,
        })?;

        let affected = upsert(tx, &statement, record).await?;
        if affected == 0 {
            debug!("{} '{}' already present, left unchanged", table, key);
            count.unchanged += 1;
        } else {
            count.written += affected;
        }
    }

    count.read = rows.read();
    count.skipped = rows.skipped();
    info!(
        "{}: {} rows from sheet '{}' ({} written, {} unchanged, {} skipped)",
        table,
        count.read,
        <R::Row as SheetRow>::SHEET,
        count.written,
        count.unchanged,
        count.skipped
    );
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions() {
        use LoadState::*;
        assert!(Connected.can_move_to(Reset));
        assert!(Connected.can_move_to(Loading));
        assert!(Reset.can_move_to(Loading));
        assert!(Loading.can_move_to(Committed));
        assert!(Loading.can_move_to(RolledBack));
        assert!(RolledBack.can_move_to(Failed));

        assert!(!Idle.can_move_to(Loading));
        assert!(!Committed.can_move_to(Loading));
        assert!(!Failed.can_move_to(Loading));
        assert!(!Loading.can_move_to(Reset));
        assert!(!Reset.can_move_to(Reset));
    }

    #[test]
    fn test_summary_display() {
        let summary = LoadSummary {
            script_bytes: None,
            entities: vec![EntityCount {
                table: "users",
                read: 3,
                written: 2,
                unchanged: 1,
                skipped: 1,
            }],
            duration: Duration::from_millis(5),
        };
        assert_eq!(
            summary.to_string(),
            "users: 3 read, 2 written, 1 unchanged, 1 skipped in 5ms"
        );
        assert_eq!(summary.entity("users").map(|e| e.read), Some(3));
        assert!(summary.entity("wallets").is_none());
    }
}
