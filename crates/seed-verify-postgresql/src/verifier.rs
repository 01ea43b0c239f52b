//! Runs the validation battery against a live database.

use crate::checks::{view_count_sql, Check, CHECKS, VIEWS};
use crate::error::VerifyError;
use crate::report::{CheckKind, CheckOutcome, Rows, ValidationReport, NULL};
use tokio_postgres::{Client, SimpleQueryMessage};
use tracing::{debug, info, warn};

/// Validation runner over a borrowed connection.
///
/// Every check runs as its own autocommit statement, so a failing check
/// never affects the checks after it.
pub struct Verifier<'a> {
    client: &'a Client,
    checks: &'static [Check],
    views: &'static [&'static str],
}

impl<'a> Verifier<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            checks: CHECKS,
            views: VIEWS,
        }
    }

    /// Replace the battery.
    pub fn with_battery(
        mut self,
        checks: &'static [Check],
        views: &'static [&'static str],
    ) -> Self {
        self.checks = checks;
        self.views = views;
        self
    }

    /// Run every check and view count, in order.
    pub async fn run(&self) -> Result<ValidationReport, VerifyError> {
        let view_sql = self
            .views
            .iter()
            .map(|v| view_count_sql(v).map(|sql| (*v, sql)))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            "Running {} validation queries and {} view checks",
            self.checks.len(),
            view_sql.len()
        );

        let mut report = ValidationReport::default();
        for check in self.checks {
            let result = self.query(check.label, check.sql).await;
            report.outcomes.push(CheckOutcome {
                kind: CheckKind::Query { label: check.label },
                result,
            });
        }
        for (name, sql) in view_sql {
            let result = self.query(name, &sql).await;
            report.outcomes.push(CheckOutcome {
                kind: CheckKind::View { name },
                result,
            });
        }

        if report.failures() > 0 {
            warn!("{} validation checks failed", report.failures());
        }
        Ok(report)
    }

    async fn query(&self, label: &str, sql: &str) -> Result<Rows, String> {
        debug!("{}: {}", label, sql);
        match self.client.simple_query(sql).await {
            Ok(messages) => Ok(render_rows(&messages)),
            Err(e) => {
                let message = describe(&e);
                warn!("{}: {}", label, message);
                Err(message)
            }
        }
    }
}

fn render_rows(messages: &[SimpleQueryMessage]) -> Rows {
    messages
        .iter()
        .filter_map(|m| match m {
            SimpleQueryMessage::Row(row) => Some(
                (0..row.len())
                    .map(|i| row.get(i).unwrap_or(NULL).to_string())
                    .collect(),
            ),
            _ => None,
        })
        .collect()
}

/// Single-line description of a query error.
fn describe(e: &tokio_postgres::Error) -> String {
    let message = match e.as_db_error() {
        Some(db) => db.message().to_string(),
        None => e.to_string(),
    };
    message.split_whitespace().collect::<Vec<_>>().join(" ")
}
