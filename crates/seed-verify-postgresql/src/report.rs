//! Validation report.

use std::fmt;

/// Separator between the fields of one result row.
pub const FIELD_SEPARATOR: &str = " | ";

/// Rendering of SQL NULL.
pub const NULL: &str = "NULL";

/// What a check looked at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckKind {
    /// A labeled aggregate query.
    Query { label: &'static str },
    /// A row count over a view.
    View { name: &'static str },
}

impl CheckKind {
    pub fn label(&self) -> String {
        match self {
            CheckKind::Query { label } => label.to_string(),
            CheckKind::View { name } => format!("View {name}"),
        }
    }
}

/// Result rows of a check, each value rendered as text.
pub type Rows = Vec<Vec<String>>;

/// Result of one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub kind: CheckKind,
    pub result: Result<Rows, String>,
}

impl CheckOutcome {
    pub fn is_failure(&self) -> bool {
        self.result.is_err()
    }

    /// For a view check, the counted rows.
    pub fn view_count(&self) -> Option<i64> {
        match (&self.kind, &self.result) {
            (CheckKind::View { .. }, Ok(rows)) => rows.first()?.first()?.parse().ok(),
            _ => None,
        }
    }
}

/// One outcome per declared check and view, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub outcomes: Vec<CheckOutcome>,
}

impl ValidationReport {
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    pub fn get(&self, label: &str) -> Option<&CheckOutcome> {
        self.outcomes.iter().find(|o| o.kind.label() == label)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(50);
        writeln!(f, "{rule}")?;
        writeln!(f, "DATA VALIDATION")?;
        writeln!(f, "{rule}")?;

        for outcome in &self.outcomes {
            let label = outcome.kind.label();
            match (&outcome.kind, &outcome.result) {
                (_, Err(message)) => writeln!(f, "  {label}: WARNING: {message}")?,
                (CheckKind::View { .. }, Ok(rows)) => {
                    let count = rows
                        .first()
                        .and_then(|r| r.first())
                        .map(String::as_str)
                        .unwrap_or("0");
                    writeln!(f, "  {label}: {count} rows")?
                }
                (CheckKind::Query { .. }, Ok(rows)) => {
                    writeln!(f, "  {label}:")?;
                    for row in rows {
                        writeln!(f, "    {}", row.join(FIELD_SEPARATOR))?;
                    }
                }
            }
        }
        writeln!(f, "{rule}")
    }
}
