//! Destructive schema reset.
//!
//! Drops every seed table and enumerated type so the schema can be recreated
//! from scratch. Only the identifiers declared here are ever dropped.

use crate::error::LoaderError;

/// Tables dropped by a reset, dependents first.
pub const RESET_TABLES: &[&str] = &[
    "test_scenarios",
    "fact_qr_tracking",
    "doctor_asset_orders",
    "doctor_redemptions",
    "doctor_credits",
    "doctor_referrals",
    "doctor_profiles",
    "audit_logs",
    "wallet_transactions",
    "leads",
    "certificates",
    "assessments",
    "cbt_session_data",
    "patient_profiles",
    "wallets",
    "sessions",
    "provider_credentials",
    "subscriptions",
    "iam_role_permissions",
    "permissions",
    "users",
];

/// Enumerated types dropped after the tables.
pub const RESET_TYPES: &[&str] = &[
    "user_role",
    "subscription_tier",
    "subscription_status",
    "payment_status",
    "session_type",
    "session_mode",
    "phq9_severity",
    "gad7_severity",
    "payout_status",
    "profile_status",
    "verification_status",
];

/// Kind of object a drop statement removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropKind {
    Table,
    Type,
}

impl DropKind {
    fn keyword(self) -> &'static str {
        match self {
            DropKind::Table => "TABLE",
            DropKind::Type => "TYPE",
        }
    }

    fn whitelist(self) -> &'static [&'static str] {
        match self {
            DropKind::Table => RESET_TABLES,
            DropKind::Type => RESET_TYPES,
        }
    }
}

/// Render `DROP <kind> IF EXISTS <name> CASCADE`.
///
/// `name` must be one of the declared identifiers for `kind` and a plain
/// lower-case SQL identifier.
pub fn drop_statement(kind: DropKind, name: &str) -> Result<String, LoaderError> {
    if !kind.whitelist().contains(&name) || !is_plain_identifier(name) {
        return Err(LoaderError::InvalidIdentifier(name.to_string()));
    }
    Ok(format!("DROP {} IF EXISTS {name} CASCADE", kind.keyword()))
}

/// Every reset statement in execution order.
pub fn reset_statements() -> Result<Vec<String>, LoaderError> {
    RESET_TABLES
        .iter()
        .map(|name| drop_statement(DropKind::Table, name))
        .chain(
            RESET_TYPES
                .iter()
                .map(|name| drop_statement(DropKind::Type, name)),
        )
        .collect()
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
