//! The fixed validation battery.

use crate::error::VerifyError;

/// A labeled reporting query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Check {
    pub label: &'static str,
    pub sql: &'static str,
}

const fn check(label: &'static str, sql: &'static str) -> Check {
    Check { label, sql }
}

/// Reporting queries, in report order.
pub const CHECKS: &[Check] = &[
    check("Users by role", "SELECT role, COUNT(*) FROM users GROUP BY role ORDER BY role"),
    check(
        "Subscriptions by tier/status",
        "SELECT tier, status, COUNT(*) FROM subscriptions GROUP BY tier, status ORDER BY tier, status",
    ),
    check("Wallets", "SELECT COUNT(*), SUM(balance), SUM(total_earned) FROM wallets"),
    check(
        "Sessions by type",
        "SELECT session_type, COUNT(*), AVG(phq9_delta)::numeric(4,1) AS avg_phq9_change \
         FROM sessions GROUP BY session_type",
    ),
    check("Crisis sessions", "SELECT COUNT(*) FROM sessions WHERE crisis_flag = TRUE"),
    check(
        "Provider credentials",
        "SELECT profile_status, COUNT(*) FROM provider_credentials GROUP BY profile_status",
    ),
    check("Patient Profiles", "SELECT COUNT(*) FROM patient_profiles"),
    check(
        "CBT Data",
        "SELECT COUNT(*), worksheet_type FROM cbt_session_data GROUP BY worksheet_type",
    ),
    check(
        "Assessments",
        "SELECT assessment_type, COUNT(*), AVG(score)::numeric(4,1) FROM assessments GROUP BY assessment_type",
    ),
    check(
        "Certificates",
        "SELECT certificate_type, COUNT(*) FROM certificates GROUP BY certificate_type",
    ),
    check("Leads", "SELECT status, COUNT(*) FROM leads GROUP BY status"),
    check(
        "Wallet Transactions",
        "SELECT transaction_type, COUNT(*), SUM(amount) FROM wallet_transactions GROUP BY transaction_type",
    ),
    check("Audit Logs", "SELECT action, COUNT(*) FROM audit_logs GROUP BY action"),
    check(
        "Doctor Profiles",
        "SELECT referral_tier, COUNT(*) FROM doctor_profiles GROUP BY referral_tier",
    ),
    check(
        "Doctor Referrals",
        "SELECT status, COUNT(*) FROM doctor_referrals GROUP BY status",
    ),
    check("Doctor Dashboard View", "SELECT * FROM v_doctor_dashboard"),
];

/// Views whose row counts are reported.
pub const VIEWS: &[&str] = &["v_patient_360", "v_provider_dashboard", "v_session_outcomes"];

/// `SELECT COUNT(*)` over a view.
pub fn view_count_sql(view: &str) -> Result<String, VerifyError> {
    let mut chars = view.chars();
    let plain = matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if !plain {
        return Err(VerifyError::InvalidView(view.to_string()));
    }
    Ok(format!("SELECT COUNT(*) FROM {view}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battery_shape() {
        assert_eq!(CHECKS.len(), 16);
        assert_eq!(CHECKS[0].label, "Users by role");
        assert_eq!(CHECKS[15].label, "Doctor Dashboard View");

        let mut labels: Vec<_> = CHECKS.iter().map(|c| c.label).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), CHECKS.len());
    }

    #[test]
    fn test_checks_are_read_only() {
        for c in CHECKS {
            assert!(c.sql.starts_with("SELECT "), "{}", c.label);
            assert!(!c.sql.contains(';'), "{}", c.label);
        }
    }

    #[test]
    fn test_view_count_sql() {
        assert_eq!(
            view_count_sql("v_patient_360").unwrap(),
            "SELECT COUNT(*) FROM v_patient_360"
        );
        assert!(view_count_sql("v_x; DROP TABLE users").is_err());
        assert!(view_count_sql("V_Upper").is_err());
        for v in VIEWS {
            assert!(view_count_sql(v).is_ok());
        }
    }
}
