//! Named row types for the four seed sheets.
//!
//! Each sheet has a fixed positional column order. The reader hands over a
//! row of cells once, and from then on every column is addressed by name.

use crate::cell::Cell;

/// A row of a named workbook sheet.
pub trait SheetRow: Sized {
    /// Sheet name in the workbook.
    const SHEET: &'static str;

    /// Field names in sheet column order.
    const COLUMNS: &'static [&'static str];

    /// Number of positional columns the sheet must provide.
    const WIDTH: usize = Self::COLUMNS.len();

    /// Build the row from positional cells. Missing trailing cells are empty.
    fn from_cells(cells: Vec<Cell>) -> Self;

    /// The primary key cell. Rows whose key is blank are not loaded.
    fn key(&self) -> &Cell;
}

macro_rules! sheet_row {
    (
        $(#[$meta:meta])*
        $name:ident, sheet = $sheet:literal, key = $key:ident,
        [$($field:ident),+ $(,)?]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            $(pub $field: Cell,)+
        }

        impl SheetRow for $name {
            const SHEET: &'static str = $sheet;
            const COLUMNS: &'static [&'static str] = &[$(stringify!($field)),+];

            fn from_cells(cells: Vec<Cell>) -> Self {
                let mut cells = cells.into_iter();
                Self {
                    $($field: cells.next().unwrap_or_default(),)+
                }
            }

            fn key(&self) -> &Cell {
                &self.$key
            }
        }
    };
}

sheet_row!(
    /// `Users_Master` sheet row.
    UserRow, sheet = "Users_Master", key = id,
    [
        id, role, first_name, last_name, email, phone,
        gender, age, city, state, language_primary, languages_all,
        aadhaar_last4, pan_masked, created_at, last_login,
        is_active, is_verified, profile_complete_pct, notes,
    ]
);

sheet_row!(
    /// `Subscriptions` sheet row. `user_name` and `user_role` are reference
    /// columns for people editing the sheet and are not loaded.
    SubscriptionRow, sheet = "Subscriptions", key = user_id,
    [
        user_id, user_name, user_role, tier, status,
        trial_start, trial_end, premium_start, premium_end,
        plan_type, monthly_price, payment_method, payment_status,
        auto_renew, last_payment, next_billing, days_remaining,
        reminders_sent, corporate_org, festival_free, promo_code, notes,
    ]
);

sheet_row!(
    /// `Wallet_Credits` sheet row.
    WalletRow, sheet = "Wallet_Credits", key = user_id,
    [
        user_id, user_name, user_role, balance,
        total_earned, total_withdrawn, total_spent_leads, pending_payout,
        last_credit_date, last_debit_date, last_payout_date,
        payout_bank, payout_status, min_payout_threshold,
        leads_purchased_total, leads_purchased_this_month,
        session_credits_remaining, bonus_credits, referral_credits,
        festival_bonus, notes,
    ]
);

sheet_row!(
    /// `Sessions_BeforeAfter` sheet row.
    ///
    /// The three `*_delta` columns are spreadsheet formulas. The database
    /// computes the same values itself, so they are never written.
    SessionRow, sheet = "Sessions_BeforeAfter", key = id,
    [
        id, patient_id, patient_name, provider_id, provider_name, provider_role,
        session_date, session_time, duration_min, session_type, session_mode,
        session_number, language,
        pre_phq9_score, pre_phq9_severity, pre_gad7_score, pre_gad7_severity,
        pre_mood, pre_sleep_hours, pre_energy_level,
        post_phq9_score, post_phq9_severity, post_gad7_score, post_gad7_severity,
        post_mood, post_sleep_hours, post_energy_level,
        phq9_delta, gad7_delta, mood_delta,
        rating_patient, rating_provider, fee, fee_status,
        provider_payout, notes_summary, crisis_flag, follow_up_scheduled,
    ]
);
