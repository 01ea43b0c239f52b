//! Typed entity records and their column-ordered write parameters.

use crate::rows::{SessionRow, SubscriptionRow, UserRow, WalletRow};
use crate::transform::{
    date, flag, number, or_default, payout, provider_role, required_text, text, text_list, time,
    timestamp, TransformError, NOT_APPLICABLE, UNPAID,
};
use crate::value::SqlValue;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

/// An entity record ready to be written.
///
/// `into_params` yields exactly one value per entry of `COLUMNS`, in the
/// same order.
pub trait Record {
    /// Target table.
    const TABLE: &'static str;

    /// Written columns, in parameter order.
    const COLUMNS: &'static [&'static str];

    /// Natural key of the record.
    fn key(&self) -> &str;

    /// Column-ordered write parameters.
    fn into_params(self) -> Vec<SqlValue>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: String,
    pub role: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub age: Option<Decimal>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub language_primary: Option<String>,
    pub languages_all: Vec<String>,
    pub aadhaar_last4: Option<String>,
    pub pan_masked: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub last_login: Option<NaiveDateTime>,
    pub is_active: bool,
    pub is_verified: bool,
    pub profile_complete_pct: Option<Decimal>,
    pub notes: Option<String>,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = TransformError;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: required_text(&r.id, "id")?,
            role: text(&r.role),
            first_name: text(&r.first_name),
            last_name: text(&r.last_name),
            email: text(&r.email),
            phone: text(&r.phone),
            gender: text(&r.gender),
            age: number(&r.age, "age")?,
            city: text(&r.city),
            state: text(&r.state),
            language_primary: text(&r.language_primary),
            languages_all: text_list(&r.languages_all),
            aadhaar_last4: text(&r.aadhaar_last4),
            pan_masked: text(&r.pan_masked),
            created_at: timestamp(&r.created_at, "created_at")?,
            last_login: timestamp(&r.last_login, "last_login")?,
            is_active: flag(&r.is_active),
            is_verified: flag(&r.is_verified),
            profile_complete_pct: number(&r.profile_complete_pct, "profile_complete_pct")?,
            notes: text(&r.notes),
        })
    }
}

impl Record for UserRecord {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "role",
        "first_name",
        "last_name",
        "email",
        "phone",
        "gender",
        "age",
        "city",
        "state",
        "language_primary",
        "languages_all",
        "aadhaar_last4",
        "pan_masked",
        "created_at",
        "last_login",
        "is_active",
        "is_verified",
        "profile_complete_pct",
        "notes",
    ];

    fn key(&self) -> &str {
        &self.id
    }

    fn into_params(self) -> Vec<SqlValue> {
        vec![
            self.id.into(),
            self.role.into(),
            self.first_name.into(),
            self.last_name.into(),
            self.email.into(),
            self.phone.into(),
            self.gender.into(),
            self.age.into(),
            self.city.into(),
            self.state.into(),
            self.language_primary.into(),
            self.languages_all.into(),
            self.aadhaar_last4.into(),
            self.pan_masked.into(),
            self.created_at.into(),
            self.last_login.into(),
            self.is_active.into(),
            self.is_verified.into(),
            self.profile_complete_pct.into(),
            self.notes.into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionRecord {
    pub user_id: String,
    pub tier: Option<String>,
    pub status: Option<String>,
    pub plan_type: Option<String>,
    pub plan_price_monthly: Option<Decimal>,
    pub trial_started_at: Option<NaiveDateTime>,
    pub trial_ends_at: Option<NaiveDateTime>,
    pub premium_started_at: Option<NaiveDateTime>,
    pub premium_ends_at: Option<NaiveDateTime>,
    pub payment_method: Option<String>,
    pub payment_status: String,
    pub auto_renew: bool,
    pub last_payment_date: Option<NaiveDateTime>,
    pub next_billing_date: Option<NaiveDateTime>,
    pub days_remaining: Option<Decimal>,
    pub renewal_reminders_sent: Option<Decimal>,
    pub corporate_org: Option<String>,
    pub festival_free_access: bool,
    pub promo_code_used: Option<String>,
    pub notes: Option<String>,
}

impl TryFrom<SubscriptionRow> for SubscriptionRecord {
    type Error = TransformError;

    fn try_from(r: SubscriptionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: required_text(&r.user_id, "user_id")?,
            tier: text(&r.tier),
            status: text(&r.status),
            plan_type: text(&r.plan_type),
            plan_price_monthly: number(&r.monthly_price, "plan_price_monthly")?,
            trial_started_at: timestamp(&r.trial_start, "trial_started_at")?,
            trial_ends_at: timestamp(&r.trial_end, "trial_ends_at")?,
            premium_started_at: timestamp(&r.premium_start, "premium_started_at")?,
            premium_ends_at: timestamp(&r.premium_end, "premium_ends_at")?,
            payment_method: text(&r.payment_method),
            payment_status: or_default(&r.payment_status, UNPAID),
            auto_renew: flag(&r.auto_renew),
            last_payment_date: timestamp(&r.last_payment, "last_payment_date")?,
            next_billing_date: timestamp(&r.next_billing, "next_billing_date")?,
            days_remaining: number(&r.days_remaining, "days_remaining")?,
            renewal_reminders_sent: number(&r.reminders_sent, "renewal_reminders_sent")?,
            corporate_org: text(&r.corporate_org),
            festival_free_access: flag(&r.festival_free),
            promo_code_used: text(&r.promo_code),
            notes: text(&r.notes),
        })
    }
}

impl Record for SubscriptionRecord {
    const TABLE: &'static str = "subscriptions";
    const COLUMNS: &'static [&'static str] = &[
        "user_id",
        "tier",
        "status",
        "plan_type",
        "plan_price_monthly",
        "trial_started_at",
        "trial_ends_at",
        "premium_started_at",
        "premium_ends_at",
        "payment_method",
        "payment_status",
        "auto_renew",
        "last_payment_date",
        "next_billing_date",
        "days_remaining",
        "renewal_reminders_sent",
        "corporate_org",
        "festival_free_access",
        "promo_code_used",
        "notes",
    ];

    fn key(&self) -> &str {
        &self.user_id
    }

    fn into_params(self) -> Vec<SqlValue> {
        vec![
            self.user_id.into(),
            self.tier.into(),
            self.status.into(),
            self.plan_type.into(),
            self.plan_price_monthly.into(),
            self.trial_started_at.into(),
            self.trial_ends_at.into(),
            self.premium_started_at.into(),
            self.premium_ends_at.into(),
            self.payment_method.into(),
            self.payment_status.into(),
            self.auto_renew.into(),
            self.last_payment_date.into(),
            self.next_billing_date.into(),
            self.days_remaining.into(),
            self.renewal_reminders_sent.into(),
            self.corporate_org.into(),
            self.festival_free_access.into(),
            self.promo_code_used.into(),
            self.notes.into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WalletRecord {
    pub user_id: String,
    pub balance: Option<Decimal>,
    pub total_earned: Option<Decimal>,
    pub total_withdrawn: Option<Decimal>,
    pub total_spent_leads: Option<Decimal>,
    pub pending_payout: Option<Decimal>,
    pub last_credit_date: Option<NaiveDateTime>,
    pub last_debit_date: Option<NaiveDateTime>,
    pub last_payout_date: Option<NaiveDateTime>,
    pub payout_bank: Option<String>,
    pub payout_status: String,
    pub min_payout_threshold: Option<Decimal>,
    pub leads_purchased_total: Option<Decimal>,
    pub leads_purchased_this_month: Option<Decimal>,
    pub session_credits_remaining: Option<Decimal>,
    pub bonus_credits: Option<Decimal>,
    pub referral_credits: Option<Decimal>,
    pub festival_bonus: Option<Decimal>,
    pub notes: Option<String>,
}

impl TryFrom<WalletRow> for WalletRecord {
    type Error = TransformError;

    fn try_from(r: WalletRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: required_text(&r.user_id, "user_id")?,
            balance: number(&r.balance, "balance")?,
            total_earned: number(&r.total_earned, "total_earned")?,
            total_withdrawn: number(&r.total_withdrawn, "total_withdrawn")?,
            total_spent_leads: number(&r.total_spent_leads, "total_spent_leads")?,
            pending_payout: number(&r.pending_payout, "pending_payout")?,
            last_credit_date: timestamp(&r.last_credit_date, "last_credit_date")?,
            last_debit_date: timestamp(&r.last_debit_date, "last_debit_date")?,
            last_payout_date: timestamp(&r.last_payout_date, "last_payout_date")?,
            payout_bank: text(&r.payout_bank),
            payout_status: or_default(&r.payout_status, NOT_APPLICABLE),
            min_payout_threshold: number(&r.min_payout_threshold, "min_payout_threshold")?,
            leads_purchased_total: number(&r.leads_purchased_total, "leads_purchased_total")?,
            leads_purchased_this_month: number(
                &r.leads_purchased_this_month,
                "leads_purchased_this_month",
            )?,
            session_credits_remaining: number(
                &r.session_credits_remaining,
                "session_credits_remaining",
            )?,
            bonus_credits: number(&r.bonus_credits, "bonus_credits")?,
            referral_credits: number(&r.referral_credits, "referral_credits")?,
            festival_bonus: number(&r.festival_bonus, "festival_bonus")?,
            notes: text(&r.notes),
        })
    }
}

impl Record for WalletRecord {
    const TABLE: &'static str = "wallets";
    const COLUMNS: &'static [&'static str] = &[
        "user_id",
        "balance",
        "total_earned",
        "total_withdrawn",
        "total_spent_leads",
        "pending_payout",
        "last_credit_date",
        "last_debit_date",
        "last_payout_date",
        "payout_bank",
        "payout_status",
        "min_payout_threshold",
        "leads_purchased_total",
        "leads_purchased_this_month",
        "session_credits_remaining",
        "bonus_credits",
        "referral_credits",
        "festival_bonus",
        "notes",
    ];

    fn key(&self) -> &str {
        &self.user_id
    }

    fn into_params(self) -> Vec<SqlValue> {
        vec![
            self.user_id.into(),
            self.balance.into(),
            self.total_earned.into(),
            self.total_withdrawn.into(),
            self.total_spent_leads.into(),
            self.pending_payout.into(),
            self.last_credit_date.into(),
            self.last_debit_date.into(),
            self.last_payout_date.into(),
            self.payout_bank.into(),
            self.payout_status.into(),
            self.min_payout_threshold.into(),
            self.leads_purchased_total.into(),
            self.leads_purchased_this_month.into(),
            self.session_credits_remaining.into(),
            self.bonus_credits.into(),
            self.referral_credits.into(),
            self.festival_bonus.into(),
            self.notes.into(),
        ]
    }
}

/// One clinical session. Score deltas are generated by the database and
/// are not part of the record.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub id: String,
    pub patient_id: Option<String>,
    pub patient_name: Option<String>,
    pub provider_id: Option<String>,
    pub provider_name: Option<String>,
    pub provider_role: Option<String>,
    pub session_date: Option<NaiveDate>,
    pub session_time: Option<NaiveTime>,
    pub duration_min: Option<Decimal>,
    pub session_type: Option<String>,
    pub session_mode: Option<String>,
    pub session_number: Option<Decimal>,
    pub language: Option<String>,
    pub pre_phq9_score: Option<Decimal>,
    pub pre_phq9_severity: Option<String>,
    pub pre_gad7_score: Option<Decimal>,
    pub pre_gad7_severity: Option<String>,
    pub pre_mood_self_rated: Option<Decimal>,
    pub pre_sleep_hours: Option<Decimal>,
    pub pre_energy_level: Option<Decimal>,
    pub post_phq9_score: Option<Decimal>,
    pub post_phq9_severity: Option<String>,
    pub post_gad7_score: Option<Decimal>,
    pub post_gad7_severity: Option<String>,
    pub post_mood_self_rated: Option<Decimal>,
    pub post_sleep_hours: Option<Decimal>,
    pub post_energy_level: Option<Decimal>,
    pub session_rating_patient: Option<Decimal>,
    pub session_rating_provider: Option<Decimal>,
    pub session_fee: Option<Decimal>,
    pub fee_payment_status: String,
    pub provider_payout: Decimal,
    pub notes_summary: Option<String>,
    pub crisis_flag: bool,
    pub follow_up_scheduled: bool,
}

impl TryFrom<SessionRow> for SessionRecord {
    type Error = TransformError;

    fn try_from(r: SessionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: required_text(&r.id, "id")?,
            patient_id: text(&r.patient_id),
            patient_name: text(&r.patient_name),
            provider_id: text(&r.provider_id),
            provider_name: text(&r.provider_name),
            provider_role: provider_role(&r.provider_role),
            session_date: date(&r.session_date, "session_date")?,
            session_time: time(&r.session_time, "session_time")?,
            duration_min: number(&r.duration_min, "duration_min")?,
            session_type: text(&r.session_type),
            session_mode: text(&r.session_mode),
            session_number: number(&r.session_number, "session_number")?,
            language: text(&r.language),
            pre_phq9_score: number(&r.pre_phq9_score, "pre_phq9_score")?,
            pre_phq9_severity: text(&r.pre_phq9_severity),
            pre_gad7_score: number(&r.pre_gad7_score, "pre_gad7_score")?,
            pre_gad7_severity: text(&r.pre_gad7_severity),
            pre_mood_self_rated: number(&r.pre_mood, "pre_mood_self_rated")?,
            pre_sleep_hours: number(&r.pre_sleep_hours, "pre_sleep_hours")?,
            pre_energy_level: number(&r.pre_energy_level, "pre_energy_level")?,
            post_phq9_score: number(&r.post_phq9_score, "post_phq9_score")?,
            post_phq9_severity: text(&r.post_phq9_severity),
            post_gad7_score: number(&r.post_gad7_score, "post_gad7_score")?,
            post_gad7_severity: text(&r.post_gad7_severity),
            post_mood_self_rated: number(&r.post_mood, "post_mood_self_rated")?,
            post_sleep_hours: number(&r.post_sleep_hours, "post_sleep_hours")?,
            post_energy_level: number(&r.post_energy_level, "post_energy_level")?,
            session_rating_patient: number(&r.rating_patient, "session_rating_patient")?,
            session_rating_provider: number(&r.rating_provider, "session_rating_provider")?,
            session_fee: number(&r.fee, "session_fee")?,
            fee_payment_status: or_default(&r.fee_status, UNPAID),
            provider_payout: payout(&r.provider_payout, "provider_payout")?,
            notes_summary: text(&r.notes_summary),
            crisis_flag: flag(&r.crisis_flag),
            follow_up_scheduled: flag(&r.follow_up_scheduled),
        })
    }
}

impl Record for SessionRecord {
    const TABLE: &'static str = "sessions";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "patient_id",
        "patient_name",
        "provider_id",
        "provider_name",
        "provider_role",
        "session_date",
        "session_time",
        "duration_min",
        "session_type",
        "session_mode",
        "session_number",
        "language",
        "pre_phq9_score",
        "pre_phq9_severity",
        "pre_gad7_score",
        "pre_gad7_severity",
        "pre_mood_self_rated",
        "pre_sleep_hours",
        "pre_energy_level",
        "post_phq9_score",
        "post_phq9_severity",
        "post_gad7_score",
        "post_gad7_severity",
        "post_mood_self_rated",
        "post_sleep_hours",
        "post_energy_level",
        "session_rating_patient",
        "session_rating_provider",
        "session_fee",
        "fee_payment_status",
        "provider_payout",
        "notes_summary",
        "crisis_flag",
        "follow_up_scheduled",
    ];

    fn key(&self) -> &str {
        &self.id
    }

    fn into_params(self) -> Vec<SqlValue> {
        vec![
            self.id.into(),
            self.patient_id.into(),
            self.patient_name.into(),
            self.provider_id.into(),
            self.provider_name.into(),
            self.provider_role.into(),
            self.session_date.into(),
            self.session_time.into(),
            self.duration_min.into(),
            self.session_type.into(),
            self.session_mode.into(),
            self.session_number.into(),
            self.language.into(),
            self.pre_phq9_score.into(),
            self.pre_phq9_severity.into(),
            self.pre_gad7_score.into(),
            self.pre_gad7_severity.into(),
            self.pre_mood_self_rated.into(),
            self.pre_sleep_hours.into(),
            self.pre_energy_level.into(),
            self.post_phq9_score.into(),
            self.post_phq9_severity.into(),
            self.post_gad7_score.into(),
            self.post_gad7_severity.into(),
            self.post_mood_self_rated.into(),
            self.post_sleep_hours.into(),
            self.post_energy_level.into(),
            self.session_rating_patient.into(),
            self.session_rating_provider.into(),
            self.session_fee.into(),
            self.fee_payment_status.into(),
            self.provider_payout.into(),
            self.notes_summary.into(),
            self.crisis_flag.into(),
            self.follow_up_scheduled.into(),
        ]
    }
}
