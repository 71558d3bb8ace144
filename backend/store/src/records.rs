//! Raw table rows and their conversion into domain records.
//!
//! Rows mirror the SQLite column types exactly (`TEXT` money, `INTEGER`
//! microsecond timestamps). Converting into a [`flock_core`] record
//! re-validates every amount, so a row that slipped past the schema surfaces
//! as [`StoreError::Corrupt`] instead of an invalid record.

use chrono::{DateTime, Utc};
use flock_core::{Donation, Money, Project, Reward};
use uuid::Uuid;

use crate::errors::{Result, StoreError};

pub(crate) const PROJECT_COLUMNS: &str =
    "id, created_at, is_active, title, funding_goal, default_amount";

pub(crate) const REWARD_COLUMNS: &str =
    "id, project_id, title, available_times, donation_amount";

pub(crate) const DONATION_COLUMNS: &str = "id, project_id, created_at, charged_at, amount, \
    selected_reward, full_name, email, postal_address, transaction_ref";

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProjectRow {
    pub id: i64,
    pub created_at: i64,
    pub is_active: bool,
    pub title: String,
    pub funding_goal: String,
    pub default_amount: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RewardRow {
    pub id: i64,
    pub project_id: i64,
    pub title: String,
    pub available_times: Option<i64>,
    pub donation_amount: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DonationRow {
    pub id: String,
    pub project_id: i64,
    pub created_at: i64,
    pub charged_at: Option<i64>,
    pub amount: String,
    pub selected_reward: Option<i64>,
    pub full_name: String,
    pub email: String,
    pub postal_address: Option<String>,
    pub transaction_ref: String,
}

// ─────────────────────────────────────────────────────────
// Column codecs
// ─────────────────────────────────────────────────────────

pub(crate) fn to_micros(at: DateTime<Utc>) -> i64 {
    at.timestamp_micros()
}

pub(crate) fn from_micros(micros: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| StoreError::Corrupt(format!("timestamp out of range: {micros}")))
}

pub(crate) fn parse_money(column: &str, raw: &str) -> Result<Money> {
    raw.parse()
        .map_err(|e| StoreError::Corrupt(format!("{column} = {raw:?}: {e}")))
}

// ─────────────────────────────────────────────────────────
// Row → record
// ─────────────────────────────────────────────────────────

impl TryFrom<ProjectRow> for Project {
    type Error = StoreError;

    fn try_from(row: ProjectRow) -> Result<Self> {
        Ok(Project {
            id: row.id,
            created_at: from_micros(row.created_at)?,
            is_active: row.is_active,
            title: row.title,
            funding_goal: parse_money("funding_goal", &row.funding_goal)?,
            default_amount: row
                .default_amount
                .as_deref()
                .map(|raw| parse_money("default_amount", raw))
                .transpose()?,
        })
    }
}

impl TryFrom<RewardRow> for Reward {
    type Error = StoreError;

    fn try_from(row: RewardRow) -> Result<Self> {
        let available_times = row
            .available_times
            .map(u32::try_from)
            .transpose()
            .map_err(|e| StoreError::Corrupt(format!("available_times of reward {}: {e}", row.id)))?;

        Ok(Reward {
            id: row.id,
            project_id: row.project_id,
            title: row.title,
            available_times,
            donation_amount: parse_money("donation_amount", &row.donation_amount)?,
        })
    }
}

impl TryFrom<DonationRow> for Donation {
    type Error = StoreError;

    fn try_from(row: DonationRow) -> Result<Self> {
        Ok(Donation {
            id: Uuid::parse_str(&row.id)
                .map_err(|e| StoreError::Corrupt(format!("donation id {:?}: {e}", row.id)))?,
            project_id: row.project_id,
            created_at: from_micros(row.created_at)?,
            charged_at: row.charged_at.map(from_micros).transpose()?,
            amount: parse_money("amount", &row.amount)?,
            selected_reward: row.selected_reward,
            full_name: row.full_name,
            email: row.email,
            postal_address: row.postal_address,
            transaction: row.transaction_ref,
        })
    }
}

/// Convert a batch of rows, failing on the first corrupt one.
pub(crate) fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>>
where
    T: TryFrom<R, Error = StoreError>,
{
    rows.into_iter().map(T::try_from).collect()
}
