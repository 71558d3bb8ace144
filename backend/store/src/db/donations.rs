//! Repository functions for the `donations` table.

use chrono::{DateTime, Utc};
use flock_core::{Donation, ModelError, NewDonation, Validate};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::db::{get_project, get_reward};
use crate::errors::{Result, StoreError};
use crate::records::{convert_all, to_micros, DonationRow, DONATION_COLUMNS};

/// Record a new, uncharged donation under a fresh random id.
///
/// When a reward is selected it must belong to the same project and the
/// amount must meet its threshold. The cap check and the insert are one
/// statement, so concurrent backers cannot claim more slots than the reward
/// offers; the loser gets [`StoreError::RewardExhausted`].
pub async fn insert_donation(pool: &SqlitePool, input: &NewDonation) -> Result<Donation> {
    input.validate().map_err(ModelError::from)?;
    get_project(pool, input.project_id).await?;
    if let Some(reward_id) = input.selected_reward {
        let reward = get_reward(pool, reward_id).await?;
        input.validate_against(&reward)?;
    }

    let id = Uuid::new_v4();
    let query = format!(
        r#"
        INSERT INTO donations
            (id, project_id, created_at, charged_at, amount, selected_reward,
             full_name, email, postal_address, transaction_ref)
        SELECT ?1, ?2, ?3, NULL, ?4, ?5, ?6, ?7, ?8, ?9
        WHERE ?5 IS NULL
           OR EXISTS (
                SELECT 1 FROM rewards r
                WHERE r.id = ?5
                  AND (r.available_times IS NULL
                       OR (SELECT COUNT(*) FROM donations d WHERE d.selected_reward = r.id)
                          < r.available_times)
           )
        RETURNING {DONATION_COLUMNS}
        "#
    );
    let row = sqlx::query_as::<_, DonationRow>(&query)
        .bind(id.to_string())
        .bind(input.project_id)
        .bind(to_micros(input.created_at))
        .bind(input.amount.to_string())
        .bind(input.selected_reward)
        .bind(&input.full_name)
        .bind(&input.email)
        .bind(&input.postal_address)
        .bind(&input.transaction)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => {
            let donation = Donation::try_from(row)?;
            debug!(
                "Recorded donation {} of {} to project {}",
                donation.id, donation.amount, donation.project_id
            );
            Ok(donation)
        }
        None => Err(match input.selected_reward {
            Some(reward_id) => exhausted_or_missing(pool, reward_id).await,
            None => StoreError::Corrupt("donation insert returned no row".to_string()),
        }),
    }
}

/// Explain why a reward slot could not be claimed.
///
/// A reward deleted after the threshold check also fails the conditional
/// insert; it is reported as missing rather than exhausted.
async fn exhausted_or_missing(pool: &SqlitePool, reward_id: i64) -> StoreError {
    match get_reward(pool, reward_id).await {
        Ok(_) => {
            warn!("Reward {reward_id} is exhausted; donation rejected");
            StoreError::RewardExhausted(reward_id)
        }
        Err(err) => err,
    }
}

pub async fn get_donation(pool: &SqlitePool, id: Uuid) -> Result<Donation> {
    let query = format!("SELECT {DONATION_COLUMNS} FROM donations WHERE id = ?1");
    sqlx::query_as::<_, DonationRow>(&query)
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| StoreError::not_found("donation", id))?
        .try_into()
}

/// Donations of a project, most recent first.
pub async fn list_donations(pool: &SqlitePool, project_id: i64) -> Result<Vec<Donation>> {
    let query = format!(
        "SELECT {DONATION_COLUMNS} FROM donations \
         WHERE project_id = ?1 \
         ORDER BY created_at DESC"
    );
    let rows = sqlx::query_as::<_, DonationRow>(&query)
        .bind(project_id)
        .fetch_all(pool)
        .await?;
    convert_all(rows)
}

/// Confirm payment for a donation.
///
/// The transition happens at most once: a donation that is already charged
/// is left untouched and [`ModelError::AlreadyCharged`] is returned. When
/// `transaction` is `None` the stored processor reference is kept.
pub async fn mark_charged(
    pool: &SqlitePool,
    id: Uuid,
    charged_at: DateTime<Utc>,
    transaction: Option<&str>,
) -> Result<Donation> {
    let query = format!(
        "UPDATE donations \
         SET charged_at = ?1, transaction_ref = COALESCE(?2, transaction_ref) \
         WHERE id = ?3 AND charged_at IS NULL \
         RETURNING {DONATION_COLUMNS}"
    );
    let row = sqlx::query_as::<_, DonationRow>(&query)
        .bind(to_micros(charged_at))
        .bind(transaction)
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => {
            let donation = Donation::try_from(row)?;
            info!("Donation {id} charged ({} cents)", donation.amount_cents());
            Ok(donation)
        }
        None => {
            // Distinguish a missing donation from a repeated charge.
            get_donation(pool, id).await?;
            warn!("Donation {id} was already charged");
            Err(ModelError::AlreadyCharged(id).into())
        }
    }
}
