//! Repository functions for the `rewards` table.

use flock_core::{sort_rewards, ModelError, NewReward, Reward, Validate};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::db::{get_project, protect};
use crate::errors::{Result, StoreError};
use crate::records::{convert_all, RewardRow, REWARD_COLUMNS};

/// Insert a reward for an existing project.
pub async fn insert_reward(pool: &SqlitePool, input: &NewReward) -> Result<Reward> {
    input.validate().map_err(ModelError::from)?;
    get_project(pool, input.project_id).await?;

    let query = format!(
        "INSERT INTO rewards (project_id, title, available_times, donation_amount) \
         VALUES (?1, ?2, ?3, ?4) \
         RETURNING {REWARD_COLUMNS}"
    );
    let row = sqlx::query_as::<_, RewardRow>(&query)
        .bind(input.project_id)
        .bind(&input.title)
        .bind(input.available_times.map(i64::from))
        .bind(input.donation_amount.to_string())
        .fetch_one(pool)
        .await?;

    let reward = Reward::try_from(row)?;
    info!("Created reward {} for project {}", reward.id, reward.project_id);
    Ok(reward)
}

pub async fn get_reward(pool: &SqlitePool, id: i64) -> Result<Reward> {
    let query = format!("SELECT {REWARD_COLUMNS} FROM rewards WHERE id = ?1");
    sqlx::query_as::<_, RewardRow>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| StoreError::not_found("reward", id))?
        .try_into()
}

/// Rewards of a project, cheapest first.
///
/// Amounts are stored as text, so the ordering is applied after decoding.
pub async fn list_rewards(pool: &SqlitePool, project_id: i64) -> Result<Vec<Reward>> {
    let query = format!("SELECT {REWARD_COLUMNS} FROM rewards WHERE project_id = ?1");
    let rows = sqlx::query_as::<_, RewardRow>(&query)
        .bind(project_id)
        .fetch_all(pool)
        .await?;

    let mut rewards: Vec<Reward> = convert_all(rows)?;
    sort_rewards(&mut rewards);
    Ok(rewards)
}

/// Delete a reward no donation has selected.
pub async fn delete_reward(pool: &SqlitePool, id: i64) -> Result<()> {
    let mut tx = pool.begin().await?;

    let (dependents,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM donations WHERE selected_reward = ?1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

    if dependents > 0 {
        warn!("Refusing to delete reward {id}: selected by {dependents} donation(s)");
        return Err(StoreError::Protected {
            entity: "reward",
            id: id.to_string(),
            dependents,
        });
    }

    let deleted = sqlx::query("DELETE FROM rewards WHERE id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| protect(e, "reward", id))?
        .rows_affected();

    if deleted == 0 {
        return Err(StoreError::not_found("reward", id));
    }

    tx.commit().await?;
    info!("Deleted reward {id}");
    Ok(())
}
