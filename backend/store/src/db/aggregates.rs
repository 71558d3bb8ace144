//! Derived project figures computed from the database.

use flock_core::{ProjectSummary, Reward};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use tracing::debug;

use crate::db::{get_project, list_rewards};
use crate::errors::Result;
use crate::records::parse_money;

/// Sum of charged donation amounts for a project; zero when there are none.
///
/// Amounts are summed as decimals in Rust: SQLite's `SUM` over text columns
/// would go through floating point.
pub async fn sum_charged_donations(pool: &SqlitePool, project_id: i64) -> Result<Decimal> {
    let amounts: Vec<(String,)> = sqlx::query_as(
        "SELECT amount FROM donations WHERE project_id = ?1 AND charged_at IS NOT NULL",
    )
    .bind(project_id)
    .fetch_all(pool)
    .await?;

    let mut total = Decimal::ZERO;
    for (raw,) in &amounts {
        total += parse_money("amount", raw)?.amount();
    }
    debug!("Project {project_id}: {} charged donation(s), total {total}", amounts.len());
    Ok(total)
}

/// `100 × total / goal` for a project.
///
/// A zero goal yields [`flock_core::ModelError::UndefinedPercentage`].
pub async fn funding_percentage(pool: &SqlitePool, project_id: i64) -> Result<Decimal> {
    let project = get_project(pool, project_id).await?;
    let total = sum_charged_donations(pool, project_id).await?;
    Ok(flock_core::funding_percentage(total, project.funding_goal)?)
}

/// How many donations, charged or not, selected a reward.
pub async fn reward_claims(pool: &SqlitePool, reward_id: i64) -> Result<u64> {
    let (claims,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM donations WHERE selected_reward = ?1")
            .bind(reward_id)
            .fetch_one(pool)
            .await?;
    Ok(claims.max(0) as u64)
}

/// Rewards of a project that can still be claimed, cheapest first.
pub async fn available_rewards(pool: &SqlitePool, project_id: i64) -> Result<Vec<Reward>> {
    let claims: Vec<(i64, i64)> = sqlx::query_as(
        r#"
        SELECT r.id, COUNT(d.id)
        FROM   rewards r
        LEFT JOIN donations d ON d.selected_reward = r.id
        WHERE  r.project_id = ?1
        GROUP  BY r.id
        "#,
    )
    .bind(project_id)
    .fetch_all(pool)
    .await?;

    let rewards = list_rewards(pool, project_id).await?;
    Ok(rewards
        .into_iter()
        .filter(|reward| {
            let claimed = claims
                .iter()
                .find(|(id, _)| *id == reward.id)
                .map(|(_, n)| (*n).max(0) as u64)
                .unwrap_or(0);
            reward.is_available(claimed)
        })
        .collect())
}

/// Snapshot of a project's total, percentage and available rewards.
pub async fn project_summary(pool: &SqlitePool, project_id: i64) -> Result<ProjectSummary> {
    let project = get_project(pool, project_id).await?;
    let total = sum_charged_donations(pool, project_id).await?;
    let available = available_rewards(pool, project_id).await?;
    Ok(ProjectSummary::from_parts(project, total, available))
}
