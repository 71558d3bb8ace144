//! Human-facing summary of the live campaign, printed by the `flock` binary.

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::db;
use crate::errors::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignReport {
    pub project_id: i64,
    pub title: String,
    pub funding_goal: String,
    pub donation_total: String,
    /// Rounded to two places; `None` when the goal is zero.
    pub funding_percentage: Option<String>,
    pub available_rewards: Vec<String>,
}

/// Report on the current project, or `None` when no project is active.
pub async fn current_report(pool: &SqlitePool) -> Result<Option<CampaignReport>> {
    let Some(project) = db::current_project(pool).await? else {
        return Ok(None);
    };

    let summary = db::project_summary(pool, project.id).await?;
    let report = CampaignReport {
        project_id: summary.project.id,
        title: summary.project.title.clone(),
        funding_goal: summary.project.funding_goal.to_string(),
        donation_total: summary.donation_total.round_dp(2).to_string(),
        funding_percentage: summary
            .funding_percentage
            .map(|pct| pct.round_dp(2).to_string()),
        available_rewards: summary.available_rewards.iter().map(|r| r.label()).collect(),
    };

    info!(
        "Current project {} \"{}\": {} of {} raised",
        report.project_id, report.title, report.donation_total, report.funding_goal
    );
    Ok(Some(report))
}
