//! Derived project figures: current project, donation total, funding
//! percentage and available rewards.
//!
//! Everything here is computed on demand from the records passed in. Callers
//! that need the figures repeatedly take a [`ProjectSummary`] once and reuse
//! it.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::money::Money;
use crate::types::{sort_rewards, Donation, Project, ProjectId, Reward, RewardId};

/// The live campaign: the earliest-created active project.
pub fn current(projects: &[Project]) -> Option<&Project> {
    projects
        .iter()
        .filter(|p| p.is_active)
        .min_by_key(|p| (p.created_at, p.id))
}

/// Sum of charged donation amounts for `project_id`.
pub fn donation_total(project_id: ProjectId, donations: &[Donation]) -> Decimal {
    donations
        .iter()
        .filter(|d| d.project_id == project_id && d.is_charged())
        .map(|d| d.amount.amount())
        .sum()
}

/// `100 × total / goal`, exact.
///
/// A result outside the `Decimal` range is reported as
/// [`ModelError::PrecisionExceeded`] carrying the total.
pub fn funding_percentage(total: Decimal, goal: Money) -> Result<Decimal, ModelError> {
    if goal.is_zero() {
        return Err(ModelError::UndefinedPercentage);
    }
    total
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(goal.amount()))
        .ok_or(ModelError::PrecisionExceeded(total))
}

/// Number of donations selecting each reward, charged or not.
pub fn reward_claims(donations: &[Donation]) -> HashMap<RewardId, u64> {
    let mut claims = HashMap::new();
    for reward_id in donations.iter().filter_map(|d| d.selected_reward) {
        *claims.entry(reward_id).or_insert(0) += 1;
    }
    claims
}

/// Rewards of `project_id` that can still be claimed, cheapest first.
pub fn available_rewards<'a>(
    project_id: ProjectId,
    rewards: &'a [Reward],
    donations: &[Donation],
) -> Vec<&'a Reward> {
    let claims = reward_claims(donations);
    let mut available: Vec<&Reward> = rewards
        .iter()
        .filter(|r| r.project_id == project_id)
        .filter(|r| r.is_available(claims.get(&r.id).copied().unwrap_or(0)))
        .collect();
    available.sort_by(|a, b| a.natural_cmp(b));
    available
}

/// Snapshot of a project's derived figures, computed once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub project: Project,
    pub donation_total: Decimal,
    /// `None` when the funding goal is zero.
    pub funding_percentage: Option<Decimal>,
    pub available_rewards: Vec<Reward>,
}

impl ProjectSummary {
    /// Compute from the full record sets.
    pub fn compute(project: Project, rewards: &[Reward], donations: &[Donation]) -> Self {
        let total = donation_total(project.id, donations);
        let available = available_rewards(project.id, rewards, donations)
            .into_iter()
            .cloned()
            .collect();
        Self::from_parts(project, total, available)
    }

    /// Assemble from figures already aggregated elsewhere, e.g. by a query.
    pub fn from_parts(project: Project, donation_total: Decimal, mut available: Vec<Reward>) -> Self {
        sort_rewards(&mut available);
        let funding_percentage = funding_percentage(donation_total, project.funding_goal).ok();
        Self {
            project,
            donation_total,
            funding_percentage,
            available_rewards: available,
        }
    }
}
