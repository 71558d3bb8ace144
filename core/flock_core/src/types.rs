//! # Types
//!
//! Record types for the three Flock entities and the input shapes used to
//! create them.
//!
//! ## Ownership
//!
//! ```text
//! Project ──► Reward ──┐
//!     └───────────────►┴──► Donation
//! ```
//!
//! A [`Reward`] belongs to exactly one [`Project`]. A [`Donation`] belongs to
//! exactly one project and optionally selects one reward of that same
//! project. Relations are plain ids; queries over them live in
//! [`crate::funding`] and in the persistence layer.
//!
//! ## Charge status
//!
//! A donation is created [`ChargeStatus::Uncharged`] and moves to
//! [`ChargeStatus::Charged`] exactly once, when the payment is confirmed.
//! There is no way back.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::ModelError;
use crate::money::Money;

pub type ProjectId = i64;
pub type RewardId = i64;

// ─────────────────────────────────────────────────────────
// Project
// ─────────────────────────────────────────────────────────

/// A funding campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub created_at: DateTime<Utc>,
    /// Inactive projects are kept for history but never selected as current.
    pub is_active: bool,
    pub title: String,
    pub funding_goal: Money,
    /// Amount pre-filled for backers who do not pick one.
    pub default_amount: Option<Money>,
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// Listing order for projects: newest first.
pub fn sort_projects(projects: &mut [Project]) {
    projects.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewProject {
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(custom(function = "positive_goal"))]
    pub funding_goal: Money,
    pub default_amount: Option<Money>,
}

impl NewProject {
    /// An active project created now.
    pub fn new(title: impl Into<String>, funding_goal: Money) -> Self {
        Self {
            created_at: Utc::now(),
            is_active: true,
            title: title.into(),
            funding_goal,
            default_amount: None,
        }
    }
}

fn positive_goal(goal: &Money) -> Result<(), ValidationError> {
    if goal.is_zero() {
        return Err(ValidationError::new("funding_goal_zero"));
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────
// Reward
// ─────────────────────────────────────────────────────────

/// A tier backers can select by donating at least `donation_amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub id: RewardId,
    pub project_id: ProjectId,
    pub title: String,
    /// How many times the reward can be claimed; `None` means unlimited.
    pub available_times: Option<u32>,
    pub donation_amount: Money,
}

impl Reward {
    /// Human-facing listing label, e.g. `Sticker pack (from 10.00)`.
    pub fn label(&self) -> String {
        self.to_string()
    }

    /// Whether another donation may select this reward after `claimed` have.
    pub fn is_available(&self, claimed: u64) -> bool {
        match self.available_times {
            Some(cap) => claimed < u64::from(cap),
            None => true,
        }
    }

    /// Whether a donation of `amount` qualifies for this reward.
    pub fn accepts(&self, amount: &Money) -> bool {
        *amount >= self.donation_amount
    }

    pub(crate) fn natural_cmp(&self, other: &Self) -> Ordering {
        self.donation_amount
            .cmp(&other.donation_amount)
            .then(self.id.cmp(&other.id))
    }
}

impl fmt::Display for Reward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (from {})", self.title, self.donation_amount)
    }
}

/// Natural reward order: ascending required donation amount.
pub fn sort_rewards(rewards: &mut [Reward]) {
    rewards.sort_by(Reward::natural_cmp);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewReward {
    pub project_id: ProjectId,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub available_times: Option<u32>,
    pub donation_amount: Money,
}

// ─────────────────────────────────────────────────────────
// Donation
// ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeStatus {
    /// Pending or abandoned; payment not confirmed.
    Uncharged,
    /// Payment confirmed.
    Charged,
}

/// A single backer's pledge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donation {
    /// Random v4 id so donation records cannot be enumerated.
    pub id: Uuid,
    pub project_id: ProjectId,
    pub created_at: DateTime<Utc>,
    pub charged_at: Option<DateTime<Utc>>,
    pub amount: Money,
    pub selected_reward: Option<RewardId>,
    pub full_name: String,
    pub email: String,
    pub postal_address: Option<String>,
    /// Opaque payment processor reference.
    pub transaction: String,
}

impl Donation {
    pub fn is_charged(&self) -> bool {
        self.charged_at.is_some()
    }

    pub fn status(&self) -> ChargeStatus {
        if self.is_charged() {
            ChargeStatus::Charged
        } else {
            ChargeStatus::Uncharged
        }
    }

    /// Amount in cents, for processors that take integer minor units.
    pub fn amount_cents(&self) -> i64 {
        self.amount.minor_units()
    }

    /// Record payment confirmation. Only valid once.
    ///
    /// With no `transaction` the reference recorded at creation is kept.
    pub fn charge(
        &mut self,
        at: DateTime<Utc>,
        transaction: Option<String>,
    ) -> Result<(), ModelError> {
        if self.is_charged() {
            return Err(ModelError::AlreadyCharged(self.id));
        }
        self.charged_at = Some(at);
        if let Some(transaction) = transaction {
            self.transaction = transaction;
        }
        Ok(())
    }
}

/// Natural donation order: most recent first.
pub fn sort_donations(donations: &mut [Donation]) {
    donations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewDonation {
    pub project_id: ProjectId,
    pub created_at: DateTime<Utc>,
    pub amount: Money,
    pub selected_reward: Option<RewardId>,
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    #[validate(email, length(max = 254))]
    pub email: String,
    pub postal_address: Option<String>,
    #[serde(default)]
    pub transaction: String,
}

impl NewDonation {
    /// An uncharged donation without a reward, created now.
    pub fn new(
        project_id: ProjectId,
        amount: Money,
        full_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            project_id,
            created_at: Utc::now(),
            amount,
            selected_reward: None,
            full_name: full_name.into(),
            email: email.into(),
            postal_address: None,
            transaction: String::new(),
        }
    }

    pub fn with_reward(mut self, reward_id: RewardId) -> Self {
        self.selected_reward = Some(reward_id);
        self
    }

    /// Check the selected `reward` belongs to this donation's project and that
    /// the amount meets its threshold.
    pub fn validate_against(&self, reward: &Reward) -> Result<(), ModelError> {
        if reward.project_id != self.project_id {
            return Err(ModelError::RewardMismatch {
                reward_id: reward.id,
                reward_project: reward.project_id,
                project_id: self.project_id,
            });
        }
        if !reward.accepts(&self.amount) {
            return Err(ModelError::BelowRewardThreshold {
                reward_id: reward.id,
                amount: self.amount,
                required: reward.donation_amount,
            });
        }
        Ok(())
    }

    /// Materialise the record with a fresh random id.
    pub fn into_donation(self) -> Donation {
        Donation {
            id: Uuid::new_v4(),
            project_id: self.project_id,
            created_at: self.created_at,
            charged_at: None,
            amount: self.amount,
            selected_reward: self.selected_reward,
            full_name: self.full_name,
            email: self.email,
            postal_address: self.postal_address,
            transaction: self.transaction,
        }
    }
}
