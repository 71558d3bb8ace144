//! # Flock Core
//!
//! Domain model of the **Flock** crowdfunding platform: projects seeking
//! funding, rewards tied to donation tiers, and donations made by backers.
//!
//! | Concern         | Item(s)                                                  |
//! |-----------------|----------------------------------------------------------|
//! | Currency        | [`Money`], [`minor_units`]                               |
//! | Records         | [`Project`], [`Reward`], [`Donation`]                    |
//! | Inputs          | [`NewProject`], [`NewReward`], [`NewDonation`]           |
//! | Charge status   | [`ChargeStatus`], [`Donation::charge`]                   |
//! | Derived figures | [`current`], [`donation_total`], [`funding_percentage`], [`available_rewards`] |
//! | Snapshot        | [`ProjectSummary`]                                       |
//!
//! ## Architecture
//!
//! This crate performs no I/O. Persistence, aggregate queries and delete
//! protection live in the `flock_store` crate, which hands records back in
//! these types.

mod error;
mod funding;
mod money;
mod types;

#[cfg(test)]
mod test_donation;
#[cfg(test)]
mod test_funding;

pub use error::ModelError;
pub use funding::{
    available_rewards, current, donation_total, funding_percentage, reward_claims,
    ProjectSummary,
};
pub use money::{minor_units, Money, DECIMAL_PLACES, MAX_DIGITS};
pub use types::{
    sort_donations, sort_projects, sort_rewards, ChargeStatus, Donation, NewDonation, NewProject,
    NewReward, Project, ProjectId, Reward, RewardId,
};

/// Re-exported so callers can run input validation without a direct dependency.
pub use validator::Validate;
