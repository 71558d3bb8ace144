//! Domain error type shared by every model module.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::money::Money;
use crate::types::{ProjectId, RewardId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Amount must not be negative: {0}")]
    NegativeAmount(Decimal),

    #[error("Amount {0} does not fit 10 digits with 2 decimal places")]
    PrecisionExceeded(Decimal),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Funding percentage is undefined for a zero funding goal")]
    UndefinedPercentage,

    #[error("Donation {0} has already been charged")]
    AlreadyCharged(Uuid),

    #[error("Reward {reward_id} belongs to project {reward_project}, not project {project_id}")]
    RewardMismatch {
        reward_id: RewardId,
        reward_project: ProjectId,
        project_id: ProjectId,
    },

    #[error("Donation of {amount} is below the {required} required for reward {reward_id}")]
    BelowRewardThreshold {
        reward_id: RewardId,
        amount: Money,
        required: Money,
    },

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl From<validator::ValidationErrors> for ModelError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}
