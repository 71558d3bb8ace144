//! Database layer — pool setup, migrations and the repository functions for
//! each table.
//!
//! Every function takes a `&SqlitePool` and performs one logical operation.
//! Writes that must not race (reward slot consumption, charging a donation)
//! are single conditional statements, so SQLite's write lock serialises them
//! without an explicit transaction.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::errors::{Result, StoreError};

mod aggregates;
mod donations;
mod projects;
mod rewards;

pub use aggregates::{
    available_rewards, funding_percentage, project_summary, reward_claims, sum_charged_donations,
};
pub use donations::{get_donation, insert_donation, list_donations, mark_charged};
pub use projects::{
    current_project, delete_project, get_project, insert_project, list_projects,
    set_project_active,
};
pub use rewards::{delete_reward, get_reward, insert_reward, list_rewards};

/// Establish a SQLite connection pool and run pending migrations.
pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };

    let options = SqliteConnectOptions::from_str(&url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied successfully");
    Ok(pool)
}

/// Translate a foreign-key failure on delete into [`StoreError::Protected`].
///
/// Deletes check for dependents up front; this covers rows that appear
/// between the check and the delete.
pub(crate) fn protect(err: sqlx::Error, entity: &'static str, id: impl ToString) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => StoreError::Protected {
            entity,
            id: id.to_string(),
            dependents: 1,
        },
        _ => StoreError::Database(err),
    }
}
