//! Repository functions for the `projects` table.

use flock_core::{NewProject, Project, Validate};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::db::protect;
use crate::errors::{Result, StoreError};
use crate::records::{convert_all, to_micros, ProjectRow, PROJECT_COLUMNS};

/// Insert a new project, returning the created record.
pub async fn insert_project(pool: &SqlitePool, input: &NewProject) -> Result<Project> {
    input.validate().map_err(flock_core::ModelError::from)?;

    let query = format!(
        "INSERT INTO projects (created_at, is_active, title, funding_goal, default_amount) \
         VALUES (?1, ?2, ?3, ?4, ?5) \
         RETURNING {PROJECT_COLUMNS}"
    );
    let row = sqlx::query_as::<_, ProjectRow>(&query)
        .bind(to_micros(input.created_at))
        .bind(input.is_active)
        .bind(&input.title)
        .bind(input.funding_goal.to_string())
        .bind(input.default_amount.map(|m| m.to_string()))
        .fetch_one(pool)
        .await?;

    let project = Project::try_from(row)?;
    info!("Created project {} ({})", project.id, project.title);
    Ok(project)
}

/// Find a project by id.
pub async fn get_project(pool: &SqlitePool, id: i64) -> Result<Project> {
    let query = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1");
    sqlx::query_as::<_, ProjectRow>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| StoreError::not_found("project", id))?
        .try_into()
}

/// All projects, newest first.
pub async fn list_projects(pool: &SqlitePool) -> Result<Vec<Project>> {
    let query = format!("SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at DESC, id DESC");
    let rows = sqlx::query_as::<_, ProjectRow>(&query)
        .fetch_all(pool)
        .await?;
    convert_all(rows)
}

/// Activate or deactivate a project.
pub async fn set_project_active(pool: &SqlitePool, id: i64, is_active: bool) -> Result<Project> {
    let query = format!("UPDATE projects SET is_active = ?1 WHERE id = ?2 RETURNING {PROJECT_COLUMNS}");
    let row = sqlx::query_as::<_, ProjectRow>(&query)
        .bind(is_active)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| StoreError::not_found("project", id))?;

    info!("Project {id} is_active = {is_active}");
    row.try_into()
}

/// The live campaign: the earliest-created active project, if any.
pub async fn current_project(pool: &SqlitePool) -> Result<Option<Project>> {
    let query = format!(
        "SELECT {PROJECT_COLUMNS} FROM projects \
         WHERE is_active = 1 \
         ORDER BY created_at ASC, id ASC \
         LIMIT 1"
    );
    sqlx::query_as::<_, ProjectRow>(&query)
        .fetch_optional(pool)
        .await?
        .map(Project::try_from)
        .transpose()
}

/// Delete a project that nothing references.
///
/// Fails with [`StoreError::Protected`] while any reward or donation points
/// at it; nothing is cascaded.
pub async fn delete_project(pool: &SqlitePool, id: i64) -> Result<()> {
    let mut tx = pool.begin().await?;

    let (dependents,): (i64,) = sqlx::query_as(
        r#"
        SELECT (SELECT COUNT(*) FROM rewards   WHERE project_id = ?1)
             + (SELECT COUNT(*) FROM donations WHERE project_id = ?1)
        "#,
    )
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    if dependents > 0 {
        warn!("Refusing to delete project {id}: {dependents} dependent row(s)");
        return Err(StoreError::Protected {
            entity: "project",
            id: id.to_string(),
            dependents,
        });
    }

    let deleted = sqlx::query("DELETE FROM projects WHERE id = ?1")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| protect(e, "project", id))?
        .rows_affected();

    if deleted == 0 {
        return Err(StoreError::not_found("project", id));
    }

    tx.commit().await?;
    info!("Deleted project {id}");
    Ok(())
}
