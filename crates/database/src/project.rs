//! Project persistence.
//!
//! The insert is connection-generic so the conversion transaction in
//! [`crate::lead::convert_lead`] can compose it; reads go through the pool.

use sqlx::{SqliteConnection, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::{NewProject, Project};

/// Insert a project row. Runs on the caller's connection, which for
/// conversion is the open transaction.
pub async fn insert_project(
    conn: &mut SqliteConnection,
    lead_id: &str,
    project: &NewProject,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO projects (id, lead_id, title, budget, duration_weeks)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&project.id)
    .bind(lead_id)
    .bind(&project.title)
    .bind(project.budget)
    .bind(project.duration_weeks)
    .execute(conn)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "Project",
                    id: project.id.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(())
}

/// Get a project by ID.
pub async fn get_project(pool: &SqlitePool, id: &str) -> Result<Project> {
    sqlx::query_as::<_, Project>(
        r#"
        SELECT id, lead_id, title, budget, duration_weeks, created_at
        FROM projects
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Project",
        id: id.to_string(),
    })
}

/// Get the project a lead was converted into, if any.
pub async fn get_project_for_lead(pool: &SqlitePool, lead_id: &str) -> Result<Option<Project>> {
    let project = sqlx::query_as::<_, Project>(
        r#"
        SELECT id, lead_id, title, budget, duration_weeks, created_at
        FROM projects
        WHERE lead_id = ?
        "#,
    )
    .bind(lead_id)
    .fetch_optional(pool)
    .await?;

    Ok(project)
}
