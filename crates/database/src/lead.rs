//! Lead persistence: inserts, reads, guarded status/assignment writes and
//! the transactional conversion.
//!
//! Every mutation that the audit trail must reflect runs inside a single
//! transaction with its `lead_events` insert, so readers never observe a
//! mutated lead without its trail entry.

use sqlx::{SqliteConnection, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::{Lead, LeadEvent, LeadStatus, NewLead, NewProject, Project, QualificationPatch};
use crate::project;

/// Event kind recorded on status transitions.
pub const EVENT_STATUS_CHANGED: &str = "status_changed";
/// Event kind recorded on assignment writes.
pub const EVENT_ASSIGNED: &str = "assigned";
/// Event kind recorded on conversion.
pub const EVENT_CONVERTED: &str = "converted";

const LEAD_COLUMNS: &str = r#"
    id, name, email, phone, source, region,
    budget_min, budget_max, project_type, property_type, timeline, description,
    score, status, assigned_staff_id, project_id, created_at, updated_at
"#;

/// Insert a new lead with its initial fields. Status and timestamps come
/// from column defaults; the caller supplies the id and computed score.
pub async fn create_lead(pool: &SqlitePool, lead: &NewLead) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO leads (
            id, name, email, phone, source, region,
            budget_min, budget_max, project_type, property_type, timeline, description,
            score
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&lead.id)
    .bind(&lead.name)
    .bind(&lead.email)
    .bind(&lead.phone)
    .bind(&lead.source)
    .bind(&lead.region)
    .bind(lead.budget_min)
    .bind(lead.budget_max)
    .bind(&lead.project_type)
    .bind(&lead.property_type)
    .bind(&lead.timeline)
    .bind(&lead.description)
    .bind(lead.score)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "Lead",
                    id: lead.id.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(())
}

/// Get a lead by ID.
pub async fn get_lead(pool: &SqlitePool, id: &str) -> Result<Lead> {
    sqlx::query_as::<_, Lead>(&format!(
        r#"
        SELECT {LEAD_COLUMNS}
        FROM leads
        WHERE id = ?
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Lead",
        id: id.to_string(),
    })
}

/// Filter for lead listings.
#[derive(Debug, Clone, Default)]
pub struct LeadFilter {
    /// Restrict to a single status.
    pub status: Option<LeadStatus>,
    /// Restrict to a target region.
    pub region: Option<String>,
    /// Page size; zero means the default of 50.
    pub limit: i64,
    /// Page offset.
    pub offset: i64,
}

/// List leads matching a filter, newest first, plus the total match count.
pub async fn list_leads(pool: &SqlitePool, filter: &LeadFilter) -> Result<(Vec<Lead>, i64)> {
    let limit = if filter.limit > 0 { filter.limit } else { 50 };

    let leads = sqlx::query_as::<_, Lead>(&format!(
        r#"
        SELECT {LEAD_COLUMNS}
        FROM leads
        WHERE (?1 IS NULL OR status = ?1)
          AND (?2 IS NULL OR region = ?2)
        ORDER BY created_at DESC, id
        LIMIT ?3 OFFSET ?4
        "#
    ))
    .bind(filter.status)
    .bind(&filter.region)
    .bind(limit)
    .bind(filter.offset)
    .fetch_all(pool)
    .await?;

    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM leads
        WHERE (?1 IS NULL OR status = ?1)
          AND (?2 IS NULL OR region = ?2)
        "#,
    )
    .bind(filter.status)
    .bind(&filter.region)
    .fetch_one(pool)
    .await?;

    Ok((leads, total))
}

/// Count leads grouped by status.
pub async fn count_by_status(pool: &SqlitePool) -> Result<Vec<(String, i64)>> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT status, COUNT(*) as count
        FROM leads
        GROUP BY status
        ORDER BY count DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Append an audit trail entry. Must run on the same connection as the
/// mutation it records.
async fn record_event(
    conn: &mut SqliteConnection,
    lead_id: &str,
    kind: &str,
    from_status: Option<LeadStatus>,
    to_status: Option<LeadStatus>,
    actor_id: Option<&str>,
    detail: Option<&str>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO lead_events (lead_id, kind, from_status, to_status, actor_id, detail)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(lead_id)
    .bind(kind)
    .bind(from_status.map(|s| s.as_str()))
    .bind(to_status.map(|s| s.as_str()))
    .bind(actor_id)
    .bind(detail)
    .execute(conn)
    .await?;

    Ok(())
}

/// Update a lead's status, guarded by the expected current status, and
/// append the audit entry in the same transaction.
///
/// A concurrent transition on the same lead makes the guard miss and
/// surfaces as a conflict rather than a silent lost update.
pub async fn set_status(
    pool: &SqlitePool,
    id: &str,
    from: LeadStatus,
    to: LeadStatus,
    actor_id: &str,
    reason: Option<&str>,
) -> Result<()> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE leads
        SET status = ?1, updated_at = datetime('now')
        WHERE id = ?2 AND status = ?3
        "#,
    )
    .bind(to)
    .bind(id)
    .bind(from)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        let current = sqlx::query_scalar::<_, String>("SELECT status FROM leads WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        return Err(match current {
            Some(status) => DatabaseError::Conflict {
                entity: "Lead",
                id: id.to_string(),
                reason: format!("expected status {}, found {}", from, status),
            },
            None => DatabaseError::NotFound {
                entity: "Lead",
                id: id.to_string(),
            },
        });
    }

    record_event(
        &mut *tx,
        id,
        EVENT_STATUS_CHANGED,
        Some(from),
        Some(to),
        Some(actor_id),
        reason,
    )
    .await?;

    tx.commit().await?;
    Ok(())
}

/// Write the assignee onto a lead and append the audit entry, atomically.
pub async fn set_assignment(
    pool: &SqlitePool,
    lead_id: &str,
    staff_id: &str,
    actor_id: &str,
) -> Result<()> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE leads
        SET assigned_staff_id = ?1, updated_at = datetime('now')
        WHERE id = ?2
        "#,
    )
    .bind(staff_id)
    .bind(lead_id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Lead",
            id: lead_id.to_string(),
        });
    }

    record_event(
        &mut *tx,
        lead_id,
        EVENT_ASSIGNED,
        None,
        None,
        Some(actor_id),
        Some(staff_id),
    )
    .await?;

    tx.commit().await?;
    Ok(())
}

/// Apply a qualification patch and the recomputed score. `None` fields in
/// the patch keep their stored value.
pub async fn update_qualification(
    pool: &SqlitePool,
    id: &str,
    patch: &QualificationPatch,
    score: i64,
) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE leads
        SET budget_min = COALESCE(?, budget_min),
            budget_max = COALESCE(?, budget_max),
            project_type = COALESCE(?, project_type),
            property_type = COALESCE(?, property_type),
            timeline = COALESCE(?, timeline),
            description = COALESCE(?, description),
            score = ?,
            updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(patch.budget_min)
    .bind(patch.budget_max)
    .bind(&patch.project_type)
    .bind(&patch.property_type)
    .bind(&patch.timeline)
    .bind(&patch.description)
    .bind(score)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Lead",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Convert a lead into a project, atomically.
///
/// In one transaction: re-read the lead, reject if it already carries a
/// project or is not in an allowed status, insert the project, link it,
/// move the status to `converted` and append the audit entry. Two
/// concurrent attempts on the same lead yield exactly one success; the
/// loser sees [`DatabaseError::AlreadyConverted`].
pub async fn convert_lead(
    pool: &SqlitePool,
    lead_id: &str,
    new_project: &NewProject,
    actor_id: &str,
    allowed_from: &[LeadStatus],
) -> Result<(Lead, Project)> {
    let mut tx = pool.begin().await?;

    let lead = sqlx::query_as::<_, Lead>(&format!(
        r#"
        SELECT {LEAD_COLUMNS}
        FROM leads
        WHERE id = ?
        "#
    ))
    .bind(lead_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Lead",
        id: lead_id.to_string(),
    })?;

    if lead.project_id.is_some() || lead.status == LeadStatus::Converted {
        return Err(DatabaseError::AlreadyConverted {
            id: lead_id.to_string(),
        });
    }

    if !allowed_from.contains(&lead.status) {
        return Err(DatabaseError::Conflict {
            entity: "Lead",
            id: lead_id.to_string(),
            reason: format!("cannot convert from status {}", lead.status),
        });
    }

    project::insert_project(&mut *tx, lead_id, new_project).await?;

    // The project_id IS NULL guard serializes racing conversions: the
    // transaction that commits second touches zero rows here.
    let result = sqlx::query(
        r#"
        UPDATE leads
        SET status = ?1, project_id = ?2, updated_at = datetime('now')
        WHERE id = ?3 AND project_id IS NULL
        "#,
    )
    .bind(LeadStatus::Converted)
    .bind(&new_project.id)
    .bind(lead_id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::AlreadyConverted {
            id: lead_id.to_string(),
        });
    }

    record_event(
        &mut *tx,
        lead_id,
        EVENT_CONVERTED,
        Some(lead.status),
        Some(LeadStatus::Converted),
        Some(actor_id),
        Some(new_project.id.as_str()),
    )
    .await?;

    let converted = sqlx::query_as::<_, Lead>(&format!(
        r#"
        SELECT {LEAD_COLUMNS}
        FROM leads
        WHERE id = ?
        "#
    ))
    .bind(lead_id)
    .fetch_one(&mut *tx)
    .await?;

    let created = sqlx::query_as::<_, Project>(
        r#"
        SELECT id, lead_id, title, budget, duration_weeks, created_at
        FROM projects
        WHERE id = ?
        "#,
    )
    .bind(&new_project.id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok((converted, created))
}

/// Get the audit trail for a lead, oldest first.
pub async fn events_for_lead(pool: &SqlitePool, lead_id: &str) -> Result<Vec<LeadEvent>> {
    let events = sqlx::query_as::<_, LeadEvent>(
        r#"
        SELECT id, lead_id, kind, from_status, to_status, actor_id, detail, created_at
        FROM lead_events
        WHERE lead_id = ?
        ORDER BY id
        "#,
    )
    .bind(lead_id)
    .fetch_all(pool)
    .await?;

    Ok(events)
}
