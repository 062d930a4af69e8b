//! Staff read view and sync helpers.
//!
//! Staff accounts are owned by the identity service; this module keeps a
//! local copy in sync and exposes the workload-annotated candidate query
//! the assignment selector ranks over. The engine itself only reads.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{StaffCandidate, StaffMember};

/// Register a staff account.
pub async fn create_staff(pool: &SqlitePool, id: &str, name: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO staff (id, name)
        VALUES (?, ?)
        "#,
    )
    .bind(id)
    .bind(name)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "Staff",
                    id: id.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(())
}

/// Get a staff account by ID.
pub async fn get_staff(pool: &SqlitePool, id: &str) -> Result<StaffMember> {
    sqlx::query_as::<_, StaffMember>(
        r#"
        SELECT id, name, active, created_at
        FROM staff
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Staff",
        id: id.to_string(),
    })
}

/// Activate or deactivate a staff account. Inactive accounts are never
/// assignment candidates.
pub async fn set_active(pool: &SqlitePool, id: &str, active: bool) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE staff
        SET active = ?
        WHERE id = ?
        "#,
    )
    .bind(active)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Staff",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Add a region to a staff member's service area.
pub async fn serve_region(pool: &SqlitePool, staff_id: &str, region: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO staff_regions (staff_id, region)
        VALUES (?, ?)
        "#,
    )
    .bind(staff_id)
    .bind(region)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "StaffRegion",
                    id: format!("{}/{}", staff_id, region),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(())
}

/// Remove a region from a staff member's service area.
pub async fn drop_region(pool: &SqlitePool, staff_id: &str, region: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM staff_regions
        WHERE staff_id = ? AND region = ?
        "#,
    )
    .bind(staff_id)
    .bind(region)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "StaffRegion",
            id: format!("{}/{}", staff_id, region),
        });
    }

    Ok(())
}

/// Active staff serving a region, annotated with their open-lead workload
/// and ordered by (workload ascending, account age, id).
///
/// The count is recomputed from lead assignments on every call rather than
/// cached, so each assignment decision ranks over current state.
pub async fn eligible_candidates(pool: &SqlitePool, region: &str) -> Result<Vec<StaffCandidate>> {
    let candidates = sqlx::query_as::<_, StaffCandidate>(
        r#"
        SELECT s.id, s.name, s.created_at, COUNT(l.id) AS open_leads
        FROM staff s
        INNER JOIN staff_regions r ON r.staff_id = s.id
        LEFT JOIN leads l ON l.assigned_staff_id = s.id
            AND l.status IN ('new', 'contacted', 'qualified')
        WHERE s.active = 1 AND r.region = ?
        GROUP BY s.id, s.name, s.created_at
        ORDER BY open_leads ASC, s.created_at ASC, s.id ASC
        "#,
    )
    .bind(region)
    .fetch_all(pool)
    .await?;

    Ok(candidates)
}

/// Count of open leads currently assigned to a staff member.
pub async fn open_lead_count(pool: &SqlitePool, staff_id: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM leads
        WHERE assigned_staff_id = ?
          AND status IN ('new', 'contacted', 'qualified')
        "#,
    )
    .bind(staff_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewLead;
    use crate::{lead, Database};

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    fn bare_lead(id: &str) -> NewLead {
        NewLead {
            id: id.to_string(),
            name: "Test".to_string(),
            email: Some("t@example.com".to_string()),
            phone: None,
            source: None,
            region: Some("Mumbai".to_string()),
            budget_min: None,
            budget_max: None,
            project_type: None,
            property_type: None,
            timeline: None,
            description: None,
            score: 0,
        }
    }

    #[tokio::test]
    async fn test_staff_crud() {
        let db = test_db().await;
        create_staff(db.pool(), "s1", "Priya").await.unwrap();

        let staff = get_staff(db.pool(), "s1").await.unwrap();
        assert_eq!(staff.name, "Priya");
        assert!(staff.active);

        set_active(db.pool(), "s1", false).await.unwrap();
        let staff = get_staff(db.pool(), "s1").await.unwrap();
        assert!(!staff.active);

        let dup = create_staff(db.pool(), "s1", "Priya").await;
        assert!(matches!(dup, Err(DatabaseError::AlreadyExists { .. })));
    }

    #[tokio::test]
    async fn test_regions() {
        let db = test_db().await;
        create_staff(db.pool(), "s1", "Priya").await.unwrap();
        serve_region(db.pool(), "s1", "Mumbai").await.unwrap();

        let dup = serve_region(db.pool(), "s1", "Mumbai").await;
        assert!(matches!(dup, Err(DatabaseError::AlreadyExists { .. })));

        drop_region(db.pool(), "s1", "Mumbai").await.unwrap();
        let gone = drop_region(db.pool(), "s1", "Mumbai").await;
        assert!(matches!(gone, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_eligible_candidates_workload_order() {
        let db = test_db().await;
        create_staff(db.pool(), "s1", "Priya").await.unwrap();
        create_staff(db.pool(), "s2", "Rahul").await.unwrap();
        serve_region(db.pool(), "s1", "Mumbai").await.unwrap();
        serve_region(db.pool(), "s2", "Mumbai").await.unwrap();

        // Three open leads on s1, one on s2.
        for i in 0..3 {
            let id = format!("l{}", i);
            lead::create_lead(db.pool(), &bare_lead(&id)).await.unwrap();
            lead::set_assignment(db.pool(), &id, "s1", "test").await.unwrap();
        }
        lead::create_lead(db.pool(), &bare_lead("l3")).await.unwrap();
        lead::set_assignment(db.pool(), "l3", "s2", "test").await.unwrap();

        let candidates = eligible_candidates(db.pool(), "Mumbai").await.unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].id, "s2");
        assert_eq!(candidates[0].open_leads, 1);
        assert_eq!(candidates[1].id, "s1");
        assert_eq!(candidates[1].open_leads, 3);

        assert_eq!(open_lead_count(db.pool(), "s1").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_terminal_leads_do_not_count() {
        let db = test_db().await;
        create_staff(db.pool(), "s1", "Priya").await.unwrap();
        serve_region(db.pool(), "s1", "Mumbai").await.unwrap();

        lead::create_lead(db.pool(), &bare_lead("l1")).await.unwrap();
        lead::set_assignment(db.pool(), "l1", "s1", "test").await.unwrap();
        lead::set_status(
            db.pool(),
            "l1",
            crate::models::LeadStatus::New,
            crate::models::LeadStatus::Lost,
            "test",
            Some("no budget"),
        )
        .await
        .unwrap();

        let candidates = eligible_candidates(db.pool(), "Mumbai").await.unwrap();
        assert_eq!(candidates[0].open_leads, 0);
    }

    #[tokio::test]
    async fn test_inactive_and_foreign_regions_excluded() {
        let db = test_db().await;
        create_staff(db.pool(), "s1", "Priya").await.unwrap();
        create_staff(db.pool(), "s2", "Rahul").await.unwrap();
        serve_region(db.pool(), "s1", "Mumbai").await.unwrap();
        serve_region(db.pool(), "s2", "Pune").await.unwrap();
        set_active(db.pool(), "s1", false).await.unwrap();

        let candidates = eligible_candidates(db.pool(), "Mumbai").await.unwrap();
        assert!(candidates.is_empty());
    }
}
