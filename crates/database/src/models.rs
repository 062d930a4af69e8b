//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Lifecycle status of a lead.
///
/// Assignment is orthogonal to status: a lead can be `new` and assigned, or
/// `new` and unassigned. `converted` and `lost` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum LeadStatus {
    /// Freshly ingested inquiry.
    New,
    /// Staff has reached out at least once.
    Contacted,
    /// Vetted and ready for conversion.
    Qualified,
    /// Converted into a project (terminal).
    Converted,
    /// Dropped with a recorded reason (terminal).
    Lost,
}

impl LeadStatus {
    /// Statuses that count toward a staff member's open workload.
    pub const OPEN: [LeadStatus; 3] = [LeadStatus::New, LeadStatus::Contacted, LeadStatus::Qualified];

    /// Whether no further lifecycle transition is permitted.
    pub fn is_terminal(self) -> bool {
        matches!(self, LeadStatus::Converted | LeadStatus::Lost)
    }

    /// Canonical string form, matching the stored TEXT value.
    pub fn as_str(self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Converted => "converted",
            LeadStatus::Lost => "lost",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A customer inquiry tracked through the lead lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Lead {
    /// Generated UUID, immutable once assigned.
    pub id: String,
    /// Contact name.
    pub name: String,
    /// Contact email, if provided.
    pub email: Option<String>,
    /// Contact phone, if provided.
    pub phone: Option<String>,
    /// Acquisition channel tag (e.g. "referral", "website", "social").
    pub source: Option<String>,
    /// Target region for the project, drives assignment.
    pub region: Option<String>,
    /// Lower bound of the stated budget.
    pub budget_min: Option<i64>,
    /// Upper bound of the stated budget.
    pub budget_max: Option<i64>,
    /// Desired project scope tag (e.g. "full_home", "multi_room").
    pub project_type: Option<String>,
    /// Property kind tag (e.g. "villa", "apartment").
    pub property_type: Option<String>,
    /// Timeline bucket tag (e.g. "immediate", "1-3 months").
    pub timeline: Option<String>,
    /// Free-text description of the inquiry.
    pub description: Option<String>,
    /// Priority score, computed at intake.
    pub score: i64,
    /// Current lifecycle status.
    pub status: LeadStatus,
    /// Assigned staff member, set only by a successful assignment.
    pub assigned_staff_id: Option<String>,
    /// Linked project, set once on conversion and never changed.
    pub project_id: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

/// Initial fields for a lead insert. The caller supplies the generated id
/// and the computed score; timestamps and status come from column defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLead {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
    pub region: Option<String>,
    pub budget_min: Option<i64>,
    pub budget_max: Option<i64>,
    pub project_type: Option<String>,
    pub property_type: Option<String>,
    pub timeline: Option<String>,
    pub description: Option<String>,
    pub score: i64,
}

/// A partial update to a lead's qualification attributes. `None` fields are
/// left unchanged; provided fields replace the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualificationPatch {
    pub budget_min: Option<i64>,
    pub budget_max: Option<i64>,
    pub project_type: Option<String>,
    pub property_type: Option<String>,
    pub timeline: Option<String>,
    pub description: Option<String>,
}

impl QualificationPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.budget_min.is_none()
            && self.budget_max.is_none()
            && self.project_type.is_none()
            && self.property_type.is_none()
            && self.timeline.is_none()
            && self.description.is_none()
    }
}

/// A staff account, synced from the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct StaffMember {
    /// Identity-service UUID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Inactive staff are never candidates for assignment.
    pub active: bool,
    /// Account creation timestamp, used as the seniority tie-breaker.
    pub created_at: String,
}

/// An assignment candidate: an active staff member serving a region,
/// annotated with their current open-lead workload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct StaffCandidate {
    pub id: String,
    pub name: String,
    /// Account creation timestamp, used as the seniority tie-breaker.
    pub created_at: String,
    /// Count of leads in an open status currently assigned to this member.
    pub open_leads: i64,
}

/// A project created by converting a lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: String,
    /// The lead this project was converted from.
    pub lead_id: String,
    pub title: String,
    /// Agreed budget.
    pub budget: i64,
    /// Planned duration, if known.
    pub duration_weeks: Option<i64>,
    /// Creation timestamp.
    pub created_at: String,
}

/// Attributes for the project created by a conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProject {
    pub id: String,
    pub title: String,
    pub budget: i64,
    pub duration_weeks: Option<i64>,
}

/// An audit trail entry for a lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct LeadEvent {
    /// Auto-incrementing ID.
    pub id: i64,
    pub lead_id: String,
    /// Event kind ("status_changed", "assigned", "converted").
    pub kind: String,
    pub from_status: Option<String>,
    pub to_status: Option<String>,
    /// Actor who drove the mutation, if known.
    pub actor_id: Option<String>,
    /// Kind-specific detail (lost reason, staff id, project id).
    pub detail: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses() {
        assert!(LeadStatus::Converted.is_terminal());
        assert!(LeadStatus::Lost.is_terminal());
        assert!(!LeadStatus::New.is_terminal());
        assert!(!LeadStatus::Contacted.is_terminal());
        assert!(!LeadStatus::Qualified.is_terminal());
    }

    #[test]
    fn open_set_excludes_terminals() {
        for status in LeadStatus::OPEN {
            assert!(!status.is_terminal());
        }
    }

    #[test]
    fn status_string_form() {
        assert_eq!(LeadStatus::New.as_str(), "new");
        assert_eq!(LeadStatus::Converted.to_string(), "converted");
    }
}
