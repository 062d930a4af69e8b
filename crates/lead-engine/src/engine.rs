//! The lead engine: intake, assignment, lifecycle transitions, conversion.

use database::models::{Lead, LeadStatus, NewLead, NewProject, Project, QualificationPatch};
use database::validation::{validate_budget_range, ValidationError};
use database::{lead, staff, Database};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::actor::{Actor, Permission};
use crate::assignment::select_candidate;
use crate::error::{EngineError, Result};
use crate::intake::{ConversionRequest, LeadIntake};
use crate::notify::{Notification, NotificationKind, NotificationSink};
use crate::scoring::{LeadProfile, ScoreWeights};
use crate::state;

/// The result of a successful conversion: the terminal lead and the project
/// it became.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub lead: Lead,
    pub project: Project,
}

/// The lead lifecycle engine.
///
/// The engine:
/// - validates and scores raw inquiries, then persists them
/// - picks an assignee per region under the workload-balancing heuristic
/// - enforces the status state machine and its actor guards
/// - converts qualified leads into projects atomically
/// - informs the notification sink of assignments and conversions
///
/// It holds no in-memory locks: every store call is an independent await
/// point, and atomicity lives in the store's transactional operations.
pub struct LeadEngine<N: NotificationSink> {
    /// Durable lead/staff/project storage.
    db: Database,
    /// Scoring weight table.
    weights: ScoreWeights,
    /// Fire-and-forget notification collaborator.
    notifier: N,
}

impl<N: NotificationSink> LeadEngine<N> {
    /// Create an engine with the canonical scoring weights.
    pub fn new(db: Database, notifier: N) -> Self {
        Self {
            db,
            weights: ScoreWeights::default(),
            notifier,
        }
    }

    /// Create an engine with a custom weight table.
    pub fn with_weights(db: Database, notifier: N, weights: ScoreWeights) -> Self {
        Self {
            db,
            weights,
            notifier,
        }
    }

    /// Access the underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Ingest a raw inquiry: validate, score, persist, then attempt
    /// region-based assignment.
    ///
    /// Assignment is best-effort. Once the lead row commits,
    /// nothing downstream unwinds it: no eligible staff leaves the lead
    /// unassigned, and a failing workload read or assignment write is
    /// logged and swallowed. The unassigned lead is a valid, recoverable
    /// state that manual assignment resolves later.
    pub async fn create_lead(&self, actor: &Actor, intake: LeadIntake) -> Result<Lead> {
        intake.validate()?;

        let score = self.weights.score(&LeadProfile::from_intake(&intake));
        let record = NewLead {
            id: Uuid::new_v4().to_string(),
            name: intake.name.trim().to_string(),
            email: intake.email,
            phone: intake.phone,
            source: intake.source,
            region: intake.region,
            budget_min: intake.budget_min,
            budget_max: intake.budget_max,
            project_type: intake.project_type,
            property_type: intake.property_type,
            timeline: intake.timeline,
            description: intake.description,
            score: score as i64,
        };
        lead::create_lead(self.db.pool(), &record).await?;
        info!(lead_id = %record.id, score, "lead created");

        let created = lead::get_lead(self.db.pool(), &record.id).await?;

        if let Some(region) = created.region.clone() {
            match self.auto_assign(actor, &created.id, &region).await {
                Ok(Some(assigned)) => return Ok(assigned),
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        lead_id = %created.id,
                        error = %e,
                        "auto-assignment failed; lead left unassigned"
                    );
                }
            }
        }

        Ok(created)
    }

    /// Assign a lead to a staff member.
    ///
    /// With an explicit `staff_id` the target account must exist and be
    /// active. Without one, the workload-balancing selector runs over the
    /// lead's region; here, unlike at creation, an empty candidate pool is
    /// surfaced as a conflict so the caller knows nothing happened.
    pub async fn assign_lead(
        &self,
        actor: &Actor,
        lead_id: &str,
        staff_id: Option<&str>,
    ) -> Result<Lead> {
        if !actor.has(Permission::LeadsAssign) && !actor.has(Permission::LeadsManage) {
            return Err(EngineError::Forbidden(format!(
                "actor {} may not assign leads",
                actor.id
            )));
        }

        let current = lead::get_lead(self.db.pool(), lead_id).await?;
        if current.status.is_terminal() {
            return Err(EngineError::Conflict(format!(
                "lead {} is {} and cannot be assigned",
                current.id, current.status
            )));
        }

        match staff_id {
            Some(id) => {
                let member = staff::get_staff(self.db.pool(), id).await?;
                if !member.active {
                    return Err(EngineError::Conflict(format!(
                        "staff {} is inactive",
                        member.id
                    )));
                }
                lead::set_assignment(self.db.pool(), lead_id, &member.id, &actor.id).await?;
                info!(lead_id, staff_id = %member.id, "lead assigned");
                self.notify(Notification {
                    recipient_id: member.id,
                    kind: NotificationKind::Assigned,
                    reference_id: lead_id.to_string(),
                })
                .await;
                Ok(lead::get_lead(self.db.pool(), lead_id).await?)
            }
            None => {
                let region = current.region.clone().ok_or_else(|| {
                    EngineError::Validation(ValidationError::Empty("region".to_string()))
                })?;
                match self.auto_assign(actor, lead_id, &region).await? {
                    Some(updated) => Ok(updated),
                    None => Err(EngineError::Conflict(format!(
                        "no eligible staff for region {}",
                        region
                    ))),
                }
            }
        }
    }

    /// Drive a lead through a status transition.
    ///
    /// Guards, in order: the transition must be legal from the current
    /// status (terminal states and direct `converted` writes conflict),
    /// the actor must be the assignee or hold `leads.manage`, and `lost`
    /// requires a non-empty reason. The store write is guarded by the
    /// status this call observed, so a racing transition surfaces as a
    /// conflict instead of a lost update.
    pub async fn transition(
        &self,
        actor: &Actor,
        lead_id: &str,
        to: LeadStatus,
        reason: Option<&str>,
    ) -> Result<Lead> {
        let current = lead::get_lead(self.db.pool(), lead_id).await?;

        state::ensure_transition(&current, to)?;
        state::ensure_can_manage(actor, &current)?;

        if to == LeadStatus::Lost && !reason.is_some_and(|r| !r.trim().is_empty()) {
            return Err(EngineError::Validation(ValidationError::Empty(
                "reason".to_string(),
            )));
        }

        lead::set_status(self.db.pool(), lead_id, current.status, to, &actor.id, reason).await?;
        info!(lead_id, from = %current.status, to = %to, "lead status changed");

        Ok(lead::get_lead(self.db.pool(), lead_id).await?)
    }

    /// Amend a lead's qualification attributes and recompute its score
    /// from the merged result.
    pub async fn update_qualification(
        &self,
        actor: &Actor,
        lead_id: &str,
        patch: QualificationPatch,
    ) -> Result<Lead> {
        let current = lead::get_lead(self.db.pool(), lead_id).await?;
        if current.status.is_terminal() {
            return Err(EngineError::Conflict(format!(
                "lead {} is {} and cannot be amended",
                current.id, current.status
            )));
        }
        state::ensure_can_manage(actor, &current)?;

        if patch.is_empty() {
            return Ok(current);
        }

        // Mirror the store's COALESCE merge so validation and rescoring
        // see exactly what will be persisted.
        let merged = Lead {
            budget_min: patch.budget_min.or(current.budget_min),
            budget_max: patch.budget_max.or(current.budget_max),
            project_type: patch.project_type.clone().or_else(|| current.project_type.clone()),
            property_type: patch
                .property_type
                .clone()
                .or_else(|| current.property_type.clone()),
            timeline: patch.timeline.clone().or_else(|| current.timeline.clone()),
            description: patch
                .description
                .clone()
                .or_else(|| current.description.clone()),
            ..current.clone()
        };
        if let (Some(min), Some(max)) = (merged.budget_min, merged.budget_max) {
            validate_budget_range(min, max)?;
        }

        let score = self.weights.score(&LeadProfile::from_lead(&merged));
        lead::update_qualification(self.db.pool(), lead_id, &patch, score as i64).await?;
        debug!(lead_id, score, "lead qualification updated");

        Ok(lead::get_lead(self.db.pool(), lead_id).await?)
    }

    /// Convert a qualified lead into a project.
    ///
    /// The store runs the conversion as one transaction: the
    /// already-converted check, the project insert and the lead update
    /// commit together or not at all. Of two concurrent attempts on the
    /// same lead, exactly one succeeds and the other observes a conflict.
    pub async fn convert_lead(
        &self,
        actor: &Actor,
        lead_id: &str,
        request: ConversionRequest,
    ) -> Result<Conversion> {
        request.validate()?;

        let current = lead::get_lead(self.db.pool(), lead_id).await?;
        state::ensure_can_manage(actor, &current)?;

        let new_project = NewProject {
            id: Uuid::new_v4().to_string(),
            title: request.title.trim().to_string(),
            budget: request.budget,
            duration_weeks: request.duration_weeks,
        };
        let (converted, project) = lead::convert_lead(
            self.db.pool(),
            lead_id,
            &new_project,
            &actor.id,
            &state::CONVERTIBLE,
        )
        .await?;
        info!(lead_id, project_id = %project.id, "lead converted");

        if let Some(staff_id) = converted.assigned_staff_id.clone() {
            self.notify(Notification {
                recipient_id: staff_id,
                kind: NotificationKind::Converted,
                reference_id: project.id.clone(),
            })
            .await;
        }

        Ok(Conversion {
            lead: converted,
            project,
        })
    }

    /// Run the workload-balancing selector for a region and, if it picks
    /// someone, record the assignment and notify them. `Ok(None)` means no
    /// eligible staff, which is a valid outcome.
    async fn auto_assign(
        &self,
        actor: &Actor,
        lead_id: &str,
        region: &str,
    ) -> Result<Option<Lead>> {
        let candidates = staff::eligible_candidates(self.db.pool(), region).await?;
        let Some(candidate) = select_candidate(&candidates) else {
            debug!(lead_id, region, "no eligible staff; lead left unassigned");
            return Ok(None);
        };
        let staff_id = candidate.id.clone();

        lead::set_assignment(self.db.pool(), lead_id, &staff_id, &actor.id).await?;
        info!(lead_id, staff_id = %staff_id, region, "lead assigned");

        self.notify(Notification {
            recipient_id: staff_id,
            kind: NotificationKind::Assigned,
            reference_id: lead_id.to_string(),
        })
        .await;

        Ok(Some(lead::get_lead(self.db.pool(), lead_id).await?))
    }

    /// Fire-and-forget delivery: failures are logged and never propagate
    /// into the lead operation that triggered them.
    async fn notify(&self, notification: Notification) {
        if let Err(e) = self.notifier.deliver(notification).await {
            warn!("failed to deliver notification: {}", e);
        }
    }
}
