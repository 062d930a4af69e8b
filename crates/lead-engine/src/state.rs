//! The lead status state machine: legal transitions and actor guards.

use database::models::{Lead, LeadStatus};

use crate::actor::{Actor, Permission};
use crate::error::EngineError;

/// Statuses a lead may be converted from. Checked inside the conversion
/// transaction itself, independent of the calling handler.
pub(crate) const CONVERTIBLE: [LeadStatus; 1] = [LeadStatus::Qualified];

/// Whether the state machine permits a transition.
///
/// `converted` is reachable here only from `qualified`; callers outside the
/// conversion operation are rejected earlier by [`ensure_transition`].
pub fn can_transition(from: LeadStatus, to: LeadStatus) -> bool {
    use LeadStatus::*;
    match (from, to) {
        (New, Contacted) | (Contacted, Qualified) | (Qualified, Converted) => true,
        (from, Lost) => !from.is_terminal(),
        _ => false,
    }
}

/// Validate a direct status transition request against the current lead.
pub fn ensure_transition(lead: &Lead, to: LeadStatus) -> Result<(), EngineError> {
    if lead.status.is_terminal() {
        return Err(EngineError::Conflict(format!(
            "lead {} is {} and cannot change status",
            lead.id, lead.status
        )));
    }

    // Conversion owns this edge; a direct write would skip the project.
    if to == LeadStatus::Converted {
        return Err(EngineError::Conflict(
            "leads reach converted only through conversion".to_string(),
        ));
    }

    if !can_transition(lead.status, to) {
        return Err(EngineError::Conflict(format!(
            "cannot move lead {} from {} to {}",
            lead.id, lead.status, to
        )));
    }

    Ok(())
}

/// The state-machine guard: transitions are permitted to the assigned staff
/// member or to a holder of lead-management authorization.
pub fn ensure_can_manage(actor: &Actor, lead: &Lead) -> Result<(), EngineError> {
    if actor.has(Permission::LeadsManage) {
        return Ok(());
    }
    if lead.assigned_staff_id.as_deref() == Some(actor.id.as_str()) {
        return Ok(());
    }
    Err(EngineError::Forbidden(format!(
        "actor {} may not manage lead {}",
        actor.id, lead.id
    )))
}
