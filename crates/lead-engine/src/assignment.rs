//! Workload-balanced assignment selection.
//!
//! A greedy heuristic: rank eligible candidates by their current open-lead
//! count, break ties by account seniority, take the minimum. Each decision
//! re-ranks over a fresh workload read; two leads created concurrently for
//! the same region can both pick the same candidate, which is an accepted
//! transient imbalance rather than a correctness bug.

use database::models::StaffCandidate;

/// Pick the least-loaded candidate.
///
/// Ties on workload go to the earliest-created account; a final id
/// comparison keeps the choice deterministic when accounts share a
/// creation timestamp. Returns `None` when the pool is empty, which is a
/// valid outcome, not an error. A single candidate is selected regardless
/// of their workload.
pub fn select_candidate(candidates: &[StaffCandidate]) -> Option<&StaffCandidate> {
    candidates.iter().min_by(|a, b| {
        a.open_leads
            .cmp(&b.open_leads)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, created_at: &str, open_leads: i64) -> StaffCandidate {
        StaffCandidate {
            id: id.to_string(),
            name: id.to_string(),
            created_at: created_at.to_string(),
            open_leads,
        }
    }

    #[test]
    fn picks_lowest_workload() {
        let pool = vec![
            candidate("s1", "2024-01-01 09:00:00", 3),
            candidate("s2", "2024-03-01 09:00:00", 1),
            candidate("s3", "2024-02-01 09:00:00", 2),
        ];
        assert_eq!(select_candidate(&pool).unwrap().id, "s2");
    }

    #[test]
    fn ties_go_to_seniority() {
        let pool = vec![
            candidate("s1", "2024-06-01 09:00:00", 2),
            candidate("s2", "2023-01-15 09:00:00", 2),
            candidate("s3", "2024-01-01 09:00:00", 2),
        ];
        assert_eq!(select_candidate(&pool).unwrap().id, "s2");
    }

    #[test]
    fn identical_timestamps_fall_back_to_id() {
        let pool = vec![
            candidate("s2", "2024-01-01 09:00:00", 0),
            candidate("s1", "2024-01-01 09:00:00", 0),
        ];
        assert_eq!(select_candidate(&pool).unwrap().id, "s1");
    }

    #[test]
    fn empty_pool_selects_nobody() {
        assert!(select_candidate(&[]).is_none());
    }

    #[test]
    fn single_candidate_selected_regardless_of_load() {
        let pool = vec![candidate("s1", "2024-01-01 09:00:00", 99)];
        assert_eq!(select_candidate(&pool).unwrap().id, "s1");
    }
}
