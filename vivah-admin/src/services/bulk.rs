use serde::Serialize;

use vivah_shared::errors::AppResult;

/// Tally of a bulk operation. Items are processed independently, so a
/// failure part way through leaves the earlier deletions in place.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    pub requested: usize,
    pub deleted: usize,
    pub failed: usize,
    pub failed_ids: Vec<i32>,
}

/// Runs `op` once per distinct id, in request order. `Ok(false)` (nothing
/// to delete) and errors both count as failures.
pub fn run_each<F>(ids: &[i32], mut op: F) -> BulkOutcome
where
    F: FnMut(i32) -> AppResult<bool>,
{
    let mut seen = std::collections::HashSet::new();
    let mut outcome = BulkOutcome::default();
    for &id in ids.iter().filter(|id| seen.insert(**id)) {
        outcome.requested += 1;
        match op(id) {
            Ok(true) => outcome.deleted += 1,
            Ok(false) => {
                outcome.failed += 1;
                outcome.failed_ids.push(id);
            }
            Err(e) => {
                tracing::warn!(user_id = id, error = %e, "bulk delete item failed");
                outcome.failed += 1;
                outcome.failed_ids.push(id);
            }
        }
    }
    outcome
}
