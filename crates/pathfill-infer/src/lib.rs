mod extract;
mod oracle;
mod score;

pub use extract::{context_blob, extract_candidates, PROJECT_ROOT_MARKERS};
pub use oracle::{expand_user, DirOracle, FsOracle};
pub use score::{score_candidate, select_best, MIN_CONFIDENCE};

use serde_json::Value;

/// Infer the most likely originating project directory for one session
/// record, from its title and free-text turns.
///
/// Returns the normalized winning candidate, or `None` when the evidence
/// yields no confident candidate.
pub fn infer_project_path(record: &Value, oracle: &dyn DirOracle) -> Option<String> {
    let candidates = extract_candidates(record);
    if candidates.is_empty() {
        return None;
    }
    let blob = context_blob(record);
    let best = select_best(&candidates, &blob, oracle)?;
    Some(oracle.normalize(&best))
}
