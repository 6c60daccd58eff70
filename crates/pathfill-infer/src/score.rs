use crate::extract::PROJECT_ROOT_MARKERS;
use crate::oracle::DirOracle;
use std::cmp::Reverse;
use std::collections::HashSet;

/// Minimum score a winning candidate must reach.
pub const MIN_CONFIDENCE: i64 = 10;

/// Score one candidate against the record's full textual evidence.
///
/// +10 for an existing absolute directory, +50 per marker that declares
/// exactly this candidate, +2 for paths under a user home, plus a length
/// prior that favors shorter, top-level project directories.
pub fn score_candidate(candidate: &str, context: &str, oracle: &dyn DirOracle) -> i64 {
    let mut score = 0i64;
    if oracle.is_abs_dir(candidate) {
        score += 10;
    }
    for marker in PROJECT_ROOT_MARKERS {
        if context.contains(&format!("{marker} {candidate}")) {
            score += 50;
        }
    }
    if candidate.contains("/home/") {
        score += 2;
    }
    score += (20 - (candidate.len() / 8) as i64).max(0);
    score
}

/// Rank distinct candidates and pick a confident winner.
///
/// Candidates are deduplicated by exact string equality, keeping first
/// occurrence; the descending sort is stable, so equal scores resolve to
/// the first-encountered candidate. Returns `None` when the best score is
/// under [`MIN_CONFIDENCE`] or the winner is not an existing directory.
pub fn select_best(
    candidates: &[String],
    context: &str,
    oracle: &dyn DirOracle,
) -> Option<String> {
    let mut seen = HashSet::new();
    let mut ranked: Vec<(i64, &str)> = Vec::new();
    for candidate in candidates {
        if !seen.insert(candidate.as_str()) {
            continue;
        }
        ranked.push((score_candidate(candidate, context, oracle), candidate));
    }
    ranked.sort_by_key(|(score, _)| Reverse(*score));

    let (best_score, best) = *ranked.first()?;
    if best_score < MIN_CONFIDENCE || !oracle.is_abs_dir(best) {
        return None;
    }
    Some(best.to_string())
}
