//! Choosing cut columns from a column profile.
//!
//! Columns crossed by at most one skeleton pixel are candidates. Runs of
//! neighbouring candidates collapse into one cut, placed on the middle
//! zero-pixel column when the run has one, otherwise on the middle
//! one-pixel column (index len / 2 of that subset).

use crate::models::{ColumnProfile, CutCandidate, CutRun, FinalSplit};

/// Every column holding 0 or 1 skeleton pixels, in column order.
pub fn find_candidates(counts: &[u32]) -> Vec<CutCandidate> {
    counts
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count <= 1)
        .map(|(column, &count)| CutCandidate {
            column,
            weight: count,
        })
        .collect()
}

/// Drop candidates glued to either end of the profile; they only split
/// off whitespace or a stroke end. Never removes the last candidate.
pub fn trim_boundary_candidates(mut candidates: Vec<CutCandidate>, len: usize) -> Vec<CutCandidate> {
    if len == 0 {
        return candidates;
    }

    let mut ending = len - 1;
    while candidates.len() > 1 && candidates.last().is_some_and(|c| c.column == ending) {
        candidates.pop();
        if ending == 0 {
            break;
        }
        ending -= 1;
    }

    let mut start = 0;
    let mut leading = 0;
    while candidates.len() - leading > 1 && candidates[leading].column == start {
        leading += 1;
        start += 1;
    }
    candidates.drain(..leading);

    candidates
}

/// Group candidates into runs of consecutive columns.
pub fn partition_runs(mut candidates: Vec<CutCandidate>) -> Vec<CutRun> {
    candidates.sort_by_key(|c| c.column);

    let mut runs: Vec<CutRun> = Vec::new();
    for candidate in candidates {
        match runs.last_mut() {
            Some(run) if run.continues_with(&candidate) => run.push(candidate),
            _ => runs.push(CutRun::new(candidate)),
        }
    }
    runs
}

/// The middle zero-weight candidate of a run, or the middle one-weight
/// candidate if the run has no zero column.
pub fn representative(run: &CutRun) -> CutCandidate {
    let zeros: Vec<&CutCandidate> = run.candidates().iter().filter(|c| c.weight == 0).collect();
    if !zeros.is_empty() {
        return *zeros[zeros.len() / 2];
    }
    let ones: Vec<&CutCandidate> = run.candidates().iter().filter(|c| c.weight != 0).collect();
    *ones[ones.len() / 2]
}

/// Cut columns for a profile, in image coordinates.
///
/// Runs shorter than `min_run_length` are ignored. A cut never lands on
/// the first or last column of the trimmed profile.
pub fn find_splits(profile: &ColumnProfile, min_run_length: usize) -> Vec<FinalSplit> {
    let len = profile.len();
    let candidates = trim_boundary_candidates(find_candidates(profile.counts()), len);
    let transform = profile.transform();

    partition_runs(candidates)
        .iter()
        .filter(|run| run.len() >= min_run_length)
        .map(representative)
        .filter(|cut| cut.column != 0 && cut.column + 1 != len)
        .map(|cut| FinalSplit {
            column: transform.to_image_column(cut.column) as u32,
            weight: cut.weight,
        })
        .collect()
}
