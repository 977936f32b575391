use crate::model::*;

// ── Circular contiguity ──────────────────────────────────────────

/// True if the selection is one unbroken arc on the circular week.
///
/// Empty, single-day and full-week selections are trivially contiguous.
/// Otherwise the sorted days must either step by exactly one (a plain run such
/// as Mon-Wed), or the unselected days must do so, which means the selection
/// is a single run wrapping past Saturday (e.g. Fri-Sat-Sun-Mon).
pub fn is_contiguous(selection: &Selection) -> bool {
    let len = selection.len();
    if len <= 1 || len == DAYS_PER_WEEK as usize {
        return true;
    }

    let sorted: Vec<u8> = selection.iter().map(Day::index).collect();
    if steps_by_one(&sorted) {
        return true;
    }

    let gaps: Vec<u8> = selection.complement().iter().map(Day::index).collect();
    gaps.is_empty() || steps_by_one(&gaps)
}

/// Every consecutive pair in an ascending slice differs by exactly one.
fn steps_by_one(sorted: &[u8]) -> bool {
    sorted.windows(2).all(|w| w[1] - w[0] == 1)
}
