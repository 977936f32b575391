use crate::config::ScheduleConfig;
use crate::model::*;

use super::contiguity::is_contiguous;

pub const CONTIGUITY_MESSAGE: &str =
    "Please select contiguous days (e.g., Mon-Tue-Wed, not Mon-Wed-Fri)";

/// Full validation of a selection against night-count bounds and contiguity.
///
/// Bound checks run before the contiguity check, so a selection that is both
/// too long and broken reports `TooManyNights`. An empty selection is always
/// valid: it means "no schedule filter".
pub fn validate(
    selection: &Selection,
    min_nights: usize,
    max_nights: usize,
    require_contiguous: bool,
) -> ValidationResult {
    if selection.is_empty() {
        return ValidationResult::Valid;
    }

    let nights = selection.night_count();
    if nights < min_nights {
        return ValidationResult::Invalid {
            kind: ErrorKind::TooFewNights,
            message: format!(
                "Please select at least {min_nights} {}",
                plural(min_nights, "night")
            ),
        };
    }
    if nights > max_nights {
        return ValidationResult::Invalid {
            kind: ErrorKind::TooManyNights,
            message: format!(
                "Please select no more than {max_nights} {}",
                plural(max_nights, "night")
            ),
        };
    }
    if require_contiguous && !is_contiguous(selection) {
        return not_contiguous();
    }
    ValidationResult::Valid
}

/// `validate` with bounds taken from a config.
pub fn validate_with(selection: &Selection, config: &ScheduleConfig) -> ValidationResult {
    validate(
        selection,
        config.min_nights,
        config.max_nights,
        config.require_contiguous,
    )
}

/// Contiguity-only check, ignoring night bounds. `None` when there is nothing
/// to report (contiguous, or fewer than two days).
pub fn check_contiguity(selection: &Selection) -> Option<ValidationResult> {
    if selection.len() > 1 && !is_contiguous(selection) {
        Some(not_contiguous())
    } else {
        None
    }
}

fn not_contiguous() -> ValidationResult {
    ValidationResult::Invalid {
        kind: ErrorKind::NotContiguous,
        message: CONTIGUITY_MESSAGE.to_string(),
    }
}
