//! Input checks a caller runs before planning.
//!
//! The planning stages assume validated settings. When they get bad input
//! anyway they degrade to an empty plan instead of failing, which is why
//! these checks are separate.

use chrono::{DateTime, Utc};

use crate::{budget::weeks_until_exam, error::PlanError, types::StudyPlanConfig};

/// Smallest accepted weekly study budget, in hours.
pub const MIN_STUDY_HOURS: u32 = 1;
/// Largest accepted weekly study budget, in hours.
pub const MAX_STUDY_HOURS: u32 = 40;

/// Validate the weekly study budget.
///
/// # Examples
/// ```
/// use prep_planner::validation::validate_study_hours;
///
/// assert!(validate_study_hours(6).is_ok());
/// assert!(validate_study_hours(0).is_err());
/// ```
pub fn validate_study_hours(hours: u32) -> Result<(), PlanError> {
    if !(MIN_STUDY_HOURS..=MAX_STUDY_HOURS).contains(&hours) {
        return Err(PlanError::StudyHoursOutOfRange {
            hours,
            min: MIN_STUDY_HOURS,
            max: MAX_STUDY_HOURS,
        });
    }

    Ok(())
}

/// Validate preferred study days: at least one, each in 0..=6.
pub fn validate_study_days(days: &[u8]) -> Result<(), PlanError> {
    if days.is_empty() {
        return Err(PlanError::NoStudyDays);
    }

    if let Some(&day) = days.iter().find(|&&day| day > 6) {
        return Err(PlanError::InvalidStudyDay(day));
    }

    Ok(())
}

/// Validate that the exam is after `now` and at most `max_weeks` away.
pub fn validate_exam_date(
    exam_date: DateTime<Utc>,
    now: DateTime<Utc>,
    max_weeks: u32,
) -> Result<(), PlanError> {
    if exam_date <= now {
        return Err(PlanError::ExamDateNotInFuture);
    }

    let weeks = weeks_until_exam(exam_date, now);
    if weeks > max_weeks {
        return Err(PlanError::ExamTooFar { weeks, max_weeks });
    }

    Ok(())
}

/// Run every check on `config`, using `now` as the current time.
pub fn validate_config(
    config: &StudyPlanConfig,
    now: DateTime<Utc>,
    max_weeks: u32,
) -> Result<(), PlanError> {
    validate_exam_date(config.exam_date, now, max_weeks)?;
    validate_study_hours(config.study_hours_per_week)?;
    validate_study_days(config.study_days())?;
    Ok(())
}
