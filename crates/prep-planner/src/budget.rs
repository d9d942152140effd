//! Time budget: how much study time is left before the exam.

use chrono::{DateTime, NaiveDate, Utc};

/// One hour of study is two blocks of roughly 25-30 minutes.
pub const BLOCKS_PER_HOUR: u32 = 2;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Number of (partial) weeks between `from_date` and the exam.
///
/// The gap is first rounded up to whole days, then to whole weeks, so an exam
/// one hour away still counts as one week. An exam at or before `from_date`
/// yields 0, which callers treat as "no time left" rather than as an error.
///
/// # Arguments
///
/// * `exam_date` - When the exam takes place
/// * `from_date` - Reference "now", usually the plan creation time
pub fn weeks_until_exam(exam_date: DateTime<Utc>, from_date: DateTime<Utc>) -> u32 {
    let millis = (exam_date - from_date).num_milliseconds();
    if millis <= 0 {
        return 0;
    }

    let days = (millis as u64).div_ceil(MILLIS_PER_DAY as u64);
    u32::try_from(days.div_ceil(7)).unwrap_or(u32::MAX)
}

/// Blocks the learner can study per week.
pub const fn blocks_per_week(study_hours_per_week: u32) -> u32 {
    study_hours_per_week * BLOCKS_PER_HOUR
}

/// Whole days until the exam, rounded up. Negative once the exam has passed.
pub fn days_until_exam(exam_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (exam_date - now).num_milliseconds();
    millis.div_euclid(MILLIS_PER_DAY) + i64::from(millis.rem_euclid(MILLIS_PER_DAY) != 0)
}

/// First day of week 1.
///
/// Week 1 starts on the day the plan is generated, not on the following
/// Monday, so a plan created on a Wednesday has a short first week.
pub fn week1_start_date(plan_created_at: DateTime<Utc>) -> NaiveDate {
    plan_created_at.date_naive()
}
