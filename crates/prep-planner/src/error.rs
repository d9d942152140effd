use thiserror::Error;

/// Rejected planning input.
///
/// Planning itself never fails; these are raised by the validation helpers a
/// caller runs before handing a config to the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Unknown self rating: '{0}'. Expected NOVICE, INTERMEDIATE or RETAKER")]
    UnknownSelfRating(String),
    #[error("Exam date must be in the future")]
    ExamDateNotInFuture,
    #[error("Exam date is {weeks} weeks away, plans are limited to {max_weeks} weeks")]
    ExamTooFar { weeks: u32, max_weeks: u32 },
    #[error("Study hours per week must be between {min} and {max}, got {hours}")]
    StudyHoursOutOfRange { hours: u32, min: u32, max: u32 },
    #[error("At least one preferred study day is required")]
    NoStudyDays,
    #[error("Invalid study day {0}: weekdays are numbered 0 (Sunday) to 6 (Saturday)")]
    InvalidStudyDay(u8),
}
