use chrono::{DateTime, Utc};
use prep_planner::{
    CourseCatalog, CourseModule, FeasibilityResult, PhaseAllocation, SelfRating, StudyPlan,
    StudyPlanConfig, WeekPhaseMix, phase::Timeline, progress::WeekSummary,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ApiError;

/// Learner settings plus the course's modules, in syllabus order.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StudyPlanRequest {
    pub exam_date: DateTime<Utc>,
    pub study_hours_per_week: u32,
    /// `NOVICE`, `INTERMEDIATE` or `RETAKER`
    pub self_rating: String,
    /// Weekday indices, Sunday = 0. Monday to Friday when omitted.
    #[validate(length(max = 7))]
    pub preferred_study_days: Option<Vec<u8>>,
    /// Reference "now" of the plan; the request time when omitted
    pub plan_created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub modules: Vec<CourseModule>,
}

impl StudyPlanRequest {
    /// Split the request into engine inputs, pinning "now" to `now` when the
    /// caller did not provide a creation time.
    pub fn into_inputs(self, now: DateTime<Utc>) -> Result<(StudyPlanConfig, CourseCatalog), ApiError> {
        self.validate()?;

        let config = StudyPlanConfig {
            exam_date: self.exam_date,
            study_hours_per_week: self.study_hours_per_week,
            self_rating: self.self_rating.parse::<SelfRating>()?,
            preferred_study_days: self.preferred_study_days,
            plan_created_at: self.plan_created_at.unwrap_or(now),
        };

        if self.modules.iter().any(|module| module.id.trim().is_empty()) {
            return Err(ApiError::Validation(
                "Module IDs cannot be empty".to_string(),
            ));
        }

        Ok((
            config,
            CourseCatalog {
                modules: self.modules,
            },
        ))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StudyPlanResponse {
    #[serde(flatten)]
    pub plan: StudyPlan,
    pub weekly_summary: Vec<WeekSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeasibilityResponse {
    #[serde(flatten)]
    pub feasibility: FeasibilityResult,
    pub weeks_until_exam: u32,
    pub blocks_per_week: u32,
    pub phase1_pace: f64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PhaseDistributionRequest {
    /// Fallback allocation when the learner has not rated themselves yet
    pub self_rating: Option<String>,
    #[validate(range(max = 520))]
    pub total_weeks: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PhaseDistributionResponse {
    pub allocation: PhaseAllocation,
    pub timeline: Option<Timeline>,
    pub distribution: Vec<WeekPhaseMix>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExamStatusRequest {
    pub exam_date: DateTime<Utc>,
    pub plan_created_at: DateTime<Utc>,
    pub completed_blocks: u32,
    pub total_blocks: u32,
    /// Defaults to the request time
    pub now: Option<DateTime<Utc>>,
}
