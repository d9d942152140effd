//! Inputs and outputs shared by every planning stage.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// Study days used when the learner never picked any: Monday to Friday.
pub const DEFAULT_STUDY_DAYS: [u8; 5] = [1, 2, 3, 4, 5];

/// Learner's self-assessed proficiency, collected during orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelfRating {
    /// First contact with the material
    Novice,
    /// Knows parts of the syllabus already
    Intermediate,
    /// Sat the exam before and failed
    Retaker,
}

impl SelfRating {
    /// Every rating, in ascending order of prior knowledge.
    pub const ALL: [Self; 3] = [Self::Novice, Self::Intermediate, Self::Retaker];

    /// Stored representation of the rating.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Novice => "NOVICE",
            Self::Intermediate => "INTERMEDIATE",
            Self::Retaker => "RETAKER",
        }
    }
}

impl fmt::Display for SelfRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelfRating {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NOVICE" => Ok(Self::Novice),
            "INTERMEDIATE" => Ok(Self::Intermediate),
            "RETAKER" => Ok(Self::Retaker),
            _ => Err(PlanError::UnknownSelfRating(s.to_string())),
        }
    }
}

/// Kind of work a block asks the learner to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    /// First pass through new content
    Learn,
    /// Spaced-repetition consolidation
    Review,
    /// Exam-simulation drilling
    Practice,
}

impl TaskType {
    /// Task types in the order they are emitted within a day.
    pub const ALL: [Self; 3] = [Self::Learn, Self::Review, Self::Practice];
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Learn => "LEARN",
            Self::Review => "REVIEW",
            Self::Practice => "PRACTICE",
        })
    }
}

/// Learner settings a plan is computed from.
///
/// `plan_created_at` is the reference "now" for every relative calculation,
/// so the same config always yields the same plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyPlanConfig {
    /// Date and time of the exam
    pub exam_date: DateTime<Utc>,
    /// Weekly study budget in hours
    pub study_hours_per_week: u32,
    /// Self-assessed proficiency
    pub self_rating: SelfRating,
    /// Weekday indices the learner studies on (Sunday = 0 ... Saturday = 6)
    #[serde(default)]
    pub preferred_study_days: Option<Vec<u8>>,
    /// When the plan was (re)generated
    pub plan_created_at: DateTime<Utc>,
}

impl StudyPlanConfig {
    /// Preferred weekdays, falling back to [`DEFAULT_STUDY_DAYS`] when unset.
    pub fn study_days(&self) -> &[u8] {
        self.preferred_study_days
            .as_deref()
            .unwrap_or(&DEFAULT_STUDY_DAYS)
    }

    /// Whether `date` falls on one of the learner's study days.
    pub fn studies_on(&self, date: NaiveDate) -> bool {
        self.study_days().contains(&weekday_index(date))
    }
}

/// Weekday index of `date` with Sunday as 0.
pub fn weekday_index(date: NaiveDate) -> u8 {
    // num_days_from_sunday is always in 0..7
    date.weekday().num_days_from_sunday() as u8
}

/// Percentage split of study time across the three phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseAllocation {
    /// Learn share in percent
    pub learn: u8,
    /// Review share in percent
    pub review: u8,
    /// Practice share in percent
    pub practice: u8,
}

impl PhaseAllocation {
    /// Sum of the three shares. Always 100 for the built-in tables.
    pub const fn total(&self) -> u16 {
        self.learn as u16 + self.review as u16 + self.practice as u16
    }
}

/// Phase emphasis for one week of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeekPhaseMix {
    /// 1-indexed week of the plan
    pub week: u32,
    /// Fraction of the week's blocks spent learning
    pub learn: f64,
    /// Fraction of the week's blocks spent reviewing
    pub review: f64,
    /// Fraction of the week's blocks spent practicing
    pub practice: f64,
}

/// One unit of scheduled work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyBlock {
    /// Day the block is scheduled on
    pub date: NaiveDate,
    /// Kind of work
    pub task_type: TaskType,
    /// Module to study (Learn blocks only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_module_id: Option<String>,
    /// Specific content item to study
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_content_item_id: Option<String>,
    /// Quiz to take
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_quiz_id: Option<String>,
    /// Flashcards to review
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_flashcard_ids: Option<Vec<String>>,
    /// Size of the block in block units
    pub estimated_blocks: u32,
    /// Position of the block within the whole plan
    pub order: u32,
}

/// Whether the weekly budget covers the work the course needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeasibilityResult {
    /// Whether the available blocks cover the required ones
    pub feasible: bool,
    /// Blocks the learner has before the exam
    pub blocks_available: u32,
    /// Blocks the course is estimated to need
    pub blocks_required: u32,
    /// Missing blocks, only when infeasible
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deficit: Option<u32>,
    /// User-facing remediation, only when infeasible
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}
