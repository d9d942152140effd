//! Pacing and feasibility: how much work the course needs, how fast new
//! modules should be covered, and whether the weekly budget is enough.

use serde::{Deserialize, Serialize};

use crate::{
    budget::{BLOCKS_PER_HOUR, blocks_per_week, weeks_until_exam},
    types::{FeasibilityResult, StudyPlanConfig},
};

/// Blocks needed to watch one video.
pub const VIDEO_BLOCKS: u32 = 2;
/// Blocks needed to take one quiz.
pub const QUIZ_BLOCKS: u32 = 1;
/// Blocks needed to read one note.
pub const NOTE_BLOCKS: u32 = 1;

/// Pace used when time is neither short nor plentiful, in modules per week.
pub const DEFAULT_PACE: f64 = 3.0;
/// Slowest pace, used when the exam is far away.
pub const MIN_PACE: f64 = 1.0;
/// Fastest pace, used when the exam is close.
pub const MAX_PACE: f64 = 6.0;

/// Blocks needed to go through a module's content once.
pub const fn calculate_module_blocks(videos: u32, quizzes: u32, notes: u32) -> u32 {
    videos * VIDEO_BLOCKS + quizzes * QUIZ_BLOCKS + notes * NOTE_BLOCKS
}

/// Content inventory of one module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentCounts {
    /// Number of videos
    pub videos: u32,
    /// Number of quizzes
    pub quizzes: u32,
    /// Number of notes
    pub notes: u32,
}

impl ContentCounts {
    /// Blocks needed to go through this content once.
    pub const fn blocks(&self) -> u32 {
        calculate_module_blocks(self.videos, self.quizzes, self.notes)
    }
}

/// Blocks a course needs, split by phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseBlockEstimate {
    /// First pass through all modules
    pub learn: u32,
    /// Two review sessions per module
    pub min_review: u32,
    /// Two mock exams of four blocks plus one drill per module
    pub min_practice: u32,
    /// Sum of the three
    pub total: u32,
}

impl CourseBlockEstimate {
    fn from_learn(learn: u32, module_count: u32) -> Self {
        let min_review = module_count * 2;
        let min_practice = 8 + module_count;
        Self {
            learn,
            min_review,
            min_practice,
            total: learn + min_review + min_practice,
        }
    }
}

/// Coarse block estimate from the module count alone.
///
/// Assumes the typical module shape of one video, one quiz and one note
/// (4 blocks). Only used when the catalog has no exact content counts.
pub fn estimate_course_blocks(module_count: u32) -> CourseBlockEstimate {
    const TYPICAL_MODULE: ContentCounts = ContentCounts {
        videos: 1,
        quizzes: 1,
        notes: 1,
    };

    CourseBlockEstimate::from_learn(module_count * TYPICAL_MODULE.blocks(), module_count)
}

/// Strategy for sizing the work a course requires.
pub trait BlockCounter {
    /// Number of modules in the course.
    fn module_count(&self) -> u32;

    /// Blocks the course needs, split by phase.
    fn course_blocks(&self) -> CourseBlockEstimate;
}

/// Sizes a course from its module count, see [`estimate_course_blocks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstimatedBlockCounter {
    module_count: u32,
}

impl EstimatedBlockCounter {
    /// Create a counter for a course of `module_count` modules.
    pub const fn new(module_count: u32) -> Self {
        Self { module_count }
    }
}

impl BlockCounter for EstimatedBlockCounter {
    fn module_count(&self) -> u32 {
        self.module_count
    }

    fn course_blocks(&self) -> CourseBlockEstimate {
        estimate_course_blocks(self.module_count)
    }
}

/// Sizes a course from the real content of each module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactBlockCounter {
    modules: Vec<ContentCounts>,
}

impl ExactBlockCounter {
    /// Create a counter from per-module content counts.
    pub const fn new(modules: Vec<ContentCounts>) -> Self {
        Self { modules }
    }
}

impl BlockCounter for ExactBlockCounter {
    fn module_count(&self) -> u32 {
        u32::try_from(self.modules.len()).unwrap_or(u32::MAX)
    }

    fn course_blocks(&self) -> CourseBlockEstimate {
        let learn = self.modules.iter().map(ContentCounts::blocks).sum();
        CourseBlockEstimate::from_learn(learn, self.module_count())
    }
}

/// Modules per week the Learn phase should cover.
///
/// Starts from [`DEFAULT_PACE`]. With at least twice the weeks the default
/// pace needs, the pace drops toward [`MIN_PACE`]; with fewer weeks than the
/// default pace needs, it rises toward [`MAX_PACE`]. The result saturates at
/// [`MAX_PACE`] when even that cannot fit: detecting that the course does not
/// fit is the feasibility check's job.
///
/// # Arguments
///
/// * `total_modules` - Number of modules in the course
/// * `weeks_until_exam` - Weeks left, see [`weeks_until_exam`]
pub fn calculate_phase1_pace(total_modules: u32, weeks_until_exam: u32) -> f64 {
    if total_modules == 0 {
        return MIN_PACE;
    }

    let weeks_at_default_pace = total_modules.div_ceil(DEFAULT_PACE as u32);
    let weeks = f64::from(weeks_until_exam);
    let default_weeks = f64::from(weeks_at_default_pace);

    // Plenty of time: slow down
    if weeks_until_exam >= weeks_at_default_pace * 2 {
        let ratio = ((weeks - default_weeks) / default_weeks).min(1.0);
        return (DEFAULT_PACE - (DEFAULT_PACE - MIN_PACE) * ratio).max(MIN_PACE);
    }

    if weeks_until_exam >= weeks_at_default_pace {
        return DEFAULT_PACE;
    }

    // Exam is close: speed up
    let weeks_at_max_pace = total_modules.div_ceil(MAX_PACE as u32);
    if weeks_until_exam < weeks_at_max_pace || weeks_at_default_pace == weeks_at_max_pace {
        return MAX_PACE;
    }

    let ratio = (default_weeks - weeks) / (default_weeks - f64::from(weeks_at_max_pace));
    (DEFAULT_PACE + (MAX_PACE - DEFAULT_PACE) * ratio).min(MAX_PACE)
}

/// Days after first learning at which a module comes back for review.
///
/// Long plans get an extra 45-day repetition. Shorter plans keep the
/// standard intervals even if the last ones do not fit before the exam.
pub const fn spacing_intervals(weeks_until_exam: u32) -> &'static [u32] {
    if weeks_until_exam >= 8 {
        &[1, 4, 10, 21, 45]
    } else {
        &[1, 4, 10, 21]
    }
}

/// Check the weekly budget against the coarse estimate for `module_count` modules.
pub fn check_feasibility(config: &StudyPlanConfig, module_count: u32) -> FeasibilityResult {
    check_feasibility_with(config, &EstimatedBlockCounter::new(module_count))
}

/// Check the weekly budget against the blocks `counter` says the course needs.
///
/// Never fails: a budget that is too small is reported through
/// [`FeasibilityResult::feasible`], a deficit and a recommendation.
pub fn check_feasibility_with(
    config: &StudyPlanConfig,
    counter: &dyn BlockCounter,
) -> FeasibilityResult {
    let weeks = weeks_until_exam(config.exam_date, config.plan_created_at);
    let blocks_available = weeks.saturating_mul(blocks_per_week(config.study_hours_per_week));
    let blocks_required = counter.course_blocks().total;

    if blocks_available >= blocks_required {
        tracing::debug!(
            blocks_available,
            blocks_required,
            "Study plan fits the weekly budget"
        );
        return FeasibilityResult {
            feasible: true,
            blocks_available,
            blocks_required,
            deficit: None,
            recommendation: None,
        };
    }

    let deficit = blocks_required - blocks_available;
    let coverage = (f64::from(blocks_available) / f64::from(blocks_required) * 100.0).round();
    let additional_hours = deficit.div_ceil(BLOCKS_PER_HOUR);

    tracing::debug!(
        blocks_available,
        blocks_required,
        deficit,
        "Study plan exceeds the weekly budget"
    );

    FeasibilityResult {
        feasible: false,
        blocks_available,
        blocks_required,
        deficit: Some(deficit),
        recommendation: Some(format!(
            "At this pace, you'll cover approximately {coverage}% of the content before the exam. \
             Consider increasing weekly study time by {additional_hours} hours, or accept a \
             \"minimum viable\" path focusing on high-yield content."
        )),
    }
}
