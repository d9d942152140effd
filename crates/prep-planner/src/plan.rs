//! Orchestration: runs every planning stage for one learner and course.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    budget::{blocks_per_week, week1_start_date, weeks_until_exam},
    pacing::{
        BlockCounter, ContentCounts, EstimatedBlockCounter, ExactBlockCounter, MAX_PACE,
        calculate_phase1_pace, check_feasibility_with, spacing_intervals,
    },
    phase::{Timeline, phase_allocation, phase_distribution},
    sequencer::generate_study_blocks,
    types::{FeasibilityResult, PhaseAllocation, StudyBlock, StudyPlanConfig, TaskType, WeekPhaseMix},
};

/// A module of the course, as known by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseModule {
    /// Module identifier
    pub id: String,
    /// Exact content inventory, when the catalog has it
    #[serde(default)]
    pub content: Option<ContentCounts>,
}

/// Catalog facts about a course, modules in syllabus order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseCatalog {
    /// Modules in the order they should be learned
    pub modules: Vec<CourseModule>,
}

impl CourseCatalog {
    /// Identifiers of the modules, in syllabus order.
    pub fn module_ids(&self) -> Vec<String> {
        self.modules.iter().map(|module| module.id.clone()).collect()
    }

    /// Exact counter when every module has content counts, estimate otherwise.
    pub fn block_counter(&self) -> Box<dyn BlockCounter> {
        let exact: Option<Vec<ContentCounts>> =
            self.modules.iter().map(|module| module.content).collect();

        match exact {
            Some(counts) if !counts.is_empty() => Box::new(ExactBlockCounter::new(counts)),
            _ => Box::new(EstimatedBlockCounter::new(
                u32::try_from(self.modules.len()).unwrap_or(u32::MAX),
            )),
        }
    }
}

/// Everything computed for one plan generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPlan {
    /// Weeks left before the exam
    pub weeks_until_exam: u32,
    /// Blocks studied per week
    pub blocks_per_week: u32,
    /// Timeline bucket, `None` when no time is left
    pub timeline: Option<Timeline>,
    /// Target split for the learner's rating
    pub allocation: PhaseAllocation,
    /// Phase emphasis week by week
    pub phase_distribution: Vec<WeekPhaseMix>,
    /// Modules per week to cover while learning
    pub phase1_pace: f64,
    /// Review intervals in days after first learning
    pub spacing_intervals: Vec<u32>,
    /// Budget versus required work
    pub feasibility: FeasibilityResult,
    /// First day of week 1
    pub week1_start_date: NaiveDate,
    /// Scheduled blocks, in `order`
    pub blocks: Vec<StudyBlock>,
    /// Messages to show the learner alongside the plan
    pub warnings: Vec<String>,
}

/// Build a complete study plan from the learner's settings and the catalog.
///
/// Blocks are laid out from the plan creation day to the exam day. The plan
/// is always built, even when the budget is too small: shortfalls end up in
/// [`StudyPlan::warnings`] and the caller decides what to do with them.
pub fn build_study_plan(config: &StudyPlanConfig, catalog: &CourseCatalog) -> StudyPlan {
    let weeks = weeks_until_exam(config.exam_date, config.plan_created_at);
    let weekly_blocks = blocks_per_week(config.study_hours_per_week);
    let allocation = phase_allocation(config.self_rating);
    let distribution = phase_distribution(weeks, &allocation);

    let counter = catalog.block_counter();
    let module_count = counter.module_count();
    let feasibility = check_feasibility_with(config, counter.as_ref());
    let pace = calculate_phase1_pace(module_count, weeks);

    let start = week1_start_date(config.plan_created_at);
    let end = config.exam_date.date_naive();
    let module_ids = catalog.module_ids();
    let blocks = generate_study_blocks(config, start, end, &module_ids, &distribution);

    let mut warnings = Vec::new();
    if weeks == 0 {
        warnings.push("The exam date has passed: there is no study time left to plan.".to_string());
    } else if blocks.is_empty() {
        warnings.push(
            "No study block could be scheduled before the exam. Check your preferred study days."
                .to_string(),
        );
    }
    if let Some(recommendation) = &feasibility.recommendation {
        warnings.push(recommendation.clone());
    }
    if weeks > 0 && pace >= MAX_PACE && weeks < module_count.div_ceil(MAX_PACE as u32) {
        warnings.push(format!(
            "Even at {MAX_PACE} modules per week, the {module_count} modules cannot all be covered before the exam."
        ));
    }
    if module_ids.is_empty() && blocks.iter().any(|b| b.task_type == TaskType::Learn) {
        warnings.push(
            "This course has no modules yet: learning sessions are scheduled without a target module."
                .to_string(),
        );
    }

    if feasibility.feasible {
        tracing::info!(
            weeks_until_exam = weeks,
            blocks = blocks.len(),
            modules = module_count,
            rating = %config.self_rating,
            "Study plan generated"
        );
    } else {
        tracing::warn!(
            weeks_until_exam = weeks,
            blocks = blocks.len(),
            modules = module_count,
            deficit = feasibility.deficit,
            "Study plan generated with insufficient study time"
        );
    }

    StudyPlan {
        weeks_until_exam: weeks,
        blocks_per_week: weekly_blocks,
        timeline: Timeline::for_weeks(weeks),
        allocation,
        phase_distribution: distribution,
        phase1_pace: pace,
        spacing_intervals: spacing_intervals(weeks).to_vec(),
        feasibility,
        week1_start_date: start,
        blocks,
        warnings,
    }
}
