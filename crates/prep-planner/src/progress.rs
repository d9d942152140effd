//! Read-side views over a generated plan: exam countdown, weekly summary and
//! today's blocks.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    budget::days_until_exam,
    sequencer::week_of_plan,
    types::{StudyBlock, TaskType},
};

/// How the learner's progress compares to the time already spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// At least 90% of the expected progress
    OnTrack,
    /// Between 70% and 90% of the expected progress
    SlightlyBehind,
    /// Below 70% of the expected progress
    AtRisk,
}

/// Exam countdown shown on the course dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExamStatus {
    /// Days left, rounded up; negative once the exam is over
    pub days_until_exam: i64,
    /// Progress compared to the calendar
    pub status: PlanStatus,
    /// Completed share of the plan's blocks, in percent
    pub progress_percentage: f64,
    /// Share of the plan's time span already elapsed, in percent
    pub expected_percentage: f64,
}

/// Completion counts of a persisted plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockProgress {
    /// Blocks the learner has completed
    pub completed_blocks: u32,
    /// Blocks in the plan
    pub total_blocks: u32,
}

impl BlockProgress {
    /// Completed share, in percent. 0 for an empty plan.
    pub fn percentage(&self) -> f64 {
        if self.total_blocks == 0 {
            return 0.0;
        }
        f64::from(self.completed_blocks.min(self.total_blocks)) / f64::from(self.total_blocks)
            * 100.0
    }
}

/// Compare completed blocks with the share of the plan's time span elapsed at `now`.
///
/// The plan spans from `plan_created_at` to `exam_date`.
pub fn exam_status(
    exam_date: DateTime<Utc>,
    plan_created_at: DateTime<Utc>,
    now: DateTime<Utc>,
    progress: BlockProgress,
) -> ExamStatus {
    let progress_percentage = progress.percentage();

    let span = (exam_date - plan_created_at).num_milliseconds();
    let expected_percentage = if span > 0 {
        let elapsed = (now - plan_created_at).num_milliseconds();
        (elapsed as f64 / span as f64 * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    let status = if progress_percentage >= expected_percentage * 0.9 {
        PlanStatus::OnTrack
    } else if progress_percentage >= expected_percentage * 0.7 {
        PlanStatus::SlightlyBehind
    } else {
        PlanStatus::AtRisk
    };

    ExamStatus {
        days_until_exam: days_until_exam(exam_date, now),
        status,
        progress_percentage,
        expected_percentage,
    }
}

/// Dominant kind of work in a week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeekPhase {
    /// Learn blocks are the majority
    Learn,
    /// Review blocks are the majority
    Review,
    /// Practice blocks are the majority
    Practice,
    /// No task type holds a majority
    Mixed,
}

/// Blocks of one plan week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSummary {
    /// 1-indexed week of the plan
    pub week_number: u32,
    /// First day of the week
    pub week_start_date: NaiveDate,
    /// Last day of the week
    pub week_end_date: NaiveDate,
    /// Learn blocks
    pub learn_blocks: u32,
    /// Review blocks
    pub review_blocks: u32,
    /// Practice blocks
    pub practice_blocks: u32,
    /// Sum of the blocks' estimated sizes
    pub estimated_blocks: u32,
    /// Dominant kind of work
    pub phase: WeekPhase,
}

impl WeekSummary {
    fn new(week_number: u32, start: NaiveDate) -> Self {
        let week_start_date = start + Duration::weeks(i64::from(week_number - 1));
        Self {
            week_number,
            week_start_date,
            week_end_date: week_start_date + Duration::days(6),
            learn_blocks: 0,
            review_blocks: 0,
            practice_blocks: 0,
            estimated_blocks: 0,
            phase: WeekPhase::Mixed,
        }
    }

    fn add(&mut self, block: &StudyBlock) {
        match block.task_type {
            TaskType::Learn => self.learn_blocks += 1,
            TaskType::Review => self.review_blocks += 1,
            TaskType::Practice => self.practice_blocks += 1,
        }
        self.estimated_blocks += block.estimated_blocks;
    }

    fn dominant_phase(&self) -> WeekPhase {
        let total = self.learn_blocks + self.review_blocks + self.practice_blocks;
        [
            (self.learn_blocks, WeekPhase::Learn),
            (self.review_blocks, WeekPhase::Review),
            (self.practice_blocks, WeekPhase::Practice),
        ]
        .into_iter()
        .find(|(count, _)| count * 2 > total)
        .map_or(WeekPhase::Mixed, |(_, phase)| phase)
    }
}

/// Group `blocks` into plan weeks counted from `start`.
///
/// Weeks without any block are left out.
pub fn weekly_summary(blocks: &[StudyBlock], start: NaiveDate) -> Vec<WeekSummary> {
    let mut weeks: BTreeMap<u32, WeekSummary> = BTreeMap::new();
    for block in blocks {
        let week = week_of_plan(start, block.date);
        weeks
            .entry(week)
            .or_insert_with(|| WeekSummary::new(week, start))
            .add(block);
    }

    weeks
        .into_values()
        .map(|mut week| {
            week.phase = week.dominant_phase();
            week
        })
        .collect()
}

/// Blocks scheduled on `date`, in plan order.
pub fn blocks_for_day(blocks: &[StudyBlock], date: NaiveDate) -> Vec<&StudyBlock> {
    blocks.iter().filter(|block| block.date == date).collect()
}
