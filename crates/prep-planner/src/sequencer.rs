//! Block sequencer: turns the weekly phase mix into dated study blocks.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    budget::blocks_per_week,
    types::{StudyBlock, StudyPlanConfig, TaskType, WeekPhaseMix, weekday_index},
};

/// Round-robin assignment of Learn blocks to the course's modules.
///
/// Modules are handed out in the order given, which callers keep in syllabus
/// order. Once the list is exhausted it starts over.
#[derive(Debug, Clone, Copy)]
pub struct ModuleRotation<'a> {
    modules: &'a [String],
    cursor: usize,
}

impl<'a> ModuleRotation<'a> {
    /// Start a rotation at the first module.
    pub const fn new(modules: &'a [String]) -> Self {
        Self { modules, cursor: 0 }
    }

    /// Module at position `index` of the rotation, `None` for an empty catalog.
    pub fn target(&self, index: usize) -> Option<&'a str> {
        if self.modules.is_empty() {
            return None;
        }
        Some(self.modules[index % self.modules.len()].as_str())
    }

    /// Module for the next Learn block.
    pub fn next_target(&mut self) -> Option<&'a str> {
        let target = self.target(self.cursor);
        self.cursor += 1;
        target
    }
}

/// Blocks scheduled on one day, split by phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAllocation {
    /// Learn blocks
    pub learn: u32,
    /// Review blocks
    pub review: u32,
    /// Practice blocks
    pub practice: u32,
}

impl DayAllocation {
    /// Split `total` blocks by the week's weights.
    ///
    /// Learn and Review are rounded independently and Practice takes what is
    /// left, so the three always add up to `total`.
    pub fn split(total: u32, mix: &WeekPhaseMix) -> Self {
        let learn = round_share(total, mix.learn).min(total);
        let review = round_share(total, mix.review).min(total - learn);
        Self {
            learn,
            review,
            practice: total - learn - review,
        }
    }

    /// Blocks of `task` type.
    pub const fn count(&self, task: TaskType) -> u32 {
        match task {
            TaskType::Learn => self.learn,
            TaskType::Review => self.review,
            TaskType::Practice => self.practice,
        }
    }

    /// All blocks of the day.
    pub const fn total(&self) -> u32 {
        self.learn + self.review + self.practice
    }
}

fn round_share(total: u32, weight: f64) -> u32 {
    // weights are fractions in 0..=1, so the product fits in u32
    (f64::from(total) * weight).round().max(0.0) as u32
}

/// 1-indexed plan week `date` falls in, counted in 7-day steps from `start`.
pub fn week_of_plan(start: NaiveDate, date: NaiveDate) -> u32 {
    let elapsed = (date - start).num_days().max(0);
    u32::try_from(elapsed / 7).unwrap_or(u32::MAX - 1) + 1
}

/// Preferred study days in the calendar week (Sunday to Saturday) containing
/// `date`, limited to the plan's `[start, end]` window.
///
/// The first and last weeks of a plan are usually partial, so the count is
/// not simply the number of preferred weekdays.
pub fn study_days_in_week(
    config: &StudyPlanConfig,
    date: NaiveDate,
    start: NaiveDate,
    end: NaiveDate,
) -> u32 {
    let week_start = date - Duration::days(i64::from(weekday_index(date)));
    let first = week_start.max(start);
    let last = (week_start + Duration::days(6)).min(end);

    first
        .iter_days()
        .take_while(|day| *day <= last)
        .filter(|day| config.studies_on(*day))
        .count() as u32
}

/// Lay out study blocks on every preferred day from `start` to `end` inclusive.
///
/// Each study day gets `ceil(blocks_per_week / study days this week)` blocks,
/// split into Learn, Review and Practice by the week's entry in
/// `distribution` (the last entry is reused past the end of the table).
/// Blocks of one day are emitted Learn first, then Review, then Practice, and
/// every block gets the next value of a single plan-wide `order` counter.
/// Learn blocks target modules from `available_modules` in rotation; with an
/// empty module list they are emitted without a target.
///
/// The ceiling division means a week can receive slightly more blocks than
/// the nominal budget. Identical inputs always produce identical output.
///
/// An empty `distribution` or a config without study days yields no blocks.
pub fn generate_study_blocks(
    config: &StudyPlanConfig,
    start: NaiveDate,
    end: NaiveDate,
    available_modules: &[String],
    distribution: &[WeekPhaseMix],
) -> Vec<StudyBlock> {
    let Some(last_week) = distribution.last() else {
        return Vec::new();
    };

    let weekly_blocks = blocks_per_week(config.study_hours_per_week);
    let mut rotation = ModuleRotation::new(available_modules);
    let mut blocks = Vec::new();
    let mut order = 0;

    for date in start.iter_days().take_while(|day| *day <= end) {
        if !config.studies_on(date) {
            continue;
        }

        let week = week_of_plan(start, date);
        let mix = distribution
            .get(week as usize - 1)
            .unwrap_or(last_week);
        let study_days = study_days_in_week(config, date, start, end);
        let day = DayAllocation::split(weekly_blocks.div_ceil(study_days), mix);

        for task_type in TaskType::ALL {
            for _ in 0..day.count(task_type) {
                let target_module_id = match task_type {
                    TaskType::Learn => rotation.next_target().map(str::to_owned),
                    TaskType::Review | TaskType::Practice => None,
                };

                blocks.push(StudyBlock {
                    date,
                    task_type,
                    target_module_id,
                    target_content_item_id: None,
                    target_quiz_id: None,
                    target_flashcard_ids: None,
                    estimated_blocks: 1,
                    order,
                });
                order += 1;
            }
        }
    }

    tracing::debug!(
        %start,
        %end,
        blocks = blocks.len(),
        modules = available_modules.len(),
        "Generated study blocks"
    );

    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        phase::{phase_allocation, phase_distribution},
        types::SelfRating,
    };
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn config(hours: u32, days: Option<Vec<u8>>) -> StudyPlanConfig {
        StudyPlanConfig {
            exam_date: Utc.with_ymd_and_hms(2025, 3, 17, 9, 0, 0).unwrap(),
            study_hours_per_week: hours,
            self_rating: SelfRating::Novice,
            preferred_study_days: days,
            plan_created_at: Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap(),
        }
    }

    fn modules(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("m{i}")).collect()
    }

    fn mix(learn: f64, review: f64, practice: f64) -> WeekPhaseMix {
        WeekPhaseMix {
            week: 1,
            learn,
            review,
            practice,
        }
    }

    fn per_day(blocks: &[StudyBlock]) -> BTreeMap<NaiveDate, Vec<&StudyBlock>> {
        let mut days: BTreeMap<NaiveDate, Vec<&StudyBlock>> = BTreeMap::new();
        for block in blocks {
            days.entry(block.date).or_default().push(block);
        }
        days
    }

    #[test]
    fn test_module_rotation_cycles() {
        let catalog = modules(3);
        let mut rotation = ModuleRotation::new(&catalog);
        let targets: Vec<_> = (0..7).map(|_| rotation.next_target().unwrap()).collect();
        assert_eq!(targets, vec!["m0", "m1", "m2", "m0", "m1", "m2", "m0"]);
    }

    #[test]
    fn test_module_rotation_empty_catalog() {
        let mut rotation = ModuleRotation::new(&[]);
        assert_eq!(rotation.next_target(), None);
        assert_eq!(rotation.target(5), None);
    }

    #[test]
    fn test_day_allocation_split() {
        assert_eq!(
            DayAllocation::split(10, &mix(0.7, 0.2, 0.1)),
            DayAllocation { learn: 7, review: 2, practice: 1 }
        );
        assert_eq!(
            DayAllocation::split(3, &mix(0.7, 0.2, 0.1)),
            DayAllocation { learn: 2, review: 1, practice: 0 }
        );
        assert_eq!(
            DayAllocation::split(1, &mix(0.5, 0.3, 0.2)),
            DayAllocation { learn: 1, review: 0, practice: 0 }
        );
        // Both shares round up: review is capped so nothing goes negative
        assert_eq!(
            DayAllocation::split(1, &mix(0.5, 0.5, 0.0)),
            DayAllocation { learn: 1, review: 0, practice: 0 }
        );
    }

    #[test]
    fn test_day_allocation_total_is_exact() {
        let allocation = phase_allocation(SelfRating::Retaker);
        for weeks in [1, 3, 5, 7, 10] {
            for mix in phase_distribution(weeks, &allocation) {
                for total in 0..=40 {
                    assert_eq!(DayAllocation::split(total, &mix).total(), total);
                }
            }
        }
    }

    #[test]
    fn test_week_of_plan() {
        let start = date(2025, 1, 8);
        assert_eq!(week_of_plan(start, start), 1);
        assert_eq!(week_of_plan(start, date(2025, 1, 14)), 1);
        assert_eq!(week_of_plan(start, date(2025, 1, 15)), 2);
        assert_eq!(week_of_plan(start, date(2025, 3, 5)), 9);
    }

    #[test]
    fn test_study_days_in_partial_weeks() {
        let cfg = config(6, None);
        // Plan starts Wednesday 2025-01-08 and ends Tuesday 2025-01-21
        let (start, end) = (date(2025, 1, 8), date(2025, 1, 21));
        assert_eq!(study_days_in_week(&cfg, date(2025, 1, 8), start, end), 3);
        assert_eq!(study_days_in_week(&cfg, date(2025, 1, 13), start, end), 5);
        assert_eq!(study_days_in_week(&cfg, date(2025, 1, 21), start, end), 2);
    }

    #[test]
    fn test_weekday_filtering() {
        let cfg = config(4, Some(vec![1, 3]));
        let distribution = phase_distribution(2, &phase_allocation(SelfRating::Novice));
        // Monday 2025-01-06 .. Sunday 2025-01-19
        let blocks = generate_study_blocks(
            &cfg,
            date(2025, 1, 6),
            date(2025, 1, 19),
            &modules(3),
            &distribution,
        );

        let days: Vec<_> = per_day(&blocks).into_keys().collect();
        assert_eq!(
            days,
            vec![
                date(2025, 1, 6),
                date(2025, 1, 8),
                date(2025, 1, 13),
                date(2025, 1, 15)
            ]
        );
        for block in &blocks {
            assert!(cfg.studies_on(block.date));
        }
    }

    #[test]
    fn test_blocks_per_day_follow_study_days_in_week() {
        let cfg = config(6, None);
        let (start, end) = (date(2025, 1, 8), date(2025, 1, 21));
        let distribution = phase_distribution(2, &phase_allocation(SelfRating::Novice));
        let blocks = generate_study_blocks(&cfg, start, end, &modules(4), &distribution);

        for (day, day_blocks) in per_day(&blocks) {
            let study_days = study_days_in_week(&cfg, day, start, end);
            assert_eq!(day_blocks.len() as u32, 12u32.div_ceil(study_days), "{day}");
        }
        // Wednesday of a 3-day first week gets ceil(12 / 3) blocks
        assert_eq!(per_day(&blocks)[&date(2025, 1, 8)].len(), 4);
        // Full week: ceil(12 / 5)
        assert_eq!(per_day(&blocks)[&date(2025, 1, 13)].len(), 3);
    }

    #[test]
    fn test_day_blocks_grouped_by_phase() {
        let cfg = config(10, None);
        let distribution = phase_distribution(10, &phase_allocation(SelfRating::Novice));
        let blocks = generate_study_blocks(
            &cfg,
            date(2025, 1, 6),
            date(2025, 3, 16),
            &modules(5),
            &distribution,
        );

        for day_blocks in per_day(&blocks).values() {
            let types: Vec<_> = day_blocks.iter().map(|b| b.task_type).collect();
            let mut sorted = types.clone();
            sorted.sort();
            assert_eq!(types, sorted);
        }
    }

    #[test]
    fn test_order_is_strictly_increasing() {
        let cfg = config(8, Some(vec![0, 2, 4, 6]));
        let distribution = phase_distribution(5, &phase_allocation(SelfRating::Intermediate));
        let blocks = generate_study_blocks(
            &cfg,
            date(2025, 1, 6),
            date(2025, 2, 9),
            &modules(2),
            &distribution,
        );

        assert!(!blocks.is_empty());
        for (i, block) in blocks.iter().enumerate() {
            assert_eq!(block.order, i as u32);
            assert_eq!(block.estimated_blocks, 1);
        }
    }

    #[test]
    fn test_learn_blocks_rotate_over_modules() {
        let cfg = config(3, None);
        let distribution = vec![mix(1.0, 0.0, 0.0)];
        let blocks = generate_study_blocks(
            &cfg,
            date(2025, 1, 6),
            date(2025, 1, 17),
            &modules(3),
            &distribution,
        );

        let targets: Vec<_> = blocks
            .iter()
            .take(7)
            .map(|b| b.target_module_id.as_deref().unwrap())
            .collect();
        assert_eq!(targets, vec!["m0", "m1", "m2", "m0", "m1", "m2", "m0"]);
        assert!(blocks.iter().all(|b| b.task_type == TaskType::Learn));
    }

    #[test]
    fn test_only_learn_blocks_target_modules() {
        let cfg = config(6, None);
        let distribution = phase_distribution(3, &phase_allocation(SelfRating::Novice));
        let blocks = generate_study_blocks(
            &cfg,
            date(2025, 1, 6),
            date(2025, 1, 26),
            &modules(4),
            &distribution,
        );

        for block in &blocks {
            assert_eq!(
                block.target_module_id.is_some(),
                block.task_type == TaskType::Learn
            );
        }
    }

    #[test]
    fn test_empty_catalog_emits_untargeted_learn_blocks() {
        let cfg = config(6, None);
        let distribution = phase_distribution(1, &phase_allocation(SelfRating::Novice));
        let blocks = generate_study_blocks(
            &cfg,
            date(2025, 1, 6),
            date(2025, 1, 10),
            &[],
            &distribution,
        );

        assert!(blocks.iter().any(|b| b.task_type == TaskType::Learn));
        assert!(blocks.iter().all(|b| b.target_module_id.is_none()));
    }

    #[test]
    fn test_weeks_past_table_reuse_last_entry() {
        let cfg = config(5, Some(vec![1]));
        let distribution = vec![mix(0.0, 0.0, 1.0)];
        let blocks = generate_study_blocks(
            &cfg,
            date(2025, 1, 6),
            date(2025, 2, 28),
            &modules(1),
            &distribution,
        );

        assert_eq!(per_day(&blocks).len(), 8);
        assert!(blocks.iter().all(|b| b.task_type == TaskType::Practice));
    }

    #[test]
    fn test_degenerate_inputs_yield_no_blocks() {
        let distribution = phase_distribution(2, &phase_allocation(SelfRating::Novice));
        let (start, end) = (date(2025, 1, 6), date(2025, 1, 19));

        assert!(generate_study_blocks(&config(6, None), start, end, &modules(2), &[]).is_empty());
        assert!(
            generate_study_blocks(&config(6, Some(vec![])), start, end, &modules(2), &distribution)
                .is_empty()
        );
        assert!(
            generate_study_blocks(&config(6, None), end, start, &modules(2), &distribution)
                .is_empty()
        );
    }

    #[test]
    fn test_generation_is_deterministic() {
        let cfg = config(7, Some(vec![1, 2, 4, 6]));
        let distribution = phase_distribution(9, &phase_allocation(SelfRating::Retaker));
        let run = || {
            generate_study_blocks(
                &cfg,
                date(2025, 1, 6),
                date(2025, 3, 10),
                &modules(6),
                &distribution,
            )
        };

        assert_eq!(run(), run());
    }
}
