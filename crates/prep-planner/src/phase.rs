//! Phase mix: how study time is split between Learn, Review and Practice.
//!
//! Both the per-rating allocation and the per-timeline weekly emphasis are
//! fixed tables. They are tuned by hand, so they live here as data and are
//! tested exhaustively rather than derived.

use serde::{Deserialize, Serialize};

use crate::types::{PhaseAllocation, SelfRating, WeekPhaseMix};

const NOVICE_ALLOCATION: PhaseAllocation = PhaseAllocation {
    learn: 55,
    review: 35,
    practice: 10,
};

const INTERMEDIATE_ALLOCATION: PhaseAllocation = PhaseAllocation {
    learn: 40,
    review: 40,
    practice: 20,
};

const RETAKER_ALLOCATION: PhaseAllocation = PhaseAllocation {
    learn: 25,
    review: 35,
    practice: 40,
};

/// Allocation used while the learner has not rated themselves yet.
pub const FALLBACK_ALLOCATION: PhaseAllocation = PhaseAllocation {
    learn: 50,
    review: 30,
    practice: 20,
};

/// Target split of study time for a self-rating.
///
/// * Novice: 55 / 35 / 10
/// * Intermediate: 40 / 40 / 20
/// * Retaker: 25 / 35 / 40
pub const fn phase_allocation(rating: SelfRating) -> PhaseAllocation {
    match rating {
        SelfRating::Novice => NOVICE_ALLOCATION,
        SelfRating::Intermediate => INTERMEDIATE_ALLOCATION,
        SelfRating::Retaker => RETAKER_ALLOCATION,
    }
}

/// Like [`phase_allocation`], with [`FALLBACK_ALLOCATION`] for a missing rating.
pub const fn allocation_for(rating: Option<SelfRating>) -> PhaseAllocation {
    match rating {
        Some(rating) => phase_allocation(rating),
        None => FALLBACK_ALLOCATION,
    }
}

/// Length bucket of a plan, which decides how fast emphasis shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeline {
    /// 1 to 3 weeks
    Short,
    /// 4 to 7 weeks
    Medium,
    /// 8 weeks or more
    Long,
}

impl Timeline {
    /// Bucket for a plan of `total_weeks`, `None` when no week is left.
    pub const fn for_weeks(total_weeks: u32) -> Option<Self> {
        match total_weeks {
            0 => None,
            1..=3 => Some(Self::Short),
            4..=7 => Some(Self::Medium),
            _ => Some(Self::Long),
        }
    }

    /// The three consecutive stages of a plan of `total_weeks`.
    fn stages(self, total_weeks: u32) -> [Stage; 3] {
        match self {
            Self::Long => [
                Stage::until(4, (0.7, 0.2, 0.1)),
                Stage::until(6, (0.3, 0.5, 0.2)),
                Stage::until(total_weeks, PRACTICE_HEAVY),
            ],
            Self::Medium => {
                let learn_weeks = (total_weeks * 4).div_ceil(10);
                let review_weeks = (total_weeks * 3).div_ceil(10);
                [
                    Stage::until(learn_weeks, (0.6, 0.3, 0.1)),
                    Stage::until(learn_weeks + review_weeks, (0.2, 0.5, 0.3)),
                    Stage::until(total_weeks, PRACTICE_HEAVY),
                ]
            }
            Self::Short => [
                Stage::until(1, (0.5, 0.3, 0.2)),
                Stage::until(total_weeks.saturating_sub(1), (0.3, 0.4, 0.3)),
                Stage::until(total_weeks, (0.1, 0.2, 0.7)),
            ],
        }
    }
}

const PRACTICE_HEAVY: (f64, f64, f64) = (0.1, 0.3, 0.6);

#[derive(Debug, Clone, Copy)]
struct Stage {
    last_week: u32,
    weights: (f64, f64, f64),
}

impl Stage {
    const fn until(last_week: u32, weights: (f64, f64, f64)) -> Self {
        Self { last_week, weights }
    }
}

/// Week-by-week phase emphasis for a plan of `total_weeks`.
///
/// Early weeks lean on Learn, later weeks on Practice. How quickly that
/// happens depends on the [`Timeline`] bucket:
///
/// * 8+ weeks: weeks 1-4 (0.7, 0.2, 0.1), weeks 5-6 (0.3, 0.5, 0.2), then (0.1, 0.3, 0.6)
/// * 4-7 weeks: `ceil(40%)` weeks at (0.6, 0.3, 0.1), the next `ceil(30%)` at
///   (0.2, 0.5, 0.3), then (0.1, 0.3, 0.6)
/// * 1-3 weeks: first week (0.5, 0.3, 0.2), last week (0.1, 0.2, 0.7), in between (0.3, 0.4, 0.3)
///
/// The emphasis does not depend on the rating today; the allocation is taken
/// so rating-specific schedules can be introduced without changing callers.
/// Zero weeks yields an empty table, meaning no plan can be built.
pub fn phase_distribution(total_weeks: u32, _allocation: &PhaseAllocation) -> Vec<WeekPhaseMix> {
    let Some(timeline) = Timeline::for_weeks(total_weeks) else {
        return Vec::new();
    };
    let stages = timeline.stages(total_weeks);

    (1..=total_weeks)
        .map(|week| {
            let stage = stages
                .iter()
                .find(|stage| week <= stage.last_week)
                .unwrap_or(&stages[2]);
            let (learn, review, practice) = stage.weights;
            WeekPhaseMix {
                week,
                learn,
                review,
                practice,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights(distribution: &[WeekPhaseMix]) -> Vec<(f64, f64, f64)> {
        distribution
            .iter()
            .map(|w| (w.learn, w.review, w.practice))
            .collect()
    }

    #[test]
    fn test_phase_allocation_table() {
        assert_eq!(
            phase_allocation(SelfRating::Novice),
            PhaseAllocation { learn: 55, review: 35, practice: 10 }
        );
        assert_eq!(
            phase_allocation(SelfRating::Intermediate),
            PhaseAllocation { learn: 40, review: 40, practice: 20 }
        );
        assert_eq!(
            phase_allocation(SelfRating::Retaker),
            PhaseAllocation { learn: 25, review: 35, practice: 40 }
        );
        assert_eq!(allocation_for(None), FALLBACK_ALLOCATION);
    }

    #[test]
    fn test_phase_allocation_sums_to_100() {
        for rating in SelfRating::ALL {
            assert_eq!(phase_allocation(rating).total(), 100, "{rating}");
        }
        assert_eq!(FALLBACK_ALLOCATION.total(), 100);
    }

    #[test]
    fn test_timeline_buckets() {
        assert_eq!(Timeline::for_weeks(0), None);
        assert_eq!(Timeline::for_weeks(1), Some(Timeline::Short));
        assert_eq!(Timeline::for_weeks(3), Some(Timeline::Short));
        assert_eq!(Timeline::for_weeks(4), Some(Timeline::Medium));
        assert_eq!(Timeline::for_weeks(7), Some(Timeline::Medium));
        assert_eq!(Timeline::for_weeks(8), Some(Timeline::Long));
        assert_eq!(Timeline::for_weeks(52), Some(Timeline::Long));
    }

    #[test]
    fn test_distribution_weights_sum_to_one() {
        let allocation = phase_allocation(SelfRating::Intermediate);
        for total in [1, 2, 3, 4, 5, 6, 7, 8, 12, 30] {
            let distribution = phase_distribution(total, &allocation);
            assert_eq!(distribution.len(), total as usize);
            for (i, week) in distribution.iter().enumerate() {
                assert_eq!(week.week, i as u32 + 1);
                let sum = week.learn + week.review + week.practice;
                assert!((sum - 1.0).abs() < 1e-9, "week {} of {total}: {sum}", week.week);
            }
        }
    }

    #[test]
    fn test_zero_weeks_is_empty() {
        assert!(phase_distribution(0, &FALLBACK_ALLOCATION).is_empty());
    }

    #[test]
    fn test_short_timeline() {
        let one = phase_distribution(1, &NOVICE_ALLOCATION);
        assert_eq!(weights(&one), vec![(0.5, 0.3, 0.2)]);

        let two = phase_distribution(2, &NOVICE_ALLOCATION);
        assert_eq!(weights(&two), vec![(0.5, 0.3, 0.2), (0.1, 0.2, 0.7)]);

        let three = phase_distribution(3, &NOVICE_ALLOCATION);
        assert_eq!(
            weights(&three),
            vec![(0.5, 0.3, 0.2), (0.3, 0.4, 0.3), (0.1, 0.2, 0.7)]
        );
    }

    #[test]
    fn test_medium_timeline_boundaries() {
        const LEARN: (f64, f64, f64) = (0.6, 0.3, 0.1);
        const REVIEW: (f64, f64, f64) = (0.2, 0.5, 0.3);

        // 4 weeks: ceil(1.6) = 2 learn, ceil(1.2) = 2 review, 0 practice
        let four = phase_distribution(4, &NOVICE_ALLOCATION);
        assert_eq!(weights(&four), vec![LEARN, LEARN, REVIEW, REVIEW]);

        // 6 weeks: ceil(2.4) = 3 learn, ceil(1.8) = 2 review, 1 practice
        let six = phase_distribution(6, &NOVICE_ALLOCATION);
        assert_eq!(
            weights(&six),
            vec![LEARN, LEARN, LEARN, REVIEW, REVIEW, PRACTICE_HEAVY]
        );

        // 7 weeks: ceil(2.8) = 3 learn, ceil(2.1) = 3 review, 1 practice
        let seven = phase_distribution(7, &NOVICE_ALLOCATION);
        assert_eq!(
            weights(&seven),
            vec![LEARN, LEARN, LEARN, REVIEW, REVIEW, REVIEW, PRACTICE_HEAVY]
        );
    }

    #[test]
    fn test_long_timeline_boundaries() {
        const LEARN: (f64, f64, f64) = (0.7, 0.2, 0.1);
        const REVIEW: (f64, f64, f64) = (0.3, 0.5, 0.2);

        let eight = phase_distribution(8, &NOVICE_ALLOCATION);
        assert_eq!(
            weights(&eight),
            vec![
                LEARN,
                LEARN,
                LEARN,
                LEARN,
                REVIEW,
                REVIEW,
                PRACTICE_HEAVY,
                PRACTICE_HEAVY
            ]
        );

        let twelve = phase_distribution(12, &NOVICE_ALLOCATION);
        assert!(twelve[6..].iter().all(|w| (w.learn, w.review, w.practice) == PRACTICE_HEAVY));
    }

    #[test]
    fn test_bucket_change_between_3_and_4_weeks() {
        let three = phase_distribution(3, &NOVICE_ALLOCATION);
        let four = phase_distribution(4, &NOVICE_ALLOCATION);
        assert_eq!(three[0].learn, 0.5);
        assert_eq!(four[0].learn, 0.6);
    }
}
