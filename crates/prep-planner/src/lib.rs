//! Study plan scheduling for exam preparation.
//!
//! This crate turns a learner's settings (exam date, weekly study time,
//! self-rating and preferred days) into a sequence of dated Learn, Review and
//! Practice blocks. Every function is pure: "now" and the course catalog are
//! passed in, nothing is read from a clock or a database, and the same
//! inputs always produce the same plan.
//!
//! The stages can be used on their own, or chained with
//! [`plan::build_study_plan`]:
//!
//! * [`budget`]: weeks and blocks available before the exam
//! * [`phase`]: Learn / Review / Practice split, week by week
//! * [`pacing`]: work required, Learn pace and feasibility
//! * [`sequencer`]: dated blocks on the learner's study days

pub mod budget;
pub mod error;
pub mod pacing;
pub mod phase;
pub mod plan;
pub mod progress;
pub mod sequencer;
pub mod types;
pub mod validation;

pub use error::PlanError;
pub use plan::{CourseCatalog, CourseModule, StudyPlan, build_study_plan};
pub use types::{
    FeasibilityResult, PhaseAllocation, SelfRating, StudyBlock, StudyPlanConfig, TaskType,
    WeekPhaseMix,
};
