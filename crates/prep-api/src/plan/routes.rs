use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use chrono::{NaiveDate, Utc};
use prep_planner::{
    CourseCatalog, SelfRating, StudyBlock, StudyPlan, StudyPlanConfig,
    budget::{blocks_per_week, weeks_until_exam},
    build_study_plan,
    pacing::{calculate_phase1_pace, check_feasibility_with},
    phase::{Timeline, allocation_for, phase_distribution},
    progress::{BlockProgress, ExamStatus, blocks_for_day, exam_status, weekly_summary},
    validation,
};
use validator::Validate;

use crate::{
    ApiState,
    error::ApiError,
    metrics,
    plan::model::{
        ExamStatusRequest, FeasibilityResponse, PhaseDistributionRequest,
        PhaseDistributionResponse, StudyPlanRequest, StudyPlanResponse,
    },
};

/// Create the study plan routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/study-plans/preview", post(preview_plan))
        .route("/study-plans/feasibility", post(check_plan_feasibility))
        .route(
            "/study-plans/phase-distribution",
            post(get_phase_distribution),
        )
        .route("/study-plans/status", post(get_exam_status))
        .route("/study-plans/day/{date}", post(get_day_plan))
}

/// Turn a request into validated engine inputs.
///
/// Validation runs against the plan's own creation time so a plan can be
/// regenerated later from the settings it was first built with.
fn plan_inputs(
    state: &ApiState,
    payload: StudyPlanRequest,
) -> Result<(StudyPlanConfig, CourseCatalog), ApiError> {
    let (config, catalog) = payload.into_inputs(Utc::now())?;
    validation::validate_config(&config, config.plan_created_at, state.max_plan_weeks)?;
    Ok((config, catalog))
}

fn generate_plan(config: &StudyPlanConfig, catalog: &CourseCatalog) -> StudyPlan {
    let start = Instant::now();
    let plan = build_study_plan(config, catalog);
    metrics::record_plan_generated(
        plan.feasibility.feasible,
        plan.blocks.len(),
        start.elapsed().as_secs_f64(),
    );
    plan
}

async fn preview_plan(
    State(state): State<ApiState>,
    Json(payload): Json<StudyPlanRequest>,
) -> Result<Json<StudyPlanResponse>, ApiError> {
    let (config, catalog) = plan_inputs(&state, payload)?;
    let plan = generate_plan(&config, &catalog);
    let weekly_summary = weekly_summary(&plan.blocks, plan.week1_start_date);

    Ok(Json(StudyPlanResponse {
        plan,
        weekly_summary,
    }))
}

async fn check_plan_feasibility(
    State(state): State<ApiState>,
    Json(payload): Json<StudyPlanRequest>,
) -> Result<Json<FeasibilityResponse>, ApiError> {
    let (config, catalog) = plan_inputs(&state, payload)?;

    let counter = catalog.block_counter();
    let weeks = weeks_until_exam(config.exam_date, config.plan_created_at);

    Ok(Json(FeasibilityResponse {
        feasibility: check_feasibility_with(&config, counter.as_ref()),
        weeks_until_exam: weeks,
        blocks_per_week: blocks_per_week(config.study_hours_per_week),
        phase1_pace: calculate_phase1_pace(counter.module_count(), weeks),
    }))
}

async fn get_phase_distribution(
    Json(payload): Json<PhaseDistributionRequest>,
) -> Result<Json<PhaseDistributionResponse>, ApiError> {
    payload.validate()?;

    let rating = payload
        .self_rating
        .as_deref()
        .map(str::parse::<SelfRating>)
        .transpose()?;
    let allocation = allocation_for(rating);

    Ok(Json(PhaseDistributionResponse {
        allocation,
        timeline: Timeline::for_weeks(payload.total_weeks),
        distribution: phase_distribution(payload.total_weeks, &allocation),
    }))
}

async fn get_exam_status(
    Json(payload): Json<ExamStatusRequest>,
) -> Result<Json<ExamStatus>, ApiError> {
    if payload.exam_date <= payload.plan_created_at {
        return Err(ApiError::Validation(
            "Exam date must be after the plan creation date".to_string(),
        ));
    }

    let now = payload.now.unwrap_or_else(Utc::now);
    let progress = BlockProgress {
        completed_blocks: payload.completed_blocks,
        total_blocks: payload.total_blocks,
    };

    Ok(Json(exam_status(
        payload.exam_date,
        payload.plan_created_at,
        now,
        progress,
    )))
}

async fn get_day_plan(
    State(state): State<ApiState>,
    Path(date): Path<NaiveDate>,
    Json(payload): Json<StudyPlanRequest>,
) -> Result<Json<Vec<StudyBlock>>, ApiError> {
    let (config, catalog) = plan_inputs(&state, payload)?;
    let plan = generate_plan(&config, &catalog);

    Ok(Json(
        blocks_for_day(&plan.blocks, date)
            .into_iter()
            .cloned()
            .collect(),
    ))
}
