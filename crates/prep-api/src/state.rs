use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::{ApiConfig, Environment};

#[derive(Clone)]
pub struct ApiState {
    pub environment: Environment,
    /// Furthest exam date accepted, in weeks from plan creation
    pub max_plan_weeks: u32,
    /// `None` when metrics are disabled
    pub metrics_handle: Option<PrometheusHandle>,
}

impl ApiState {
    pub fn new(config: &ApiConfig, metrics_handle: Option<PrometheusHandle>) -> Self {
        Self {
            environment: config.environment,
            max_plan_weeks: config.max_plan_weeks,
            metrics_handle,
        }
    }
}
