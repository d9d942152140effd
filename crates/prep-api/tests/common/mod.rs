use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use prep_api::{ApiConfig, ApiState, router};
use serde::Deserialize;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Monday 2025-01-06 08:00 UTC, the creation time used by the fixtures
pub const PLAN_CREATED_AT: &str = "2025-01-06T08:00:00Z";

/// Test state builder for creating an ApiState without any recorder installed
pub struct TestStateBuilder {
    config: ApiConfig,
}

impl TestStateBuilder {
    pub fn new() -> Self {
        Self {
            config: ApiConfig::default(),
        }
    }

    pub fn max_plan_weeks(mut self, weeks: u32) -> Self {
        self.config.max_plan_weeks = weeks;
        self
    }

    pub fn build(self) -> ApiState {
        ApiState::new(&self.config, None)
    }
}

impl Default for TestStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Router wired with a default test state
pub fn test_app() -> Router {
    router::router().with_state(TestStateBuilder::new().build())
}

/// Plan request for `modules` estimated modules, studying Monday to Friday
pub fn plan_request(exam_date: &str, hours: u32, rating: &str, modules: usize) -> Value {
    let modules: Vec<Value> = (0..modules)
        .map(|i| json!({ "id": format!("module-{i}") }))
        .collect();

    json!({
        "exam_date": exam_date,
        "study_hours_per_week": hours,
        "self_rating": rating,
        "preferred_study_days": [1, 2, 3, 4, 5],
        "plan_created_at": PLAN_CREATED_AT,
        "modules": modules,
    })
}

/// Helper to make requests to the test app
pub struct TestClient {
    router: Router,
}

impl TestClient {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    /// Send a request and get the response
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        TestResponse {
            status,
            body: body_bytes.to_vec(),
            headers,
        }
    }

    /// Send a GET request
    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Send a GET request carrying a request ID
    pub async fn get_with_request_id(&self, uri: &str, request_id: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .header("x-request-id", request_id)
            .body(Body::empty())
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Send a POST request with JSON body
    pub async fn post_json<T: serde::Serialize>(&self, uri: &str, body: &T) -> TestResponse {
        let json_body = serde_json::to_string(body).expect("Failed to serialize body");

        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json_body))
            .expect("Failed to build request");

        self.request(request).await
    }
}

/// Test response wrapper
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
    pub headers: axum::http::HeaderMap,
}

impl TestResponse {
    /// Get response body as string
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Response body is not valid UTF-8")
    }

    /// Parse response body as JSON
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Assert status code
    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
    }

    /// Header value as a string, if present
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}
