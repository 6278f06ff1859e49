//! Integration tests for the contact backend.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::config::Config;
use crate::store::JsonStore;
use crate::{create_router, AppState};

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        // High rate limit so multi-request tests never trip it
        Self::with_rate_limit(1000, Duration::from_secs(900)).await
    }

    async fn with_rate_limit(max: u32, window: Duration) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let config = Config {
            data_dir: temp_dir.path().to_path_buf(),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            rate_limit_max: max,
            rate_limit_window: window,
        };

        let state = AppState {
            store: Arc::new(JsonStore::new(&config.data_dir)),
            config: Arc::new(config),
            started_at: Instant::now(),
        };

        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        TestFixture {
            client: Client::new(),
            base_url,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_contact(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/contact"))
            .json(body)
            .send()
            .await
            .unwrap()
    }

    async fn post_feedback(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/feedback"))
            .json(body)
            .send()
            .await
            .unwrap()
    }
}

fn valid_contact_body(name: &str) -> Value {
    json!({
        "name": name,
        "email": "JANE.DOE@Example.com",
        "subject": "Product question",
        "message": "I would like to know more about your product."
    })
}

#[tokio::test]
async fn test_submit_contact_assigns_sequential_ids() {
    let fixture = TestFixture::new().await;

    let resp = fixture.post_contact(&valid_contact_body("Jane Doe")).await;
    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["email"], "jane.doe@example.com");
    assert!(body["data"]["createdAt"].as_str().is_some_and(|t| !t.is_empty()));

    let resp = fixture.post_contact(&valid_contact_body("John Doe")).await;
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["id"], 2);
}

#[tokio::test]
async fn test_contact_optional_fields_stored_as_null() {
    let fixture = TestFixture::new().await;

    let resp = fixture.post_contact(&valid_contact_body("Jane Doe")).await;
    let body: Value = resp.json().await.unwrap();

    assert!(body["data"]["phone"].is_null());
    assert!(body["data"]["company"].is_null());
}

#[tokio::test]
async fn test_contact_validation_reports_all_errors() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .post_contact(&json!({
            "name": "A",
            "email": "not-an-email",
            "subject": "hi",
            "message": "short"
        }))
        .await;

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["errors"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_wrong_typed_fields_get_validation_envelope() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .post_contact(&json!({
            "name": 123,
            "email": "not-an-email",
            "subject": "Product question",
            "message": "I would like to know more about your product."
        }))
        .await;

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Validation failed");
    let errors: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e.as_str().unwrap())
        .collect();
    assert!(errors.contains(&"Name is required and must be text"));
    assert!(errors.contains(&"Email format is invalid"));

    let resp = fixture
        .post_feedback(&json!({ "rating": 4, "comment": 42 }))
        .await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["errors"][0], "Comment is required and must be text");
}

#[tokio::test]
async fn test_contact_pagination() {
    let fixture = TestFixture::new().await;

    for i in 0..25 {
        let resp = fixture
            .post_contact(&valid_contact_body(&format!("Visitor {}", i)))
            .await;
        assert_eq!(resp.status(), 201);
    }

    for (page, expected_len) in [(1, 10), (2, 10), (3, 5)] {
        let resp = fixture
            .client
            .get(fixture.url(&format!("/api/contact?page={}&limit=10", page)))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["data"].as_array().unwrap().len(), expected_len);
        assert_eq!(body["pagination"]["page"], page);
        assert_eq!(body["pagination"]["totalItems"], 25);
        assert_eq!(body["pagination"]["totalPages"], 3);
    }

    // Out-of-range page clamps to the last page
    let resp = fixture
        .client
        .get(fixture.url("/api/contact?page=99&limit=10"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["pagination"]["page"], 3);
    assert_eq!(body["data"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_feedback_stats() {
    let fixture = TestFixture::new().await;

    for rating in [5, 5, 4, 3] {
        let resp = fixture
            .post_feedback(&json!({
                "rating": rating,
                "comment": "Works as advertised"
            }))
            .await;
        assert_eq!(resp.status(), 201);
    }

    let resp = fixture
        .client
        .get(fixture.url("/api/feedback/stats"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["totalFeedback"], 4);
    assert_eq!(body["data"]["averageRating"], 4.25);
    assert_eq!(body["data"]["ratingCounts"]["5"], 2);
    assert_eq!(body["data"]["ratingCounts"]["4"], 1);
    assert_eq!(body["data"]["ratingCounts"]["3"], 1);
}

#[tokio::test]
async fn test_feedback_stats_empty() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/feedback/stats"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["totalFeedback"], 0);
    assert_eq!(body["data"]["averageRating"], 0.0);
    assert!(body["data"]["ratingCounts"].as_object().unwrap().is_empty());
}

#[tokio::test]
async fn test_feedback_rating_bounds() {
    let fixture = TestFixture::new().await;

    for rating in [0, 6] {
        let resp = fixture
            .post_feedback(&json!({ "rating": rating, "comment": "Works as advertised" }))
            .await;
        assert_eq!(resp.status(), 400, "rating {} should be rejected", rating);
    }

    for rating in [1, 5] {
        let resp = fixture
            .post_feedback(&json!({ "rating": rating, "comment": "Works as advertised" }))
            .await;
        assert_eq!(resp.status(), 201, "rating {} should be accepted", rating);
    }
}

#[tokio::test]
async fn test_status_endpoint() {
    let fixture = TestFixture::new().await;

    fixture.post_contact(&valid_contact_body("Jane Doe")).await;
    fixture
        .post_feedback(&json!({ "rating": 5, "comment": "Works as advertised" }))
        .await;

    let resp = fixture
        .client
        .get(fixture.url("/api/status"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].as_str().is_some());
    assert!(body["uptime"].as_f64().is_some());
    assert_eq!(body["dataCounts"]["contacts"], 1);
    assert_eq!(body["dataCounts"]["feedback"], 1);
}

#[tokio::test]
async fn test_docs_endpoint() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/docs"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["title"], "Contact Form API Documentation");
    assert!(body["endpoints"]["POST /api/contact"].is_object());
}

#[tokio::test]
async fn test_unknown_route_returns_404_envelope() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/nope"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Endpoint not found");
}

#[tokio::test]
async fn test_rate_limit_enforced() {
    let fixture = TestFixture::with_rate_limit(3, Duration::from_secs(900)).await;

    for _ in 0..3 {
        let resp = fixture
            .client
            .get(fixture.url("/api/status"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }

    let resp = fixture
        .client
        .get(fixture.url("/api/status"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 429);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Too many requests, please try again later");
}
