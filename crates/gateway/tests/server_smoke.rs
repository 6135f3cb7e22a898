use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use lnac_gateway::{build_router, AppState, Authenticator, API_KEY_HEADER};
use lnac_library::LibraryStore;
use lnac_types::{LevelPolicy, DEBUG_PING_CODE, NO_DERAILER_FOUND};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tower::ServiceExt;

const SECRET: &str = "test-secret";

fn seed_library(dir: &Path, derailers: &str) {
    fs::write(
        dir.join("library-index.json"),
        r#"{
            "version": "v0.2.0",
            "levels": {
                "1": ["D_AVOIDANCE"],
                "2": [],
                "3": ["D_CONTROL", "D_PERFECTIONISM"],
                "4": ["D_OVERCOMMIT"],
                "5": ["D_ISOLATION"]
            }
        }"#,
    )
    .unwrap();
    fs::write(dir.join("derailer-library.json"), derailers).unwrap();
    fs::write(
        dir.join("micro-actions.json"),
        r#"{"version": "v0.2.0", "micro_actions": [{"id": "MA_001"}, {"id": "MA_002"}]}"#,
    )
    .unwrap();
}

const DERAILERS_NAMED: &str =
    r#"{"version": "v0.2.0", "derailers": [{"id": "D_AVOIDANCE"}, {"id": "D_CONTROL"}, {"id": "D_ISOLATION"}]}"#;

struct TestGateway {
    _dir: TempDir,
    app: Router,
}

impl TestGateway {
    fn new(secret: Option<&str>, policy: LevelPolicy) -> Self {
        let dir = TempDir::new().unwrap();
        seed_library(dir.path(), DERAILERS_NAMED);
        Self::with_dir(dir, secret, policy)
    }

    fn with_dir(dir: TempDir, secret: Option<&str>, policy: LevelPolicy) -> Self {
        let state = AppState::new(
            Authenticator::new(secret.map(str::to_string)),
            LibraryStore::new(dir.path()),
            policy,
        );
        Self {
            app: build_router(state),
            _dir: dir,
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes()
            .to_vec();
        (status, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, body) = self.send(request).await;
        (status, serde_json::from_slice(&body).expect("json body"))
    }

    async fn infer(&self, key: Option<&str>, body: String) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/v1/inference")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(key) = key {
            builder = builder.header(API_KEY_HEADER, key);
        }
        let (status, body) = self.send(builder.body(Body::from(body)).unwrap()).await;
        (status, serde_json::from_slice(&body).expect("json body"))
    }
}

fn inference_body(level: Value) -> String {
    json!({
        "request_id": "req-1",
        "user": { "assessed_level": level },
        "context": { "channel": "chat" },
        "interaction": { "text": "I keep redoing the same slide" }
    })
    .to_string()
}

#[tokio::test]
async fn health_and_ping_need_no_key() {
    let gateway = TestGateway::new(None, LevelPolicy::Coerce);

    let (status, body) = gateway.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));

    let (status, body) = gateway.get("/debug/ping").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true, "code": DEBUG_PING_CODE }));
}

#[tokio::test]
async fn valid_key_returns_full_response() {
    let gateway = TestGateway::new(Some(SECRET), LevelPolicy::Coerce);

    let (status, body) = gateway.infer(Some(SECRET), inference_body(json!(1))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["engine_version"], "0.1.0");
    assert_eq!(body["library_version"], "v0.2.0");
    assert_eq!(
        body["primary_classification"],
        json!({ "level": 1, "derailer_id": "D_AVOIDANCE", "confidence_bucket": "medium" })
    );
    assert_eq!(body["micro_actions"].as_array().unwrap().len(), 2);
    assert!(!body["rationale_bullets"].as_array().unwrap().is_empty());
    assert_eq!(body["clarifying_questions"].as_array().unwrap().len(), 2);
    assert_eq!(body["next_step"]["type"], "micro_action");
    assert_eq!(body["policy_flags"], json!([]));
}

#[tokio::test]
async fn wrong_or_missing_key_is_401_regardless_of_body() {
    let gateway = TestGateway::new(Some(SECRET), LevelPolicy::Coerce);

    for body in [
        inference_body(json!(2)),
        "not json at all".to_string(),
        "{}".to_string(),
    ] {
        let (status, payload) = gateway.infer(Some("wrong"), body.clone()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(payload, json!({ "detail": "Invalid API key" }));

        let (status, _) = gateway.infer(None, body).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn unset_secret_is_500_for_any_key() {
    let gateway = TestGateway::new(None, LevelPolicy::Coerce);

    for key in [Some(SECRET), Some(""), None] {
        let (status, payload) = gateway.infer(key, inference_body(json!(3))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(payload, json!({ "detail": "LNAC_API_KEY not set on server" }));
    }
}

#[tokio::test]
async fn invalid_levels_resolve_to_three() {
    let gateway = TestGateway::new(Some(SECRET), LevelPolicy::Coerce);

    for level in [json!(0), json!(6), json!("x"), json!(null)] {
        let (status, body) = gateway.infer(Some(SECRET), inference_body(level)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["primary_classification"]["level"], json!(3));
        assert_eq!(body["primary_classification"]["derailer_id"], "D_CONTROL");
    }
}

#[tokio::test]
async fn passthrough_policy_echoes_raw_level() {
    let gateway = TestGateway::new(Some(SECRET), LevelPolicy::Passthrough);

    for level in [json!(0), json!(6), json!("x"), json!(null)] {
        let (status, body) = gateway
            .infer(Some(SECRET), inference_body(level.clone()))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["primary_classification"]["level"], level);
    }
}

#[tokio::test]
async fn empty_candidate_list_yields_sentinel() {
    let gateway = TestGateway::new(Some(SECRET), LevelPolicy::Coerce);

    let (status, body) = gateway.infer(Some(SECRET), inference_body(json!(2))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["primary_classification"]["derailer_id"], NO_DERAILER_FOUND);
}

#[tokio::test]
async fn malformed_request_is_rejected_after_auth() {
    let gateway = TestGateway::new(Some(SECRET), LevelPolicy::Coerce);

    let missing_interaction = json!({ "request_id": "r", "user": {}, "context": {} }).to_string();
    let (status, body) = gateway.infer(Some(SECRET), missing_interaction).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("interaction"));
}

#[tokio::test]
async fn missing_index_is_500() {
    let dir = TempDir::new().unwrap();
    seed_library(dir.path(), DERAILERS_NAMED);
    fs::remove_file(dir.path().join("library-index.json")).unwrap();
    let gateway = TestGateway::with_dir(dir, Some(SECRET), LevelPolicy::Coerce);

    let (status, _) = gateway.infer(Some(SECRET), inference_body(json!(1))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, body) = gateway.get("/debug/library").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("library-index.json"));
}

#[tokio::test]
async fn debug_library_counts_derailers_in_any_layout() {
    let layouts = [
        (DERAILERS_NAMED, 3),
        (
            r#"[{"id": "D_AVOIDANCE"}, {"id": "D_CONTROL"}, {"id": "D_ISOLATION"}]"#,
            3,
        ),
        (
            r#"{"version": "v0.2.0", "D_AVOIDANCE": {}, "D_CONTROL": {}, "D_ISOLATION": {}}"#,
            3,
        ),
        (
            r#"{"version": "v0.2.0", "meta": {"owner": "coaching"}, "derailers": [{"id": "D_A"}, {"id": "D_B"}, {"id": "D_C"}]}"#,
            3,
        ),
        (
            r#"{"version": "v0.2.0", "D_AVOIDANCE": {"id": "D_AVOIDANCE", "title": "Avoidance", "summary": "Postpones"}}"#,
            1,
        ),
    ];

    for (layout, expected) in layouts {
        let dir = TempDir::new().unwrap();
        seed_library(dir.path(), layout);
        let gateway = TestGateway::with_dir(dir, None, LevelPolicy::Coerce);

        let (status, body) = gateway.get("/debug/library").await;
        assert_eq!(status, StatusCode::OK, "layout {layout}");
        assert_eq!(body["derailer_library"]["count"], expected, "layout {layout}");
        assert_eq!(body["data_dir_exists"], true);
        assert_eq!(
            body["files"],
            json!(["derailer-library.json", "library-index.json", "micro-actions.json"])
        );
        assert_eq!(body["library_index"]["levels"], json!(["1", "2", "3", "4", "5"]));
        assert_eq!(body["library_index"]["version"], "v0.2.0");
        assert_eq!(body["micro_actions"]["count"], 2);
    }
}

#[tokio::test]
async fn debug_library_is_byte_identical_across_calls() {
    let gateway = TestGateway::new(None, LevelPolicy::Coerce);
    let request = || {
        Request::builder()
            .uri("/debug/library")
            .body(Body::empty())
            .unwrap()
    };

    let (first_status, first) = gateway.send(request()).await;
    let (second_status, second) = gateway.send(request()).await;
    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first, second);
}
