//! API client tests against a mocked processing service.

use std::time::Duration;

use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reel_api_client::{
    ApiClient, ApiClientConfig, ApiError, GenerateReelRequest, HighlightPatch,
};
use reel_models::{ProcessingState, VideoId};

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(ApiClientConfig {
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
        max_retries: 2,
    })
    .unwrap()
}

#[tokio::test]
async fn status_poll_parses_snapshot() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos/vid-1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "analyzing",
            "progress": 60,
            "error_message": null
        })))
        .mount(&server)
        .await;

    let status = client_for(&server)
        .get_status(&VideoId::from("vid-1"))
        .await
        .unwrap();

    assert_eq!(status.status, ProcessingState::Analyzing);
    assert_eq!(status.progress, 60);
    assert!(status.error_message.is_none());
}

#[tokio::test]
async fn status_poll_retries_transient_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos/vid-1/status"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos/vid-1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "completed",
            "progress": 100
        })))
        .mount(&server)
        .await;

    let status = client_for(&server)
        .get_status(&VideoId::from("vid-1"))
        .await
        .unwrap();

    assert_eq!(status.status, ProcessingState::Completed);
}

#[tokio::test]
async fn highlights_fetch_parses_full_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos/vid-1/highlights"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "id": "hl-1",
                "start_time": 12.0,
                "end_time": 20.5,
                "duration": 8.5,
                "score": 91.0,
                "category": "goal",
                "description": "Breakaway goal",
                "is_included": true,
                "order_index": 0
            },
            {
                "id": "hl-2",
                "start_time": 300.0,
                "end_time": 312.0,
                "duration": 12.0,
                "score": 74.5,
                "is_included": false,
                "order_index": 1
            }
        ])))
        .mount(&server)
        .await;

    let highlights = client_for(&server)
        .get_highlights(&VideoId::from("vid-1"))
        .await
        .unwrap();

    assert_eq!(highlights.len(), 2);
    assert_eq!(highlights[0].id.as_str(), "hl-1");
    assert!(!highlights[1].is_included);
}

#[tokio::test]
async fn generate_reel_conflict_maps_to_busy() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/videos/vid-1/generate-reel"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;

    let request = GenerateReelRequest {
        highlight_ids: vec!["hl-1".into()],
        max_duration: 180,
        include_transitions: true,
    };
    let error = client_for(&server)
        .generate_reel(&VideoId::from("vid-1"), &request)
        .await
        .unwrap_err();

    assert!(matches!(error, ApiError::Busy));
    assert!(!error.is_retryable());
}

#[tokio::test]
async fn reorder_rejection_maps_to_validation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/highlights/vid-1/reorder"))
        .and(body_json(serde_json::json!({
            "highlight_order": ["hl-2", "hl-1"]
        })))
        .respond_with(ResponseTemplate::new(422).set_body_string("not a permutation"))
        .mount(&server)
        .await;

    let error = client_for(&server)
        .persist_order(&VideoId::from("vid-1"), &["hl-2".into(), "hl-1".into()])
        .await
        .unwrap_err();

    assert!(matches!(error, ApiError::Validation(msg) if msg.contains("not a permutation")));
}

#[tokio::test]
async fn inclusion_patch_sends_only_set_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/highlights/hl-1"))
        .and(body_json(serde_json::json!({ "is_included": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "hl-1",
            "start_time": 12.0,
            "end_time": 20.5,
            "duration": 8.5,
            "score": 91.0,
            "is_included": false,
            "order_index": 0
        })))
        .mount(&server)
        .await;

    let updated = client_for(&server)
        .update_highlight(&"hl-1".into(), &HighlightPatch::inclusion(false))
        .await
        .unwrap();

    assert!(!updated.is_included);
}
