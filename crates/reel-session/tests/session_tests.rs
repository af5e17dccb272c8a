//! Session tests against a mocked processing service.
//!
//! The push channel points at an unreachable endpoint on purpose: the poll
//! fallback alone must carry every session to its terminal state.

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reel_api_client::{ApiClient, ApiClientConfig};
use reel_models::ProcessingState;
use reel_session::{CurationSession, SessionConfig, SessionError};

fn api_for(server: &MockServer) -> Arc<ApiClient> {
    Arc::new(
        ApiClient::new(ApiClientConfig {
            base_url: server.uri(),
            timeout: Duration::from_secs(5),
            max_retries: 0,
        })
        .unwrap(),
    )
}

fn fast_config() -> SessionConfig {
    SessionConfig {
        // Nothing listens here; connect fails and the poll fallback takes over
        ws_url: "ws://127.0.0.1:9/ws".to_string(),
        poll_interval: Duration::from_millis(50),
        completed_grace: Duration::from_millis(10),
        reel_max_duration: 60,
        include_transitions: true,
    }
}

fn highlights_body() -> serde_json::Value {
    serde_json::json!([
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
            "is_included": true,
            "order_index": 1
        }
    ])
}

#[tokio::test]
async fn poll_fallback_alone_reaches_completed_and_loads_highlights() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos/vid-1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "completed",
            "progress": 100
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos/vid-1/highlights"))
        .respond_with(ResponseTemplate::new(200).set_body_json(highlights_body()))
        .mount(&server)
        .await;

    let mut session = CurationSession::open(api_for(&server), fast_config(), "vid-1".into());
    let status = session.run_until_terminal().await.unwrap();

    assert_eq!(status.state, ProcessingState::Completed);
    assert_eq!(status.progress, 100);
    assert_eq!(session.store().len(), 2);
    assert_eq!(
        session.store().ordered_ids(),
        vec!["hl-1".into(), "hl-2".into()]
    );

    session.close().await;
}

#[tokio::test]
async fn failed_status_freezes_with_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos/vid-1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "failed",
            "progress": 0,
            "error_message": "download failed: 403 from origin"
        })))
        .mount(&server)
        .await;

    let mut session = CurationSession::open(api_for(&server), fast_config(), "vid-1".into());
    let status = session.run_until_terminal().await.unwrap();

    assert_eq!(status.state, ProcessingState::Failed);
    assert_eq!(
        status.error_message.as_deref(),
        Some("download failed: 403 from origin")
    );
    // No highlights to curate after a failure
    assert!(session.store().is_empty());

    session.close().await;
}

#[tokio::test]
async fn toggle_keeps_local_flip_when_persistence_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos/vid-1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "completed",
            "progress": 100
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos/vid-1/highlights"))
        .respond_with(ResponseTemplate::new(200).set_body_json(highlights_body()))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/highlights/hl-2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut session = CurationSession::open(api_for(&server), fast_config(), "vid-1".into());
    session.run_until_terminal().await.unwrap();

    let error = session.toggle_inclusion(&"hl-2".into()).await.unwrap_err();
    assert!(error.is_retryable());
    // The local flip stands so the user can simply retry the save
    assert!(!session.store().get(&"hl-2".into()).unwrap().is_included);

    session.close().await;
}

#[tokio::test]
async fn reorder_persists_the_new_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos/vid-1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "completed",
            "progress": 100
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos/vid-1/highlights"))
        .respond_with(ResponseTemplate::new(200).set_body_json(highlights_body()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/highlights/vid-1/reorder"))
        .and(body_json(serde_json::json!({
            "highlight_order": ["hl-2", "hl-1"]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = CurationSession::open(api_for(&server), fast_config(), "vid-1".into());
    session.run_until_terminal().await.unwrap();

    session
        .reorder(&["hl-2".into(), "hl-1".into()])
        .await
        .unwrap();

    assert_eq!(
        session.store().ordered_ids(),
        vec!["hl-2".into(), "hl-1".into()]
    );

    session.close().await;
}

#[tokio::test]
async fn generate_reel_rejects_empty_selection_without_hitting_the_service() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos/vid-1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "completed",
            "progress": 100
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos/vid-1/highlights"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "id": "hl-1",
                "start_time": 12.0,
                "end_time": 20.5,
                "duration": 8.5,
                "score": 91.0,
                "is_included": false,
                "order_index": 0
            }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/videos/vid-1/generate-reel"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = CurationSession::open(api_for(&server), fast_config(), "vid-1".into());
    session.run_until_terminal().await.unwrap();

    let error = session.generate_reel().await.unwrap_err();
    assert!(matches!(
        error,
        SessionError::Core(reel_core::CoreError::EmptySelection)
    ));

    session.close().await;
}

#[tokio::test]
async fn second_generate_reel_stays_busy_across_later_status_events() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos/vid-1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "completed",
            "progress": 100
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos/vid-1/highlights"))
        .respond_with(ResponseTemplate::new(200).set_body_json(highlights_body()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/videos/vid-1/generate-reel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "Highlight reel generation started",
            "video_id": "vid-1"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let mut session = CurationSession::open(api_for(&server), fast_config(), "vid-1".into());
    session.run_until_terminal().await.unwrap();

    session.generate_reel().await.unwrap();
    assert!(session.reel_in_flight());

    // A repeated poll snapshot of the already-terminal video must not
    // release the guard; the generation job is still running
    let applied = session.apply_event(reel_core::StatusEvent::poll(
        ProcessingState::Completed,
        100,
        None,
    ));
    assert!(applied.is_noop());

    let error = session.generate_reel().await.unwrap_err();
    assert!(matches!(
        error,
        SessionError::Core(reel_core::CoreError::GenerationInFlight)
    ));

    // Only the explicit job-completion signal re-arms the guard
    session.reel_completed();
    session.generate_reel().await.unwrap();

    session.close().await;
}

#[tokio::test]
async fn auto_select_applies_locally_and_mirrors_to_the_service() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/videos/vid-1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "completed",
            "progress": 100
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos/vid-1/highlights"))
        .respond_with(ResponseTemplate::new(200).set_body_json(highlights_body()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/highlights/vid-1/auto-select"))
        .and(body_json(serde_json::json!({
            "target_duration": 10,
            "min_score": 0.0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "selected_count": 1,
            "total_duration": 8.5,
            "highlight_ids": ["hl-1"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = CurationSession::open(api_for(&server), fast_config(), "vid-1".into());
    session.run_until_terminal().await.unwrap();

    // Budget of 10s fits only the 8.5s highlight
    let count = session.auto_select(10, 0.0).await.unwrap();

    assert_eq!(count, 1);
    assert!(session.store().get(&"hl-1".into()).unwrap().is_included);
    assert!(!session.store().get(&"hl-2".into()).unwrap().is_included);

    session.close().await;
}
