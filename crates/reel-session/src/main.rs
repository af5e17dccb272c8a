//! Highlight curation session binary.
//!
//! Submits a video URL for processing, follows its status to completion,
//! auto-selects highlights under the configured duration budget, and kicks
//! off reel generation.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use reel_api_client::{ApiClient, FromUrlRequest};
use reel_models::ProcessingState;
use reel_session::{CurationSession, SessionConfig};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("reel=info".parse().expect("static directive"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    let url = match std::env::args().nth(1) {
        Some(url) => url,
        None => {
            error!("Usage: reel-session <video-url> [sport-type]");
            std::process::exit(1);
        }
    };
    let sport_type = std::env::args().nth(2);

    let api = match ApiClient::from_env() {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to create API client: {}", e);
            std::process::exit(1);
        }
    };
    let config = SessionConfig::from_env();

    info!("Submitting {} to {}", url, api.base_url());
    let video = match api
        .create_from_url(&FromUrlRequest {
            url,
            title: None,
            sport_type,
        })
        .await
    {
        Ok(video) => video,
        Err(e) => {
            error!("Failed to submit video: {}", e);
            std::process::exit(1);
        }
    };
    info!("Video {} accepted, waiting for processing", video.id);

    let reel_budget = config.reel_max_duration;
    let mut session = CurationSession::open(api, config, video.id);

    let status = match session.run_until_terminal().await {
        Ok(status) => status,
        Err(e) => {
            error!("Session failed: {}", e);
            session.close().await;
            std::process::exit(1);
        }
    };

    if status.state == ProcessingState::Failed {
        error!(
            "Processing failed: {}",
            status.error_message.as_deref().unwrap_or("unknown error")
        );
        session.close().await;
        std::process::exit(1);
    }

    info!("Processing complete, {} highlights detected", session.store().len());
    for h in session.store().highlights() {
        info!(
            "  [{:>5.1}s - {:>5.1}s] score {:>5.1}  {}",
            h.start_time,
            h.end_time,
            h.score,
            h.description.as_deref().unwrap_or("")
        );
    }

    match session.auto_select(reel_budget, 0.0).await {
        Ok(count) => info!(
            "Auto-selected {} highlights ({:.1}s total)",
            count,
            session.store().selected_total_duration()
        ),
        Err(e) => {
            error!("Auto-select failed: {}", e);
            session.close().await;
            std::process::exit(1);
        }
    }

    match session.generate_reel().await {
        Ok(handle) => info!("Reel generation started for {}: {}", handle.video_id, handle.message),
        Err(e) => {
            error!("Failed to start reel generation: {}", e);
            session.close().await;
            std::process::exit(1);
        }
    }

    session.close().await;
    info!("Session closed");
}
