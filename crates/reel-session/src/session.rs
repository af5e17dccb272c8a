//! The curation session event loop and editing operations.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use uuid::Uuid;

use reel_api_client::{ApiClient, AutoSelectRequest, GenerateReelRequest, HighlightPatch, ReelJobHandle};
use reel_core::{
    Applied, AutoSelector, HighlightStore, ReelRequestBuilder, ReorderProtocol, StatusEvent,
    StatusReconciler, TrackedStatus,
};
use reel_models::{HighlightId, ProcessingState, VideoId};

use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::push::run_push_channel;

/// Buffer for events from both status channels.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// How long teardown waits for the push task's goodbye before aborting it.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// An event delivered to the session loop.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A status update from either channel
    Status(StatusEvent),
    /// The push channel disconnected; the poll fallback keeps going
    PushClosed,
}

/// State and background tasks for one open video.
///
/// The session owns the only in-memory copy of the video's status and
/// highlight list. All mutations happen on the caller's task; the
/// background channel tasks only send events into the loop.
pub struct CurationSession {
    video_id: VideoId,
    api: Arc<ApiClient>,
    config: SessionConfig,
    reconciler: StatusReconciler,
    store: HighlightStore,
    reorder: Option<ReorderProtocol>,
    builder: ReelRequestBuilder,
    events_rx: mpsc::Receiver<SessionEvent>,
    shutdown_tx: watch::Sender<bool>,
    push_task: JoinHandle<()>,
    poll_task: JoinHandle<()>,
}

impl CurationSession {
    /// Open a session for a video and start both status channels.
    pub fn open(api: Arc<ApiClient>, config: SessionConfig, video_id: VideoId) -> Self {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let client_id = Uuid::new_v4();
        let ws_url = format!("{}/{}", config.ws_url.trim_end_matches('/'), client_id);

        let push_task = tokio::spawn(run_push_channel(
            ws_url,
            video_id.clone(),
            events_tx.clone(),
            shutdown_rx.clone(),
        ));
        let poll_task = tokio::spawn(run_status_poll(
            Arc::clone(&api),
            video_id.clone(),
            config.poll_interval,
            events_tx,
            shutdown_rx,
        ));

        let builder =
            ReelRequestBuilder::new(config.reel_max_duration).include_transitions(config.include_transitions);

        info!("Curation session opened for video {}", video_id);
        Self {
            video_id,
            api,
            config,
            reconciler: StatusReconciler::new(),
            store: HighlightStore::new(),
            reorder: None,
            builder,
            events_rx,
            shutdown_tx,
            push_task,
            poll_task,
        }
    }

    pub fn video_id(&self) -> &VideoId {
        &self.video_id
    }

    /// The merged processing status.
    pub fn status(&self) -> &TrackedStatus {
        self.reconciler.current()
    }

    /// The highlight working set (empty until processing completes).
    pub fn store(&self) -> &HighlightStore {
        &self.store
    }

    /// Apply one event to the reconciler.
    ///
    /// Video-processing events never touch the reel single-flight guard:
    /// the video is already terminal by the time a reel can be requested,
    /// so only [`CurationSession::reel_completed`] releases it.
    pub fn apply_event(&mut self, event: StatusEvent) -> Applied {
        let applied = self.reconciler.apply(event);
        if !applied.is_noop() {
            debug!(
                video_id = %self.video_id,
                state = %self.reconciler.current().state,
                progress = self.reconciler.current().progress,
                "Status updated"
            );
        }
        applied
    }

    /// Consume events until the video reaches a terminal state.
    ///
    /// On `completed`, pauses for the configured grace period and then
    /// loads the detected highlights. On `failed`, returns the frozen
    /// status carrying the collaborator's message.
    pub async fn run_until_terminal(&mut self) -> SessionResult<TrackedStatus> {
        while !self.reconciler.is_terminal() {
            match self.events_rx.recv().await {
                Some(SessionEvent::Status(event)) => {
                    self.apply_event(event);
                }
                Some(SessionEvent::PushClosed) => {
                    warn!(
                        "Push channel lost for {}; continuing on poll fallback",
                        self.video_id
                    );
                }
                None => return Err(SessionError::ChannelClosed),
            }
        }

        if self.reconciler.current().state == ProcessingState::Completed {
            tokio::time::sleep(self.config.completed_grace).await;
            self.refresh_highlights().await?;
        }

        Ok(self.reconciler.current().clone())
    }

    /// Fetch the highlight set and reset the reorder watermark.
    pub async fn refresh_highlights(&mut self) -> SessionResult<()> {
        let highlights = self.api.get_highlights(&self.video_id).await?;
        self.store.load(highlights)?;
        self.reorder = Some(ReorderProtocol::new(self.store.ordered_ids()));
        info!(
            "Loaded {} highlights for video {}",
            self.store.len(),
            self.video_id
        );
        Ok(())
    }

    /// Flip a highlight's inclusion locally, then persist the flag.
    ///
    /// The local flip is kept even when persistence fails; the error is
    /// returned so the caller can surface a retryable banner.
    pub async fn toggle_inclusion(&mut self, id: &HighlightId) -> SessionResult<bool> {
        let is_included = self.store.toggle_inclusion(id)?;

        if let Err(e) = self
            .api
            .update_highlight(id, &HighlightPatch::inclusion(is_included))
            .await
        {
            warn!("Failed to persist inclusion for {}: {}", id, e);
            return Err(e.into());
        }
        Ok(is_included)
    }

    /// Apply a new display order locally, then persist it.
    ///
    /// A non-permutation order is rejected synchronously with no local
    /// change. Persistence failure does not roll the local order back;
    /// the protocol keeps the divergence so a later attempt can resolve
    /// it (last-local-order-wins).
    pub async fn reorder(&mut self, order: &[HighlightId]) -> SessionResult<()> {
        self.store.reorder(order)?;

        let protocol = self.reorder.as_mut().ok_or(SessionError::NotLoaded)?;
        protocol.apply_local(order.to_vec());
        let attempt = protocol.begin_attempt();

        let result = self.api.persist_order(&self.video_id, &attempt.order).await;
        let success = result.is_ok();
        if let Some(protocol) = self.reorder.as_mut() {
            protocol.complete_attempt(attempt.epoch, success);
        }

        if let Err(e) = result {
            warn!("Failed to persist reorder for {}: {}", self.video_id, e);
            return Err(e.into());
        }
        Ok(())
    }

    /// Re-derive the selection under a duration budget, locally first for
    /// instant feedback, then mirrored on the server.
    ///
    /// Returns the number of selected highlights. A server failure leaves
    /// the local selection in place, same as reorder.
    pub async fn auto_select(&mut self, target_duration: u32, min_score: f64) -> SessionResult<usize> {
        let selector = AutoSelector::new(target_duration as f64).with_min_score(min_score);
        let selected = selector.select(self.store.highlights());
        self.store.apply_selection(&selected);

        let request = AutoSelectRequest {
            target_duration,
            min_score,
        };
        if let Err(e) = self.api.auto_select(&self.video_id, &request).await {
            warn!("Server auto-select failed for {}: {}", self.video_id, e);
            return Err(e.into());
        }
        Ok(selected.len())
    }

    /// Assemble and submit the reel generation request.
    ///
    /// At most one request is outstanding per session; a second call is
    /// rejected with a busy error until [`CurationSession::reel_completed`]
    /// reports the job finished.
    pub async fn generate_reel(&mut self) -> SessionResult<ReelJobHandle> {
        let request = self.builder.build(&self.store)?;

        let wire_request = GenerateReelRequest {
            highlight_ids: request.highlight_ids,
            max_duration: request.max_duration,
            include_transitions: request.include_transitions,
        };
        match self.api.generate_reel(&self.video_id, &wire_request).await {
            Ok(handle) => {
                info!("Reel generation started for {}", self.video_id);
                Ok(handle)
            }
            Err(e) => {
                // The request never became a job; free the guard
                self.builder.complete();
                Err(e.into())
            }
        }
    }

    /// Report the outstanding generation job finished (success or failure)
    /// and allow a new request.
    pub fn reel_completed(&mut self) {
        self.builder.complete();
    }

    /// Whether a generation request is awaiting [`CurationSession::reel_completed`].
    pub fn reel_in_flight(&self) -> bool {
        self.builder.is_in_flight()
    }

    /// Tear the session down: unsubscribe the push channel and cancel the
    /// poll timer. Stray in-flight requests may still complete in the
    /// background, but their responses go nowhere.
    pub async fn close(mut self) {
        let _ = self.shutdown_tx.send(true);

        if tokio::time::timeout(SHUTDOWN_GRACE, &mut self.push_task)
            .await
            .is_err()
        {
            self.push_task.abort();
        }
        self.poll_task.abort();
        info!("Curation session closed for video {}", self.video_id);
    }
}

/// Poll fallback: hit the status endpoint at a fixed cadence for the
/// session's lifetime, regardless of push-channel health.
async fn run_status_poll(
    api: Arc<ApiClient>,
    video_id: VideoId,
    interval: Duration,
    events: mpsc::Sender<SessionEvent>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    debug!("Status poll stopped for video {}", video_id);
                    break;
                }
            }
            _ = ticker.tick() => {
                match api.get_status(&video_id).await {
                    Ok(snapshot) => {
                        let event = StatusEvent::poll(
                            snapshot.status,
                            snapshot.progress,
                            snapshot.error_message,
                        );
                        if events.send(SessionEvent::Status(event)).await.is_err() {
                            break;
                        }
                    }
                    // Transient poll failures are non-fatal; next tick retries
                    Err(e) => warn!("Status poll failed for {}: {}", video_id, e),
                }
            }
        }
    }
}
