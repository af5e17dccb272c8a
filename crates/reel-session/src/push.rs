//! Push channel task.
//!
//! Maintains one WebSocket connection per session, subscribes to the
//! video's events, and forwards them into the session's event loop. Losing
//! this channel is not fatal: the poll fallback reaches the same terminal
//! states on its own.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use reel_core::StatusEvent;
use reel_models::{ClientMessage, ProcessingState, ServerMessage, VideoId};

use crate::session::SessionEvent;

/// Map a push-channel message to a reconciler event.
///
/// Acks and keepalive replies carry no status and map to `None`.
pub fn status_event_from(msg: ServerMessage) -> Option<StatusEvent> {
    match msg {
        ServerMessage::Progress {
            status,
            progress,
            message,
            ..
        } => Some(StatusEvent::push(status, progress, message)),
        ServerMessage::Completed { .. } => {
            Some(StatusEvent::push(ProcessingState::Completed, 100, None))
        }
        ServerMessage::Error { error, .. } => {
            Some(StatusEvent::push(ProcessingState::Failed, 0, Some(error)))
        }
        ServerMessage::Subscribed { .. } | ServerMessage::Unsubscribed { .. } | ServerMessage::Pong => {
            None
        }
    }
}

/// Run the push channel until shutdown or disconnect.
pub(crate) async fn run_push_channel(
    ws_url: String,
    video_id: VideoId,
    events: mpsc::Sender<SessionEvent>,
    mut shutdown: watch::Receiver<bool>,
) {
    let (stream, _) = match connect_async(ws_url.as_str()).await {
        Ok(connected) => connected,
        Err(e) => {
            warn!("Push channel connect failed for {}: {}", video_id, e);
            let _ = events.send(SessionEvent::PushClosed).await;
            return;
        }
    };
    let (mut sink, mut source) = stream.split();

    let subscribe = ClientMessage::subscribe(video_id.as_str());
    match serde_json::to_string(&subscribe) {
        Ok(json) => {
            if let Err(e) = sink.send(Message::Text(json)).await {
                warn!("Push channel subscribe failed for {}: {}", video_id, e);
                let _ = events.send(SessionEvent::PushClosed).await;
                return;
            }
        }
        Err(e) => {
            warn!("Failed to encode subscribe message: {}", e);
            return;
        }
    }
    info!("Push channel subscribed for video {}", video_id);

    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    // Best-effort goodbye; the server drops the
                    // subscription on close anyway.
                    if let Ok(json) =
                        serde_json::to_string(&ClientMessage::unsubscribe(video_id.as_str()))
                    {
                        let _ = sink.send(Message::Text(json)).await;
                    }
                    let _ = sink.send(Message::Close(None)).await;
                    debug!("Push channel closed for video {}", video_id);
                    break;
                }
            }
            frame = source.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ServerMessage>(&text) {
                            Ok(msg) => {
                                if let Some(event) = status_event_from(msg) {
                                    if events.send(SessionEvent::Status(event)).await.is_err() {
                                        break;
                                    }
                                }
                            }
                            Err(e) => debug!("Ignoring unparseable push frame: {}", e),
                        }
                    }
                    Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => {}
                    Some(Ok(Message::Close(_))) | None => {
                        warn!("Push channel closed by server for {}", video_id);
                        let _ = events.send(SessionEvent::PushClosed).await;
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("Push channel error for {}: {}", video_id, e);
                        let _ = events.send(SessionEvent::PushClosed).await;
                        break;
                    }
                }
            }
        }
    }
}
