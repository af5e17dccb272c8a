//! WebSocket message types for the push channel.
//!
//! These schemas match the processing service's wire format.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::video::ProcessingState;

/// Messages sent by the client over the push channel.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Start receiving events for a video
    Subscribe { video_id: String },
    /// Stop receiving events for a video
    Unsubscribe { video_id: String },
    /// Keepalive probe
    Ping,
}

impl ClientMessage {
    /// Create a subscribe message.
    pub fn subscribe(video_id: impl Into<String>) -> Self {
        ClientMessage::Subscribe {
            video_id: video_id.into(),
        }
    }

    /// Create an unsubscribe message.
    pub fn unsubscribe(video_id: impl Into<String>) -> Self {
        ClientMessage::Unsubscribe {
            video_id: video_id.into(),
        }
    }
}

/// Messages received from the processing service over the push channel.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Processing progress update
    Progress {
        #[serde(skip_serializing_if = "Option::is_none")]
        video_id: Option<String>,
        status: ProcessingState,
        progress: u8,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// Processing finished; highlights are ready to fetch
    Completed {
        #[serde(skip_serializing_if = "Option::is_none")]
        video_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        highlights_count: Option<u32>,
    },

    /// Processing failed
    Error {
        #[serde(skip_serializing_if = "Option::is_none")]
        video_id: Option<String>,
        error: String,
    },

    /// Subscription acknowledged
    Subscribed { video_id: String },

    /// Unsubscription acknowledged
    Unsubscribed { video_id: String },

    /// Keepalive reply
    Pong,
}
