//! Server-Sent Events (SSE) for real-time updates.
//!
//! Every goal has its own broadcast channel; subscribers on a goal page see
//! votes, reflections, likes, and new subscribers as they happen.

#![allow(missing_docs)]

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    Router,
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use futures::stream::{self, Stream};
use serde::Serialize;
use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;

use crate::{extractors::AuthUser, middleware::AppState};

/// SSE event types.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SseEvent {
    /// A subscriber cast today's vote.
    VoteCast {
        goal_id: String,
        user_id: String,
        answer: String,
        date: String,
    },
    /// A reflection was posted on the goal.
    ReflectionPosted {
        goal_id: String,
        reflection_id: String,
        user_id: String,
    },
    /// A reflection's like count changed.
    ReflectionLiked {
        goal_id: String,
        reflection_id: String,
        user_id: String,
        liked: bool,
    },
    /// Someone joined the goal.
    SubscriberJoined { goal_id: String, user_id: String },
    /// Connection established.
    Connected,
}

/// SSE broadcast channels, one per goal.
#[derive(Clone)]
pub struct SseBroadcaster {
    goal_channels: std::sync::Arc<
        tokio::sync::RwLock<std::collections::HashMap<String, broadcast::Sender<SseEvent>>>,
    >,
}

impl SseBroadcaster {
    /// Create a new SSE broadcaster.
    #[must_use]
    pub fn new() -> Self {
        Self {
            goal_channels: std::sync::Arc::new(tokio::sync::RwLock::new(
                std::collections::HashMap::new(),
            )),
        }
    }

    /// Get or create a goal's channel.
    pub async fn goal_channel(&self, goal_id: &str) -> broadcast::Sender<SseEvent> {
        let mut channels = self.goal_channels.write().await;

        if let Some(sender) = channels.get(goal_id)
            && sender.receiver_count() > 0
        {
            return sender.clone();
        }

        let (sender, _) = broadcast::channel(100);
        channels.insert(goal_id.to_string(), sender.clone());
        sender
    }

    /// Broadcast an event to everyone watching a goal.
    pub async fn broadcast_to_goal(&self, goal_id: &str, event: SseEvent) {
        let channels = self.goal_channels.read().await;
        if let Some(sender) = channels.get(goal_id) {
            let _ = sender.send(event);
        }
    }

    /// Clean up channels nobody listens to anymore.
    pub async fn cleanup(&self) {
        let mut channels = self.goal_channels.write().await;
        channels.retain(|_, sender| sender.receiver_count() > 0);
    }
}

impl Default for SseBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-goal SSE stream.
async fn goal_stream(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(goal_id): Path<String>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let sender = state.sse_broadcaster.goal_channel(&goal_id).await;
    let rx = sender.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| {
        result.ok().map(|event| {
            Ok(Event::default()
                .json_data(&event)
                .unwrap_or_else(|_| Event::default().data("error")))
        })
    });

    // Add initial connected event
    let initial = stream::once(async {
        Ok(Event::default()
            .json_data(&SseEvent::Connected)
            .unwrap_or_else(|_| Event::default().data("connected")))
    });

    Sse::new(initial.chain(stream)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("ping"),
    )
}

/// Create SSE router.
pub fn router() -> Router<AppState> {
    Router::new().route("/goal/{goal_id}", get(goal_stream))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sse_broadcaster_goal_channel_reused() {
        let broadcaster = SseBroadcaster::new();

        let sender1 = broadcaster.goal_channel("goal1").await;
        let _rx = sender1.subscribe();
        let sender2 = broadcaster.goal_channel("goal1").await;

        assert!(sender2.same_channel(&sender1));
    }

    #[tokio::test]
    async fn test_sse_broadcaster_broadcast_to_goal() {
        let broadcaster = SseBroadcaster::new();
        let sender = broadcaster.goal_channel("goal1").await;
        let mut rx = sender.subscribe();

        broadcaster
            .broadcast_to_goal(
                "goal1",
                SseEvent::SubscriberJoined {
                    goal_id: "goal1".to_string(),
                    user_id: "user1".to_string(),
                },
            )
            .await;

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, SseEvent::SubscriberJoined { .. }));
    }

    #[tokio::test]
    async fn test_sse_broadcaster_cleanup_drops_idle_channels() {
        let broadcaster = SseBroadcaster::new();
        let _sender = broadcaster.goal_channel("goal1").await;

        // No receivers, so cleanup removes the channel
        broadcaster.cleanup().await;
        let channels = broadcaster.goal_channels.read().await;
        assert!(channels.is_empty());
    }

    #[test]
    fn test_sse_event_serialization() {
        let event = SseEvent::VoteCast {
            goal_id: "goal1".to_string(),
            user_id: "user1".to_string(),
            answer: "yes".to_string(),
            date: "2025-06-01".to_string(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"voteCast\""));
        assert!(json.contains("\"goalId\":\"goal1\""));
    }
}
