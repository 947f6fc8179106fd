//! HTTP API layer for tandem.
//!
//! This crate provides the REST API and real-time streaming:
//!
//! - **Endpoints**: goals, votes, reflections, history, questions
//! - **Extractors**: Authentication
//! - **Middleware**: Bearer token auth
//! - **Streaming**: Server-Sent Events per goal channel
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;
pub mod sse;

pub use endpoints::router;
pub use sse::{SseBroadcaster, SseEvent};
