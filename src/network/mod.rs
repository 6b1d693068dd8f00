//! Network layer - board requests and the push channel
//!
//! The Network actor receives board commands and sends back responses.

pub mod actor;
pub mod client;
pub mod sse;

pub use actor::NetworkActor;
pub use sse::{SseEvent, SseParser, Subscription, SubscriptionEvent};
