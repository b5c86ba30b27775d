//! `agileplace-http` is an async HTTP client for the AgilePlace (LeanKit) REST API.
//!
//! [`AgilePlaceClient::request`] sends one authenticated JSON request and
//! transparently retries rate-limited (429) responses and transport failures
//! with bounded exponential backoff, honoring `Retry-After`. Everything else
//! surfaces as a typed [`AgilePlaceError`].
//!
//! Endpoint helpers for boards, cards, connections, dependencies, bulk
//! operations and the user/team directory are methods on the same client.

mod boards;
mod bulk;
mod cards;
mod client;
mod config;
mod connections;
mod decode;
mod dependencies;
mod directory;
mod error;
mod options;
mod params;
mod sleep;
mod types;
mod value;
mod wire;

pub use boards::{BoardCardsQuery, BoardQuery};
pub use cards::CardQuery;
pub use client::AgilePlaceClient;
pub use config::{domain_to_base_url, ClientConfig, DOMAIN_ENV, TOKEN_ENV};
pub use connections::ChildrenQuery;
pub use error::AgilePlaceError;
pub use options::ClientOptions;
pub use params::Query;
pub use sleep::{SleepFuture, Sleeper, TokioSleeper};
pub use types::{ApiRequest, ApiResponse, Method, RateLimitInfo};
pub use value::QueryValue;
pub use wire::{
    BoardAccess, BoardRole, CardConnections, CardMove, ConnectionTargets, DependencyType,
    NewBoard, NewCard, NewChildCard, Priority, Updates,
};

/// Cancellation handle accepted by [`AgilePlaceClient::request_with_cancel`].
pub use tokio_util::sync::CancellationToken;

pub type Result<T> = std::result::Result<T, AgilePlaceError>;
