//! Publish-to-social sync.
//!
//! When the CMS finishes publishing a post, this crate looks the post up,
//! works out its permalink and a short summary, and posts a markdown
//! status to a Mastodon-compatible instance (Mastodon, Pleroma,
//! GoToSocial) through `POST /api/v1/statuses`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use social_sync::{PublishEvent, SyncConfig, SyncOrchestrator, RouteTable};
//! use social_sync::stores::MemoryPostStore;
//!
//! let sync = SyncOrchestrator::new(store, RouteTable::new("https://blog.example"));
//! let config = SyncConfig::from_settings(&plugin_settings).with_site_url("https://blog.example");
//!
//! let result = sync.sync(&PublishEvent::published_post("Hello"), &config).await;
//! if !result.succeeded {
//!     tracing::warn!(error = ?result.error_message, "status not posted");
//! }
//! ```
//!
//! # Modules
//!
//! - [`sync`] - The orchestrator and its precondition checks
//! - [`summary`] - Summary selection and plain-text excerpts
//! - [`permalink`] - Permalink resolution with fallbacks
//! - [`format`] - Status message template
//! - [`client`] - Status API client
//! - [`traits`] - Host capabilities (store, router, transport, hook)
//! - [`stores`] - Post store implementations
//! - [`testing`] - Mock implementations for testing

pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod outcome;
pub mod permalink;
pub mod security;
pub mod stores;
pub mod summary;
pub mod sync;
pub mod telemetry;
pub mod testing;
pub mod traits;
pub mod transport;
pub mod types;

// Re-export core types at crate root
pub use client::SocialApiClient;
pub use config::SyncConfig;
pub use error::{ConfigError, StoreError, SyncError, TransportError};
pub use format::format_status;
pub use outcome::{LookupFailure, SkipReason, SyncOutcome, SyncResult};
pub use permalink::{PermalinkResolver, RouteTable};
pub use security::AccessToken;
pub use stores::MemoryPostStore;
pub use summary::SummaryResolver;
pub use sync::SyncOrchestrator;
pub use traits::{
    NoRouting, PermalinkHost, PostStore, PublishHook, StatusRequest, StatusTransport,
    TransportResponse,
};
pub use transport::{ReqwestTransport, TransportOptions};
pub use types::{
    ContentType, PostId, PostQuery, PostRecord, PostStatus, PublishEvent, StatusPayload,
    Visibility,
};

#[cfg(feature = "sqlite")]
pub use stores::SqlitePostStore;
