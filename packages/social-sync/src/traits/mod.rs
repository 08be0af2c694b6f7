//! Capabilities the host provides to the sync routine.
//!
//! The sync core never talks to the CMS directly. It reads posts through
//! [`PostStore`], asks [`PermalinkHost`] for links, and sends requests
//! through [`StatusTransport`]. Hosts call back in through [`PublishHook`].

pub mod hook;
pub mod permalink;
pub mod store;
pub mod transport;

pub use hook::PublishHook;
pub use permalink::{NoRouting, PermalinkHost};
pub use store::PostStore;
pub use transport::{StatusRequest, StatusTransport, TransportResponse};
