//! Host-side permalink generation.

use crate::types::PostRecord;

/// The host's routing layer, as seen by the permalink resolver.
///
/// Both methods are infallible from the caller's point of view: `None`
/// (or an empty string) means "this strategy has nothing", and the
/// resolver moves on to the next one.
pub trait PermalinkHost: Send + Sync {
    /// Permalink from the host's own content widget.
    fn primary_permalink(&self, record: &PostRecord) -> Option<String>;

    /// Permalink built from a named route. `None` when the route is not
    /// registered.
    fn route_permalink(&self, route: &str, record: &PostRecord) -> Option<String>;
}

/// A host with no routing at all. Every post gets the fallback URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRouting;

impl PermalinkHost for NoRouting {
    fn primary_permalink(&self, _record: &PostRecord) -> Option<String> {
        None
    }

    fn route_permalink(&self, _route: &str, _record: &PostRecord) -> Option<String> {
        None
    }
}

impl<T: PermalinkHost + ?Sized> PermalinkHost for std::sync::Arc<T> {
    fn primary_permalink(&self, record: &PostRecord) -> Option<String> {
        (**self).primary_permalink(record)
    }

    fn route_permalink(&self, route: &str, record: &PostRecord) -> Option<String> {
        (**self).route_permalink(route, record)
    }
}
