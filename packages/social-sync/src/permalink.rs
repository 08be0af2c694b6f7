//! Permalink resolution.
//!
//! Strategies, in order:
//! 1. the host's own permalink for the post
//! 2. the host's `post` route, when registered
//! 3. `<site_url>/index.php/archives/<id>`

use chrono::Datelike;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::error::{Result, SyncError};
use crate::traits::PermalinkHost;
use crate::types::PostRecord;

/// Route name asked of the host's router.
pub const POST_ROUTE: &str = "post";

/// Which strategy produced a permalink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermalinkSource {
    Primary,
    Route,
    Fallback,
}

/// Resolves the public URL of a post.
pub struct PermalinkResolver<'a, H: PermalinkHost + ?Sized> {
    host: &'a H,
    site_url: &'a str,
}

impl<'a, H: PermalinkHost + ?Sized> PermalinkResolver<'a, H> {
    pub fn new(host: &'a H, site_url: &'a str) -> Self {
        Self { host, site_url }
    }

    /// Public URL for `record`. Never `Ok("")`.
    pub fn resolve(&self, record: &PostRecord) -> Result<String> {
        self.resolve_with_source(record).map(|(url, _)| url)
    }

    pub fn resolve_with_source(&self, record: &PostRecord) -> Result<(String, PermalinkSource)> {
        if let Some(url) = non_empty(self.host.primary_permalink(record)) {
            debug!(post_id = %record.id, url = %url, "Permalink from host");
            return Ok((url, PermalinkSource::Primary));
        }

        if let Some(url) = non_empty(self.host.route_permalink(POST_ROUTE, record)) {
            debug!(post_id = %record.id, url = %url, "Permalink from post route");
            return Ok((url, PermalinkSource::Route));
        }

        let url = fallback_permalink(self.site_url, record);
        if url.is_empty() {
            warn!(post_id = %record.id, "Permalink resolved to an empty string");
            return Err(SyncError::EmptyPermalink { post_id: record.id });
        }

        debug!(post_id = %record.id, url = %url, "Permalink from fallback pattern");
        Ok((url, PermalinkSource::Fallback))
    }
}

/// `<site_url>/index.php/archives/<id>`, joined with a single slash.
pub fn fallback_permalink(site_url: &str, record: &PostRecord) -> String {
    join_url(site_url, &format!("index.php/archives/{}", record.id))
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn non_empty(url: Option<String>) -> Option<String> {
    url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
}

/// A small router for hosts that describe their routes as URL patterns.
///
/// Patterns use `{cid}`, `{year}`, `{month}` and `{day}` placeholders,
/// e.g. `/archives/{cid}/` or `/{year}/{month}/{cid}.html`.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    site_url: String,
    routes: HashMap<String, String>,
}

impl RouteTable {
    pub fn new(site_url: impl Into<String>) -> Self {
        Self {
            site_url: site_url.into(),
            routes: HashMap::new(),
        }
    }

    /// Register a route pattern under a name.
    pub fn with_route(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.routes.insert(name.into(), pattern.into());
        self
    }

    pub fn has_route(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    fn render(&self, pattern: &str, record: &PostRecord) -> String {
        let created = record.created_at;
        let path = pattern
            .replace("{cid}", &record.id.to_string())
            .replace("{year}", &created.year().to_string())
            .replace("{month}", &format!("{:02}", created.month()))
            .replace("{day}", &format!("{:02}", created.day()));
        join_url(&self.site_url, &path)
    }
}

impl PermalinkHost for RouteTable {
    fn primary_permalink(&self, _record: &PostRecord) -> Option<String> {
        None
    }

    fn route_permalink(&self, route: &str, record: &PostRecord) -> Option<String> {
        self.routes
            .get(route)
            .map(|pattern| self.render(pattern, record))
    }
}
