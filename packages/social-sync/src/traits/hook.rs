//! Entry point the host wires into its "publish finished" hook.

use async_trait::async_trait;

use crate::config::SyncConfig;
use crate::types::PublishEvent;

/// Called by the host after a publish has been committed.
///
/// The signature has no error channel: nothing a hook does may abort or
/// roll back the publish.
#[async_trait]
pub trait PublishHook: Send + Sync {
    async fn on_publish_finished(&self, event: &PublishEvent, config: &SyncConfig);
}
