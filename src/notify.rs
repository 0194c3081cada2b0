//! Collaborator seams for user-facing feedback and collection events.
//!
//! The orchestration layer never renders anything itself; terminal outcomes
//! are pushed through these traits and the embedding shell decides what a
//! toast or a list refresh looks like.

use tracing::{error, info};

/// Receives human-readable outcome notifications
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Receives collection-level events
pub trait CollectionEvents: Send + Sync {
    /// A delete call succeeded for `id`; fired exactly once per deletion
    fn document_deleted(&self, id: i64);
    /// An upload succeeded and the collection should be refetched
    fn refresh_requested(&self);
}

/// Default notifier that routes everything to `tracing`
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        info!(message, "operation succeeded");
    }

    fn error(&self, message: &str) {
        error!(message, "operation failed");
    }
}

impl CollectionEvents for LogNotifier {
    fn document_deleted(&self, id: i64) {
        info!(id, "document deleted");
    }

    fn refresh_requested(&self) {
        info!("collection refresh requested");
    }
}
