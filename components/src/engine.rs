//! The single consumer of watch events.
//!
//! The engine owns the [`KnownFiles`] registry and handles events one at a
//! time, so every index and style file has exactly one writer no matter how
//! many targets report into the session.

use autosnip_directory_watcher::{TargetEvent, WatchSession};
use tracing::{debug, info};

use crate::error::Result;
use crate::handler::ComponentHandler;
use crate::registry::KnownFiles;

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub events_handled: usize,
}

pub struct Engine {
    handler: ComponentHandler,
    registry: KnownFiles,
}

impl Engine {
    pub fn new(handler: ComponentHandler) -> Self {
        Self {
            handler,
            registry: KnownFiles::new(),
        }
    }

    /// Files currently managed by the tool.
    pub fn registry(&self) -> &KnownFiles {
        &self.registry
    }

    /// Handle a single event.
    pub async fn dispatch(&mut self, event: &TargetEvent) -> Result<()> {
        debug!(
            "{:?} {} (target {})",
            event.event.kind,
            event.event.path.display(),
            event.target.path.display()
        );
        self.handler
            .handle(&event.event, &event.target, &mut self.registry)
            .await
    }

    /// Handle events until the session runs dry.
    ///
    /// The first error stops the run; index files may be inconsistent after a
    /// partial failure.
    pub async fn run(&mut self, session: &mut WatchSession) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let mut scan_reported = false;

        while let Some(event) = session.next_event().await {
            self.dispatch(&event).await?;
            summary.events_handled += 1;

            if !scan_reported && session.scans_finished() {
                scan_reported = true;
                info!(
                    "Initial scan finished, {} file(s) managed",
                    self.registry.len()
                );
            }
        }

        info!("Handled {} event(s)", summary.events_handled);
        Ok(summary)
    }
}
