//! Search progress notifications
//!
//! Observers are fire-and-forget: the engine never reads anything back from
//! them, and they have no influence on control flow.

use log::{debug, info};

use crate::core::oracle::Direction;

/// Receives lifecycle events of a search. All methods default to no-ops.
pub trait ProgressObserver: Send + Sync {
    fn on_begin_search(&self, _source: &str, _target: &str) {}

    /// A worker of `direction` is about to look up the neighbors of `node`
    fn on_expand(&self, _direction: Direction, _node: &str) {}

    fn on_path_found(&self, _path: &[String]) {}

    fn on_unreachable(&self, _source: &str, _target: &str) {}
}

/// Ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl ProgressObserver for SilentObserver {}

/// Forwards events to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ProgressObserver for LogObserver {
    fn on_begin_search(&self, source: &str, target: &str) {
        info!("Began searching a path from \"{}\" to \"{}\"", source, target);
    }

    fn on_expand(&self, direction: Direction, node: &str) {
        debug!("[{} search] expanding \"{}\"", direction, node);
    }

    fn on_path_found(&self, path: &[String]) {
        if let (Some(first), Some(last)) = (path.first(), path.last()) {
            info!(
                "Found a shortest path from \"{}\" to \"{}\" ({} hops)",
                first,
                last,
                path.len().saturating_sub(1)
            );
        }
    }

    fn on_unreachable(&self, source: &str, target: &str) {
        info!("No path from \"{}\" to \"{}\"", source, target);
    }
}
