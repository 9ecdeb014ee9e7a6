//! Search orchestration
//!
//! [`PathFinder`] seeds one frontier per direction, spawns the two worker
//! pools on a [`JoinSet`] and waits for all of them before splicing the
//! result together.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use tokio::task::JoinSet;

use crate::core::coordinator::{MeetingCoordinator, SearchPhase};
use crate::core::error::{Error, Result};
use crate::core::frontier::FrontierState;
use crate::core::observer::SilentObserver;
use crate::core::options::{ObserverHandle, SearchOptions};
use crate::core::oracle::{Direction, NeighborOracle};
use crate::core::path;
use crate::core::worker::{SearchContext, Worker};

/// Outcome of one search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    /// Source to target, both included; empty if no path exists
    pub path: Vec<String>,
    pub expanded: usize,
    pub forward_expanded: usize,
    pub backward_expanded: usize,
    pub elapsed: Duration,
    pub phase: SearchPhase,
}

impl SearchReport {
    pub fn is_found(&self) -> bool {
        !self.path.is_empty()
    }

    /// Number of links followed, if a path was found
    pub fn hops(&self) -> Option<usize> {
        self.path.len().checked_sub(1)
    }
}

/// Parallel bidirectional breadth-first search over a [`NeighborOracle`]
#[derive(Clone)]
pub struct PathFinder {
    oracle: Arc<dyn NeighborOracle>,
}

impl PathFinder {
    pub fn new<O: NeighborOracle + 'static>(oracle: O) -> Self {
        Self {
            oracle: Arc::new(oracle),
        }
    }

    pub fn from_shared(oracle: Arc<dyn NeighborOracle>) -> Self {
        Self { oracle }
    }

    /// Find a shortest path from `source` to `target`.
    ///
    /// An unreachable target is not an error: the report carries an empty
    /// path. Any oracle failure stops every worker and is returned as is.
    pub async fn search(
        &self,
        source: &str,
        target: &str,
        options: &SearchOptions,
    ) -> Result<SearchReport> {
        if source.is_empty() || target.is_empty() {
            return Err(Error::InvalidInput(
                "source and target must not be empty".to_string(),
            ));
        }
        options.validate()?;

        let observer: ObserverHandle = options
            .observer
            .clone()
            .unwrap_or_else(|| Arc::new(SilentObserver));
        let started = Instant::now();
        observer.on_begin_search(source, target);

        if source == target {
            return self.lookup_single(source, &observer, started).await;
        }

        let threads = options.effective_threads();
        if threads != options.threads_per_direction {
            warn!(
                "Requested {} workers per direction, using {}",
                options.threads_per_direction, threads
            );
        }

        let coordinator = Arc::new(MeetingCoordinator::new(
            Arc::new(FrontierState::new(Direction::Forward, source)),
            Arc::new(FrontierState::new(Direction::Backward, target)),
        ));
        let context = SearchContext {
            coordinator: Arc::clone(&coordinator),
            oracle: Arc::clone(&self.oracle),
            observer: Arc::clone(&observer),
            dequeue_trials: options.dequeue_trials,
            trial_wait_time: options.trial_wait_time,
        };

        debug!(
            "Starting {} workers per direction for \"{}\" -> \"{}\"",
            threads, source, target
        );

        let mut workers = JoinSet::new();
        for direction in [Direction::Forward, Direction::Backward] {
            for id in 0..threads {
                workers.spawn(Worker::new(id, direction, context.clone()).run());
            }
        }

        let mut forward_expanded = 0;
        let mut backward_expanded = 0;
        let mut failure: Option<Error> = None;

        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(Ok(report)) => {
                    debug!(
                        "{} worker {} ({:?}) expanded {} nodes",
                        report.direction, report.id, report.role, report.expanded
                    );
                    match report.direction {
                        Direction::Forward => forward_expanded += report.expanded,
                        Direction::Backward => backward_expanded += report.expanded,
                    }
                }
                Ok(Err(err)) => {
                    coordinator.request_global_stop();
                    failure.get_or_insert(err);
                }
                Err(join_err) => {
                    coordinator.request_global_stop();
                    failure.get_or_insert(Error::WorkerFailed(join_err.to_string()));
                }
            }
        }

        if let Some(err) = failure {
            warn!("Search from \"{}\" to \"{}\" failed: {}", source, target, err);
            return Err(err);
        }

        let phase = coordinator.phase();
        let path = match (phase, coordinator.touch_node()) {
            (SearchPhase::MetOnce | SearchPhase::Optimal, Some(touch)) => path::reconstruct(
                &touch,
                coordinator.frontier(Direction::Forward),
                coordinator.frontier(Direction::Backward),
            )
            .unwrap_or_default(),
            _ => Vec::new(),
        };

        let report = SearchReport {
            path,
            expanded: forward_expanded + backward_expanded,
            forward_expanded,
            backward_expanded,
            elapsed: started.elapsed(),
            phase,
        };

        if report.is_found() {
            observer.on_path_found(&report.path);
        } else {
            observer.on_unreachable(source, target);
        }

        info!(
            "Search finished in {:.2?}: {} expansions ({} forward, {} backward), {}",
            report.elapsed,
            report.expanded,
            report.forward_expanded,
            report.backward_expanded,
            match report.hops() {
                Some(hops) => format!("{} hops", hops),
                None => "no path".to_string(),
            }
        );

        Ok(report)
    }

    /// `source == target`: the node is its own path if it exists at all
    async fn lookup_single(
        &self,
        node: &str,
        observer: &ObserverHandle,
        started: Instant,
    ) -> Result<SearchReport> {
        let neighbors = self
            .oracle
            .forward_neighbors(node)
            .await
            .map_err(|err| Error::oracle_failure(Direction::Forward, node, err))?;

        let path = if neighbors.is_empty() {
            debug!("\"{}\" has no outgoing links; treating it as nonexistent", node);
            observer.on_unreachable(node, node);
            Vec::new()
        } else {
            let path = vec![node.to_string()];
            observer.on_path_found(&path);
            path
        };

        let phase = if path.is_empty() {
            SearchPhase::Exhausted
        } else {
            SearchPhase::Optimal
        };

        Ok(SearchReport {
            path,
            expanded: 1,
            forward_expanded: 1,
            backward_expanded: 0,
            elapsed: started.elapsed(),
            phase,
        })
    }
}
