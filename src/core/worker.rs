//! Search workers
//!
//! Every direction runs a pool of identical workers draining the same
//! [`FrontierState`]. Worker 0 of a pool is the master: it is the only one
//! allowed to declare the direction exhausted. Slaves just expand nodes and
//! idle while there is nothing to take.
//!
//! A queue can be empty for a moment while other workers are about to enqueue
//! more nodes, so "queue empty" alone never ends a direction. The master asks
//! the frontier whether the queue is empty *and* no expansion is in flight,
//! which the frontier answers under its own lock.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, trace};
use tokio::sync::futures::Notified;

use crate::core::coordinator::MeetingCoordinator;
use crate::core::error::{Error, Result};
use crate::core::frontier::{Claim, FrontierState};
use crate::core::options::ObserverHandle;
use crate::core::oracle::{Direction, NeighborOracle};

/// Position of a worker inside its pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Master,
    Slave,
}

/// What a worker did before it exited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerReport {
    pub id: usize,
    pub direction: Direction,
    pub role: Role,
    pub expanded: usize,
}

/// Everything the workers of one search share
#[derive(Clone)]
pub struct SearchContext {
    pub coordinator: Arc<MeetingCoordinator>,
    pub oracle: Arc<dyn NeighborOracle>,
    pub observer: ObserverHandle,
    pub dequeue_trials: u32,
    pub trial_wait_time: Duration,
}

enum Step {
    Continue,
    Stop,
}

/// Releases a claim however the expansion ends
struct ClaimGuard {
    frontier: Arc<FrontierState>,
    level: u32,
}

impl Drop for ClaimGuard {
    fn drop(&mut self) {
        self.frontier.finish(self.level);
    }
}

/// One worker of one direction
pub struct Worker {
    id: usize,
    role: Role,
    direction: Direction,
    frontier: Arc<FrontierState>,
    context: SearchContext,
    expanded: usize,
}

impl Worker {
    pub fn new(id: usize, direction: Direction, context: SearchContext) -> Self {
        let role = if id == 0 { Role::Master } else { Role::Slave };
        let frontier = Arc::clone(context.coordinator.frontier(direction));

        Self {
            id,
            role,
            direction,
            frontier,
            context,
            expanded: 0,
        }
    }

    /// Work until a global stop is requested or an expansion fails
    pub async fn run(mut self) -> Result<WorkerReport> {
        debug!("{} worker {} started ({:?})", self.direction, self.id, self.role);

        while !self.context.coordinator.is_stopped() {
            // Registered before polling the queue so a discovery in between still wakes us
            let work = self.frontier.work_available();

            match self.frontier.dequeue() {
                Some(claim) => {
                    drop(work);
                    if self.frontier.has_pending() {
                        self.frontier.wake_idle();
                    }

                    match self.expand(claim).await {
                        Ok(Step::Continue) => {}
                        Ok(Step::Stop) => break,
                        Err(err) => {
                            self.context.coordinator.request_global_stop();
                            return Err(err);
                        }
                    }
                }
                None => match self.role {
                    Role::Slave => self.idle(work).await,
                    Role::Master => {
                        if self.await_work_or_exhaustion(work).await {
                            break;
                        }
                    }
                },
            }
        }

        debug!(
            "{} worker {} exiting after {} expansions",
            self.direction, self.id, self.expanded
        );
        Ok(WorkerReport {
            id: self.id,
            direction: self.direction,
            role: self.role,
            expanded: self.expanded,
        })
    }

    async fn expand(&mut self, claim: Claim) -> Result<Step> {
        let _release = ClaimGuard {
            frontier: Arc::clone(&self.frontier),
            level: claim.distance,
        };
        let node = claim.node;
        let coordinator = &self.context.coordinator;

        coordinator.report_discovery(self.direction, &node);
        if coordinator.is_proven_optimal(&node) || coordinator.frontier_bound_reached() {
            coordinator.declare_optimal();
            coordinator.request_global_stop();
            return Ok(Step::Stop);
        }

        self.context.observer.on_expand(self.direction, &node);

        let neighbors = tokio::select! {
            result = self.context.oracle.neighbors(&node, self.direction) => {
                result.map_err(|err| Error::oracle_failure(self.direction, &node, err))?
            }
            _ = coordinator.stopped() => return Ok(Step::Stop),
        };
        self.expanded += 1;

        trace!(
            "{} worker {} expanded \"{}\" (level {}, {} neighbors)",
            self.direction,
            self.id,
            node,
            claim.distance,
            neighbors.len()
        );

        for neighbor in neighbors {
            if self.frontier.try_discover(&neighbor, &node) {
                coordinator.report_discovery(self.direction, &neighbor);
            }
        }

        Ok(Step::Continue)
    }

    /// Slave behaviour on an empty queue: sleep until woken or one wait elapses
    async fn idle(&self, work: Notified<'_>) {
        tokio::select! {
            _ = work => {}
            _ = tokio::time::sleep(self.context.trial_wait_time) => {}
            _ = self.context.coordinator.stopped() => {}
        }
    }

    /// Master behaviour on an empty queue.
    ///
    /// Waits up to `dequeue_trials` times (at least once) for work to show up.
    /// If none does and the frontier is exhausted, stops the whole search and
    /// returns `true`.
    async fn await_work_or_exhaustion<'a>(&'a self, first: Notified<'a>) -> bool {
        let coordinator = &self.context.coordinator;
        let mut wake = Some(first);

        for _ in 0..self.context.dequeue_trials.max(1) {
            let notified = wake.take().unwrap_or_else(|| self.frontier.work_available());
            tokio::select! {
                _ = notified => {}
                _ = tokio::time::sleep(self.context.trial_wait_time) => {}
                _ = coordinator.stopped() => return false,
            }

            if self.frontier.has_pending() {
                return false;
            }
        }

        if !self.frontier.is_exhausted() {
            // Other workers are still expanding; they may enqueue more
            return false;
        }

        debug!(
            "{} search exhausted after {} discoveries",
            self.direction,
            self.frontier.discovered_count()
        );
        coordinator.declare_exhausted(self.direction);
        coordinator.request_global_stop();
        true
    }
}
