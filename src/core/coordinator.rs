//! Cross-direction meeting detection
//!
//! The [`MeetingCoordinator`] is shared by both worker pools. It records the
//! best touch node seen so far, decides when that touch node is provably
//! optimal, and owns the cancellation token every worker observes.
//!
//! Frontier distances are read through the frontier API before the
//! coordinator's own lock is taken, so frontier locks and the coordinator lock
//! are never held together.

use std::sync::Arc;

use log::{debug, info};
use parking_lot::Mutex;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

use crate::core::frontier::FrontierState;
use crate::core::oracle::Direction;

/// Lifecycle of one search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    /// The frontiers have not met yet
    Searching,
    /// At least one touch node is known, not yet proven optimal
    MetOnce,
    /// The best touch node yields a shortest path
    Optimal,
    /// A direction ran out of nodes without any meeting
    Exhausted,
}

#[derive(Debug)]
struct Meeting {
    best_distance: Option<u32>,
    touch_node: Option<String>,
    phase: SearchPhase,
}

/// Shared state of both search directions
#[derive(Debug)]
pub struct MeetingCoordinator {
    forward: Arc<FrontierState>,
    backward: Arc<FrontierState>,
    meeting: Mutex<Meeting>,
    stop: CancellationToken,
}

impl MeetingCoordinator {
    pub fn new(forward: Arc<FrontierState>, backward: Arc<FrontierState>) -> Self {
        Self {
            forward,
            backward,
            meeting: Mutex::new(Meeting {
                best_distance: None,
                touch_node: None,
                phase: SearchPhase::Searching,
            }),
            stop: CancellationToken::new(),
        }
    }

    pub fn frontier(&self, direction: Direction) -> &Arc<FrontierState> {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Backward => &self.backward,
        }
    }

    /// Combined distance through `node`, if both directions discovered it
    fn distance_through(&self, node: &str) -> Option<u32> {
        let forward = self.forward.distance_of(node)?;
        let backward = self.backward.distance_of(node)?;
        Some(forward + backward)
    }

    /// Record `node` as a candidate touch node if the opposite side knows it.
    ///
    /// Called after a worker dequeues `node` and after it newly discovers it.
    /// Returns `true` if the best distance improved.
    pub fn report_discovery(&self, direction: Direction, node: &str) -> bool {
        if !self.frontier(direction.opposite()).contains(node) {
            return false;
        }
        let Some(distance) = self.distance_through(node) else {
            return false;
        };

        let mut meeting = self.meeting.lock();
        if meeting.best_distance.is_some_and(|best| best <= distance) {
            return false;
        }

        debug!(
            "{} search touched \"{}\" (combined distance {})",
            direction, node, distance
        );
        meeting.best_distance = Some(distance);
        meeting.touch_node = Some(node.to_string());
        if meeting.phase == SearchPhase::Searching {
            meeting.phase = SearchPhase::MetOnce;
        }
        true
    }

    pub fn report_discovery_from_forward(&self, node: &str) -> bool {
        self.report_discovery(Direction::Forward, node)
    }

    pub fn report_discovery_from_backward(&self, node: &str) -> bool {
        self.report_discovery(Direction::Backward, node)
    }

    /// Stopping rule on a single dequeued node.
    ///
    /// True only if a touch node exists, `node` is known to both directions,
    /// and the combined distance through `node` exceeds the best one.
    pub fn is_proven_optimal(&self, node: &str) -> bool {
        let Some(distance) = self.distance_through(node) else {
            return false;
        };

        let meeting = self.meeting.lock();
        meeting.touch_node.is_some() && meeting.best_distance.is_some_and(|best| distance > best)
    }

    /// Stopping rule on the two frontiers.
    ///
    /// Nodes up to each direction's floor are settled. A path shorter than the
    /// best distance would cross a node settled by both sides, and that node
    /// would already have been reported.
    pub fn frontier_bound_reached(&self) -> bool {
        let Some(best) = self.best_distance() else {
            return false;
        };

        match (self.forward.floor(), self.backward.floor()) {
            (Some(forward), Some(backward)) => forward + backward + 1 >= best,
            // An exhausted side has settled everything it can reach
            _ => true,
        }
    }

    pub fn best_distance(&self) -> Option<u32> {
        self.meeting.lock().best_distance
    }

    pub fn touch_node(&self) -> Option<String> {
        self.meeting.lock().touch_node.clone()
    }

    pub fn phase(&self) -> SearchPhase {
        self.meeting.lock().phase
    }

    /// The best touch node is proven to give a shortest path
    pub fn declare_optimal(&self) {
        let mut meeting = self.meeting.lock();
        if meeting.touch_node.is_some() && meeting.phase != SearchPhase::Optimal {
            info!(
                "Shortest path proven: {} hops via \"{}\"",
                meeting.best_distance.unwrap_or_default(),
                meeting.touch_node.as_deref().unwrap_or_default()
            );
            meeting.phase = SearchPhase::Optimal;
        }
    }

    /// `direction` has expanded every node it can reach.
    ///
    /// With a meeting on record the best touch node is optimal: the exhausted
    /// side discovered the opposite root at its exact distance. Without one the
    /// target is unreachable.
    pub fn declare_exhausted(&self, direction: Direction) {
        let mut meeting = self.meeting.lock();
        match meeting.phase {
            SearchPhase::Searching => {
                info!("{} search exhausted without meeting the other side", direction);
                meeting.phase = SearchPhase::Exhausted;
            }
            SearchPhase::MetOnce => {
                debug!("{} search exhausted after meeting; best path is final", direction);
                meeting.phase = SearchPhase::Optimal;
            }
            SearchPhase::Optimal | SearchPhase::Exhausted => {}
        }
    }

    /// Ask every worker of both directions to exit
    pub fn request_global_stop(&self) {
        self.stop.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_cancelled()
    }

    /// Future resolved once a global stop is requested
    pub fn stopped(&self) -> WaitForCancellationFuture<'_> {
        self.stop.cancelled()
    }
}
