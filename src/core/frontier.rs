//! Per-direction search state
//!
//! A [`FrontierState`] holds the FIFO queue and the discovery records (parent
//! and distance) of one search direction, plus a ledger of expansions still in
//! flight. Everything lives behind a single mutex; the exhaustion check reads
//! the queue and the ledger in one critical section.

use std::collections::{BTreeMap, HashMap, VecDeque};

use parking_lot::Mutex;
use tokio::sync::futures::Notified;
use tokio::sync::Notify;

use crate::core::oracle::Direction;

/// Predecessor of a discovered node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parent {
    /// The node is the root of its direction; the chain ends here
    Root,
    /// The node was discovered while expanding this node
    Node(String),
}

/// Discovery record: set once, never changed
#[derive(Debug, Clone)]
struct Discovery {
    parent: Parent,
    distance: u32,
}

/// A node handed out by [`FrontierState::dequeue`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub node: String,
    pub distance: u32,
}

#[derive(Debug, Default)]
struct FrontierInner {
    queue: VecDeque<String>,
    discovered: HashMap<String, Discovery>,
    /// level -> number of claims of that level not yet finished
    in_flight: BTreeMap<u32, usize>,
}

impl FrontierInner {
    fn lowest_in_flight(&self) -> Option<u32> {
        self.in_flight.keys().next().copied()
    }

    fn queue_head_level(&self) -> Option<u32> {
        self.queue
            .front()
            .and_then(|node| self.discovered.get(node))
            .map(|record| record.distance)
    }
}

/// Queue, parent map and distance map of one search direction
#[derive(Debug)]
pub struct FrontierState {
    direction: Direction,
    root: String,
    inner: Mutex<FrontierInner>,
    work_available: Notify,
}

impl FrontierState {
    /// Create the state of one direction, seeded with its root
    pub fn new(direction: Direction, root: &str) -> Self {
        let mut inner = FrontierInner::default();
        inner.queue.push_back(root.to_string());
        inner.discovered.insert(
            root.to_string(),
            Discovery {
                parent: Parent::Root,
                distance: 0,
            },
        );

        Self {
            direction,
            root: root.to_string(),
            inner: Mutex::new(inner),
            work_available: Notify::new(),
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Record `node` as discovered from `parent` unless it already is.
    ///
    /// Returns `true` if this call discovered the node; in that case the node
    /// has been appended to the queue. `parent` must itself be discovered.
    pub fn try_discover(&self, node: &str, parent: &str) -> bool {
        {
            let mut inner = self.inner.lock();
            if inner.discovered.contains_key(node) {
                return false;
            }

            let Some(parent_distance) = inner.discovered.get(parent).map(|r| r.distance) else {
                debug_assert!(false, "parent {parent} of {node} was never discovered");
                return false;
            };

            inner.discovered.insert(
                node.to_string(),
                Discovery {
                    parent: Parent::Node(parent.to_string()),
                    distance: parent_distance + 1,
                },
            );
            inner.queue.push_back(node.to_string());
        }

        self.work_available.notify_waiters();
        true
    }

    /// Pop the oldest unexpanded node, if one may be expanded now.
    ///
    /// Returns `None` when the queue is empty, and also when its head belongs
    /// to a deeper level than an expansion still in flight. Every claim must
    /// be released with [`FrontierState::finish`].
    pub fn dequeue(&self) -> Option<Claim> {
        let mut inner = self.inner.lock();

        let head_level = inner.queue_head_level()?;
        if inner.lowest_in_flight().is_some_and(|level| level < head_level) {
            return None;
        }

        let node = inner.queue.pop_front()?;
        *inner.in_flight.entry(head_level).or_insert(0) += 1;

        Some(Claim {
            node,
            distance: head_level,
        })
    }

    /// Release a claim of the given level
    pub fn finish(&self, level: u32) {
        {
            let mut inner = self.inner.lock();
            if let Some(count) = inner.in_flight.get_mut(&level) {
                *count -= 1;
                if *count == 0 {
                    inner.in_flight.remove(&level);
                }
            }
        }

        // A level may have drained, lifting the barrier or exhausting the direction
        self.work_available.notify_waiters();
    }

    /// Whether the queue currently holds nodes
    pub fn has_pending(&self) -> bool {
        !self.inner.lock().queue.is_empty()
    }

    /// Queue empty and no expansion in flight: nothing can ever be enqueued again
    pub fn is_exhausted(&self) -> bool {
        let inner = self.inner.lock();
        inner.queue.is_empty() && inner.in_flight.is_empty()
    }

    /// Smallest level among queued and in-flight nodes; `None` once exhausted.
    ///
    /// Every node whose true distance is at most the floor has been discovered
    /// and its discoverer has finished.
    pub fn floor(&self) -> Option<u32> {
        let inner = self.inner.lock();
        match (inner.lowest_in_flight(), inner.queue_head_level()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn contains(&self, node: &str) -> bool {
        self.inner.lock().discovered.contains_key(node)
    }

    pub fn distance_of(&self, node: &str) -> Option<u32> {
        self.inner.lock().discovered.get(node).map(|r| r.distance)
    }

    pub fn parent_of(&self, node: &str) -> Option<Parent> {
        self.inner.lock().discovered.get(node).map(|r| r.parent.clone())
    }

    pub fn discovered_count(&self) -> usize {
        self.inner.lock().discovered.len()
    }

    /// Parent chain from `node` back to the root, both included.
    pub fn trace_to_root(&self, node: &str) -> Option<Vec<String>> {
        let inner = self.inner.lock();
        let mut chain = vec![node.to_string()];
        let mut current = inner.discovered.get(node)?;

        while let Parent::Node(parent) = &current.parent {
            chain.push(parent.clone());
            current = inner.discovered.get(parent)?;
        }

        Some(chain)
    }

    /// Future resolved by the next discovery or claim release.
    ///
    /// Create it before polling the queue so no wakeup is lost in between.
    pub fn work_available(&self) -> Notified<'_> {
        self.work_available.notified()
    }

    /// Wake every worker idling on this frontier
    pub fn wake_idle(&self) {
        self.work_available.notify_waiters();
    }
}
