//! Neighbor lookup abstraction for wikipath
//!
//! The search engine never talks to Wikipedia directly. It asks a
//! [`NeighborOracle`] for the out-links or in-links of a node, one lookup per
//! node and direction. [`StaticGraph`] answers those lookups from memory.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use async_trait::async_trait;

use crate::core::error::Result;

/// Search direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Follow out-links away from the source
    Forward,
    /// Follow in-links back toward the target
    Backward,
}

impl Direction {
    /// The direction searching from the other end
    pub fn opposite(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Backward => write!(f, "backward"),
        }
    }
}

/// Resolves the immediate neighbors of a node.
///
/// Implementations may block on network I/O for a long time. An empty list is
/// a dead end, not an error; an `Err` aborts the whole search.
#[async_trait]
pub trait NeighborOracle: Send + Sync {
    /// Nodes that `node` links to
    async fn forward_neighbors(&self, node: &str) -> Result<Vec<String>>;

    /// Nodes that link to `node`
    async fn backward_neighbors(&self, node: &str) -> Result<Vec<String>>;

    /// Neighbors of `node` for the given search direction
    async fn neighbors(&self, node: &str, direction: Direction) -> Result<Vec<String>> {
        match direction {
            Direction::Forward => self.forward_neighbors(node).await,
            Direction::Backward => self.backward_neighbors(node).await,
        }
    }
}

/// A fully materialized directed graph.
#[derive(Debug, Clone, Default)]
pub struct StaticGraph {
    out_links: HashMap<String, Vec<String>>,
    in_links: HashMap<String, Vec<String>>,
}

impl StaticGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from `(from, to)` pairs
    pub fn from_edges<I, S>(edges: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut graph = Self::new();
        for (from, to) in edges {
            graph.add_edge(from, to);
        }
        graph
    }

    /// Add the arc `from -> to`. Duplicate arcs are ignored.
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) {
        let from = from.into();
        let to = to.into();

        let out = self.out_links.entry(from.clone()).or_default();
        if out.contains(&to) {
            return;
        }
        out.push(to.clone());
        self.in_links.entry(to).or_default().push(from);
    }

    pub fn edge_count(&self) -> usize {
        self.out_links.values().map(Vec::len).sum()
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.out_links
            .get(from)
            .is_some_and(|targets| targets.iter().any(|t| t == to))
    }

    /// Hop count of the shortest path, computed with a plain BFS
    pub fn bfs_distance(&self, source: &str, target: &str) -> Option<usize> {
        if source == target {
            return Some(0);
        }

        let mut visited = HashSet::from([source]);
        let mut queue = VecDeque::from([(source, 0usize)]);

        while let Some((node, distance)) = queue.pop_front() {
            for next in self.out_links.get(node).into_iter().flatten() {
                if next == target {
                    return Some(distance + 1);
                }
                if visited.insert(next.as_str()) {
                    queue.push_back((next.as_str(), distance + 1));
                }
            }
        }

        None
    }

    /// Every node reachable from `source` along out-links, `source` included
    pub fn reachable_from(&self, source: &str) -> HashSet<String> {
        let mut visited = HashSet::from([source.to_string()]);
        let mut queue = VecDeque::from([source.to_string()]);

        while let Some(node) = queue.pop_front() {
            for next in self.out_links.get(&node).into_iter().flatten() {
                if visited.insert(next.clone()) {
                    queue.push_back(next.clone());
                }
            }
        }

        visited
    }
}

#[async_trait]
impl NeighborOracle for StaticGraph {
    async fn forward_neighbors(&self, node: &str) -> Result<Vec<String>> {
        Ok(self.out_links.get(node).cloned().unwrap_or_default())
    }

    async fn backward_neighbors(&self, node: &str) -> Result<Vec<String>> {
        Ok(self.in_links.get(node).cloned().unwrap_or_default())
    }
}
