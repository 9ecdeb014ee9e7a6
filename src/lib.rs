//! # Wikipath Library
//!
//! Finds shortest link paths between Wikipedia articles with a parallel
//! bidirectional breadth-first search.
//!
//! ## Features
//!
//! - **Bidirectional search**: outgoing links from the source, backlinks into the target
//! - **Parallel workers**: several tokio tasks expand each frontier concurrently
//! - **Exact distances**: the returned path is a shortest one for any worker count
//! - **Pluggable graphs**: any [`NeighborOracle`] can be searched, not only Wikipedia
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let report = wikipath::find_path(
//!         "https://en.wikipedia.org/wiki/Funk",
//!         "https://en.wikipedia.org/wiki/Disc_jockey",
//!         &wikipath::SearchOptions::default().with_threads(4),
//!     )
//!     .await?;
//!
//!     for title in &report.path {
//!         println!("{}", title);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Searching Your Own Graph
//!
//! ```rust
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use wikipath::{PathFinder, SearchOptions, StaticGraph};
//!
//! let graph = StaticGraph::from_edges([("A", "B"), ("B", "C"), ("A", "D"), ("D", "C")]);
//! let report = PathFinder::new(graph)
//!     .search("A", "C", &SearchOptions::default())
//!     .await?;
//! assert_eq!(report.path.len(), 3);
//! # Ok(())
//! # }
//! ```

// Re-export core types that users might need
pub use crate::core::coordinator::{MeetingCoordinator, SearchPhase};
pub use crate::core::error::{Error, Result};
pub use crate::core::frontier::{Claim, FrontierState, Parent};
pub use crate::core::observer::{LogObserver, ProgressObserver, SilentObserver};
pub use crate::core::options::{
    ObserverHandle, SearchOptions, DEFAULT_DEQUEUE_TRIALS, DEFAULT_TRIAL_WAIT_TIME,
    MIN_THREADS_PER_DIRECTION,
};
pub use crate::core::oracle::{Direction, NeighborOracle, StaticGraph};
pub use crate::core::search::{PathFinder, SearchReport};
pub use crate::core::source::{resolve_pair, ArticleRef};
pub use crate::core::wikipedia::{
    WikiConfig, WikipediaOracle, DEFAULT_API_URL, DEFAULT_MAX_LINK_PAGES,
};

// Internal modules
mod core;

/// Search a shortest path between two Wikipedia articles
///
/// # Arguments
/// * `source_url` - Article URL (or bare title on English Wikipedia) to start from
/// * `target_url` - Article URL (or bare title) to reach
/// * `options` - Worker count, pacing and observer
///
/// Both articles must belong to the same language edition. An empty path in
/// the report means the target cannot be reached.
pub async fn find_path(
    source_url: &str,
    target_url: &str,
    options: &SearchOptions,
) -> Result<SearchReport> {
    let (source, target) = resolve_pair(source_url, target_url, "en")?;
    let oracle = WikipediaOracle::new(WikiConfig::for_article(&source));

    PathFinder::new(oracle)
        .search(source.title(), target.title(), options)
        .await
}
