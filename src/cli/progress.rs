//! CLI-specific progress handling for wikipath
//!
//! Shows a spinner with the number of expanded articles while a search runs.

use std::sync::atomic::{AtomicUsize, Ordering};

use indicatif::{ProgressBar, ProgressStyle};
use wikipath::{Direction, ProgressObserver};

/// Creates a spinner for CLI display
pub fn create_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} expanded  {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    pb
}

/// Progress observer driving the CLI spinner
pub struct ProgressManager {
    pub pb: ProgressBar,
    log_expansions: bool,
    forward: AtomicUsize,
    backward: AtomicUsize,
}

impl ProgressManager {
    /// Create a new progress manager; `log_expansions` prints one line per expansion
    pub fn new(log_expansions: bool) -> Self {
        Self::with_bar(create_spinner(), log_expansions)
    }

    pub fn with_bar(pb: ProgressBar, log_expansions: bool) -> Self {
        Self {
            pb,
            log_expansions,
            forward: AtomicUsize::new(0),
            backward: AtomicUsize::new(0),
        }
    }

    /// Expansions seen so far as (forward, backward)
    pub fn counts(&self) -> (usize, usize) {
        (
            self.forward.load(Ordering::Relaxed),
            self.backward.load(Ordering::Relaxed),
        )
    }
}

/// One line per expansion, e.g. `[FORWARD SEARCH PROGRESS] Expanding "Funk".`
pub fn expansion_line(direction: Direction, node: &str) -> String {
    format!(
        "[{} SEARCH PROGRESS] Expanding \"{}\".",
        direction.to_string().to_uppercase(),
        node
    )
}

impl ProgressObserver for ProgressManager {
    fn on_begin_search(&self, source: &str, target: &str) {
        self.pb
            .set_message(format!("searching \"{}\" -> \"{}\"", source, target));
    }

    fn on_expand(&self, direction: Direction, node: &str) {
        match direction {
            Direction::Forward => self.forward.fetch_add(1, Ordering::Relaxed),
            Direction::Backward => self.backward.fetch_add(1, Ordering::Relaxed),
        };
        self.pb.inc(1);
        self.pb.set_message(format!("{}: {}", direction, node));

        if self.log_expansions {
            self.pb.println(expansion_line(direction, node));
        }
    }

    fn on_path_found(&self, _path: &[String]) {
        self.pb.finish_and_clear();
    }

    fn on_unreachable(&self, _source: &str, _target: &str) {
        self.pb.finish_and_clear();
    }
}
