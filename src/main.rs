//! # Wikipath CLI
//!
//! Command-line interface for the wikipath library.
//! Prints a shortest chain of links between two Wikipedia articles.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::error;
use wikipath::{
    resolve_pair, ArticleRef, PathFinder, SearchOptions, SearchReport, WikiConfig, WikipediaOracle,
};

mod cli;

/// Command-line interface for wikipath
#[derive(Parser, Debug)]
#[command(name = "wikipath")]
#[command(about = "Shortest link paths between Wikipedia articles")]
#[command(long_about = "Searches the shortest chain of links between two Wikipedia articles:
  wikipath https://en.wikipedia.org/wiki/Funk https://en.wikipedia.org/wiki/Disc_jockey
  wikipath --threads 8 Funk \"Disc jockey\"        # Bare titles on English Wikipedia
  wikipath --language fi Fankki Suomi               # Bare titles on another wiki

Both articles must belong to the same language edition.")]
#[command(version = env!("WIKIPATH_VERSION"))]
struct Cli {
    /// Article to start from (URL or bare title)
    source: String,

    /// Article to reach (URL or bare title)
    target: String,

    /// Workers per search direction
    #[arg(short, long, default_value_t = 1)]
    threads: usize,

    /// Number of waits before a direction is declared exhausted
    #[arg(long, default_value_t = wikipath::DEFAULT_DEQUEUE_TRIALS)]
    trials: u32,

    /// Length of each of those waits, in milliseconds
    #[arg(short, long, default_value_t = 10)]
    wait: u64,

    /// Print every expanded article
    #[arg(short, long)]
    log: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Language edition used for bare titles
    #[arg(long, default_value = "en")]
    language: String,

    /// API result pages fetched per article
    #[arg(long, default_value_t = wikipath::DEFAULT_MAX_LINK_PAGES)]
    max_link_pages: usize,

    /// Show the resolved articles and API endpoint without searching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("❌ Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging to stderr
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();

    if cli.verbose {
        eprintln!("🔎 Wikipath v{} starting...", env!("WIKIPATH_VERSION"));
    }

    let (source, target) = resolve_pair(&cli.source, &cli.target, &cli.language)
        .context("could not resolve the requested articles")?;

    let config = WikiConfig {
        max_link_pages: cli.max_link_pages,
        ..WikiConfig::for_article(&source)
    };

    if cli.dry_run {
        eprintln!("🔍 [DRY RUN] Would search:");
        eprintln!("  from: {}", source.url());
        eprintln!("  to:   {}", target.url());
        eprintln!("  api:  {}", config.api_url);
        eprintln!("  workers per direction: {}", cli.threads.max(1));
        return Ok(());
    }

    let progress = Arc::new(cli::ProgressManager::new(cli.log));
    let options = SearchOptions::default()
        .with_threads(cli.threads)
        .with_pacing(cli.trials, Duration::from_millis(cli.wait))
        .with_observer(progress.clone());

    let report = PathFinder::new(WikipediaOracle::new(config))
        .search(source.title(), target.title(), &options)
        .await
        .with_context(|| {
            format!(
                "search from \"{}\" to \"{}\" failed",
                source.title(),
                target.title()
            )
        })?;

    progress.pb.finish_and_clear();
    if cli.verbose {
        let (forward, backward) = progress.counts();
        eprintln!("📈 Observed {forward} forward and {backward} backward expansions");
    }

    print_report(&source, &target, &report);
    Ok(())
}

/// Numbered article URLs on stdout, statistics on stderr
fn print_report(source: &ArticleRef, target: &ArticleRef, report: &SearchReport) {
    if report.is_found() {
        for line in render_path(source, &report.path) {
            println!("{line}");
        }
    } else {
        eprintln!(
            "🚫 No path from \"{}\" to \"{}\"",
            source.title(),
            target.title()
        );
    }

    match report.hops() {
        Some(hops) => eprintln!("Path length: {hops}"),
        None => eprintln!("Path length: none"),
    }
    eprintln!(
        "Expanded: {} ({} forward, {} backward)",
        report.expanded, report.forward_expanded, report.backward_expanded
    );
    eprintln!("Duration: {:.2?}", report.elapsed);
}

fn render_path(wiki: &ArticleRef, path: &[String]) -> Vec<String> {
    let width = path.len().to_string().len();
    path.iter()
        .enumerate()
        .map(|(i, title)| format!("{:>width$}: {}", i + 1, wiki.article_url(title)))
        .collect()
}
