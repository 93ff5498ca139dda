//! streamvista - browse and watch the video catalog from your terminal
//!
//! Thin front end over the catalog store: listing, trending, search,
//! watch history.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use streamvista::core::source::ConfiguredSource;
use streamvista::storage::config;
use streamvista::storage::history::NAMESPACE;
use streamvista::storage::kv::FileStore;
use streamvista::types::{SearchFilters, Video};
use streamvista::utils::format::{format_date, format_views};
use streamvista::utils::paths::AppDirs;
use streamvista::{CatalogStore, StreamVistaError};

/// Browse and watch the streamvista catalog
#[derive(Parser, Debug)]
#[command(name = "streamvista")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Skip the simulated network latency
    #[arg(long)]
    no_delay: bool,

    /// Edit the configuration file
    #[arg(short, long)]
    edit: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the whole catalog
    List,
    /// Most viewed videos (default)
    Trending,
    /// A random selection of videos
    Recommended,
    /// Search titles, descriptions and tags
    Search {
        /// Search query
        #[arg(trailing_var_arg = true)]
        query: Vec<String>,

        /// Only show videos of this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List the categories of the catalog
    Categories,
    /// Show your watch history
    History,
    /// Forget your watch history
    ClearHistory,
    /// Open a video: record it in history and show related videos
    Watch {
        /// Video ID
        id: String,
    },
}

/// Format video for display in a list
fn format_video_label(video: &Video) -> String {
    format!(
        "{} {} {} - {} • {} views • {}",
        format!("{:>4}", video.id).dimmed(),
        video.title,
        format!("[{}]", video.duration).dimmed(),
        video.channel.name.cyan(),
        format_views(video.views),
        format_date(&video.upload_date)
    )
}

fn print_videos(title: &str, videos: &[Video]) {
    println!("{}", title.bold());
    if videos.is_empty() {
        println!("{}", "No videos found.".yellow());
        return;
    }
    for video in videos {
        println!("  {}", format_video_label(video));
    }
}

fn print_video_details(video: &Video) {
    println!("{}", video.title.bold());
    println!(
        "{} ({} subscribers)",
        video.channel.name.cyan(),
        video.channel.subscribers
    );
    println!(
        "{} views • {} • {} • {}",
        format_views(video.views),
        format_date(&video.upload_date),
        video.duration,
        video.category.magenta()
    );
    if !video.tags.is_empty() {
        let tags: Vec<String> = video.tags.iter().map(|t| format!("#{}", t)).collect();
        println!("{}", tags.join(" ").blue());
    }
    println!();
    println!("{}", video.description);
    println!("{} {}", "Watch:".green(), video.video_url);
}

/// Show a spinner while `fut` runs
async fn with_spinner<T>(message: &str, fut: impl Future<Output = T>) -> T {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = fut.await;
    spinner.finish_and_clear();
    result
}

fn report(error: &StreamVistaError) {
    eprintln!("{} {}", "Error:".red(), error);
    if error.is_retryable() {
        eprintln!("{}", "Please try again.".dimmed());
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let dirs = AppDirs::from_env();
    dirs.ensure().await?;

    // Handle --edit flag; a broken file can still be opened for repair
    if cli.edit {
        let editor = config::load_config(&dirs)
            .await
            .map(|cfg| cfg.editor)
            .unwrap_or_default();
        config::edit_config(&dirs.config_file(), &editor).await?;
        println!("{}", "Configuration updated.".green());
        return Ok(());
    }

    // Load config
    let mut cfg = config::load_config(&dirs).await?;
    if cli.no_delay {
        cfg.fetch_latency_ms = 0;
        cfg.search_latency_ms = 0;
    }

    let source = ConfiguredSource::from_config(&cfg)?;
    let storage = Arc::new(FileStore::new(dirs.data_dir(), NAMESPACE));
    let store = CatalogStore::new(source, storage, cfg);

    let result = match cli.command.unwrap_or(Command::Trending) {
        Command::List => with_spinner("Loading videos...", store.fetch_all())
            .await
            .map(|videos| print_videos("All videos", &videos)),

        Command::Trending => with_spinner("Loading trending...", store.fetch_trending())
            .await
            .map(|videos| print_videos("Trending", &videos)),

        Command::Recommended => with_spinner("Picking videos...", store.fetch_recommended())
            .await
            .map(|videos| print_videos("Recommended", &videos)),

        Command::Search { query, category } => {
            let query = query.join(" ");
            let filters = SearchFilters { category };
            let title = match (&query, &filters.category) {
                (q, Some(c)) if !q.is_empty() => format!("Search results for \"{}\" in {}", q, c),
                (_, Some(c)) => format!("{} videos", c),
                (q, None) if !q.is_empty() => format!("Search results for \"{}\"", q),
                _ => "Browse videos".to_string(),
            };
            with_spinner("Searching...", store.search(&query, &filters))
                .await
                .map(|videos| print_videos(&title, &videos))
        }

        Command::Categories => store.categories().await.map(|categories| {
            println!("{}", "Categories".bold());
            for category in categories {
                println!("  {}", category);
            }
        }),

        Command::History => with_spinner("Loading history...", store.history_videos())
            .await
            .map(|videos| print_videos("Watch history", &videos)),

        Command::ClearHistory => {
            store.clear_history();
            println!("{}", "Watch history cleared.".green());
            Ok(())
        }

        Command::Watch { id } => match with_spinner("Loading video...", store.video(&id)).await {
            Ok(video) => {
                store.add_to_history(&video.id);
                print_video_details(&video);
                println!();
                store
                    .related(&video.id)
                    .await
                    .map(|related| print_videos("Related", &related))
            }
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        report(&e);
    }

    if let Some(e) = store.last_persistence_error() {
        eprintln!("{} {}", "Warning: history not saved:".yellow(), e);
    }

    Ok(())
}
