//! Photomania - browse a paginated photo feed from the terminal
#![allow(clippy::uninlined_format_args)]

use std::ops::Range;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use photomania::config::CONSUMER_KEY_ENV;
use photomania::{
    Config, FetchError, FiveHundredPxClient, HttpImageClient, ImageCache, PhotoBrowser,
    PhotoDetail, PhotoViewer, RenderObserver, SlotContent, ViewerObserver,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (RUST_LOG=debug for verbose output)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match parse_args()? {
        Command::Feed { pages } => feed_cli(pages).await,
        Command::Photo { id } => photo_cli(id).await,
        Command::Comments { id } => comments_cli(id).await,
        Command::SetKey { key } => set_key_cli(&key),
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Version => {
            println!("photomania {}", photomania::VERSION);
            Ok(())
        }
    }
}

/// CLI commands
enum Command {
    Feed { pages: u32 },
    Photo { id: u64 },
    Comments { id: u64 },
    SetKey { key: String },
    Help,
    Version,
}

fn parse_args() -> Result<Command> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() == 1 {
        return Ok(Command::Help);
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help),
        "-v" | "--version" | "version" => Ok(Command::Version),

        "feed" => {
            let pages = args
                .iter()
                .position(|a| a == "--pages" || a == "-p")
                .and_then(|i| args.get(i + 1))
                .map(|s| s.parse::<u32>())
                .transpose()
                .context("--pages expects a number")?
                .unwrap_or(1)
                .max(1);
            Ok(Command::Feed { pages })
        }

        "photo" | "comments" => {
            let id = args
                .get(2)
                .ok_or_else(|| anyhow::anyhow!("Missing photo id"))?
                .parse()
                .context("Photo id must be a number")?;
            if args[1] == "photo" {
                Ok(Command::Photo { id })
            } else {
                Ok(Command::Comments { id })
            }
        }

        "key" => {
            let key = args
                .get(2)
                .ok_or_else(|| anyhow::anyhow!("Missing consumer key"))?;
            Ok(Command::SetKey { key: key.clone() })
        }

        other => Err(anyhow::anyhow!(
            "Unknown command: {other}\nRun 'photomania --help' for usage"
        )),
    }
}

fn print_help() {
    let config_path = Config::default_path()
        .map_or_else(|_| "Unknown".to_string(), |p| p.display().to_string());

    println!(
        r#"Photomania {} - browse a paginated photo feed

USAGE:
    photomania <COMMAND>

COMMANDS:
    feed [--pages N]        List the first N pages of the feed (default 1)
    photo <id>              Show details for one photo
    comments <id>           Show the comments on a photo
    key <consumer-key>      Store the API consumer key in the config file
    help                    Show this help
    version                 Show the version

CONFIG:
    {}
    The consumer key can also be set with {}.
    Set RUST_LOG=debug for verbose logging."#,
        photomania::VERSION,
        config_path,
        CONSUMER_KEY_ENV
    );
}

fn load_config() -> Result<Config> {
    let config = Config::load()?;
    if config.consumer_key.is_empty() {
        anyhow::bail!(
            "No consumer key configured. Set consumer_key in {} or {}",
            Config::default_path()?.display(),
            CONSUMER_KEY_ENV
        );
    }
    Ok(config)
}

fn set_key_cli(key: &str) -> Result<()> {
    let path = Config::default_path()?;
    let mut config = Config::load_from(&path)?;
    config.set_consumer_key(key)?;
    config.save()?;
    println!("✓ Consumer key saved to {}", path.display());
    Ok(())
}

/// Prints newly inserted photos as they arrive
#[derive(Default)]
struct FeedPrinter {
    pending: Vec<Range<usize>>,
}

impl RenderObserver for FeedPrinter {
    fn on_items_inserted(&mut self, range: Range<usize>) {
        self.pending.push(range);
    }
}

async fn feed_cli(pages: u32) -> Result<()> {
    let config = load_config()?;
    let feed = Arc::new(FiveHundredPxClient::from_config(&config));
    let images = Arc::new(HttpImageClient::new(config.request_timeout()));
    let mut browser = PhotoBrowser::new(feed, images, ImageCache::new(config.image_cache_capacity))
        .with_scroll_threshold(config.scroll_threshold());
    let mut printer = FeedPrinter::default();

    let mut attempts = 0;
    while browser.pager().current_page() <= pages {
        if attempts > pages * 2 {
            anyhow::bail!("Giving up after {attempts} failed page requests");
        }
        let page = browser.pager().current_page();
        browser.on_scroll_threshold_reached();
        while browser.pager().is_fetching() {
            browser.wait(&mut printer).await;
        }

        for range in printer.pending.drain(..) {
            for index in range {
                if let Some(photo) = browser.photos().get(index) {
                    println!("{:>5}  {:>10}  {}", index, photo.id(), photo.url());
                }
            }
        }
        if browser.pager().current_page() == page {
            attempts += 1;
            tracing::warn!("Page {page} failed, retrying");
        }
    }

    println!("{} photos", browser.photos().len());
    Ok(())
}

/// Collects viewer callbacks for printing
#[derive(Default)]
struct ViewerPrinter {
    error: Option<String>,
    comments: Option<usize>,
}

impl ViewerObserver for ViewerPrinter {
    fn on_comments_loaded(&mut self, count: usize) {
        self.comments = Some(count);
    }

    fn on_error(&mut self, error: &FetchError) {
        self.error = Some(error.to_string());
    }
}

fn print_detail(detail: &PhotoDetail) {
    println!("{} (#{})", detail.name, detail.id);
    if !detail.user.fullname.is_empty() {
        println!("by {}", detail.user.fullname);
    }
    println!(
        "{} votes · {} favorites · {} comments",
        detail.votes_count, detail.favorites_count, detail.comments_count
    );
    println!("{}", detail.url);
}

async fn photo_cli(id: u64) -> Result<()> {
    let config = load_config()?;
    let details = Arc::new(FiveHundredPxClient::from_config(&config));
    let images = Arc::new(HttpImageClient::new(config.request_timeout()));
    let mut viewer = PhotoViewer::new(details, images, ImageCache::new(4));
    let mut printer = ViewerPrinter::default();

    viewer.open(id);
    while viewer.has_pending_work() {
        viewer.wait(&mut printer).await;
    }

    if let Some(error) = printer.error {
        anyhow::bail!("Could not load photo {id}: {error}");
    }
    if let Some(detail) = viewer.detail() {
        print_detail(detail);
    }
    match viewer.image() {
        SlotContent::Image(image) => println!("image: {}x{}", image.width(), image.height()),
        SlotContent::Failed => println!("image: unavailable"),
        SlotContent::Blank => {}
    }
    Ok(())
}

async fn comments_cli(id: u64) -> Result<()> {
    let config = load_config()?;
    let details = Arc::new(FiveHundredPxClient::from_config(&config));
    let images = Arc::new(HttpImageClient::new(config.request_timeout()));
    let mut viewer = PhotoViewer::new(details, images, ImageCache::new(64));
    let mut printer = ViewerPrinter::default();

    viewer.open(id);
    viewer.show_comments();
    while viewer.has_pending_work() {
        viewer.wait(&mut printer).await;
    }

    if let Some(error) = printer.error {
        anyhow::bail!("Could not load comments for {id}: {error}");
    }

    let comments = viewer.comments().unwrap_or_default();
    println!("{} comments", printer.comments.unwrap_or(comments.len()));
    for (row, comment) in comments.iter().enumerate() {
        let avatar = match viewer.avatar(row) {
            Some(SlotContent::Image(_)) => "◼",
            _ => " ",
        };
        println!(
            "{} {} [{}]: {}",
            avatar,
            comment.author(),
            comment.relative_time(),
            comment.body
        );
    }
    Ok(())
}
