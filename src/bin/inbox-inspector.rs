//! inbox-inspector command line
//!
//! Loads a webmail page (HTML file, JSON snapshot or live URL), clicks every
//! element matching `--target` and prints the contacts of the clicked rows.

use anyhow::{Context, bail};
use clap::{ArgGroup, Parser};
use inbox_inspector::dom::{DocumentFormat, read_document};
use inbox_inspector::page::LineSink;
use inbox_inspector::utils::normalize_url;
use inbox_inspector::{
    BrowserSession, ClickListener, ConsoleSink, DomTree, LaunchOptions, Page, RowExtractor, RowMarkers, StdoutSink,
};
use std::path::PathBuf;
use std::rc::Rc;

#[derive(Parser)]
#[command(name = "inbox-inspector")]
#[command(version)]
#[command(about = "Print sender and recipients of clicked webmail rows", long_about = None)]
#[command(group(ArgGroup::new("source").required(true).args(["html", "snapshot", "url"])))]
struct Cli {
    /// HTML file of the webmail page
    #[arg(long, value_name = "FILE")]
    html: Option<PathBuf>,

    /// JSON DOM snapshot of the webmail page
    #[arg(long, value_name = "FILE")]
    snapshot: Option<PathBuf>,

    /// Capture the page live from Chrome
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Selector of the element(s) to click
    #[arg(long, short = 't', value_name = "SELECTOR")]
    target: String,

    /// JSON file overriding the row, sender and recipient selectors
    #[arg(long, value_name = "FILE")]
    markers: Option<PathBuf>,

    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H')]
    headed: bool,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH")]
    chrome_path: Option<PathBuf>,

    /// Persistent browser profile directory
    #[arg(long, value_name = "DIR")]
    user_data_dir: Option<PathBuf>,

    /// Print extracted rows as JSON instead of console lines
    #[arg(long)]
    json: bool,

    /// Write the loaded document as a JSON snapshot
    #[arg(long, value_name = "FILE")]
    dump_snapshot: Option<PathBuf>,

    /// Verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let markers = match &cli.markers {
        Some(path) => RowMarkers::load(path)?,
        None => RowMarkers::default(),
    };
    let extractor = RowExtractor::new(&markers).context("Invalid row markers")?;

    let document = load_document(&cli)?;
    log::info!("Loaded document with {} elements", document.count_elements());

    if let Some(path) = &cli.dump_snapshot {
        std::fs::write(path, document.to_json()?)
            .with_context(|| format!("Failed to write snapshot to {}", path.display()))?;
        log::info!("Wrote snapshot to {}", path.display());
    }

    // In JSON mode console lines go to the log so stdout stays parseable
    let sink: Rc<dyn LineSink> = if cli.json { Rc::new(ConsoleSink) } else { Rc::new(StdoutSink) };

    let mut page = Page::new(document);
    // One run clicks a bounded set of targets and prints every row
    let listener = ClickListener::attach_with_history(&mut page, extractor, sink, usize::MAX);

    let clicked = page
        .click(&cli.target)
        .with_context(|| format!("Failed to click '{}'", cli.target))?;
    log::debug!("Dispatched {} click(s)", clicked);

    let rows = listener.take_rows();
    if rows.is_empty() {
        log::warn!("No clicked element is inside a row matching {}", markers.list_item);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    }

    listener.detach(&mut page);
    Ok(())
}

fn load_document(cli: &Cli) -> anyhow::Result<DomTree> {
    let file = match (&cli.html, &cli.snapshot) {
        (Some(path), _) => Some((path, DocumentFormat::Html)),
        (None, Some(path)) => Some((path, DocumentFormat::Json)),
        (None, None) => None,
    };
    if let Some((path, format)) = file {
        return read_document(path, format).with_context(|| format!("Failed to load {}", path.display()));
    }

    if let Some(url) = &cli.url {
        let mut options = LaunchOptions::new().headless(!cli.headed);
        if let Some(path) = &cli.chrome_path {
            options = options.chrome_path(path);
        }
        if let Some(dir) = &cli.user_data_dir {
            options = options.user_data_dir(dir);
        }

        eprintln!("Browser mode: {}", if options.headless { "headless" } else { "headed" });

        let session = BrowserSession::launch(options)?;
        session.navigate(&normalize_url(url))?;
        let tree = session.snapshot()?;
        session.close()?;
        return Ok(tree);
    }

    bail!("One of --html, --snapshot or --url is required")
}
