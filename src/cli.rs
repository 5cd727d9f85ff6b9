// src/cli.rs
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};

use crate::config::consts::{DEFAULT_IMAGES_DIR, DEFAULT_OUT_FILE, ELEMENTS_URL, MAX_ITERATIONS};
use crate::config::options::{AppOptions, PageSource};
use crate::progress::Progress;
use crate::runner::{self, RunSummary};

#[derive(Parser, Debug)]
#[command(name = "alchemy_scrape")]
#[command(about = "Scrape the Little Alchemy 2 element table into JSON, with recipe tiers")]
#[command(version)]
pub struct Args {
    /// Element list page to scrape
    #[arg(long, env = "ALCHEMY_URL", default_value = ELEMENTS_URL)]
    pub url: String,

    /// Parse a saved copy of the page instead of fetching (overrides --url)
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output JSON file (a directory gets elements.json)
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_OUT_FILE)]
    pub out: PathBuf,

    /// Where icons are cached
    #[arg(long, value_name = "DIR", default_value = DEFAULT_IMAGES_DIR)]
    pub images_dir: PathBuf,

    /// Skip icon downloads entirely
    #[arg(long)]
    pub no_images: bool,

    /// Pause between icon downloads, in milliseconds
    #[arg(long, value_name = "MS")]
    pub pause_ms: Option<u64>,

    /// Tier passes before unresolved elements are forced to tier 1
    #[arg(long, default_value_t = MAX_ITERATIONS)]
    pub max_iterations: usize,

    /// Single-line JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,

    /// More logging (-v debug, -vv trace + .store/debug.log)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Also log to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn to_options(&self) -> AppOptions {
        let mut opts = AppOptions::default();

        opts.scrape.source = match &self.input {
            Some(path) => PageSource::File(path.clone()),
            None => PageSource::Url(self.url.clone()),
        };

        opts.images.enabled = !self.no_images;
        opts.images.dir = self.images_dir.clone();
        if let Some(ms) = self.pause_ms {
            opts.images.pause = Duration::from_millis(ms);
        }

        opts.resolve.max_iterations = self.max_iterations;

        opts.export.out_path = self.out.clone();
        opts.export.pretty = !self.compact;
        opts
    }

    fn log_path(&self) -> Option<PathBuf> {
        match (&self.log_file, self.verbose) {
            (Some(p), _) => Some(p.clone()),
            (None, v) if v >= 2 => Some(crate::log::default_log_path()),
            _ => None,
        }
    }
}

/// Logs icon progress every `step` items so a full run isn't hundreds of lines.
struct CliProgress {
    total: usize,
    seen: usize,
    step: usize,
}

impl CliProgress {
    fn new() -> Self {
        Self { total: 0, seen: 0, step: 50 }
    }

    fn tick(&mut self) {
        self.seen += 1;
        if self.seen % self.step == 0 || self.seen == self.total {
            tracing::info!("images {}/{}", self.seen, self.total);
        }
    }
}

impl Progress for CliProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        tracing::info!("caching {total} element images");
    }
    fn log(&mut self, msg: &str) {
        tracing::info!("{msg}");
    }
    fn item_done(&mut self, _name: &str) {
        self.tick();
    }
    fn item_failed(&mut self, _name: &str, _err: &str) {
        self.tick();
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    crate::log::init(args.verbose, args.log_path().as_deref()).map_err(|e| eyre!(e))?;

    let opts = args.to_options();
    let mut progress = CliProgress::new();
    let summary = runner::run(&opts, Some(&mut progress))?;

    print_summary(&summary, &opts);
    Ok(())
}

fn print_summary(summary: &RunSummary, opts: &AppOptions) {
    println!(
        "Scraped {} elements ({} base, max tier {}) and saved to {}",
        summary.elements,
        summary.base_elements,
        summary.max_tier,
        summary.out_path.display()
    );
    if opts.images.enabled {
        println!(
            "Images in '{}': {} downloaded, {} already cached, {} failed",
            opts.images.dir.display(),
            summary.images.downloaded,
            summary.images.cached,
            summary.images.failed
        );
    }
    if !summary.fallbacks.is_empty() {
        println!("{} element(s) forced to tier 1:", summary.fallbacks.len());
        for d in &summary.fallbacks {
            println!("  {d}");
        }
    }

    if let Ok(records) = crate::export::load(&summary.out_path) {
        if let Some(first) = records.first() {
            if let Ok(sample) = serde_json::to_string_pretty(first) {
                println!("\nSample element format:\n{sample}");
            }
        }
    }
}
