// src/runner.rs
use std::fs;
use std::path::PathBuf;
use std::thread;

use crate::{
    config::options::{AppOptions, PageSource},
    core::net::{Fetch, HttpClient},
    error::{Result, ScrapeError},
    export,
    graph::EntityGraph,
    images::{CacheOutcome, ImageCache},
    progress::Progress,
    specs,
    tier::{self, Diagnostic},
};

/// Summary of what was produced.
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub elements: usize,
    pub base_elements: usize,
    pub max_tier: u32,
    pub iterations: usize,
    pub fallbacks: Vec<Diagnostic>,
    pub images: ImageStats,
    pub out_path: PathBuf,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImageStats {
    pub cached: usize,
    pub downloaded: usize,
    pub failed: usize,
}

/// Top-level runner: get the page (network or file), then run the pipeline.
/// `progress` can be None (no UI updates) or Some(&mut impl Progress).
pub fn run(opts: &AppOptions, mut progress: Option<&mut dyn Progress>) -> Result<RunSummary> {
    let client = HttpClient::new()?;

    let doc = match &opts.scrape.source {
        PageSource::Url(url) => {
            if let Some(p) = progress.as_deref_mut() {
                p.log(&format!("Fetching {url}"));
            }
            tracing::info!(url = %url, "fetching element page");
            client.fetch_page(url, &opts.scrape.retry)?
        }
        PageSource::File(path) => {
            tracing::info!(path = %path.display(), "reading saved page");
            fs::read_to_string(path).map_err(|e| ScrapeError::io(path, e))?
        }
    };
    tracing::debug!(bytes = doc.len(), "page loaded");

    run_document(&doc, opts, &client, progress)
}

/// Pipeline over an already-loaded page: parse → graph → icons → tiers → export.
pub fn run_document<F: Fetch>(
    doc: &str,
    opts: &AppOptions,
    fetcher: &F,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary> {
    let rows = specs::elements::parse_document(doc)?;
    tracing::info!(rows = rows.len(), "element rows parsed");

    let mut graph = EntityGraph::from_raw(rows);

    let images = if opts.images.enabled {
        cache_images(&mut graph, opts, fetcher, &mut progress)?
    } else {
        ImageStats::default()
    };

    if let Some(p) = progress.as_deref_mut() {
        p.log("Calculating element tiers…");
    }
    let res = tier::resolve(&graph, &opts.resolve);
    res.apply(&mut graph);

    let out_path = export::write(&graph, &opts.export)?;

    Ok(RunSummary {
        elements: graph.len(),
        base_elements: graph.entities().iter().filter(|e| e.is_base()).count(),
        max_tier: res.max_tier(),
        iterations: res.iterations,
        fallbacks: res.diagnostics,
        images,
        out_path,
    })
}

/// Fill `local_image` for every element with an icon URL. Failures are logged, not fatal.
fn cache_images<F: Fetch>(
    graph: &mut EntityGraph,
    opts: &AppOptions,
    fetcher: &F,
    progress: &mut Option<&mut dyn Progress>,
) -> Result<ImageStats> {
    let cache = ImageCache::new(&opts.images.dir, fetcher, opts.images.retry, opts.scrape.referer())?;

    let todo: Vec<(usize, String, String)> = graph
        .iter()
        .filter_map(|(id, e)| e.image_url.clone().map(|u| (id, e.name.clone(), u)))
        .collect();

    if let Some(p) = progress.as_deref_mut() {
        p.begin(todo.len());
    }

    let mut stats = ImageStats::default();
    for (id, name, url) in todo {
        match cache.get(&name, &url) {
            Ok(outcome) => {
                graph.entity_mut(id).local_image = Some(outcome.path().to_string_lossy().into_owned());
                match outcome {
                    CacheOutcome::Hit(_) => stats.cached += 1,
                    CacheOutcome::Downloaded(_) => {
                        stats.downloaded += 1;
                        if !opts.images.pause.is_zero() {
                            thread::sleep(opts.images.pause); // be polite
                        }
                    }
                }
                if let Some(p) = progress.as_deref_mut() {
                    p.item_done(&name);
                }
            }
            Err(e) => {
                stats.failed += 1;
                tracing::warn!(name = %name, url = %url, "error downloading image: {e}");
                if let Some(p) = progress.as_deref_mut() {
                    p.item_failed(&name, &e.to_string());
                }
            }
        }
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    tracing::info!(cached = stats.cached, downloaded = stats.downloaded, failed = stats.failed, "images done");
    Ok(stats)
}
