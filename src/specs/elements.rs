// src/specs/elements.rs
//! Scraping *spec* for the element table.
//!
//! Purpose:
//! - Parse the **remote HTML** of the wiki's element list and extract one record per row:
//!   element name, icon URL, and the recipes (ingredient lists) that produce it.
//! - Rows live in `<table class="list-table">`; the first row of each table is the header.
//! - Cell 1 holds the element (`span.icon-hover` with an `<img>` and a titled `<a>`).
//! - Cell 2 holds a `<ul>`, one `<li>` per recipe, ingredients as titled `<a>` links.
//!
//! Non-Responsibilities:
//! - **No graph building**: names are normalized here, but merging and placeholders are
//!   `graph::EntityGraph`'s job.
//! - **No downloads.** Icon URLs are returned as found (query string stripped).

use crate::core::html::{self, attr, block_ranges, blocks, has_class, open_tag, open_tags, strip_tags};
use crate::core::sanitize::normalize_name;
use crate::config::consts::TABLE_CLASS;
use crate::error::{Result, ScrapeError};

/// One table row, as scraped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawElement {
    pub name: String,
    pub image_url: Option<String>,
    pub recipes: Vec<Vec<String>>,
}

/// Parse every `list-table` in the document, at any nesting depth.
/// A page without one is an error; a table with no usable rows is not.
pub fn parse_document(doc: &str) -> Result<Vec<RawElement>> {
    let ranges = block_ranges(doc, "table");
    let mut tables: Vec<&str> = Vec::new();
    // end of the last table taken; anything starting before it is nested inside
    let mut taken_to = 0usize;
    for &(start, end) in &ranges {
        if start < taken_to {
            continue;
        }
        let table = &doc[start..end];
        if has_class(open_tag(table), TABLE_CLASS) {
            tables.push(table);
            taken_to = end;
        }
    }

    tracing::debug!(total = ranges.len(), list_tables = tables.len(), "tables found");

    if tables.is_empty() {
        return Err(ScrapeError::TableNotFound);
    }

    let mut out = Vec::new();
    for table in tables {
        // first row is the header
        for (row_idx, tr) in blocks(table, "tr").skip(1).enumerate() {
            match parse_row(tr) {
                Some(el) => {
                    if row_idx < 3 {
                        tracing::trace!(name = %el.name, recipes = el.recipes.len(), "sample row");
                    }
                    out.push(el);
                }
                None => tracing::trace!(row_idx, "row skipped"),
            }
        }
    }
    Ok(out)
}

fn parse_row(tr: &str) -> Option<RawElement> {
    let cells: Vec<&str> = blocks(tr, "td").collect();
    if cells.len() < 2 {
        return None;
    }

    let first = cells[0];
    let name = element_name(first)?;
    let image_url = image_url(first);
    let recipes = blocks(cells[1], "li").filter_map(parse_recipe).collect();

    Some(RawElement { name, image_url, recipes })
}

fn icon_spans(cell: &str) -> Vec<&str> {
    blocks(cell, "span")
        .filter(|s| has_class(open_tag(s), "icon-hover"))
        .collect()
}

/// Title of the last link in the icon span, else the last link in the cell, else the cell text.
fn element_name(cell: &str) -> Option<String> {
    let from_spans = icon_spans(cell)
        .into_iter()
        .flat_map(|s| blocks(s, "a"))
        .filter_map(anchor_name)
        .last();

    let name = from_spans
        .or_else(|| blocks(cell, "a").filter_map(anchor_name).last())
        .unwrap_or_else(|| strip_tags(cell));

    if name.is_empty() { None } else { Some(name) }
}

fn anchor_name(a: &str) -> Option<String> {
    let title = attr(open_tag(a), "title").map(|t| normalize_name(&t)).unwrap_or_default();
    if !title.is_empty() {
        return Some(title);
    }
    let text = strip_tags(html::inner_after_open_tag(a));
    if text.is_empty() || text == "+" { None } else { Some(text) }
}

/// Last usable `<img>` in the icon span (or the cell). Lazy-load placeholders are skipped.
fn image_url(cell: &str) -> Option<String> {
    let spans = icon_spans(cell);
    let imgs: Vec<&str> = if spans.is_empty() {
        open_tags(cell, "img")
    } else {
        spans.into_iter().flat_map(|s| open_tags(s, "img")).collect()
    };

    imgs.into_iter()
        .filter_map(|img| {
            ["data-src", "src"]
                .into_iter()
                .filter_map(|a| attr(img, a))
                .map(|v| v.trim().to_string())
                .find(|v| !v.is_empty() && !v.starts_with("data:"))
        })
        .map(|u| clean_image_url(&u))
        .last()
}

/// Drop the query string (`?cb=…` cache busters).
pub fn clean_image_url(url: &str) -> String {
    match url.split_once('?') {
        Some((base, _)) => base.to_string(),
        None => url.to_string(),
    }
}

/// One `<li>`: linked ingredients, or `A + B` text when there are no links.
fn parse_recipe(li: &str) -> Option<Vec<String>> {
    let mut ingredients: Vec<String> = blocks(li, "a").filter_map(anchor_name).collect();

    if ingredients.is_empty() {
        ingredients = strip_tags(li)
            .split('+')
            .map(normalize_name)
            .filter(|p| !p.is_empty())
            .collect();
    }

    if ingredients.len() >= 2 { Some(ingredients) } else { None }
}
