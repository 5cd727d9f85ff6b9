// src/specs/mod.rs
//! # Scraping "specs" module
//!
//! Page-specific scraping specifications. A spec knows *where the ground truth lives in
//! the HTML* and *how to extract it robustly*; it returns plain records and nothing else.
//!
//! ## What lives here
//! - **Pure HTML parsing** of the wiki element list (`elements`).
//! - **Selector choice & precedence** (e.g. `data-src` over lazy-load `src`, link titles
//!   over link text, link text over bare cell text).
//! - **Tolerant extraction** using `core::html` helpers (case-insensitive, depth-matched
//!   tag blocks, attribute lookup, entity/whitespace normalization).
//!
//! ## What does **not** live here
//! - **Networking** (`core::net`) and **icon caching** (`images`).
//! - **Graph building**: merging repeated rows and inserting placeholder ingredients is
//!   `graph::EntityGraph::from_raw`.
//! - **Tiers and export** (`tier`, `export`).
//!
//! ## Typical call chain
//! ```text
//! runner → core::net::HttpClient::fetch_page → specs::elements::parse_document
//!        → graph::EntityGraph::from_raw → images → tier::resolve → export::write
//! ```
//!
//! ## Testing notes
//! - Specs are testable **offline** against saved HTML (see `tests/fixtures/`).
//! - Keep selectors resilient to whitespace, attribute order, and harmless markup noise.
pub mod elements;
