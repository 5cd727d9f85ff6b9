// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod specs;

pub mod export;
pub mod file;
pub mod graph;
pub mod images;
pub mod progress;
pub mod runner;
pub mod tier;

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "cli")]
pub mod log;

pub use error::{Result, ScrapeError};
pub use graph::EntityGraph;
pub use tier::{resolve, resolve_graph};
