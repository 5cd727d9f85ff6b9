// src/config/consts.rs

// Source page
pub const ELEMENTS_URL: &str = "https://little-alchemy.fandom.com/wiki/Elements_(Little_Alchemy_2)";
pub const TABLE_CLASS: &str = "list-table";

// Net config
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const IMAGE_ACCEPT: &str = "image/png,image/*,*/*;q=0.8";
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
pub const FALLBACK_IMAGE_ORIGIN: &str = "https://static.wikia.nocookie.net";
pub const TIMEOUT_SECS: u64 = 30;
pub const MAX_REDIRECTS: usize = 10;

// Retries
pub const PAGE_ATTEMPTS: u32 = 3;
pub const IMAGE_ATTEMPTS: u32 = 3;
pub const RETRY_BASE_MS: u64 = 1_000; // attempt n waits n * base

// Image cache
pub const DEFAULT_IMAGES_DIR: &str = "images";
pub const MIN_IMAGE_BYTES: usize = 100;
pub const URL_HASH_LEN: usize = 8;
pub const REQUEST_PAUSE_MS: u64 = 75; // be polite

// Tiers
pub const MAX_ITERATIONS: usize = 100;
pub const BASE_TIER: u32 = 1;

// Export
pub const DEFAULT_OUT_FILE: &str = "elements.json";

// Logging
pub const STORE_DIR: &str = ".store";
pub const DEBUG_LOG_FILE: &str = "debug.log";
