// src/progress.rs
/// Lightweight progress reporting for the long part of a run (icon downloads).
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the total number of items.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One element's icon is available locally.
    fn item_done(&mut self, _name: &str) {}

    /// One element's icon could not be cached.
    fn item_failed(&mut self, _name: &str, _err: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// Counts what happened; handy in tests and for summaries.
#[derive(Debug, Default)]
pub struct CountingProgress {
    pub total: usize,
    pub done: usize,
    pub failed: Vec<String>,
    pub finished: bool,
}

impl Progress for CountingProgress {
    fn begin(&mut self, total: usize) { self.total = total; }
    fn item_done(&mut self, _name: &str) { self.done += 1; }
    fn item_failed(&mut self, name: &str, _err: &str) { self.failed.push(name.to_string()); }
    fn finish(&mut self) { self.finished = true; }
}
