// src/progress.rs
/// Lightweight progress reporting for a crawl run.
/// Frontends implement this to surface status to users; every method has a
/// no-op default so a sink only overrides what it shows.
pub trait Progress {
    /// Called at the start with the number of cities to process.
    fn begin(&mut self, _total_cities: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// A city is about to be searched. `index` counts from 0.
    fn city_started(&mut self, _index: usize, _city: &str) {}

    /// One pizzeria's detail page was handled (`locations` after extraction,
    /// `None` when the page could not be read).
    fn pizzeria_done(&mut self, _index: usize, _total: usize, _name: &str, _locations: Option<usize>) {}

    /// A city finished and was marked scraped.
    fn city_done(&mut self, _city: &str, _pizzerias: usize, _locations: usize) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
