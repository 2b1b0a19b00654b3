//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `VisitedRegistry`: the shared set of URLs already dispatched for fetching

mod visited;

pub use visited::VisitedRegistry;
