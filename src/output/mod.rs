//! Output module for crawl results
//!
//! This module handles:
//! - The `Reporter` sink receiving per-page results
//! - Console and in-memory reporters
//! - Run statistics and the end-of-run summary

mod console;
mod memory;
pub mod stats;
mod traits;

pub use console::ConsoleReporter;
pub use memory::MemoryReporter;
pub use stats::{print_summary, CrawlStats, CrawlSummary};
pub use traits::{Report, Reporter};
