//! State module for the crawl run
//!
//! # Components
//!
//! - `Frontier`: the shared work queue plus the set of dispatched URLs
//! - `Page`: the immutable record produced for each analyzed page

mod frontier;
mod page;

// Re-export main types
pub use frontier::{Frontier, Lease, TryNext};
pub use page::{KeyWord, Page};
