// src/crawl/mod.rs
// =============================================================================
// Crawl-side building blocks that don't know about HTTP:
//
// - target: validates a caller's URL into a CrawlTarget
// - invocation: derives the crawler's argument vector from a target
// - queue: the bounded admission queue shared by handlers and workers
// =============================================================================

mod invocation;
mod queue;
mod target;

pub use invocation::CrawlInvocation;
pub use queue::AdmissionQueue;
pub use target::{CrawlTarget, Scheme};
