// src/lib.rs
// =============================================================================
// crawl-gate: admits crawl requests under bounded concurrency and hands them
// to an external crawl executable.
//
// Request flow:
//   HTTP handler (server) -> IntakeGateway (gateway)
//     -> CrawlTarget validation (crawl::target)
//     -> AdmissionQueue (crawl::queue)
//     -> Dispatcher worker (dispatch) -> crawl process
//     -> launch outcome signal -> HTTP response
//
// The per-domain document endpoint (domains) is a separate, sequential path.
// =============================================================================

pub mod cli;
pub mod config;
pub mod crawl;
pub mod dispatch;
pub mod domains;
pub mod error;
pub mod gateway;
pub mod server;
pub mod shutdown;

pub use error::{GateError, Result};
