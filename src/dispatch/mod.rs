// src/dispatch/mod.rs
// =============================================================================
// Dispatch: taking admitted jobs off the queue and launching the crawler.
//
// - job: the Job type and its one-shot launch outcome signal
// - worker: the fixed-size worker pool that performs the launches
// =============================================================================

mod job;
mod worker;

pub use job::{CompletionReceiver, Job, LaunchOutcome};
pub use worker::Dispatcher;
