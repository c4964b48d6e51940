// src/dispatch/worker.rs
// =============================================================================
// The dispatcher: a fixed pool of workers draining the admission queue.
//
// For each job a worker:
// 1. Skips it if the caller already gave up (disconnect or deadline)
// 2. Derives the crawler arguments from the job's target
// 3. Spawns the crawl executable in the configured working directory,
//    with stdout/stderr passed straight through
// 4. Signals Started / ValidationFailed / ProcessStartFailed back to the caller
//
// Launching is fire-and-forget. The worker only learns whether the process
// *started*; a detached reaper task logs the exit status later, but that is
// never reported to anyone.
//
// Rust concepts:
// - self: Arc<Self>: A method that needs an owned, shareable handle so each
//   spawned worker can keep the dispatcher alive
// - tokio::select!: Waits on several futures and runs the branch of the first
//   one to finish (here: shutdown vs. next job)
// - tokio::process::Command: Like std::process::Command, but the child can be
//   awaited without blocking a runtime thread
// =============================================================================

use std::num::NonZeroUsize;
use std::process::Stdio;
use std::sync::Arc;

use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::job::{Job, LaunchOutcome};
use crate::config::LauncherConfig;
use crate::crawl::{AdmissionQueue, CrawlInvocation};

#[derive(Debug)]
pub struct Dispatcher {
    queue: Arc<AdmissionQueue<Job>>,
    launcher: LauncherConfig,
}

impl Dispatcher {
    // Parameters:
    //   queue: the admission queue shared with the gateway
    //   launcher: which program to run, and where
    pub fn new(queue: Arc<AdmissionQueue<Job>>, launcher: LauncherConfig) -> Self {
        Self { queue, launcher }
    }

    // Starts the worker pool. Called once at startup; the pool size never
    // changes afterwards, however many requests arrive.
    //
    // Workers stop when `shutdown` is cancelled. Jobs still sitting in the
    // queue at that point are dropped, which wakes their callers with an error.
    pub fn spawn_workers(
        self: Arc<Self>,
        count: NonZeroUsize,
        shutdown: CancellationToken,
    ) -> Vec<JoinHandle<()>> {
        (0..count.get())
            .map(|worker_id| {
                // Each worker gets its own handle to the dispatcher and token
                let dispatcher = self.clone();
                let shutdown = shutdown.clone();
                tokio::spawn(async move { dispatcher.run_worker(worker_id, shutdown).await })
            })
            .collect()
    }

    async fn run_worker(&self, worker_id: usize, shutdown: CancellationToken) {
        tracing::debug!(worker_id, "Dispatch worker started");
        loop {
            // Shutdown wins over an empty queue; a job already received is
            // always dispatched before the token is checked again
            let job = tokio::select! {
                _ = shutdown.cancelled() => break,
                job = self.queue.dequeue() => job,
            };
            match job {
                Some(job) => {
                    self.dispatch(job);
                }
                None => break,
            }
        }
        tracing::debug!(worker_id, "Dispatch worker stopped");
    }

    // Launches one job and signals its outcome
    //
    // Returns: the outcome that was signaled, or None if the job was skipped
    // because nobody is waiting for it anymore
    pub fn dispatch(&self, job: Job) -> Option<LaunchOutcome> {
        // Nobody to answer: launching would start a crawl no one asked for anymore
        if job.is_abandoned() {
            tracing::info!(job_id = %job.id, host = job.target.host(), "Caller went away, skipping launch");
            return None;
        }

        // The gateway already checked this; repeated for jobs queued by other callers
        let outcome = match CrawlInvocation::from_target(&job.target) {
            Ok(invocation) => self.launch(&job, &invocation),
            Err(reason) => {
                tracing::warn!(job_id = %job.id, reason = %reason, "Refusing to build crawler arguments");
                LaunchOutcome::ValidationFailed(reason)
            }
        };

        // complete() consumes the job, so keep the id for the log line
        let job_id = job.id;
        if !job.complete(outcome.clone()) {
            tracing::warn!(job_id = %job_id, "Launch outcome produced but caller is gone");
        }
        Some(outcome)
    }

    fn launch(&self, job: &Job, invocation: &CrawlInvocation) -> LaunchOutcome {
        tracing::info!(
            job_id = %job.id,
            domain = %invocation.allowed_domain,
            start_url = %invocation.start_url,
            "Crawling domain"
        );

        // spawn() returns as soon as the process exists; we never wait for
        // the crawl here. stdout/stderr go to our own streams for visibility.
        let spawned = Command::new(&self.launcher.program)
            .args(invocation.args(&self.launcher.spider))
            .current_dir(&self.launcher.work_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn();

        match spawned {
            Ok(child) => {
                // id() is None only if the child was already reaped
                let pid = child.id();
                tracing::info!(job_id = %job.id, pid = ?pid, "Crawl process started");
                reap(job.id, child);
                LaunchOutcome::Started { pid }
            }
            Err(e) => {
                tracing::error!(
                    job_id = %job.id,
                    program = %self.launcher.program,
                    work_dir = %self.launcher.work_dir.display(),
                    error = %e,
                    "Failed to start crawl command"
                );
                LaunchOutcome::ProcessStartFailed(e.to_string())
            }
        }
    }
}

// Waits for the child in the background so it doesn't linger as a zombie,
// and logs how it ended.
//
// Parameters:
//   job_id: only used to correlate the log lines
//   child: the running crawl process (moved into the task)
fn reap(job_id: uuid::Uuid, mut child: Child) {
    tokio::spawn(async move {
        match child.wait().await {
            Ok(status) if status.success() => {
                tracing::info!(job_id = %job_id, "Crawl process exited cleanly")
            }
            Ok(status) => {
                tracing::warn!(job_id = %job_id, status = %status, "Crawl process exited with failure")
            }
            Err(e) => tracing::warn!(job_id = %job_id, error = %e, "Could not wait on crawl process"),
        }
    });
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why a fixed pool instead of one task per request?
//    - The number of concurrent launches stays bounded however many
//      requests arrive; the queue absorbs bursts up to its capacity
//
// 2. Why is dispatch() synchronous?
//    - Spawning a process doesn't need to be awaited; only waiting for its
//      exit does, and that happens in the reaper task
// -----------------------------------------------------------------------------
