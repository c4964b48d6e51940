// src/gateway.rs
// =============================================================================
// The intake gateway turns one crawl submission into one launch outcome.
//
// Steps:
// 1. Validate the URL and the crawler arguments derived from it
//    (failure: InvalidUrl, nothing is queued)
// 2. Build a Job and try to admit it (queue full: QueueSaturated, at once)
// 3. Wait for the dispatcher's launch signal, up to `launch_timeout`
// 4. Map the outcome to Ok(target) or an error
//
// Step 3 is what keeps the HTTP response from going out before the crawler
// has actually been started. If the caller disconnects, the future running
// submit() is dropped, the completion receiver goes with it, and the
// dispatcher skips the job when it gets to it.
//
// Rust concepts:
// - Arc: The queue is shared with the dispatcher, so both hold a counted
//   reference to the same instance
// - tokio::time::timeout: Wraps a future and gives up after a deadline
// - Nested Result: timeout() yields Result<Result<T, RecvError>, Elapsed>,
//   one layer per way the wait can fail
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use crate::crawl::{AdmissionQueue, CrawlInvocation, CrawlTarget};
use crate::dispatch::{Job, LaunchOutcome};
use crate::error::{GateError, Result};

// Front door for crawl submissions
//
// Cheap to clone: the queue is behind an Arc and the timeout is Copy.
#[derive(Debug, Clone)]
pub struct IntakeGateway {
    queue: Arc<AdmissionQueue<Job>>,
    launch_timeout: Duration,
}

impl IntakeGateway {
    pub fn new(queue: Arc<AdmissionQueue<Job>>, launch_timeout: Duration) -> Self {
        Self {
            queue,
            launch_timeout,
        }
    }

    pub fn queue(&self) -> &AdmissionQueue<Job> {
        &self.queue
    }

    // Submits a crawl and waits until the crawler has been launched (or not)
    //
    // Parameters:
    //   raw_url: the URL exactly as the caller sent it
    //
    // Returns: the validated target once the crawl process is running
    pub async fn submit(&self, raw_url: &str) -> Result<CrawlTarget> {
        tracing::info!(url = raw_url, "Processing crawl submission");

        // Scheme/host checks first; any failure stops here
        let target = CrawlTarget::parse(raw_url)?;

        // The arguments must be expressible too, otherwise the job would take
        // a queue slot only to be refused by the worker later
        CrawlInvocation::from_target(&target)
            .map_err(|reason| GateError::invalid_url(raw_url, reason))?;

        // The job owns the sending half; we keep the receiving half
        let (job, completion) = Job::new(target.clone());
        let job_id = job.id;

        // Non-blocking admission: a full queue is answered right away
        if !self.queue.try_enqueue(job) {
            return Err(GateError::QueueSaturated);
        }
        tracing::debug!(job_id = %job_id, queued = self.queue.len(), "Job admitted");

        // Outer Err: deadline passed. Inner Err: job dropped without a signal.
        let outcome = match tokio::time::timeout(self.launch_timeout, completion).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => return Err(GateError::DispatcherUnavailable),
            Err(_) => return Err(GateError::LaunchTimedOut(self.launch_timeout)),
        };

        match outcome {
            LaunchOutcome::Started { .. } => Ok(target),
            LaunchOutcome::ValidationFailed(reason) => Err(GateError::invalid_url(raw_url, reason)),
            LaunchOutcome::ProcessStartFailed(reason) => Err(GateError::ProcessStartFailed(reason)),
        }
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why validate the arguments here as well as in the dispatcher?
//    - A request that can never be launched must not occupy a queue slot,
//      and must get the same 400 whether the queue is empty or full
//    - The dispatcher keeps its own check for jobs built elsewhere
//
// 2. Why clone the target before queueing?
//    - The Job takes ownership of one copy and moves to a worker
//    - We return the other copy to the HTTP handler on success
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    fn gateway(capacity: usize, timeout: Duration) -> IntakeGateway {
        let queue = Arc::new(AdmissionQueue::new(NonZeroUsize::new(capacity).unwrap()));
        IntakeGateway::new(queue, timeout)
    }

    // Stands in for a dispatch worker: answers the next job with `outcome`
    fn answer_next(gw: &IntakeGateway, outcome: LaunchOutcome) -> tokio::task::JoinHandle<()> {
        let queue = gw.queue.clone();
        tokio::spawn(async move {
            let job = queue.dequeue().await.unwrap();
            job.complete(outcome);
        })
    }

    #[tokio::test]
    async fn test_started_returns_target() {
        let gw = gateway(1, Duration::from_secs(5));
        let worker = answer_next(&gw, LaunchOutcome::Started { pid: Some(1) });

        let target = gw.submit("http://example.com/path").await.unwrap();
        assert_eq!(target.host(), "example.com");
        worker.await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_url_never_reaches_queue() {
        let gw = gateway(1, Duration::from_secs(5));
        let err = gw.submit("ftp://example.com").await.unwrap_err();
        assert!(matches!(err, GateError::InvalidUrl { .. }));
        assert!(gw.queue().is_empty());
    }

    #[tokio::test]
    async fn test_full_queue_rejects_immediately() {
        let gw = gateway(1, Duration::from_secs(5));
        let (job, _waiting) = Job::new(CrawlTarget::parse("http://a.com/").unwrap());
        assert!(gw.queue().try_enqueue(job));

        let err = gw.submit("http://b.com/").await.unwrap_err();
        assert!(matches!(err, GateError::QueueSaturated));
        assert_eq!(gw.queue().len(), 1);
    }

    #[tokio::test]
    async fn test_start_failure_is_reported() {
        let gw = gateway(1, Duration::from_secs(5));
        let _worker = answer_next(&gw, LaunchOutcome::ProcessStartFailed("ENOENT".into()));

        let err = gw.submit("http://example.com/").await.unwrap_err();
        assert!(matches!(err, GateError::ProcessStartFailed(_)));
    }

    #[tokio::test]
    async fn test_worker_validation_failure_maps_to_invalid_url() {
        let gw = gateway(1, Duration::from_secs(5));
        let _worker = answer_next(&gw, LaunchOutcome::ValidationFailed("comma".into()));

        let err = gw.submit("http://example.com/").await.unwrap_err();
        assert!(matches!(err, GateError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_comma_url_is_refused_before_admission() {
        let gw = gateway(1, Duration::from_secs(5));

        // Same answer with a free slot...
        let err = gw.submit("http://example.com/a,b").await.unwrap_err();
        assert!(matches!(err, GateError::InvalidUrl { .. }));
        assert!(gw.queue().is_empty());

        // ...and with a full queue
        let (job, _waiting) = Job::new(CrawlTarget::parse("http://busy.com/").unwrap());
        assert!(gw.queue().try_enqueue(job));
        let err = gw.submit("http://example.com/a,b").await.unwrap_err();
        assert!(matches!(err, GateError::InvalidUrl { .. }));
        assert_eq!(gw.queue().len(), 1);
    }

    #[tokio::test]
    async fn test_deadline_abandons_job() {
        let gw = gateway(1, Duration::from_millis(50));

        let err = gw.submit("http://example.com/").await.unwrap_err();
        assert!(matches!(err, GateError::LaunchTimedOut(_)));

        // The job is still queued, but nobody is waiting for it
        let job = gw.queue().dequeue().await.unwrap();
        assert!(job.is_abandoned());
    }

    #[tokio::test]
    async fn test_dropped_job_reports_dispatcher_unavailable() {
        let gw = gateway(1, Duration::from_secs(5));
        let queue = gw.queue.clone();
        let _worker = tokio::spawn(async move {
            let job = queue.dequeue().await.unwrap();
            drop(job);
        });

        let err = gw.submit("http://example.com/").await.unwrap_err();
        assert!(matches!(err, GateError::DispatcherUnavailable));
    }
}
