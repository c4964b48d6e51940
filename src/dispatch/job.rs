// src/dispatch/job.rs
// =============================================================================
// A Job is one admitted crawl submission on its way to a dispatch worker.
//
// The job carries the sending half of a one-shot completion signal; the
// HTTP handler that created it keeps the receiving half and waits on it.
// complete() takes the job by value, so an outcome can be set at most once.
// =============================================================================

use tokio::sync::oneshot;
use uuid::Uuid;

use crate::crawl::CrawlTarget;

/// Whether the crawl executable was started. Says nothing about whether the
/// crawl itself later succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// Child process is running
    Started { pid: Option<u32> },
    /// The target could not be turned into safe crawler arguments
    ValidationFailed(String),
    /// The executable could not be launched (missing binary, permissions, ...)
    ProcessStartFailed(String),
}

/// Receiving half held by the waiting caller
pub type CompletionReceiver = oneshot::Receiver<LaunchOutcome>;

#[derive(Debug)]
pub struct Job {
    pub id: Uuid,
    pub target: CrawlTarget,
    completion: oneshot::Sender<LaunchOutcome>,
}

impl Job {
    // Creates a job and the receiver its caller waits on
    pub fn new(target: CrawlTarget) -> (Self, CompletionReceiver) {
        let (completion, rx) = oneshot::channel();
        let job = Job {
            id: Uuid::new_v4(),
            target,
            completion,
        };
        (job, rx)
    }

    /// True once nobody is waiting for this job's outcome anymore
    pub fn is_abandoned(&self) -> bool {
        self.completion.is_closed()
    }

    // Delivers the outcome to the waiting caller, consuming the job
    //
    // Returns: false if the caller had already gone away
    pub fn complete(self, outcome: LaunchOutcome) -> bool {
        self.completion.send(outcome).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> CrawlTarget {
        CrawlTarget::parse("http://example.com/").unwrap()
    }

    #[tokio::test]
    async fn test_outcome_reaches_waiter() {
        let (job, rx) = Job::new(target());
        assert!(!job.is_abandoned());
        assert!(job.complete(LaunchOutcome::Started { pid: Some(42) }));
        assert_eq!(rx.await.unwrap(), LaunchOutcome::Started { pid: Some(42) });
    }

    #[test]
    fn test_dropped_waiter_marks_job_abandoned() {
        let (job, rx) = Job::new(target());
        drop(rx);
        assert!(job.is_abandoned());
        assert!(!job.complete(LaunchOutcome::ProcessStartFailed("gone".into())));
    }

    #[tokio::test]
    async fn test_dropped_job_wakes_waiter_with_error() {
        let (job, rx) = Job::new(target());
        drop(job);
        assert!(rx.await.is_err());
    }

    #[test]
    fn test_job_ids_are_unique() {
        let (a, _ra) = Job::new(target());
        let (b, _rb) = Job::new(target());
        assert_ne!(a.id, b.id);
    }
}
