//! Tests for the dispatch worker pool working against a shared queue.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crawl_gate::config::LauncherConfig;
use crawl_gate::crawl::{AdmissionQueue, CrawlTarget};
use crawl_gate::dispatch::{Dispatcher, Job, LaunchOutcome};
use crawl_gate::gateway::IntakeGateway;
use crawl_gate::GateError;

fn launcher(program: &str, work_dir: &std::path::Path) -> LauncherConfig {
    LauncherConfig {
        program: program.to_string(),
        spider: "osc".to_string(),
        work_dir: work_dir.to_path_buf(),
    }
}

#[tokio::test]
async fn test_pool_size_is_fixed_at_startup() {
    let work = tempfile::tempdir().unwrap();
    let queue = Arc::new(AdmissionQueue::new(NonZeroUsize::new(4).unwrap()));
    let dispatcher = Arc::new(Dispatcher::new(queue.clone(), launcher("true", work.path())));
    let shutdown = CancellationToken::new();

    let handles = dispatcher.spawn_workers(NonZeroUsize::new(3).unwrap(), shutdown.clone());
    assert_eq!(handles.len(), 3);

    // Many submissions, same three workers
    let gateway = Arc::new(IntakeGateway::new(queue, Duration::from_secs(5)));
    let mut submissions = Vec::new();
    for i in 0..4 {
        let gateway = gateway.clone();
        submissions.push(tokio::spawn(async move {
            gateway.submit(&format!("http://site{}.example/", i)).await
        }));
    }
    for submission in submissions {
        let target = submission.await.unwrap().unwrap();
        assert!(target.host().ends_with(".example"));
    }

    shutdown.cancel();
    for handle in handles {
        handle.await.unwrap();
    }
}

#[tokio::test]
async fn test_every_admitted_job_gets_exactly_one_outcome() {
    let work = tempfile::tempdir().unwrap();
    let queue = Arc::new(AdmissionQueue::new(NonZeroUsize::new(4).unwrap()));

    // Fill the queue before any worker exists
    let mut waiting = Vec::new();
    for i in 0..4 {
        let target = CrawlTarget::parse(&format!("http://site{}.example/", i)).unwrap();
        let (job, rx) = Job::new(target);
        assert!(queue.try_enqueue(job));
        waiting.push(rx);
    }
    let (overflow, _rx) = Job::new(CrawlTarget::parse("http://late.example/").unwrap());
    assert!(!queue.try_enqueue(overflow));

    let dispatcher = Arc::new(Dispatcher::new(queue.clone(), launcher("true", work.path())));
    let shutdown = CancellationToken::new();
    let handles = dispatcher.spawn_workers(NonZeroUsize::new(2).unwrap(), shutdown.clone());

    for rx in waiting {
        let outcome = tokio::time::timeout(Duration::from_secs(5), rx)
            .await
            .expect("outcome should arrive")
            .expect("job should not be dropped");
        assert!(matches!(outcome, LaunchOutcome::Started { .. }));
    }
    assert!(queue.is_empty());

    shutdown.cancel();
    for handle in handles {
        handle.await.unwrap();
    }
}

#[tokio::test]
async fn test_queued_jobs_fail_cleanly_when_workers_stop() {
    let queue = Arc::new(AdmissionQueue::new(NonZeroUsize::new(2).unwrap()));
    let gateway = IntakeGateway::new(queue.clone(), Duration::from_secs(5));

    // No workers at all: dropping the queue's pending jobs must wake the caller
    let submit = tokio::spawn(async move { gateway.submit("http://example.com/").await });
    tokio::time::sleep(Duration::from_millis(50)).await;
    let job = queue.dequeue().await.unwrap();
    drop(job);

    let err = submit.await.unwrap().unwrap_err();
    assert!(matches!(err, GateError::DispatcherUnavailable));
}
