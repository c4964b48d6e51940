// src/crawl/queue.rs
// =============================================================================
// This module implements the admission queue: a fixed-capacity FIFO holding
// area for accepted crawl jobs that no dispatch worker has picked up yet.
//
// How it works:
// 1. Producers (HTTP handlers) call try_enqueue()
// 2. If the queue already holds `capacity` jobs, the call returns false
//    right away; nothing waits and nothing is queued beyond capacity
// 3. Consumers (dispatch workers) call dequeue(), which parks the worker
//    until a job is available
// 4. Every job goes to exactly one worker, in admission order
//
// The bound is the backpressure: it caps how much work can pile up in front
// of the crawl executable, and lets callers fail fast instead of hanging.
//
// Rust concepts:
// - tokio::sync::mpsc: A bounded async channel; its buffer *is* the queue
// - Mutex<Receiver>: Lets several workers share one receiving end
// - Generics: The queue does not care what a job is
// =============================================================================

use std::num::NonZeroUsize;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::Mutex;

// A bounded, multi-producer, multi-consumer FIFO queue
//
// The queue owns both ends of its channel, so the channel never closes while
// the queue is alive and dequeue() only returns None if that ever changes.
#[derive(Debug)]
pub struct AdmissionQueue<T> {
    tx: mpsc::Sender<T>,
    rx: Mutex<mpsc::Receiver<T>>,
}

impl<T> AdmissionQueue<T> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.get());
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }

    // Tries to admit a job without waiting
    //
    // Returns: true if the job was appended, false if the queue is full
    // (the rejected job is dropped here)
    pub fn try_enqueue(&self, job: T) -> bool {
        match self.tx.try_send(job) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => false,
            Err(TrySendError::Closed(_)) => false,
        }
    }

    // Waits for the next job in admission order
    //
    // Workers queue up on the mutex, and whichever worker holds it receives
    // the next job, so a job can never be handed out twice.
    pub async fn dequeue(&self) -> Option<T> {
        let mut rx = self.rx.lock().await;
        rx.recv().await
    }

    /// Maximum number of jobs the queue can hold
    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    /// Number of admitted jobs not yet taken by a worker
    pub fn len(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.tx.capacity() == 0
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why not VecDeque + Mutex?
//    - A bare VecDeque needs a separate wake-up mechanism for idle workers
//    - The mpsc channel already has a bounded buffer, FIFO order, and parks
//      receivers until something arrives
//
// 2. Why try_send instead of send?
//    - send().await would wait for a free slot, i.e. queue the caller
//      invisibly beyond capacity
//    - try_send fails immediately with Full, which is the rejection we want
//
// 3. What counts towards len()?
//    - A slot is freed the moment a worker receives the job, not when the
//      crawl finishes. The queue bounds waiting work, the worker pool bounds
//      work being launched.
// -----------------------------------------------------------------------------
