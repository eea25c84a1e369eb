//! Single-writer worker: a dedicated thread that owns every mutation.
//!
//! Jobs are closures over the store handle, queued on a bounded
//! crossbeam channel and executed strictly in submission order. Each job
//! answers through its own one-shot reply channel, surfaced to the caller as
//! a [`Pending`] handle.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::connection::DatabaseManager;

const QUEUE_CAPACITY: usize = 64;

type Job = Box<dyn FnOnce(&DatabaseManager) + Send + 'static>;

/// The worker thread has stopped (shut down or panicked in a job).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("write worker is no longer running")]
pub struct WorkerClosed;

/// Reply to a submitted job.
#[must_use = "a pending job result should be waited on"]
pub struct Pending<T> {
    reply: Receiver<T>,
}

impl<T> Pending<T> {
    /// Block until the job has run.
    pub fn wait(self) -> Result<T, WorkerClosed> {
        self.reply.recv().map_err(|_| WorkerClosed)
    }
}

pub struct WriteWorker {
    sender: Option<Sender<Job>>,
    handle: Option<JoinHandle<()>>,
}

impl WriteWorker {
    /// Start the writer thread over a shared store handle.
    pub fn spawn(db: Arc<DatabaseManager>) -> std::io::Result<Self> {
        let (sender, receiver) = bounded::<Job>(QUEUE_CAPACITY);
        let handle = thread::Builder::new()
            .name("regstat-writer".to_string())
            .spawn(move || {
                tracing::debug!("write worker started");
                for job in receiver {
                    job(&db);
                }
                tracing::debug!("write worker stopped");
            })?;
        Ok(Self {
            sender: Some(sender),
            handle: Some(handle),
        })
    }

    /// Queue `job`; blocks while the queue is full.
    pub fn submit<T, F>(&self, job: F) -> Result<Pending<T>, WorkerClosed>
    where
        F: FnOnce(&DatabaseManager) -> T + Send + 'static,
        T: Send + 'static,
    {
        let sender = self.sender.as_ref().ok_or(WorkerClosed)?;
        let (reply_tx, reply_rx) = bounded(1);
        let boxed: Job = Box::new(move |db| {
            // The caller may have dropped its Pending; nothing to report then.
            let _ = reply_tx.send(job(db));
        });
        sender.send(boxed).map_err(|_| WorkerClosed)?;
        Ok(Pending { reply: reply_rx })
    }

    /// Submit and wait.
    pub fn run<T, F>(&self, job: F) -> Result<T, WorkerClosed>
    where
        F: FnOnce(&DatabaseManager) -> T + Send + 'static,
        T: Send + 'static,
    {
        self.submit(job)?.wait()
    }

    /// Drain queued jobs and stop the thread.
    pub fn shutdown(mut self) -> Result<(), WorkerClosed> {
        self.stop()
    }

    fn stop(&mut self) -> Result<(), WorkerClosed> {
        self.sender.take();
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| WorkerClosed),
            None => Ok(()),
        }
    }
}

impl Drop for WriteWorker {
    fn drop(&mut self) {
        if self.stop().is_err() {
            tracing::error!("write worker panicked");
        }
    }
}
