//! Background task dispatch.
//!
//! `submit` enqueues a request and returns its id immediately; a dispatcher
//! loop runs queued requests on a bounded number of concurrent workers and
//! streams finished records back to the caller.

use crate::core::pipeline::Pipeline;
use crate::models::task::{TaskRecord, TaskRequest};
use crate::{Error, Result};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinHandle, JoinSet};
use uuid::Uuid;

fn report_join(joined: std::result::Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        tracing::error!("Task worker panicked: {}", e);
    }
}

/// Handle for submitting pipeline runs.
pub struct TaskDispatcher {
    queue: mpsc::UnboundedSender<(Uuid, TaskRequest)>,
    handle: JoinHandle<()>,
}

impl TaskDispatcher {
    /// Start the dispatcher loop with at most `workers` tasks in flight.
    ///
    /// The returned receiver yields each finished record.
    pub fn spawn(
        pipeline: Arc<Pipeline>,
        workers: usize,
    ) -> (Self, mpsc::UnboundedReceiver<TaskRecord>) {
        let (queue, mut requests) = mpsc::unbounded_channel::<(Uuid, TaskRequest)>();
        let (results, finished) = mpsc::unbounded_channel();
        let permits = Arc::new(Semaphore::new(workers.max(1)));

        let handle = tokio::spawn(async move {
            let mut running = JoinSet::new();
            while let Some((uuid, request)) = requests.recv().await {
                let permit = match permits.clone().acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => break,
                };
                // Reap finished workers before spawning the next one.
                while let Some(joined) = running.try_join_next() {
                    report_join(joined);
                }
                let pipeline = pipeline.clone();
                let results = results.clone();
                running.spawn(async move {
                    let record = pipeline.run(uuid, request).await;
                    drop(permit);
                    // The receiver may have been dropped; the record is already persisted.
                    let _ = results.send(record);
                });
            }
            while let Some(joined) = running.join_next().await {
                report_join(joined);
            }
            tracing::debug!("Dispatcher stopped");
        });

        (Self { queue, handle }, finished)
    }

    /// Enqueue a request and return its task id without waiting for it.
    pub fn submit(&self, request: TaskRequest) -> Result<Uuid> {
        let uuid = Uuid::new_v4();
        self.queue
            .send((uuid, request))
            .map_err(|_| Error::other("task dispatcher is shut down"))?;
        tracing::debug!("Submitted task {}", uuid);
        Ok(uuid)
    }

    /// Stop accepting requests and wait for queued and running tasks.
    pub async fn shutdown(self) {
        drop(self.queue);
        if let Err(e) = self.handle.await {
            tracing::error!("Dispatcher loop failed: {}", e);
        }
    }
}
