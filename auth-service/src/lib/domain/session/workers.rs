use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::session::errors::WorkerError;

/// Bounded pool for CPU-heavy password work.
///
/// Jobs run on the blocking thread pool; the semaphore caps how many run at
/// once so a burst of logins cannot starve the request-serving threads.
#[derive(Debug, Clone)]
pub struct PasswordWorkers {
    permits: Arc<Semaphore>,
    size: usize,
}

impl PasswordWorkers {
    /// Create a pool allowing `size` concurrent jobs (at least one).
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    /// Pool sized to the available parallelism of the host.
    pub fn from_available_parallelism() -> Self {
        let size = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::new(size)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Run `job` on a blocking thread once a permit is available.
    ///
    /// # Errors
    /// * `Closed` - The semaphore was closed
    /// * `Join` - The job panicked
    pub async fn run<F, T>(&self, job: F) -> Result<T, WorkerError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| WorkerError::Closed)?;

        tokio::task::spawn_blocking(job)
            .await
            .map_err(|e| WorkerError::Join(e.to_string()))
    }
}
