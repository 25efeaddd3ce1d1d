//! Ordered cleanup on SIGINT/SIGTERM.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::{Instant, timeout_at};

type TaskFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;
type Task = Box<dyn FnOnce() -> TaskFuture + Send>;

/// Runs registered cleanup tasks once the process is asked to stop.
///
/// Tasks run one after another in reverse registration order, so whatever
/// was set up last is torn down first. All of them share a single deadline;
/// a task that fails or runs out of time is logged and the rest still run.
#[derive(Default)]
pub struct ShutdownCoordinator {
    tasks: Mutex<Vec<(String, Task)>>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_task<F, Fut>(&self, name: impl Into<String>, task: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let task: Task = Box::new(move || Box::pin(task()));
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((name.into(), task));
    }

    pub fn len(&self) -> usize {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Waits for a shutdown signal, then runs the tasks.
    pub async fn run(&self, timeout: Duration) -> Vec<String> {
        shutdown_signal().await;
        self.run_tasks(timeout).await
    }

    /// Runs every registered task now. Returns the names of the tasks that
    /// failed or did not finish before the deadline.
    pub async fn run_tasks(&self, timeout: Duration) -> Vec<String> {
        let tasks = std::mem::take(&mut *self.tasks.lock().unwrap_or_else(PoisonError::into_inner));
        let deadline = Instant::now() + timeout;
        let mut failed = Vec::new();

        for (name, task) in tasks.into_iter().rev() {
            match timeout_at(deadline, task()).await {
                Ok(Ok(())) => tracing::info!(task = %name, "Shutdown task completed"),
                Ok(Err(e)) => {
                    tracing::error!(task = %name, error = %e, "Shutdown task failed");
                    failed.push(name);
                }
                Err(_) => {
                    tracing::warn!(task = %name, "Shutdown task timed out");
                    failed.push(name);
                }
            }
        }

        failed
    }
}

/// Resolves on Ctrl+C or, on unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Ctrl+C received, starting graceful shutdown"),
        _ = terminate => tracing::info!("Terminate signal received, starting graceful shutdown"),
    }
}
