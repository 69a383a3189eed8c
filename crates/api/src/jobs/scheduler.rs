//! Interval scheduler for background jobs.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobFrequency {
    Seconds(u64),
    Minutes(u64),
}

impl JobFrequency {
    /// Interval between runs; never shorter than one second.
    pub fn duration(&self) -> Duration {
        let secs = match self {
            JobFrequency::Seconds(secs) => *secs,
            JobFrequency::Minutes(mins) => mins.saturating_mul(60),
        };
        Duration::from_secs(secs.max(1))
    }
}

#[derive(Debug, Error)]
pub enum JobError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Failed(String),
}

#[async_trait::async_trait]
pub trait Job: Send + Sync {
    fn name(&self) -> &'static str;

    fn frequency(&self) -> JobFrequency;

    async fn execute(&self) -> Result<(), JobError>;
}

/// Runs each registered job on its own task until shutdown is signalled.
pub struct JobScheduler {
    jobs: Vec<Arc<dyn Job>>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl JobScheduler {
    pub fn new() -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            jobs: Vec::new(),
            shutdown_tx,
            shutdown_rx,
            handles: Vec::new(),
        }
    }

    pub fn register<J: Job + 'static>(&mut self, job: J) {
        self.jobs.push(Arc::new(job));
    }

    pub fn job_names(&self) -> Vec<&'static str> {
        self.jobs.iter().map(|j| j.name()).collect()
    }

    pub fn start(&mut self) {
        info!(jobs = ?self.job_names(), "Starting job scheduler");

        for job in &self.jobs {
            let job = Arc::clone(job);
            let shutdown_rx = self.shutdown_rx.clone();
            self.handles.push(tokio::spawn(run_job(job, shutdown_rx)));
        }
    }

    /// Signals every job to stop after its current run.
    pub fn shutdown(&self) {
        info!("Initiating job scheduler shutdown");
        let _ = self.shutdown_tx.send(true);
    }

    pub async fn wait_for_shutdown(self, timeout: Duration) {
        let shutdown_future = async {
            for handle in self.handles {
                if let Err(e) = handle.await {
                    warn!(error = %e, "Job task panicked");
                }
            }
        };

        match tokio::time::timeout(timeout, shutdown_future).await {
            Ok(()) => info!("All jobs stopped"),
            Err(_) => warn!(timeout_secs = timeout.as_secs(), "Job shutdown timed out"),
        }
    }
}

impl Default for JobScheduler {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_job(job: Arc<dyn Job>, mut shutdown_rx: watch::Receiver<bool>) {
    let name = job.name();
    let frequency = job.frequency();
    let mut interval = tokio::time::interval(frequency.duration());
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    // The first tick completes immediately.
    interval.tick().await;
    info!(job = name, frequency = ?frequency, "Job scheduled");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let start = std::time::Instant::now();
                match job.execute().await {
                    Ok(()) => debug!(
                        job = name,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "Job completed"
                    ),
                    Err(e) => error!(
                        job = name,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        error = %e,
                        "Job failed"
                    ),
                }
            }
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    info!(job = name, "Job shutting down");
                    break;
                }
            }
        }
    }
}
