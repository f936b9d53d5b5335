//! Job scheduler infrastructure for background tasks.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::middleware::metrics::record_job_run;

/// Job frequency for scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobFrequency {
    /// Run every N seconds (for testing).
    Seconds(u64),
    /// Run every N minutes.
    Minutes(u64),
    /// Run every hour.
    Hourly,
}

impl JobFrequency {
    /// Get the duration between job executions.
    pub fn duration(&self) -> Duration {
        match self {
            JobFrequency::Seconds(secs) => Duration::from_secs(*secs),
            JobFrequency::Minutes(mins) => Duration::from_secs(*mins * 60),
            JobFrequency::Hourly => Duration::from_secs(3600),
        }
    }

    pub fn from_minutes(mins: u64) -> Self {
        if mins == 60 {
            JobFrequency::Hourly
        } else {
            JobFrequency::Minutes(mins)
        }
    }
}

/// Trait for implementing background jobs.
#[async_trait::async_trait]
pub trait Job: Send + Sync {
    /// The name of this job (used for logging and metrics).
    fn name(&self) -> &'static str;

    /// The frequency at which this job should run.
    fn frequency(&self) -> JobFrequency;

    /// Execute the job. Returns Ok(()) on success, Err with message on failure.
    ///
    /// A failure is logged; the job keeps its schedule.
    async fn execute(&self) -> Result<(), String>;
}

/// Runs one job and logs the outcome. Never propagates the job's error.
async fn run_job(job: &dyn Job) -> bool {
    let name = job.name();
    let start = std::time::Instant::now();
    info!(job = name, "Job starting");

    let result = job.execute().await;
    let elapsed = start.elapsed();
    record_job_run(name, result.is_ok(), elapsed.as_secs_f64());

    match result {
        Ok(()) => {
            info!(
                job = name,
                elapsed_ms = elapsed.as_millis(),
                "Job completed successfully"
            );
            true
        }
        Err(e) => {
            error!(
                job = name,
                elapsed_ms = elapsed.as_millis(),
                error = %e,
                "Job failed"
            );
            false
        }
    }
}

/// Background job scheduler.
pub struct JobScheduler {
    jobs: Vec<Arc<dyn Job>>,
    initial_delay: Duration,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl JobScheduler {
    /// Create a scheduler whose jobs first fire after `initial_delay`.
    pub fn new(initial_delay: Duration) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            jobs: Vec::new(),
            initial_delay,
            shutdown_tx,
            shutdown_rx,
            handles: Vec::new(),
        }
    }

    /// Register a job with the scheduler.
    pub fn register<J: Job + 'static>(&mut self, job: J) {
        self.jobs.push(Arc::new(job));
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Run every registered job once, in registration order.
    ///
    /// Returns how many succeeded.
    pub async fn run_once(&self) -> usize {
        let mut succeeded = 0;
        for job in &self.jobs {
            if run_job(job.as_ref()).await {
                succeeded += 1;
            }
        }
        succeeded
    }

    /// Start all registered jobs.
    pub fn start(&mut self) {
        info!(
            jobs = self.jobs.len(),
            initial_delay_secs = self.initial_delay.as_secs(),
            "Starting job scheduler"
        );

        for job in &self.jobs {
            let job = Arc::clone(job);
            let mut shutdown_rx = self.shutdown_rx.clone();
            let first_run = Instant::now() + self.initial_delay;

            let handle = tokio::spawn(async move {
                let name = job.name();
                let frequency = job.frequency();
                let mut interval = tokio::time::interval_at(first_run, frequency.duration());
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

                info!(job = name, frequency = ?frequency, "Job scheduled");

                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            run_job(job.as_ref()).await;
                        }
                        _ = shutdown_rx.changed() => {
                            if *shutdown_rx.borrow() {
                                info!(job = name, "Job shutting down");
                                break;
                            }
                        }
                    }
                }
            });

            self.handles.push(handle);
        }
    }

    /// Initiate graceful shutdown of all jobs.
    /// Returns immediately after signaling shutdown.
    pub fn shutdown(&self) {
        info!("Initiating job scheduler shutdown");
        let _ = self.shutdown_tx.send(true);
    }

    /// Wait for all jobs to complete with timeout.
    pub async fn wait_for_shutdown(self, timeout: Duration) {
        info!("Waiting for jobs to complete (timeout: {:?})", timeout);

        let shutdown_future = async {
            for handle in self.handles {
                if let Err(e) = handle.await {
                    warn!("Job task panicked: {}", e);
                }
            }
        };

        match tokio::time::timeout(timeout, shutdown_future).await {
            Ok(()) => info!("All jobs completed gracefully"),
            Err(_) => warn!("Job shutdown timed out after {:?}", timeout),
        }
    }
}
