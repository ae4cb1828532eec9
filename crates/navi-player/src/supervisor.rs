//! Supervisor enforcing at most one running fill job per session.

use navi_core::{Catalog, Result};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::fill::{FillJob, FillReport, JobId};

struct RunningJob {
    id: JobId,
    handle: JoinHandle<FillReport>,
    /// Turns true once the job has produced its report.
    done: watch::Receiver<bool>,
}

impl RunningJob {
    fn spawn<C: Catalog>(job: FillJob<C>) -> Self {
        let id = job.id();
        debug!("Starting fill job {id} for {} tracks", job.len());

        let (finished, done) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let report = job.run().await;
            let _ = finished.send(true);
            report
        });

        Self { id, handle, done }
    }

    fn is_finished(&self) -> bool {
        self.handle.is_finished() || *self.done.borrow()
    }
}

/// Owns the fill job of one session.
///
/// Starting a job first terminates the running one and waits for it to stop.
/// Tracks the old job already appended are kept.
#[derive(Default)]
pub struct JobSupervisor {
    active: Mutex<Option<RunningJob>>,
}

impl JobSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Terminate any running job, then start `job`.
    pub async fn start<C: Catalog>(&self, job: FillJob<C>) -> JobId {
        let mut active = self.active.lock().await;

        if let Some(previous) = active.take() {
            terminate(previous).await;
        }

        let job = RunningJob::spawn(job);
        let id = job.id;
        *active = Some(job);
        id
    }

    /// Terminate any running job, run `seed`, then start `job` if given.
    ///
    /// All three steps happen under the supervisor lock, so no other job can
    /// touch the queue between the old job stopping and `seed` running. When
    /// `seed` fails nothing is started.
    pub async fn replace<C, T>(
        &self,
        seed: impl FnOnce() -> Result<T>,
        job: Option<FillJob<C>>,
    ) -> Result<T>
    where
        C: Catalog,
    {
        let mut active = self.active.lock().await;

        if let Some(previous) = active.take() {
            terminate(previous).await;
        }

        let value = seed()?;
        *active = job.map(RunningJob::spawn);
        Ok(value)
    }

    /// The job that is still running, if any.
    pub async fn current_job(&self) -> Option<JobId> {
        self.active
            .lock()
            .await
            .as_ref()
            .filter(|job| !job.handle.is_finished())
            .map(|job| job.id)
    }

    /// Terminate the running job. Returns false when nothing was running.
    pub async fn cancel(&self) -> bool {
        let previous = self.active.lock().await.take();
        match previous {
            Some(job) if !job.handle.is_finished() => {
                terminate(job).await;
                true
            }
            _ => false,
        }
    }

    /// Wait until no job is running and return the report of the last one.
    ///
    /// The lock is not held while waiting, so [`start`](Self::start) and
    /// [`cancel`](Self::cancel) still terminate the job. A superseded job is
    /// followed by its replacement; a cancelled one yields `None`.
    pub async fn wait(&self) -> Option<FillReport> {
        loop {
            let mut done = {
                let mut active = self.active.lock().await;
                let finished = active.as_ref()?.is_finished();
                if finished {
                    let job = active.take()?;
                    drop(active);
                    return join(job).await;
                }
                active.as_ref()?.done.clone()
            };

            // Errors once the job is aborted and its sender dropped.
            let _ = done.wait_for(|finished| *finished).await;
        }
    }
}

impl Drop for JobSupervisor {
    fn drop(&mut self) {
        if let Some(job) = self.active.get_mut().take() {
            job.handle.abort();
        }
    }
}

/// Abort a job and wait until it has fully stopped.
async fn terminate(job: RunningJob) {
    job.handle.abort();
    match job.handle.await {
        Ok(report) => debug!(
            "Fill job {} had already finished with {} tracks",
            job.id, report.added
        ),
        Err(e) if e.is_cancelled() => info!("Terminated fill job {}", job.id),
        Err(e) => error!("Fill job {} panicked: {e}", job.id),
    }
}

/// Collect the report of a job that has finished.
async fn join(job: RunningJob) -> Option<FillReport> {
    match job.handle.await {
        Ok(report) => Some(report),
        Err(e) => {
            error!("Fill job {} did not complete: {e}", job.id);
            None
        }
    }
}
