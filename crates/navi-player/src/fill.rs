//! Background fill worker.
//!
//! Resolving every song of a long list takes longer than a voice response is
//! allowed to. The caller resolves a small head synchronously and hands the
//! rest to a [`FillJob`], which resolves and appends it in order.

use std::fmt;
use std::sync::Arc;

use navi_core::{resolve_track, Catalog, Error};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::shared::SharedQueue;

/// Identifier of one fill job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Outcome of a fill job that ran to completion.
#[derive(Debug)]
pub struct FillReport {
    pub job: JobId,
    /// Number of ids the job was given.
    pub requested: usize,
    /// Number of tracks appended to the queue.
    pub added: usize,
    /// The failure that stopped the job early, if any.
    pub error: Option<Error>,
}

impl FillReport {
    pub const fn is_complete(&self) -> bool {
        self.error.is_none() && self.added == self.requested
    }
}

/// A not yet started request to resolve `ids` and append them to a queue.
///
/// Jobs are started by a [`JobSupervisor`](crate::JobSupervisor), which
/// guarantees only one runs against a queue at a time.
pub struct FillJob<C> {
    id: JobId,
    catalog: Arc<C>,
    queue: SharedQueue,
    ids: Vec<String>,
}

impl<C: Catalog> FillJob<C> {
    pub fn new(catalog: Arc<C>, queue: SharedQueue, ids: Vec<String>) -> Self {
        Self {
            id: JobId::new(),
            catalog,
            queue,
            ids,
        }
    }

    pub const fn id(&self) -> JobId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Resolve and append every id in order, then sync the buffer once.
    ///
    /// The first failure abandons the rest of the batch: a short queue is
    /// better than one in the wrong order. Tracks already appended stay.
    pub async fn run(self) -> FillReport {
        let requested = self.ids.len();
        debug!("Fill job {} resolving {requested} tracks", self.id);

        let mut added = 0;
        let mut failure = None;

        for id in &self.ids {
            let appended = match resolve_track(self.catalog.as_ref(), id).await {
                Ok(track) => self.queue.add(track),
                Err(e) => Err(e),
            };

            if let Err(e) = appended {
                error!(
                    "Fill job {} failed on track {id}, abandoning {} remaining: {e}",
                    self.id,
                    requested - added - 1
                );
                failure = Some(Error::resolution(id.clone(), e));
                break;
            }
            added += 1;
        }

        self.queue.sync();
        info!("Fill job {} finished: {added}/{requested} tracks added", self.id);

        FillReport {
            job: self.id,
            requested,
            added,
            error: failure,
        }
    }
}

impl<C> fmt::Debug for FillJob<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FillJob")
            .field("id", &self.id)
            .field("ids", &self.ids)
            .finish_non_exhaustive()
    }
}
