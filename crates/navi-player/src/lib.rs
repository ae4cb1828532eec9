//! # navi-player
//!
//! Runs playback sessions on top of the queue engine: a lock-guarded queue
//! handle, the background worker that appends the tail of a long track
//! list, and the supervisor that keeps at most one such worker alive.

pub mod fill;
pub mod session;
pub mod shared;
pub mod supervisor;

#[cfg(test)]
mod testing;

pub use fill::{FillJob, FillReport, JobId};
pub use session::{PlayRequest, Session, DEFAULT_HEAD_SIZE};
pub use shared::SharedQueue;
pub use supervisor::JobSupervisor;
