//! Engine services
//!
//! Each service owns a [`JobsApi`](jobline_client::JobsApi) clone and talks to
//! the job service through it; progress goes to a caller-supplied reporter.

pub mod artifacts;
pub mod backoff;
pub mod runner;
pub mod tail;
pub mod waiter;

pub use artifacts::ArtifactSync;
pub use backoff::Backoff;
pub use runner::{JobRunner, RunOutcome, RunStage};
pub use tail::{LogTail, TailOptions};
pub use waiter::{Polled, Waiter, reached};
