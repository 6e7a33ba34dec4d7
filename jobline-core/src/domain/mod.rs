//! Core domain types
//!
//! Everything in here is owned by the remote job service. The client only
//! ever holds decoded snapshots of what the service last reported.

pub mod artifact;
pub mod job;
pub mod log;
