//! Data Transfer Objects
//!
//! Request shapes the client sends to the job service. The service takes its
//! parameters as flat string maps, so DTOs convert into [`Params`].

use std::collections::BTreeMap;

pub mod job;

/// Flat parameter map sent with every service call
pub type Params = BTreeMap<String, String>;
