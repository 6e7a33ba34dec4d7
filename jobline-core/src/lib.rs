//! Jobline Core
//!
//! Core types shared by the Jobline client, engine and CLI.
//!
//! This crate contains:
//! - Domain types: snapshots of remote entities (Job, LogLine, artifacts, credentials)
//! - DTOs: request shapes sent to the job service

pub mod domain;
pub mod dto;
