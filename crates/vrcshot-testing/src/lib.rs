//! Testing infrastructure for vrcshot integration tests.
//!
//! This crate provides utilities for writing robust integration tests:
//! - `TestWorkspace`: isolated data/log/photo directories on a tempdir
//! - `fixtures`: VRChat log line and screenshot filename generation

pub mod fixtures;
pub mod workspace;

pub use workspace::TestWorkspace;
