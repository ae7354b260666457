//! Domain logic for the AlumniAccel mentorship matching service.
//!
//! This crate has no I/O. The `db` and `api` crates call into it for the
//! match state machine, scoring, deadline math, and candidate selection.

pub mod error;
pub mod matching;
pub mod roles;
pub mod types;
