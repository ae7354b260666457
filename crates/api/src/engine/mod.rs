//! Matching engine.
//!
//! Proposes mentors to mentee registrations, applies mentor responses and
//! re-proposes after a rejection or an expired deadline. Request handlers
//! and the deadline sweeper share these code paths.

pub mod matching;

pub use matching::{MatchingEngine, ProposeOutcome, RejectOutcome, RunReport, SweepReport};
