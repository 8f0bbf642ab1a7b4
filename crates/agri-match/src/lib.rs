//! Matching of farmers against agricultural funding aids.
//!
//! [`matching`] holds the weighted scoring engine, the rule-expression evaluator used by the
//! legacy eligibility listing, batch ranking, and the HTTP router over both.

pub mod config;
pub mod error;
pub mod matching;
pub mod telemetry;
