//! Influencer campaign desk: eligibility matching, tiered budget visibility, and the
//! application review workflow.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
