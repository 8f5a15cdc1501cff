//! Mortify: repair-viability scoring for household appliances.
//!
//! The crate houses the amortization scoring engine, the quick verdict
//! evaluator, category reference-data import, and the judge review workflow
//! that field-service products drive over HTTP.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
