//! mfasynth-core — synthetic MFA sign-in dataset generation.
//!
//! Builds an employee roster and application catalog, synthesizes a
//! configurable volume of sign-in events whose statistical shape tracks
//! the configured targets, then runs a correction pass that steers the
//! current calendar month's compliance rate onto an exact target before
//! aggregation and output.
//!
//! Pipeline (see engine.rs for the fixed stage order):
//!   rng → population → synthesizer → correction → report → output

pub mod config;
pub mod correction;
pub mod engine;
pub mod error;
pub mod output;
pub mod population;
pub mod reference;
pub mod report;
pub mod rng;
pub mod synthesizer;
pub mod types;
