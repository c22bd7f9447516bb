//! `shoprec-recon` — Monthly revenue recognition and cash reconciliation engine.
//!
//! Pure engine crate: receives order and payment-transaction exports as text,
//! returns a month-keyed report. No CLI or filesystem dependencies.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod parse;

pub use config::ReconConfig;
pub use engine::{run, run_csv, summarize};
pub use error::ReconError;
pub use model::{Month, ReconInput, ReconReport, ReconResult, ReportRow};
