//! Core logic for the TekQA harness, kept free of any browser dependency.
//!
//! Everything in this crate is plain data and pure functions: the error
//! taxonomy, the startup configuration, the tolerant comparator used by the
//! API-vs-UI hybrid checks, dataset loading for data-driven suites, the
//! soft/hard check accumulator, and the locator strategy model that page
//! objects build their element queries from.

pub mod check;
pub mod compare;
pub mod config;
pub mod dataset;
pub mod error;
pub mod locator;

pub use check::Checkpoint;
pub use compare::{CountTolerance, TextTolerance};
pub use config::SuiteConfig;
pub use error::{QaError, QaResult};
pub use locator::Locator;
