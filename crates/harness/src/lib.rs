//! TekQA harness: Rust-controlled end-to-end UI testing.
//!
//! This crate drives Playwright from Rust and layers page objects, tolerant
//! verification, and a scenario runner on top:
//! - Spawns a Node driver subprocess hosting one browser page per scenario
//! - Speaks a line-delimited JSON command protocol with bounded waits
//! - Wraps each logical screen in a page object with confirmed postconditions
//! - Expands JSON datasets into independent, named scenario registrations
//! - Cross-checks REST API data against the rendered UI with tolerant
//!   comparators, and screenshots against stored baselines
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Runner                               │
//! │    ├── Registration (name, tags, requirement, scenario)     │
//! │    ├── per scenario: fresh Session + Checkpoint             │
//! │    └── SuiteResult -> test-results.json                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Scenario body                                              │
//! │    ├── Fixtures -> page objects (login, cart, menu, ...)    │
//! │    ├── GithubClient (REST observation)                      │
//! │    ├── compare::* (tolerant API↔UI equivalence)             │
//! │    └── VisualTester (baseline/candidate pixel diff)         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Session  ── line-delimited JSON ──►  node driver.js        │
//! │    goto / click / fill / wait_for / text / screenshot ...   │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod audit;
pub mod browser;
pub mod fixtures;
pub mod github;
pub mod pages;
pub mod runner;
pub mod suites;
pub mod visual;

pub use browser::{BrowserConfig, BrowserKind, Session};
pub use runner::{Registration, Runner, RunnerConfig, Scenario, ScenarioCtx};
pub use visual::{VisualConfig, VisualOutcome, VisualTester};
