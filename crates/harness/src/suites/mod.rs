//! Built-in scenario suites.
//!
//! Registrations are built, and their datasets loaded, before anything
//! executes; a dataset problem aborts the whole build with a load error
//! rather than producing partially-valid cases.

pub mod portal;
pub mod repo_hybrid;
pub mod search;
pub mod shop;
pub mod wiki;

use tekqa_common::{QaResult, SuiteConfig};

use crate::runner::Registration;

/// Every built-in registration, in suite order.
pub fn all(config: &SuiteConfig) -> QaResult<Vec<Registration>> {
    let mut regs = Vec::new();
    regs.extend(shop::registrations(config)?);
    regs.extend(portal::registrations(config)?);
    regs.extend(repo_hybrid::registrations(config)?);
    regs.extend(search::registrations(config)?);
    regs.extend(wiki::registrations(config)?);
    Ok(regs)
}
