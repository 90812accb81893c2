//! Credence Belief Controller
//!
//! Translates a reviewer's decision into claim store transitions.
//!
//! # Overview
//!
//! Every claim carries a reviewed belief state (`unreviewed`, `promoted`,
//! `demoted`) and a running score. The controller is the only component that
//! moves them, and it does so under one of two policies:
//!
//! | Mode | Promote | Demote |
//! |------|---------|--------|
//! | **Exclusive line** | Target +1, every sibling on the line demoted (-1 each) | Target only |
//! | **Independent** | Target only | Target only |
//!
//! In exclusive-line mode the sibling demotions and the target promotion are a
//! single store transaction, so at most one claim per line is ever promoted.
//!
//! Verdicts are orthogonal to both modes: recording one never changes status
//! or score.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use credence_belief::{BeliefConfig, BeliefController, ReviewAction};
//! use credence_domain::{ClaimId, VerdictValue};
//! use credence_store::SqliteStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(SqliteStore::new("knowledge.db")?);
//! let mut controller = BeliefController::new(store, BeliefConfig::exclusive());
//!
//! let outcome = controller.review(
//!     ClaimId::from_value(7),
//!     ReviewAction::Promote,
//!     Some(VerdictValue::True),
//! )?;
//! println!("{} sibling(s) demoted", outcome.demoted_siblings.len());
//! println!("\n{}", controller.metrics().summary());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! exclusive_line_mode = true
//! ```

#![warn(missing_docs)]

mod config;
mod controller;
mod error;
mod metrics;

pub use config::{BeliefConfig, ReviewMode};
pub use controller::{BeliefController, ReviewAction, ReviewOutcome};
pub use error::BeliefError;
pub use metrics::ReviewMetrics;
