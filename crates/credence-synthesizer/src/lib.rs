//! Credence Synthesizer
//!
//! Turns a question and its grounding claims into an answer by delegating to
//! a text-generation service.
//!
//! # Contract
//!
//! - Every claim is handed over with its source, and the service is told to
//!   answer only from those claims and to cite each source it uses
//! - The service's text is returned verbatim
//! - Each call is bounded by a timeout; failures are reported, never retried
//!   here
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use credence_domain::{ClaimId, GroundingClaim};
//! use credence_llm::MockProvider;
//! use credence_synthesizer::{Synthesizer, SynthesizerConfig};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let llm = Arc::new(MockProvider::new("Water boils at 100°C [physics.txt]."));
//! let synthesizer = Synthesizer::new(llm, SynthesizerConfig::default());
//!
//! let claims = vec![GroundingClaim {
//!     claim_id: ClaimId::from_value(7),
//!     claim_text: "Water boils at 100°C at sea level".into(),
//!     source_ref: "physics.txt".into(),
//! }];
//! let answer = synthesizer.synthesize("When does water boil?", &claims).await.unwrap();
//! assert!(answer.contains("100°C"));
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
pub mod prompt;
mod synthesizer;

pub use config::SynthesizerConfig;
pub use error::SynthesisError;
pub use prompt::SynthesisPrompt;
pub use synthesizer::Synthesizer;
