//! The agent coordination engine.
//!
//! [`ConfidenceRouter`] answers from the document corpus first and falls back
//! to live web search when the document confidence is below the configured
//! threshold:
//!
//! ```text
//! DocRetrieval --confidence >= threshold--> Evaluation? --> End
//!      |
//!      +------confidence <  threshold--> WebSearch --> Evaluation? --> End
//! ```
//!
//! The web answer always replaces the document answer once web search runs.
//! Evaluation runs only when requested and only for non-degraded answers.

pub mod error;
pub mod router;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{AgentError, AgentResult};
pub use router::{ConfidenceRouter, DEGRADED_NOT_EVALUATED};
pub use state::{AgentState, AgentStep, RoutingPolicy, transition};
pub use types::{AgentResponse, AnswerSource, EvaluationStatus, ResponseMetadata};
