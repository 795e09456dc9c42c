//! The choice-generation collaborator.
//!
//! Producing action candidates is an external AI capability; the core
//! only consumes it through this trait and tolerates empty or failed
//! results.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from a choice generator.
#[derive(Debug, Error)]
pub enum ChoiceError {
    #[error("choice generation failed: {0}")]
    Generation(String),
}

/// One suggested player action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceSuggestion {
    /// Short action text, suitable for a button label.
    pub action: String,
    /// Longer description of what the action entails.
    pub description: String,
}

impl ChoiceSuggestion {
    pub fn new(action: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            description: description.into(),
        }
    }
}

/// Produces action candidates for the player.
///
/// `count` is how many suggestions the caller wants; the implementation
/// owns that contract and should return at most `count`. The session
/// renders whatever comes back - it neither truncates nor pads.
#[async_trait]
pub trait ChoiceGenerator: Send + Sync {
    async fn generate_choices(&self, count: u8) -> Result<Vec<ChoiceSuggestion>, ChoiceError>;
}
