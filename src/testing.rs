//! Testing utilities.
//!
//! This module provides tools for integration testing:
//! - `MockChoiceGenerator` for deterministic tests without an AI call
//! - `TestHarness` bundling a session with an in-memory store
//! - Assertion helpers for verifying world state

use crate::choices::{ChoiceError, ChoiceGenerator, ChoiceSuggestion};
use crate::persist::MemoryStore;
use crate::relationship::RelationshipTier;
use crate::session::{SessionConfig, StorySession, TurnOutcome};
use crate::snapshot::RenderSnapshot;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One scripted generator response.
#[derive(Debug, Clone)]
pub enum MockChoices {
    /// Return these suggestions.
    Suggestions(Vec<ChoiceSuggestion>),
    /// Fail with the given message.
    Failure(String),
}

/// A choice generator that returns scripted responses in order.
///
/// Once the script runs out it returns empty suggestion lists, which the
/// session renders as "no suggestions".
#[derive(Debug, Default)]
pub struct MockChoiceGenerator {
    responses: Mutex<VecDeque<MockChoices>>,
}

impl MockChoiceGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response built from `(action, description)`
    /// pairs.
    pub fn suggest(mut self, pairs: &[(&str, &str)]) -> Self {
        let suggestions = pairs
            .iter()
            .map(|(action, description)| ChoiceSuggestion::new(*action, *description))
            .collect();
        self.responses
            .get_mut()
            .expect("mock script lock poisoned")
            .push_back(MockChoices::Suggestions(suggestions));
        self
    }

    /// Queue a failure.
    pub fn fail(mut self, message: &str) -> Self {
        self.responses
            .get_mut()
            .expect("mock script lock poisoned")
            .push_back(MockChoices::Failure(message.to_string()));
        self
    }
}

#[async_trait]
impl ChoiceGenerator for MockChoiceGenerator {
    async fn generate_choices(&self, count: u8) -> Result<Vec<ChoiceSuggestion>, ChoiceError> {
        let next = self
            .responses
            .lock()
            .expect("mock script lock poisoned")
            .pop_front();
        match next {
            Some(MockChoices::Suggestions(mut suggestions)) => {
                // The collaborator owns the count contract.
                suggestions.truncate(count as usize);
                Ok(suggestions)
            }
            Some(MockChoices::Failure(message)) => Err(ChoiceError::Generation(message)),
            None => Ok(Vec::new()),
        }
    }
}

/// Test harness for running session scenarios against an in-memory
/// store.
pub struct TestHarness {
    pub session: StorySession<MemoryStore>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(SessionConfig::new())
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            session: StorySession::new(config, MemoryStore::new()),
        }
    }

    /// Attach a scripted generator.
    pub fn with_generator(mut self, generator: MockChoiceGenerator) -> Self {
        self.session = self.session.with_generator(Box::new(generator));
        self
    }

    /// Feed one assistant message through the session.
    pub async fn narrate(&mut self, text: &str) -> TurnOutcome {
        self.session.process_message("assistant", text).await
    }

    /// Project the current state.
    pub fn snapshot(&self) -> RenderSnapshot {
        self.session.snapshot()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert the inventory holds exactly `quantity` of `name`.
#[track_caller]
pub fn assert_has_item(harness: &TestHarness, name: &str, quantity: u32) {
    let item = harness.session.state().find_item(name);
    match item {
        Some(item) => assert_eq!(
            item.quantity, quantity,
            "Expected {quantity} of '{name}', got {}",
            item.quantity
        ),
        None => panic!("Expected item '{name}' to exist"),
    }
}

/// Assert no item with this name exists.
#[track_caller]
pub fn assert_no_item(harness: &TestHarness, name: &str) {
    assert!(
        harness.session.state().find_item(name).is_none(),
        "Expected item '{name}' to NOT exist"
    );
}

/// Assert the current location.
#[track_caller]
pub fn assert_location(harness: &TestHarness, name: &str) {
    assert_eq!(
        harness.session.state().location,
        name,
        "Expected location '{name}'"
    );
}

/// Assert a character's relationship tier.
#[track_caller]
pub fn assert_tier(harness: &TestHarness, name: &str, tier: RelationshipTier) {
    match harness.session.state().relationship(name) {
        Some(entry) => assert_eq!(
            entry.category, tier,
            "Expected '{name}' at tier {tier}, got {}",
            entry.category
        ),
        None => panic!("Expected relationship with '{name}' to exist"),
    }
}
