//! StorySession - the primary public API.
//!
//! Wraps the world state, configuration, the persistence adapter and the
//! optional choice generator into the single entry point a host chat
//! application drives.

use crate::choices::{ChoiceGenerator, ChoiceSuggestion};
use crate::directive::{self, ChoiceOption};
use crate::persist::{BlobStore, PersistError};
use crate::relationship::RelationshipTier;
use crate::snapshot::RenderSnapshot;
use crate::world::WorldState;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// The only message role that carries directives.
const ASSISTANT_ROLE: &str = "assistant";

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("persistence error: {0}")]
    Persist(#[from] PersistError),
}

// ============================================================================
// Configuration
// ============================================================================

/// Tunable session behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Ask the generator for suggestions after each assistant message.
    pub auto_generate_choices: bool,

    /// How many suggestions to request (2-6).
    pub num_choices: u8,

    /// Whether player actions move the clock at all.
    pub enable_time_tracking: bool,

    /// Minutes the clock advances per player action (1-1440).
    pub time_progression_rate: u32,

    /// Key the state is persisted under.
    pub save_key: String,
}

impl SessionConfig {
    /// Defaults: auto-suggestions on, 4 choices, time tracking on at 30
    /// minutes per action.
    pub fn new() -> Self {
        Self {
            auto_generate_choices: true,
            num_choices: 4,
            enable_time_tracking: true,
            time_progression_rate: 30,
            save_key: "chronicle_state".to_string(),
        }
    }

    pub fn with_auto_generate_choices(mut self, enabled: bool) -> Self {
        self.auto_generate_choices = enabled;
        self
    }

    /// Set how many suggestions to request, clamped to 2-6.
    pub fn with_num_choices(mut self, count: u8) -> Self {
        self.num_choices = count.clamp(2, 6);
        self
    }

    pub fn with_time_tracking(mut self, enabled: bool) -> Self {
        self.enable_time_tracking = enabled;
        self
    }

    /// Set minutes per player action, clamped to 1-1440.
    pub fn with_time_progression_rate(mut self, minutes: u32) -> Self {
        self.time_progression_rate = minutes.clamp(1, 1440);
        self
    }

    pub fn with_save_key(mut self, key: impl Into<String>) -> Self {
        self.save_key = key.into();
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Turn Outcome
// ============================================================================

/// What one inbound narrative message produced.
#[derive(Debug, Clone, Default)]
pub struct TurnOutcome {
    /// Message text with update tags removed - what the host renders.
    pub visible_text: String,

    /// Choices the narrator embedded as `[Choice N]` lines, in order of
    /// appearance.
    pub choices: Vec<ChoiceOption>,

    /// Suggestions from the choice generator, when enabled.
    pub suggestions: Vec<ChoiceSuggestion>,

    /// How many update directives were applied.
    pub directives_applied: usize,
}

// ============================================================================
// Story Session
// ============================================================================

/// A chat-session companion tracking persistent world state.
///
/// Every mutating entry point takes `&mut self`, so a second inbound
/// message cannot interleave with an apply-and-persist cycle that has
/// not finished. Persistence runs once at the end of each mutating
/// batch, never mid-batch, and its failures are logged rather than
/// propagated - the in-memory state stays authoritative.
pub struct StorySession<S: BlobStore> {
    state: WorldState,
    config: SessionConfig,
    store: S,
    generator: Option<Box<dyn ChoiceGenerator>>,
}

impl<S: BlobStore> StorySession<S> {
    /// Start a session with fresh defaults.
    pub fn new(config: SessionConfig, store: S) -> Self {
        Self {
            state: WorldState::new(),
            config,
            store,
            generator: None,
        }
    }

    /// Start a session, restoring persisted state when a valid blob
    /// exists under the configured save key. Corrupt or unreadable blobs
    /// are logged and replaced with defaults.
    pub async fn restore(config: SessionConfig, store: S) -> Self {
        let state = match store.load(&config.save_key).await {
            Ok(Some(blob)) => match WorldState::from_json(&blob) {
                Ok(state) => state,
                Err(err) => {
                    warn!(%err, "saved state is corrupt, starting fresh");
                    WorldState::new()
                }
            },
            Ok(None) => WorldState::new(),
            Err(err) => {
                warn!(%err, "could not read saved state, starting fresh");
                WorldState::new()
            }
        };

        Self {
            state,
            config,
            store,
            generator: None,
        }
    }

    /// Attach a choice generator.
    pub fn with_generator(mut self, generator: Box<dyn ChoiceGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    // ------------------------------------------------------------------
    // Inbound events
    // ------------------------------------------------------------------

    /// Handle one inbound narrative message.
    ///
    /// Only assistant messages carry directives; any other role returns
    /// an outcome that echoes the text untouched.
    pub async fn process_message(&mut self, role: &str, text: &str) -> TurnOutcome {
        if role != ASSISTANT_ROLE {
            return TurnOutcome {
                visible_text: text.to_string(),
                ..TurnOutcome::default()
            };
        }

        let directives = directive::extract_updates(text);
        let directives_applied = self.state.apply_all(directives);
        if directives_applied > 0 {
            debug!(directives_applied, "applied update directives");
            self.persist().await;
        }

        let choices = directive::extract_choices(text);
        let suggestions = self.generate_suggestions().await;

        TurnOutcome {
            visible_text: directive::strip_directives(text),
            choices,
            suggestions,
            directives_applied,
        }
    }

    /// Record that the player committed an action: the clock advances by
    /// the configured rate (when time tracking is enabled) and the state
    /// is persisted.
    pub async fn record_player_action(&mut self) {
        if !self.config.enable_time_tracking {
            return;
        }
        self.state
            .advance_time(u64::from(self.config.time_progression_rate));
        self.persist().await;
    }

    // ------------------------------------------------------------------
    // Explicit world operations
    // ------------------------------------------------------------------

    /// Advance the in-world clock. Honors `enable_time_tracking`: when
    /// disabled this leaves the state entirely unchanged.
    pub async fn advance_time(&mut self, minutes: u64) {
        if !self.config.enable_time_tracking {
            return;
        }
        self.state.advance_time(minutes);
        self.persist().await;
    }

    pub async fn add_item(&mut self, name: &str, quantity: u32, description: &str) {
        self.state.add_item(name, quantity, description);
        self.persist().await;
    }

    pub async fn remove_item(&mut self, name: &str, quantity: u32) {
        self.state.remove_item(name, quantity);
        self.persist().await;
    }

    pub async fn update_relationship(
        &mut self,
        name: &str,
        category: Option<RelationshipTier>,
        affection_delta: i32,
    ) {
        self.state
            .update_relationship(name, category, affection_delta);
        self.persist().await;
    }

    pub async fn set_location(&mut self, name: &str, region: Option<&str>) {
        self.state.set_location(name, region);
        self.persist().await;
    }

    /// Discard all progress and return to defaults.
    pub async fn reset(&mut self) {
        self.state.reset();
        self.persist().await;
    }

    // ------------------------------------------------------------------
    // Export / import
    // ------------------------------------------------------------------

    /// Serialize the full state for an export file.
    pub fn export_state(&self) -> Result<String, SessionError> {
        Ok(self.state.to_json()?)
    }

    /// Replace the state wholesale from an export blob. A blob that
    /// fails to parse leaves the current state untouched.
    pub async fn import_state(&mut self, blob: &str) -> Result<(), SessionError> {
        let state = WorldState::from_json(blob)?;
        self.state = state;
        self.persist().await;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    /// Project the current state for rendering.
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::project(&self.state)
    }

    pub fn state(&self) -> &WorldState {
        &self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Persist the current state under the configured key. Failures are
    /// logged; the in-memory state stays authoritative.
    async fn persist(&mut self) {
        let blob = match self.state.to_json() {
            Ok(blob) => blob,
            Err(err) => {
                warn!(%err, "state serialization failed, skipping persist");
                return;
            }
        };
        if let Err(err) = self.store.save(&self.config.save_key, &blob).await {
            warn!(%err, "persisting state failed");
        }
    }

    async fn generate_suggestions(&self) -> Vec<ChoiceSuggestion> {
        if !self.config.auto_generate_choices {
            return Vec::new();
        }
        let generator = match &self.generator {
            Some(generator) => generator,
            None => return Vec::new(),
        };
        match generator.generate_choices(self.config.num_choices).await {
            Ok(suggestions) => suggestions,
            Err(err) => {
                warn!(%err, "choice generation failed");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryStore;

    #[test]
    fn test_config_clamps_ranges() {
        let config = SessionConfig::new()
            .with_num_choices(10)
            .with_time_progression_rate(0);
        assert_eq!(config.num_choices, 6);
        assert_eq!(config.time_progression_rate, 1);

        let config = SessionConfig::new()
            .with_num_choices(1)
            .with_time_progression_rate(100_000);
        assert_eq!(config.num_choices, 2);
        assert_eq!(config.time_progression_rate, 1440);
    }

    #[tokio::test]
    async fn test_non_assistant_messages_are_ignored() {
        let mut session = StorySession::new(SessionConfig::new(), MemoryStore::new());
        let outcome = session
            .process_message("user", r#"[DATA: {"item": "Fake"}]"#)
            .await;

        assert_eq!(outcome.directives_applied, 0);
        assert_eq!(outcome.visible_text, r#"[DATA: {"item": "Fake"}]"#);
        assert!(session.state().inventory.is_empty());
    }

    #[tokio::test]
    async fn test_assistant_message_applies_and_persists() {
        let mut session = StorySession::new(SessionConfig::new(), MemoryStore::new());
        let outcome = session
            .process_message(
                "assistant",
                r#"You reach the gate. [DATA: {"location": "City Gate"}]"#,
            )
            .await;

        assert_eq!(outcome.directives_applied, 1);
        assert_eq!(outcome.visible_text, "You reach the gate.");
        assert_eq!(session.state().location, "City Gate");

        // The batch was persisted under the configured key.
        let blob = session
            .store
            .load(&session.config().save_key)
            .await
            .unwrap()
            .expect("state should have been persisted");
        let persisted = WorldState::from_json(&blob).unwrap();
        assert_eq!(persisted.location, "City Gate");
    }

    #[tokio::test]
    async fn test_message_without_directives_does_not_persist() {
        let mut session = StorySession::new(SessionConfig::new(), MemoryStore::new());
        session.process_message("assistant", "Just prose.").await;
        assert!(session.store.is_empty().await);
    }

    #[tokio::test]
    async fn test_player_action_advances_time() {
        let config = SessionConfig::new().with_time_progression_rate(45);
        let mut session = StorySession::new(config, MemoryStore::new());
        let before = session.state().clock.total_minutes;

        session.record_player_action().await;
        assert_eq!(session.state().clock.total_minutes, before + 45);
    }

    #[tokio::test]
    async fn test_time_tracking_disabled_is_full_noop() {
        let config = SessionConfig::new().with_time_tracking(false);
        let mut session = StorySession::new(config, MemoryStore::new());
        let before = session.state().clone();

        session.record_player_action().await;
        session.advance_time(500).await;

        assert_eq!(session.state(), &before);
        assert!(session.store.is_empty().await);
    }

    #[tokio::test]
    async fn test_import_failure_retains_state() {
        let mut session = StorySession::new(SessionConfig::new(), MemoryStore::new());
        session.add_item("Lantern", 1, "").await;
        let before = session.state().clone();

        let result = session.import_state("{ broken").await;
        assert!(result.is_err());
        assert_eq!(session.state(), &before);
    }

    #[tokio::test]
    async fn test_import_replaces_wholesale() {
        let mut session = StorySession::new(SessionConfig::new(), MemoryStore::new());
        session.add_item("Lantern", 1, "").await;

        let mut other = WorldState::new();
        other.set_location("Elsewhere", None);
        let blob = other.to_json().unwrap();

        session.import_state(&blob).await.unwrap();
        assert_eq!(session.state(), &other);
        assert!(session.state().inventory.is_empty());
    }

    #[tokio::test]
    async fn test_restore_round_trip() {
        let store = MemoryStore::new();
        {
            let mut session = StorySession::new(SessionConfig::new(), &store);
            session.add_item("Compass", 1, "Points somewhere").await;
            session.set_location("Crossroads", None).await;
        }

        let session = StorySession::restore(SessionConfig::new(), &store).await;
        assert_eq!(session.state().location, "Crossroads");
        assert!(session.state().find_item("Compass").is_some());
    }

    #[tokio::test]
    async fn test_restore_with_corrupt_blob_starts_fresh() {
        let store = MemoryStore::new();
        store.save("chronicle_state", "{ broken").await.unwrap();

        let session = StorySession::restore(SessionConfig::new(), &store).await;
        assert_eq!(session.state().location, "Unknown");
    }
}
