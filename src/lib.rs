//! Narrative world-state engine for AI-driven interactive fiction.
//!
//! This crate is the state-tracking companion for a chat-based story
//! session. It:
//! - parses structured update and choice directives out of freeform
//!   narrator text,
//! - applies them to a persistent world model (inventory, NPC journal,
//!   quantified relationships, location, clock) with well-defined merge
//!   rules,
//! - derives time-of-day, calendar date and relationship tiers from
//!   primitive counters,
//! - projects a deterministic snapshot for rendering.
//!
//! Rendering, storage backends and the AI choice generator are external
//! collaborators behind small traits.
//!
//! # Quick Start
//!
//! ```ignore
//! use chronicle_core::{MemoryStore, SessionConfig, StorySession};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut session = StorySession::new(SessionConfig::new(), MemoryStore::new());
//!
//!     let outcome = session
//!         .process_message(
//!             "assistant",
//!             "You enter the market. [DATA: {\"location\": \"Market Square\"}]",
//!         )
//!         .await;
//!
//!     println!("{}", outcome.visible_text);
//!     println!("Now at: {}", session.snapshot().location);
//! }
//! ```

pub mod choices;
pub mod clock;
pub mod directive;
pub mod persist;
pub mod relationship;
pub mod session;
pub mod snapshot;
pub mod testing;
pub mod world;

// Primary public API
pub use choices::{ChoiceError, ChoiceGenerator, ChoiceSuggestion};
pub use clock::{CalendarDate, Season, TimeOfDay, WorldClock};
pub use directive::{ChoiceOption, WorldDirective};
pub use persist::{BlobStore, FileStore, MemoryStore, PersistError};
pub use relationship::{RelationshipEntry, RelationshipTier};
pub use session::{SessionConfig, SessionError, StorySession, TurnOutcome};
pub use snapshot::RenderSnapshot;
pub use testing::{MockChoiceGenerator, TestHarness};
pub use world::{InventoryItem, JournalEntry, WorldState};
