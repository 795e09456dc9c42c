//! The canonical world model and its mutation operations.
//!
//! `WorldState` owns everything the companion tracks for one chat
//! session: inventory, the NPC journal, quantified relationships,
//! location, and the clock. All mutation goes through the methods here so
//! the merge and accumulation rules live in one place. There are no
//! hidden globals - the state is an explicitly-owned value threaded
//! through the session.

use crate::clock::WorldClock;
use crate::directive::WorldDirective;
use crate::relationship::{RelationshipEntry, RelationshipTier};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Journal defaults for NPCs first mentioned without details.
const DEFAULT_NPC_STATUS: &str = "Known";
const DEFAULT_NPC_RELATION: &str = "Acquaintance";

/// Location defaults for a fresh session.
const DEFAULT_LOCATION: &str = "Unknown";
const DEFAULT_REGION: &str = "Starting Area";

// ============================================================================
// Entries
// ============================================================================

/// A stack of one named item. At most one entry exists per name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub name: String,
    /// Always at least 1; reaching 0 removes the entry instead.
    pub quantity: u32,
    pub description: String,
    /// Calendar date when the first unit was acquired.
    pub acquired_at: String,
}

/// Free-text status and notes for one NPC, independent of the quantified
/// relationship score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub status: String,
    pub notes: String,
    pub relation: String,
}

// ============================================================================
// World State
// ============================================================================

/// The complete world state for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    pub session_id: Uuid,
    pub location: String,
    /// Every location seen, in first-visit order, no duplicates.
    pub visited_locations: Vec<String>,
    pub current_region: Option<String>,
    /// Insertion order is acquisition order.
    pub inventory: Vec<InventoryItem>,
    /// Narrative notes keyed by NPC name.
    pub journal: HashMap<String, JournalEntry>,
    /// Quantified affection keyed by character name. Evolves
    /// independently of the journal.
    pub relationships: HashMap<String, RelationshipEntry>,
    pub clock: WorldClock,
}

impl WorldState {
    /// Fresh state for a new session.
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            location: DEFAULT_LOCATION.to_string(),
            visited_locations: Vec::new(),
            current_region: Some(DEFAULT_REGION.to_string()),
            inventory: Vec::new(),
            journal: HashMap::new(),
            relationships: HashMap::new(),
            clock: WorldClock::new(),
        }
    }

    // ------------------------------------------------------------------
    // Directive application
    // ------------------------------------------------------------------

    /// Apply one parsed directive.
    pub fn apply(&mut self, directive: WorldDirective) {
        match directive {
            WorldDirective::ItemGrant { name } => self.add_item(&name, 1, ""),
            WorldDirective::LocationChange { name } => self.set_location(&name, None),
            WorldDirective::NpcUpdate {
                name,
                relation,
                notes,
                status,
            } => self.update_journal(
                &name,
                relation.as_deref(),
                notes.as_deref(),
                status.as_deref(),
            ),
        }
    }

    /// Apply every directive in order. Returns how many were applied.
    pub fn apply_all(&mut self, directives: impl IntoIterator<Item = WorldDirective>) -> usize {
        let mut applied = 0;
        for directive in directives {
            self.apply(directive);
            applied += 1;
        }
        applied
    }

    // ------------------------------------------------------------------
    // Inventory
    // ------------------------------------------------------------------

    /// Add `quantity` of a named item. An existing stack grows; a new
    /// item is stamped with the current calendar date.
    pub fn add_item(&mut self, name: &str, quantity: u32, description: &str) {
        if quantity == 0 {
            return;
        }
        if let Some(existing) = self.inventory.iter_mut().find(|i| i.name == name) {
            existing.quantity += quantity;
            return;
        }
        self.inventory.push(InventoryItem {
            name: name.to_string(),
            quantity,
            description: description.to_string(),
            acquired_at: self.clock.date_string(),
        });
    }

    /// Remove up to `quantity` of a named item. The entry disappears when
    /// it reaches zero; an unknown name is a no-op.
    pub fn remove_item(&mut self, name: &str, quantity: u32) {
        if let Some(idx) = self.inventory.iter().position(|i| i.name == name) {
            if self.inventory[idx].quantity > quantity {
                self.inventory[idx].quantity -= quantity;
            } else {
                self.inventory.remove(idx);
            }
        }
    }

    /// Look up an item by name.
    pub fn find_item(&self, name: &str) -> Option<&InventoryItem> {
        self.inventory.iter().find(|i| i.name == name)
    }

    // ------------------------------------------------------------------
    // Location
    // ------------------------------------------------------------------

    /// Move to a named place, recording the first visit. The region only
    /// changes when one is given.
    pub fn set_location(&mut self, name: &str, region: Option<&str>) {
        self.location = name.to_string();
        if let Some(region) = region {
            self.current_region = Some(region.to_string());
        }
        if !self.visited_locations.iter().any(|v| v == name) {
            self.visited_locations.push(name.to_string());
        }
    }

    // ------------------------------------------------------------------
    // Journal
    // ------------------------------------------------------------------

    /// Create or update the journal entry for an NPC. Absent or blank
    /// fields keep their prior values - notes in particular are never
    /// erased by a blank update.
    pub fn update_journal(
        &mut self,
        name: &str,
        relation: Option<&str>,
        notes: Option<&str>,
        status: Option<&str>,
    ) {
        let entry = self
            .journal
            .entry(name.to_string())
            .or_insert_with(|| JournalEntry {
                status: DEFAULT_NPC_STATUS.to_string(),
                notes: String::new(),
                relation: DEFAULT_NPC_RELATION.to_string(),
            });

        if let Some(status) = status.filter(|s| !s.is_empty()) {
            entry.status = status.to_string();
        }
        if let Some(relation) = relation.filter(|r| !r.is_empty()) {
            entry.relation = relation.to_string();
        }
        if let Some(notes) = notes.filter(|n| !n.is_empty()) {
            entry.notes = notes.to_string();
        }
    }

    /// Look up a journal entry by NPC name.
    pub fn journal_entry(&self, name: &str) -> Option<&JournalEntry> {
        self.journal.get(name)
    }

    // ------------------------------------------------------------------
    // Relationships
    // ------------------------------------------------------------------

    /// Update the quantified relationship with a character, creating it
    /// on first reference with the current date as `met_at`.
    pub fn update_relationship(
        &mut self,
        name: &str,
        category: Option<RelationshipTier>,
        affection_delta: i32,
    ) {
        let met_at = self.clock.date_string();
        let entry = self
            .relationships
            .entry(name.to_string())
            .or_insert_with(|| RelationshipEntry::new(met_at));
        entry.apply(category, affection_delta);
    }

    /// Look up a relationship by character name.
    pub fn relationship(&self, name: &str) -> Option<&RelationshipEntry> {
        self.relationships.get(name)
    }

    // ------------------------------------------------------------------
    // Time
    // ------------------------------------------------------------------

    /// Accumulate in-world minutes. Whether time tracking is enabled at
    /// all is the session's decision; the state itself only ever moves
    /// forward.
    pub fn advance_time(&mut self, minutes: u64) {
        self.clock.advance(minutes);
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Replace everything with fresh defaults.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for WorldState {
    fn default() -> Self {
        Self::new()
    }
}
