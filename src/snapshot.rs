//! Read-only projection of the world state for rendering.
//!
//! External renderers never see `WorldState` directly; they get a flat,
//! fully-resolved snapshot with every derived field already computed.

use crate::world::WorldState;
use serde::{Deserialize, Serialize};

/// One inventory line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemView {
    pub name: String,
    pub quantity: u32,
    pub description: String,
    pub acquired_at: String,
}

/// One journal line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalView {
    pub name: String,
    pub status: String,
    pub notes: String,
    pub relation: String,
}

/// One relationship line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipView {
    pub name: String,
    /// Tier label, display-ready.
    pub category: String,
    pub affection: i32,
    pub met_at: String,
    pub interactions: u32,
}

/// A fully-resolved, serializable view of the world at one instant.
///
/// Projection never mutates state, and two consecutive projections with
/// no mutation in between are structurally equal: the map-backed sections
/// are sorted by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub location: String,
    pub region: Option<String>,
    /// Derived calendar date, e.g. "3rd of Summer, Year 2".
    pub date: String,
    /// Derived time-of-day label.
    pub time_of_day: String,
    pub inventory: Vec<ItemView>,
    pub journal: Vec<JournalView>,
    pub relationships: Vec<RelationshipView>,
    pub visited_count: usize,
    pub visited_locations: Vec<String>,
}

impl RenderSnapshot {
    /// Project the current state into a render-ready view.
    pub fn project(state: &WorldState) -> Self {
        let inventory = state
            .inventory
            .iter()
            .map(|item| ItemView {
                name: item.name.clone(),
                quantity: item.quantity,
                description: item.description.clone(),
                acquired_at: item.acquired_at.clone(),
            })
            .collect();

        let mut journal: Vec<JournalView> = state
            .journal
            .iter()
            .map(|(name, entry)| JournalView {
                name: name.clone(),
                status: entry.status.clone(),
                notes: entry.notes.clone(),
                relation: entry.relation.clone(),
            })
            .collect();
        journal.sort_by(|a, b| a.name.cmp(&b.name));

        let mut relationships: Vec<RelationshipView> = state
            .relationships
            .iter()
            .map(|(name, entry)| RelationshipView {
                name: name.clone(),
                category: entry.category.name().to_string(),
                affection: entry.affection,
                met_at: entry.met_at.clone(),
                interactions: entry.interactions,
            })
            .collect();
        relationships.sort_by(|a, b| a.name.cmp(&b.name));

        Self {
            location: state.location.clone(),
            region: state.current_region.clone(),
            date: state.clock.date_string(),
            time_of_day: state.clock.time_of_day().name().to_string(),
            inventory,
            journal,
            relationships,
            visited_count: state.visited_locations.len(),
            visited_locations: state.visited_locations.clone(),
        }
    }
}
