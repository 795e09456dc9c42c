//! Extraction of structured directives from narrative text.
//!
//! The narrator embeds machine-readable instructions in its prose using a
//! fixed wire format: update directives are `[DATA: {...}]` tags carrying
//! a JSON object, and choice directives are `[Choice N]: text` lines.
//! Everything here is a pure, total function over the raw message text -
//! malformed directive bodies are skipped, never fatal.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use tracing::warn;

lazy_static! {
    /// `[DATA: {...}]` update tags. Non-greedy so several tags in one
    /// message match separately.
    static ref DATA_TAG: Regex =
        Regex::new(r"\[DATA: (.*?)\]").expect("Failed to compile update tag regex");

    /// `[Choice N]: text` lines; the text runs to the end of the line.
    static ref CHOICE_TAG: Regex =
        Regex::new(r"\[Choice (\d)\]: (.*)").expect("Failed to compile choice tag regex");
}

// ============================================================================
// Parsed Forms
// ============================================================================

/// A structured world update extracted from narrative text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldDirective {
    /// Grant one unit of the named item.
    ItemGrant { name: String },
    /// Move to a named place.
    LocationChange { name: String },
    /// Create or update the journal entry for an NPC.
    NpcUpdate {
        name: String,
        relation: Option<String>,
        notes: Option<String>,
        status: Option<String>,
    },
}

/// A selectable action the narrator offered the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    /// The literal digit from the tag.
    pub index: u8,
    /// The remainder of the line.
    pub text: String,
}

/// Loosely-typed payload of one `[DATA: ...]` tag. Any combination of
/// fields may be present; each present field yields one directive.
#[derive(Debug, Deserialize)]
struct UpdatePayload {
    item: Option<String>,
    location: Option<String>,
    npc: Option<NpcPayload>,
}

#[derive(Debug, Deserialize)]
struct NpcPayload {
    name: String,
    relation: Option<String>,
    notes: Option<String>,
    status: Option<String>,
}

// ============================================================================
// Extraction
// ============================================================================

/// Extract every update directive in `text`, left to right.
///
/// A payload that fails to parse as JSON is logged and skipped; scanning
/// continues with the rest of the text.
pub fn extract_updates(text: &str) -> Vec<WorldDirective> {
    let mut directives = Vec::new();

    for caps in DATA_TAG.captures_iter(text) {
        let payload = &caps[1];
        let parsed: UpdatePayload = match serde_json::from_str(payload) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(payload, %err, "skipping malformed update directive");
                continue;
            }
        };

        if let Some(name) = parsed.item {
            directives.push(WorldDirective::ItemGrant { name });
        }
        if let Some(name) = parsed.location {
            directives.push(WorldDirective::LocationChange { name });
        }
        if let Some(npc) = parsed.npc {
            directives.push(WorldDirective::NpcUpdate {
                name: npc.name,
                relation: npc.relation,
                notes: npc.notes,
                status: npc.status,
            });
        }
    }

    directives
}

/// Extract `[Choice N]: ...` lines in order of appearance (not sorted by
/// index).
pub fn extract_choices(text: &str) -> Vec<ChoiceOption> {
    CHOICE_TAG
        .captures_iter(text)
        .map(|caps| ChoiceOption {
            index: caps[1].parse().unwrap_or(0),
            text: caps[2].trim().to_string(),
        })
        .collect()
}

/// Remove every update tag from `text` and trim the result. Choice lines
/// are left in place - the renderer decides what to do with those.
pub fn strip_directives(text: &str) -> String {
    DATA_TAG.replace_all(text, "").trim().to_string()
}
