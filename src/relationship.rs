//! Quantified NPC relationships and tier classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound for an affection score.
pub const AFFECTION_MIN: i32 = -100;

/// Upper bound for an affection score.
pub const AFFECTION_MAX: i32 = 100;

/// Discrete relationship standing, derived from an affection score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipTier {
    /// Pre-contact default; never produced by classification.
    Stranger,
    CloseFriend,
    Friend,
    Acquaintance,
    Neutral,
    Dislike,
    Rival,
    Enemy,
}

impl RelationshipTier {
    /// Classify an affection score. Thresholds are evaluated top to
    /// bottom; the first match wins.
    pub fn from_affection(affection: i32) -> Self {
        if affection > 70 {
            RelationshipTier::CloseFriend
        } else if affection > 40 {
            RelationshipTier::Friend
        } else if affection > 10 {
            RelationshipTier::Acquaintance
        } else if affection > -10 {
            RelationshipTier::Neutral
        } else if affection > -40 {
            RelationshipTier::Dislike
        } else if affection > -70 {
            RelationshipTier::Rival
        } else {
            RelationshipTier::Enemy
        }
    }

    /// Display label.
    pub fn name(&self) -> &'static str {
        match self {
            RelationshipTier::Stranger => "Stranger",
            RelationshipTier::CloseFriend => "Close Friend",
            RelationshipTier::Friend => "Friend",
            RelationshipTier::Acquaintance => "Acquaintance",
            RelationshipTier::Neutral => "Neutral",
            RelationshipTier::Dislike => "Dislike",
            RelationshipTier::Rival => "Rival",
            RelationshipTier::Enemy => "Enemy",
        }
    }

    /// Check if this tier reflects goodwill.
    pub fn is_positive(&self) -> bool {
        matches!(
            self,
            RelationshipTier::CloseFriend
                | RelationshipTier::Friend
                | RelationshipTier::Acquaintance
        )
    }

    /// Check if this tier reflects hostility.
    pub fn is_hostile(&self) -> bool {
        matches!(
            self,
            RelationshipTier::Dislike | RelationshipTier::Rival | RelationshipTier::Enemy
        )
    }
}

impl fmt::Display for RelationshipTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Quantified standing with a single character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipEntry {
    /// Current tier label.
    pub category: RelationshipTier,
    /// Affection score, clamped to [-100, 100].
    pub affection: i32,
    /// Calendar date of first contact.
    pub met_at: String,
    /// Update calls that have touched this entry.
    pub interactions: u32,
}

impl RelationshipEntry {
    /// A new entry at first contact.
    pub fn new(met_at: impl Into<String>) -> Self {
        Self {
            category: RelationshipTier::Stranger,
            affection: 0,
            met_at: met_at.into(),
            interactions: 0,
        }
    }

    /// Apply one update: add the delta, clamp, then re-derive the tier
    /// from the clamped score. A zero delta leaves affection alone and
    /// lets an explicit `category` through instead. Interactions count
    /// every call.
    pub fn apply(&mut self, category: Option<RelationshipTier>, affection_delta: i32) {
        if affection_delta != 0 {
            self.affection =
                (self.affection + affection_delta).clamp(AFFECTION_MIN, AFFECTION_MAX);
            self.category = RelationshipTier::from_affection(self.affection);
        } else if let Some(category) = category {
            self.category = category;
        }
        self.interactions += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(RelationshipTier::from_affection(100), RelationshipTier::CloseFriend);
        assert_eq!(RelationshipTier::from_affection(71), RelationshipTier::CloseFriend);
        assert_eq!(RelationshipTier::from_affection(70), RelationshipTier::Friend);
        assert_eq!(RelationshipTier::from_affection(41), RelationshipTier::Friend);
        assert_eq!(RelationshipTier::from_affection(40), RelationshipTier::Acquaintance);
        assert_eq!(RelationshipTier::from_affection(11), RelationshipTier::Acquaintance);
        assert_eq!(RelationshipTier::from_affection(10), RelationshipTier::Neutral);
        assert_eq!(RelationshipTier::from_affection(0), RelationshipTier::Neutral);
        assert_eq!(RelationshipTier::from_affection(-9), RelationshipTier::Neutral);
        assert_eq!(RelationshipTier::from_affection(-10), RelationshipTier::Dislike);
        assert_eq!(RelationshipTier::from_affection(-39), RelationshipTier::Dislike);
        assert_eq!(RelationshipTier::from_affection(-40), RelationshipTier::Rival);
        assert_eq!(RelationshipTier::from_affection(-69), RelationshipTier::Rival);
        assert_eq!(RelationshipTier::from_affection(-70), RelationshipTier::Enemy);
        assert_eq!(RelationshipTier::from_affection(-100), RelationshipTier::Enemy);
    }

    #[test]
    fn test_affection_clamps() {
        let mut entry = RelationshipEntry::new("1st of Spring, Year 1");
        entry.apply(None, 80);
        entry.apply(None, 80);
        assert_eq!(entry.affection, AFFECTION_MAX);
        assert_eq!(entry.category, RelationshipTier::CloseFriend);

        entry.apply(None, -500);
        assert_eq!(entry.affection, AFFECTION_MIN);
        assert_eq!(entry.category, RelationshipTier::Enemy);
    }

    #[test]
    fn test_explicit_category_on_zero_delta() {
        let mut entry = RelationshipEntry::new("1st of Spring, Year 1");
        entry.apply(Some(RelationshipTier::Rival), 0);
        assert_eq!(entry.category, RelationshipTier::Rival);
        assert_eq!(entry.affection, 0);
    }

    #[test]
    fn test_derived_category_wins_on_nonzero_delta() {
        let mut entry = RelationshipEntry::new("1st of Spring, Year 1");
        entry.apply(Some(RelationshipTier::Enemy), 50);
        assert_eq!(entry.category, RelationshipTier::Friend);
    }

    #[test]
    fn test_interactions_count_every_call() {
        let mut entry = RelationshipEntry::new("1st of Spring, Year 1");
        entry.apply(None, 0);
        entry.apply(None, 5);
        entry.apply(Some(RelationshipTier::Friend), 0);
        assert_eq!(entry.interactions, 3);
    }

    #[test]
    fn test_tier_polarity() {
        assert!(RelationshipTier::Friend.is_positive());
        assert!(!RelationshipTier::Friend.is_hostile());
        assert!(RelationshipTier::Rival.is_hostile());
        assert!(!RelationshipTier::Stranger.is_positive());
        assert!(!RelationshipTier::Neutral.is_hostile());
    }
}
