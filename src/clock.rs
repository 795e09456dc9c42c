//! In-world time and calendar derivation.
//!
//! The clock stores a single accumulated minute counter. Time-of-day and
//! the calendar date are derived from it on every read, so displays and
//! the dates stamped onto new entries can never drift apart.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Minutes in one in-world day.
const MINUTES_PER_DAY: u64 = 24 * 60;

/// Days in one season.
const DAYS_PER_SEASON: u64 = 30;

// ============================================================================
// Time of Day
// ============================================================================

/// Broad phase of the day, derived from the hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeOfDay {
    Night,
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    /// Classify an hour of the day (0-23).
    pub fn from_hour(hour: u8) -> Self {
        match hour {
            0..=5 => TimeOfDay::Night,
            6..=11 => TimeOfDay::Morning,
            12..=17 => TimeOfDay::Afternoon,
            _ => TimeOfDay::Evening,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TimeOfDay::Night => "Night",
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Afternoon => "Afternoon",
            TimeOfDay::Evening => "Evening",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Seasons and Dates
// ============================================================================

/// The four seasons, cycling in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub fn all() -> [Season; 4] {
        [Season::Spring, Season::Summer, Season::Autumn, Season::Winter]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A fully-derived calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDate {
    /// Day within the season (1-30).
    pub day: u32,
    pub season: Season,
    /// Years start at 1.
    pub year: u32,
}

impl CalendarDate {
    /// English ordinal suffix: 11-13 always take "th", otherwise the last
    /// digit decides.
    fn day_suffix(day: u32) -> &'static str {
        if (11..=13).contains(&(day % 100)) {
            return "th";
        }
        match day % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        }
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} of {}, Year {}",
            self.day,
            Self::day_suffix(self.day),
            self.season,
            self.year
        )
    }
}

// ============================================================================
// World Clock
// ============================================================================

/// Accumulated in-world time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldClock {
    /// Total minutes elapsed since midnight on the 1st of Spring, Year 1.
    /// Monotonically non-decreasing; everything else is derived from it.
    pub total_minutes: u64,
}

impl WorldClock {
    /// A fresh clock reads 8:00 on the 1st of Spring, Year 1.
    pub fn new() -> Self {
        Self {
            total_minutes: 8 * 60,
        }
    }

    /// A clock at an arbitrary minute count.
    pub fn at(total_minutes: u64) -> Self {
        Self { total_minutes }
    }

    pub fn advance(&mut self, minutes: u64) {
        self.total_minutes += minutes;
    }

    /// Hour of the current day (0-23).
    pub fn hour(&self) -> u8 {
        ((self.total_minutes / 60) % 24) as u8
    }

    /// Minute within the current hour (0-59).
    pub fn minute(&self) -> u8 {
        (self.total_minutes % 60) as u8
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from_hour(self.hour())
    }

    /// Derive the calendar date from the minute counter.
    pub fn date(&self) -> CalendarDate {
        let days = self.total_minutes / MINUTES_PER_DAY;
        CalendarDate {
            day: (days % DAYS_PER_SEASON) as u32 + 1,
            season: Season::all()[((days / DAYS_PER_SEASON) % 4) as usize],
            year: (days / (DAYS_PER_SEASON * 4)) as u32 + 1,
        }
    }

    /// The date formatted for display and for stamping onto new entries.
    pub fn date_string(&self) -> String {
        self.date().to_string()
    }
}

impl Default for WorldClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_clock_is_first_morning() {
        let clock = WorldClock::new();
        assert_eq!(clock.time_of_day(), TimeOfDay::Morning);
        assert_eq!(clock.date_string(), "1st of Spring, Year 1");
    }

    #[test]
    fn test_time_of_day_boundaries() {
        assert_eq!(TimeOfDay::from_hour(0), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(6), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(11), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(17), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(18), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(23), TimeOfDay::Evening);
    }

    #[test]
    fn test_hour_23_is_evening() {
        let clock = WorldClock::at(23 * 60 + 15);
        assert_eq!(clock.hour(), 23);
        assert_eq!(clock.time_of_day(), TimeOfDay::Evening);
    }

    #[test]
    fn test_season_boundary() {
        // Exactly 30 days in: first day of Summer.
        let clock = WorldClock::at(MINUTES_PER_DAY * 30);
        assert_eq!(clock.date_string(), "1st of Summer, Year 1");
    }

    #[test]
    fn test_year_rollover() {
        // Four full seasons later the year ticks over, back to Spring.
        let clock = WorldClock::at(MINUTES_PER_DAY * 120);
        assert_eq!(clock.date_string(), "1st of Spring, Year 2");
    }

    #[test]
    fn test_ordinal_suffixes() {
        let day = |d: u64| WorldClock::at(MINUTES_PER_DAY * (d - 1)).date_string();
        assert_eq!(day(1), "1st of Spring, Year 1");
        assert_eq!(day(2), "2nd of Spring, Year 1");
        assert_eq!(day(3), "3rd of Spring, Year 1");
        assert_eq!(day(4), "4th of Spring, Year 1");
        assert_eq!(day(11), "11th of Spring, Year 1");
        assert_eq!(day(12), "12th of Spring, Year 1");
        assert_eq!(day(13), "13th of Spring, Year 1");
        assert_eq!(day(21), "21st of Spring, Year 1");
        assert_eq!(day(22), "22nd of Spring, Year 1");
        assert_eq!(day(23), "23rd of Spring, Year 1");
        assert_eq!(day(30), "30th of Spring, Year 1");
    }

    #[test]
    fn test_advance_accumulates() {
        let mut clock = WorldClock::new();
        clock.advance(90);
        assert_eq!(clock.hour(), 9);
        assert_eq!(clock.minute(), 30);
    }

    #[test]
    fn test_derivation_is_stable() {
        let clock = WorldClock::at(12345);
        assert_eq!(clock.date(), clock.date());
        assert_eq!(clock.time_of_day(), clock.time_of_day());
    }
}
