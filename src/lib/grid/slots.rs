//! Fixed axes of the weekly grid: the teaching days and the one-hour slots.
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Teaching week, in display order.
pub const DAYS: [Day; 5] = [
    Day::Sunday,
    Day::Monday,
    Day::Tuesday,
    Day::Wednesday,
    Day::Thursday,
];

/// One-hour slots from 08:00 to 16:00, as `(start, end)` pairs.
pub const TIME_SLOTS: [(Hhmm, Hhmm); 8] = [
    (Hhmm::at(8, 0), Hhmm::at(9, 0)),
    (Hhmm::at(9, 0), Hhmm::at(10, 0)),
    (Hhmm::at(10, 0), Hhmm::at(11, 0)),
    (Hhmm::at(11, 0), Hhmm::at(12, 0)),
    (Hhmm::at(12, 0), Hhmm::at(13, 0)),
    (Hhmm::at(13, 0), Hhmm::at(14, 0)),
    (Hhmm::at(14, 0), Hhmm::at(15, 0)),
    (Hhmm::at(15, 0), Hhmm::at(16, 0)),
];

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Day {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Day {
    pub fn name(self) -> &'static str {
        match self {
            Day::Sunday => "Sunday",
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Day {
    type Err = ();

    /// Accepts any casing and surrounding whitespace ("monday", " MONDAY ").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let day = match s.trim().to_lowercase().as_str() {
            "sunday" => Day::Sunday,
            "monday" => Day::Monday,
            "tuesday" => Day::Tuesday,
            "wednesday" => Day::Wednesday,
            "thursday" => Day::Thursday,
            "friday" => Day::Friday,
            "saturday" => Day::Saturday,
            _ => return Err(()),
        };
        Ok(day)
    }
}

/// Time of day with minute precision, stored as minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hhmm(u16);

impl Hhmm {
    pub const fn at(hour: u16, minute: u16) -> Self {
        Hhmm(hour * 60 + minute)
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    /// The time `hours` later. Saturates instead of wrapping past midnight.
    pub fn plus_hours(self, hours: u16) -> Self {
        Hhmm(self.0.saturating_add(hours.saturating_mul(60)))
    }
}

impl fmt::Display for Hhmm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl FromStr for Hhmm {
    type Err = ();

    /// Reads the first two `:`-separated fields, so both "09:00" and
    /// "09:00:00" parse to the same value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split(':');
        let hour: u16 = parts.next().ok_or(())?.trim().parse().map_err(|_| ())?;
        let minute: u16 = parts.next().ok_or(())?.trim().parse().map_err(|_| ())?;
        if hour > 23 || minute > 59 {
            return Err(());
        }
        Ok(Hhmm::at(hour, minute))
    }
}

/// One column-row of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub start: Hhmm,
    pub end: Hhmm,
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// The axes a page renders against. Every page uses [`SlotTable::standard`];
/// the type exists so the builder does not hard-code the constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotTable {
    pub days: Vec<Day>,
    pub slots: Vec<TimeSlot>,
}

impl SlotTable {
    pub fn standard() -> Self {
        SlotTable {
            days: DAYS.to_vec(),
            slots: TIME_SLOTS
                .iter()
                .map(|&(start, end)| TimeSlot { start, end })
                .collect(),
        }
    }
}

impl Default for SlotTable {
    fn default() -> Self {
        Self::standard()
    }
}
