//! Weekly grid construction and the layout pages render from.
use std::collections::BTreeMap;

use log::{debug, warn};

use super::{
    blocked::{BlockKind, WindowPolicy},
    models::Section,
    slots::{Day, Hhmm, SlotTable, TimeSlot},
};

/// Result of reading a time off a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    At(Hhmm),
    /// No field held a usable time. Such a section never gets a grid cell.
    Unresolved,
}

impl Resolved {
    pub fn time(self) -> Option<Hhmm> {
        match self {
            Resolved::At(t) => Some(t),
            Resolved::Unresolved => None,
        }
    }
}

pub type TimeField = fn(&Section) -> Option<&str>;

fn start_hhmm(s: &Section) -> Option<&str> {
    s.start_time_hhmm.as_deref()
}

fn start_long(s: &Section) -> Option<&str> {
    s.start_time.as_deref()
}

fn end_hhmm(s: &Section) -> Option<&str> {
    s.end_time_hhmm.as_deref()
}

fn end_long(s: &Section) -> Option<&str> {
    s.end_time.as_deref()
}

/// Where to look for the start time, most preferred first.
pub const START_TIME_FIELDS: [TimeField; 2] = [start_hhmm, start_long];
/// Where to look for the end time, most preferred first.
pub const END_TIME_FIELDS: [TimeField; 2] = [end_hhmm, end_long];

/// Tries `fields` in order; the first non-blank value decides the outcome.
pub fn resolve_time(section: &Section, fields: &[TimeField]) -> Resolved {
    let raw = fields
        .iter()
        .filter_map(|field| field(section))
        .find(|value| !value.trim().is_empty());
    match raw.map(str::parse::<Hhmm>) {
        Some(Ok(time)) => Resolved::At(time),
        _ => Resolved::Unresolved,
    }
}

pub fn start_of(section: &Section) -> Resolved {
    resolve_time(section, &START_TIME_FIELDS)
}

pub fn end_of(section: &Section) -> Resolved {
    resolve_time(section, &END_TIME_FIELDS)
}

pub fn day_of(section: &Section) -> Option<Day> {
    section.day.as_deref()?.parse().ok()
}

/// Sections indexed by day and start time.
/// A multi-slot section only appears under its start time; the slots it
/// spills into are absent on purpose.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Grid<'a> {
    days: BTreeMap<Day, BTreeMap<Hhmm, &'a Section>>,
    unplaced: Vec<&'a Section>,
}

impl<'a> Grid<'a> {
    pub fn get(&self, day: Day, start: Hhmm) -> Option<&'a Section> {
        self.days.get(&day)?.get(&start).copied()
    }

    /// All sections of a day with their start keys, earliest first.
    pub fn day(&self, day: Day) -> impl Iterator<Item = (Hhmm, &'a Section)> + '_ {
        self.days
            .get(&day)
            .into_iter()
            .flat_map(|column| column.iter().map(|(&start, &section)| (start, section)))
    }

    /// Sections whose day or start time could not be resolved, in input order.
    pub fn unplaced(&self) -> &[&'a Section] {
        &self.unplaced
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.days.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Indexes `sections` by (day, start). When two sections share a key the
/// later one in `sections` wins.
pub fn build_grid(sections: &[Section]) -> Grid<'_> {
    let mut grid = Grid::default();
    for section in sections {
        match (day_of(section), start_of(section)) {
            (Some(day), Resolved::At(start)) => {
                if let Some(previous) = grid.days.entry(day).or_default().insert(start, section) {
                    warn!(
                        "Section {} replaces section {} at {} {}",
                        section.id, previous.id, day, start
                    );
                }
            }
            _ => {
                debug!(
                    "Section {} has no usable day/start ({:?}, {:?})",
                    section.id, section.day, section.start_time_hhmm
                );
                grid.unplaced.push(section);
            }
        }
    }
    grid
}

/// Number of one-hour slots a section is drawn across. Labs always take two.
pub fn span_for(section: &Section) -> u16 {
    if section.is_lab() {
        return 2;
    }
    match (start_of(section), end_of(section)) {
        (Resolved::At(start), Resolved::At(end)) if end > start => {
            ((end.minutes() - start.minutes()) / 60).max(1)
        }
        _ => 1,
    }
}

/// Whether the slot starting at `slot_start` is already drawn by an earlier
/// section of the same day that spans into it.
pub fn is_covered(day: Day, slot_start: Hhmm, grid: &Grid<'_>) -> bool {
    grid.day(day).any(|(start, section)| {
        start < slot_start && start.plus_hours(span_for(section)) > slot_start
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellContent<'a> {
    Occupied(&'a Section),
    /// Blocked cells still carry whatever section sits there.
    Blocked(BlockKind, Option<&'a Section>),
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell<'a> {
    pub day: Day,
    pub slot: TimeSlot,
    /// Rows this cell stretches over; 1 unless a section starts here.
    pub span: u16,
    pub content: CellContent<'a>,
}

impl<'a> GridCell<'a> {
    pub fn section(&self) -> Option<&'a Section> {
        match self.content {
            CellContent::Occupied(section) => Some(section),
            CellContent::Blocked(_, section) => section,
            CellContent::Empty => None,
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self.content, CellContent::Blocked(..))
    }
}

/// One table row. Cells covered by a section above are left out, so a row
/// may hold fewer cells than there are days.
#[derive(Debug, Clone, PartialEq)]
pub struct GridRow<'a> {
    pub slot: TimeSlot,
    pub cells: Vec<GridCell<'a>>,
}

/// Walks `table` slot by slot, day by day, and emits the cells to draw.
pub fn layout<'a, P: WindowPolicy + ?Sized>(
    grid: &Grid<'a>,
    table: &SlotTable,
    policy: &P,
) -> Vec<GridRow<'a>> {
    table
        .slots
        .iter()
        .map(|&slot| {
            let cells = table
                .days
                .iter()
                .filter(|&&day| !is_covered(day, slot.start, grid))
                .map(|&day| {
                    let section = grid.get(day, slot.start);
                    let span = section.map(span_for).unwrap_or(1);
                    let content = match (policy.blocked(day, slot), section) {
                        (Some(kind), section) => CellContent::Blocked(kind, section),
                        (None, Some(section)) => CellContent::Occupied(section),
                        (None, None) => CellContent::Empty,
                    };
                    GridCell {
                        day,
                        slot,
                        span,
                        content,
                    }
                })
                .collect();
            GridRow { slot, cells }
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
