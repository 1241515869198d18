//! Windows that can never be booked, whatever the data says.
//!
//! A blocked cell is still drawn (and still knows its section, if any); it is
//! only taken out of interaction. Nothing here filters or edits sections.
use serde::Serialize;

use super::slots::{Day, Hhmm, TimeSlot};

const NOON: Hhmm = Hhmm::at(12, 0);
const ONE_PM: Hhmm = Hhmm::at(13, 0);
const TWO_PM: Hhmm = Hhmm::at(14, 0);

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Lunch,
    ExamReview,
}

impl BlockKind {
    pub fn label(self) -> &'static str {
        match self {
            BlockKind::Lunch => "Lunch Break",
            BlockKind::ExamReview => "Exam Slot",
        }
    }
}

/// Lunch is 12:00-13:00 on every day.
pub fn is_lunch(start: Hhmm, end: Hhmm) -> bool {
    start == NOON && end == ONE_PM
}

/// Exam review takes 12:00-14:00 on Mondays and Wednesdays.
pub fn is_exam_window(day: Day, start: Hhmm, end: Hhmm) -> bool {
    matches!(day, Day::Monday | Day::Wednesday)
        && ((start == NOON && end == ONE_PM) || (start == ONE_PM && end == TWO_PM))
}

/// Decides which grid cells are blocked. Injected into the layout so that
/// pages without blocked windows (student, faculty) share the same builder.
pub trait WindowPolicy {
    fn blocked(&self, day: Day, slot: TimeSlot) -> Option<BlockKind>;
}

/// The faculty-wide policy: lunch every day, exam review on Mon/Wed.
/// Lunch wins where both apply.
#[derive(Debug, Clone, Copy, Default)]
pub struct CampusPolicy;

impl WindowPolicy for CampusPolicy {
    fn blocked(&self, day: Day, slot: TimeSlot) -> Option<BlockKind> {
        if is_lunch(slot.start, slot.end) {
            Some(BlockKind::Lunch)
        } else if is_exam_window(day, slot.start, slot.end) {
            Some(BlockKind::ExamReview)
        } else {
            None
        }
    }
}

/// Nothing is blocked.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenWeek;

impl WindowPolicy for OpenWeek {
    fn blocked(&self, _day: Day, _slot: TimeSlot) -> Option<BlockKind> {
        None
    }
}
