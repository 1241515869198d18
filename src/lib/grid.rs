//! Weekly timetable grid: turns a flat list of sections into a day x slot
//! table with row spans for multi-hour meetings.
//!
//! Everything in here is pure and recomputed from scratch on every render.
pub mod blocked;
pub mod builder;
pub mod color;
pub mod models;
pub mod slots;

pub use blocked::{BlockKind, CampusPolicy, OpenWeek, WindowPolicy};
pub use builder::{build_grid, is_covered, layout, span_for, CellContent, Grid, GridCell, GridRow};
pub use color::{color_for, text_color_for};
pub use models::{Section, SectionId, SectionStatus, SectionType};
pub use slots::{Day, Hhmm, SlotTable, TimeSlot, DAYS, TIME_SLOTS};
