//! Module with section model compatible with the scheduling backend's REST API
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{SectionStatus, SectionType};

/// The backend hands out both numeric and string identifiers.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(untagged)]
pub enum SectionId {
    Number(u64),
    Text(String),
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionId::Number(n) => write!(f, "{}", n),
            SectionId::Text(s) => f.write_str(s),
        }
    }
}

/// One scheduled meeting of a course.
/// Only `id` is mandatory; every other field degrades to "missing" so that a
/// sparse record still lands somewhere sensible in the grid.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Section {
    pub id: SectionId,
    #[serde(default)]
    pub course_code: Option<String>,
    #[serde(default)]
    pub course_name: Option<String>,
    #[serde(default)]
    pub section_number: Option<u32>,
    #[serde(rename = "type", default)]
    pub kind: Option<SectionType>,
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub start_time_hhmm: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time_hhmm: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub room_name: Option<String>,
    #[serde(default)]
    pub faculty_name: Option<String>,
    #[serde(default)]
    pub level_name: Option<String>,
    #[serde(default)]
    pub status: Option<SectionStatus>,
}

impl Section {
    pub fn code(&self) -> &str {
        self.course_code.as_deref().unwrap_or("")
    }

    /// Course code, falling back to the course name for untitled drafts.
    pub fn label(&self) -> &str {
        match self.course_code.as_deref() {
            Some(code) if !code.is_empty() => code,
            _ => self.course_name.as_deref().unwrap_or(""),
        }
    }

    pub fn is_lab(&self) -> bool {
        self.kind == Some(SectionType::Lab)
    }
}
