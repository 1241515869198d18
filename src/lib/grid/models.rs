//! Section records as served by the scheduling REST API.
use std::fmt;

use serde::{Deserialize, Serialize};

pub mod section_model;

pub use section_model::{Section, SectionId};

/// Kind of meeting. The feed is not consistent about casing, so parsing is
/// case-insensitive and anything unknown lands in `Other`.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum SectionType {
    Lecture,
    Lab,
    Tutorial,
    Other,
}

impl From<String> for SectionType {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "lecture" => SectionType::Lecture,
            "lab" => SectionType::Lab,
            "tutorial" => SectionType::Tutorial,
            _ => SectionType::Other,
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SectionType::Lecture => "lecture",
            SectionType::Lab => "lab",
            SectionType::Tutorial => "tutorial",
            SectionType::Other => "other",
        };
        f.write_str(name)
    }
}

/// Review state a section goes through in the load committee.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(from = "String")]
pub enum SectionStatus {
    Draft,
    Accepted,
    Rejected,
    Unknown,
}

impl From<String> for SectionStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "draft" => SectionStatus::Draft,
            "accepted" => SectionStatus::Accepted,
            "rejected" => SectionStatus::Rejected,
            _ => SectionStatus::Unknown,
        }
    }
}

impl fmt::Display for SectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SectionStatus::Draft => "Draft",
            SectionStatus::Accepted => "Accepted",
            SectionStatus::Rejected => "Rejected",
            SectionStatus::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}
