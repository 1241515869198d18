use std::{
    collections::{BTreeMap, BTreeSet},
    error::Error,
    path::Path,
};

use figment::{
    providers::{Env, Format, Json},
    Figment,
};
use log::{debug, info};
use serde::Serialize;
use similar::TextDiff;

use crate::grid::{
    builder::{end_of, start_of},
    models::{Section, SectionType},
};

use super::models::Config;

pub fn load_config(config_json_path: &Path) -> Result<Config, Box<dyn Error>> {
    let config: Config = Figment::new()
        .merge(Json::file(config_json_path))
        .merge(Env::prefixed("GRID_"))
        .extract()?;
    info!(
        "Read config from {}",
        std::path::absolute(config_json_path)?.display()
    );
    Ok(config)
}

pub fn log_all_sections(sections: &[Section]) -> () {
    for section in sections.iter() {
        debug!(
            "Section {}: {} {:?} on {:?} {:?}-{:?} in {:?} by {:?}",
            section.id,
            section.label(),
            section.kind,
            section.day,
            section.start_time_hhmm.as_ref().or(section.start_time.as_ref()),
            section.end_time_hhmm.as_ref().or(section.end_time.as_ref()),
            section.room_name,
            section.faculty_name
        );
    }
}

fn contains_ignore_case(field: Option<&str>, needle: &str) -> bool {
    field.is_some_and(|value| value.to_lowercase().contains(needle))
}

/// Dashboard filter: a case-insensitive search over faculty name, course name
/// and course code, then an exact faculty match. Empty filters pass everything.
pub fn filter_sections(sections: &[Section], search: Option<&str>, faculty: Option<&str>) -> Vec<Section> {
    let needle = search
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());
    let faculty = faculty.filter(|f| !f.is_empty());
    sections
        .iter()
        .filter(|section| match &needle {
            Some(needle) => {
                contains_ignore_case(section.faculty_name.as_deref(), needle)
                    || contains_ignore_case(section.course_name.as_deref(), needle)
                    || contains_ignore_case(section.course_code.as_deref(), needle)
            }
            None => true,
        })
        .filter(|section| match faculty {
            Some(faculty) => section.faculty_name.as_deref() == Some(faculty),
            None => true,
        })
        .cloned()
        .collect()
}

fn count_kind(sections: &[&Section], kind: SectionType) -> usize {
    sections.iter().filter(|s| s.kind == Some(kind)).count()
}

/// Load committee overview of everything fetched.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct OverallStats {
    pub total_sections: usize,
    pub total_faculties: usize,
    pub total_courses: usize,
    pub total_levels: usize,
    pub lectures: usize,
    pub labs: usize,
    pub assigned_sections: usize,
    pub unassigned_sections: usize,
}

/// Teaching load of one faculty member.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FacultyStats {
    pub name: String,
    pub total_sections: usize,
    pub total_courses: usize,
    pub total_levels: usize,
    pub lectures: usize,
    pub labs: usize,
    pub days: usize,
    /// Rounded to one decimal.
    pub weekly_hours: f64,
    pub level_distribution: BTreeMap<String, usize>,
    pub course_distribution: BTreeMap<String, usize>,
}

/// Sorted, de-duplicated names of everyone teaching something.
pub fn unique_faculties(sections: &[Section]) -> Vec<String> {
    sections
        .iter()
        .filter_map(|s| s.faculty_name.clone())
        .filter(|name| !name.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn overall_stats(sections: &[Section]) -> OverallStats {
    let all: Vec<&Section> = sections.iter().collect();
    let assigned = sections
        .iter()
        .filter(|s| s.faculty_name.as_deref().is_some_and(|f| !f.is_empty()))
        .count();
    OverallStats {
        total_sections: sections.len(),
        total_faculties: unique_faculties(sections).len(),
        total_courses: sections.iter().map(|s| s.code()).collect::<BTreeSet<_>>().len(),
        total_levels: sections
            .iter()
            .map(|s| s.level_name.as_deref())
            .collect::<BTreeSet<_>>()
            .len(),
        lectures: count_kind(&all, SectionType::Lecture),
        labs: count_kind(&all, SectionType::Lab),
        assigned_sections: assigned,
        unassigned_sections: sections.len() - assigned,
    }
}

/// Scheduled hours of a section; zero when either end is unknown.
pub fn section_hours(section: &Section) -> f64 {
    match (start_of(section).time(), end_of(section).time()) {
        (Some(start), Some(end)) => (f64::from(end.minutes()) - f64::from(start.minutes())) / 60.0,
        _ => 0.0,
    }
}

/// `None` when `faculty` teaches nothing in `sections`.
pub fn faculty_stats(sections: &[Section], faculty: &str) -> Option<FacultyStats> {
    let taught: Vec<&Section> = sections
        .iter()
        .filter(|s| s.faculty_name.as_deref() == Some(faculty))
        .collect();
    if taught.is_empty() {
        return None;
    }

    let weekly_hours: f64 = taught.iter().map(|s| section_hours(s)).sum();

    let mut level_distribution = BTreeMap::new();
    let mut course_distribution = BTreeMap::new();
    for section in taught.iter() {
        let level = section.level_name.clone().unwrap_or_default();
        *level_distribution.entry(level).or_insert(0) += 1;
        let course = format!(
            "{} - {}",
            section.code(),
            section.course_name.as_deref().unwrap_or("")
        );
        *course_distribution.entry(course).or_insert(0) += 1;
    }

    Some(FacultyStats {
        name: faculty.to_owned(),
        total_sections: taught.len(),
        total_courses: course_distribution.len(),
        total_levels: level_distribution.len(),
        lectures: count_kind(&taught, SectionType::Lecture),
        labs: count_kind(&taught, SectionType::Lab),
        days: taught
            .iter()
            .map(|s| s.day.as_deref().map(str::trim))
            .collect::<BTreeSet<_>>()
            .len(),
        weekly_hours: (weekly_hours * 10.0).round() / 10.0,
        level_distribution,
        course_distribution,
    })
}

/// Unified diff between two renderings, or `None` when nothing changed.
pub fn diff_renderings(old: &str, new: &str) -> Option<String> {
    let diff = TextDiff::from_lines(old, new);
    if diff.ratio() != 1.0 {
        let pretty_diff = diff.unified_diff().header("previous", "current").to_string();
        debug!("Rendering changed:\n{}", pretty_diff);
        Some(pretty_diff)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
