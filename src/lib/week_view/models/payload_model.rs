//! Response bodies of the section endpoints.
use serde::Deserialize;

use crate::grid::models::Section;

use super::SectionPage;

#[derive(Deserialize, Debug)]
pub struct PersonInfo {
    #[serde(default)]
    pub name: Option<String>,
}

/// `GET /sections/schedule/{user_id}`
#[derive(Deserialize, Debug)]
pub struct StudentSchedule {
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub student: Option<PersonInfo>,
}

/// `GET /sections/faculty/{faculty_id}`, which answers either wrapped or bare.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum FacultySchedule {
    Wrapped {
        #[serde(default)]
        sections: Vec<Section>,
        #[serde(rename = "facultyName", default)]
        faculty_name: Option<String>,
    },
    Bare(Vec<Section>),
}

impl From<StudentSchedule> for SectionPage {
    fn from(schedule: StudentSchedule) -> Self {
        SectionPage {
            sections: schedule.sections,
            owner: schedule.student.and_then(|s| s.name),
        }
    }
}

impl From<FacultySchedule> for SectionPage {
    fn from(schedule: FacultySchedule) -> Self {
        match schedule {
            FacultySchedule::Wrapped {
                sections,
                faculty_name,
            } => SectionPage {
                sections,
                owner: faculty_name,
            },
            FacultySchedule::Bare(sections) => SectionPage {
                sections,
                owner: None,
            },
        }
    }
}
