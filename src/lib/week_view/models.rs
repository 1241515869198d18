use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::grid::models::Section;

pub mod payload_model;

/// A model for describing ARGS of the tool.
/// Consists of:
/// 1. Path to config.json, that contains the API location and polling settings.
/// 2. Output format and optional output file (stdout when absent).
/// 3. Watch flag: keep polling and re-render on every change.
/// 4. Optional search term and faculty filter, as on the committee dashboards.
/// 5. The view to render.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, value_name = "FILE", default_value = "config.json")]
    pub config_json_path: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
    #[arg(long)]
    pub watch: bool,
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub faculty: Option<String>,
    #[command(subcommand)]
    pub view: View,
}

/// Whose sections to show.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// A student's personal timetable.
    Student {
        #[arg(long)]
        user_id: u64,
    },
    /// A faculty member's teaching timetable.
    Faculty {
        #[arg(long)]
        faculty_id: u64,
    },
    /// The schedule-builder view of one level, optionally narrowed to a group.
    Level {
        #[arg(long)]
        level_id: u64,
        #[arg(long)]
        group_id: Option<u64>,
    },
    /// Every section (load committee). With --levels, one request per level.
    All {
        #[arg(long, value_delimiter = ',')]
        levels: Vec<u64>,
    },
}

impl View {
    /// Only the schedule builder shows lunch and exam windows; it also colors
    /// by review status instead of by course.
    pub fn is_builder(&self) -> bool {
        matches!(self, View::Level { .. })
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Weekly grid for the terminal.
    Text,
    /// Weekly grid as an HTML table.
    Html,
    /// One line per section.
    Details,
    /// Committee statistics as JSON.
    Stats,
}

fn default_poll_interval_secs() -> u64 {
    30
}

/// A model for describing configuration of the tool.
/// Consists of:
/// 1. Base URL of the scheduling API, without a trailing slash
/// 2. Optional bearer token sent with every request
/// 3. Seconds between polls in watch mode
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

/// What one fetch brings back: the sections, plus the display name of whoever
/// owns the timetable when the endpoint reports it.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct SectionPage {
    pub sections: Vec<Section>,
    pub owner: Option<String>,
}
