//! Turns a laid-out grid into something to look at.
use std::fmt::Write;

use crate::grid::{
    blocked::BlockKind,
    builder::{end_of, start_of, CellContent, GridCell, GridRow},
    color::{color_for, text_color_for},
    models::{Section, SectionStatus},
    slots::{Hhmm, SlotTable},
};

const TEXT_CELL_WIDTH: usize = 16;
const EMPTY_BG: &str = "#FFFFFF";
const ROW_HEIGHT_PX: u16 = 72;

/// How occupied cells get their background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    /// Hash of the course code (student, faculty, committee pages).
    Course,
    /// Review status (schedule builder).
    Status,
}

/// `(background, text)` for a section under the status palette.
pub fn status_colors(status: Option<SectionStatus>) -> (&'static str, &'static str) {
    match status {
        Some(SectionStatus::Accepted) => ("#dcfce7", "#166534"),
        Some(SectionStatus::Rejected) => ("#fee2e2", "#991b1b"),
        Some(SectionStatus::Draft) => ("#f3f4f6", "#374151"),
        _ => ("transparent", "#000"),
    }
}

fn blocked_background(kind: BlockKind) -> &'static str {
    match kind {
        BlockKind::Lunch => "rgba(253, 230, 138, 0.5)",
        BlockKind::ExamReview => "rgba(252, 165, 165, 0.4)",
    }
}

pub fn cell_colors(cell: &GridCell<'_>, palette: Palette) -> (&'static str, &'static str) {
    match (cell.content, palette) {
        (CellContent::Blocked(kind, _), _) => (blocked_background(kind), "#000"),
        (CellContent::Occupied(section), Palette::Course) => {
            let bg = color_for(section.code());
            (bg, text_color_for(bg))
        }
        (CellContent::Occupied(section), Palette::Status) => status_colors(section.status),
        (CellContent::Empty, _) => (EMPTY_BG, text_color_for(EMPTY_BG)),
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn kind_label(section: &Section) -> String {
    section
        .kind
        .map(|k| k.to_string())
        .unwrap_or_else(|| "-".to_owned())
}

fn time_range(section: &Section) -> String {
    let show = |t: Option<Hhmm>| t.map(|t| t.to_string()).unwrap_or_else(|| "?".to_owned());
    format!("{}-{}", show(start_of(section).time()), show(end_of(section).time()))
}

/* form html of one occupied cell */
fn format_section_html(section: &Section) -> String {
    let mut html = format!("<b>{}</b><br>", escape_html(section.label()));
    let number = section
        .section_number
        .map(|n| n.to_string())
        .unwrap_or_else(|| "?".to_owned());
    html.push_str(&format!(
        "<small>Sec {} &bull; {}</small>",
        number,
        escape_html(&kind_label(section))
    ));
    if let Some(room) = section.room_name.as_deref().filter(|r| !r.is_empty()) {
        html.push_str(&format!("<br><small>{}</small>", escape_html(room)));
    }
    if let Some(faculty) = section.faculty_name.as_deref().filter(|f| !f.is_empty()) {
        html.push_str(&format!("<br><small>{}</small>", escape_html(faculty)));
    }
    if let Some(status) = section.status {
        html.push_str(&format!("<br><small><b>{}</b></small>", status));
    }
    html
}

/// Weekly grid as an HTML table. Covered cells are simply not emitted; the
/// `rowspan` of the cell above fills them.
pub fn render_html(rows: &[GridRow<'_>], table: &SlotTable, title: &str, palette: Palette) -> String {
    let mut html = String::new();
    let _ = write!(html, "<h2>{}</h2>\n<table class=\"week-grid\">\n<thead><tr><th>Time</th>", escape_html(title));
    for day in table.days.iter() {
        let _ = write!(html, "<th>{}</th>", day);
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for (index, row) in rows.iter().enumerate() {
        let _ = write!(html, "<tr><td><b>{}</b></td>", row.slot);
        /* a late section must not reach past the last row */
        let rows_left = u16::try_from(rows.len() - index).unwrap_or(u16::MAX);
        for cell in row.cells.iter() {
            let (bg, fg) = cell_colors(cell, palette);
            let span = cell.span.min(rows_left);
            let _ = write!(
                html,
                "<td rowspan=\"{}\" data-day=\"{}\" style=\"background:{};color:{};height:{}px\">",
                span,
                cell.day,
                bg,
                fg,
                ROW_HEIGHT_PX * span
            );
            match cell.content {
                CellContent::Blocked(kind, _) => {
                    let _ = write!(html, "<small>{}</small>", kind.label());
                }
                CellContent::Occupied(section) => html.push_str(&format_section_html(section)),
                CellContent::Empty => html.push('-'),
            }
            html.push_str("</td>");
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

fn fit(text: &str, width: usize) -> String {
    let shown: String = text.chars().take(width).collect();
    format!("{:<width$}", shown, width = width)
}

fn text_cell(cell: &GridCell<'_>) -> String {
    match cell.content {
        CellContent::Blocked(kind, _) => format!("[{}]", kind.label()),
        CellContent::Occupied(section) => {
            let mut text = format!("{} {}", section.label(), kind_label(section));
            if cell.span > 1 {
                text.push_str(&format!(" x{}", cell.span));
            }
            text
        }
        CellContent::Empty => "-".to_owned(),
    }
}

/// Weekly grid for the terminal. Slots covered by a section above show `|`.
pub fn render_text(rows: &[GridRow<'_>], table: &SlotTable, title: &str) -> String {
    let mut text = format!("{}\n", title);
    let _ = write!(text, "{}", fit("Time", 12));
    for day in table.days.iter() {
        let _ = write!(text, "| {}", fit(day.name(), TEXT_CELL_WIDTH));
    }
    text.push('\n');

    for row in rows {
        let _ = write!(text, "{}", fit(&row.slot.to_string(), 12));
        for day in table.days.iter() {
            let shown = match row.cells.iter().find(|c| c.day == *day) {
                Some(cell) => text_cell(cell),
                None => "|".to_owned(),
            };
            let _ = write!(text, "| {}", fit(&shown, TEXT_CELL_WIDTH));
        }
        text.push('\n');
    }
    text
}

/// Flat listing, one section per line, in feed order.
pub fn render_details(sections: &[Section], title: &str) -> String {
    let mut text = format!("{}\n", title);
    let _ = writeln!(
        text,
        "{:<10} {:<6} {:<9} {:<10} {:<11} {:<20} {:<10} {}",
        "Course", "Sec", "Type", "Day", "Time", "Faculty", "Room", "Status"
    );
    for section in sections {
        let _ = writeln!(
            text,
            "{:<10} {:<6} {:<9} {:<10} {:<11} {:<20} {:<10} {}",
            section.label(),
            section
                .section_number
                .map(|n| format!("#{}", n))
                .unwrap_or_else(|| "-".to_owned()),
            kind_label(section),
            section.day.as_deref().unwrap_or("-"),
            time_range(section),
            section.faculty_name.as_deref().unwrap_or("-"),
            section.room_name.as_deref().unwrap_or("-"),
            section.status.map(|s| s.to_string()).unwrap_or_else(|| "-".to_owned())
        );
    }
    text
}
