//! Course colors for the weekly grid.
//!
//! A course code is hashed onto a fixed 16-entry palette so the same course
//! keeps its color across pages and reloads. Collisions between different
//! codes are expected; only stability matters.

/// Palette, as four named groups of four.
pub const COURSE_COLORS: [(&str, [&str; 4]); 4] = [
    ("primary", ["#6366F1", "#8B5CF6", "#A855F7", "#D946EF"]),
    ("secondary", ["#EC4899", "#F43F5E", "#EF4444", "#F97316"]),
    ("accent", ["#F59E0B", "#EAB308", "#84CC16", "#22C55E"]),
    ("neutral", ["#06B6D4", "#0EA5E9", "#3B82F6", "#60A5FA"]),
];

/// Background for sections without a course code.
pub const NEUTRAL_COLOR: &str = "#F3F4F6";

pub const DARK_TEXT: &str = "#1F2937";
pub const LIGHT_TEXT: &str = "#FFFFFF";

const PALETTE_SIZE: usize = 16;

fn palette_entry(index: usize) -> &'static str {
    let (_, group) = COURSE_COLORS[index / 4];
    group[index % 4]
}

/// Classic 32-bit string hash: `h = h * 31 + unit` over UTF-16 code units,
/// wrapping on overflow.
pub fn course_hash(code: &str) -> i32 {
    code.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Background color for a course. The section type plays no part: a lab and
/// a lecture of the same course share a color.
pub fn color_for(code: &str) -> &'static str {
    if code.is_empty() {
        return NEUTRAL_COLOR;
    }
    let index = course_hash(code).unsigned_abs() as usize % PALETTE_SIZE;
    palette_entry(index)
}

/// Readable text color on top of a `#RRGGBB` background.
pub fn text_color_for(bg_color: &str) -> &'static str {
    match decode_rgb(bg_color) {
        Some((r, g, b)) => {
            /* perceived brightness, scaled by 1000 to stay in integers */
            let brightness = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
            if brightness > 128_000 {
                DARK_TEXT
            } else {
                LIGHT_TEXT
            }
        }
        None => LIGHT_TEXT,
    }
}

fn decode_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim().trim_start_matches('#').get(..6)?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
