//! Display formatting for the view layer.

use chrono::{DateTime, Utc};

/// `MM/DD/YYYY`.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%m/%d/%Y").to_string()
}

/// 24-hour `HH:MM`.
pub fn format_time(date: &DateTime<Utc>) -> String {
    date.format("%H:%M").to_string()
}

/// Date and time together, as shown in the coffee history.
pub fn format_date_time(date: &DateTime<Utc>) -> String {
    format!("{} - {}", format_date(date), format_time(date))
}

/// Black or white, whichever is readable on top of `hex_color`.
///
/// Uses the luminance formula on the `#rrggbb` channels. Anything that does
/// not parse as such is treated as dark.
pub fn contrast_color(hex_color: &str) -> &'static str {
    match brightness(hex_color) {
        Some(brightness) if brightness > 128 => "#000000",
        _ => "#ffffff",
    }
}

fn brightness(hex_color: &str) -> Option<u32> {
    let channels = hex_color.strip_prefix('#')?;
    if channels.len() != 6 {
        return None;
    }

    let parse = |range| u32::from_str_radix(channels.get(range)?, 16).ok();
    let r = parse(0..2)?;
    let g = parse(2..4)?;
    let b = parse(4..6)?;

    Some((r * 299 + g * 587 + b * 114) / 1000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 7, 16, 5, 0).unwrap()
    }

    #[test]
    fn dates_render_in_two_digit_us_order() {
        assert_eq!(format_date(&date()), "03/07/2025");
    }

    #[test]
    fn times_render_without_seconds() {
        assert_eq!(format_time(&date()), "16:05");
    }

    #[test]
    fn date_time_joins_both_parts() {
        assert_eq!(format_date_time(&date()), "03/07/2025 - 16:05");
    }

    #[test]
    fn light_backgrounds_get_black_text() {
        assert_eq!(contrast_color("#ffffff"), "#000000");
        assert_eq!(contrast_color("#facc15"), "#000000");
    }

    #[test]
    fn dark_backgrounds_get_white_text() {
        assert_eq!(contrast_color("#000000"), "#ffffff");
        assert_eq!(contrast_color("#1d4ed8"), "#ffffff");
    }

    #[test]
    fn malformed_colors_fall_back_to_white_text() {
        assert_eq!(contrast_color("cccccc"), "#ffffff");
        assert_eq!(contrast_color("#abc"), "#ffffff");
        assert_eq!(contrast_color("#zzzzzz"), "#ffffff");
    }
}
