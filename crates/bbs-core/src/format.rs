//! Display formatting shared by the renderer and the CLI.
//!
//! Dates follow the board's Japanese locale strings. Widths are terminal
//! columns, so CJK text counts double.

use chrono::{DateTime, Datelike, Timelike, Utc};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Short relative time used on thread cards.
///
/// Under an hour gives `N分前`, under a day `N時間前`, under a week `N日前`,
/// anything older the date as `YYYY/M/D`. Timestamps in the future count as
/// zero minutes.
pub fn relative_time(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    match elapsed(at, now) {
        Elapsed::Minutes(m) => format!("{m}分前"),
        Elapsed::Hours(h) => format!("{h}時間前"),
        Elapsed::Days(d) => format!("{d}日前"),
        Elapsed::Older => short_date(at),
    }
}

/// Relative time for a user's last activity, falling back to the long date.
pub fn last_activity(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    match elapsed(at, now) {
        Elapsed::Minutes(m) => format!("{m}分前にアクティブ"),
        Elapsed::Hours(h) => format!("{h}時間前にアクティブ"),
        Elapsed::Days(d) => format!("{d}日前にアクティブ"),
        Elapsed::Older => long_date(at),
    }
}

enum Elapsed {
    Minutes(i64),
    Hours(i64),
    Days(i64),
    Older,
}

fn elapsed(at: DateTime<Utc>, now: DateTime<Utc>) -> Elapsed {
    let diff = now.signed_duration_since(at);
    let minutes = diff.num_minutes().max(0);
    let hours = diff.num_hours();
    let days = diff.num_days();
    if minutes < 60 {
        Elapsed::Minutes(minutes)
    } else if hours < 24 {
        Elapsed::Hours(hours)
    } else if days < 7 {
        Elapsed::Days(days)
    } else {
        Elapsed::Older
    }
}

/// `2024/1/15`
pub fn short_date(at: DateTime<Utc>) -> String {
    format!("{}/{}/{}", at.year(), at.month(), at.day())
}

/// `2024年1月15日`
pub fn long_date(at: DateTime<Utc>) -> String {
    format!("{}年{}月{}日", at.year(), at.month(), at.day())
}

/// `2024/1/15 12:00:00`
pub fn date_time(at: DateTime<Utc>) -> String {
    format!(
        "{} {}:{:02}:{:02}",
        short_date(at),
        at.hour(),
        at.minute(),
        at.second()
    )
}

/// Formats a count with thousands separators (`12,345`).
pub fn count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Truncates to `max_width` columns, ending with `…` when cut.
///
/// Cuts on grapheme boundaries so combining marks stay with their base.
pub fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width <= 1 {
        return "…".to_string();
    }
    let mut out = String::new();
    let mut width = 0;
    for grapheme in text.graphemes(true) {
        let w = grapheme.width();
        if width + w + 1 > max_width {
            break;
        }
        out.push_str(grapheme);
        width += w;
    }
    out.push('…');
    out
}

/// Collapses a multi-line body into one line and truncates it.
pub fn preview(text: &str, max_width: usize) -> String {
    let joined = text.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate(&joined, max_width)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_relative_time_buckets() {
        let now = at(2024, 1, 15, 12, 0);
        assert_eq!(relative_time(at(2024, 1, 15, 11, 55), now), "5分前");
        assert_eq!(relative_time(at(2024, 1, 15, 12, 0), now), "0分前");
        assert_eq!(relative_time(at(2024, 1, 15, 9, 30), now), "2時間前");
        assert_eq!(relative_time(at(2024, 1, 12, 12, 0), now), "3日前");
        assert_eq!(relative_time(at(2024, 1, 8, 11, 0), now), "2024/1/8");
    }

    #[test]
    fn test_relative_time_future_is_zero_minutes() {
        let now = at(2024, 1, 15, 12, 0);
        assert_eq!(relative_time(at(2024, 1, 15, 12, 30), now), "0分前");
    }

    #[test]
    fn test_last_activity() {
        let now = at(2024, 1, 15, 12, 0);
        assert_eq!(last_activity(at(2024, 1, 15, 10, 0), now), "2時間前にアクティブ");
        assert_eq!(last_activity(at(2023, 12, 1, 0, 0), now), "2023年12月1日");
    }

    #[test]
    fn test_date_time() {
        assert_eq!(date_time(at(2024, 1, 10, 9, 5)), "2024/1/10 9:05:00");
    }

    #[test]
    fn test_count_separators() {
        assert_eq!(count(0), "0");
        assert_eq!(count(999), "999");
        assert_eq!(count(1000), "1,000");
        assert_eq!(count(1_234_567), "1,234,567");
    }

    #[test]
    fn test_truncate_wide_chars() {
        assert_eq!(truncate("Laravel", 10), "Laravel");
        // Each kana is two columns.
        assert_eq!(truncate("ログイン機能", 7), "ログイ…");
        assert_eq!(truncate("ログイン", 1), "…");
    }

    #[test]
    fn test_preview_collapses_lines() {
        assert_eq!(preview("一行目\n\n二行目", 40), "一行目 二行目");
    }
}
