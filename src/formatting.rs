//! Human-readable renderings of counts, sizes and timestamps for the status
//! bar and sidebar.
use chrono::{DateTime, Local, TimeZone};

use crate::TextStats;

struct SizeTier {
    limit: u64,
    divisor: u64,
    unit: &'static str,
    singular: Option<&'static str>,
}

const SIZE_TIERS: &[SizeTier] = &[
    SizeTier {
        limit: 1_000,
        divisor: 1,
        unit: "bytes",
        singular: Some("byte"),
    },
    SizeTier {
        limit: 1_000_000,
        divisor: 1_000,
        unit: "kB",
        singular: None,
    },
    SizeTier {
        limit: u64::MAX,
        divisor: 1_000_000,
        unit: "MB",
        singular: None,
    },
];

const RELATIVE_UNITS: &[(&str, i64)] = &[
    ("year", 31_536_000),
    ("month", 2_592_000),
    ("week", 604_800),
    ("day", 86_400),
    ("hour", 3_600),
    ("minute", 60),
];

/// Status bar strings for one note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedTextStats {
    pub word_count: String,
    pub character_count: String,
    pub storage_used: String,
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    format!("{} {}", count, if count == 1 { singular } else { plural })
}

pub fn format_word_count(count: usize) -> String {
    plural(count, "word", "words")
}

pub fn format_character_count(count: usize) -> String {
    plural(count, "character", "characters")
}

/// Size in bytes/kB/MB followed by the share of `quota` it uses.
pub fn format_storage_used(bytes: u64, quota: u64) -> String {
    let tier = SIZE_TIERS
        .iter()
        .find(|tier| bytes < tier.limit)
        .unwrap_or(&SIZE_TIERS[SIZE_TIERS.len() - 1]);

    let percent = if quota == 0 {
        100.0
    } else {
        bytes as f64 / quota as f64 * 100.0
    };

    if bytes == 1 {
        if let Some(singular) = tier.singular {
            return format!("1 {} ({:.2}%)", singular, percent);
        }
    }

    let value = if bytes % tier.divisor == 0 {
        (bytes / tier.divisor).to_string()
    } else {
        format!("{:.1}", bytes as f64 / tier.divisor as f64)
    };

    format!("{} {} ({:.2}%)", value, tier.unit, percent)
}

pub fn format_text_stats(stats: &TextStats, quota: u64) -> FormattedTextStats {
    FormattedTextStats {
        word_count: format_word_count(stats.word_count),
        character_count: format_character_count(stats.character_count),
        storage_used: format_storage_used(stats.storage_bytes as u64, quota),
    }
}

fn local_time(timestamp_ms: i64) -> Option<DateTime<Local>> {
    Local.timestamp_millis_opt(timestamp_ms).single()
}

/// Local time as `YYYY/MM/DD HH:MM:SS`.
pub fn format_date(timestamp_ms: i64) -> String {
    match local_time(timestamp_ms) {
        Some(date) => date.format("%Y/%m/%d %H:%M:%S").to_string(),
        None => "unknown date".to_string(),
    }
}

/// Describes `timestamp_ms` relative to `now_ms`, e.g. "3 hours ago".
pub fn format_relative_date(timestamp_ms: i64, now_ms: i64) -> String {
    let difference_secs = now_ms.saturating_sub(timestamp_ms).div_euclid(1000);

    if difference_secs < 0 {
        return "in the future".to_string();
    }
    if difference_secs < 60 {
        return "just now".to_string();
    }

    for (unit, seconds) in RELATIVE_UNITS {
        let count = difference_secs / seconds;
        if count >= 1 {
            let suffix = if count == 1 { "" } else { "s" };
            return format!("{} {}{} ago", count, unit, suffix);
        }
    }

    "just now".to_string()
}
