//! Shared formatting utilities for size display and console output
//!
//! Everything here is locale independent so rendered reports are stable
//! across machines.

use console::Emoji;
use std::sync::atomic::{AtomicBool, Ordering};

static EMOJI_ENABLED: AtomicBool = AtomicBool::new(true);

/// Checkmark emoji for success
pub const CHECKMARK: Emoji = Emoji("✅ ", "[OK] ");

/// Info emoji for informational messages
pub const INFO: Emoji = Emoji("ℹ️  ", "i ");

/// Chart emoji for metrics/statistics
pub const CHART: Emoji = Emoji("📊 ", "~ ");

/// Package emoji for cache operations
pub const PACKAGE: Emoji = Emoji("📦 ", "# ");

/// Warning emoji for caution/alerts
pub const WARNING: Emoji = Emoji("⚠️  ", "! ");

/// Turn emoji output on or off for the rest of the process
///
/// When on, `console` still falls back to plain text on terminals that
/// cannot show emoji.
pub fn set_emoji_enabled(enabled: bool) {
    EMOJI_ENABLED.store(enabled, Ordering::Relaxed);
}

/// Render an emoji constant, honoring [`set_emoji_enabled`]
pub fn emoji(glyph: &Emoji<'_, '_>) -> String {
    if EMOJI_ENABLED.load(Ordering::Relaxed) {
        glyph.to_string()
    } else {
        glyph.1.to_string()
    }
}

/// Format bytes as human-readable size string
///
/// # Examples
///
/// ```
/// use build_size::fmt::format_bytes;
///
/// assert_eq!(format_bytes(512), "512 B");
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// assert_eq!(format_bytes(1_048_576), "1.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format a signed byte delta, always carrying an explicit sign unless zero
///
/// # Examples
///
/// ```
/// use build_size::fmt::format_delta;
///
/// assert_eq!(format_delta(0), "0 B");
/// assert_eq!(format_delta(20), "+20 B");
/// assert_eq!(format_delta(-1536), "-1.50 KB");
/// ```
pub fn format_delta(delta: i64) -> String {
    let magnitude = format_bytes(delta.unsigned_abs());
    match delta.signum() {
        1 => format!("+{}", magnitude),
        -1 => format!("-{}", magnitude),
        _ => magnitude,
    }
}

/// Format a percentage with two decimals and an explicit sign
///
/// Non-zero changes too small to show at two decimals render as `<0.01%`.
///
/// # Examples
///
/// ```
/// use build_size::fmt::format_percent;
///
/// assert_eq!(format_percent(12.5), "+12.50%");
/// assert_eq!(format_percent(0.001), "+<0.01%");
/// assert_eq!(format_percent(-0.004), "-<0.01%");
/// ```
pub fn format_percent(percent: f64) -> String {
    if percent != 0.0 && percent.abs() < 0.005 {
        let sign = if percent > 0.0 { '+' } else { '-' };
        return format!("{}<0.01%", sign);
    }
    format!("{:+.2}%", percent)
}
