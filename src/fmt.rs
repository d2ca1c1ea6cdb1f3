//! Shared formatting utilities for console output

use console::Emoji;

/// Checkmark emoji for success
pub const CHECKMARK: Emoji = Emoji("✅", "[OK]");

/// Crossmark emoji for failure
pub const CROSSMARK: Emoji = Emoji("❌", "[FAIL]");

/// Info emoji for informational messages
pub const INFO: Emoji = Emoji("ℹ️ ", "i");

/// Chart emoji for metrics/statistics
pub const CHART: Emoji = Emoji("📊", "~");

/// Microscope emoji for audit/inspection
pub const MICROSCOPE: Emoji = Emoji("🔍", ">>");

/// Warning emoji for caution/alerts
pub const WARNING: Emoji = Emoji("⚠️ ", "!");

/// Up arrow for growth drivers
pub const GROWTH: Emoji = Emoji("📈", "+");

/// Down arrow for decline drivers
pub const DECLINE: Emoji = Emoji("📉", "-");

/// Environment variable that switches glyphs to their plain-text fallback
pub const NO_EMOJI_ENV: &str = "NO_EMOJI";

/// The glyph to print for `emoji`, honouring `NO_EMOJI`
pub fn glyph(emoji: Emoji<'static, 'static>) -> &'static str {
    if std::env::var_os(NO_EMOJI_ENV).is_some() {
        emoji.1
    } else {
        emoji.0
    }
}

/// Format a count with thousands separators, rounding toward zero
///
/// # Examples
///
/// ```
/// use traffic_audit::fmt::format_count;
///
/// assert_eq!(format_count(999.0), "999");
/// assert_eq!(format_count(12499.7), "12,499");
/// assert_eq!(format_count(-1_234_567.0), "-1,234,567");
/// ```
pub fn format_count(value: f64) -> String {
    let truncated = value.trunc() as i64;
    let digits = truncated.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if truncated < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Format a signed delta with an explicit `+` for growth
pub fn format_signed(value: f64, decimals: usize) -> String {
    format!("{:+.*}", decimals, value)
}

/// Truncate string to `max_len` characters, appending an ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
