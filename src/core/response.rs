//! Text display utilities
//!
//! UTF-8-safe truncation for terminal output and one-line previews of
//! user/model text for log statements.

/// Longest model reply shown untruncated by the console renderer
pub const DISPLAY_LIMIT: usize = 4000;

/// Longest text fragment embedded in a log line
pub const LOG_PREVIEW_LIMIT: usize = 100;

/// Truncate text to `max` bytes, adding ellipsis if needed.
///
/// Never splits mid-character: the cut point is walked back to a
/// char boundary.
pub fn truncate_text(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }

    let mut end = max.saturating_sub(3); // Room for "..."
    while !text.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

/// Truncate a reply for terminal display.
pub fn truncate_for_display(text: &str) -> String {
    truncate_text(text, DISPLAY_LIMIT)
}

/// Collapse text onto one line and truncate it for use inside a log line.
pub fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_text(&flat, LOG_PREVIEW_LIMIT)
}
