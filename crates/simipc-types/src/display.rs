//! # Display Helpers
//!
//! Small formatting utilities shared by log narration and the CLI.

/// Truncates `text` to at most `max_chars` characters, appending `...`
/// when anything was cut.
///
/// Used for the secret-bearing values that appear in the activity log
/// (session tokens, ciphertext, checksums) so full values never land in
/// the narrative output.
#[must_use]
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.char_indices();
    match chars.nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_owned(),
    }
}
