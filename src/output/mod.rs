// Output formatting — terminal rendering for the CLI.

pub mod terminal;

/// Shorten `text` to at most `max_chars` characters, appending "..." when cut.
///
/// Counts characters, not bytes, so multi-byte text never splits mid-character.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{head}...")
}
