pub mod lyrics;
pub mod now_playing;
pub mod queue;
pub mod root;

/// Cut `s` to `max_len` characters, marking the cut with an ellipsis.
pub(crate) fn truncate_str(s: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    let char_count: usize = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    } else {
        s.chars().take(max_len).collect()
    }
}
