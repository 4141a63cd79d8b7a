/// Keep the first `limit` whitespace-separated words of `text`.
/// Longer texts are joined with single spaces and get a trailing ellipsis.
pub fn truncate_words(text: &str, limit: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= limit {
        return text.to_string();
    }
    format!("{}...", words[..limit].join(" "))
}
