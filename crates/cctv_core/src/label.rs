/// Labels longer than this are cut to guard against runaway container text.
pub const MAX_LABEL_CHARS: usize = 100;

/// Collapse whitespace runs (spaces, tabs, newlines, NBSP) into single spaces,
/// trim both ends, then cut to `max_chars` characters.
pub fn normalize_label(raw: &str, max_chars: usize) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    collapsed
        .chars()
        .take(max_chars)
        .collect::<String>()
        .trim_end()
        .to_string()
}
