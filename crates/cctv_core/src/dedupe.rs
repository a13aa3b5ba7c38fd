use std::collections::HashSet;

use crate::StreamEntry;

/// Drop repeated `(channel, url)` pairs, keeping the first occurrence and its position.
///
/// Comparison is plain string equality on both fields.
pub fn dedupe_entries(entries: Vec<StreamEntry>) -> Vec<StreamEntry> {
    let mut seen: HashSet<(String, String)> = HashSet::with_capacity(entries.len());
    entries
        .into_iter()
        .filter(|entry| seen.insert((entry.channel.clone(), entry.url.clone())))
        .collect()
}
