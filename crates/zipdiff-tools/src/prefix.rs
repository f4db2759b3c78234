//! Leading directory removal

/// Drop the first `segments` `/`-delimited components of `name`
///
/// Returns the text after the `segments`-th slash, or `None` when `name`
/// has fewer slashes than that. Zero segments returns `name` unchanged.
pub fn strip_prefix(name: &str, segments: usize) -> Option<&str> {
    if segments == 0 {
        return Some(name);
    }

    name.match_indices('/')
        .nth(segments - 1)
        .map(|(idx, _)| &name[idx + 1..])
}
