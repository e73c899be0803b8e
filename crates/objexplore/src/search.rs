//! Incremental search over visible member names

/// A name matching the search query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchMatch {
    /// Position within the visible member list
    pub index: usize,
    /// Byte offset of the match within the name
    pub start: usize,
    /// Byte offset one past the match within the name
    pub end: usize,
}

impl SearchMatch {
    /// Returns true if the match starts the name
    pub fn is_prefix(&self) -> bool {
        self.start == 0
    }
}

/// Find every name containing `query`, ignoring case
///
/// Matches come back in list order, at most one per name (the leftmost).
/// An empty query matches nothing.
pub fn search<S: AsRef<str>>(names: impl IntoIterator<Item = S>, query: &str) -> Vec<SearchMatch> {
    let needle: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() {
        return Vec::new();
    }
    names
        .into_iter()
        .enumerate()
        .filter_map(|(index, name)| {
            find_folded(name.as_ref(), &needle).map(|(start, end)| SearchMatch { index, start, end })
        })
        .collect()
}

/// Leftmost case-insensitive occurrence of `needle` in `haystack`, as a byte
/// range of the original text
fn find_folded(haystack: &str, needle: &[char]) -> Option<(usize, usize)> {
    // Each lowered char remembers the byte span of the char it came from
    let folded: Vec<(char, usize, usize)> = haystack
        .char_indices()
        .flat_map(|(at, c)| {
            let end = at + c.len_utf8();
            c.to_lowercase().map(move |l| (l, at, end))
        })
        .collect();

    folded
        .windows(needle.len())
        .find(|window| window.iter().map(|(c, _, _)| c).eq(needle.iter()))
        .map(|window| (window[0].1, window[window.len() - 1].2))
}

/// Search query plus its matches and the match last jumped to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    query: String,
    matches: Vec<SearchMatch>,
    cursor: Option<usize>,
}

impl SearchState {
    /// An empty search
    pub fn new() -> Self {
        Self::default()
    }

    /// The current query
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns true while a query is being typed or applied
    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
    }

    /// Matches for the current query, in list order
    pub fn matches(&self) -> &[SearchMatch] {
        &self.matches
    }

    /// Visible positions of every match
    pub fn match_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.matches.iter().map(|m| m.index)
    }

    /// Match covering visible position `index`
    pub fn match_at(&self, index: usize) -> Option<&SearchMatch> {
        self.matches
            .binary_search_by_key(&index, |m| m.index)
            .ok()
            .map(|i| &self.matches[i])
    }

    /// The match last jumped to
    pub fn current(&self) -> Option<&SearchMatch> {
        self.cursor.map(|c| &self.matches[c])
    }

    /// Replace the query and recompute matches against `names`
    ///
    /// The cursor moves to the best match.
    pub fn set_query<S: AsRef<str>>(&mut self, query: impl Into<String>, names: impl IntoIterator<Item = S>) {
        self.query = query.into();
        self.matches = search(names, &self.query);
        self.cursor = self.best_position();
    }

    /// Append a character to the query
    pub fn push_char<S: AsRef<str>>(&mut self, c: char, names: impl IntoIterator<Item = S>) {
        let mut query = std::mem::take(&mut self.query);
        query.push(c);
        self.set_query(query, names);
    }

    /// Drop the last character of the query
    pub fn backspace<S: AsRef<str>>(&mut self, names: impl IntoIterator<Item = S>) {
        let mut query = std::mem::take(&mut self.query);
        query.pop();
        self.set_query(query, names);
    }

    /// Forget the query and its matches
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn best_position(&self) -> Option<usize> {
        // Prefix matches first, then list order
        self.matches
            .iter()
            .enumerate()
            .min_by_key(|(_, m)| (!m.is_prefix(), m.index))
            .map(|(position, _)| position)
    }

    /// The highest ranked match
    pub fn best_match(&self) -> Option<&SearchMatch> {
        self.best_position().map(|p| &self.matches[p])
    }

    /// Advance to the next match, wrapping at the end
    ///
    /// Returns the visible position of the new current match.
    pub fn next_match(&mut self) -> Option<usize> {
        let len = self.matches.len();
        if len == 0 {
            return None;
        }
        let next = self.cursor.map_or(0, |c| (c + 1) % len);
        self.cursor = Some(next);
        Some(self.matches[next].index)
    }

    /// Step back to the previous match, wrapping at the start
    pub fn previous_match(&mut self) -> Option<usize> {
        let len = self.matches.len();
        if len == 0 {
            return None;
        }
        let previous = self.cursor.map_or(len - 1, |c| (c + len - 1) % len);
        self.cursor = Some(previous);
        Some(self.matches[previous].index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NAMES: [&str; 4] = ["total", "subtotal", "Tot", "count"];

    #[test]
    fn test_search_is_case_insensitive() {
        let matches = search(NAMES, "TOT");
        assert_eq!(
            matches,
            vec![
                SearchMatch { index: 0, start: 0, end: 3 },
                SearchMatch { index: 1, start: 3, end: 6 },
                SearchMatch { index: 2, start: 0, end: 3 },
            ]
        );
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        assert!(search(NAMES, "").is_empty());
    }

    #[test]
    fn test_non_ascii_offsets() {
        let matches = search(["Größe"], "SSE");
        assert!(matches.is_empty());
        let matches = search(["Größe"], "öß");
        assert_eq!(matches, vec![SearchMatch { index: 0, start: 2, end: 6 }]);
        assert_eq!(&"Größe"[2..6], "öß");
    }

    #[test]
    fn test_best_match_prefers_prefix() {
        let mut state = SearchState::new();
        state.set_query("count", ["recount", "counter"]);
        assert_eq!(state.best_match().map(|m| m.index), Some(1));
        assert_eq!(state.current().map(|m| m.index), Some(1));
    }

    #[test]
    fn test_best_match_breaks_ties_by_index() {
        let mut state = SearchState::new();
        state.set_query("ot", NAMES);
        assert_eq!(state.best_match().map(|m| m.index), Some(0));
    }

    #[test]
    fn test_cycling_wraps() {
        let mut state = SearchState::new();
        state.set_query("tot", NAMES);
        // Cursor starts on the best match at index 0
        assert_eq!(state.next_match(), Some(1));
        assert_eq!(state.next_match(), Some(2));
        assert_eq!(state.next_match(), Some(0));
        assert_eq!(state.previous_match(), Some(2));
    }

    #[test]
    fn test_cycling_without_matches() {
        let mut state = SearchState::new();
        state.set_query("zzz", NAMES);
        assert_eq!(state.next_match(), None);
        assert_eq!(state.previous_match(), None);
        assert!(state.current().is_none());
    }

    #[test]
    fn test_editing_recomputes() {
        let mut state = SearchState::new();
        state.push_char('c', NAMES);
        assert_eq!(state.match_indices().collect::<Vec<_>>(), vec![3]);
        state.backspace(NAMES);
        state.push_char('t', NAMES);
        assert_eq!(state.query(), "t");
        assert_eq!(state.match_indices().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert!(state.match_at(2).is_some());

        state.reset();
        assert!(!state.is_active());
        assert!(state.matches().is_empty());
    }
}
