//! Insertion-ordered set of unique lines gathered across scroll snapshots.

use indexmap::IndexSet;

#[derive(Debug, Clone, Default)]
pub struct AccumulatedLines {
    lines: IndexSet<String>,
}

impl AccumulatedLines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge lines, returning how many were new.
    ///
    /// # Examples
    ///
    /// ```
    /// use screen_text_extractor::AccumulatedLines;
    ///
    /// let mut set = AccumulatedLines::new();
    /// assert_eq!(set.extend(vec!["a".to_string(), "b".to_string()]), 2);
    /// assert_eq!(set.extend(vec!["b".to_string(), "c".to_string()]), 1);
    /// assert_eq!(set.join(), "a\nb\nc");
    /// ```
    pub fn extend<I>(&mut self, lines: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let before = self.lines.len();
        self.lines.extend(lines);
        self.lines.len() - before
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// All lines in first-seen order, separated by `\n`.
    pub fn join(&self) -> String {
        self.iter().collect::<Vec<_>>().join("\n")
    }
}
