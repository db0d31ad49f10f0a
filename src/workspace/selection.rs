use std::collections::BTreeMap;

/// Identifies one issued read. Later reads always carry larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReadToken(u64);

#[derive(Debug, Default, Clone)]
pub struct TokenSource {
    last: u64,
}

impl TokenSource {
    pub fn issue(&mut self) -> ReadToken {
        self.last += 1;
        ReadToken(self.last)
    }
}

#[derive(Debug, Default, Clone)]
pub struct SelectionState {
    entries: Vec<(String, String)>,
    pending: BTreeMap<String, ReadToken>,
    tokens: TokenSource,
}

impl SelectionState {
    pub fn begin_read(&mut self, path: &str) -> ReadToken {
        let token = self.tokens.issue();
        self.pending.insert(path.to_string(), token);
        token
    }

    pub fn complete_read(&mut self, path: &str, token: ReadToken, content: String) -> bool {
        if self.pending.get(path) != Some(&token) {
            return false;
        }
        self.pending.remove(path);
        match self.entries.iter_mut().find(|(existing, _)| existing == path) {
            Some((_, existing)) => *existing = content,
            None => self.entries.push((path.to_string(), content)),
        }
        true
    }

    pub fn fail_read(&mut self, path: &str, token: ReadToken) -> bool {
        if self.pending.get(path) != Some(&token) {
            return false;
        }
        self.pending.remove(path);
        true
    }

    pub fn deselect(&mut self, path: &str) -> bool {
        let was_pending = self.pending.remove(path).is_some();
        let before = self.entries.len();
        self.entries.retain(|(existing, _)| existing != path);
        was_pending || self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.pending.clear();
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == path)
    }

    pub fn is_pending(&self, path: &str) -> bool {
        self.pending.contains_key(path)
    }

    pub fn is_checked(&self, path: &str) -> bool {
        self.contains(path) || self.is_pending(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(path, _)| path.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn path_set(selection: &SelectionState) -> BTreeSet<String> {
        selection.paths().map(str::to_string).collect()
    }

    #[test]
    fn check_then_uncheck_leaves_selection_unchanged() {
        let mut selection = SelectionState::default();
        let token = selection.begin_read("demo/a.py");
        selection.complete_read("demo/a.py", token, "a".to_string());
        let before = path_set(&selection);

        let token = selection.begin_read("demo/b.py");
        assert!(selection.complete_read("demo/b.py", token, "b".to_string()));
        selection.deselect("demo/b.py");

        assert_eq!(path_set(&selection), before);
    }

    #[test]
    fn uncheck_before_read_finishes_discards_the_result() {
        let mut selection = SelectionState::default();
        let token = selection.begin_read("demo/a.py");
        assert!(selection.is_checked("demo/a.py"));

        selection.deselect("demo/a.py");
        assert!(!selection.complete_read("demo/a.py", token, "late".to_string()));

        assert!(selection.is_empty());
        assert!(!selection.is_checked("demo/a.py"));
    }

    #[test]
    fn only_latest_read_for_a_path_is_applied() {
        let mut selection = SelectionState::default();
        let first = selection.begin_read("demo/a.py");
        let second = selection.begin_read("demo/a.py");
        assert!(first < second);

        assert!(selection.complete_read("demo/a.py", second, "new".to_string()));
        assert!(!selection.complete_read("demo/a.py", first, "old".to_string()));

        assert_eq!(selection.snapshot().get("demo/a.py").map(String::as_str), Some("new"));
    }

    #[test]
    fn paths_keep_insertion_order() {
        let mut selection = SelectionState::default();
        for path in ["demo/z.py", "demo/a.py", "demo/m.py"] {
            let token = selection.begin_read(path);
            selection.complete_read(path, token, String::new());
        }
        let paths: Vec<&str> = selection.paths().collect();
        assert_eq!(paths, vec!["demo/z.py", "demo/a.py", "demo/m.py"]);
    }

    #[test]
    fn failed_read_clears_pending_marker() {
        let mut selection = SelectionState::default();
        let token = selection.begin_read("demo/bin.dat");
        assert!(selection.fail_read("demo/bin.dat", token));
        assert!(!selection.is_checked("demo/bin.dat"));
    }

    #[test]
    fn clear_drops_entries_and_pending_reads() {
        let mut selection = SelectionState::default();
        let token = selection.begin_read("demo/a.py");
        selection.complete_read("demo/a.py", token, "a".to_string());
        let pending = selection.begin_read("demo/b.py");

        selection.clear();

        assert!(selection.is_empty());
        assert!(!selection.complete_read("demo/b.py", pending, "b".to_string()));
    }
}
