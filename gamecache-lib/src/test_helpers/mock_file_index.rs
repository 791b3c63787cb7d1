use crate::file_index::FileIndex;
use std::cell::RefCell;
use std::collections::HashMap;

/// Fixed `(game_slug, file_id) -> uri` table that remembers lookups.
#[derive(Default)]
pub struct MockFileIndex {
    entries: HashMap<(String, String), String>,
    lookups: RefCell<Vec<(String, String)>>,
}

impl MockFileIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, game_slug: &str, file_id: &str, uri: &str) -> Self {
        self.entries
            .insert((game_slug.to_string(), file_id.to_string()), uri.to_string());
        self
    }

    pub fn lookups(&self) -> Vec<(String, String)> {
        self.lookups.borrow().clone()
    }
}

impl FileIndex for MockFileIndex {
    fn lookup(&self, game_slug: &str, file_id: &str) -> Option<String> {
        let key = (game_slug.to_string(), file_id.to_string());
        self.lookups.borrow_mut().push(key.clone());
        self.entries.get(&key).cloned()
    }
}
