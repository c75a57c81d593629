//! Bookmarks persisted under the `quranBookmarks` storage key.
//!
//! Records are keyed by chapter number. Older records that name the chapter
//! (`"surah": "Al-Baqarah"`) or store the verse as a string are rewritten in
//! the canonical shape the first time the store is opened. Repeated verses
//! keep their first record; records naming no real verse are moved aside to
//! `quranBookmarksUnreadable` rather than discarded.

use log::{info, warn};
use serde::Deserialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::Result;
use crate::input::resolve_chapter;
use crate::position::check_verse;
use crate::storage::LocalStorage;
use crate::types::{Bookmark, Position};

pub const BOOKMARKS_KEY: &str = "quranBookmarks";
pub const UNREADABLE_KEY: &str = "quranBookmarksUnreadable";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(Bookmark),
    /// The verse was already bookmarked; nothing was written
    AlreadyExists(Bookmark),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredChapter {
    Number(u16),
    Name(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredVerse {
    Number(u32),
    Text(String),
}

#[derive(Deserialize)]
struct StoredBookmark {
    id: u64,
    #[serde(alias = "surah")]
    chapter: StoredChapter,
    verse: StoredVerse,
    #[serde(default)]
    text: String,
}

impl StoredBookmark {
    fn into_bookmark(self) -> Option<Bookmark> {
        let chapter = match self.chapter {
            StoredChapter::Number(n) => crate::catalog::chapter(n)?.number,
            StoredChapter::Name(name) => resolve_chapter(&name).ok()?.number,
        };
        let verse = match self.verse {
            StoredVerse::Number(v) => v,
            StoredVerse::Text(v) => v.trim().parse().ok()?,
        };
        check_verse(chapter, verse).ok()?;
        Some(Bookmark {
            id: self.id,
            chapter,
            verse,
            text: self.text,
        })
    }
}

#[derive(Debug)]
pub struct BookmarkStore {
    storage: LocalStorage,
    bookmarks: Vec<Bookmark>,
}

impl BookmarkStore {
    pub fn open(storage: LocalStorage) -> Result<Self> {
        let raw = storage.get(BOOKMARKS_KEY)?;
        let mut store = Self {
            storage,
            bookmarks: Vec::new(),
        };

        let Some(raw) = raw else {
            return Ok(store);
        };

        let values: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(e) => {
                warn!("Stored bookmarks are not a JSON array, starting empty: {}", e);
                return Ok(store);
            }
        };

        let mut unreadable = Vec::new();
        for value in &values {
            let parsed = serde_json::from_value::<StoredBookmark>(value.clone())
                .ok()
                .and_then(StoredBookmark::into_bookmark);
            match parsed {
                Some(bookmark) if store.is_bookmarked(bookmark.chapter, bookmark.verse) => {
                    warn!(
                        "Dropping repeated bookmark for {}:{} (id {})",
                        bookmark.chapter, bookmark.verse, bookmark.id
                    );
                }
                Some(bookmark) => store.bookmarks.push(bookmark),
                None => {
                    warn!("Setting aside unreadable bookmark record: {}", value);
                    unreadable.push(value.clone());
                }
            }
        }

        if !unreadable.is_empty() {
            store.set_aside(unreadable)?;
        }

        let canonical = serde_json::to_value(&store.bookmarks)?;
        if canonical != serde_json::Value::Array(values) {
            info!("Migrating {} stored bookmarks to chapter numbers", store.bookmarks.len());
            store.persist()?;
        }

        Ok(store)
    }

    pub fn list(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn get(&self, id: u64) -> Option<&Bookmark> {
        self.bookmarks.iter().find(|b| b.id == id)
    }

    pub fn is_bookmarked(&self, chapter: u16, verse: u32) -> bool {
        self.find(chapter, verse).is_some()
    }

    /// Bookmarks the position's verse unless it already is.
    pub fn add(&mut self, position: &Position, text: &str) -> Result<AddOutcome> {
        if let Some(existing) = self.find(position.chapter, position.verse) {
            return Ok(AddOutcome::AlreadyExists(existing.clone()));
        }

        let bookmark = Bookmark {
            id: self.next_id(),
            chapter: position.chapter,
            verse: position.verse,
            text: text.to_string(),
        };
        self.bookmarks.push(bookmark.clone());
        if let Err(e) = self.persist() {
            self.bookmarks.pop();
            return Err(e);
        }

        info!(
            "Bookmarked {} {}:{} (id {})",
            position.chapter_name(),
            bookmark.chapter,
            bookmark.verse,
            bookmark.id
        );
        Ok(AddOutcome::Added(bookmark))
    }

    /// Removes the bookmark with `id`; returns whether one was removed.
    pub fn remove(&mut self, id: u64) -> Result<bool> {
        let before = self.bookmarks.len();
        let kept: Vec<Bookmark> = self
            .bookmarks
            .iter()
            .filter(|b| b.id != id)
            .cloned()
            .collect();
        if kept.len() == before {
            return Ok(false);
        }

        let previous = std::mem::replace(&mut self.bookmarks, kept);
        if let Err(e) = self.persist() {
            self.bookmarks = previous;
            return Err(e);
        }
        info!("Removed bookmark {}", id);
        Ok(true)
    }

    fn find(&self, chapter: u16, verse: u32) -> Option<&Bookmark> {
        self.bookmarks
            .iter()
            .find(|b| b.chapter == chapter && b.verse == verse)
    }

    // Creation time in millis, bumped past the newest id so ids stay unique.
    fn next_id(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        match self.bookmarks.iter().map(|b| b.id).max() {
            Some(max) if max >= now => max + 1,
            _ => now,
        }
    }

    // Appends to earlier set-aside records so repeated migrations lose nothing.
    fn set_aside(&self, mut records: Vec<serde_json::Value>) -> Result<()> {
        let mut kept: Vec<serde_json::Value> = self
            .storage
            .get(UNREADABLE_KEY)?
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        kept.append(&mut records);
        self.storage.set(UNREADABLE_KEY, &serde_json::to_string(&kept)?)
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.bookmarks)?;
        self.storage.set(BOOKMARKS_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Language;

    fn at(chapter: u16, verse: u32) -> Position {
        Position {
            chapter,
            verse,
            language: Language::En,
            reciter_id: 1,
        }
    }

    fn open_in(dir: &tempfile::TempDir) -> (LocalStorage, BookmarkStore) {
        let storage = LocalStorage::new(dir.path());
        let store = BookmarkStore::open(storage.clone()).unwrap();
        (storage, store)
    }

    #[test]
    fn add_list_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let (_, mut store) = open_in(&dir);

        let first = match store.add(&at(1, 1), "first").unwrap() {
            AddOutcome::Added(b) => b,
            other => panic!("expected Added, got {:?}", other),
        };
        store.add(&at(2, 255), "second").unwrap();
        store.add(&at(18, 10), "third").unwrap();

        assert_eq!(store.list().len(), 3);
        assert!(store.is_bookmarked(2, 255));

        let second_id = store.list()[1].id;
        assert!(store.remove(second_id).unwrap());
        assert!(!store.is_bookmarked(2, 255));

        let remaining: Vec<_> = store.list().iter().map(|b| b.text.as_str()).collect();
        assert_eq!(remaining, vec!["first", "third"]);
        assert_eq!(store.list()[0], first);
    }

    #[test]
    fn duplicates_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let (_, mut store) = open_in(&dir);

        store.add(&at(36, 1), "ya sin").unwrap();
        let again = store.add(&at(36, 1), "ya sin again").unwrap();

        assert!(matches!(again, AddOutcome::AlreadyExists(ref b) if b.text == "ya sin"));
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn ids_are_unique_even_within_one_millisecond() {
        let dir = tempfile::tempdir().unwrap();
        let (_, mut store) = open_in(&dir);

        for verse in 1..=20 {
            store.add(&at(2, verse), "v").unwrap();
        }
        let mut ids: Vec<u64> = store.list().iter().map(|b| b.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn removing_unknown_id_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let (_, mut store) = open_in(&dir);
        store.add(&at(1, 1), "x").unwrap();

        assert!(!store.remove(42).unwrap());
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let (storage, mut store) = open_in(&dir);
        store.add(&at(112, 1), "say he is allah").unwrap();

        let reopened = BookmarkStore::open(storage).unwrap();
        assert_eq!(reopened.list(), store.list());
    }

    #[test]
    fn legacy_records_are_migrated() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        storage
            .set(
                BOOKMARKS_KEY,
                r#"[
                    {"id": 1, "surah": "Al-Baqarah", "verse": 255, "text": "a"},
                    {"id": 2, "surah": 18, "verse": 10, "text": "b"},
                    {"id": 3, "surah": "Ya-Sin", "verse": "7", "text": "c"},
                    {"id": 4, "surah": "Nowhere", "verse": 1, "text": "d"},
                    {"id": 5, "surah": 2, "verse": "255", "text": "e"},
                    {"id": 6, "surah": 1, "verse": 0, "text": "f"},
                    {"id": 7, "surah": 1, "verse": 99, "text": "g"}
                ]"#,
            )
            .unwrap();

        let store = BookmarkStore::open(storage.clone()).unwrap();
        let refs: Vec<(u64, u16, u32)> = store.list().iter().map(|b| (b.id, b.chapter, b.verse)).collect();
        assert_eq!(refs, vec![(1, 2, 255), (2, 18, 10), (3, 36, 7)]);
        assert_eq!(store.list()[0].text, "a");

        let raw = storage.get(BOOKMARKS_KEY).unwrap().unwrap();
        let stored: Vec<Bookmark> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored, store.list());
    }

    #[test]
    fn unreadable_records_are_set_aside() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        storage
            .set(
                BOOKMARKS_KEY,
                r#"[
                    {"id": 1, "surah": 1, "verse": 1, "text": "ok"},
                    {"id": 2, "surah": "Nowhere", "verse": 1},
                    {"id": 3, "surah": 1, "verse": 99},
                    "garbage"
                ]"#,
            )
            .unwrap();

        let store = BookmarkStore::open(storage.clone()).unwrap();
        assert_eq!(store.list().len(), 1);

        let raw = storage.get(UNREADABLE_KEY).unwrap().unwrap();
        let aside: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
        assert_eq!(aside.len(), 3);
        assert_eq!(aside[0]["surah"], "Nowhere");
        assert_eq!(aside[2], "garbage");

        // a second open has nothing new to set aside
        BookmarkStore::open(storage.clone()).unwrap();
        let raw = storage.get(UNREADABLE_KEY).unwrap().unwrap();
        let aside: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
        assert_eq!(aside.len(), 3);
    }
}
