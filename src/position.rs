//! Position store: current chapter/verse plus language and reciter.
//!
//! Transitions return `true` when the position actually changed so callers
//! only refetch on change.

use log::debug;

use crate::catalog::{self, CHAPTER_COUNT};
use crate::error::{Error, Result};
use crate::input::resolve_chapter;
use crate::types::{Language, Position};

#[derive(Debug, Clone, Default)]
pub struct PositionStore {
    current: Position,
}

impl PositionStore {
    /// Starts at `start`, which must name an existing verse and reciter.
    pub fn new(start: Position) -> Result<Self> {
        validate(&start)?;
        Ok(Self { current: start })
    }

    pub fn position(&self) -> Position {
        self.current
    }

    pub fn next(&mut self) -> bool {
        let total = chapter_verses(self.current.chapter);
        if self.current.verse < total {
            self.current.verse += 1;
        } else if self.current.chapter < CHAPTER_COUNT {
            self.current.chapter += 1;
            self.current.verse = 1;
        } else {
            debug!("Already at the last verse");
            return false;
        }
        true
    }

    pub fn previous(&mut self) -> bool {
        if self.current.verse > 1 {
            self.current.verse -= 1;
        } else if self.current.chapter > 1 {
            self.current.chapter -= 1;
            self.current.verse = chapter_verses(self.current.chapter);
        } else {
            debug!("Already at the first verse");
            return false;
        }
        true
    }

    pub fn is_first(&self) -> bool {
        self.current.chapter == 1 && self.current.verse == 1
    }

    /// Selects a chapter by number or name and moves to its first verse.
    pub fn set_chapter(&mut self, chapter: &str) -> Result<bool> {
        let chapter = resolve_chapter(chapter)?;
        let changed = self.current.chapter != chapter.number || self.current.verse != 1;
        self.current.chapter = chapter.number;
        self.current.verse = 1;
        Ok(changed)
    }

    /// Moves to `verse` of the current chapter.
    ///
    /// Out-of-range verses are refused and the position stays as it was.
    pub fn set_verse(&mut self, verse: u32) -> Result<bool> {
        check_verse(self.current.chapter, verse)?;
        let changed = self.current.verse != verse;
        self.current.verse = verse;
        Ok(changed)
    }

    /// Jumps to an exact chapter and verse.
    pub fn go_to(&mut self, chapter: u16, verse: u32) -> Result<bool> {
        if catalog::chapter(chapter).is_none() {
            return Err(Error::invalid(format!(
                "Please enter a surah number between 1 and {}",
                CHAPTER_COUNT
            )));
        }
        check_verse(chapter, verse)?;
        let changed = self.current.chapter != chapter || self.current.verse != verse;
        self.current.chapter = chapter;
        self.current.verse = verse;
        Ok(changed)
    }

    pub fn set_language(&mut self, language: Language) -> bool {
        let changed = self.current.language != language;
        self.current.language = language;
        changed
    }

    pub fn set_reciter(&mut self, reciter_id: u32) -> Result<bool> {
        if catalog::reciter(reciter_id).is_none() {
            return Err(Error::invalid(format!("Unknown reciter: {}", reciter_id)));
        }
        let changed = self.current.reciter_id != reciter_id;
        self.current.reciter_id = reciter_id;
        Ok(changed)
    }

    /// Back to Al-Fatihah, verse 1. Language and reciter are kept.
    pub fn reset(&mut self) -> bool {
        let changed = !self.is_first();
        self.current.chapter = 1;
        self.current.verse = 1;
        changed
    }
}

fn chapter_verses(chapter: u16) -> u32 {
    catalog::chapter(chapter).map(|c| c.verses).unwrap_or(1)
}

/// Checks that `verse` exists in `chapter`.
pub fn check_verse(chapter: u16, verse: u32) -> Result<()> {
    let total = chapter_verses(chapter);
    if verse == 0 || verse > total {
        return Err(Error::invalid(format!(
            "Invalid verse number: {} has {} verses",
            catalog::chapter(chapter).map(|c| c.name).unwrap_or("this surah"),
            total
        )));
    }
    Ok(())
}

fn validate(position: &Position) -> Result<()> {
    if catalog::chapter(position.chapter).is_none() {
        return Err(Error::invalid(format!("Unknown surah: {}", position.chapter)));
    }
    check_verse(position.chapter, position.verse)?;
    if catalog::reciter(position.reciter_id).is_none() {
        return Err(Error::invalid(format!("Unknown reciter: {}", position.reciter_id)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_at(chapter: u16, verse: u32) -> PositionStore {
        PositionStore::new(Position {
            chapter,
            verse,
            ..Position::default()
        })
        .unwrap()
    }

    #[test]
    fn next_crosses_chapter_boundary() {
        let mut store = store_at(1, 7);
        assert!(store.next());
        assert_eq!((store.position().chapter, store.position().verse), (2, 1));
        assert_eq!(store.position().chapter_name(), "Al-Baqarah");
    }

    #[test]
    fn previous_lands_on_last_verse_of_prior_chapter() {
        let mut store = store_at(2, 1);
        assert!(store.previous());
        assert_eq!((store.position().chapter, store.position().verse), (1, 7));
    }

    #[test]
    fn edges_are_no_ops() {
        let mut first = store_at(1, 1);
        assert!(!first.previous());
        assert_eq!(first.position(), store_at(1, 1).position());

        let mut last = store_at(114, 6);
        assert!(!last.next());
        assert_eq!((last.position().chapter, last.position().verse), (114, 6));
    }

    #[test]
    fn next_then_previous_round_trips_everywhere() {
        for chapter in catalog::CHAPTERS.iter() {
            for verse in 1..=chapter.verses {
                if chapter.number == 114 && verse == 6 {
                    continue;
                }
                let mut store = store_at(chapter.number, verse);
                let before = store.position();
                assert!(store.next());
                assert!(store.previous());
                assert_eq!(store.position(), before);
            }
        }
    }

    #[test]
    fn reset_from_anywhere() {
        let mut store = store_at(55, 13);
        store.set_language(Language::Ur);
        assert!(store.reset());
        let pos = store.position();
        assert_eq!((pos.chapter, pos.verse, pos.language), (1, 1, Language::Ur));
        assert!(!store.reset());
    }

    #[test]
    fn out_of_range_verse_is_refused() {
        let mut store = store_at(1, 3);
        assert!(store.set_verse(8).is_err());
        assert!(store.set_verse(0).is_err());
        assert_eq!(store.position().verse, 3);
        assert!(store.set_verse(7).unwrap());
        assert!(!store.set_verse(7).unwrap());
    }

    #[test]
    fn chapter_selection_resets_verse() {
        let mut store = store_at(2, 100);
        assert!(store.set_chapter("Al-Kahf").unwrap());
        assert_eq!((store.position().chapter, store.position().verse), (18, 1));
        assert!(store.set_chapter("Atlantis").is_err());
        assert_eq!(store.position().chapter, 18);
    }

    #[test]
    fn reciter_must_exist() {
        let mut store = store_at(1, 1);
        assert!(store.set_reciter(3).unwrap());
        assert!(store.set_reciter(0).is_err());
        assert_eq!(store.position().reciter_id, 3);
    }

    #[test]
    fn construction_validates() {
        let bad = Position {
            chapter: 1,
            verse: 8,
            ..Position::default()
        };
        assert!(PositionStore::new(bad).is_err());
        assert!(store_at(2, 286).go_to(115, 1).is_err());
        assert!(store_at(2, 286).go_to(3, 201).is_err());
    }
}
