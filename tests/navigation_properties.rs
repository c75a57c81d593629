//! Property-based tests for verse navigation.

use proptest::prelude::*;
use tilawah_lib::catalog::{self, CHAPTERS};
use tilawah_lib::input::parse_reference;
use tilawah_lib::position::PositionStore;
use tilawah_lib::types::{Language, Position};

fn valid_position() -> impl Strategy<Value = Position> {
    (1u16..=114, any::<prop::sample::Index>(), 1u32..=8, any::<bool>()).prop_map(
        |(chapter, index, reciter_id, urdu)| {
            let verses = catalog::chapter(chapter).map(|c| c.verses).unwrap_or(1);
            Position {
                chapter,
                verse: index.index(verses as usize) as u32 + 1,
                language: if urdu { Language::Ur } else { Language::En },
                reciter_id,
            }
        },
    )
}

proptest! {
    /// next then previous returns to the start everywhere except the last verse
    #[test]
    fn next_then_previous_round_trips(start in valid_position()) {
        let mut store = PositionStore::new(start).unwrap();
        let moved = store.next();
        if start.chapter == 114 && start.verse == 6 {
            prop_assert!(!moved);
        } else {
            prop_assert!(moved);
            prop_assert!(store.previous());
        }
        prop_assert_eq!(store.position(), start);
    }

    /// Any sequence of steps keeps the position inside the text
    #[test]
    fn steps_never_leave_the_text(
        start in valid_position(),
        steps in prop::collection::vec(any::<bool>(), 1..200)
    ) {
        let mut store = PositionStore::new(start).unwrap();
        for forward in steps {
            if forward { store.next(); } else { store.previous(); }
            let p = store.position();
            let chapter = catalog::chapter(p.chapter);
            prop_assert!(chapter.is_some());
            prop_assert!(p.verse >= 1 && p.verse <= chapter.map(|c| c.verses).unwrap_or(0));
            prop_assert_eq!(p.language, start.language);
            prop_assert_eq!(p.reciter_id, start.reciter_id);
        }
    }

    /// Out-of-range verse input is refused and leaves the position alone
    #[test]
    fn out_of_range_verse_is_rejected(start in valid_position(), extra in 1u32..500) {
        let mut store = PositionStore::new(start).unwrap();
        let verses = CHAPTERS[usize::from(start.chapter) - 1].verses;
        prop_assert!(store.set_verse(verses + extra).is_err());
        prop_assert_eq!(store.position(), start);
    }

    /// Numeric references parse back to the same verse
    #[test]
    fn numeric_references_parse(start in valid_position()) {
        let reference = format!("{}:{}", start.chapter, start.verse);
        let parsed = parse_reference(&reference).unwrap();
        prop_assert_eq!((parsed.chapter, parsed.verse), (start.chapter, start.verse));
    }
}

#[test]
fn walking_forward_visits_every_verse_once() {
    let mut store = PositionStore::new(Position::default()).unwrap();
    let mut visited = 1;
    while store.next() {
        visited += 1;
    }
    assert_eq!(visited, 6236);
    assert_eq!((store.position().chapter, store.position().verse), (114, 6));
}
