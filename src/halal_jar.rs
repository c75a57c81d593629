//! "I'm feeling..." jar: a few comforting verses per emotion, one drawn at random.

use log::info;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::VerseRef;
use crate::content::ContentFetcher;
use crate::error::{Error, Result};
use crate::types::{Language, Position, VerseResource};

#[derive(Debug)]
pub struct Emotion {
    pub name: &'static str,
    pub verses: &'static [VerseRef],
}

const fn v(chapter: u16, verse: u32) -> VerseRef {
    VerseRef { chapter, verse }
}

pub static EMOTIONS: [Emotion; 9] = [
    Emotion { name: "anxious", verses: &[v(13, 28), v(2, 286), v(65, 3), v(9, 51), v(3, 173)] },
    Emotion { name: "sad", verses: &[v(94, 5), v(94, 6), v(12, 86), v(9, 40), v(3, 139)] },
    Emotion { name: "lonely", verses: &[v(2, 186), v(50, 16), v(57, 4), v(20, 46)] },
    Emotion { name: "angry", verses: &[v(3, 134), v(41, 34), v(42, 37), v(7, 199)] },
    Emotion { name: "grateful", verses: &[v(14, 7), v(2, 152), v(16, 18), v(55, 13)] },
    Emotion { name: "lost", verses: &[v(93, 7), v(1, 6), v(6, 125), v(29, 69)] },
    Emotion { name: "hopeless", verses: &[v(39, 53), v(12, 87), v(15, 56), v(65, 7)] },
    Emotion { name: "guilty", verses: &[v(39, 53), v(4, 110), v(25, 70), v(3, 135)] },
    Emotion { name: "happy", verses: &[v(10, 58), v(93, 11), v(16, 97), v(3, 170)] },
];

pub fn emotion(name: &str) -> Option<&'static Emotion> {
    let wanted = name.trim().to_lowercase();
    EMOTIONS.iter().find(|e| e.name == wanted)
}

impl Emotion {
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> VerseRef {
        // Every entry in the table has at least one verse.
        *self.verses.choose(rng).unwrap_or(&self.verses[0])
    }
}

/// Draws a verse for `feeling` and fetches it in `language`.
pub async fn draw(
    fetcher: &ContentFetcher,
    feeling: &str,
    language: Language,
) -> Result<VerseResource> {
    let emotion = emotion(feeling).ok_or_else(|| {
        let known: Vec<&str> = EMOTIONS.iter().map(|e| e.name).collect();
        Error::invalid(format!(
            "Unknown feeling '{}'. Try one of: {}",
            feeling.trim(),
            known.join(", ")
        ))
    })?;
    let verse = emotion.pick(&mut rand::thread_rng());
    info!("Halal jar drew {} for '{}'", verse, emotion.name);

    let position = Position {
        chapter: verse.chapter,
        verse: verse.verse,
        language,
        ..Position::default()
    };
    fetcher.fetch(&position).await
}
