use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::catalog;
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ur,
}

impl Language {
    /// Translation edition served by the verse API for this language
    pub fn edition(&self) -> &'static str {
        match self {
            Language::Ur => "ur.ahmedali",
            Language::En => "en.asad",
        }
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "ur" | "urdu" => Ok(Language::Ur),
            other => Err(Error::invalid(format!("Unsupported language: {}", other))),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::En => f.write_str("en"),
            Language::Ur => f.write_str("ur"),
        }
    }
}

/// Where the reader currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub chapter: u16,
    pub verse: u32,
    pub language: Language,
    pub reciter_id: u32,
}

impl Position {
    pub fn chapter_name(&self) -> &'static str {
        catalog::chapter(self.chapter)
            .map(|c| c.name)
            .unwrap_or("Unknown")
    }

    pub fn verse_ref(&self) -> catalog::VerseRef {
        catalog::VerseRef {
            chapter: self.chapter,
            verse: self.verse,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self {
            chapter: 1,
            verse: 1,
            language: Language::En,
            reciter_id: 1,
        }
    }
}

/// Chapter metadata as returned by the verse API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterMeta {
    pub number: u16,
    pub name: String,
    pub english_name: String,
    #[serde(default)]
    pub english_name_translation: String,
    #[serde(default)]
    pub revelation_type: String,
    pub number_of_ayahs: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerseContent {
    pub text: String,
    #[serde(default)]
    pub translation: String,
    pub surah: ChapterMeta,
}

/// Fetched verse plus the resource URLs derived from its position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerseResource {
    pub position: Position,
    pub content: VerseContent,
    pub image_url: String,
    pub audio_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: u64,
    pub chapter: u16,
    pub verse: u32,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerPhase {
    Idle,
    Ready,
    Playing,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub current_time: f64, // seconds
    pub duration: f64,
    pub is_looping: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            is_looping: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Transient, user-facing notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub level: NoticeLevel,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            level: NoticeLevel::Info,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            level: NoticeLevel::Error,
        }
    }
}

impl From<&Error> for Notice {
    fn from(err: &Error) -> Self {
        Notice::error(err.notice_title(), err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hadith {
    pub book: String,
    #[serde(rename = "bookName")]
    pub book_name: String,
    #[serde(rename = "chapterName")]
    pub chapter_name: String,
    pub hadith_english: String,
    pub header: String,
    pub id: u64,
    pub refno: String,
}
