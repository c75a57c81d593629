//! Plain-text rendering for the terminal front end.

use std::fmt::Write;

use crate::catalog::{Chapter, Para, Reciter};
use crate::types::{Bookmark, Hadith, Notice, NoticeLevel, PlaybackState, Position, VerseResource};

/// Formats seconds as `m:ss`.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

pub fn verse(resource: &VerseResource, bookmarked: bool) -> String {
    let meta = &resource.content.surah;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}) {}:{}{}",
        meta.english_name,
        meta.name,
        resource.position.chapter,
        resource.position.verse,
        if bookmarked { "  [bookmarked]" } else { "" }
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", resource.content.text);
    if !resource.content.translation.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", resource.content.translation);
    }
    let _ = writeln!(out);
    let _ = write!(out, "Image: {}", resource.image_url);
    out
}

pub fn player(state: &PlaybackState) -> String {
    format!(
        "[{}] {} / {}{}",
        if state.is_playing { "playing" } else { "paused" },
        format_time(state.current_time),
        format_time(state.duration),
        if state.is_looping { "  (loop)" } else { "" }
    )
}

pub fn status(position: &Position, reciter: Option<&Reciter>, loading: bool) -> String {
    format!(
        "{} {}:{} | {} | {}{}",
        position.chapter_name(),
        position.chapter,
        position.verse,
        position.language,
        reciter.map(|r| r.name).unwrap_or("no reciter"),
        if loading { " | loading..." } else { "" }
    )
}

pub fn prompt(remaining: u32) -> String {
    format!("Next verse in {}... (continue / cancel)", remaining)
}

pub fn notice(notice: &Notice) -> String {
    match notice.level {
        NoticeLevel::Info => format!("* {}: {}", notice.title, notice.description),
        NoticeLevel::Error => format!("! {}: {}", notice.title, notice.description),
    }
}

pub fn chapter_row(c: &Chapter) -> String {
    format!(
        "{:>3}. {:<16} {:<28} {:>3} verses  {:<7}  p. {}",
        c.number,
        c.name,
        c.english_name,
        c.verses,
        c.revelation.to_string(),
        c.start_page
    )
}

pub fn para_row(p: &Para) -> String {
    format!(
        "{:>2}. {:<22} {:<32} {:<15} pages {}",
        p.number,
        p.name,
        p.english_name,
        p.verses_range(),
        p.page_range()
    )
}

pub fn bookmark_row(b: &Bookmark) -> String {
    let name = crate::catalog::chapter(b.chapter)
        .map(|c| c.name)
        .unwrap_or("Unknown");
    format!("[{}] {} {}:{}  {}", b.id, name, b.chapter, b.verse, b.text)
}

pub fn hadith(h: &Hadith) -> String {
    format!(
        "{}\n{}\n{}\n\n{}\n{}\n\nRef: {}",
        h.book,
        h.book_name.trim(),
        h.chapter_name.trim(),
        h.header.trim(),
        h.hadith_english.trim(),
        h.refno
    )
}
