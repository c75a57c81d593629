use log::debug;
use regex::Regex;
use std::sync::LazyLock;

use crate::catalog::{self, Chapter, VerseRef};
use crate::error::{Error, Result};

static REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:(\d{1,3})|([^\d:]+?))\s*[:\s.]\s*(\d{1,3})\s*$").expect("valid regex")
});

/// Parses a positive whole number typed by the user.
///
/// `what` names the field in the error message ("verse", "page", ...).
pub fn parse_number(input: &str, what: &str) -> Result<u32> {
    let trimmed = input.trim();
    match trimmed.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => {
            debug!("Rejected {} input: '{}'", what, input);
            Err(Error::invalid(format!("Please enter a valid {} number", what)))
        }
    }
}

/// Resolves a chapter given either its number or its name.
pub fn resolve_chapter(input: &str) -> Result<&'static Chapter> {
    let trimmed = input.trim();
    if let Ok(number) = trimmed.parse::<u16>() {
        return catalog::chapter(number).ok_or_else(|| {
            Error::invalid(format!(
                "Please enter a surah number between 1 and {}",
                catalog::CHAPTER_COUNT
            ))
        });
    }
    catalog::chapter_by_name(trimmed)
        .ok_or_else(|| Error::invalid(format!("Unknown surah: {}", trimmed)))
}

/// Parses a verse reference: `2:255`, `2 255`, `Al-Baqarah:255`, `baqarah 255`.
///
/// The chapter must exist; the verse is only checked for being a number, the
/// caller decides what to do with values beyond the chapter's end.
pub fn parse_reference(input: &str) -> Result<VerseRef> {
    let caps = REFERENCE_RE
        .captures(input)
        .ok_or_else(|| Error::invalid(format!("Not a verse reference: {}", input.trim())))?;

    let chapter = match (caps.get(1), caps.get(2)) {
        (Some(number), _) => resolve_chapter(number.as_str())?,
        (None, Some(name)) => resolve_chapter(name.as_str())?,
        (None, None) => return Err(Error::invalid("Missing surah")),
    };
    let verse = parse_number(&caps[3], "verse")?;

    debug!("Parsed reference '{}' as {}:{}", input, chapter.number, verse);
    Ok(VerseRef {
        chapter: chapter.number,
        verse,
    })
}
