use std::collections::HashMap;

use crate::catalog;
use crate::error::{Error, Result};
use crate::types::Bookmark;

/// Screens of the reader, addressable by path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    SurahIndex,
    ParaIndex,
    ReadSurah { surah: String, page: u32 },
    ReadPara { para: u8, page: u32 },
    Verse { surah: String, verse: u32 },
    Bookmarks,
    HadithApp,
    HalalJar,
    Contact,
    Help,
    GoTo,
}

impl Route {
    /// Verse screen for a stored bookmark.
    pub fn for_bookmark(bookmark: &Bookmark) -> Route {
        let surah = catalog::chapter(bookmark.chapter)
            .map(|c| c.name.to_string())
            .unwrap_or_else(|| bookmark.chapter.to_string());
        Route::Verse {
            surah,
            verse: bookmark.verse,
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::SurahIndex => "/surah-index/".to_string(),
            Route::ParaIndex => "/para-index/".to_string(),
            Route::ReadSurah { surah, page } => format!(
                "/read-quran/?surah={}&page={}",
                urlencoding::encode(surah),
                page
            ),
            Route::ReadPara { para, page } => format!("/read-quran/?para={}&page={}", para, page),
            Route::Verse { surah, verse } => format!(
                "/verse-translation/?surah={}&verse={}",
                urlencoding::encode(surah),
                verse
            ),
            Route::Bookmarks => "/bookmarks/".to_string(),
            Route::HadithApp => "/hadith-app/".to_string(),
            Route::HalalJar => "/halal-jar/".to_string(),
            Route::Contact => "/contact/".to_string(),
            Route::Help => "/help/".to_string(),
            Route::GoTo => "/go-to/".to_string(),
        }
    }

    pub fn parse(path: &str) -> Result<Route> {
        let (base, query) = path.split_once('?').unwrap_or((path, ""));
        let params = parse_query(query)?;
        let page = || -> Result<u32> {
            match params.get("page") {
                Some(p) => p
                    .parse()
                    .map_err(|_| Error::invalid(format!("Bad page in route: {}", p))),
                None => Ok(1),
            }
        };

        let route = match base.trim_matches('/') {
            "" => Route::Home,
            "surah-index" => Route::SurahIndex,
            "para-index" => Route::ParaIndex,
            "read-quran" => match (params.get("surah"), params.get("para")) {
                (_, Some(para)) => Route::ReadPara {
                    para: para
                        .parse()
                        .map_err(|_| Error::invalid(format!("Bad para in route: {}", para)))?,
                    page: page()?,
                },
                (surah, None) => Route::ReadSurah {
                    surah: surah.cloned().unwrap_or_else(|| "Al-Fatihah".to_string()),
                    page: page()?,
                },
            },
            "verse-translation" => Route::Verse {
                surah: params
                    .get("surah")
                    .cloned()
                    .unwrap_or_else(|| "Al-Fatihah".to_string()),
                verse: match params.get("verse") {
                    Some(v) => v
                        .parse()
                        .map_err(|_| Error::invalid(format!("Bad verse in route: {}", v)))?,
                    None => 1,
                },
            },
            "bookmarks" => Route::Bookmarks,
            "hadith-app" => Route::HadithApp,
            "halal-jar" => Route::HalalJar,
            "contact" => Route::Contact,
            "help" => Route::Help,
            "go-to" => Route::GoTo,
            other => return Err(Error::invalid(format!("Unknown route: /{}", other))),
        };
        Ok(route)
    }
}

fn parse_query(query: &str) -> Result<HashMap<String, String>> {
    let mut params = HashMap::new();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let value = urlencoding::decode(&value.replace('+', " "))
            .map_err(|_| Error::invalid(format!("Bad query value: {}", value)))?
            .into_owned();
        params.insert(key.to_string(), value);
    }
    Ok(params)
}
