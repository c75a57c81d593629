//! Mushaf page viewer: flips through the scanned pages of a surah or a para.

use log::debug;

use crate::catalog::{self, Chapter, Para};
use crate::error::{Error, Result};
use crate::input::{parse_number, resolve_chapter};
use crate::routes::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Surah(&'static Chapter),
    Para(&'static Para),
}

impl ViewMode {
    pub fn total_pages(&self) -> u32 {
        match self {
            ViewMode::Surah(c) => c.total_pages(),
            ViewMode::Para(p) => p.total_pages(),
        }
    }

    pub fn title(&self) -> String {
        match self {
            ViewMode::Surah(c) => format!("{}. {}", c.number, c.name),
            ViewMode::Para(p) => format!("Para {} ({})", p.number, p.name),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PageViewer {
    pages_base: String,
    mode: ViewMode,
    page: u32,
}

impl PageViewer {
    pub fn new(pages_base: &str) -> Self {
        Self {
            pages_base: pages_base.trim_end_matches('/').to_string(),
            mode: ViewMode::Surah(&catalog::CHAPTERS[0]),
            page: 1,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn show_surah(&mut self, surah: &str) -> Result<()> {
        let chapter = resolve_chapter(surah)?;
        self.switch(ViewMode::Surah(chapter));
        Ok(())
    }

    pub fn show_para(&mut self, para: &str) -> Result<()> {
        self.switch(ViewMode::Para(parse_para(para)?));
        Ok(())
    }

    fn switch(&mut self, mode: ViewMode) {
        self.mode = mode;
        self.page = 1;
    }

    pub fn next(&mut self) -> u32 {
        self.page = (self.page + 1).min(self.mode.total_pages());
        self.page
    }

    pub fn previous(&mut self) -> u32 {
        self.page = self.page.saturating_sub(1).max(1);
        self.page
    }

    /// Jumps to a typed page number; bad input leaves the page unchanged.
    pub fn set_page(&mut self, input: &str) -> Result<u32> {
        self.page = check_page(input, self.mode.total_pages())?;
        Ok(self.page)
    }

    pub fn image_path(&self) -> String {
        match self.mode {
            ViewMode::Surah(c) => {
                format!("{}/surah-images/{}/{}.png", self.pages_base, c.name, self.page)
            }
            ViewMode::Para(p) => {
                format!("{}/para-images/{}/{}.png", self.pages_base, p.number, self.page)
            }
        }
    }

    pub fn route(&self) -> Route {
        match self.mode {
            ViewMode::Surah(c) => Route::ReadSurah {
                surah: c.name.to_string(),
                page: self.page,
            },
            ViewMode::Para(p) => Route::ReadPara {
                para: p.number,
                page: self.page,
            },
        }
    }
}

fn parse_para(input: &str) -> Result<&'static Para> {
    let n = parse_number(input, "para")?;
    u8::try_from(n)
        .ok()
        .and_then(catalog::para)
        .ok_or_else(|| {
            Error::invalid(format!(
                "Please enter a para number between 1 and {}",
                catalog::PARA_COUNT
            ))
        })
}

fn check_page(input: &str, max: u32) -> Result<u32> {
    match input.trim().parse::<u32>() {
        Ok(n) if (1..=max).contains(&n) => Ok(n),
        _ => {
            debug!("Rejected page input '{}' (max {})", input, max);
            Err(Error::invalid(format!(
                "Invalid Page Number. Please enter a number between 1 and {}.",
                max
            )))
        }
    }
}

/// Go-to form: validates a para and a page inside it and yields the viewer route.
pub fn go_to(para: &str, page: &str) -> Result<Route> {
    let para = parse_para(para)?;
    let page = check_page(page, para.total_pages())?;
    Ok(Route::ReadPara {
        para: para.number,
        page,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surah_paths_and_clamping() {
        let mut viewer = PageViewer::new("/assets/");
        assert_eq!(viewer.image_path(), "/assets/surah-images/Al-Fatihah/1.png");
        assert_eq!(viewer.next(), 1);
        assert_eq!(viewer.previous(), 1);

        viewer.show_surah("Al-Baqarah").unwrap();
        assert_eq!(viewer.mode().total_pages(), 48);
        viewer.set_page("48").unwrap();
        assert_eq!(viewer.next(), 48);
        assert_eq!(viewer.image_path(), "/assets/surah-images/Al-Baqarah/48.png");
    }

    #[test]
    fn bad_page_keeps_current() {
        let mut viewer = PageViewer::new("/assets");
        viewer.show_para("30").unwrap();
        viewer.set_page("4").unwrap();

        assert!(viewer.set_page("abc").is_err());
        assert!(viewer.set_page("0").is_err());
        assert!(viewer.set_page("24").is_err());
        assert_eq!(viewer.page(), 4);
        assert_eq!(viewer.image_path(), "/assets/para-images/30/4.png");
    }

    #[test]
    fn switching_selection_resets_page() {
        let mut viewer = PageViewer::new("/assets");
        viewer.show_para("2").unwrap();
        viewer.next();
        viewer.next();
        assert_eq!(viewer.page(), 3);

        viewer.show_surah("18").unwrap();
        assert_eq!(viewer.page(), 1);
        assert_eq!(viewer.mode(), ViewMode::Surah(catalog::chapter(18).unwrap()));
    }

    #[test]
    fn go_to_validates_para_and_page() {
        assert_eq!(
            go_to("30", "5").unwrap(),
            Route::ReadPara { para: 30, page: 5 }
        );
        assert!(go_to("31", "1").is_err());
        assert!(go_to("1", "22").is_err());
        assert!(go_to("x", "1").is_err());
    }
}
