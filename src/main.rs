use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use log::error;
use std::process::ExitCode;

use tilawah_lib::bookmarks::BookmarkStore;
use tilawah_lib::catalog::{self, CHAPTERS, HADITH_BOOKS, PARAS, RECITERS};
use tilawah_lib::config::Config;
use tilawah_lib::content::ContentFetcher;
use tilawah_lib::display;
use tilawah_lib::hadith::HadithClient;
use tilawah_lib::halal_jar::{self, EMOTIONS};
use tilawah_lib::input::{parse_reference, resolve_chapter};
use tilawah_lib::page_viewer::{self, PageViewer};
use tilawah_lib::position::check_verse;
use tilawah_lib::routes::Route;
use tilawah_lib::storage::LocalStorage;
use tilawah_lib::theme::ThemeStore;
use tilawah_lib::types::{Language, Position, Theme};

#[derive(Parser)]
#[command(name = "tilawah", version, about = "Read and listen to the Quran, verse by verse")]
struct Cli {
    /// Log at debug level (RUST_LOG still applies)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive verse-by-verse reader with recitation
    Read {
        /// Surah name or number
        #[arg(long)]
        surah: Option<String>,
        /// Verse to open at
        #[arg(long)]
        verse: Option<u32>,
        /// Reference such as 2:255, overrides --surah/--verse
        #[arg(long)]
        at: Option<String>,
        /// Translation language (en or ur)
        #[arg(long)]
        lang: Option<Language>,
        /// Reciter id, see `tilawah reciters`
        #[arg(long)]
        qari: Option<u32>,
    },
    /// List all surahs
    Surahs,
    /// List the thirty paras
    Paras,
    /// List available reciters
    Reciters,
    /// Manage bookmarks
    Bookmarks {
        #[command(subcommand)]
        action: Option<BookmarkAction>,
    },
    /// Fetch a hadith, random when no number is given
    Hadith {
        #[arg(long, default_value = "bukhari")]
        book: String,
        #[arg(long)]
        number: Option<u32>,
    },
    /// Draw a verse for how you feel
    HalalJar {
        /// Feeling, omit to list them
        feeling: Option<String>,
        #[arg(long)]
        lang: Option<Language>,
    },
    /// Show or change the theme
    Theme {
        /// dark, light or toggle
        value: Option<String>,
    },
    /// Mushaf page image for a surah or para
    Page {
        #[arg(long, conflicts_with = "para")]
        surah: Option<String>,
        #[arg(long)]
        para: Option<String>,
        #[arg(long, default_value = "1")]
        page: String,
    },
    /// Jump to a page of a para
    GoTo { para: String, page: String },
}

#[derive(Subcommand)]
enum BookmarkAction {
    List,
    Remove { id: u64 },
    /// Print the verse route for a bookmark
    Open { id: u64 },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    tilawah_lib::init_logging(cli.verbose);

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid configuration")?;

    match command {
        Commands::Read {
            surah,
            verse,
            at,
            lang,
            qari,
        } => {
            let start = start_position(&config, surah, verse, at, lang, qari)?;
            tilawah_lib::run_reader(config, start).await?;
        }
        Commands::Surahs => {
            for c in &CHAPTERS {
                println!("{}", display::chapter_row(c));
            }
        }
        Commands::Paras => {
            for p in &PARAS {
                println!("{}", display::para_row(p));
            }
        }
        Commands::Reciters => {
            for r in &RECITERS {
                println!("{:>2}. {}", r.id, r.name);
            }
        }
        Commands::Bookmarks { action } => bookmarks(&config, action.unwrap_or(BookmarkAction::List))?,
        Commands::Hadith { book, number } => {
            let hadith = HadithClient::new(&config).fetch(&book, number).await.with_context(|| {
                let books: Vec<&str> = HADITH_BOOKS.iter().map(|b| b.value).collect();
                format!("could not fetch hadith (books: {})", books.join(", "))
            })?;
            println!("{}", display::hadith(&hadith));
        }
        Commands::HalalJar { feeling, lang } => match feeling {
            None => {
                for e in &EMOTIONS {
                    println!("{}", e.name);
                }
            }
            Some(feeling) => {
                let fetcher = ContentFetcher::new(&config);
                let resource =
                    halal_jar::draw(&fetcher, &feeling, lang.unwrap_or(config.language)).await?;
                println!("{}", display::verse(&resource, false));
            }
        },
        Commands::Theme { value } => {
            let mut themes = ThemeStore::open(LocalStorage::new(&config.data_dir))?;
            let theme = match value.as_deref() {
                None => themes.current(),
                Some("toggle") => themes.toggle()?,
                Some("dark") => themes.set(Theme::Dark)?,
                Some("light") => themes.set(Theme::Light)?,
                Some(other) => bail!("unknown theme '{}', use dark, light or toggle", other),
            };
            println!("{}", theme.as_str());
        }
        Commands::Page { surah, para, page } => {
            let mut viewer = PageViewer::new(&config.pages_base);
            match (surah, para) {
                (_, Some(para)) => viewer.show_para(&para)?,
                (Some(surah), None) => viewer.show_surah(&surah)?,
                (None, None) => {}
            }
            viewer.set_page(&page)?;
            println!(
                "{} page {}/{}",
                viewer.mode().title(),
                viewer.page(),
                viewer.mode().total_pages()
            );
            println!("{}", viewer.image_path());
            println!("{}", viewer.route().to_path());
        }
        Commands::GoTo { para, page } => {
            println!("{}", page_viewer::go_to(&para, &page)?.to_path());
        }
    }
    Ok(())
}

fn start_position(
    config: &Config,
    surah: Option<String>,
    verse: Option<u32>,
    at: Option<String>,
    lang: Option<Language>,
    qari: Option<u32>,
) -> anyhow::Result<Position> {
    let (chapter, verse) = match at {
        Some(reference) => {
            let r = parse_reference(&reference)?;
            (r.chapter, r.verse)
        }
        None => {
            let chapter = match surah {
                Some(s) => resolve_chapter(&s)?.number,
                None => 1,
            };
            (chapter, verse.unwrap_or(1))
        }
    };
    check_verse(chapter, verse)?;

    let reciter_id = qari.unwrap_or(config.reciter_id);
    if catalog::reciter(reciter_id).is_none() {
        bail!("unknown reciter {}, see `tilawah reciters`", reciter_id);
    }

    Ok(Position {
        chapter,
        verse,
        language: lang.unwrap_or(config.language),
        reciter_id,
    })
}

fn bookmarks(config: &Config, action: BookmarkAction) -> anyhow::Result<()> {
    let mut store = BookmarkStore::open(LocalStorage::new(&config.data_dir))?;
    match action {
        BookmarkAction::List => {
            if store.list().is_empty() {
                println!("No bookmarks yet. Use `bookmark` while reading.");
            }
            for b in store.list() {
                println!("{}", display::bookmark_row(b));
            }
        }
        BookmarkAction::Remove { id } => {
            if !store.remove(id)? {
                bail!("no bookmark with id {}", id);
            }
            println!("Removed bookmark {}", id);
        }
        BookmarkAction::Open { id } => {
            let Some(bookmark) = store.get(id) else {
                bail!("no bookmark with id {}", id);
            };
            println!("{}", Route::for_bookmark(bookmark).to_path());
            println!(
                "tilawah read --at {}:{}",
                bookmark.chapter, bookmark.verse
            );
        }
    }
    Ok(())
}
