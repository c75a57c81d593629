use log::{info, LevelFilter};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};

pub mod bookmarks;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod content;
pub mod countdown;
pub mod display;
pub mod error;
pub mod hadith;
pub mod halal_jar;
pub mod input;
pub mod page_viewer;
pub mod playback;
pub mod player_bridge;
pub mod position;
pub mod reader;
pub mod routes;
pub mod storage;
pub mod theme;
pub mod types;
pub mod websocket;

pub use error::{Error, Result};

use bookmarks::BookmarkStore;
use commands::{execute, Command, Flow, HELP};
use config::Config;
use player_bridge::start_player_bridge;
use reader::{session_channel, ReaderSession, Redraw};
use storage::LocalStorage;
use theme::ThemeStore;
use types::{Notice, PlayerPhase, Position, Theme};

const PLAYER_PAGE: &str = include_str!("../assets/player.html");

/// Logs to stderr. `RUST_LOG` wins over the default `info` level; `verbose`
/// forces `debug`.
pub fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    // Tests and embedders may have installed a logger already.
    let _ = builder.try_init();
}

/// Writes the browser player page for a bridge listening on `addr`.
pub fn write_player_page(dir: &Path, addr: SocketAddr, theme: Theme) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join("player.html");
    let page = PLAYER_PAGE
        .replace("{{PORT}}", &addr.port().to_string())
        .replace("{{THEME}}", theme.as_str());
    fs::write(&path, page)?;
    Ok(path)
}

/// Interactive reader: line commands from stdin, audio through the browser player.
pub async fn run_reader(config: Config, start: Position) -> Result<()> {
    let storage = LocalStorage::new(&config.data_dir);
    let bookmarks = BookmarkStore::open(storage.clone())?;
    let theme = ThemeStore::open(storage)?.current();

    let (events, mut rx) = session_channel();
    let (media, addr) = start_player_bridge(config.player_port, events.clone()).await?;
    let page = write_player_page(&config.data_dir, addr, theme)?;
    println!("Open file://{} in a browser to hear the recitation.", absolute(&page).display());
    println!("Type help for commands.");

    let mut session = ReaderSession::new(&config, start, media, bookmarks, events)?;
    session.refresh();
    info!("Reader started at {}", session.position().verse_ref());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_phase = session.phase();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let flow = Command::parse(&line).and_then(|command| execute(&mut session, command));
                match flow {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::ShowStatus) => print_status(&session),
                    Ok(Flow::ShowHelp) => println!("{}", HELP),
                    Ok(Flow::Continue) => {}
                    Err(e) => println!("{}", display::notice(&Notice::from(&e))),
                }
            }
            Some(event) = rx.recv() => {
                match session.handle(event) {
                    Redraw::Verse => print_verse(&session),
                    Redraw::Prompt(remaining) => println!("{}", display::prompt(remaining)),
                    Redraw::Player | Redraw::Nothing => {}
                }
            }
        }

        let phase = session.phase();
        if phase != last_phase && phase != PlayerPhase::Idle {
            println!("{}", display::player(&session.playback()));
        }
        last_phase = phase;

        for notice in session.take_notices() {
            println!("{}", display::notice(&notice));
        }
    }

    info!("Reader closed");
    Ok(())
}

fn print_verse<M: playback::MediaElement>(session: &ReaderSession<M>) {
    if let Some(resource) = session.resource() {
        println!();
        println!("{}", display::verse(resource, session.is_bookmarked()));
    }
}

fn print_status<M: playback::MediaElement>(session: &ReaderSession<M>) {
    let position = session.position();
    println!(
        "{}",
        display::status(
            &position,
            catalog::reciter(position.reciter_id),
            session.is_loading()
        )
    );
    if session.phase() != PlayerPhase::Idle {
        println!("{}", display::player(&session.playback()));
    }
    if let Some(remaining) = session.countdown_remaining() {
        println!("{}", display::prompt(remaining));
    }
}

fn absolute(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
