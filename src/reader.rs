//! Reader session: ties position, content, playback, countdown and bookmarks
//! into one event-driven cycle.
//!
//! Position change -> fetch -> attach audio -> natural end -> countdown ->
//! position change. Every fetch is tagged with a generation number and only
//! the latest generation may update the session; slower, superseded
//! responses are dropped.

use log::{debug, info, warn};
use std::collections::VecDeque;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::bookmarks::{AddOutcome, BookmarkStore};
use crate::catalog::VerseRef;
use crate::config::Config;
use crate::content::ContentFetcher;
use crate::countdown::{AutoAdvance, CountdownEvent, CountdownOutcome};
use crate::error::{Error, Result};
use crate::playback::{MediaElement, MediaEvent, PlaybackController, PlaybackSignal};
use crate::position::PositionStore;
use crate::types::{Language, Notice, PlaybackState, PlayerPhase, Position, VerseResource};

pub fn session_channel() -> (UnboundedSender<SessionEvent>, UnboundedReceiver<SessionEvent>) {
    mpsc::unbounded_channel()
}

#[derive(Debug)]
pub enum SessionEvent {
    Loaded {
        generation: u64,
        result: Result<VerseResource>,
    },
    Media {
        attachment: u64,
        event: MediaEvent,
    },
    Countdown(CountdownEvent),
}

impl From<CountdownEvent> for SessionEvent {
    fn from(event: CountdownEvent) -> Self {
        SessionEvent::Countdown(event)
    }
}

/// What a front end should redraw after handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    Nothing,
    Verse,
    Player,
    Prompt(u32),
}

pub struct ReaderSession<M: MediaElement> {
    position: PositionStore,
    fetcher: ContentFetcher,
    player: PlaybackController<M>,
    countdown: AutoAdvance,
    bookmarks: BookmarkStore,
    resource: Option<VerseResource>,
    loading: bool,
    generation: u64,
    events: UnboundedSender<SessionEvent>,
    notices: VecDeque<Notice>,
}

impl<M: MediaElement> ReaderSession<M> {
    /// `events` is the sending half of [`session_channel`]; the owner of the
    /// receiving half feeds every event back into [`ReaderSession::handle`].
    pub fn new(
        config: &Config,
        start: Position,
        media: M,
        bookmarks: BookmarkStore,
        events: UnboundedSender<SessionEvent>,
    ) -> Result<Self> {
        Ok(Self {
            position: PositionStore::new(start)?,
            fetcher: ContentFetcher::new(config),
            player: PlaybackController::new(media),
            countdown: AutoAdvance::new(config.countdown_secs),
            bookmarks,
            resource: None,
            loading: false,
            generation: 0,
            events,
            notices: VecDeque::new(),
        })
    }

    pub fn with_countdown(mut self, countdown: AutoAdvance) -> Self {
        self.countdown = countdown;
        self
    }

    /// Sender for events produced outside the session (media bridge)
    pub fn events(&self) -> UnboundedSender<SessionEvent> {
        self.events.clone()
    }

    pub fn position(&self) -> Position {
        self.position.position()
    }

    pub fn resource(&self) -> Option<&VerseResource> {
        self.resource.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn playback(&self) -> PlaybackState {
        self.player.state()
    }

    pub fn phase(&self) -> PlayerPhase {
        self.player.phase()
    }

    pub fn player(&self) -> &PlaybackController<M> {
        &self.player
    }

    pub fn countdown_remaining(&self) -> Option<u32> {
        self.countdown.remaining()
    }

    pub fn bookmarks(&self) -> &BookmarkStore {
        &self.bookmarks
    }

    pub fn is_bookmarked(&self) -> bool {
        let p = self.position();
        self.bookmarks.is_bookmarked(p.chapter, p.verse)
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    /// Starts a fetch for the current position; returns its generation.
    pub fn refresh(&mut self) -> u64 {
        self.generation += 1;
        let generation = self.generation;
        let position = self.position.position();
        let fetcher = self.fetcher.clone();
        let events = self.events.clone();
        self.loading = true;

        tokio::spawn(async move {
            let result = fetcher.fetch(&position).await;
            if events.send(SessionEvent::Loaded { generation, result }).is_err() {
                debug!("Session gone before fetch {} completed", generation);
            }
        });
        generation
    }

    pub fn handle(&mut self, event: SessionEvent) -> Redraw {
        match event {
            SessionEvent::Loaded { generation, result } => self.on_loaded(generation, result),
            SessionEvent::Media { attachment, event } => {
                match self.player.handle_event(attachment, event) {
                    Some(PlaybackSignal::Finished) => {
                        let id = self.countdown.start(self.events.clone());
                        debug!("Playback finished, countdown {} armed", id);
                        Redraw::Prompt(self.countdown.remaining().unwrap_or(0))
                    }
                    Some(PlaybackSignal::Failed(reason)) => {
                        self.notify(Notice::error("Playback Error", format!(
                            "Unable to play audio. Please try again. ({})",
                            reason
                        )));
                        Redraw::Player
                    }
                    None => Redraw::Player,
                }
            }
            SessionEvent::Countdown(event) => match self.countdown.accept(event) {
                Some(CountdownOutcome::Remaining(n)) => Redraw::Prompt(n),
                Some(CountdownOutcome::Advance) => {
                    self.next();
                    Redraw::Verse
                }
                None => Redraw::Nothing,
            },
        }
    }

    fn on_loaded(&mut self, generation: u64, result: Result<VerseResource>) -> Redraw {
        if generation != self.generation {
            debug!(
                "Discarding stale fetch {} (current {})",
                generation, self.generation
            );
            return Redraw::Nothing;
        }
        self.loading = false;

        match result {
            Ok(resource) => {
                match resource.audio_url.as_deref() {
                    Some(url) if self.player.source() != Some(url) => {
                        if let Err(e) = self.player.attach(url) {
                            self.fail(&e);
                        }
                    }
                    Some(_) => {}
                    None => self.player.detach(),
                }
                self.resource = Some(resource);
            }
            Err(e) => {
                self.fail(&e);
                self.resource = None;
                self.player.detach();
            }
        }
        Redraw::Verse
    }

    pub fn next(&mut self) -> bool {
        let changed = self.position.next();
        self.navigated(changed)
    }

    pub fn previous(&mut self) -> bool {
        let changed = self.position.previous();
        self.navigated(changed)
    }

    pub fn reset(&mut self) -> bool {
        let changed = self.position.reset();
        self.navigated(changed)
    }

    pub fn set_chapter(&mut self, chapter: &str) -> bool {
        let result = self.position.set_chapter(chapter);
        self.apply(result)
    }

    pub fn set_verse(&mut self, verse: u32) -> bool {
        let result = self.position.set_verse(verse);
        self.apply(result)
    }

    pub fn go_to(&mut self, verse: VerseRef) -> bool {
        let result = self.position.go_to(verse.chapter, verse.verse);
        self.apply(result)
    }

    pub fn set_language(&mut self, language: Language) -> bool {
        let changed = self.position.set_language(language);
        self.navigated(changed)
    }

    pub fn set_reciter(&mut self, reciter_id: u32) -> bool {
        let result = self.position.set_reciter(reciter_id);
        self.apply(result)
    }

    pub fn toggle_audio(&mut self) {
        let result = self.player.toggle();
        self.started(result);
    }

    pub fn play(&mut self) {
        let result = self.player.play();
        self.started(result);
    }

    pub fn pause(&mut self) {
        self.player.pause();
    }

    pub fn seek(&mut self, seconds: f64) {
        self.player.seek(seconds);
    }

    pub fn toggle_loop(&mut self) -> bool {
        self.player.toggle_looping()
    }

    /// "Continue" on the next-verse prompt.
    pub fn confirm_advance(&mut self) -> bool {
        if self.countdown.confirm() {
            self.next()
        } else {
            false
        }
    }

    /// "Cancel" on the next-verse prompt.
    pub fn cancel_advance(&mut self) -> bool {
        self.countdown.cancel()
    }

    pub fn add_bookmark(&mut self) -> Option<AddOutcome> {
        let position = self.position();
        let loaded = self
            .resource
            .as_ref()
            .filter(|r| r.position.verse_ref() == position.verse_ref())
            .map(|r| r.content.text.clone());
        let Some(text) = loaded else {
            self.notify(Notice::error(
                "Bookmark",
                "Wait for the verse to load before bookmarking.",
            ));
            return None;
        };

        match self.bookmarks.add(&position, &text) {
            Ok(outcome) => {
                let (title, status) = match &outcome {
                    AddOutcome::Added(_) => ("Bookmark Added", "has been bookmarked"),
                    AddOutcome::AlreadyExists(_) => ("Already Bookmarked", "is already bookmarked"),
                };
                self.notify(Notice::info(
                    title,
                    format!(
                        "Surah {}, Verse {} {}.",
                        position.chapter_name(),
                        position.verse,
                        status
                    ),
                ));
                Some(outcome)
            }
            Err(e) => {
                self.fail(&e);
                None
            }
        }
    }

    pub fn remove_bookmark(&mut self, id: u64) -> bool {
        match self.bookmarks.remove(id) {
            Ok(removed) => removed,
            Err(e) => {
                self.fail(&e);
                false
            }
        }
    }

    fn apply(&mut self, result: Result<bool>) -> bool {
        match result {
            Ok(changed) => self.navigated(changed),
            Err(e) => {
                self.fail(&e);
                false
            }
        }
    }

    fn navigated(&mut self, changed: bool) -> bool {
        if changed {
            self.countdown.cancel();
            let p = self.position();
            info!("Now at {} {}:{}", p.chapter_name(), p.chapter, p.verse);
            self.refresh();
        }
        changed
    }

    // A replay from the end dismisses the next-verse prompt.
    fn started(&mut self, result: Result<()>) {
        match result {
            Ok(()) if self.player.phase() == PlayerPhase::Playing => {
                self.countdown.cancel();
            }
            Ok(()) => {}
            Err(e) => self.fail(&e),
        }
    }

    fn fail(&mut self, err: &Error) {
        warn!("{}", err);
        self.notify(Notice::from(err));
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }
}
