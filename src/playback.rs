//! Playback controller: a state machine over one audio resource.
//!
//! The audio itself lives behind [`MediaElement`] (a browser audio element
//! reached through the player bridge, or a test double). Each attached
//! resource gets a fresh attachment id and events carrying an older id are
//! dropped, so a detached resource can no longer move the state.

use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::types::{PlaybackState, PlayerPhase};

/// Transport operations the controller needs from an audio resource
pub trait MediaElement: Send {
    /// Replace the current source with `url`, tagging later events with `attachment`
    fn load(&mut self, attachment: u64, url: &str) -> Result<()>;
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    fn seek(&mut self, seconds: f64);
    /// Stop playback and release the current source
    fn stop(&mut self);
}

/// Events reported by the audio resource
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    TimeUpdate(f64),
    LoadedMetadata(f64),
    Ended,
    PlayFailed(String),
}

/// What the owner should do after an event
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackSignal {
    /// Natural end with looping off
    Finished,
    /// A play attempt failed; state went back to Ready
    Failed(String),
}

pub struct PlaybackController<M: MediaElement> {
    media: M,
    source: Option<String>,
    attachment: u64,
    phase: PlayerPhase,
    state: PlaybackState,
    metadata_loaded: bool,
}

impl<M: MediaElement> PlaybackController<M> {
    pub fn new(media: M) -> Self {
        Self {
            media,
            source: None,
            attachment: 0,
            phase: PlayerPhase::Idle,
            state: PlaybackState::default(),
            metadata_loaded: false,
        }
    }

    pub fn phase(&self) -> PlayerPhase {
        self.phase
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn attachment(&self) -> u64 {
        self.attachment
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    /// Attaches a new resource, stopping whatever was attached before.
    pub fn attach(&mut self, url: &str) -> Result<()> {
        self.detach();
        self.attachment += 1;

        // Looping is a listener preference, it survives source changes.
        let looping = self.state.is_looping;
        self.state = PlaybackState {
            is_looping: looping,
            ..PlaybackState::default()
        };
        self.metadata_loaded = false;

        self.media.load(self.attachment, url)?;
        self.source = Some(url.to_string());
        self.phase = PlayerPhase::Ready;
        info!("Attached audio #{}: {}", self.attachment, url);
        Ok(())
    }

    /// Stops playback and forgets the resource.
    pub fn detach(&mut self) {
        if self.source.take().is_some() {
            self.media.stop();
            debug!("Detached audio #{}", self.attachment);
        }
        self.phase = PlayerPhase::Idle;
        self.state.is_playing = false;
    }

    pub fn play(&mut self) -> Result<()> {
        match self.phase {
            PlayerPhase::Idle => Err(Error::Playback("No audio loaded".to_string())),
            PlayerPhase::Playing => Ok(()),
            PlayerPhase::Ready | PlayerPhase::Ended => {
                if self.phase == PlayerPhase::Ended {
                    self.media.seek(0.0);
                    self.state.current_time = 0.0;
                }
                match self.media.play() {
                    Ok(()) => {
                        self.phase = PlayerPhase::Playing;
                        self.state.is_playing = true;
                        Ok(())
                    }
                    Err(e) => {
                        warn!("Audio playback failed: {}", e);
                        self.phase = PlayerPhase::Ready;
                        self.state.is_playing = false;
                        Err(e)
                    }
                }
            }
        }
    }

    pub fn pause(&mut self) {
        if self.phase == PlayerPhase::Playing {
            self.media.pause();
            self.phase = PlayerPhase::Ready;
            self.state.is_playing = false;
        }
    }

    pub fn toggle(&mut self) -> Result<()> {
        if self.phase == PlayerPhase::Playing {
            self.pause();
            Ok(())
        } else {
            self.play()
        }
    }

    /// Moves the playback offset. Bounds are left to the resource.
    pub fn seek(&mut self, seconds: f64) {
        if self.source.is_none() {
            return;
        }
        self.media.seek(seconds);
        self.state.current_time = seconds;
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.state.is_looping = looping;
    }

    pub fn toggle_looping(&mut self) -> bool {
        self.state.is_looping = !self.state.is_looping;
        self.state.is_looping
    }

    /// Applies an event from the resource tagged `attachment`.
    pub fn handle_event(&mut self, attachment: u64, event: MediaEvent) -> Option<PlaybackSignal> {
        if attachment != self.attachment || self.source.is_none() {
            debug!(
                "Ignoring {:?} from detached audio #{} (current #{})",
                event, attachment, self.attachment
            );
            return None;
        }

        match event {
            MediaEvent::TimeUpdate(t) => {
                self.state.current_time = t;
                None
            }
            MediaEvent::LoadedMetadata(duration) => {
                if !self.metadata_loaded {
                    self.state.duration = duration;
                    self.metadata_loaded = true;
                }
                None
            }
            MediaEvent::Ended => {
                if self.state.is_looping {
                    self.media.seek(0.0);
                    self.state.current_time = 0.0;
                    match self.media.play() {
                        Ok(()) => {
                            self.phase = PlayerPhase::Playing;
                            self.state.is_playing = true;
                            None
                        }
                        Err(e) => {
                            self.phase = PlayerPhase::Ready;
                            self.state.is_playing = false;
                            Some(PlaybackSignal::Failed(e.to_string()))
                        }
                    }
                } else {
                    self.phase = PlayerPhase::Ended;
                    self.state.is_playing = false;
                    Some(PlaybackSignal::Finished)
                }
            }
            MediaEvent::PlayFailed(reason) => {
                warn!("Audio playback failed: {}", reason);
                self.phase = PlayerPhase::Ready;
                self.state.is_playing = false;
                Some(PlaybackSignal::Failed(reason))
            }
        }
    }
}

impl<M: MediaElement> Drop for PlaybackController<M> {
    fn drop(&mut self) {
        self.detach();
    }
}
