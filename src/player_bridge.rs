use log::{debug, info};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::error::{Error, Result};
use crate::playback::MediaElement;
use crate::reader::SessionEvent;
use crate::websocket::{spawn_command_forwarder, PlayerBridge, PlayerCommand};

/// Audio element living in a browser page, driven over the player bridge
pub struct RemoteMedia {
    commands: mpsc::UnboundedSender<PlayerCommand>,
    connected: Arc<AtomicUsize>,
    attachment: u64,
}

impl RemoteMedia {
    pub fn connected_players(&self) -> usize {
        self.connected.load(Ordering::SeqCst)
    }

    fn send(&self, command: PlayerCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| Error::Playback("Player bridge is not running".to_string()))
    }
}

impl MediaElement for RemoteMedia {
    fn load(&mut self, attachment: u64, url: &str) -> Result<()> {
        self.attachment = attachment;
        self.send(PlayerCommand::Load {
            attachment,
            url: url.to_string(),
        })
    }

    fn play(&mut self) -> Result<()> {
        if self.connected_players() == 0 {
            return Err(Error::Playback(
                "No player connected. Open the player page to hear the recitation.".to_string(),
            ));
        }
        self.send(PlayerCommand::Play {
            attachment: self.attachment,
        })
    }

    fn pause(&mut self) {
        let _ = self.send(PlayerCommand::Pause {
            attachment: self.attachment,
        });
    }

    fn seek(&mut self, seconds: f64) {
        let _ = self.send(PlayerCommand::Seek {
            attachment: self.attachment,
            seek_time: seconds,
        });
    }

    fn stop(&mut self) {
        if self
            .send(PlayerCommand::Stop {
                attachment: self.attachment,
            })
            .is_err()
        {
            debug!("Stop for #{} dropped, bridge gone", self.attachment);
        }
    }
}

/// Starts the bridge on `port` and wires media events into the session channel.
pub async fn start_player_bridge(
    port: u16,
    events: mpsc::UnboundedSender<SessionEvent>,
) -> Result<(RemoteMedia, SocketAddr)> {
    let mut bridge = PlayerBridge::new();
    bridge.set_event_callback(move |attachment, event| {
        if events.send(SessionEvent::Media { attachment, event }).is_err() {
            debug!("Session closed, media event dropped");
        }
    });
    let addr = bridge.start(port).await?;

    let (tx, rx) = mpsc::unbounded_channel();
    spawn_command_forwarder(Arc::clone(&bridge.clients), rx);
    info!("Audio plays in the browser page connected to ws://{}", addr);

    Ok((
        RemoteMedia {
            commands: tx,
            connected: bridge.connected(),
            attachment: 0,
        },
        addr,
    ))
}
