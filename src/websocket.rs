//! WebSocket server the browser-side audio player connects to.
//!
//! The reader pushes `PLAYER_COMMAND` messages to every connected player page
//! and receives `MEDIA_EVENT` messages back. Each connected page gets its own
//! unbounded channel feeding a writer task, so broadcasting never awaits a
//! slow socket.

use futures_util::{SinkExt, Stream, StreamExt};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::playback::MediaEvent;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeMessage {
    pub message_type: String,
    pub data: serde_json::Value,
    pub timestamp: u64,
}

impl BridgeMessage {
    pub fn new(message_type: &str, data: serde_json::Value) -> Self {
        Self {
            message_type: message_type.to_string(),
            data,
            timestamp: now_millis(),
        }
    }
}

/// Command sent to the player page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum PlayerCommand {
    Load { attachment: u64, url: String },
    Play { attachment: u64 },
    Pause { attachment: u64 },
    Seek {
        attachment: u64,
        #[serde(rename = "seekTime")]
        seek_time: f64,
    },
    Stop { attachment: u64 },
}

/// Payload of a `MEDIA_EVENT` message
#[derive(Debug, Clone, Deserialize)]
pub struct MediaEventData {
    pub attachment: u64,
    pub event: String,
    #[serde(rename = "currentTime")]
    pub current_time: Option<f64>,
    pub duration: Option<f64>,
    pub reason: Option<String>,
}

impl MediaEventData {
    pub fn into_event(self) -> Option<(u64, MediaEvent)> {
        let event = match self.event.as_str() {
            "timeupdate" => MediaEvent::TimeUpdate(self.current_time?),
            "loadedmetadata" => MediaEvent::LoadedMetadata(self.duration?),
            "ended" => MediaEvent::Ended,
            "play_failed" => MediaEvent::PlayFailed(
                self.reason.unwrap_or_else(|| "unknown reason".to_string()),
            ),
            _ => return None,
        };
        Some((self.attachment, event))
    }
}

type ClientConnections = Arc<Mutex<HashMap<String, mpsc::UnboundedSender<Message>>>>;
type EventCallback = Arc<dyn Fn(u64, MediaEvent) + Send + Sync>;

pub struct PlayerBridge {
    pub clients: ClientConnections,
    connected: Arc<AtomicUsize>,
    event_callback: Option<EventCallback>,
}

impl Default for PlayerBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerBridge {
    pub fn new() -> Self {
        Self {
            clients: Arc::new(Mutex::new(HashMap::new())),
            connected: Arc::new(AtomicUsize::new(0)),
            event_callback: None,
        }
    }

    pub fn set_event_callback<F>(&mut self, callback: F)
    where
        F: Fn(u64, MediaEvent) + Send + Sync + 'static,
    {
        self.event_callback = Some(Arc::new(callback));
    }

    /// Number of player pages currently connected.
    pub fn connected(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.connected)
    }

    /// Binds `127.0.0.1:{port}` and serves connections in the background.
    /// Port 0 picks a free port; the bound address is returned.
    pub async fn start(&self, port: u16) -> Result<SocketAddr> {
        let addr = format!("127.0.0.1:{}", port);
        let listener = match TcpListener::bind(&addr).await {
            Ok(listener) => listener,
            Err(e) => {
                error!("Failed to bind player bridge to {}: {}", addr, e);
                error!("Another reader may be running, or the port is taken (set TILAWAH_PLAYER_PORT)");
                return Err(e.into());
            }
        };
        let local = listener.local_addr()?;
        info!("Player bridge listening on: ws://{}", local);

        let clients = Arc::clone(&self.clients);
        let connected = Arc::clone(&self.connected);
        let callback = self.event_callback.clone();

        tokio::spawn(async move {
            while let Ok((stream, addr)) = listener.accept().await {
                let clients = Arc::clone(&clients);
                let connected = Arc::clone(&connected);
                let callback = callback.clone();

                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, addr, clients, connected, callback).await {
                        error!("Error handling connection from {}: {}", addr, e);
                    }
                });
            }
        });

        Ok(local)
    }

    pub async fn broadcast(&self, message: BridgeMessage) -> Result<usize> {
        broadcast(&self.clients, message).await
    }

    pub async fn send_command(&self, command: &PlayerCommand) -> Result<usize> {
        let message = BridgeMessage::new("PLAYER_COMMAND", serde_json::to_value(command)?);
        self.broadcast(message).await
    }
}

/// Sends `message` to every client, dropping those whose channel closed.
/// Returns how many clients received it.
async fn broadcast(clients: &ClientConnections, message: BridgeMessage) -> Result<usize> {
    let mut clients = clients.lock().await;
    let text = serde_json::to_string(&message)?;
    debug!("Broadcasting to {} clients: {}", clients.len(), text);

    if clients.is_empty() {
        warn!("No player connected - {} not sent", message.message_type);
        return Ok(0);
    }

    let ws_message = Message::Text(text);
    let mut disconnected = Vec::new();
    for (client_id, sender) in clients.iter() {
        if sender.send(ws_message.clone()).is_err() {
            disconnected.push(client_id.clone());
        }
    }
    for client_id in &disconnected {
        clients.remove(client_id);
        warn!("Removed disconnected client: {}", client_id);
    }
    Ok(clients.len())
}

async fn handle_connection(
    raw_stream: TcpStream,
    addr: SocketAddr,
    clients: ClientConnections,
    connected: Arc<AtomicUsize>,
    callback: Option<EventCallback>,
) -> Result<()> {
    let ws_stream = accept_async(raw_stream).await?;
    let client_id = Uuid::new_v4().to_string();
    info!("Player connected: {} with ID: {}", addr, client_id);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let welcome = BridgeMessage::new(
        "connected",
        serde_json::json!({ "client_id": client_id, "status": "ready" }),
    );
    ws_sender
        .send(Message::Text(serde_json::to_string(&welcome)?))
        .await?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    {
        let mut guard = clients.lock().await;
        guard.insert(client_id.clone(), tx.clone());
        connected.store(guard.len(), Ordering::SeqCst);
        debug!("Client {} registered. Total clients: {}", client_id, guard.len());
    }

    let writer_id = client_id.clone();
    tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if let Err(e) = ws_sender.send(message).await {
                error!("Failed to send message to client {}: {}", writer_id, e);
                break;
            }
        }
        debug!("Writer task ended for client {}", writer_id);
    });

    let result = read_loop(&mut ws_receiver, &client_id, &tx, callback.as_ref()).await;

    {
        let mut guard = clients.lock().await;
        guard.remove(&client_id);
        connected.store(guard.len(), Ordering::SeqCst);
        info!("Player {} disconnected. Total clients: {}", client_id, guard.len());
    }
    result
}

async fn read_loop<S>(
    ws_receiver: &mut S,
    client_id: &str,
    reply: &mpsc::UnboundedSender<Message>,
    callback: Option<&EventCallback>,
) -> Result<()>
where
    S: Stream<Item = std::result::Result<Message, tungstenite::Error>> + Unpin,
{
    while let Some(msg) = ws_receiver.next().await {
        match msg? {
            Message::Text(text) => {
                let Ok(message) = serde_json::from_str::<BridgeMessage>(&text) else {
                    warn!("Failed to parse message: {}", text);
                    continue;
                };
                match message.message_type.as_str() {
                    "MEDIA_EVENT" => {
                        let parsed = serde_json::from_value::<MediaEventData>(message.data.clone())
                            .ok()
                            .and_then(MediaEventData::into_event);
                        match (parsed, callback) {
                            (Some((attachment, event)), Some(callback)) => callback(attachment, event),
                            (Some(_), None) => debug!("No media listener registered"),
                            (None, _) => error!("Failed to parse media event from: {}", message.data),
                        }
                    }
                    "ping" => {
                        let pong = BridgeMessage::new("pong", serde_json::json!({}));
                        let _ = reply.send(Message::Text(serde_json::to_string(&pong)?));
                    }
                    other => debug!("Unknown message type: {}", other),
                }
            }
            Message::Binary(_) => debug!("Received binary message (not supported)"),
            Message::Close(_) => {
                debug!("Client {} sent close", client_id);
                break;
            }
            _ => {}
        }
    }
    Ok(())
}

/// Forwards commands queued from synchronous code to all player pages.
pub(crate) fn spawn_command_forwarder(
    clients: ClientConnections,
    mut commands: mpsc::UnboundedReceiver<PlayerCommand>,
) {
    tokio::spawn(async move {
        while let Some(command) = commands.recv().await {
            let sent = match serde_json::to_value(&command) {
                Ok(data) => broadcast(&clients, BridgeMessage::new("PLAYER_COMMAND", data)).await,
                Err(e) => Err(Error::from(e)),
            };
            if let Err(e) = sent {
                error!("Failed to forward {:?}: {}", command, e);
            }
        }
        debug!("Command forwarder stopped");
    });
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_serialize_with_command_tag() {
        let value = serde_json::to_value(PlayerCommand::Seek {
            attachment: 3,
            seek_time: 12.5,
        })
        .unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "command": "seek", "attachment": 3, "seekTime": 12.5 })
        );

        let value = serde_json::to_value(PlayerCommand::Load {
            attachment: 1,
            url: "a.mp3".into(),
        })
        .unwrap();
        assert_eq!(value["command"], "load");
        assert_eq!(value["url"], "a.mp3");
    }

    #[test]
    fn media_event_payloads() {
        let data: MediaEventData = serde_json::from_value(serde_json::json!({
            "attachment": 2, "event": "timeupdate", "currentTime": 1.5
        }))
        .unwrap();
        assert_eq!(data.into_event(), Some((2, MediaEvent::TimeUpdate(1.5))));

        let data: MediaEventData = serde_json::from_value(serde_json::json!({
            "attachment": 2, "event": "play_failed", "reason": "NotAllowedError"
        }))
        .unwrap();
        assert_eq!(
            data.into_event(),
            Some((2, MediaEvent::PlayFailed("NotAllowedError".into())))
        );

        let data: MediaEventData = serde_json::from_value(serde_json::json!({
            "attachment": 2, "event": "timeupdate"
        }))
        .unwrap();
        assert_eq!(data.into_event(), None);
    }

    #[tokio::test]
    async fn broadcast_without_clients_reaches_nobody() {
        let bridge = PlayerBridge::new();
        let sent = bridge
            .send_command(&PlayerCommand::Play { attachment: 1 })
            .await
            .unwrap();
        assert_eq!(sent, 0);
    }
}
