//! Publish path: event payloads and the JSON-lines sink
//!
//! The real message broker is an external collaborator. The sink here is
//! the seam it plugs into: decoded state and discovery events arrive over
//! an mpsc channel and leave as one JSON object per line on stdout, where
//! the broker bridge picks them up.

use anyhow::Result;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::frame::{Battery, Command};

/// Current time as milliseconds since the Unix epoch.
pub fn timestamp_ms() -> u64 {
    chrono::Utc::now().timestamp_millis() as u64
}

/// Announcement of a device seen for the first time this run
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryEvent {
    pub device_id: String,
    pub source_file: String,
    pub timestamp_ms: u64,
}

/// Decoded state for one accepted frame
#[derive(Debug, Clone, Serialize)]
pub struct StateEvent {
    pub device_id: String,
    pub command: Command,
    pub battery: Battery,
    pub source_file: String,
    pub timestamp_ms: u64,
}

/// Event envelope sent to the sink
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PublishEvent {
    Discovery(DiscoveryEvent),
    State(StateEvent),
}

/// JSON-lines event sink
pub struct JsonLinesSink;

impl JsonLinesSink {
    pub fn new() -> Self {
        Self
    }

    /// Drain the event channel until it closes, writing one JSON line per
    /// event. A payload that fails to serialize is logged and skipped;
    /// only a broken stdout ends the sink early.
    pub async fn run(&self, mut rx: mpsc::Receiver<PublishEvent>) -> Result<()> {
        let mut out = tokio::io::stdout();
        info!("[Publish] JSON-lines sink started");

        while let Some(event) = rx.recv().await {
            match serde_json::to_string(&event) {
                Ok(mut line) => {
                    line.push('\n');
                    out.write_all(line.as_bytes()).await?;
                    out.flush().await?;
                }
                Err(e) => {
                    warn!("[Publish] failed to serialize event: {}", e);
                }
            }
        }

        info!("[Publish] channel closed, sink stopped");
        Ok(())
    }
}

impl Default for JsonLinesSink {
    fn default() -> Self {
        Self::new()
    }
}
