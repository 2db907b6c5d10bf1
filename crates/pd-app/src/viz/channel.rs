//! Messages to a CAD host plugin.

use std::io::Write;

use serde::Serialize;
use serde_json::Value;

use crate::error::AppResult;

pub const ACTION_BAKE_MODEL: &str = "BakePollinationModel";
pub const ACTION_BAKE_GEOMETRY: &str = "BakeGeometry";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "channel", rename_all = "snake_case")]
pub enum HostMessage {
    /// Live preview toggle in the host viewport.
    Preview {
        unique_id: String,
        data: Value,
        default_checked: bool,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        is_pollination_model: bool,
        label: String,
        key: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        delay_ms: Option<u64>,
    },
    /// One-shot "bake into the host document" action.
    Bake {
        action: String,
        data: Value,
        unique_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        options: Option<Value>,
        key: String,
    },
}

impl HostMessage {
    pub fn key(&self) -> &str {
        match self {
            HostMessage::Preview { key, .. } | HostMessage::Bake { key, .. } => key,
        }
    }

    pub fn unique_id(&self) -> &str {
        match self {
            HostMessage::Preview { unique_id, .. } | HostMessage::Bake { unique_id, .. } => {
                unique_id
            }
        }
    }
}

/// Fire-and-forget message sink. No reply is expected.
pub trait HostChannel {
    fn send(&mut self, message: &HostMessage) -> AppResult<()>;
}

/// Writes one JSON message per line.
pub struct JsonLinesChannel<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesChannel<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> HostChannel for JsonLinesChannel<W> {
    fn send(&mut self, message: &HostMessage) -> AppResult<()> {
        serde_json::to_writer(&mut self.writer, message)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
