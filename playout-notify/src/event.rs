//! Event classification
//!
//! An invocation may carry fields belonging to several events (a webstream
//! callback also passes the media id, a status callback may pass a stale
//! stream id). The first matching rule below wins:
//!
//! 1. error message and stream id: stream status with the error
//! 2. connect flag and stream id: stream status `"OK"`
//! 3. source name and source status: source status
//! 4. webstream payload: webstream metadata (media id optional)
//! 5. media id: media item started playing
//! 6. started flag: engine started
//!
//! Anything else is not an event.

use crate::invocation::EventInvocation;
use std::fmt;

/// Status message reported when an output stream connects
pub const STREAM_OK: &str = "OK";

/// One classified engine event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyEvent {
    /// An output stream connected or failed
    LiquidsoapStatus {
        message: String,
        stream_id: String,
        boot_time: Option<String>,
    },
    /// A live input source changed state
    SourceStatus { name: String, status: String },
    /// Metadata for the webstream on air
    WebstreamData { data: String, media_id: Option<String> },
    /// A scheduled media item started playing
    MediaStartPlaying { media_id: String },
    /// The engine finished booting
    LiquidsoapStarted,
}

impl NotifyEvent {
    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            NotifyEvent::LiquidsoapStatus { .. } => "liquidsoap_status",
            NotifyEvent::SourceStatus { .. } => "source_status",
            NotifyEvent::WebstreamData { .. } => "webstream_data",
            NotifyEvent::MediaStartPlaying { .. } => "media_start_playing",
            NotifyEvent::LiquidsoapStarted => "liquidsoap_started",
        }
    }
}

impl fmt::Display for NotifyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyEvent::LiquidsoapStatus { message, stream_id, .. } => {
                write!(f, "stream {stream_id} status: {message}")
            }
            NotifyEvent::SourceStatus { name, status } => write!(f, "source {name}: {status}"),
            NotifyEvent::WebstreamData { media_id: Some(id), .. } => {
                write!(f, "webstream metadata for media {id}")
            }
            NotifyEvent::WebstreamData { media_id: None, .. } => f.write_str("webstream metadata"),
            NotifyEvent::MediaStartPlaying { media_id } => write!(f, "media {media_id} started"),
            NotifyEvent::LiquidsoapStarted => f.write_str("liquidsoap started"),
        }
    }
}

/// Treat empty strings the same as absent fields
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

/// Decide which single event an invocation describes
pub fn classify(invocation: &EventInvocation) -> Option<NotifyEvent> {
    let stream_id = present(&invocation.stream_id);
    let boot_time = || present(&invocation.time).map(str::to_string);

    if let (Some(error), Some(stream_id)) = (present(&invocation.error), stream_id) {
        return Some(NotifyEvent::LiquidsoapStatus {
            message: error.to_string(),
            stream_id: stream_id.to_string(),
            boot_time: boot_time(),
        });
    }

    if let (true, Some(stream_id)) = (invocation.connect, stream_id) {
        return Some(NotifyEvent::LiquidsoapStatus {
            message: STREAM_OK.to_string(),
            stream_id: stream_id.to_string(),
            boot_time: boot_time(),
        });
    }

    if let (Some(name), Some(status)) = (
        present(&invocation.source_name),
        present(&invocation.source_status),
    ) {
        return Some(NotifyEvent::SourceStatus {
            name: name.to_string(),
            status: status.to_string(),
        });
    }

    if let Some(data) = present(&invocation.webstream) {
        return Some(NotifyEvent::WebstreamData {
            data: data.to_string(),
            media_id: present(&invocation.media_id).map(str::to_string),
        });
    }

    if let Some(media_id) = present(&invocation.media_id) {
        return Some(NotifyEvent::MediaStartPlaying {
            media_id: media_id.to_string(),
        });
    }

    if invocation.liquidsoap_started {
        return Some(NotifyEvent::LiquidsoapStarted);
    }

    None
}
