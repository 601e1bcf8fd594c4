//! Blocking client for the playout scheduling server API
//!
//! The playout side of the system reports what the engine is doing through a
//! handful of legacy `api/` endpoints. Every request is authenticated with the
//! shared API key embedded in the path, and every answer is a small JSON
//! document that callers mostly just log.

mod error;

pub use error::{ApiError, Result};

use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default read timeout for API calls, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Outbound notifications about engine activity.
///
/// One method per event kind the engine can report. Each performs a single
/// blocking request and returns the decoded response body.
pub trait NotificationClient {
    /// The engine finished booting and wants the schedule pushed again
    fn notify_liquidsoap_started(&self) -> Result<Value>;

    /// A scheduled media item started playing
    fn notify_media_item_start_playing(&self, media_id: &str) -> Result<Value>;

    /// An output stream connected (`msg == "OK"`) or failed with an error message
    fn notify_liquidsoap_status(
        &self,
        msg: &str,
        stream_id: &str,
        boot_time: Option<&str>,
    ) -> Result<Value>;

    /// A live input source changed state
    fn notify_source_status(&self, source_name: &str, status: &str) -> Result<Value>;

    /// Metadata arrived for the webstream currently on air
    fn notify_webstream_data(&self, data: &str, media_id: Option<&str>) -> Result<Value>;
}

/// Source of the engine's stream output settings
pub trait StreamSettingProvider {
    /// Fetch the stream settings as a map of setting name to value
    fn get_stream_setting(&self) -> Result<Map<String, Value>>;
}

/// HTTP client for the scheduling server
#[derive(Clone)]
pub struct ApiClient {
    agent: ureq::Agent,
    base_url: Url,
    api_key: String,
}

impl ApiClient {
    /// Create a client with the default timeouts
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with a custom read timeout
    pub fn with_timeout(
        base_url: &str,
        api_key: impl Into<String>,
        read_timeout: Duration,
    ) -> Result<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;

        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(format!(
                "{base_url}: expected an http(s) base URL"
            )));
        }

        Ok(Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(Duration::from_secs(5))
                .timeout_read(read_timeout)
                .build(),
            base_url,
            api_key: api_key.into(),
        })
    }

    /// Build `<base>/api/<segments...>`, percent-encoding every segment
    fn endpoint<'a, I>(&self, segments: I) -> Result<Url>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    fn get(&self, action: &str, url: Url) -> Result<Value> {
        debug!(action, "GET request to scheduling server");
        let response = self.agent.get(url.as_str()).call()?;
        decode_body(response)
    }

    fn post_form(&self, action: &str, url: Url, form: &[(&str, &str)]) -> Result<Value> {
        debug!(action, "POST request to scheduling server");
        let response = self.agent.post(url.as_str()).send_form(form)?;
        decode_body(response)
    }

    fn status_url(&self, msg: &str, stream_id: &str, boot_time: Option<&str>) -> Result<Url> {
        let mut segments = vec![
            "update-liquidsoap-status",
            "format",
            "json",
            "api_key",
            self.api_key.as_str(),
            "msg",
            msg,
            "stream_id",
            stream_id,
        ];
        if let Some(boot_time) = boot_time {
            segments.extend(["boot_time", boot_time]);
        }
        self.endpoint(segments)
    }

    fn webstream_url(&self, media_id: Option<&str>) -> Result<Url> {
        let mut segments = vec!["notify-webstream-data", "api_key", self.api_key.as_str()];
        if let Some(media_id) = media_id {
            segments.extend(["media_id", media_id]);
        }
        segments.extend(["format", "json"]);
        self.endpoint(segments)
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl NotificationClient for ApiClient {
    fn notify_liquidsoap_started(&self) -> Result<Value> {
        let url = self.endpoint([
            "rabbitmq-do-push",
            "api_key",
            self.api_key.as_str(),
            "format",
            "json",
        ])?;
        self.get("rabbitmq-do-push", url)
    }

    fn notify_media_item_start_playing(&self, media_id: &str) -> Result<Value> {
        let url = self.endpoint([
            "notify-media-item-start-play",
            "api_key",
            self.api_key.as_str(),
            "media_id",
            media_id,
            "",
        ])?;
        self.get("notify-media-item-start-play", url)
    }

    fn notify_liquidsoap_status(
        &self,
        msg: &str,
        stream_id: &str,
        boot_time: Option<&str>,
    ) -> Result<Value> {
        let url = self.status_url(msg, stream_id, boot_time)?;
        self.get("update-liquidsoap-status", url)
    }

    fn notify_source_status(&self, source_name: &str, status: &str) -> Result<Value> {
        let url = self.endpoint([
            "update-source-status",
            "format",
            "json",
            "api_key",
            self.api_key.as_str(),
            "sourcename",
            source_name,
            "status",
            status,
        ])?;
        self.get("update-source-status", url)
    }

    fn notify_webstream_data(&self, data: &str, media_id: Option<&str>) -> Result<Value> {
        let url = self.webstream_url(media_id)?;
        self.post_form("notify-webstream-data", url, &[("data", data)])
    }
}

impl StreamSettingProvider for ApiClient {
    fn get_stream_setting(&self) -> Result<Map<String, Value>> {
        let url = self.endpoint([
            "get-stream-setting",
            "format",
            "json",
            "api_key",
            self.api_key.as_str(),
            "",
        ])?;

        match self.get("get-stream-setting", url)? {
            Value::Object(mut body) => match body.remove("msg") {
                Some(Value::Object(settings)) => Ok(settings),
                _ => Err(ApiError::Parse(
                    "stream settings response has no 'msg' object".to_string(),
                )),
            },
            other => Err(ApiError::Parse(format!(
                "expected a JSON object for stream settings, got {other}"
            ))),
        }
    }
}

/// Decode a response body as JSON; an empty body decodes to `Null`
fn decode_body(response: ureq::Response) -> Result<Value> {
    let text = response
        .into_string()
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&text).map_err(|e| ApiError::Parse(e.to_string()))
}
