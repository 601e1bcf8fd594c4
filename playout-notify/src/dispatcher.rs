//! Relays one classified event to the scheduling server

use crate::event::{classify, NotifyEvent};
use crate::invocation::EventInvocation;
use api_client::{ApiError, NotificationClient};
use serde_json::Value;
use tracing::{debug, error, info};

/// What happened to one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The event was delivered
    Delivered(&'static str),
    /// No event matched; nothing was sent
    Unrecognized,
    /// The event was classified but delivery failed
    Failed(&'static str),
}

/// Sends engine events through a [`NotificationClient`]
#[derive(Debug)]
pub struct Notifier<C> {
    client: C,
}

impl<C: NotificationClient> Notifier<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Classify the invocation and send at most one notification.
    ///
    /// Never fails: delivery errors are logged and reported as
    /// [`Outcome::Failed`] so the engine is never held up by them.
    pub fn run(&self, invocation: &EventInvocation) -> Outcome {
        let Some(event) = classify(invocation) else {
            debug!(?invocation, "Unrecognized invocation, doing nothing");
            return Outcome::Unrecognized;
        };

        let kind = event.kind();
        match self.dispatch(&event) {
            Ok(()) => Outcome::Delivered(kind),
            Err(e) => {
                error!(event = kind, error = ?e, "Failed to notify scheduling server of {}", event);
                Outcome::Failed(kind)
            }
        }
    }

    /// Make the single API call for `event`
    pub fn dispatch(&self, event: &NotifyEvent) -> Result<(), ApiError> {
        match event {
            NotifyEvent::LiquidsoapStatus {
                message,
                stream_id,
                boot_time,
            } => {
                info!(stream_id = %stream_id, msg = %message, "Updating liquidsoap status");
                let response =
                    self.client
                        .notify_liquidsoap_status(message, stream_id, boot_time.as_deref())?;
                info!(response = %response, "Liquidsoap status updated");
            }
            NotifyEvent::SourceStatus { name, status } => {
                debug!(source = %name, status = %status, "Updating source status");
                let response = self.client.notify_source_status(name, status)?;
                log_response(&response);
            }
            NotifyEvent::WebstreamData { data, media_id } => {
                debug!(media_id = ?media_id, "Updating webstream data");
                let response = self.client.notify_webstream_data(data, media_id.as_deref())?;
                log_response(&response);
            }
            NotifyEvent::MediaStartPlaying { media_id } => {
                debug!(media_id = %media_id, "Updating what's playing");
                let response = self.client.notify_media_item_start_playing(media_id)?;
                log_response(&response);
            }
            NotifyEvent::LiquidsoapStarted => {
                debug!("Notifying server that Liquidsoap has started");
                self.client.notify_liquidsoap_started()?;
            }
        }

        Ok(())
    }
}

fn log_response(response: &Value) {
    debug!(response = %response, "Response");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Started,
        MediaStart(String),
        Status(String, String, Option<String>),
        SourceStatus(String, String),
        Webstream(String, Option<String>),
    }

    /// Records every call; fails all of them when `fail` is set
    #[derive(Default)]
    struct RecordingClient {
        calls: RefCell<Vec<Call>>,
        fail: bool,
    }

    impl RecordingClient {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn record(&self, call: Call) -> api_client::Result<Value> {
            self.calls.borrow_mut().push(call);
            if self.fail {
                Err(ApiError::Network("connection refused".to_string()))
            } else {
                Ok(json!({"status": 1}))
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }
    }

    impl NotificationClient for RecordingClient {
        fn notify_liquidsoap_started(&self) -> api_client::Result<Value> {
            self.record(Call::Started)
        }

        fn notify_media_item_start_playing(&self, media_id: &str) -> api_client::Result<Value> {
            self.record(Call::MediaStart(media_id.to_string()))
        }

        fn notify_liquidsoap_status(
            &self,
            msg: &str,
            stream_id: &str,
            boot_time: Option<&str>,
        ) -> api_client::Result<Value> {
            self.record(Call::Status(
                msg.to_string(),
                stream_id.to_string(),
                boot_time.map(str::to_string),
            ))
        }

        fn notify_source_status(&self, source_name: &str, status: &str) -> api_client::Result<Value> {
            self.record(Call::SourceStatus(source_name.to_string(), status.to_string()))
        }

        fn notify_webstream_data(
            &self,
            data: &str,
            media_id: Option<&str>,
        ) -> api_client::Result<Value> {
            self.record(Call::Webstream(data.to_string(), media_id.map(str::to_string)))
        }
    }

    fn s(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    #[test]
    fn test_error_status_is_the_only_call() {
        let notifier = Notifier::new(RecordingClient::default());
        let invocation = EventInvocation {
            error: s("Connection refused"),
            stream_id: s("2"),
            time: s("1700000000"),
            media_id: s("99"),
            connect: true,
            liquidsoap_started: true,
            ..Default::default()
        };

        assert_eq!(notifier.run(&invocation), Outcome::Delivered("liquidsoap_status"));
        assert_eq!(
            notifier.client().calls(),
            vec![Call::Status("Connection refused".into(), "2".into(), s("1700000000"))]
        );
    }

    #[test]
    fn test_media_id_only() {
        let notifier = Notifier::new(RecordingClient::default());
        let invocation = EventInvocation {
            media_id: s("1234"),
            ..Default::default()
        };

        assert_eq!(notifier.run(&invocation), Outcome::Delivered("media_start_playing"));
        assert_eq!(notifier.client().calls(), vec![Call::MediaStart("1234".into())]);
    }

    #[test]
    fn test_webstream_with_media_id_does_not_also_start_media() {
        let notifier = Notifier::new(RecordingClient::default());
        let invocation = EventInvocation {
            webstream: s(r#"{"title":"Live"}"#),
            media_id: s("7"),
            ..Default::default()
        };

        notifier.run(&invocation);
        assert_eq!(
            notifier.client().calls(),
            vec![Call::Webstream(r#"{"title":"Live"}"#.into(), s("7"))]
        );
    }

    #[test]
    fn test_source_status_and_started() {
        let notifier = Notifier::new(RecordingClient::default());

        notifier.run(&EventInvocation {
            source_name: s("master_dj"),
            source_status: s("off"),
            ..Default::default()
        });
        notifier.run(&EventInvocation {
            liquidsoap_started: true,
            ..Default::default()
        });

        assert_eq!(
            notifier.client().calls(),
            vec![
                Call::SourceStatus("master_dj".into(), "off".into()),
                Call::Started
            ]
        );
    }

    #[test]
    fn test_unrecognized_invocation_makes_no_calls() {
        let notifier = Notifier::new(RecordingClient::default());
        let invocation = EventInvocation {
            connect: true,
            data: s("{}"),
            ..Default::default()
        };

        assert_eq!(notifier.run(&invocation), Outcome::Unrecognized);
        assert!(notifier.client().calls().is_empty());
    }

    #[test]
    fn test_client_failure_is_swallowed() {
        let notifier = Notifier::new(RecordingClient::failing());
        let invocations = [
            EventInvocation {
                error: s("down"),
                stream_id: s("1"),
                ..Default::default()
            },
            EventInvocation {
                connect: true,
                stream_id: s("1"),
                ..Default::default()
            },
            EventInvocation {
                source_name: s("a"),
                source_status: s("on"),
                ..Default::default()
            },
            EventInvocation {
                webstream: s("{}"),
                ..Default::default()
            },
            EventInvocation {
                media_id: s("3"),
                ..Default::default()
            },
            EventInvocation {
                liquidsoap_started: true,
                ..Default::default()
            },
        ];

        for invocation in &invocations {
            assert!(matches!(notifier.run(invocation), Outcome::Failed(_)));
        }
        assert_eq!(notifier.client().calls().len(), invocations.len());
    }

    #[test]
    fn test_dispatch_propagates_client_error() {
        let notifier = Notifier::new(RecordingClient::failing());
        let result = notifier.dispatch(&NotifyEvent::LiquidsoapStarted);
        assert!(matches!(result, Err(ApiError::Network(_))));
    }
}
