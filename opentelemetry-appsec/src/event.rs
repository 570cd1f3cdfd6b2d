use opentelemetry::{otel_error, KeyValue};
use serde::Serialize;
use serde_json::value::RawValue;

use crate::span::TagSpan;
use crate::tags;

/// Errors raised while building the security event tag.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum EventTagError {
    /// The events payload is not valid UTF-8 encoded JSON.
    #[error("invalid appsec events payload: {0}")]
    InvalidEvents(#[source] serde_json::Error),
    /// The event envelope could not be serialized.
    #[error("unexpected error while serializing the appsec event span tag: {0}")]
    Serialize(#[source] serde_json::Error),
}

// Value of the `_dd.appsec.json` tag.
#[derive(Serialize)]
struct EventTag<'a> {
    triggers: Option<&'a RawValue>,
}

/// Wraps the serialized security events into the `{"triggers": ...}`
/// envelope recorded under [`tags::APPSEC_JSON`].
///
/// `events` is embedded verbatim and must therefore be valid JSON. An empty
/// payload is encoded as `null`.
///
/// # Example
///
/// ```
/// use opentelemetry_appsec::encode_event_tag;
///
/// let tag = encode_event_tag(br#"[{"rule":{"id":"crs-913-110"}}]"#).unwrap();
/// assert_eq!(tag, r#"{"triggers":[{"rule":{"id":"crs-913-110"}}]}"#);
///
/// assert_eq!(encode_event_tag(b"").unwrap(), r#"{"triggers":null}"#);
/// assert!(encode_event_tag(b"[{").is_err());
/// ```
pub fn encode_event_tag(events: &[u8]) -> Result<String, EventTagError> {
    let triggers = if events.is_empty() {
        None
    } else {
        let raw: &RawValue =
            serde_json::from_slice(events).map_err(EventTagError::InvalidEvents)?;
        Some(raw)
    };
    serde_json::to_string(&EventTag { triggers }).map_err(EventTagError::Serialize)
}

/// Marks `span` as carrying a security event.
///
/// On success exactly four tags are set, in this order: the serialized events
/// ([`tags::APPSEC_JSON`]), the manual keep flag ([`tags::MANUAL_KEEP`]), the
/// retention origin ([`tags::ORIGIN`]) and the event flag
/// ([`tags::APPSEC_EVENT`]).
///
/// If the events cannot be serialized the failure is logged and the span is
/// left untouched. The error never reaches the caller.
pub fn set_event_tags<S: TagSpan + ?Sized>(span: &mut S, events: &[u8]) {
    let event = match encode_event_tag(events) {
        Ok(event) => event,
        Err(err) => {
            otel_error!(
                name: "AppSec.EventTags.Error",
                reason = format!("{err}")
            );
            return;
        }
    };
    span.set_tag(KeyValue::new(tags::APPSEC_JSON, event));
    // Keep this span due to the security event
    span.set_tag(KeyValue::new(tags::MANUAL_KEEP, true));
    span.set_tag(KeyValue::new(tags::ORIGIN, tags::APPSEC_ORIGIN));
    span.set_tag(KeyValue::new(tags::APPSEC_EVENT, true));
}

#[cfg(test)]
mod tests {
    use opentelemetry::Value;

    use super::*;
    use crate::testing::RecordingSpan;

    #[test]
    fn event_tags_are_set_in_order() {
        let mut span = RecordingSpan::default();
        set_event_tags(&mut span, br#"[{"rule":{"id":"ua0-600-12x"}}]"#);

        assert_eq!(
            span.tags,
            vec![
                KeyValue::new(
                    "_dd.appsec.json",
                    r#"{"triggers":[{"rule":{"id":"ua0-600-12x"}}]}"#
                ),
                KeyValue::new("manual.keep", true),
                KeyValue::new("_dd.origin", "appsec"),
                KeyValue::new("appsec.event", true),
            ]
        );
    }

    #[test]
    fn object_payload_is_embedded_verbatim() {
        let payload = br#"{ "a" : [1, 2] }"#;
        assert_eq!(
            encode_event_tag(payload).unwrap(),
            r#"{"triggers":{ "a" : [1, 2] }}"#
        );
    }

    #[test]
    fn empty_payload_encodes_as_null() {
        let mut span = RecordingSpan::default();
        set_event_tags(&mut span, b"");

        assert_eq!(span.tags.len(), 4);
        assert_eq!(
            span.get("_dd.appsec.json"),
            Some(&Value::from(r#"{"triggers":null}"#))
        );
    }

    #[test]
    fn invalid_payload_sets_no_tags() {
        for payload in [&b"[{"[..], b"not json", b"[1] trailing", b"\"\xff\""] {
            let mut span = RecordingSpan::default();
            set_event_tags(&mut span, payload);
            assert!(span.tags.is_empty(), "payload {payload:?} should not tag");
        }
    }

    #[test]
    fn invalid_payload_reports_invalid_events() {
        let err = encode_event_tag(b"{").unwrap_err();
        assert!(matches!(err, EventTagError::InvalidEvents(_)));
        assert!(err.to_string().starts_with("invalid appsec events payload"));
    }
}
