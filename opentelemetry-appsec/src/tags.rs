//! # AppSec Span Tags
//!
//! Keys and literal values written onto a span when a security event is
//! reported. The Datadog agent and backend read these keys as-is, so they are
//! part of the wire contract and must not change.
//!
//! ## Usage
//!
//! ```rust
//! use opentelemetry::KeyValue;
//! use opentelemetry_appsec::tags;
//!
//! let keep = KeyValue::new(tags::MANUAL_KEEP, true);
//! assert_eq!(keep.key.as_str(), "manual.keep");
//!
//! let ua = tags::request_header_key("user-agent");
//! assert_eq!(ua.as_str(), "http.request.headers.user-agent");
//! ```

use opentelemetry::Key;

/// The serialized security event, `{"triggers": <events>}`.
pub const APPSEC_JSON: Key = Key::from_static_str("_dd.appsec.json");

/// Forces the trace holding the span to be kept regardless of sampling.
pub const MANUAL_KEEP: Key = Key::from_static_str("manual.keep");

/// The reason the trace was retained. Set to [`APPSEC_ORIGIN`].
pub const ORIGIN: Key = Key::from_static_str("_dd.origin");

/// Marks the span as carrying a security event. Required by the AppSec backend.
pub const APPSEC_EVENT: Key = Key::from_static_str("appsec.event");

/// The remote address of the client that sent the request.
///
/// # Examples
///
/// - 10.1.2.3
/// - 2001:db8::1
pub const NETWORK_CLIENT_IP: Key = Key::from_static_str("network.client.ip");

/// Namespace prefix of the per-header request tags.
pub const HTTP_REQUEST_HEADERS_PREFIX: &str = "http.request.headers.";

/// Value of the [`ORIGIN`] tag.
pub const APPSEC_ORIGIN: &str = "appsec";

/// Returns the tag key under which the request header `name` is recorded.
pub fn request_header_key(name: &str) -> Key {
    Key::from(format!("{HTTP_REQUEST_HEADERS_PREFIX}{name}"))
}
