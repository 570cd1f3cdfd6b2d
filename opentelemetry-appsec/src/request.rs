use std::collections::HashMap;

use opentelemetry::{otel_debug, KeyValue};

use crate::event::set_event_tags;
use crate::headers::{default_collected_headers, CollectedHeaders};
use crate::span::TagSpan;
use crate::tags;

/// Sets the AppSec span tags of a request in which a security event occurred.
///
/// This sets the event tags (see [`set_event_tags`]), then the client IP tag
/// ([`tags::NETWORK_CLIENT_IP`]) even when `remote_ip` is empty, then one
/// `http.request.headers.<name>` tag for every header in
/// [`default_collected_headers`]. A failure to serialize `events` only skips
/// the event tags.
///
/// # Example
///
/// ```
/// use opentelemetry::trace::{Tracer, TracerProvider as _};
/// use opentelemetry_sdk::trace::SdkTracerProvider;
/// use std::collections::HashMap;
///
/// let provider = SdkTracerProvider::builder().build();
/// let mut span = provider.tracer("appsec").start("GET /login");
///
/// let headers = HashMap::from([
///     ("user-agent".to_string(), vec!["Arachni/v1".to_string()]),
///     ("cookie".to_string(), vec!["session=1".to_string()]),
/// ]);
/// opentelemetry_appsec::set_request_tags(
///     &mut span,
///     br#"[{"rule":{"id":"ua0-600-12x"}}]"#,
///     "10.0.0.7",
///     &headers,
/// );
/// ```
pub fn set_request_tags<S, K, V, H>(
    span: &mut S,
    events: &[u8],
    remote_ip: &str,
    headers: &HashMap<K, Vec<V>, H>,
) where
    S: TagSpan + ?Sized,
    K: AsRef<str>,
    V: AsRef<str>,
{
    set_request_tags_with(span, events, remote_ip, headers, default_collected_headers())
}

/// Same as [`set_request_tags`], recording the headers of `collected` instead
/// of the default set.
pub fn set_request_tags_with<S, K, V, H>(
    span: &mut S,
    events: &[u8],
    remote_ip: &str,
    headers: &HashMap<K, Vec<V>, H>,
    collected: &CollectedHeaders,
) where
    S: TagSpan + ?Sized,
    K: AsRef<str>,
    V: AsRef<str>,
{
    set_event_tags(span, events);
    set_client_tags(span, remote_ip, collected.normalize(headers));
}

/// Same as [`set_request_tags`], reading the request headers from an
/// [`http::HeaderMap`]. See [`CollectedHeaders::normalize_header_map`] for
/// how values are read.
#[cfg(feature = "http")]
#[cfg_attr(docsrs, doc(cfg(feature = "http")))]
pub fn set_http_request_tags<S: TagSpan + ?Sized>(
    span: &mut S,
    events: &[u8],
    remote_ip: &str,
    headers: &http::HeaderMap,
) {
    set_event_tags(span, events);
    set_client_tags(
        span,
        remote_ip,
        default_collected_headers().normalize_header_map(headers),
    );
}

fn set_client_tags<S: TagSpan + ?Sized>(
    span: &mut S,
    remote_ip: &str,
    headers: Option<HashMap<String, String>>,
) {
    span.set_tag(KeyValue::new(tags::NETWORK_CLIENT_IP, remote_ip.to_owned()));
    let Some(headers) = headers else {
        return;
    };
    otel_debug!(name: "AppSec.RequestTags.Set", headers = headers.len());
    for (name, value) in headers {
        span.set_tag(KeyValue::new(tags::request_header_key(&name), value));
    }
}
