//! # OpenTelemetry AppSec Span Tags
//!
//! Records application security events on the service entry span of a
//! request, in the format expected by the Datadog AppSec backend.
//!
//! When a security rule matches, the caller already holds the serialized rule
//! matches ("triggers"), the client address and the parsed request headers.
//! This crate turns them into span tags:
//!
//! | Tag | Value |
//! |---|---|
//! | `_dd.appsec.json` | `{"triggers": <events>}` |
//! | `manual.keep` | `true` |
//! | `_dd.origin` | `"appsec"` |
//! | `appsec.event` | `true` |
//! | `network.client.ip` | the client address |
//! | `http.request.headers.<name>` | comma joined values of a [collected header](CollectedHeaders) |
//!
//! Tags are written through [`TagSpan`], which every
//! [`opentelemetry::trace::Span`] implements.
//!
//! ## Usage
//!
//! ```
//! use opentelemetry::trace::{Tracer, TracerProvider as _};
//! use opentelemetry_appsec::{set_event_tags, CollectedHeaders, set_request_tags_with};
//! use opentelemetry_sdk::trace::SdkTracerProvider;
//! use std::collections::HashMap;
//!
//! let provider = SdkTracerProvider::builder().build();
//! let tracer = provider.tracer("my-service");
//!
//! // Only the event tags.
//! let mut span = tracer.start("rpc");
//! set_event_tags(&mut span, br#"[{"rule":{"id":"sqr-000-001"}}]"#);
//!
//! // Event, client and header tags, collecting one extra header.
//! let collected = CollectedHeaders::builder().with_header("x-request-id").build();
//! let headers = HashMap::from([("x-request-id", vec!["4bf92f35"])]);
//! let mut span = tracer.start("GET /admin");
//! set_request_tags_with(
//!     &mut span,
//!     br#"[{"rule":{"id":"nfd-000-001"}}]"#,
//!     "203.0.113.9",
//!     &headers,
//!     &collected,
//! );
//! ```
//!
//! ## Crate Feature Flags
//!
//! * `internal-logs` (enabled by default): diagnostics, such as an events
//!   payload that cannot be serialized, are emitted through `tracing`.
//! * `http`: read request headers from an [`http::HeaderMap`].
#![warn(
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    rust_2018_idioms,
    unreachable_pub,
    unused
)]
#![cfg_attr(docsrs, feature(doc_cfg), deny(rustdoc::broken_intra_doc_links))]

mod event;
mod headers;
mod request;
mod span;
pub mod tags;
#[cfg(test)]
mod testing;

pub use event::{encode_event_tag, set_event_tags, EventTagError};
pub use headers::{default_collected_headers, CollectedHeaders, CollectedHeadersBuilder};
#[cfg(feature = "http")]
pub use request::set_http_request_tags;
pub use request::{set_request_tags, set_request_tags_with};
pub use span::TagSpan;
