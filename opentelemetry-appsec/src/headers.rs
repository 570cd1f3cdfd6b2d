//! # Collected Request Headers
//!
//! Only a fixed set of request headers may be recorded on a span. This module
//! holds that set and reduces an incoming header map to the recorded subset,
//! flattening multi-value headers into one comma separated string.
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Header names recorded by default, kept sorted.
const DEFAULT_HEADER_NAMES: [&str; 18] = [
    "accept",
    "accept-encoding",
    "accept-language",
    "content-encoding",
    "content-language",
    "content-length",
    "content-type",
    "forwarded",
    "forwarded-for",
    "host",
    "true-client-ip",
    "user-agent",
    "via",
    "x-client-ip",
    "x-cluster-client-ip",
    "x-forwarded",
    "x-forwarded-for",
    "x-real-ip",
];

// TODO Replace this with LazyLock once the MSRV allows it.
static DEFAULT_COLLECTED_HEADERS: OnceLock<CollectedHeaders> = OnceLock::new();

/// Returns the process-wide set of default collected headers.
///
/// The set is built and sorted on first use and never changes afterwards, so
/// it can be shared between threads without locking.
pub fn default_collected_headers() -> &'static CollectedHeaders {
    DEFAULT_COLLECTED_HEADERS.get_or_init(CollectedHeaders::default)
}

/// An immutable, sorted set of lower-case request header names allowed to be
/// recorded on a span.
///
/// Lookups are case-sensitive: `"Host"` is not collected when the set holds
/// `"host"`. Callers are expected to hand over lower-cased names.
///
/// # Example
///
/// ```
/// use opentelemetry_appsec::CollectedHeaders;
/// use std::collections::HashMap;
///
/// let collected = CollectedHeaders::builder()
///     .with_header("X-Amzn-Trace-Id")
///     .build();
/// assert!(collected.contains("x-amzn-trace-id"));
///
/// let headers = HashMap::from([
///     ("accept".to_string(), vec!["text/html", "application/json"]),
///     ("cookie".to_string(), vec!["session=1"]),
/// ]);
/// let normalized = collected.normalize(&headers).unwrap();
/// assert_eq!(normalized["accept"], "text/html,application/json");
/// assert!(!normalized.contains_key("cookie"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectedHeaders {
    names: Box<[Cow<'static, str>]>,
}

impl Default for CollectedHeaders {
    fn default() -> Self {
        CollectedHeaders::builder().build()
    }
}

impl CollectedHeaders {
    /// Creates a [CollectedHeadersBuilder] pre-filled with the default header names.
    pub fn builder() -> CollectedHeadersBuilder {
        CollectedHeadersBuilder {
            names: DEFAULT_HEADER_NAMES.iter().copied().map(Cow::Borrowed).collect(),
        }
    }

    /// Creates a [CollectedHeadersBuilder] with no header names.
    pub fn builder_empty() -> CollectedHeadersBuilder {
        CollectedHeadersBuilder { names: Vec::new() }
    }

    /// Returns `true` if the header `name` is collected.
    pub fn contains(&self, name: &str) -> bool {
        self.names
            .binary_search_by(|probe| (**probe).cmp(name))
            .is_ok()
    }

    /// Iterates over the collected header names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|name| &**name)
    }

    /// Number of collected header names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if no header is collected.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Reduces `headers` to the collected ones.
    ///
    /// Each collected header is kept under its original key, with its values
    /// joined by `,` in the given order. Values are neither trimmed nor
    /// escaped.
    ///
    /// Returns `None` when `headers` is empty or when none of its headers is
    /// collected, never an empty map.
    pub fn normalize<K, V, S>(
        &self,
        headers: &HashMap<K, Vec<V>, S>,
    ) -> Option<HashMap<String, String>>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        if headers.is_empty() {
            return None;
        }
        let normalized: HashMap<String, String> = headers
            .iter()
            .filter(|(name, _)| self.contains(name.as_ref()))
            .map(|(name, values)| {
                (
                    name.as_ref().to_owned(),
                    join_values(values.iter().map(AsRef::as_ref)),
                )
            })
            .collect();
        (!normalized.is_empty()).then_some(normalized)
    }

    /// Reduces an [`http::HeaderMap`] to the collected headers.
    ///
    /// Header names are already lower-case in a `HeaderMap`. Multiple values
    /// of one header are joined by `,` in insertion order. Values that are not
    /// visible ASCII are skipped, and a header left with no value is omitted.
    ///
    /// Returns `None` when nothing is collected.
    #[cfg(feature = "http")]
    #[cfg_attr(docsrs, doc(cfg(feature = "http")))]
    pub fn normalize_header_map(
        &self,
        headers: &http::HeaderMap,
    ) -> Option<HashMap<String, String>> {
        if headers.is_empty() {
            return None;
        }
        let mut normalized = HashMap::new();
        for name in headers.keys() {
            if !self.contains(name.as_str()) {
                continue;
            }
            let mut values = headers
                .get_all(name)
                .iter()
                .filter_map(|value| value.to_str().ok())
                .peekable();
            if values.peek().is_none() {
                continue;
            }
            normalized.insert(name.as_str().to_owned(), join_values(values));
        }
        (!normalized.is_empty()).then_some(normalized)
    }
}

fn join_values<'a>(values: impl Iterator<Item = &'a str>) -> String {
    let mut joined = String::new();
    for (i, value) in values.enumerate() {
        if i > 0 {
            joined.push(',');
        }
        joined.push_str(value);
    }
    joined
}

/// Builder for [`CollectedHeaders`].
///
/// Names are lower-cased when added. [`build`](Self::build) sorts and
/// de-duplicates them once.
#[derive(Clone, Debug)]
pub struct CollectedHeadersBuilder {
    names: Vec<Cow<'static, str>>,
}

impl CollectedHeadersBuilder {
    /// Adds a header name to collect.
    pub fn with_header(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.names.push(ascii_lowercase(name.into()));
        self
    }

    /// Adds several header names to collect.
    pub fn with_headers<I, N>(self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Cow<'static, str>>,
    {
        names
            .into_iter()
            .fold(self, |builder, name| builder.with_header(name))
    }

    /// Create a [CollectedHeaders] with the names added to this builder.
    pub fn build(self) -> CollectedHeaders {
        let mut names = self.names;
        names.sort_unstable();
        names.dedup();
        CollectedHeaders {
            names: names.into_boxed_slice(),
        }
    }
}

fn ascii_lowercase(name: Cow<'static, str>) -> Cow<'static, str> {
    if name.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(name.to_ascii_lowercase())
    } else {
        name
    }
}
