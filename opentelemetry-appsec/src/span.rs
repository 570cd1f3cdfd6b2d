use opentelemetry::{trace::Span, KeyValue};

/// The only capability this crate needs from a span: setting a tag.
///
/// Every [`Span`] implements it by recording the tag as a span attribute, so
/// SDK spans, [`opentelemetry::global::BoxedSpan`] and custom span types can be
/// passed directly. Implement it yourself to tag something that is not an
/// OpenTelemetry span.
///
/// Tags are set one call at a time. A concurrent reader of the span may
/// observe a partially tagged span.
pub trait TagSpan {
    /// Sets `tag` on the span.
    fn set_tag(&mut self, tag: KeyValue);
}

impl<S: Span> TagSpan for S {
    fn set_tag(&mut self, tag: KeyValue) {
        self.set_attribute(tag)
    }
}
