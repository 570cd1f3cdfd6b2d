use opentelemetry::{KeyValue, Value};

use crate::span::TagSpan;

/// A span double recording every tag in the order it was set.
#[derive(Debug, Default)]
pub(crate) struct RecordingSpan {
    pub(crate) tags: Vec<KeyValue>,
}

impl RecordingSpan {
    /// Last value set for `key`.
    pub(crate) fn get(&self, key: &str) -> Option<&Value> {
        self.tags
            .iter()
            .rev()
            .find(|kv| kv.key.as_str() == key)
            .map(|kv| &kv.value)
    }

    pub(crate) fn keys(&self) -> Vec<&str> {
        self.tags.iter().map(|kv| kv.key.as_str()).collect()
    }
}

impl TagSpan for RecordingSpan {
    fn set_tag(&mut self, tag: KeyValue) {
        self.tags.push(tag);
    }
}
