use std::collections::HashMap;

/// One timestamped raw reading for a resource key
#[derive(Debug, Clone, PartialEq)]
pub struct Sample<T> {
    pub value: T,
    pub timestamp_ms: i64,
}

impl<T> Sample<T> {
    pub fn new(value: T, timestamp_ms: i64) -> Self {
        Self { value, timestamp_ms }
    }
}

/// Last-seen sample per resource key.
///
/// Every stateful collector owns exactly one store, so keys are scoped to
/// the collector's monitor kind. Entries are never evicted: a device that
/// disappears keeps its final sample for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct SampleStore<T> {
    entries: HashMap<String, Sample<T>>,
}

impl<T> SampleStore<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Sample<T>> {
        self.entries.get(key)
    }

    pub fn put(&mut self, key: impl Into<String>, sample: Sample<T>) {
        self.entries.insert(key.into(), sample);
    }

    /// Store `sample` for `key` and hand back the sample it replaced
    pub fn replace(&mut self, key: impl Into<String>, sample: Sample<T>) -> Option<Sample<T>> {
        let key = key.into();
        let previous = self.entries.remove(&key);
        self.put(key, sample);
        previous
    }
}

impl<T> Default for SampleStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
