use dashmap::DashMap;
use std::sync::Arc;

use crate::document::ContactResult;

/// Process-lifetime memo of successful lookups, keyed by the query string.
///
/// There is no eviction. Concurrent writers for the same key race and the
/// last one wins, which is fine because any successful answer will do.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: DashMap<String, Arc<ContactResult>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, query: &str) -> Option<Arc<ContactResult>> {
        self.entries.get(query).map(|entry| entry.value().clone())
    }

    pub fn insert(&self, query: &str, result: Arc<ContactResult>) {
        self.entries.insert(query.to_string(), result);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
