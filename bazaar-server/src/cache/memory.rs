//! In-process suggestion sets
//!
//! Used when no Redis URL is configured, and by tests. Each set is an
//! `Arc` swapped in one map write, which makes `replace` atomic for readers.

use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::BTreeSet;
use std::sync::Arc;

use super::{SuggestionCache, SuggestionKey};
use crate::error::CoreResult;

#[derive(Debug, Default, Clone)]
pub struct MemorySuggestionCache {
    sets: Arc<DashMap<SuggestionKey, Arc<BTreeSet<String>>>>,
}

impl MemorySuggestionCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SuggestionCache for MemorySuggestionCache {
    async fn replace(&self, key: SuggestionKey, values: &BTreeSet<String>) -> CoreResult<()> {
        self.sets.insert(key, Arc::new(values.clone()));
        Ok(())
    }

    async fn members(&self, key: SuggestionKey) -> CoreResult<BTreeSet<String>> {
        let set = self.sets.get(&key).map(|entry| Arc::clone(entry.value()));
        Ok(set.map(|s| (*s).clone()).unwrap_or_default())
    }

    async fn ping(&self) -> CoreResult<()> {
        Ok(())
    }
}
