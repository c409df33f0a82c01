//! Suggestion lookups over the cached name sets

use shared::error::ErrorCode;
use std::collections::BTreeSet;
use std::sync::Arc;
use unicode_normalization::UnicodeNormalization;

use crate::cache::{SuggestionCache, SuggestionKey};

/// Expands a free-text substring into candidate category and product names
#[derive(Clone)]
pub struct SuggestionService {
    cache: Arc<dyn SuggestionCache>,
}

impl SuggestionService {
    pub fn new(cache: Arc<dyn SuggestionCache>) -> Self {
        Self { cache }
    }

    /// Category names containing `substring`
    pub async fn category_suggestions(&self, substring: &str) -> Vec<String> {
        self.lookup(SuggestionKey::Categories, substring).await
    }

    /// Approved product names containing `substring`
    pub async fn product_suggestions(&self, substring: &str) -> Vec<String> {
        self.lookup(SuggestionKey::Products, substring).await
    }

    async fn lookup(&self, key: SuggestionKey, substring: &str) -> Vec<String> {
        match self.cache.members(key).await {
            Ok(members) => filter_matching(&members, substring),
            Err(e) => {
                tracing::warn!(
                    key = %key,
                    code = %ErrorCode::CacheUnavailable,
                    error = %e,
                    "Suggestion cache read failed, returning no suggestions"
                );
                Vec::new()
            }
        }
    }
}

/// NFC form, lowercased, then NFC again since case mapping can denormalize
fn fold(s: &str) -> String {
    s.nfc().collect::<String>().to_lowercase().nfc().collect()
}

/// Members containing `substring`, case-insensitively, sorted
fn filter_matching(members: &BTreeSet<String>, substring: &str) -> Vec<String> {
    let needle = fold(substring);
    // BTreeSet iteration is already sorted and unique
    members
        .iter()
        .filter(|m| needle.is_empty() || fold(m).contains(&needle))
        .cloned()
        .collect()
}
