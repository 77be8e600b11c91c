//! In-process registry implementation.
//!
//! Stands in for an external registry in tests and local tooling. The core
//! never holds one of these itself; callers pass it in as a collaborator.

use async_trait::async_trait;
use docseal_canonical::{ContentIdentifier, MetadataIdentifier};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::collaborators::{RecordRef, Registry};
use crate::errors::RegistryError;

#[derive(Debug, Default)]
struct State {
    next_id: u64,
    by_content: HashMap<ContentIdentifier, (MetadataIdentifier, RecordRef)>,
    by_metadata: HashMap<MetadataIdentifier, RecordRef>,
}

/// Registry backed by two in-memory maps. Record ids are sequential from 1.
///
/// When several documents share a metadata identifier, reverse lookup keeps
/// answering with the first record registered under it.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    state: Mutex<State>,
}

impl MemoryRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered records.
    pub fn len(&self) -> usize {
        self.lock().map(|s| s.by_content.len()).unwrap_or(0)
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, RegistryError> {
        self.state
            .lock()
            .map_err(|_| RegistryError::Unavailable("registry lock poisoned".to_string()))
    }
}

#[async_trait]
impl Registry for MemoryRegistry {
    async fn lookup_by_content_id(
        &self,
        id: &ContentIdentifier,
    ) -> Result<Option<RecordRef>, RegistryError> {
        Ok(self.lock()?.by_content.get(id).map(|(_, r)| r.clone()))
    }

    async fn lookup_by_metadata_id(
        &self,
        id: &MetadataIdentifier,
    ) -> Result<Option<RecordRef>, RegistryError> {
        Ok(self.lock()?.by_metadata.get(id).cloned())
    }

    async fn register(
        &self,
        content: &ContentIdentifier,
        metadata: &MetadataIdentifier,
    ) -> Result<RecordRef, RegistryError> {
        let mut state = self.lock()?;
        if let Some((existing_meta, record)) = state.by_content.get(content) {
            if existing_meta == metadata {
                return Ok(record.clone());
            }
            return Err(RegistryError::Conflict {
                content_identifier: content.to_string(),
                record_id: record.to_string(),
            });
        }
        state.next_id += 1;
        let record = RecordRef::new(state.next_id.to_string());
        state
            .by_content
            .insert(content.clone(), (metadata.clone(), record.clone()));
        state
            .by_metadata
            .entry(metadata.clone())
            .or_insert_with(|| record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docseal_canonical::HashingService;

    fn ids(seed: &str) -> (ContentIdentifier, MetadataIdentifier) {
        let hashing = HashingService::default();
        (
            hashing.content_identifier(seed.as_bytes()),
            hashing.metadata_identifier(format!("meta:{}", seed).as_bytes()),
        )
    }

    #[tokio::test]
    async fn register_assigns_sequential_ids() {
        let registry = MemoryRegistry::new();
        let (c1, m1) = ids("one");
        let (c2, m2) = ids("two");
        assert_eq!(registry.register(&c1, &m1).await.unwrap().as_str(), "1");
        assert_eq!(registry.register(&c2, &m2).await.unwrap().as_str(), "2");
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn register_is_idempotent_for_same_pair() {
        let registry = MemoryRegistry::new();
        let (c, m) = ids("doc");
        let first = registry.register(&c, &m).await.unwrap();
        let second = registry.register(&c, &m).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn register_conflicts_on_different_metadata() {
        let registry = MemoryRegistry::new();
        let (c, m) = ids("doc");
        let (_, other) = ids("other");
        registry.register(&c, &m).await.unwrap();
        assert!(matches!(
            registry.register(&c, &other).await,
            Err(RegistryError::Conflict { .. })
        ));
    }

    #[tokio::test]
    async fn shared_metadata_resolves_to_first_record() {
        let registry = MemoryRegistry::new();
        let (c1, m) = ids("one");
        let (c2, _) = ids("two");
        let first = registry.register(&c1, &m).await.unwrap();
        let second = registry.register(&c2, &m).await.unwrap();
        assert_ne!(first, second);
        assert_eq!(registry.lookup_by_content_id(&c2).await.unwrap(), Some(second));
        assert_eq!(registry.lookup_by_metadata_id(&m).await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn lookups_return_registered_record() {
        let registry = MemoryRegistry::new();
        let (c, m) = ids("doc");
        assert!(registry.is_empty());
        assert_eq!(registry.lookup_by_content_id(&c).await.unwrap(), None);
        let record = registry.register(&c, &m).await.unwrap();
        assert_eq!(registry.lookup_by_content_id(&c).await.unwrap(), Some(record.clone()));
        assert_eq!(registry.lookup_by_metadata_id(&m).await.unwrap(), Some(record));
    }
}
