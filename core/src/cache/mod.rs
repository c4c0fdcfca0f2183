//! Activation cache
//!
//! Memoizes validated activations by external id for the lifetime of a
//! session. Activation content is immutable once published under an id, so
//! there is no TTL and no eviction; the cache is bounded in practice by the
//! number of distinct activations a distribution references.
//!
//! The one place real concurrency matters is a miss: concurrent requests for
//! the same uncached id must trigger exactly one load. The discipline is
//! single-flight per key: a leader runs the loader with no lock held while
//! followers park on a oneshot and receive the leader's result, shared
//! failure included. Loads for different ids never serialize against each
//! other. Failed loads are not stored, so the next request retries.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;

use overcue_types::ExternalId;

use crate::model::{Activation, ValidationError};

/// An activation could not be obtained.
///
/// Cloneable so a single failure can be handed to every waiter of a
/// single-flight load.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    /// The external fetch collaborator failed.
    #[error("activation fetch failed: {0}")]
    Fetch(String),

    /// The fetched document was rejected during validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The load driving this request went away before completing (e.g. its
    /// tick was cancelled). The next request starts a fresh load.
    #[error("activation load interrupted before completion")]
    Interrupted,
}

type LoadResult = Result<Arc<Activation>, LoadError>;

enum Slot {
    Ready(Arc<Activation>),
    Loading(Vec<oneshot::Sender<LoadResult>>),
}

/// Session-scoped activation store. Cheap to share; all methods take `&self`.
#[derive(Default)]
pub struct ActivationCache {
    slots: Mutex<HashMap<ExternalId, Slot>>,
}

enum Role {
    Hit(Arc<Activation>),
    Follower(oneshot::Receiver<LoadResult>),
    Leader,
}

impl ActivationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch-or-load an activation.
    ///
    /// A hit returns the stored value without invoking `loader`. On a miss,
    /// exactly one caller runs `loader`; everyone else requesting the same
    /// id meanwhile receives that caller's result. Because an id's content
    /// never changes, a stored entry is never replaced, so the cache cannot
    /// hold two values for one id.
    pub async fn get_or_load<F, Fut>(&self, id: &ExternalId, loader: F) -> LoadResult
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Activation, LoadError>>,
    {
        let role = {
            let mut slots = self.slots.lock().expect("activation cache poisoned");
            match slots.get_mut(id) {
                Some(Slot::Ready(activation)) => Role::Hit(activation.clone()),
                Some(Slot::Loading(waiters)) => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    Role::Follower(rx)
                }
                None => {
                    slots.insert(id.clone(), Slot::Loading(Vec::new()));
                    Role::Leader
                }
            }
        };

        match role {
            Role::Hit(activation) => Ok(activation),
            Role::Follower(rx) => rx.await.unwrap_or(Err(LoadError::Interrupted)),
            Role::Leader => {
                let guard = LeaderGuard { cache: self, id };
                let result = loader().await.map(Arc::new);
                guard.finish(result)
            }
        }
    }

    /// Whether an activation is already stored under this id.
    pub fn contains(&self, id: &ExternalId) -> bool {
        matches!(
            self.slots
                .lock()
                .expect("activation cache poisoned")
                .get(id),
            Some(Slot::Ready(_))
        )
    }

    /// Number of stored activations (in-flight loads excluded).
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .expect("activation cache poisoned")
            .values()
            .filter(|slot| matches!(slot, Slot::Ready(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Settle a finished load: store success, drop failure, wake waiters.
    fn settle(&self, id: &ExternalId, result: &LoadResult) {
        let waiters = {
            let mut slots = self.slots.lock().expect("activation cache poisoned");
            let previous = match result {
                Ok(activation) => slots.insert(id.clone(), Slot::Ready(activation.clone())),
                Err(_) => slots.remove(id),
            };
            match previous {
                Some(Slot::Loading(waiters)) => waiters,
                _ => Vec::new(),
            }
        };

        for waiter in waiters {
            // A follower that gave up waiting is fine to ignore.
            let _ = waiter.send(result.clone());
        }
    }
}

/// Clears a leader's in-flight slot if the leader's future is dropped
/// mid-load, so parked followers fail with `Interrupted` instead of waiting
/// forever and a later request can start over.
struct LeaderGuard<'a> {
    cache: &'a ActivationCache,
    id: &'a ExternalId,
}

impl LeaderGuard<'_> {
    fn finish(self, result: LoadResult) -> LoadResult {
        self.cache.settle(self.id, &result);
        std::mem::forget(self);
        result
    }
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        self.cache.settle(self.id, &Err(LoadError::Interrupted));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use overcue_types::ActivationDoc;

    fn activation(id: &str) -> Activation {
        let doc: ActivationDoc = serde_json::from_str(&format!(
            r#"{{
                "id": "{id}", "name": "Test",
                "template": [ {{ "name": "main", "settings": {{ "segments": [
                    {{ "type": "text", "content": "hello" }}
                ] }} }} ]
            }}"#
        ))
        .unwrap();
        Activation::from_doc(doc).unwrap().activation
    }

    #[tokio::test]
    async fn test_hit_does_not_invoke_loader() {
        let cache = ActivationCache::new();
        let id = ExternalId::from(1u64);
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let loaded = cache
                .get_or_load(&id, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(activation("a1"))
                })
                .await
                .unwrap();
            assert_eq!(loaded.id, "a1");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.contains(&id));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_misses_single_flight() {
        let cache = Arc::new(ActivationCache::new());
        let id = ExternalId::from(7u64);
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let id = id.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_load(&id, || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        // Keep the load in flight long enough for every
                        // task to have requested the same id.
                        tokio::task::yield_now().await;
                        tokio::task::yield_now().await;
                        Ok(activation("a7"))
                    })
                    .await
            }));
        }

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap().unwrap());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1, "loader ran more than once");
        // Every caller observes the identical cached value
        for result in &results[1..] {
            assert!(Arc::ptr_eq(&results[0], result));
        }
    }

    #[tokio::test]
    async fn test_failure_shared_with_waiters_but_not_cached() {
        let cache = Arc::new(ActivationCache::new());
        let id = ExternalId::from(9u64);
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let cache = cache.clone();
            let id = id.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_load(&id, || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::task::yield_now().await;
                        Err(LoadError::Fetch("boom".into()))
                    })
                    .await
            }));
        }

        for handle in handles {
            let err = handle.await.unwrap().unwrap_err();
            assert_eq!(err, LoadError::Fetch("boom".into()));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1, "failure was not shared");
        assert!(!cache.contains(&id), "failure must not be cached");

        // A later request retries the load
        let loaded = cache
            .get_or_load(&id, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(activation("a9"))
            })
            .await
            .unwrap();
        assert_eq!(loaded.id, "a9");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_distinct_ids_load_independently() {
        let cache = ActivationCache::new();
        let first = cache
            .get_or_load(&ExternalId::from(1u64), || async { Ok(activation("a1")) })
            .await
            .unwrap();
        let second = cache
            .get_or_load(&ExternalId::from(2u64), || async { Ok(activation("a2")) })
            .await
            .unwrap();

        assert_eq!(first.id, "a1");
        assert_eq!(second.id, "a2");
        assert_eq!(cache.len(), 2);
    }
}
