use std::{collections::HashMap, fmt::Debug, hash::Hash, sync::Arc};

use parking_lot::{Condvar, Mutex};

use crate::foundation::error::{LanimError, LanimResult};

type Producer<K, V> = Box<dyn Fn(&K) -> anyhow::Result<V> + Send + Sync>;

enum Outcome<V> {
    Waiting,
    Ready(Arc<V>),
    Failed(String),
}

/// Rendezvous point for callers waiting on an in-flight computation.
struct WaitHandle<V> {
    outcome: Mutex<Outcome<V>>,
    resolved: Condvar,
}

impl<V> WaitHandle<V> {
    fn new() -> Self {
        Self {
            outcome: Mutex::new(Outcome::Waiting),
            resolved: Condvar::new(),
        }
    }

    fn resolve(&self, outcome: Outcome<V>) {
        *self.outcome.lock() = outcome;
        self.resolved.notify_all();
    }

    fn wait(&self) -> Result<Arc<V>, String> {
        let mut guard = self.outcome.lock();
        loop {
            match &*guard {
                Outcome::Waiting => self.resolved.wait(&mut guard),
                Outcome::Ready(value) => return Ok(Arc::clone(value)),
                Outcome::Failed(message) => return Err(message.clone()),
            }
        }
    }
}

enum Entry<V> {
    Pending(Arc<WaitHandle<V>>),
    Ready(Arc<V>),
}

enum Role<V> {
    Produce(Arc<WaitHandle<V>>),
    Wait(Arc<WaitHandle<V>>),
}

/// Memoizing cache that runs the producer at most once at a time per key.
///
/// The directory lock is only held while checking or changing an entry's status, never while
/// the producer runs, so slow keys do not block unrelated ones. Concurrent callers for a key
/// that is being computed block until it resolves and then share the outcome. Successful values
/// are kept for the cache's lifetime and handed out as clones of one `Arc`. Failures are not
/// cached: the entry is dropped and the next caller retries.
///
/// Build one per expensive computation and pass it (usually as `Arc<SingleFlight<..>>`) to
/// whatever needs it.
pub struct SingleFlight<K, V> {
    producer: Producer<K, V>,
    directory: Mutex<HashMap<K, Entry<V>>>,
}

impl<K, V> Debug for SingleFlight<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleFlight")
            .field("entries", &self.directory.lock().len())
            .finish_non_exhaustive()
    }
}

impl<K, V> SingleFlight<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    /// Create an empty cache around `producer`.
    pub fn new(producer: impl Fn(&K) -> anyhow::Result<V> + Send + Sync + 'static) -> Self {
        Self {
            producer: Box::new(producer),
            directory: Mutex::new(HashMap::new()),
        }
    }

    /// Return the value for `key`, computing it if no one has yet.
    pub fn get(&self, key: &K) -> LanimResult<Arc<V>> {
        let role = {
            let mut dir = self.directory.lock();
            match dir.get(key) {
                Some(Entry::Ready(value)) => {
                    tracing::trace!(?key, "cache hit");
                    return Ok(Arc::clone(value));
                }
                Some(Entry::Pending(handle)) => Role::Wait(Arc::clone(handle)),
                None => {
                    let handle = Arc::new(WaitHandle::new());
                    dir.insert(key.clone(), Entry::Pending(Arc::clone(&handle)));
                    Role::Produce(handle)
                }
            }
        };

        match role {
            Role::Produce(handle) => self.fill(key, &handle),
            Role::Wait(handle) => {
                tracing::trace!(?key, "waiting on in-flight computation");
                handle
                    .wait()
                    .map_err(|message| cache_error(key, message))
            }
        }
    }

    /// Return `true` when `key` is computed or being computed.
    pub fn contains(&self, key: &K) -> bool {
        self.directory.lock().contains_key(key)
    }

    /// Number of keys that are computed or being computed.
    pub fn len(&self) -> usize {
        self.directory.lock().len()
    }

    /// Return `true` when the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.directory.lock().is_empty()
    }

    fn fill(&self, key: &K, handle: &WaitHandle<V>) -> LanimResult<Arc<V>> {
        tracing::debug!(?key, "cache miss, computing");
        let mut guard = AbandonGuard {
            cache: self,
            key,
            handle,
            armed: true,
        };

        let produced = (self.producer)(key);
        guard.armed = false;

        match produced {
            Ok(value) => {
                let value = Arc::new(value);
                self.directory
                    .lock()
                    .insert(key.clone(), Entry::Ready(Arc::clone(&value)));
                handle.resolve(Outcome::Ready(Arc::clone(&value)));
                Ok(value)
            }
            Err(err) => {
                let message = format!("{err:#}");
                tracing::warn!(?key, %message, "cache producer failed");
                self.abandon(key, handle, message.clone());
                Err(cache_error(key, message))
            }
        }
    }

    fn abandon(&self, key: &K, handle: &WaitHandle<V>, message: String) {
        self.directory.lock().remove(key);
        handle.resolve(Outcome::Failed(message));
    }
}

fn cache_error(key: &impl Debug, message: String) -> LanimError {
    LanimError::CacheComputation {
        key: format!("{key:?}"),
        message,
    }
}

/// Releases waiters if the producer unwinds instead of returning.
struct AbandonGuard<'a, K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    cache: &'a SingleFlight<K, V>,
    key: &'a K,
    handle: &'a WaitHandle<V>,
    armed: bool,
}

impl<K, V> Drop for AbandonGuard<'_, K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    fn drop(&mut self) {
        if self.armed {
            self.cache
                .abandon(self.key, self.handle, "producer panicked".to_string());
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/single_flight.rs"]
mod tests;
