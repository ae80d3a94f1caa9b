//! Striped per-key lock
//!
//! Keys are hashed onto a fixed number of buckets, each a reentrant mutex owned
//! by one thread at a time. Unrelated keys that share a bucket contend with each
//! other; that false contention bounds the lock table to `size` entries. Buckets
//! are created on first use and never removed.

use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use beanwire_domain::{Error, Result};
use dashmap::DashMap;
use parking_lot::{Condvar, Mutex};
use seahash::SeaHasher;

use crate::constants::KEY_LOCK_BUCKETS;

#[derive(Debug, Default)]
struct Ownership {
    owner: Option<ThreadId>,
    holds: usize,
}

#[derive(Debug, Default)]
struct Bucket {
    state: Mutex<Ownership>,
    released: Condvar,
}

impl Bucket {
    fn acquire(&self) {
        let me = thread::current().id();
        let mut state = self.state.lock();
        loop {
            match state.owner {
                None => {
                    state.owner = Some(me);
                    state.holds = 1;
                    return;
                }
                Some(owner) if owner == me => {
                    state.holds += 1;
                    return;
                }
                Some(_) => self.released.wait(&mut state),
            }
        }
    }

    fn release(&self) -> Result<()> {
        let me = thread::current().id();
        let mut state = self.state.lock();
        if state.owner != Some(me) {
            return Err(Error::illegal_state(
                "Key lock released by a thread that does not hold it",
            ));
        }
        state.holds -= 1;
        if state.holds == 0 {
            state.owner = None;
            self.released.notify_one();
        }
        Ok(())
    }
}

/// Mutual exclusion per key without a global lock
#[derive(Debug)]
pub struct KeyLock<K: ?Sized> {
    buckets: DashMap<usize, Arc<Bucket>>,
    size: usize,
    _key: PhantomData<fn(&K)>,
}

impl<K: Hash + ?Sized> Default for KeyLock<K> {
    fn default() -> Self {
        Self::new(KEY_LOCK_BUCKETS)
    }
}

impl<K: Hash + ?Sized> KeyLock<K> {
    /// Key lock striped over `size` buckets
    pub fn new(size: usize) -> Self {
        Self {
            buckets: DashMap::new(),
            size: size.max(1),
            _key: PhantomData,
        }
    }

    /// Block until the calling thread holds the lock for `key`
    ///
    /// The lock is reentrant: a thread already holding it acquires it again.
    pub fn lock(&self, key: &K) {
        self.bucket(key).acquire();
    }

    /// Release one hold of the lock for `key`
    ///
    /// Fails with an illegal-state error if the calling thread does not hold it.
    pub fn unlock(&self, key: &K) -> Result<()> {
        self.bucket(key).release()
    }

    /// Lock `key` until the returned guard is dropped
    pub fn guard(&self, key: &K) -> KeyLockGuard {
        let bucket = self.bucket(key);
        bucket.acquire();
        KeyLockGuard {
            bucket,
            _not_send: PhantomData,
        }
    }

    /// Buckets created so far
    pub fn allocated_buckets(&self) -> usize {
        self.buckets.len()
    }

    fn bucket(&self, key: &K) -> Arc<Bucket> {
        let mut hasher = SeaHasher::new();
        key.hash(&mut hasher);
        let index = usize::try_from(hasher.finish() % self.size as u64).unwrap_or_default();
        Arc::clone(self.buckets.entry(index).or_default().value())
    }
}

/// Holds a key lock until dropped
#[derive(Debug)]
pub struct KeyLockGuard {
    bucket: Arc<Bucket>,
    _not_send: PhantomData<*const ()>,
}

impl Drop for KeyLockGuard {
    fn drop(&mut self) {
        // Acquired by this thread in `KeyLock::guard`; the guard cannot leave it.
        let released = self.bucket.release();
        debug_assert!(released.is_ok(), "key lock guard dropped without holding its lock");
    }
}
