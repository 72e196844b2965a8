//! In-process memoization facility backing [`mcachew`](super::mcachew).

use super::CacheOptions;
use crate::error::{Error, Result};
use lru::LruCache;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, Once};
use tracing::{debug, trace, warn};

static STRICT_EXCEPTIONS: AtomicBool = AtomicBool::new(false);
static ENABLE_EXCEPTIONS: Once = Once::new();

/// Make cache failures surface as errors instead of being bypassed.
///
/// Process-wide and idempotent; only the first call has an effect.
pub fn enable_exceptions() {
    ENABLE_EXCEPTIONS.call_once(|| {
        STRICT_EXCEPTIONS.store(true, Ordering::SeqCst);
        debug!("Strict cache exceptions enabled");
    });
}

pub fn strict_exceptions() -> bool {
    STRICT_EXCEPTIONS.load(Ordering::SeqCst)
}

/// Argument-keyed result cache for one memoized function
pub struct Store<A, R> {
    name: String,
    strict: bool,
    cache: Mutex<LruCache<A, R>>,
}

impl<A, R> Store<A, R>
where
    A: Hash + Eq + Clone,
    R: Clone,
{
    /// A `capacity` of `None` or `0` means unbounded
    pub fn new(options: &CacheOptions, strict: bool) -> Self {
        let cache = match options.capacity.and_then(NonZeroUsize::new) {
            Some(capacity) => LruCache::new(capacity),
            None => LruCache::unbounded(),
        };
        Self {
            name: options.name.clone().unwrap_or_else(|| "anonymous".to_string()),
            strict,
            cache: Mutex::new(cache),
        }
    }

    pub fn len(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the cached result for `args`, computing it with `func` on a miss.
    ///
    /// The cache stays locked while `func` runs, so `func` must not call back
    /// into the same memoized function.
    pub fn get_or_compute<F>(&self, args: A, func: &F) -> Result<R>
    where
        F: Fn(A) -> R,
    {
        let mut cache = match self.cache.lock() {
            Ok(cache) => cache,
            Err(_) if self.strict => {
                return Err(Error::Cache {
                    message: format!(
                        "cache '{}' is poisoned by an earlier panic",
                        self.name
                    ),
                });
            }
            Err(_) => {
                warn!(cache = %self.name, "Cache is poisoned, calling function uncached");
                return Ok(func(args));
            }
        };

        if let Some(hit) = cache.get(&args) {
            trace!(cache = %self.name, "Cache hit");
            return Ok(hit.clone());
        }

        trace!(cache = %self.name, "Cache miss");
        let value = func(args.clone());
        cache.put(args, value.clone());
        Ok(value)
    }
}
