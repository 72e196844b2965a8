//! "Maybe cache": memoization that degrades gracefully.
//!
//! The caching facility is the `cache` cargo feature. When it is compiled in,
//! [`mcachew`] returns a decorator that memoizes results keyed on arguments.
//! When it is not, [`mcachew`] warns once and returns an identity decorator, so
//! call sites keep working, uncached.

#[cfg(feature = "cache")]
mod store;

#[cfg(feature = "cache")]
pub use store::{enable_exceptions, strict_exceptions, Store};

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::hash::Hash;
use std::marker::PhantomData;
use tracing::warn;

/// Options forwarded to the caching facility
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheOptions {
    /// Maximum number of cached results; `None` or `0` is unbounded
    pub capacity: Option<usize>,
    /// Label used in log events
    pub name: Option<String>,
}

impl CacheOptions {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Whether the caching facility is available in this build
pub const fn cache_available() -> bool {
    cfg!(feature = "cache")
}

/// Turns a function into a [`Memoized`] one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decorator {
    /// Leaves the function as is
    Identity,
    /// Memoizes through the caching facility
    #[cfg(feature = "cache")]
    Caching { options: CacheOptions, strict: bool },
}

impl Decorator {
    pub fn is_caching(&self) -> bool {
        !matches!(self, Self::Identity)
    }

    pub fn wrap<A, R, F>(self, func: F) -> Memoized<A, R, F>
    where
        A: Hash + Eq + Clone,
        R: Clone,
        F: Fn(A) -> R,
    {
        match self {
            Self::Identity => Memoized {
                func,
                #[cfg(feature = "cache")]
                store: None,
                _marker: PhantomData,
            },
            #[cfg(feature = "cache")]
            Self::Caching { options, strict } => Memoized {
                func,
                store: Some(Store::new(&options, strict)),
                _marker: PhantomData,
            },
        }
    }
}

/// A function wrapped by a [`Decorator`]
pub struct Memoized<A, R, F> {
    func: F,
    #[cfg(feature = "cache")]
    store: Option<Store<A, R>>,
    _marker: PhantomData<fn(A) -> R>,
}

impl<A, R, F> Memoized<A, R, F>
where
    A: Hash + Eq + Clone,
    R: Clone,
    F: Fn(A) -> R,
{
    /// Call the function, serving repeated arguments from the cache if any.
    ///
    /// # Errors
    ///
    /// [`Error::Cache`](crate::Error::Cache) when strict exceptions are
    /// enabled and the cache was poisoned by a panicking computation.
    pub fn call(&self, args: A) -> Result<R> {
        #[cfg(feature = "cache")]
        if let Some(store) = &self.store {
            return store.get_or_compute(args, &self.func);
        }
        Ok((self.func)(args))
    }

    pub fn is_cached(&self) -> bool {
        #[cfg(feature = "cache")]
        {
            self.store.is_some()
        }
        #[cfg(not(feature = "cache"))]
        {
            false
        }
    }

    /// The undecorated function
    pub fn inner(&self) -> &F {
        &self.func
    }
}

/// Decorator used when the caching facility is missing
#[cfg_attr(feature = "cache", allow(dead_code))]
fn fallback() -> Decorator {
    warn!(
        "caching facility not found. You might want to enable the `cache` feature \
         of commonkit to speed things up"
    );
    Decorator::Identity
}

/// Probe for the caching facility and build the matching decorator.
///
/// With the facility present this enables strict cache exceptions (once per
/// process) and forwards `options` to it.
#[cfg(feature = "cache")]
pub fn mcachew(options: CacheOptions) -> Decorator {
    enable_exceptions();
    Decorator::Caching {
        options,
        strict: strict_exceptions(),
    }
}

/// Probe for the caching facility and build the matching decorator.
///
/// The facility is not compiled in: warns and returns [`Decorator::Identity`].
#[cfg(not(feature = "cache"))]
pub fn mcachew(_options: CacheOptions) -> Decorator {
    fallback()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{setup_logger, Logger, LoggerConfig};
    use std::cell::Cell;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_fallback_warns_once_per_decoration() {
        let captured = Captured::default();
        let sink = captured.clone();
        let logger = Arc::new(Logger::new("mcachew").with_writer(move || sink.clone()));
        setup_logger(&logger, &LoggerConfig::default().with_format("{levelname} {message}"))
            .unwrap();

        let double = logger.in_scope(|| fallback().wrap(|x: i32| x * 2));
        assert_eq!(double.call(21).unwrap(), 42);
        assert_eq!(double.call(21).unwrap(), 42);
        assert!(!double.is_cached());

        let warnings = captured
            .text()
            .lines()
            .filter(|line| line.starts_with("WARN") && line.contains("caching facility not found"))
            .count();
        assert_eq!(warnings, 1);
    }

    #[cfg(not(feature = "cache"))]
    #[test]
    fn test_mcachew_without_facility_warns_and_passes_through() {
        let captured = Captured::default();
        let sink = captured.clone();
        let logger = Arc::new(Logger::new("mcachew-missing").with_writer(move || sink.clone()));
        setup_logger(&logger, &LoggerConfig::default().with_format("{levelname} {message}"))
            .unwrap();

        let calls = Cell::new(0);
        let decorator = logger.in_scope(|| mcachew(CacheOptions::default()));
        assert_eq!(decorator, Decorator::Identity);
        assert!(!cache_available());

        let triple = decorator.wrap(|x: u32| {
            calls.set(calls.get() + 1);
            x * 3
        });
        assert_eq!(triple.call(5).unwrap(), 15);
        assert_eq!(triple.call(5).unwrap(), 15);
        assert_eq!(calls.get(), 2);
        assert!(!triple.is_cached());

        let warnings = captured
            .text()
            .lines()
            .filter(|line| line.starts_with("WARN") && line.contains("caching facility not found"))
            .count();
        assert_eq!(warnings, 1);
    }

    #[test]
    fn test_identity_calls_through_every_time() {
        let calls = Cell::new(0);
        let memo = Decorator::Identity.wrap(|s: String| {
            calls.set(calls.get() + 1);
            s.len()
        });
        assert_eq!(memo.call("abc".to_string()).unwrap(), 3);
        assert_eq!(memo.call("abc".to_string()).unwrap(), 3);
        assert_eq!(calls.get(), 2);
        assert_eq!((memo.inner())("z".to_string()), 1);
    }

    #[cfg(feature = "cache")]
    #[test]
    fn test_mcachew_memoizes_with_facility() {
        let calls = Cell::new(0);
        let decorator = mcachew(CacheOptions::default().with_name("fib"));
        assert!(decorator.is_caching());
        assert!(cache_available());
        assert!(strict_exceptions());

        let slow = decorator.wrap(|(a, b): (u32, u32)| {
            calls.set(calls.get() + 1);
            a.pow(b)
        });
        assert_eq!(slow.call((2, 10)).unwrap(), 1024);
        assert_eq!(slow.call((2, 10)).unwrap(), 1024);
        assert_eq!(slow.call((3, 2)).unwrap(), 9);
        assert_eq!(calls.get(), 2);
        assert!(slow.is_cached());
    }

    #[test]
    fn test_options_builders_and_serde() {
        let options = CacheOptions::default().with_capacity(8).with_name("x");
        assert_eq!(options.capacity, Some(8));
        let parsed: CacheOptions = serde_json::from_str(r#"{"capacity": 8, "name": "x"}"#).unwrap();
        assert_eq!(parsed, options);
    }
}
