use std::num::NonZeroUsize;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};

use lru::LruCache;

use crate::{
    error::FormatError,
    format::{
        Format,
        parse::{normalize, parse_normalized},
    },
};

pub const DEFAULT_CACHE_CAPACITY: NonZeroUsize = NonZeroUsize::new(16).unwrap();

static GLOBAL: LazyLock<FormatCache> =
    LazyLock::new(|| FormatCache::new(DEFAULT_CACHE_CAPACITY));

pub fn global() -> &'static FormatCache {
    &GLOBAL
}

/// Bounded LRU map from normalized format string to its parsed [`Format`].
pub struct FormatCache {
    entries: Mutex<LruCache<String, Arc<Format>>>,
}

impl Default for FormatCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl FormatCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn get_or_parse(&self, spec: &str) -> Result<Arc<Format>, FormatError> {
        #[cfg(feature = "tracing")]
        let _span = tracy_client::span!("FormatCache::get_or_parse");

        let key = normalize(spec);
        if let Some(format) = self.lock().get(&key) {
            log::trace!("format cache hit: {key}");
            return Ok(Arc::clone(format));
        }

        // Parsed outside the lock; a racing insert of the same key is harmless.
        let format = Arc::new(parse_normalized(&key)?);
        log::debug!(
            "parsed format {key}: {} field(s), {} byte record",
            format.fields().len(),
            format.record_size()
        );

        let mut entries = self.lock();
        if let Some(existing) = entries.get(&key) {
            return Ok(Arc::clone(existing));
        }
        entries.put(key, Arc::clone(&format));
        Ok(format)
    }

    pub fn contains(&self, spec: &str) -> bool {
        self.lock().contains(&normalize(spec))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.lock().cap()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, Arc<Format>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(capacity: usize) -> FormatCache {
        FormatCache::new(NonZeroUsize::new(capacity).unwrap())
    }

    #[test]
    fn equal_normalized_strings_share_descriptor() {
        let cache = cache(4);
        let a = cache.get_or_parse("(3f)[vertex] (1i)[id]").unwrap();
        let b = cache.get_or_parse("(3f)[vertex](1i)[id]").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache = cache(2);
        cache.get_or_parse("(1f)[aa]").unwrap();
        cache.get_or_parse("(1f)[bb]").unwrap();
        cache.get_or_parse("(1f)[aa]").unwrap();
        cache.get_or_parse("(1f)[cc]").unwrap();

        assert!(cache.contains("(1f)[aa]"));
        assert!(!cache.contains("(1f)[bb]"));
        assert!(cache.contains("(1f)[cc]"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn evicted_formats_reparse_equal() {
        let cache = cache(1);
        let a = cache.get_or_parse("(2d)[pos]").unwrap();
        cache.get_or_parse("(1B)[flag]").unwrap();
        let b = cache.get_or_parse("(2d)[pos]").unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(a, b);
    }

    #[test]
    fn failures_are_not_cached() {
        let cache = cache(4);
        assert_eq!(
            cache.get_or_parse("(3x)[vv]").unwrap_err(),
            FormatError::UnknownType('x')
        );
        assert!(cache.is_empty());
    }

    #[test]
    fn concurrent_lookups_stay_bounded() {
        let cache = cache(2);
        let specs = ["(3f)[vertex]", "(3f) [vertex]", "(4B)[color]", "(1I)[id]"];

        let results: Vec<Vec<Arc<Format>>> = std::thread::scope(|scope| {
            let workers: Vec<_> = (0..8)
                .map(|worker| {
                    let cache = &cache;
                    scope.spawn(move || {
                        (0..64)
                            .map(|i| {
                                let spec = specs[(worker + i) % specs.len()];
                                cache.get_or_parse(spec).unwrap()
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            workers.into_iter().map(|w| w.join().unwrap()).collect()
        });

        let expected: Vec<Format> = specs
            .iter()
            .map(|spec| parse_normalized(&normalize(spec)).unwrap())
            .collect();
        for (worker, formats) in results.iter().enumerate() {
            for (i, format) in formats.iter().enumerate() {
                assert_eq!(**format, expected[(worker + i) % specs.len()]);
            }
        }
        assert!(cache.len() <= cache.capacity().get());
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let cache = cache(2);
        cache.get_or_parse("(2f)[uv]").unwrap();
        let panicked = std::thread::scope(|scope| {
            scope
                .spawn(|| {
                    let _guard = cache.entries.lock().unwrap();
                    panic!("poison the cache lock");
                })
                .join()
                .is_err()
        });

        assert!(panicked);
        assert!(cache.entries.is_poisoned());
        assert!(cache.contains("(2f)[uv]"));
        assert_eq!(cache.get_or_parse("(1d)[ts]").unwrap().record_size(), 8);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn clear_drops_entries() {
        let cache = FormatCache::default();
        cache.get_or_parse("(4f)[color]").unwrap();
        assert_eq!(cache.capacity(), DEFAULT_CACHE_CAPACITY);
        cache.clear();
        assert!(cache.is_empty());
    }
}
