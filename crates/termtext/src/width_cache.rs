#![forbid(unsafe_code)]

//! Memoized string widths.
//!
//! Measuring a string walks every byte through the decoder and the width
//! tables. Callers that lay out the same labels over and over (column
//! headers, padded names in a listing) can keep a [`WidthCache`] instead.
//!
//! # Example
//! ```
//! use termtext::WidthCache;
//!
//! let mut cache = WidthCache::new(64);
//! assert_eq!(cache.width(b"\x1b[1m\xE4\xB8\xAD\x1b[m", true), 2);
//! assert_eq!(cache.width(b"\x1b[1m\xE4\xB8\xAD\x1b[m", true), 2);
//! assert_eq!(cache.stats().hits, 1);
//! ```

use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;

use lru::LruCache;
use rustc_hash::FxHasher;

use crate::measure::strnwidth;

/// Capacity of [`WidthCache::default`].
pub const DEFAULT_CACHE_CAPACITY: usize = 4096;

/// Hit and miss counters of a [`WidthCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that had to measure.
    pub misses: u64,
    /// Entries currently stored.
    pub size: usize,
    /// Maximum number of entries.
    pub capacity: usize,
}

impl CacheStats {
    /// Fraction of lookups answered from the cache, 0.0 when there were none.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache of [`strnwidth`] results.
///
/// Entries are keyed by a 64-bit FxHash of the bytes together with the
/// `skip_ansi` flag, so the same text measured with and without escape
/// skipping occupies two entries. The bytes themselves are not stored; two
/// inputs with colliding hashes share an entry.
///
/// Not `Sync`. Share one per thread, or enable the `thread_local_cache`
/// feature and use `cached_width`.
#[derive(Debug)]
pub struct WidthCache {
    entries: LruCache<u64, isize>,
    hits: u64,
    misses: u64,
}

impl WidthCache {
    /// Cache holding at most `capacity` widths (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: LruCache::new(non_zero(capacity)),
            hits: 0,
            misses: 0,
        }
    }

    /// Width of `bytes` as [`strnwidth`] measures it, from the cache when
    /// possible.
    #[inline]
    pub fn width(&mut self, bytes: &[u8], skip_ansi: bool) -> isize {
        self.width_with(bytes, skip_ansi, strnwidth)
    }

    /// Like [`WidthCache::width`] with a caller-supplied measure for misses.
    pub fn width_with<F>(&mut self, bytes: &[u8], skip_ansi: bool, measure: F) -> isize
    where
        F: FnOnce(&[u8], bool) -> isize,
    {
        let key = key(bytes, skip_ansi);
        if let Some(&width) = self.entries.get(&key) {
            self.hits += 1;
            return width;
        }
        self.misses += 1;
        let width = measure(bytes, skip_ansi);
        self.entries.put(key, width);
        width
    }

    /// Whether a width for `bytes` is cached. Recency is not updated.
    #[must_use]
    pub fn contains(&self, bytes: &[u8], skip_ansi: bool) -> bool {
        self.entries.contains(&key(bytes, skip_ansi))
    }

    /// Cached width without touching recency or counters.
    #[must_use]
    pub fn peek(&self, bytes: &[u8], skip_ansi: bool) -> Option<isize> {
        self.entries.peek(&key(bytes, skip_ansi)).copied()
    }

    /// Measure and store each of `texts` unless already cached. Counters are
    /// left alone.
    pub fn preload<'a, I>(&mut self, texts: I, skip_ansi: bool)
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        for bytes in texts {
            let key = key(bytes, skip_ansi);
            if !self.entries.contains(&key) {
                self.entries.put(key, strnwidth(bytes, skip_ansi));
            }
        }
    }

    /// Drop every entry. Counters are kept; see [`WidthCache::reset_stats`].
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Zero the hit and miss counters.
    pub fn reset_stats(&mut self) {
        self.hits = 0;
        self.misses = 0;
    }

    /// Change the capacity, evicting least recently used entries if it
    /// shrinks below the current size.
    pub fn resize(&mut self, capacity: usize) {
        let capacity = non_zero(capacity);
        let evicted = self.entries.len().saturating_sub(capacity.get());
        if evicted > 0 {
            tracing::trace!(evicted, capacity = capacity.get(), "shrinking width cache");
        }
        self.entries.resize(capacity);
    }

    /// Snapshot of the counters and current size.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.entries.len(),
            capacity: self.capacity(),
        }
    }

    /// Number of cached widths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of cached widths.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }
}

impl Default for WidthCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

fn non_zero(capacity: usize) -> NonZeroUsize {
    NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)
}

#[inline]
fn key(bytes: &[u8], skip_ansi: bool) -> u64 {
    let mut hasher = FxHasher::default();
    bytes.hash(&mut hasher);
    skip_ansi.hash(&mut hasher);
    hasher.finish()
}

#[cfg(feature = "thread_local_cache")]
thread_local! {
    static THREAD_CACHE: std::cell::RefCell<WidthCache> =
        std::cell::RefCell::new(WidthCache::default());
}

/// [`strnwidth`] through a per-thread [`WidthCache`].
#[cfg(feature = "thread_local_cache")]
pub fn cached_width(bytes: &[u8], skip_ansi: bool) -> isize {
    THREAD_CACHE.with(|cache| cache.borrow_mut().width(bytes, skip_ansi))
}

/// Empty the calling thread's cache used by [`cached_width`].
#[cfg(feature = "thread_local_cache")]
pub fn clear_thread_cache() {
    THREAD_CACHE.with(|cache| cache.borrow_mut().clear());
}
