use std::collections::HashMap;
use std::sync::Arc;

use super::loader::LoadError;
use super::source::SourceKey;

/// Normalized tables keyed by the identity of the source they came from.
///
/// Only successful loads are stored, so a source that failed is retried on
/// the next request. Loading is deterministic: a cache miss produces the
/// same table a hit would have returned.
#[derive(Debug)]
pub struct TableCache<T> {
    entries: HashMap<SourceKey, Arc<T>>,
}

impl<T> Default for TableCache<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> TableCache<T> {
    pub fn get_or_load<F>(&mut self, key: SourceKey, load: F) -> Result<Arc<T>, LoadError>
    where
        F: FnOnce() -> Result<T, LoadError>,
    {
        if let Some(table) = self.entries.get(&key) {
            log::debug!("cache hit for {key:?}");
            return Ok(Arc::clone(table));
        }
        log::debug!("cache miss for {key:?}");
        let table = Arc::new(load()?);
        self.entries.insert(key, Arc::clone(&table));
        Ok(table)
    }

    /// Drop one entry, e.g. when the file behind it changed.
    pub fn invalidate(&mut self, key: &SourceKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop every entry whose key matches `pred`; returns how many went.
    pub fn invalidate_where<P>(&mut self, mut pred: P) -> usize
    where
        P: FnMut(&SourceKey) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|k, _| !pred(k));
        before - self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn key(name: &str) -> SourceKey {
        SourceKey::File(PathBuf::from(name))
    }

    #[test]
    fn loads_once_per_key() {
        let mut cache = TableCache::default();
        let mut calls = 0;

        for _ in 0..3 {
            let v = cache
                .get_or_load(key("a.csv"), || {
                    calls += 1;
                    Ok(vec![1, 2, 3])
                })
                .unwrap();
            assert_eq!(*v, [1, 2, 3]);
        }
        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn invalidate_forces_reload() {
        let mut cache = TableCache::default();
        cache.get_or_load(key("a.csv"), || Ok(1)).unwrap();
        assert!(cache.invalidate(&key("a.csv")));
        assert!(!cache.invalidate(&key("a.csv")));

        let v = cache.get_or_load(key("a.csv"), || Ok(2)).unwrap();
        assert_eq!(*v, 2);
    }

    #[test]
    fn invalidate_where_drops_joined_entries() {
        let mut cache = TableCache::default();
        let joined = SourceKey::joined(key("dep.csv"), key("eng.csv"));
        cache.get_or_load(joined, || Ok(1)).unwrap();
        cache.get_or_load(key("other.csv"), || Ok(2)).unwrap();

        let gone = cache.invalidate_where(|k| k.mentions(&key("eng.csv")));
        assert_eq!(gone, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failures_are_not_cached() {
        let mut cache: TableCache<u32> = TableCache::default();
        let err = cache.get_or_load(key("bad.csv"), || {
            Err(LoadError::Empty {
                source_name: "bad.csv".into(),
            })
        });
        assert!(err.is_err());
        assert!(cache.is_empty());
    }
}
