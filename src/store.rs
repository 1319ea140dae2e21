use std::sync::{Arc, Mutex};

use dashmap::DashMap;

use crate::key::MethodKey;
use crate::stats::{MethodStats, StatsSummary};

/// Concurrent method-key -> stats registry.
///
/// The registry is monotonic: an entry is created on the first enter for a
/// key and never removed, so its size is bounded by the number of distinct
/// instrumented methods, not by invocation count. The map is sharded and
/// each entry carries its own mutex, so enter/exit traffic on distinct
/// keys never contends on a shared lock.
#[derive(Debug, Default)]
pub struct MetricsStore {
    entries: DashMap<MethodKey, Arc<Mutex<MethodStats>>>,
}

impl MetricsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the stats record for `key`, creating it on first use.
    ///
    /// Concurrent first-use races for the same new key resolve to a single
    /// surviving record; every caller gets a handle to that one instance.
    pub fn get_or_create(&self, key: &MethodKey) -> Arc<Mutex<MethodStats>> {
        if let Some(entry) = self.entries.get(key) {
            return Arc::clone(entry.value());
        }
        Arc::clone(self.entries.entry(key.clone()).or_default().value())
    }

    /// Handle to an existing record, or `None` if `key` was never entered.
    pub fn get(&self, key: &MethodKey) -> Option<Arc<Mutex<MethodStats>>> {
        self.entries.get(key).map(|entry| Arc::clone(entry.value()))
    }

    /// Number of distinct keys observed so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy completed counters for every key.
    ///
    /// Rows are sorted by cumulative elapsed time descending, ties broken
    /// by name, so one render of the same snapshot is stable. Intended to
    /// run once at shutdown after instrumented code has stopped; each
    /// entry's counters are still read under its own mutex, so a snapshot
    /// taken while writers remain sees consistent per-key values.
    pub fn snapshot(&self) -> Vec<(MethodKey, StatsSummary)> {
        let mut rows: Vec<(MethodKey, StatsSummary)> = self
            .entries
            .iter()
            .map(|entry| {
                let summary = entry
                    .value()
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .summary();
                (entry.key().clone(), summary)
            })
            .collect();
        rows.sort_by(|a, b| {
            b.1.elapsed_ns
                .cmp(&a.1.elapsed_ns)
                .then_with(|| a.0.qualified().cmp(&b.0.qualified()))
        });
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::{Duration, Instant};

    #[test]
    fn get_or_create_returns_the_same_record() {
        let store = MetricsStore::new();
        let key = MethodKey::new("demo::Walker", "walk()");
        let a = store.get_or_create(&key);
        let b = store.get_or_create(&key);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn get_returns_none_for_unknown_key() {
        let store = MetricsStore::new();
        assert!(store.get(&MethodKey::new("demo::Nobody", "run()")).is_none());
    }

    #[test]
    fn concurrent_first_use_creates_one_record() {
        let store = MetricsStore::new();
        let key = MethodKey::new("demo::Hot", "spin()");

        let handles: Vec<_> = thread::scope(|s| {
            (0..8)
                .map(|_| s.spawn(|| store.get_or_create(&key)))
                .collect::<Vec<_>>()
                .into_iter()
                .map(|h| h.join().unwrap())
                .collect()
        });

        for handle in &handles[1..] {
            assert!(Arc::ptr_eq(&handles[0], handle));
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn size_tracks_distinct_keys_not_invocations() {
        let store = MetricsStore::new();
        let me = thread::current().id();
        let key = MethodKey::new("demo::Hot", "spin()");
        let base = Instant::now();

        for i in 0..1_000u64 {
            let handle = store.get_or_create(&key);
            let mut stats = handle.lock().unwrap();
            stats.record_enter(me, base + Duration::from_nanos(i));
            assert!(stats.record_exit(me, base + Duration::from_nanos(i + 1)));
        }
        assert_eq!(store.len(), 1);
        assert_eq!(store.snapshot()[0].1.invocations, 1_000);
    }

    #[test]
    fn snapshot_sorts_by_elapsed_descending() {
        let store = MetricsStore::new();
        let me = thread::current().id();
        let base = Instant::now();

        for (name, ns) in [("fast()", 100u64), ("slow()", 9_000), ("mid()", 500)] {
            let key = MethodKey::new("demo::Bench", name);
            let handle = store.get_or_create(&key);
            let mut stats = handle.lock().unwrap();
            stats.record_enter(me, base);
            assert!(stats.record_exit(me, base + Duration::from_nanos(ns)));
        }

        let rows = store.snapshot();
        let names: Vec<String> = rows.iter().map(|(k, _)| k.signature().to_string()).collect();
        assert_eq!(names, ["slow()", "mid()", "fast()"]);
    }
}
