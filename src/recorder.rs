use std::thread;
use std::time::Instant;

use crate::error::Error;
use crate::key::MethodKey;
use crate::store::MetricsStore;

/// Records paired enter/exit events against the metrics store.
///
/// All mutation of a key's record happens under that record's own mutex,
/// so updates are linearizable per key while distinct keys proceed in
/// parallel. Recursion bookkeeping lives per (thread, key) inside the
/// record: only genuine same-thread recursion shares a timestamp stack,
/// and two threads inside the same method concurrently are timed
/// independently.
#[derive(Debug, Default)]
pub struct Recorder {
    store: MetricsStore,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &MetricsStore {
        &self.store
    }

    /// Start timing one invocation of `key`.
    ///
    /// Called by instrumented code as the very first operation of the
    /// method body. The non-recursive path records a single timestamp and
    /// allocates no recursion storage.
    pub fn enter(&self, key: &MethodKey) {
        let handle = self.store.get_or_create(key);
        let mut stats = handle.lock().unwrap_or_else(|e| e.into_inner());
        stats.record_enter(thread::current().id(), Instant::now());
    }

    /// Finish timing one invocation of `key`.
    ///
    /// Called by instrumented code immediately before every return and
    /// unwind exit point. An exit with no matching enter -- unknown key,
    /// or no active invocation on the calling thread -- means the injected
    /// hooks are unbalanced and every later figure for this key would be
    /// untrustworthy, so it surfaces as [`Error::UnmatchedExit`] instead
    /// of being absorbed.
    pub fn exit(&self, key: &MethodKey) -> Result<(), Error> {
        let handle = self.store.get(key).ok_or_else(|| Error::UnmatchedExit {
            key: key.qualified(),
        })?;
        let mut stats = handle.lock().unwrap_or_else(|e| e.into_inner());
        if !stats.record_exit(thread::current().id(), Instant::now()) {
            return Err(Error::UnmatchedExit {
                key: key.qualified(),
            });
        }
        Ok(())
    }
}
