use std::thread::ThreadId;
use std::time::Instant;

/// In-flight timing state for one thread currently inside the method.
///
/// `pending` is the start of the outermost active invocation on that
/// thread; `nested` holds the start timestamps of same-thread invocations
/// recursing inside it, innermost last. Only genuine same-thread recursion
/// ever touches `nested` -- a second thread entering the same method gets
/// its own frame.
#[derive(Debug)]
struct ThreadFrame {
    thread: ThreadId,
    pending: Instant,
    nested: Vec<Instant>,
}

/// Mutable per-key record: completed counters plus in-flight state.
///
/// Created lazily on the first enter for a key and never removed. Elapsed
/// time is self-inclusive: a recursive call's outer interval overlaps its
/// inner invocations, so totals for recursive methods double-count the
/// overlap. Callers always mutate this under the owning entry's mutex.
#[derive(Debug, Default)]
pub struct MethodStats {
    invocations: u64,
    elapsed_ns: u64,
    frames: Vec<ThreadFrame>,
}

impl MethodStats {
    /// Record an enter event observed at `now` on `thread`.
    ///
    /// The non-recursive case stores the timestamp in a fresh frame whose
    /// `nested` stack starts empty (no allocation); a same-thread re-entry
    /// pushes onto that frame's stack instead.
    pub(crate) fn record_enter(&mut self, thread: ThreadId, now: Instant) {
        match self.frames.iter_mut().find(|f| f.thread == thread) {
            Some(frame) => frame.nested.push(now),
            None => self.frames.push(ThreadFrame {
                thread,
                pending: now,
                nested: Vec::new(),
            }),
        }
    }

    /// Record an exit event observed at `now` on `thread`.
    ///
    /// Adds the invocation's own interval to the cumulative total and bumps
    /// the invocation count. Returns `false` when `thread` has no active
    /// invocation of this method -- an unbalanced enter/exit pairing the
    /// caller must surface as a contract violation.
    pub(crate) fn record_exit(&mut self, thread: ThreadId, now: Instant) -> bool {
        let Some(idx) = self.frames.iter().position(|f| f.thread == thread) else {
            return false;
        };
        let started = if let Some(t) = self.frames[idx].nested.pop() {
            t
        } else {
            self.frames.swap_remove(idx).pending
        };
        self.elapsed_ns += now.saturating_duration_since(started).as_nanos() as u64;
        self.invocations += 1;
        true
    }

    /// True while at least one invocation is active on any thread.
    pub fn is_active(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Copy of the completed counters for reporting.
    pub fn summary(&self) -> StatsSummary {
        StatsSummary {
            invocations: self.invocations,
            elapsed_ns: self.elapsed_ns,
        }
    }
}

/// Completed counters for one key, copied out of the registry by a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSummary {
    /// Number of completed invocations (one per observed exit).
    pub invocations: u64,
    /// Sum of per-invocation self-inclusive intervals, in nanoseconds.
    pub elapsed_ns: u64,
}

impl StatsSummary {
    /// Mean elapsed time per completed invocation; 0 when nothing completed.
    pub fn mean_ns(&self) -> u64 {
        if self.invocations == 0 {
            0
        } else {
            self.elapsed_ns / self.invocations
        }
    }
}
