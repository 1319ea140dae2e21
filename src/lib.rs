//! In-process method-level profiler runtime.
//!
//! An external instrumentation pass injects `enter`/`exit` calls at the
//! start and at every return or unwind exit point of selected methods;
//! this crate aggregates those events into per-method invocation counts
//! and cumulative elapsed time, and renders a flat report once at process
//! exit. It is a whole-run, non-hierarchical counter: no call graphs, no
//! sampling, no persistence between runs.
//!
//! Recursion: each invocation is timed from its own enter to its own exit,
//! without subtracting nested same-key time. The non-recursive path stores
//! a single timestamp; a per-thread stack of nested start times grows only
//! while recursion is actually in progress.
//!
//! Concurrency: the registry is a sharded map with one mutex per method
//! entry. Events for the same key are serialized; events for distinct keys
//! never contend. In-flight timing state is keyed by thread, so two
//! threads inside the same method concurrently cannot corrupt each other's
//! intervals.
//!
//! ```
//! use tempo::{MethodKey, Options, Profiler};
//!
//! let profiler = Profiler::new(Options::default())?;
//! let key = MethodKey::new("demo::Parser", "parse()");
//! profiler.enter(&key);
//! // ... instrumented method body ...
//! profiler.exit(&key)?;
//! profiler.finish()?;
//! # Ok::<(), tempo::Error>(())
//! ```

mod config;
mod error;
mod filter;
mod key;
mod profiler;
mod recorder;
mod report;
mod stats;
mod store;

pub use config::{DEFAULT_PATTERN, Options};
pub use error::Error;
pub use filter::Filter;
pub use key::MethodKey;
pub use profiler::Profiler;
pub use recorder::Recorder;
pub use report::{Style, render};
pub use stats::{MethodStats, StatsSummary};
pub use store::MetricsStore;
