use std::fs::File;
use std::io::{self, Write};
use std::sync::Mutex;

use log::{info, warn};

use crate::config::Options;
use crate::error::Error;
use crate::filter::Filter;
use crate::key::MethodKey;
use crate::recorder::Recorder;
use crate::report::{self, Style};

/// The composed profiling service.
///
/// Owns the recorder (and its registry), the compiled filter, and the
/// report sink. The process entry point constructs exactly one `Profiler`
/// before any enter/exit hook can fire, shares it with the instrumented
/// code, and calls [`Profiler::finish`] once after that code has stopped
/// running. There is no hidden global state: a second, independent
/// profiler is just a second instance.
#[derive(Debug)]
pub struct Profiler {
    recorder: Recorder,
    filter: Filter,
    style: Style,
    silent: bool,
    sink: Mutex<Sink>,
}

#[derive(Debug)]
enum Sink {
    Stdout,
    File(File),
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Stdout => io::stdout().write(buf),
            Sink::File(f) => f.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Stdout => io::stdout().flush(),
            Sink::File(f) => f.flush(),
        }
    }
}

impl Profiler {
    /// Build a profiler from the raw attach-time argument string.
    pub fn from_args(args: &str) -> Result<Self, Error> {
        Self::new(Options::parse(args)?)
    }

    /// Build a profiler from parsed options.
    ///
    /// Compiles the allow patterns once and opens the report sink up
    /// front, so a bad pattern or an unwritable `out` path fails here --
    /// before any instrumentation is installed -- rather than at shutdown
    /// when the data would be lost.
    pub fn new(options: Options) -> Result<Self, Error> {
        let filter = Filter::new(&options.class_patterns, &options.method_patterns)?;
        let sink = match &options.out {
            Some(path) => {
                let file = File::create(path).map_err(|source| Error::OutputOpen {
                    path: path.clone(),
                    source,
                })?;
                Sink::File(file)
            }
            None => Sink::Stdout,
        };
        if !options.silent {
            info!(
                "profiler ready: {} class pattern(s), {} method pattern(s), report to {}",
                options.class_patterns.len(),
                options.method_patterns.len(),
                options
                    .out
                    .as_deref()
                    .map_or("stdout".to_string(), |p| p.display().to_string()),
            );
        }
        Ok(Self {
            recorder: Recorder::new(),
            filter,
            style: Style::Raw,
            silent: options.silent,
            sink: Mutex::new(sink),
        })
    }

    /// Render durations human-scaled in the final report instead of raw
    /// integer nanoseconds.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Attach-time predicate for the instrumentation pass.
    ///
    /// Never consulted on the enter/exit path -- eligibility is decided
    /// once per method when hooks are injected.
    pub fn is_eligible(&self, owner: &str, signature: &str) -> bool {
        self.filter.is_eligible(owner, signature)
    }

    /// Hook surface: the very first operation of an instrumented method.
    pub fn enter(&self, key: &MethodKey) {
        self.recorder.enter(key);
    }

    /// Hook surface: runs immediately before every return and unwind exit
    /// point of an instrumented method, with the same key as its enter.
    pub fn exit(&self, key: &MethodKey) -> Result<(), Error> {
        self.recorder.exit(key)
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    /// Snapshot the registry once and write the report to the sink.
    ///
    /// Failures surface to the caller instead of being swallowed, but
    /// nothing here panics, so a failed write cannot block shutdown.
    pub fn report(&self) -> Result<(), Error> {
        let snapshot = self.recorder.store().snapshot();
        if !self.silent {
            info!("dumping stats for {} method(s)", snapshot.len());
        }
        let rendered = report::render(&snapshot, self.style);
        let mut sink = self.sink.lock().unwrap_or_else(|e| e.into_inner());
        sink.write_all(rendered.as_bytes())?;
        sink.flush()?;
        Ok(())
    }

    /// Report, then release the profiler (closing a file sink).
    ///
    /// This is the teardown boundary the exit hook calls once. The report
    /// error is returned for the caller to surface; the sink is closed
    /// either way.
    pub fn finish(self) -> Result<(), Error> {
        let result = self.report();
        if let Err(e) = &result {
            warn!("failed to write profiling report: {e}");
        }
        result
    }
}
