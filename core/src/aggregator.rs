//! Counters and output, behind one lock.
//!
//! Every task takes the lock exactly once: the counter bump and the optional
//! write happen in the same critical section, so the output always agrees with
//! `valid` and writes from different workers never interleave.

use std::fmt;
use std::io;
use std::sync::{Mutex, PoisonError};

use cdnstrip_common::config::OutputMode;
use cdnstrip_common::error::StripError;
use cdnstrip_common::network::target::ClassificationTask;
use cdnstrip_common::error;

use crate::classifier::Verdict;
use crate::sink::{self, Sink};

/// Called with a snapshot after every task. Must not block.
pub type ProgressFn = Box<dyn Fn(Counters) + Send + Sync>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    /// Addresses outside every CDN range (these are written out).
    pub valid: u64,
    pub invalid: u64,
    /// Addresses inside a CDN range.
    pub matched: u64,
}

impl Counters {
    pub fn total(&self) -> u64 {
        self.valid + self.invalid + self.matched
    }

    fn count(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Invalid => self.invalid += 1,
            Verdict::MatchesRange => self.matched += 1,
            Verdict::NoMatch => self.valid += 1,
        }
    }
}

impl fmt::Display for Counters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ VALID: {} | INVALID: {} | CDN: {} ]",
            self.valid, self.invalid, self.matched
        )
    }
}

struct State<S> {
    counters: Counters,
    sink: S,
    write_error: Option<io::Error>,
}

pub struct Aggregator<S: Sink> {
    state: Mutex<State<S>>,
    mode: OutputMode,
    progress: Option<ProgressFn>,
}

impl<S: Sink> Aggregator<S> {
    pub fn new(sink: S, mode: OutputMode, progress: Option<ProgressFn>) -> Self {
        Self {
            state: Mutex::new(State {
                counters: Counters::default(),
                sink,
                write_error: None,
            }),
            mode,
            progress,
        }
    }

    /// Counts `verdict` and writes the task if it matched no range.
    pub fn record(&self, task: &ClassificationTask, verdict: Verdict) -> Counters {
        let snapshot = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.counters.count(verdict);

            if verdict == Verdict::NoMatch {
                if let Some(line) = sink::render(task, self.mode) {
                    if let Err(e) = state.sink.write_line(&line) {
                        if state.write_error.is_none() {
                            error!("failed to write output: {e}");
                            state.write_error = Some(e);
                        }
                    }
                }
            }

            state.counters
        };

        if let Some(progress) = &self.progress {
            progress(snapshot);
        }
        snapshot
    }

    pub fn counters(&self) -> Counters {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .counters
    }

    /// Flushes the sink and hands back the final counters with it.
    ///
    /// The first write failure seen during the run, if any, is reported here.
    pub fn finish(self) -> Result<(Counters, S), StripError> {
        let mut state = self.state.into_inner().unwrap_or_else(PoisonError::into_inner);
        if let Some(e) = state.write_error.take() {
            return Err(StripError::Write(e));
        }
        state.sink.flush().map_err(StripError::Write)?;
        Ok((state.counters, state.sink))
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
