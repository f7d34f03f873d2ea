//! The dispatch pipeline.
//!
//! The calling thread is the single producer: it normalizes input lines and
//! pushes tasks into a bounded [`queue`](crate::queue). `T` scoped worker
//! threads pop tasks, classify them and record the verdict in the shared
//! [`Aggregator`]. The run ends once the producer has closed the queue and
//! every worker has drained it and been joined.
//!
//! There is no ordering between tasks handled by different workers.

use std::thread;

use cdnstrip_common::config::Config;
use cdnstrip_common::error::StripError;
use cdnstrip_common::network::range::RangeSet;
use cdnstrip_common::network::target::{ClassificationTask, Normalizer};
use cdnstrip_common::{debug, error};

use crate::aggregator::{Aggregator, Counters, ProgressFn};
use crate::classifier;
use crate::queue::{self, Consumer};
use crate::sink::Sink;

/// Queue slots per worker.
const QUEUE_DEPTH: usize = 1;

/// What a finished run hands back.
pub struct Summary<S> {
    pub counters: Counters,
    /// Tasks the normalizer emitted.
    pub produced: u64,
    pub sink: S,
}

/// Classifies every line of `lines` and writes the non-matching addresses to `sink`.
///
/// Blocks until the input is exhausted and all workers have exited.
pub fn run<I, S>(
    lines: I,
    ranges: &RangeSet,
    cfg: &Config,
    sink: S,
    progress: Option<ProgressFn>,
) -> Result<Summary<S>, StripError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
    S: Sink,
{
    let workers = cfg.worker_count();
    let aggregator = Aggregator::new(sink, cfg.output_mode, progress);
    let normalizer = Normalizer::new(cfg.ipv6);

    let produced = dispatch(normalizer.tasks(lines), workers, ranges, &aggregator)?;

    let (counters, sink) = aggregator.finish()?;
    debug!("pipeline finished: {produced} tasks, {counters}");

    Ok(Summary {
        counters,
        produced,
        sink,
    })
}

/// Feeds `tasks` to `workers` threads. Returns how many tasks were queued.
pub fn dispatch<T, S>(
    tasks: T,
    workers: usize,
    ranges: &RangeSet,
    aggregator: &Aggregator<S>,
) -> Result<u64, StripError>
where
    T: IntoIterator<Item = ClassificationTask>,
    S: Sink,
{
    let (producer, consumer) = queue::bounded(workers.max(1) * QUEUE_DEPTH);

    thread::scope(|scope| -> Result<u64, StripError> {
        let handles: Vec<_> = (0..workers.max(1))
            .map(|id| {
                let consumer = consumer.clone();
                thread::Builder::new()
                    .name(format!("classifier-{id}"))
                    .spawn_scoped(scope, move || work(consumer, ranges, aggregator))
            })
            .collect::<Result<_, _>>()
            .map_err(|e| StripError::Workers(e.to_string()))?;
        drop(consumer);

        let mut produced: u64 = 0;
        for task in tasks {
            if producer.push(task).is_err() {
                error!("every classifier worker has exited, stopping input");
                break;
            }
            produced += 1;
        }
        producer.close();

        let mut failed = 0;
        for handle in handles {
            if handle.join().is_err() {
                failed += 1;
            }
        }
        if failed > 0 {
            return Err(StripError::Workers(format!("{failed} worker(s) panicked")));
        }

        Ok(produced)
    })
}

fn work<S: Sink>(
    consumer: Consumer<ClassificationTask>,
    ranges: &RangeSet,
    aggregator: &Aggregator<S>,
) {
    while let Some(task) = consumer.pop() {
        let verdict = classifier::judge(&task, ranges);
        aggregator.record(&task, verdict);
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
