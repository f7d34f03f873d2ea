use cdnstrip_common::config::Config;
use cdnstrip_common::error::{Fatal, Stage, StripError};
use cdnstrip_common::{info, warn};
use cdnstrip_core::aggregator::{Counters, ProgressFn};
use cdnstrip_core::pipeline::{self, Summary};
use cdnstrip_core::ranges::{self, RangeCache};
use cdnstrip_core::sink::WriterSink;
use cdnstrip_providers::Fetcher;

use crate::commands::CommandLine;
use crate::stream;
use crate::terminal::spinner;

/// Loads the CDN ranges, then classifies the whole input.
///
/// Every failure returned here happens before the first task is dispatched,
/// except a failed output write, which is reported once all workers are done.
pub async fn strip(commands: &CommandLine, cfg: Config) -> Result<Counters, Fatal> {
    let cache: Option<RangeCache> = cfg.cache_path.clone().map(RangeCache::new);
    if cache.is_none() {
        warn!("{}, CDN ranges will be fetched on every run", StripError::NoCacheLocation);
    }

    let fetcher = Fetcher::new().during("create http client")?;
    let ranges = ranges::load_ranges(cache.as_ref(), &fetcher, cfg.skip_cache, |stage| {
        spinner::set_status(stage.to_string())
    })
    .await
    .during("load ranges")?;
    info!("Classifying against {} CDN ranges", ranges.len());

    let output = stream::open_output(&commands.output).during("open output")?;

    spinner::set_status("Loading input...".to_string());
    let input = stream::open_input(&commands.input).during("open input")?;

    let progress: ProgressFn = Box::new(spinner::report_progress);
    let result = tokio::task::spawn_blocking(move || {
        pipeline::run(
            stream::lines(input),
            &ranges,
            &cfg,
            WriterSink::new(output),
            Some(progress),
        )
    })
    .await
    .map_err(|e| StripError::Workers(e.to_string()))
    .during("classify")?;

    settle(result)
}

/// Output write failures are reported as their own operation.
fn settle<S>(result: Result<Summary<S>, StripError>) -> Result<Counters, Fatal> {
    match result {
        Ok(summary) => Ok(summary.counters),
        Err(e @ StripError::Write(_)) => Err(e).during("write output"),
        Err(e) => Err(e).during("classify"),
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
