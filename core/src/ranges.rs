//! Obtaining the range set before the pipeline starts.
//!
//! Two branches: a readable, non-empty cache wins; otherwise the ranges are
//! acquired from a [`RangeSource`] and written back to the cache for next time.
//! Only the acquisition itself can fail the run.

use std::fmt;

use cdnstrip_common::error::StripError;
use cdnstrip_common::network::range::RangeSet;
use cdnstrip_common::source::RangeSource;
use cdnstrip_common::{debug, info, warn};

pub mod cache;

pub use cache::RangeCache;

/// Progress of [`load_ranges`], for status displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStage {
    ReadingCache,
    Fetching,
    WritingCache,
}

impl fmt::Display for LoadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            LoadStage::ReadingCache => "Loading cache file...",
            LoadStage::Fetching => "Loading all CDN ranges...",
            LoadStage::WritingCache => "Creating new cache file...",
        };
        f.write_str(msg)
    }
}

/// The cached range set, unless the cache is skipped, missing or useless.
pub fn try_load_cache(cache: Option<&RangeCache>, skip_cache: bool) -> Option<RangeSet> {
    if skip_cache {
        debug!("range cache skipped on request");
        return None;
    }
    cache?.load()
}

pub async fn load_ranges<F>(
    cache: Option<&RangeCache>,
    source: &dyn RangeSource,
    skip_cache: bool,
    on_stage: F,
) -> Result<RangeSet, StripError>
where
    F: Fn(LoadStage),
{
    if cache.is_some() && !skip_cache {
        on_stage(LoadStage::ReadingCache);
    }
    if let Some(set) = try_load_cache(cache, skip_cache) {
        info!("Loaded {} CDN ranges from cache", set.len());
        return Ok(set);
    }

    on_stage(LoadStage::Fetching);
    let ranges = source.acquire().await?;
    if ranges.is_empty() {
        return Err(StripError::NoRanges);
    }
    let set = RangeSet::new(ranges);
    info!("Fetched {} CDN ranges", set.len());

    if let Some(cache) = cache {
        on_stage(LoadStage::WritingCache);
        if let Err(e) = cache.persist(&set) {
            warn!("Could not update the range cache: {e}");
        }
    }

    Ok(set)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
