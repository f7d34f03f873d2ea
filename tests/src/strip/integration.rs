#![cfg(test)]
use std::cell::RefCell;
use std::fs;
use std::net::IpAddr;

use cdnstrip_common::config::{Config, OutputMode};
use cdnstrip_common::error::StripError;
use cdnstrip_core::pipeline;
use cdnstrip_core::ranges::{self, LoadStage, RangeCache};
use cdnstrip_core::sink::WriterSink;

use super::util::{cfg, output_lines, CountingSource};

/// A cold start fetches and writes the cache, a warm start never touches the source.
#[tokio::test]
async fn cache_is_written_then_reused() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("nested/.config/cdnstrip.cache");
    let cache = RangeCache::new(&path);
    let source = CountingSource::new(&["203.0.113.0/24", "2400:cb00::/32"]);

    let stages = RefCell::new(Vec::new());
    let cold = ranges::load_ranges(Some(&cache), &source, false, |s| {
        stages.borrow_mut().push(s)
    })
    .await?;

    assert_eq!(source.calls(), 1);
    assert_eq!(cold.len(), 2);
    assert_eq!(
        stages.take(),
        vec![LoadStage::ReadingCache, LoadStage::Fetching, LoadStage::WritingCache]
    );
    assert_eq!(fs::read_to_string(&path)?, "203.0.113.0/24\n2400:cb00::/32");

    let warm = ranges::load_ranges(Some(&cache), &source, false, |s| {
        stages.borrow_mut().push(s)
    })
    .await?;

    assert_eq!(source.calls(), 1, "warm start must not fetch");
    assert_eq!(stages.take(), vec![LoadStage::ReadingCache]);
    assert_eq!(
        warm.literals().collect::<Vec<_>>(),
        cold.literals().collect::<Vec<_>>()
    );
    Ok(())
}

#[tokio::test]
async fn skip_cache_fetches_and_rewrites() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("cdnstrip.cache");
    fs::write(&path, "10.0.0.0/8")?;

    let cache = RangeCache::new(&path);
    let source = CountingSource::new(&["198.51.100.0/24"]);
    let set = ranges::load_ranges(Some(&cache), &source, true, |_| {}).await?;

    assert_eq!(source.calls(), 1);
    assert!(!set.contains("10.1.1.1".parse::<IpAddr>()?));
    assert_eq!(fs::read_to_string(&path)?, "198.51.100.0/24");
    Ok(())
}

#[tokio::test]
async fn unusable_cache_falls_back_to_the_source() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("cdnstrip.cache");
    fs::write(&path, "garbage\nmore garbage\n")?;

    let source = CountingSource::new(&["203.0.113.0/24"]);
    let set = ranges::load_ranges(Some(&RangeCache::new(&path)), &source, false, |_| {}).await?;

    assert_eq!(source.calls(), 1);
    assert_eq!(set.len(), 1);
    Ok(())
}

#[tokio::test]
async fn empty_acquisition_is_fatal_and_leaves_no_cache() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("cdnstrip.cache");

    let source = CountingSource::new(&[]);
    let result = ranges::load_ranges(Some(&RangeCache::new(&path)), &source, false, |_| {}).await;

    assert!(matches!(result, Err(StripError::NoRanges)));
    assert!(!path.exists());
    Ok(())
}

#[tokio::test]
async fn mixed_input_is_stripped() -> anyhow::Result<()> {
    let source = CountingSource::new(&["203.0.113.0/24"]);
    let set = ranges::load_ranges(None, &source, false, |_| {}).await?;

    let input = "203.0.113.5\n\
                 203.0.114.5\n\
                 example.com\n\
                 2001:db8::1\n\
                 https://203.0.113.9/login\n\
                 198.51.100.0/30\n\
                 http://010.1.1.1/\n\
                 http://1.1/\n\
                 10.9.0.0/+30\n";

    let summary = pipeline::run(input.lines(), &set, &cfg(4), WriterSink::new(Vec::new()), None)?;

    assert_eq!(summary.produced, 7);
    assert_eq!(summary.counters.matched, 2);
    assert_eq!(summary.counters.valid, 5);
    assert_eq!(summary.counters.invalid, 0);
    assert_eq!(
        output_lines(summary.sink.into_inner()?),
        vec!["198.51.100.0", "198.51.100.1", "198.51.100.2", "198.51.100.3", "203.0.114.5"]
    );
    Ok(())
}

#[tokio::test]
async fn raw_ipv6_run_repeats_source_lines() -> anyhow::Result<()> {
    let source = CountingSource::new(&["2400:cb00::/32"]);
    let set = ranges::load_ranges(None, &source, false, |_| {}).await?;

    let config = Config {
        ipv6: true,
        output_mode: OutputMode::Raw,
        ..cfg(3)
    };
    let input = ["http://[2400:cb00::1]/", "2001:db8::/127", "  2001:db8::5  "];
    let summary = pipeline::run(input, &set, &config, WriterSink::new(Vec::new()), None)?;

    assert_eq!(summary.counters.matched, 1);
    assert_eq!(
        output_lines(summary.sink.into_inner()?),
        vec!["2001:db8::/127", "2001:db8::/127", "2001:db8::5"]
    );
    Ok(())
}

#[test]
fn every_task_gets_exactly_one_verdict() -> anyhow::Result<()> {
    let set = ranges_from(&["10.0.0.0/23", "10.0.4.0/24"]);
    let input = vec!["10.0.0.0/21"; 3];

    for threads in [1, 2, 7, 32] {
        let summary = pipeline::run(input.clone(), &set, &cfg(threads), Vec::new(), None)?;
        assert_eq!(summary.produced, 3 * 2048);
        assert_eq!(summary.counters.total(), summary.produced);
        assert_eq!(summary.counters.matched, 3 * 768);
        assert_eq!(summary.sink.len() as u64, summary.counters.valid);
    }
    Ok(())
}

fn ranges_from(literals: &[&str]) -> cdnstrip_common::network::range::RangeSet {
    cdnstrip_common::network::range::RangeSet::from_literals(literals.iter().copied())
}
