#![cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use cdnstrip_common::config::Config;
use cdnstrip_common::error::StripError;
use cdnstrip_common::network::range::AddressRange;
use cdnstrip_common::source::RangeSource;

/// Hands out a fixed list of literals and counts how often it was asked.
pub struct CountingSource {
    literals: Vec<&'static str>,
    calls: AtomicUsize,
}

impl CountingSource {
    pub fn new(literals: &[&'static str]) -> Self {
        Self {
            literals: literals.to_vec(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RangeSource for CountingSource {
    async fn acquire(&self) -> Result<Vec<AddressRange>, StripError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.literals
            .iter()
            .map(|literal| {
                literal.parse().map_err(|e| StripError::Payload {
                    provider: "test",
                    reason: format!("{e}"),
                })
            })
            .collect()
    }
}

pub fn cfg(threads: usize) -> Config {
    Config {
        threads,
        cache_path: None,
        ..Config::default()
    }
}

pub fn output_lines(bytes: Vec<u8>) -> Vec<String> {
    let mut lines: Vec<String> = String::from_utf8(bytes)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();
    lines.sort();
    lines
}
