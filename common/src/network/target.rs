//! # Input Normalization
//!
//! Turns raw input lines into [`ClassificationTask`]s.
//!
//! A line can be:
//! * A single IP address (`104.16.1.1`, `2606:4700::1`).
//! * A CIDR block (`192.168.0.0/30`), expanded to every address it holds.
//! * An `http`/`https` URL, in which case only its host is considered.
//!
//! Anything else, hostnames included, produces no task. Hostnames are never
//! resolved.

use std::borrow::Cow;
use std::net::IpAddr;
use std::sync::Arc;

use pnet::ipnetwork::{IpNetwork, IpNetworkIterator};
use url::Url;

/// One candidate address waiting for a verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationTask {
    /// The trimmed input line. Shared by every address a CIDR line expands to.
    pub raw: Arc<str>,
    /// Canonical address, `None` if the line did not resolve to one.
    pub address: Option<IpAddr>,
}

impl ClassificationTask {
    pub fn new(raw: Arc<str>, address: Option<IpAddr>) -> Self {
        Self { raw, address }
    }
}

/// The tasks produced by one line.
///
/// CIDR blocks are walked lazily, so a `/8` never sits in memory as a list.
pub enum Expansion {
    Empty,
    Single(Option<ClassificationTask>),
    Block {
        raw: Arc<str>,
        addrs: IpNetworkIterator,
    },
}

impl Iterator for Expansion {
    type Item = ClassificationTask;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Expansion::Empty => None,
            Expansion::Single(task) => task.take(),
            Expansion::Block { raw, addrs } => addrs
                .next()
                .map(|addr| ClassificationTask::new(raw.clone(), Some(addr.to_canonical()))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    ipv6: bool,
}

impl Normalizer {
    /// `ipv6 = false` discards every line whose token contains a colon.
    pub fn new(ipv6: bool) -> Self {
        Self { ipv6 }
    }

    pub fn normalize(&self, line: &str) -> Expansion {
        let line = line.trim();
        if line.is_empty() {
            return Expansion::Empty;
        }

        let token = extract_token(line);
        if !self.ipv6 && token.contains(':') {
            crate::trace!("skipping IPv6 input: {line}");
            return Expansion::Empty;
        }

        if let Ok(addr) = token.parse::<IpAddr>() {
            return Expansion::Single(Some(ClassificationTask::new(
                Arc::from(line),
                Some(addr.to_canonical()),
            )));
        }

        if let Some(block) = parse_cidr(&token) {
            return Expansion::Block {
                raw: Arc::from(line),
                addrs: block.iter(),
            };
        }

        crate::trace!("dropping unresolvable input: {line}");
        Expansion::Empty
    }

    /// Lazily normalizes a whole stream of lines.
    pub fn tasks<I>(self, lines: I) -> impl Iterator<Item = ClassificationTask>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        lines
            .into_iter()
            .flat_map(move |line| self.normalize(line.as_ref()))
    }
}

/// The part of a line that gets classified.
///
/// For lines starting with `http` this is the URL host exactly as written in
/// the line (userinfo, port and IPv6 brackets removed), never the normalized
/// host of the parsed URL: `http://1.1/` yields `1.1`, not `1.0.0.1`. If the
/// line does not parse as a URL it is returned untouched.
pub fn extract_token(line: &str) -> Cow<'_, str> {
    if !line.starts_with("http") {
        return Cow::Borrowed(line);
    }

    match Url::parse(line) {
        Ok(url) if url.has_host() => Cow::Borrowed(authority_host(line)),
        Ok(_) => Cow::Borrowed(""),
        Err(_) => Cow::Borrowed(line),
    }
}

fn authority_host(line: &str) -> &str {
    let rest = line.split_once("://").map_or(line, |(_, rest)| rest);
    let authority = rest.split(['/', '\\', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, host)| host);

    if let Some(bracketed) = host_port.strip_prefix('[') {
        return bracketed.split(']').next().unwrap_or_default();
    }
    host_port.split(':').next().unwrap_or_default()
}

/// Parses `address/prefix`. Bare addresses are not CIDR blocks here, and the
/// prefix must be plain decimal digits.
fn parse_cidr(s: &str) -> Option<IpNetwork> {
    let (addr_str, prefix_str) = s.split_once('/')?;
    if prefix_str.is_empty() || !prefix_str.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let addr = addr_str.parse::<IpAddr>().ok()?;
    let prefix = prefix_str.parse::<u8>().ok()?;
    IpNetwork::new(addr, prefix).ok()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
