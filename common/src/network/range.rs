//! # CDN Range Model
//!
//! An [`AddressRange`] is one `address/prefixLength` block published by a
//! provider. A [`RangeSet`] is the immutable collection of them that every
//! classifier worker reads from.
//!
//! Membership is answered through a sorted span index built once at
//! construction, so lookups cost `O(log n)` and duplicate or overlapping
//! ranges only cost memory.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use pnet::ipnetwork::IpNetwork;

use crate::error::RangeError;

/// A network prefix, always stored with its host bits cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressRange(IpNetwork);

impl AddressRange {
    pub fn new(addr: IpAddr, prefix: u8) -> Result<Self, RangeError> {
        let net = IpNetwork::new(addr, prefix)
            .map_err(|_| RangeError::Prefix(format!("{addr}/{prefix}")))?;
        let net = IpNetwork::new(net.network(), prefix)
            .map_err(|_| RangeError::Prefix(format!("{addr}/{prefix}")))?;
        Ok(Self(net))
    }

    pub fn network(&self) -> IpAddr {
        self.0.network()
    }

    pub fn prefix(&self) -> u8 {
        self.0.prefix()
    }

    /// First and last address of the block as integers.
    fn span(&self) -> Span {
        match self.0 {
            IpNetwork::V4(net) => Span::V4(u32::from(net.network()), u32::from(net.broadcast())),
            IpNetwork::V6(net) => {
                let start = u128::from(net.network());
                let end = start | !u128::from(net.mask());
                Span::V6(start, end)
            }
        }
    }
}

/// Parses a range literal such as `203.0.113.0/24`.
///
/// A prefix length is mandatory and must be plain decimal digits; a bare
/// address is rejected.
impl FromStr for AddressRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((addr_str, prefix_str)) = s.split_once('/') else {
            return Err(RangeError::MissingPrefix(s.to_string()));
        };

        let addr = addr_str
            .parse::<IpAddr>()
            .map_err(|_| RangeError::Address(s.to_string()))?;

        if prefix_str.is_empty() || !prefix_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RangeError::Prefix(s.to_string()));
        }
        let prefix = prefix_str
            .parse::<u8>()
            .map_err(|_| RangeError::Prefix(s.to_string()))?;

        Self::new(addr, prefix)
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.prefix())
    }
}

enum Span {
    V4(u32, u32),
    V6(u128, u128),
}

/// The read-only set of CDN ranges.
///
/// Keeps the ranges in the order they were supplied (that order is what gets
/// written back to the cache) next to a merged span index per family.
#[derive(Debug, Clone, Default)]
pub struct RangeSet {
    ranges: Vec<AddressRange>,
    v4: Vec<(u32, u32)>,
    v6: Vec<(u128, u128)>,
}

impl RangeSet {
    pub fn new(ranges: Vec<AddressRange>) -> Self {
        let mut v4 = Vec::new();
        let mut v6 = Vec::new();
        for range in &ranges {
            match range.span() {
                Span::V4(start, end) => v4.push((start, end)),
                Span::V6(start, end) => v6.push((start, end)),
            }
        }

        Self {
            ranges,
            v4: merge_spans(v4, |end| end.saturating_add(1)),
            v6: merge_spans(v6, |end| end.saturating_add(1)),
        }
    }

    /// Builds a set from range literals, silently dropping malformed ones.
    pub fn from_literals<I, S>(literals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ranges = literals
            .into_iter()
            .filter_map(|literal| {
                let literal = literal.as_ref().trim();
                match literal.parse::<AddressRange>() {
                    Ok(range) => Some(range),
                    Err(e) => {
                        if !literal.is_empty() {
                            crate::trace!("dropping range literal: {e}");
                        }
                        None
                    }
                }
            })
            .collect();

        Self::new(ranges)
    }

    /// True iff `addr` lies inside at least one range.
    pub fn contains(&self, addr: IpAddr) -> bool {
        match addr.to_canonical() {
            IpAddr::V4(v4) => span_contains(&self.v4, u32::from(v4)),
            IpAddr::V6(v6) => span_contains(&self.v6, u128::from(v6)),
        }
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Range literals in their original order.
    pub fn literals(&self) -> impl Iterator<Item = String> + '_ {
        self.ranges.iter().map(AddressRange::to_string)
    }
}

impl FromIterator<AddressRange> for RangeSet {
    fn from_iter<I: IntoIterator<Item = AddressRange>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Sorts spans and collapses overlapping or adjacent ones.
fn merge_spans<T, F>(mut spans: Vec<(T, T)>, next_after: F) -> Vec<(T, T)>
where
    T: Ord + Copy,
    F: Fn(T) -> T,
{
    spans.sort_unstable();
    let mut merged: Vec<(T, T)> = Vec::with_capacity(spans.len());
    for (start, end) in spans {
        match merged.last_mut() {
            Some(last) if start <= next_after(last.1) => {
                if end > last.1 {
                    last.1 = end;
                }
            }
            _ => merged.push((start, end)),
        }
    }
    merged
}

fn span_contains<T: Ord + Copy>(spans: &[(T, T)], value: T) -> bool {
    let idx = spans.partition_point(|&(start, _)| start <= value);
    idx > 0 && spans[idx - 1].1 >= value
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    fn v4(a: u8, b: u8, c: u8, d: u8, prefix: u8) -> AddressRange {
        AddressRange::new(IpAddr::V4(Ipv4Addr::new(a, b, c, d)), prefix).unwrap()
    }

    fn v6(addr: Ipv6Addr, prefix: u8) -> AddressRange {
        AddressRange::new(IpAddr::V6(addr), prefix).unwrap()
    }

    #[test]
    fn literal_parsing_masks_host_bits() {
        let range: AddressRange = "172.16.5.10/20".parse().unwrap();
        assert_eq!(range.network(), ip("172.16.0.0"));
        assert_eq!(range.prefix(), 20);
        assert_eq!(range.to_string(), "172.16.0.0/20");
    }

    #[test]
    fn literal_parsing_rejects_garbage() {
        assert!(matches!(
            "10.0.0.1".parse::<AddressRange>(),
            Err(RangeError::MissingPrefix(_))
        ));
        assert!(matches!(
            "999.1.2.3/24".parse::<AddressRange>(),
            Err(RangeError::Address(_))
        ));
        assert!(matches!(
            "10.0.0.0/33".parse::<AddressRange>(),
            Err(RangeError::Prefix(_))
        ));
        assert!(matches!(
            "2001:db8::/129".parse::<AddressRange>(),
            Err(RangeError::Prefix(_))
        ));
        assert!("10.0.0.0/abc".parse::<AddressRange>().is_err());
    }

    #[test]
    fn signed_or_empty_prefix_is_rejected() {
        for literal in ["10.0.0.0/+24", "10.0.0.0/-8", "10.0.0.0/", "10.0.0.0/ 24"] {
            assert!(
                matches!(literal.parse::<AddressRange>(), Err(RangeError::Prefix(_))),
                "{literal} should be rejected"
            );
        }
        assert!(RangeSet::from_literals(["203.0.113.0/+24"]).is_empty());
    }

    #[test]
    fn membership_inside_and_outside() {
        let set = RangeSet::from_literals(["203.0.113.0/24"]);
        assert!(set.contains(ip("203.0.113.5")));
        assert!(set.contains(ip("203.0.113.0")));
        assert!(set.contains(ip("203.0.113.255")));
        assert!(!set.contains(ip("203.0.114.5")));
        assert!(!set.contains(ip("203.0.112.255")));
    }

    #[test]
    fn malformed_literals_are_dropped() {
        let set = RangeSet::from_literals(["198.51.100.0/24", "definitely not a range", ""]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.literals().collect::<Vec<_>>(), vec!["198.51.100.0/24"]);
    }

    #[test]
    fn duplicates_and_overlaps_do_not_change_answers() {
        let set = RangeSet::from_literals([
            "10.0.0.0/8",
            "10.1.0.0/16",
            "10.0.0.0/8",
            "11.0.0.0/8",
            "192.168.1.0/24",
        ]);
        assert_eq!(set.len(), 5);
        assert!(set.contains(ip("10.1.2.3")));
        assert!(set.contains(ip("11.255.255.255")));
        assert!(set.contains(ip("192.168.1.77")));
        assert!(!set.contains(ip("12.0.0.0")));
        assert!(!set.contains(ip("192.168.2.1")));
    }

    #[test]
    fn full_address_space_and_single_hosts() {
        let everything = RangeSet::from_literals(["0.0.0.0/0"]);
        assert!(everything.contains(ip("0.0.0.0")));
        assert!(everything.contains(ip("255.255.255.255")));
        assert!(!everything.contains(ip("2001:db8::1")));

        let host = RangeSet::from_literals(["203.0.113.7/32"]);
        assert!(host.contains(ip("203.0.113.7")));
        assert!(!host.contains(ip("203.0.113.8")));
    }

    #[test]
    fn ipv6_membership() {
        let set = RangeSet::from_literals(["2400:cb00::/32", "::/0"]);
        assert!(set.contains(ip("2400:cb00::1")));
        assert!(set.contains(ip("ffff:ffff::1")));

        let narrow = RangeSet::from_literals(["2400:cb00::/32"]);
        assert!(!narrow.contains(ip("2400:cb01::1")));
        assert!(!narrow.contains(ip("104.16.0.1")));
    }

    #[test]
    fn mapped_ipv4_matches_ipv4_ranges() {
        let set = RangeSet::from_literals(["104.16.0.0/13"]);
        assert!(set.contains(ip("::ffff:104.16.1.1")));
    }

    #[test]
    fn repeated_lookups_are_stable() {
        let set = RangeSet::from_literals(["104.16.0.0/13", "172.64.0.0/13"]);
        let probe = ip("172.65.0.1");
        let first = set.contains(probe);
        for _ in 0..100 {
            assert_eq!(set.contains(probe), first);
        }
    }

    #[test]
    fn collects_from_ranges() {
        let set: RangeSet = [v4(10, 0, 0, 0, 8), v6(Ipv6Addr::LOCALHOST, 128)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
        assert!(set.contains(ip("::1")));
        assert_eq!(set.literals().collect::<Vec<_>>(), vec!["10.0.0.0/8", "::1/128"]);
    }
}
