use std::net::IpAddr;

use cdnstrip_common::network::range::RangeSet;
use cdnstrip_common::network::target::ClassificationTask;

/// Outcome of testing one task against the range set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// The task carried no address.
    Invalid,
    /// The address is inside a CDN range.
    MatchesRange,
    /// The address is outside every CDN range.
    NoMatch,
}

pub fn classify(addr: IpAddr, ranges: &RangeSet) -> Verdict {
    if ranges.contains(addr) {
        Verdict::MatchesRange
    } else {
        Verdict::NoMatch
    }
}

/// Unresolved tasks are `Invalid` without touching the range set.
pub fn judge(task: &ClassificationTask, ranges: &RangeSet) -> Verdict {
    match task.address {
        Some(addr) => classify(addr, ranges),
        None => Verdict::Invalid,
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
