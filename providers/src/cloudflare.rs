//! Cloudflare publishes one plain-text list per address family.

use cdnstrip_common::error::StripError;
use cdnstrip_common::network::range::AddressRange;

pub const NAME: &str = "Cloudflare";
pub const IPV4_URL: &str = "https://www.cloudflare.com/ips-v4";
pub const IPV6_URL: &str = "https://www.cloudflare.com/ips-v6";

/// One literal per line; blank lines are ignored.
pub fn parse(body: &str) -> Result<Vec<AddressRange>, StripError> {
    crate::parse_literals(NAME, body.lines().filter(|line| !line.trim().is_empty()))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
