use serde::Deserialize;

use cdnstrip_common::error::StripError;
use cdnstrip_common::network::range::AddressRange;

pub const NAME: &str = "Fastly";
pub const URL: &str = "https://api.fastly.com/public-ip-list";

#[derive(Deserialize)]
struct FastlyRanges {
    addresses: Vec<String>,
    #[serde(default)]
    ipv6_addresses: Vec<String>,
}

pub fn parse(body: &str) -> Result<Vec<AddressRange>, StripError> {
    let ranges: FastlyRanges =
        serde_json::from_str(body).map_err(|e| crate::payload_error(NAME, e))?;

    crate::parse_literals(
        NAME,
        ranges
            .addresses
            .iter()
            .chain(&ranges.ipv6_addresses)
            .map(String::as_str),
    )
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
