//! Amazon CloudFront ranges, filtered out of the global AWS `ip-ranges.json`.

use serde::Deserialize;

use cdnstrip_common::error::StripError;
use cdnstrip_common::network::range::AddressRange;

pub const NAME: &str = "Amazon CloudFront";
pub const URL: &str = "https://ip-ranges.amazonaws.com/ip-ranges.json";

const SERVICE: &str = "CLOUDFRONT";

#[derive(Deserialize)]
struct AwsRanges {
    prefixes: Vec<AwsPrefix>,
    #[serde(default)]
    ipv6_prefixes: Vec<AwsIpv6Prefix>,
}

#[derive(Deserialize)]
struct AwsPrefix {
    ip_prefix: String,
    service: String,
}

#[derive(Deserialize)]
struct AwsIpv6Prefix {
    ipv6_prefix: String,
    service: String,
}

pub fn parse(body: &str) -> Result<Vec<AddressRange>, StripError> {
    let ranges: AwsRanges =
        serde_json::from_str(body).map_err(|e| crate::payload_error(NAME, e))?;

    let v4 = ranges
        .prefixes
        .iter()
        .filter(|p| p.service == SERVICE)
        .map(|p| p.ip_prefix.as_str());
    let v6 = ranges
        .ipv6_prefixes
        .iter()
        .filter(|p| p.service == SERVICE)
        .map(|p| p.ipv6_prefix.as_str());

    crate::parse_literals(NAME, v4.chain(v6))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
