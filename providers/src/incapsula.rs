//! Imperva Incapsula. The list is served in response to a form `POST`.

use serde::Deserialize;

use cdnstrip_common::error::StripError;
use cdnstrip_common::network::range::AddressRange;

pub const NAME: &str = "Incapsula";
pub const URL: &str = "https://my.incapsula.com/api/integration/v1/ips";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncapsulaRanges {
    ip_ranges: Vec<String>,
    #[serde(default)]
    ipv6_ranges: Vec<String>,
}

pub fn parse(body: &str) -> Result<Vec<AddressRange>, StripError> {
    let ranges: IncapsulaRanges =
        serde_json::from_str(body).map_err(|e| crate::payload_error(NAME, e))?;

    crate::parse_literals(
        NAME,
        ranges
            .ip_ranges
            .iter()
            .chain(&ranges.ipv6_ranges)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_lists() {
        let body = r#"{"ipRanges":["199.83.128.0/21","198.143.32.0/19"],"ipv6Ranges":["2a02:e980::/29"],"res":0,"res_message":"OK"}"#;
        let ranges = parse(body).unwrap();
        assert_eq!(ranges.len(), 3);
        assert_eq!(ranges[2].to_string(), "2a02:e980::/29");
    }

    #[test]
    fn bad_literal_fails_the_provider() {
        let body = r#"{"ipRanges":["199.83.128.0/40"]}"#;
        assert!(parse(body).is_err());
    }
}
