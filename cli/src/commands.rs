pub mod strip;

use std::path::PathBuf;

use clap::Parser;
use cdnstrip_common::config::{self, Config, OutputMode};

#[derive(Parser)]
#[command(name = "cdnstrip", version)]
#[command(about = "Strip addresses that belong to CDN providers from a list of IPs, CIDRs and URLs.")]
pub struct CommandLine {
    /// Number of worker threads
    #[arg(short = 't', long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub threads: u32,

    /// Input file, or `-` for stdin
    #[arg(short, long, default_value = "-")]
    pub input: PathBuf,

    /// Output file, or `-` for stdout
    #[arg(short, long, default_value = "-")]
    pub output: PathBuf,

    /// Write the trimmed input line instead of the address
    #[arg(short, long)]
    pub raw: bool,

    /// Ignore the cached CDN ranges and fetch fresh ones
    #[arg(short, long)]
    pub skip_cache: bool,

    /// Also check IPv6 addresses
    #[arg(short = 'k', long)]
    pub ipv6: bool,

    /// Location of the CDN range cache [default: ~/.config/cdnstrip.cache]
    #[arg(long, value_name = "PATH")]
    pub cache: Option<PathBuf>,

    /// Only print errors, hide the spinner
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print debug messages
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> Config {
        Config {
            threads: self.threads as usize,
            ipv6: self.ipv6,
            output_mode: if self.raw {
                OutputMode::Raw
            } else {
                OutputMode::Canonical
            },
            skip_cache: self.skip_cache,
            cache_path: self.cache.clone().or_else(config::default_cache_path),
        }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cmd = CommandLine::try_parse_from(["cdnstrip"]).unwrap();
        assert_eq!(cmd.threads, 1);
        assert_eq!(cmd.input, PathBuf::from("-"));
        assert_eq!(cmd.output, PathBuf::from("-"));

        let cfg = cmd.to_config();
        assert_eq!(cfg.output_mode, OutputMode::Canonical);
        assert!(!cfg.ipv6);
        assert!(!cfg.skip_cache);
    }

    #[test]
    fn short_flags() {
        let cmd = CommandLine::try_parse_from([
            "cdnstrip", "-t", "16", "-i", "hosts.txt", "-o", "origin.txt", "-r", "-s", "-k",
            "--cache", "/tmp/ranges.cache",
        ])
        .unwrap();

        let cfg = cmd.to_config();
        assert_eq!(cfg.threads, 16);
        assert_eq!(cfg.output_mode, OutputMode::Raw);
        assert!(cfg.ipv6);
        assert!(cfg.skip_cache);
        assert_eq!(cfg.cache_path, Some(PathBuf::from("/tmp/ranges.cache")));
        assert_eq!(cmd.input, PathBuf::from("hosts.txt"));
    }

    #[test]
    fn zero_threads_is_rejected() {
        assert!(CommandLine::try_parse_from(["cdnstrip", "-t", "0"]).is_err());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(CommandLine::try_parse_from(["cdnstrip", "-q", "-v"]).is_err());
    }
}
