use std::path::PathBuf;

const CACHE_FILE: &str = ".config/cdnstrip.cache";

/// Textual form written for every address that matched no CDN range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// The normalized address, e.g. `203.0.114.5`.
    #[default]
    Canonical,
    /// The trimmed input line the address came from (URL, CIDR, ...).
    Raw,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Number of classifier workers. Values below 1 are treated as 1.
    pub threads: usize,
    /// Also classify IPv6 input instead of discarding it.
    pub ipv6: bool,
    pub output_mode: OutputMode,
    /// Ignore the range cache and fetch fresh lists from the providers.
    pub skip_cache: bool,
    /// Where the range cache lives. `None` disables caching.
    pub cache_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threads: 1,
            ipv6: false,
            output_mode: OutputMode::Canonical,
            skip_cache: false,
            cache_path: default_cache_path(),
        }
    }
}

impl Config {
    pub fn worker_count(&self) -> usize {
        self.threads.max(1)
    }
}

/// `$HOME/.config/cdnstrip.cache`, if a home directory is known.
pub fn default_cache_path() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(|home| PathBuf::from(home).join(CACHE_FILE))
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
    fn defaults_match_the_command_line_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.threads, 1);
        assert!(!cfg.ipv6);
        assert!(!cfg.skip_cache);
        assert_eq!(cfg.output_mode, OutputMode::Canonical);
    }

    #[test]
    fn zero_threads_still_runs_one_worker() {
        let cfg = Config {
            threads: 0,
            ..Config::default()
        };
        assert_eq!(cfg.worker_count(), 1);
    }
}
