// src/config.rs
// =============================================================================
// Runtime configuration, read once at startup and never changed afterwards.
//
// Values come from command-line flags, which fall back to environment
// variables (see cli.rs), which fall back to the defaults below.
// =============================================================================

use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_WORK_DIR: &str = "/opt/crawler";
pub const DEFAULT_DATA_DIR: &str = "/opt/data";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_QUEUE_CAPACITY: NonZeroUsize = non_zero(4);
pub const DEFAULT_WORKERS: NonZeroUsize = non_zero(2);
pub const DEFAULT_LAUNCH_TIMEOUT_SECS: u64 = 30;

const fn non_zero(n: usize) -> NonZeroUsize {
    match NonZeroUsize::new(n) {
        Some(n) => n,
        None => panic!("default must be non-zero"),
    }
}

/// How to start the external crawl executable.
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    /// Executable to run (looked up on PATH if not absolute)
    pub program: String,
    /// Spider name passed after the `crawl` subcommand
    pub spider: String,
    /// Working directory of the child process
    pub work_dir: PathBuf,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            program: "scrapy".to_string(),
            spider: "osc".to_string(),
            work_dir: PathBuf::from(DEFAULT_WORK_DIR),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    /// Admission queue capacity
    pub queue_capacity: NonZeroUsize,
    /// Size of the fixed dispatch worker pool
    pub workers: NonZeroUsize,
    /// How long a caller waits for the launch outcome
    pub launch_timeout: Duration,
    /// Directory holding `<domain>.json` result documents
    pub data_dir: PathBuf,
    pub launcher: LauncherConfig,
}

// An unset directory variable and an empty one mean the same thing
pub fn dir_or_default(value: Option<PathBuf>, default: &str) -> PathBuf {
    match value {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => PathBuf::from(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(DEFAULT_QUEUE_CAPACITY.get(), 4);
        assert_eq!(DEFAULT_WORKERS.get(), 2);
        let launcher = LauncherConfig::default();
        assert_eq!(launcher.work_dir, PathBuf::from("/opt/crawler"));
        assert_eq!(launcher.program, "scrapy");
        assert_eq!(launcher.spider, "osc");
    }

    #[test]
    fn test_empty_dir_falls_back() {
        assert_eq!(
            dir_or_default(Some(PathBuf::new()), DEFAULT_WORK_DIR),
            PathBuf::from(DEFAULT_WORK_DIR)
        );
        assert_eq!(
            dir_or_default(None, DEFAULT_DATA_DIR),
            PathBuf::from(DEFAULT_DATA_DIR)
        );
        assert_eq!(
            dir_or_default(Some(PathBuf::from("/srv/crawler")), DEFAULT_WORK_DIR),
            PathBuf::from("/srv/crawler")
        );
    }
}
