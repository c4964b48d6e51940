// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - serve: run the HTTP service
// - check: validate a URL offline and show the crawler command it would run
//
// Directory flags fall back to the WORK_DIR / DATA_DIR environment variables
// (clap's `env` feature), and then to the defaults in config.rs.
// =============================================================================

use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::{
    dir_or_default, Config, LauncherConfig, DEFAULT_DATA_DIR, DEFAULT_LAUNCH_TIMEOUT_SECS,
    DEFAULT_LISTEN_ADDR, DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKERS, DEFAULT_WORK_DIR,
};

#[derive(Parser, Debug)]
#[command(
    name = "crawl-gate",
    version,
    about = "Admits crawl requests under bounded concurrency and launches the crawler",
    long_about = "crawl-gate accepts crawl submissions over HTTP, admits at most a fixed number \
                  of them at a time, and answers each caller once the crawl process has started. \
                  It also serves previously computed per-domain result documents."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP service
    ///
    /// Example: crawl-gate serve --queue-capacity 8 --workers 2
    Serve(ServeArgs),

    /// Validate a URL and print the crawler command it would launch
    ///
    /// Example: crawl-gate check http://example.com/docs
    Check {
        /// URL to validate
        url: String,

        /// Crawler executable name shown in the output
        #[arg(long, default_value = "scrapy")]
        crawler_program: String,

        /// Spider name shown in the output
        #[arg(long, default_value = "osc")]
        spider: String,
    },
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "LISTEN_ADDR", default_value = DEFAULT_LISTEN_ADDR)]
    pub listen: SocketAddr,

    /// Maximum number of admitted jobs waiting for a dispatch worker
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: NonZeroUsize,

    /// Number of dispatch workers (fixed for the life of the process)
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    pub workers: NonZeroUsize,

    /// Seconds a caller waits for the crawl process to start (at least 1)
    #[arg(
        long,
        default_value_t = DEFAULT_LAUNCH_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub launch_timeout_secs: u64,

    /// Working directory of the crawl executable [default: /opt/crawler]
    #[arg(long, env = "WORK_DIR")]
    pub work_dir: Option<PathBuf>,

    /// Directory holding <domain>.json result documents [default: /opt/data]
    #[arg(long, env = "DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Crawl executable to launch
    #[arg(long, default_value = "scrapy")]
    pub crawler_program: String,

    /// Spider name passed to the crawl executable
    #[arg(long, default_value = "osc")]
    pub spider: String,
}

impl From<ServeArgs> for Config {
    fn from(args: ServeArgs) -> Self {
        Config {
            listen_addr: args.listen,
            queue_capacity: args.queue_capacity,
            workers: args.workers,
            launch_timeout: Duration::from_secs(args.launch_timeout_secs),
            data_dir: dir_or_default(args.data_dir, DEFAULT_DATA_DIR),
            launcher: LauncherConfig {
                program: args.crawler_program,
                spider: args.spider,
                work_dir: dir_or_default(args.work_dir, DEFAULT_WORK_DIR),
            },
        }
    }
}
