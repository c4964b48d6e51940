// src/main.rs
// =============================================================================
// This is the entry point of the crawl-gate binary.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 1 = invalid URL, 2 = error)
// =============================================================================

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crawl_gate::cli::{Cli, Commands};
use crawl_gate::config::{Config, LauncherConfig};
use crawl_gate::crawl::{CrawlInvocation, CrawlTarget};
use crawl_gate::{server, shutdown};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Serve(args) => {
            let config = Config::from(args);
            let shutdown = shutdown::install_shutdown_handler();
            server::run(config, shutdown).await?;
            Ok(0)
        }
        Commands::Check {
            url,
            crawler_program,
            spider,
        } => Ok(handle_check(
            &url,
            &LauncherConfig {
                program: crawler_program,
                spider,
                ..LauncherConfig::default()
            },
        )),
    }
}

// Handles the 'check' subcommand: validates `url` and prints the command the
// dispatcher would run for it. Nothing is launched.
fn handle_check(url: &str, launcher: &LauncherConfig) -> i32 {
    let target = match CrawlTarget::parse(url) {
        Ok(target) => target,
        Err(e) => {
            println!("❌ {}", e);
            return 1;
        }
    };

    let invocation = match CrawlInvocation::from_target(&target) {
        Ok(invocation) => invocation,
        Err(reason) => {
            println!("❌ {}", reason);
            return 1;
        }
    };

    println!("✅ {}", target);
    println!("   allowed domain: {}", invocation.allowed_domain);
    println!("   start URL:      {}", invocation.start_url);
    println!(
        "   command:        {} {}",
        launcher.program,
        invocation.args(&launcher.spider).join(" ")
    );
    0
}
