//! Command-line surface. Every flag is an override on top of the
//! environment-driven configuration; secrets are accepted from the
//! environment only.

use clap::Parser;
use std::path::PathBuf;

/// Export the backends discovered by an AppDynamics controller into a
/// CSV inventory, grouped by application and tier.
#[derive(Parser, Debug)]
#[command(name = "appd-backend-export", author, version, about)]
pub struct Cli {
    /// Load environment variables from this file instead of ./.env
    #[arg(long, value_name = "FILE")]
    pub env_file: Option<PathBuf>,

    /// Controller base URL, e.g. https://example.saas.appdynamics.com
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Controller account name
    #[arg(long, value_name = "NAME")]
    pub account: Option<String>,

    /// API user name (without the @account suffix)
    #[arg(long, value_name = "NAME")]
    pub user: Option<String>,

    /// Regex selecting which applications to export
    #[arg(long, value_name = "REGEX")]
    pub applications: Option<String>,

    /// Regex selecting which backend call entries to keep
    #[arg(long, value_name = "REGEX")]
    pub backend_type: Option<String>,

    /// Do not descend into the per-tier thread-task branch
    #[arg(long)]
    pub skip_thread_tasks: bool,

    /// Proxy URL for all controller traffic
    #[arg(long, value_name = "URL")]
    pub proxy: Option<String>,

    /// Output CSV path (created or overwritten at startup)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<String>,
}
