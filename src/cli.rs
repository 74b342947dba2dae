// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Usage:
//   md-links README.md
//   md-links README.md --validate
//   md-links README.md --validate --stats --json
// =============================================================================

use clap::{Parser, ValueEnum};
use md_links::{Options, ProbeConfig, ProbeMethod};
use std::path::PathBuf;
use std::time::Duration;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "md-links",
    version,
    about = "Extract the links from a Markdown file, check them and count them",
    long_about = "md-links finds every [text](url) link in a Markdown file. \
                  With --validate it sends one HTTP request per link to see if it is alive, \
                  and with --stats it prints totals instead of the links."
)]
pub struct Cli {
    /// Markdown file to read (.md or .markdown)
    pub path: PathBuf,

    /// Check every link with an HTTP request
    #[arg(long)]
    pub validate: bool,

    /// Print total / unique / broken counts instead of the links
    #[arg(long)]
    pub stats: bool,

    /// Output results in JSON format instead of plain text
    #[arg(long)]
    pub json: bool,

    /// Seconds to wait for each link before giving up (0 = no limit)
    #[arg(long, env = "MD_LINKS_TIMEOUT", default_value_t = 10)]
    pub timeout: u64,

    /// Maximum number of links checked at the same time (default: all at once)
    #[arg(long, env = "MD_LINKS_MAX_CONCURRENCY", value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub max_concurrency: Option<usize>,

    /// HTTP method used to check links
    #[arg(long, value_enum, default_value_t = MethodArg::Head)]
    pub method: MethodArg,

    /// Show debug logs on stderr (RUST_LOG overrides this)
    #[arg(short, long)]
    pub verbose: bool,
}

/// `--method` values; maps onto the library's ProbeMethod
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodArg {
    /// HEAD: headers only, no body download
    Head,
    /// GET: for servers that refuse HEAD
    Get,
}

impl From<MethodArg> for ProbeMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Head => ProbeMethod::Head,
            MethodArg::Get => ProbeMethod::Get,
        }
    }
}

impl Cli {
    pub fn options(&self) -> Options {
        Options {
            validate: self.validate,
            stats: self.stats,
            max_concurrency: self.max_concurrency,
        }
    }

    pub fn probe_config(&self) -> ProbeConfig {
        ProbeConfig {
            timeout: (self.timeout > 0).then(|| Duration::from_secs(self.timeout)),
            method: self.method.into(),
            ..ProbeConfig::default()
        }
    }
}
