// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, so stdout stays clean for --json)
// 3. Read the Markdown file and run the md-links pipeline on it
// 4. Print the links or the stats
// 5. Exit with proper code (0 = success, 1 = broken links, 2 = error)
// =============================================================================

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use md_links::{HttpProbe, LinkRecord, Report, Stats};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// RUST_LOG wins when set; otherwise warnings only, or debug with -v
fn init_logging(verbose: bool) {
    let default_level = if verbose { "md_links=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// Returns:
//   Ok(0) = no broken links
//   Ok(1) = broken links found
//   Err = file problems, no links, or the HTTP client could not be built
async fn run(cli: &Cli) -> Result<i32> {
    let probe = HttpProbe::new(&cli.probe_config())?;
    let report = md_links::md_links_file(&cli.path, &cli.options(), &probe).await?;

    print_report(&report, cli.json, cli.validate)?;

    if report.has_broken() {
        Ok(1)
    } else {
        Ok(0)
    }
}

fn print_report(report: &Report, json: bool, validated: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    match report {
        Report::Links(links) => {
            for link in links {
                println!("{}", format_link(link));
            }
        }
        Report::Stats(stats) => print_stats(stats, validated),
    }
    Ok(())
}

// <file> <url> <text> [ok|fail <status or error>]
fn format_link(link: &LinkRecord) -> String {
    let mut line = format!("{} {} {}", link.file, link.url, link.text);

    match (link.status, link.error.as_deref()) {
        (Some(status), _) => {
            let verdict = if link.is_broken() { "fail" } else { "ok" };
            line.push_str(&format!(" {} {}", verdict, status));
        }
        (None, Some(error)) => line.push_str(&format!(" fail {}", error)),
        (None, None) => {}
    }

    line
}

fn print_stats(stats: &Stats, validated: bool) {
    println!("Total: {}", stats.total);
    println!("Unique: {}", stats.unique);
    // Without validation nothing has a status, so a broken count means nothing
    if validated {
        println!("Broken: {}", stats.broken);
    }
}
