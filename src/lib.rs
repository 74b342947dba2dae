// src/lib.rs
// =============================================================================
// md-links: find the links in a Markdown document, optionally check that
// they are alive, optionally count them.
//
// Pipeline:
// 1. extract: markdown text -> Vec<LinkRecord>   (fails if there are none)
// 2. validate (optional): probe every link concurrently, keep their order
// 3. stats (optional): replace the links with {total, unique, broken}
//
// The HTTP side is behind the `Probe` trait so callers decide how links are
// checked. The binary uses `HttpProbe`; tests use fakes.
// =============================================================================

pub mod checker;
pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::Path;

pub use checker::{
    extract_markdown_links, link_stats, validate_link, validate_links, HttpProbe, LinkRecord,
    Probe, ProbeConfig, ProbeMethod, Stats,
};
pub use error::{MdLinksError, ProbeError, Result};
pub use loader::load_markdown;

/// What to do after extraction. Both steps are off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Probe every link
    pub validate: bool,
    /// Return counts instead of the links
    pub stats: bool,
    /// Cap on probes in flight at once; `None` starts them all together
    pub max_concurrency: Option<usize>,
}

/// The result of a run: either the links themselves or their counts.
///
/// Serializes as a plain JSON array of records or a plain
/// `{total, unique, broken}` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Report {
    Links(Vec<LinkRecord>),
    Stats(Stats),
}

impl Report {
    pub fn has_broken(&self) -> bool {
        match self {
            Report::Links(links) => links.iter().any(LinkRecord::is_broken),
            Report::Stats(stats) => stats.broken > 0,
        }
    }
}

/// Runs the pipeline over text that has already been read.
///
/// `source_id` is copied into the `file` field of every record.
pub async fn md_links(
    markdown: &str,
    source_id: &str,
    options: &Options,
    probe: &dyn Probe,
) -> Result<Report> {
    let mut links = extract_markdown_links(markdown, source_id)?;
    tracing::info!(file = source_id, count = links.len(), "extracted links");

    if options.validate {
        links = validate_links(probe, links, options.max_concurrency).await;
        let broken = links.iter().filter(|l| l.is_broken()).count();
        tracing::info!(file = source_id, broken, "validated links");
    }

    if options.stats {
        return Ok(Report::Stats(link_stats(&links)));
    }

    Ok(Report::Links(links))
}

/// Reads `path` with [`load_markdown`] and runs [`md_links`] on it.
pub async fn md_links_file(path: &Path, options: &Options, probe: &dyn Probe) -> Result<Report> {
    let markdown = load_markdown(path)?;
    md_links(&markdown, &path.display().to_string(), options, probe).await
}
