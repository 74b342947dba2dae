// src/checker/mod.rs
// =============================================================================
// This module contains all link logic.
//
// Submodules:
// - record: The LinkRecord type everything else passes around
// - markdown: Extracts [text](url) links from markdown text
// - http: Probes links over HTTP and records whether they answered
// - stats: Counts total, unique and broken links
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
// =============================================================================

mod http;
mod markdown;
mod record;
mod stats;

// Re-export public items from submodules
// This lets users write `checker::validate_links()` instead of
// `checker::http::validate_links()`
pub use http::{validate_link, validate_links, HttpProbe, Probe, ProbeConfig, ProbeMethod};
pub use markdown::extract_markdown_links;
pub use record::LinkRecord;
pub use stats::{link_stats, Stats};
