// src/checker/markdown.rs
// =============================================================================
// This module extracts links from Markdown text.
//
// We only care about one construct: the inline link `[text](url)`.
// A full Markdown parser would be overkill for that, so we scan the text with
// a single regular expression instead. Matches are found left to right and
// never overlap, so the output order is the order the links appear in.
//
// What counts as a link:
// - `[` label `]` immediately followed by `(` url `)`
// - the label may be empty but may not contain `[`, `]` or a line break
// - the part in parentheses stops at the first `)` and stays on one line
// - its first word is the url; a title after it ("T", 'T' or (T)) is ignored
// - `[x]( )` has no url and is skipped
//
// Rust concepts:
// - LazyLock: Compile the regex once, on first use
// - Iterators: captures_iter walks every match in order
// =============================================================================

use crate::checker::LinkRecord;
use crate::error::{MdLinksError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Regex for inline markdown links: [text](body)
///
/// The body is everything up to the first `)` on the same line. Its first
/// whitespace-separated token is the url; anything after it is a title.
static INLINE_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\[\]\n]*)\]\(([^)\n]+)\)").expect("inline link pattern is valid")
});

/// Extracts every inline link from `markdown`, tagging each with `file`.
///
/// Duplicates are kept; a link that appears twice produces two records.
///
/// Fails with [`MdLinksError::NoLinksFound`] when the text has no links.
///
/// Example input:
///   "Check out [Rust](https://www.rust-lang.org)!"
///
/// Example output:
///   [LinkRecord { text: "Rust", url: "https://www.rust-lang.org", file, .. }]
pub fn extract_markdown_links(markdown: &str, file: &str) -> Result<Vec<LinkRecord>> {
    let links: Vec<LinkRecord> = INLINE_LINK_RE
        .captures_iter(markdown)
        .filter_map(|cap| {
            let url = cap[2].split_whitespace().next()?;
            Some(LinkRecord::new(&cap[1], url, file))
        })
        .collect();

    if links.is_empty() {
        return Err(MdLinksError::NoLinksFound {
            file: file.to_string(),
        });
    }

    tracing::debug!(file, count = links.len(), "extracted links");
    Ok(links)
}
