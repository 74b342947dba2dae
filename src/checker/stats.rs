// src/checker/stats.rs
// =============================================================================
// Summary counts over a set of link records.
//
// - total:  every record, duplicates included
// - unique: distinct `url` strings (exact match, no normalization)
// - broken: records with status >= 400 or a probe error
//
// Works on validated and unvalidated records alike. An unvalidated record
// has neither status nor error, so it is never counted as broken.
// =============================================================================

use crate::checker::LinkRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total: usize,
    pub unique: usize,
    pub broken: usize,
}

pub fn link_stats(links: &[LinkRecord]) -> Stats {
    let unique: HashSet<&str> = links.iter().map(|l| l.url.as_str()).collect();

    Stats {
        total: links.len(),
        unique: unique.len(),
        broken: links.iter().filter(|l| l.is_broken()).count(),
    }
}
