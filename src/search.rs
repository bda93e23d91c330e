//! # Search Ranker
//!
//! Fuzzy matching of a free-text query against module and command names.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Levenshtein ratio ranking with first-seen deduplication

use log::debug;
use std::collections::HashSet;

use crate::blacklist::Blacklist;
use crate::normalizer::InteractionRecord;

/// Similarity of two strings in `0..=100`, derived from the normalized
/// Levenshtein distance.
///
/// A transposition costs two edits here, so scores run lower than an indel
/// based ratio such as thefuzz's `fuzz.ratio`: `pign` against `ping` scores 50,
/// not 75. Only the ordering of candidates matters to `rank`.
pub fn ratio(a: &str, b: &str) -> u8 {
    (strsim::normalized_levenshtein(a, b) * 100.0).round() as u8
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchTarget {
    Module(String),
    Command(String),
}

impl MatchTarget {
    pub fn name(&self) -> &str {
        match self {
            MatchTarget::Module(name) | MatchTarget::Command(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedMatch {
    pub target: MatchTarget,
    pub score: u8,
}

/// Scores every module and command name against `query` and returns the best
/// `max_results`, highest score first.
///
/// Modules are scored before commands and each name is scored once: whichever
/// candidate claims a name first keeps it. Ties keep that encounter order.
pub fn rank(
    records: &[InteractionRecord],
    query: &str,
    max_results: usize,
    blacklist: Blacklist<'_>,
) -> Vec<RankedMatch> {
    let query = query.to_lowercase();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut candidates = Vec::new();

    for record in records {
        if blacklist.excludes_module(record) {
            continue;
        }
        if let Some(module) = record.module.as_deref() {
            if seen.insert(module) {
                candidates.push(RankedMatch {
                    target: MatchTarget::Module(module.to_string()),
                    score: ratio(&query, module),
                });
            }
        }
    }

    for record in records {
        if blacklist.excludes_command(record) {
            continue;
        }
        if seen.insert(&record.name) {
            candidates.push(RankedMatch {
                target: MatchTarget::Command(record.name.clone()),
                score: ratio(&query, &record.name),
            });
        }
    }

    // sort_by is stable
    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    candidates.truncate(max_results);

    debug!(
        "Search for {:?} kept {} candidates, best {:?}",
        query,
        candidates.len(),
        candidates.first().map(|m| m.target.name())
    );
    candidates
}
