//! Conversion of raw records into validated, typed records.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, trace};
use trendscope_core::{CommitSummary, ContributorSummary, RepoId, TrendingEntry};

use crate::extract::{RawCommit, RawContributor, RawTrendingEntry};
use crate::numbers::parse_count;

/// Length of an abbreviated commit hash.
pub const SHORT_SHA_LEN: usize = 7;

/// Author name used when a commit row has none.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Normalized entries plus the number dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    /// Valid, de-duplicated entries in input order.
    pub entries: Vec<TrendingEntry>,
    /// Entries dropped as invalid or duplicate.
    pub skipped: usize,
}

// ============================================================================
// Trending Entries
// ============================================================================

/// Normalizes raw entries.
///
/// Entries without a name or a repository link are dropped; so is every
/// later entry whose `full_name` was already seen. Both count toward
/// `skipped`. Normalizing the output again yields the same entries.
pub fn normalize(raw: &[RawTrendingEntry]) -> Normalized {
    let mut seen = HashSet::new();
    let mut out = Normalized::default();

    for (index, item) in raw.iter().enumerate() {
        let Some(entry) = normalize_entry(item) else {
            debug!(index, "Dropping entry without name or link");
            out.skipped += 1;
            continue;
        };
        if !seen.insert(entry.full_name.clone()) {
            trace!(index, full_name = %entry.full_name, "Dropping duplicate entry");
            out.skipped += 1;
            continue;
        }
        out.entries.push(entry);
    }

    debug!(
        entries = out.entries.len(),
        skipped = out.skipped,
        "Normalized trending entries"
    );
    out
}

/// Normalizes one entry, or returns `None` if it has no usable name or link.
pub fn normalize_entry(raw: &RawTrendingEntry) -> Option<TrendingEntry> {
    let full_name: String = raw
        .full_name
        .as_deref()?
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if full_name.is_empty() {
        return None;
    }

    let url = RepoId::parse(raw.href.as_deref()?).ok()?.url();

    Some(TrendingEntry {
        full_name,
        url,
        description: clean_text(raw.description.as_deref()),
        language: clean_text(raw.language.as_deref()),
        stars: raw.stars.as_deref().map_or(0, parse_count),
        forks: raw.forks.as_deref().map_or(0, parse_count),
        stars_today: raw.stars_today.as_deref().map_or(0, parse_count),
        contributors: raw
            .contributors
            .as_deref()
            .map(split_contributors)
            .unwrap_or_default(),
    })
}

/// Trims and collapses whitespace runs; empty text becomes `None`.
pub fn clean_text(text: Option<&str>) -> Option<String> {
    let joined = text?.split_whitespace().collect::<Vec<_>>().join(" ");
    if joined.is_empty() { None } else { Some(joined) }
}

/// Splits comma-joined names, trimming and removing a leading `@`.
pub fn split_contributors(text: &str) -> Vec<String> {
    text.split(',')
        .map(|name| name.trim().trim_start_matches('@').trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Commits & Contributors
// ============================================================================

/// Normalizes commit rows, dropping rows with neither hash nor message.
pub fn normalize_commits(raw: &[RawCommit]) -> Vec<CommitSummary> {
    raw.iter()
        .filter_map(|commit| {
            let sha = commit.href.as_deref().map(short_sha).unwrap_or_default();
            let message = commit
                .message
                .as_deref()
                .and_then(|m| m.lines().map(str::trim).find(|l| !l.is_empty()))
                .unwrap_or_default()
                .to_string();
            if sha.is_empty() && message.is_empty() {
                return None;
            }

            Some(CommitSummary {
                sha,
                message,
                author: clean_text(commit.author.as_deref())
                    .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
                timestamp: commit.datetime.as_deref().and_then(parse_timestamp),
            })
        })
        .collect()
}

/// Normalizes contributors, sorted by contribution count (descending,
/// ties keep page order).
pub fn normalize_contributors(raw: &[RawContributor]) -> Vec<ContributorSummary> {
    let mut contributors: Vec<ContributorSummary> = raw
        .iter()
        .filter_map(|c| {
            let name = clean_text(c.name.as_deref())?;
            Some(ContributorSummary {
                name: name.trim_start_matches('@').to_string(),
                contribution_count: c.contributions.as_deref().map_or(0, parse_count),
                estimated: false,
            })
        })
        .collect();
    contributors.sort_by(|a, b| b.contribution_count.cmp(&a.contribution_count));
    contributors
}

/// Derives contributors from commit authors, for when the contributors
/// page (rendered client-side) yields nothing.
pub fn estimate_contributors(commits: &[CommitSummary], limit: usize) -> Vec<ContributorSummary> {
    let mut counts: Vec<(String, u64)> = Vec::new();
    for commit in commits {
        if commit.author.is_empty() || commit.author == UNKNOWN_AUTHOR {
            continue;
        }
        match counts.iter_mut().find(|(name, _)| *name == commit.author) {
            Some((_, count)) => *count += 1,
            None => counts.push((commit.author.clone(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    counts
        .into_iter()
        .take(limit)
        .map(|(name, contribution_count)| ContributorSummary {
            name,
            contribution_count,
            estimated: true,
        })
        .collect()
}

fn short_sha(href: &str) -> String {
    let last = href
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    if !last.is_empty() && last.chars().all(|c| c.is_ascii_hexdigit()) {
        last.chars().take(SHORT_SHA_LEN).collect()
    } else {
        String::new()
    }
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
