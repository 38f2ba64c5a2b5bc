//! Summary statistics over commit and contributor samples.

use std::collections::{BTreeMap, HashSet};

use trendscope_core::{
    CommitAnalysis, CommitKind, CommitSummary, ContributorAnalysis, ContributorSummary,
};

use crate::metrics::commits_per_day;

/// Summarizes a commit sample; `None` when empty.
#[allow(clippy::cast_precision_loss)]
pub fn analyze_commits(commits: &[CommitSummary]) -> Option<CommitAnalysis> {
    if commits.is_empty() {
        return None;
    }

    let unique_authors = commits
        .iter()
        .map(|c| c.author.as_str())
        .collect::<HashSet<_>>()
        .len();
    let total_chars: usize = commits.iter().map(|c| c.message.chars().count()).sum();

    let mut commit_types = BTreeMap::new();
    for commit in commits {
        *commit_types
            .entry(CommitKind::classify(&commit.message))
            .or_insert(0) += 1;
    }

    Some(CommitAnalysis {
        total_commits: commits.len(),
        daily_commit_rate: commits_per_day(commits),
        unique_authors,
        average_message_length: total_chars as f64 / commits.len() as f64,
        commit_types,
    })
}

/// Summarizes a contributor list (already ranked); `None` when empty.
#[allow(clippy::cast_precision_loss)]
pub fn analyze_contributors(contributors: &[ContributorSummary]) -> Option<ContributorAnalysis> {
    let first = contributors.first()?;
    let total: u64 = contributors.iter().map(|c| c.contribution_count).sum();

    let diversity = if total == 0 {
        0.0
    } else {
        let hhi: f64 = contributors
            .iter()
            .map(|c| {
                let share = c.contribution_count as f64 / total as f64;
                share * share
            })
            .sum();
        1.0 - hhi
    };

    Some(ContributorAnalysis {
        total_contributors: contributors.len(),
        top_contributor: Some(first.name.clone()),
        total_contributions: total,
        average_contributions: total as f64 / contributors.len() as f64,
        diversity,
    })
}
