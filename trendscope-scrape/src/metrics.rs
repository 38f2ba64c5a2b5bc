//! Derived activity scores.
//!
//! Every function here is pure: recency is measured against the explicit
//! `as_of` in [`MetricsInput`], never the clock.

use chrono::{DateTime, Utc};
use trendscope_core::{ActivityLevel, ActivityMetrics, CommitSummary, ContributorSummary};

// ============================================================================
// Policy Weights
// ============================================================================

/// Weight of the star factor in the health score.
pub const HEALTH_STARS_WEIGHT: f64 = 0.5;
/// Weight of the fork ratio in the health score.
pub const HEALTH_FORKS_WEIGHT: f64 = 0.2;
/// Weight of commit recency in the health score.
pub const HEALTH_RECENCY_WEIGHT: f64 = 0.3;
/// `log10(stars + 1)` at which the star factor saturates (100k stars).
pub const STARS_LOG_SATURATION: f64 = 5.0;
/// Fork-to-star ratio at which the fork factor saturates.
pub const FORK_RATIO_SATURATION: f64 = 0.25;
/// Commit age in days at which recency has halved.
pub const RECENCY_HALF_LIFE_DAYS: f64 = 7.0;

/// Weight of contributor count in community engagement.
pub const COMMUNITY_CONTRIBUTORS_WEIGHT: f64 = 0.6;
/// Weight of the issue ratio in community engagement.
pub const COMMUNITY_ISSUES_WEIGHT: f64 = 0.4;
/// Contributor count at which the contributor factor saturates.
pub const CONTRIBUTORS_SATURATION: f64 = 10.0;
/// Multiplier on the issue-to-star ratio (saturates at 5%).
pub const ISSUE_RATIO_SCALE: f64 = 20.0;

/// Velocity points per commit per day.
pub const VELOCITY_POINTS_PER_COMMIT_DAY: f64 = 50.0;

// ============================================================================
// Input
// ============================================================================

/// Everything the scores are computed from.
#[derive(Debug, Clone, Copy)]
pub struct MetricsInput<'a> {
    /// Total stars.
    pub stars: u64,
    /// Total forks.
    pub forks: u64,
    /// Open issues.
    pub open_issues: u64,
    /// Commit sample, any order.
    pub commits: &'a [CommitSummary],
    /// Contributor list.
    pub contributors: &'a [ContributorSummary],
    /// Reference time for recency.
    pub as_of: DateTime<Utc>,
}

// ============================================================================
// Scores
// ============================================================================

/// Computes all scores.
pub fn compute_metrics(input: &MetricsInput<'_>) -> ActivityMetrics {
    let health_score = health_score(input);
    ActivityMetrics {
        health_score,
        community_engagement: community_engagement(input),
        development_velocity: development_velocity(input.commits),
        activity_level: ActivityLevel::from_score(health_score),
    }
}

/// Stars, fork ratio, and recency of the newest commit.
#[allow(clippy::cast_precision_loss)]
pub fn health_score(input: &MetricsInput<'_>) -> f64 {
    let stars = input.stars as f64;
    let stars_factor = ((stars + 1.0).log10() / STARS_LOG_SATURATION).min(1.0);
    let fork_factor = if input.stars == 0 {
        0.0
    } else {
        ((input.forks as f64 / stars) / FORK_RATIO_SATURATION).min(1.0)
    };
    let recency = recency(input.commits, input.as_of);

    clamp_score(
        100.0
            * (HEALTH_STARS_WEIGHT * stars_factor
                + HEALTH_FORKS_WEIGHT * fork_factor
                + HEALTH_RECENCY_WEIGHT * recency),
    )
}

/// Contributor count and issue-to-star ratio.
#[allow(clippy::cast_precision_loss)]
pub fn community_engagement(input: &MetricsInput<'_>) -> f64 {
    let contributor_factor = (input.contributors.len() as f64 / CONTRIBUTORS_SATURATION).min(1.0);
    let issue_factor = if input.stars == 0 {
        0.0
    } else {
        (ISSUE_RATIO_SCALE * input.open_issues as f64 / input.stars as f64).min(1.0)
    };

    clamp_score(
        100.0
            * (COMMUNITY_CONTRIBUTORS_WEIGHT * contributor_factor
                + COMMUNITY_ISSUES_WEIGHT * issue_factor),
    )
}

/// Commit frequency over the sample.
pub fn development_velocity(commits: &[CommitSummary]) -> f64 {
    clamp_score(VELOCITY_POINTS_PER_COMMIT_DAY * commits_per_day(commits))
}

/// Dated commits per day across the sample's span (at least one day);
/// 0 with fewer than two dated commits.
#[allow(clippy::cast_precision_loss)]
pub fn commits_per_day(commits: &[CommitSummary]) -> f64 {
    let dates: Vec<DateTime<Utc>> = commits.iter().filter_map(|c| c.timestamp).collect();
    if dates.len() < 2 {
        return 0.0;
    }
    let (Some(first), Some(last)) = (dates.iter().min(), dates.iter().max()) else {
        return 0.0;
    };
    let span_days = (*last - *first).num_days().max(1);
    dates.len() as f64 / span_days as f64
}

/// `1 / (1 + age_days / 7)` for the newest dated commit; 0 without one.
#[allow(clippy::cast_precision_loss)]
pub fn recency(commits: &[CommitSummary], as_of: DateTime<Utc>) -> f64 {
    let Some(newest) = commits.iter().filter_map(|c| c.timestamp).max() else {
        return 0.0;
    };
    let age_days = ((as_of - newest).num_seconds() as f64 / 86_400.0).max(0.0);
    1.0 / (1.0 + age_days / RECENCY_HALF_LIFE_DAYS)
}

/// Maps non-finite values to 0 and clamps to [0, 100].
pub fn clamp_score(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn commit_at(days_ago: i64) -> CommitSummary {
        CommitSummary {
            sha: String::new(),
            message: "work".into(),
            author: "dev".into(),
            timestamp: Some(as_of() - Duration::days(days_ago)),
        }
    }

    fn input<'a>(
        stars: u64,
        forks: u64,
        issues: u64,
        commits: &'a [CommitSummary],
        contributors: &'a [ContributorSummary],
    ) -> MetricsInput<'a> {
        MetricsInput {
            stars,
            forks,
            open_issues: issues,
            commits,
            contributors,
            as_of: as_of(),
        }
    }

    #[test]
    fn test_zero_input_is_finite_and_bounded() {
        let metrics = compute_metrics(&input(0, 0, 0, &[], &[]));
        for score in [
            metrics.health_score,
            metrics.community_engagement,
            metrics.development_velocity,
        ] {
            assert!(score.is_finite());
            assert!((0.0..=100.0).contains(&score));
        }
        assert_eq!(metrics.health_score, 0.0);
        assert_eq!(metrics.activity_level, ActivityLevel::VeryLow);
    }

    #[test]
    fn test_saturated_input_hits_ceiling() {
        let commits: Vec<_> = (0..10).map(|_| commit_at(0)).chain([commit_at(1)]).collect();
        let contributors: Vec<_> = (0..10)
            .map(|i| ContributorSummary {
                name: format!("dev{i}"),
                contribution_count: 1,
                estimated: false,
            })
            .collect();

        let metrics = compute_metrics(&input(1_000_000, 500_000, 100_000, &commits, &contributors));
        assert!((metrics.health_score - 100.0).abs() < 1e-9);
        assert!((metrics.community_engagement - 100.0).abs() < 1e-9);
        assert!((metrics.development_velocity - 100.0).abs() < 1e-9);
        assert_eq!(metrics.activity_level, ActivityLevel::VeryHigh);
    }

    #[test]
    fn test_health_components() {
        // 9999 stars: log10(10000)/5 = 0.8; forks/stars = 0.125 -> 0.5; no commits.
        let score = health_score(&input(9_999, 1_249, 0, &[], &[]));
        let expected = 100.0 * (0.5 * 0.8 + 0.2 * (1_249.0 / 9_999.0 / 0.25));
        assert!((score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_recency_decay() {
        assert!((recency(&[commit_at(0)], as_of()) - 1.0).abs() < 1e-9);
        assert!((recency(&[commit_at(7)], as_of()) - 0.5).abs() < 1e-9);
        assert!((recency(&[commit_at(30), commit_at(7)], as_of()) - 0.5).abs() < 1e-9);
        assert_eq!(recency(&[], as_of()), 0.0);
    }

    #[test]
    fn test_velocity() {
        assert_eq!(development_velocity(&[commit_at(0)]), 0.0);
        // 4 dated commits over 8 days: 0.5/day -> 25 points.
        let commits = [commit_at(0), commit_at(2), commit_at(5), commit_at(8)];
        assert!((development_velocity(&commits) - 25.0).abs() < 1e-9);
        // Same-day commits use a one-day span.
        assert!((commits_per_day(&[commit_at(0), commit_at(0)]) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_community_issue_term() {
        // 5 contributors, 1% issues: 0.6*0.5 + 0.4*0.2 = 0.38
        let contributors: Vec<_> = (0..5)
            .map(|i| ContributorSummary {
                name: format!("c{i}"),
                contribution_count: 1,
                estimated: true,
            })
            .collect();
        let score = community_engagement(&input(1_000, 0, 10, &[], &contributors));
        assert!((score - 38.0).abs() < 1e-9);
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(f64::NAN), 0.0);
        assert_eq!(clamp_score(f64::INFINITY), 0.0);
        assert_eq!(clamp_score(-3.0), 0.0);
        assert_eq!(clamp_score(140.0), 100.0);
        assert_eq!(clamp_score(42.5), 42.5);
    }
}
