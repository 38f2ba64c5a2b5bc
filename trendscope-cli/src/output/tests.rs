//! CLI output formatting tests.
//!
//! These tests verify that CLI output is correctly formatted for the
//! text, JSON, and CSV output modes.

use trendscope_core::{
    ActivityLevel, ActivityMetrics, ContributorAnalysis, ContributorSummary, LanguageFilter,
    RepositoryProfile, TimeRange, TrendingEntry, TrendingQuery, TrendingReport,
};

fn entry(name: &str, language: Option<&str>, stars: u64, today: u64) -> TrendingEntry {
    TrendingEntry {
        full_name: name.to_string(),
        url: format!("https://github.com/{name}"),
        description: Some(format!("About {name}")),
        language: language.map(str::to_string),
        stars,
        forks: stars / 10,
        stars_today: today,
        contributors: vec!["alice".to_string(), "bob".to_string()],
    }
}

fn report() -> TrendingReport {
    TrendingReport::new(
        TrendingQuery::new(LanguageFilter::All, TimeRange::Daily),
        vec![
            entry("rust-lang/rust", Some("Rust"), 15_420, 120),
            entry("tokio-rs/tokio", Some("Rust"), 2_100, 30),
            entry("psf/requests", Some("Python"), 500, 2),
        ],
        1,
    )
}

fn profile() -> RepositoryProfile {
    RepositoryProfile {
        full_name: "rust-lang/rust".to_string(),
        url: "https://github.com/rust-lang/rust".to_string(),
        description: Some("Empowering everyone".to_string()),
        language: Some("Rust".to_string()),
        stars: 98_000,
        forks: 12_700,
        watchers: 1_500,
        open_issues: 9_800,
        size_kb: Some(2_048),
        recent_commits: Vec::new(),
        top_contributors: vec![ContributorSummary {
            name: "bors".to_string(),
            contribution_count: 40,
            estimated: true,
        }],
        activity_metrics: ActivityMetrics {
            health_score: 72.5,
            community_engagement: 40.0,
            development_velocity: 10.0,
            activity_level: ActivityLevel::High,
        },
        commit_analysis: None,
        contributor_analysis: Some(ContributorAnalysis {
            total_contributors: 1,
            top_contributor: Some("bors".to_string()),
            total_contributions: 40,
            average_contributions: 40.0,
            diversity: 0.0,
        }),
    }
}

#[cfg(test)]
mod text_formatter_tests {
    use super::super::text::TextFormatter;
    use super::super::trending_rows;
    use super::*;
    use trendscope_scrape::stats::language_statistics;

    #[test]
    fn test_progress_bar_empty() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.progress_bar(0.0), "░░░░░░░░░░");
    }

    #[test]
    fn test_progress_bar_full() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.progress_bar(100.0), "██████████");
    }

    #[test]
    fn test_progress_bar_boundary_values() {
        let formatter = TextFormatter::new(false);

        let test_cases = vec![
            (0.0, "░░░░░░░░░░"),
            (10.0, "█░░░░░░░░░"),
            (25.0, "███░░░░░░░"), // 2.5 rounds to 3 blocks
            (50.0, "█████░░░░░"),
            (75.0, "████████░░"), // 7.5 rounds to 8 blocks
            (100.0, "██████████"),
            (150.0, "██████████"),
            (-5.0, "░░░░░░░░░░"),
        ];

        for (score, expected) in test_cases {
            assert_eq!(formatter.progress_bar(score), expected, "Failed for {score}");
        }
    }

    #[test]
    fn test_progress_bar_with_colors() {
        let formatter = TextFormatter::new(true);
        assert!(formatter.progress_bar(10.0).contains("\x1b[31m"), "Should be red for <20");
        assert!(formatter.progress_bar(40.0).contains("\x1b[33m"), "Should be yellow for <50");
        assert!(formatter.progress_bar(80.0).contains("\x1b[32m"), "Should be green for >=50");
    }

    #[test]
    fn test_format_number() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.format_number(999), "999");
        assert_eq!(formatter.format_number(15_420), "15.4K");
        assert_eq!(formatter.format_number(2_500_000), "2.5M");
    }

    #[test]
    fn test_format_trending() {
        let formatter = TextFormatter::new(false);
        let report = report();
        let rows = trending_rows(&report, &report.entries);

        let output = formatter.format_trending(&report, &rows);

        assert!(output.contains("Trending repositories"));
        assert!(output.contains("1. rust-lang/rust"));
        assert!(output.contains("15.4K"));
        assert!(output.contains("+120 today"));
        assert!(output.contains("[Python]"));
        assert!(output.contains("built by alice, bob"));
        assert!(output.contains("3 of 3 repositories"));
        assert!(output.contains("1 skipped"));
        assert!(!output.contains("\x1b["), "No ANSI codes without colors");
    }

    #[test]
    fn test_format_trending_keeps_page_rank_for_subset() {
        let formatter = TextFormatter::new(false);
        let report = report();
        let subset = vec![report.entries[2].clone()];
        let rows = trending_rows(&report, &subset);

        let output = formatter.format_trending(&report, &rows);

        assert!(output.contains("3. psf/requests"));
        assert!(output.contains("1 of 3 repositories"));
    }

    #[test]
    fn test_format_profile() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_profile(&profile());

        assert!(output.contains("rust-lang/rust"));
        assert!(output.contains("98.0K"));
        assert!(output.contains("2.0 MB"));
        assert!(output.contains("Health"));
        assert!(output.contains("72.5"));
        assert!(output.contains("High"));
        assert!(output.contains("estimated from commits"));
        assert!(output.contains("bors"));
    }

    #[test]
    fn test_format_language_stats() {
        let formatter = TextFormatter::new(false);
        let report = report();
        let stats = language_statistics(&report.entries);

        let output = formatter.format_language_stats(&report.query, &stats);

        assert!(output.contains("Rust"));
        assert!(output.contains("67%"));
        assert!(output.contains("most popular: Rust"));
    }

    #[test]
    fn test_format_error() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_error("a/b", "timed out");
        assert_eq!(output, "a/b: Error - timed out");
    }
}

#[cfg(test)]
mod json_formatter_tests {
    use super::super::json::JsonFormatter;
    use super::super::trending_rows;
    use super::*;
    use trendscope_scrape::stats::language_statistics;

    #[test]
    fn test_format_trending_json() {
        let formatter = JsonFormatter::new(false);
        let report = report();
        let rows = trending_rows(&report, &report.entries);

        let json = formatter.format_trending(&report, &rows).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["language"], "all");
        assert_eq!(parsed["since"], "daily");
        assert_eq!(parsed["skipped"], 1);
        assert_eq!(parsed["repositories"].as_array().unwrap().len(), 3);

        let first = &parsed["repositories"][0];
        assert_eq!(first["fullName"], "rust-lang/rust");
        assert_eq!(first["starsToday"], 120);
        assert_eq!(first["activityLevel"], "very_high");
        assert_eq!(first["contributors"][1], "bob");
        assert!(first["popularityScore"].as_f64().unwrap() > 90.0);
    }

    #[test]
    fn test_single_profile_not_wrapped() {
        let formatter = JsonFormatter::new(true);

        let one = formatter.format_profiles(&[profile()]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&one).unwrap();
        assert!(parsed.is_object());
        assert_eq!(parsed["activity_metrics"]["activity_level"], "high");

        let two = formatter.format_profiles(&[profile(), profile()]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&two).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_format_languages_json() {
        let formatter = JsonFormatter::new(false);
        let report = report();
        let pages = vec![(report.query.clone(), language_statistics(&report.entries))];

        let json = formatter.format_languages(&pages).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["totalLanguages"], 2);
        assert_eq!(parsed["mostPopular"], "Rust");
        assert_eq!(parsed["distribution"][0]["name"], "Rust");
        assert_eq!(parsed["distribution"][0]["repositories"], 2);
        assert!((parsed["distribution"][0]["percent"].as_f64().unwrap() - 66.67).abs() < 1e-9);
        assert_eq!(parsed["distribution"][0]["stars"], 17_520);
    }
}

#[cfg(test)]
mod csv_formatter_tests {
    use super::super::tabular::CsvFormatter;
    use super::super::trending_rows;
    use super::*;

    #[test]
    fn test_format_trending_csv() {
        let report = report();
        let rows = trending_rows(&report, &report.entries);

        let csv = CsvFormatter::new().format_trending(&rows).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("rank,full_name,url,description,language,stars,forks,stars_today,contributors"));
        assert!(lines[1].starts_with("1,rust-lang/rust,https://github.com/rust-lang/rust,About rust-lang/rust,Rust,15420,1542,120,\"alice, bob\","));
        assert!(lines[1].ends_with(",Very High"));
    }

    #[test]
    fn test_format_trending_csv_empty() {
        let csv = CsvFormatter::new().format_trending(&[]).unwrap();
        assert!(csv.is_empty());
    }

    #[test]
    fn test_format_profiles_csv() {
        let csv = CsvFormatter::new().format_profiles(&[profile()]).unwrap();
        let mut lines = csv.lines();

        let header = lines.next().unwrap();
        assert!(header.contains("health_score"));
        assert!(header.ends_with("top_contributor"));

        let row = lines.next().unwrap();
        assert!(row.starts_with("rust-lang/rust,"));
        assert!(row.contains(",72.5,40.0,10.0,High,"));
        assert!(row.ends_with(",0,1,bors"));
    }
}
