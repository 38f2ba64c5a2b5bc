//! Text output formatting with score bars and colors.

use chrono::Local;
use trendscope_core::{ActivityLevel, RepositoryProfile, TrendingQuery, TrendingReport};
use trendscope_scrape::LanguageStats;

use super::{TrendingRow, percent_of};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const BLUE: &str = "\x1b[34m";
const CYAN: &str = "\x1b[36m";

// Score bar characters
const BAR_FULL: char = '█';
const BAR_EMPTY: char = '░';

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
    bar_width: usize,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self {
            use_colors,
            bar_width: 10,
        }
    }

    // ========================================================================
    // Trending
    // ========================================================================

    /// Formats a trending list.
    pub fn format_trending(&self, report: &TrendingReport, rows: &[TrendingRow<'_>]) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "{} {}",
            self.bold("Trending repositories"),
            self.dim(&format!("{}", report.query))
        ));
        lines.push("─".repeat(60));

        if rows.is_empty() {
            lines.push(self.dim("No repositories match the filters."));
        }

        let phrase = report.query.time_range.period_phrase();
        for row in rows {
            let entry = row.entry;
            let language = entry
                .language
                .as_deref()
                .map(|l| format!("  {}", self.blue(&format!("[{l}]"))))
                .unwrap_or_default();

            lines.push(format!(
                "{:>3}. {}  ★ {}  ⑂ {}  {}{}",
                row.rank,
                self.bold(&entry.full_name),
                self.format_number(entry.stars),
                self.format_number(entry.forks),
                self.green(&format!("+{} {phrase}", self.format_number(entry.stars_today))),
                language
            ));

            if let Some(description) = &entry.description {
                lines.push(format!("     {description}"));
            }

            lines.push(format!(
                "     popularity {} {:>3.0}  activity {}",
                self.progress_bar(row.popularity),
                row.popularity,
                self.color_for_level(row.activity)
            ));

            if !entry.contributors.is_empty() {
                lines.push(format!(
                    "     {}",
                    self.dim(&format!("built by {}", entry.contributors_joined()))
                ));
            }
        }

        lines.push(String::new());
        let mut footer = format!(
            "{} of {} repositories, fetched {}",
            rows.len(),
            report.len(),
            report
                .fetched_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
        );
        if report.skipped > 0 {
            footer.push_str(&format!(", {} skipped", report.skipped));
        }
        lines.push(self.dim(&footer));

        lines.join("\n")
    }

    // ========================================================================
    // Repository Profile
    // ========================================================================

    /// Formats a repository profile.
    pub fn format_profile(&self, profile: &RepositoryProfile) -> String {
        let mut lines = Vec::new();

        lines.push(self.bold(&profile.full_name));
        lines.push(self.dim(&profile.url));
        lines.push("─".repeat(40));

        if let Some(description) = &profile.description {
            lines.push(description.clone());
            lines.push(String::new());
        }

        lines.push(format!(
            "Language:     {}",
            profile.language.as_deref().unwrap_or("−")
        ));
        lines.push(format!(
            "Stars:        {}",
            self.format_number(profile.stars)
        ));
        lines.push(format!("Forks:        {}", self.format_number(profile.forks)));
        lines.push(format!(
            "Watchers:     {}",
            self.format_number(profile.watchers)
        ));
        lines.push(format!(
            "Open issues:  {}",
            self.format_number(profile.open_issues)
        ));
        if let Some(size) = profile.size_kb {
            lines.push(format!("Size:         {}", format_size(size)));
        }

        let metrics = &profile.activity_metrics;
        lines.push(String::new());
        lines.push(self.cyan("Activity"));
        lines.push(self.format_score("Health", metrics.health_score));
        lines.push(self.format_score("Community", metrics.community_engagement));
        lines.push(self.format_score("Velocity", metrics.development_velocity));
        lines.push(format!(
            "  {:<10} {}",
            "Level",
            self.color_for_level(metrics.activity_level)
        ));

        if let Some(analysis) = &profile.commit_analysis {
            lines.push(String::new());
            lines.push(self.cyan("Recent commits"));
            lines.push(format!(
                "  {} sampled, {} authors, {:.1}/day, avg message {:.0} chars",
                analysis.total_commits,
                analysis.unique_authors,
                analysis.daily_commit_rate,
                analysis.average_message_length
            ));
            let kinds: Vec<String> = analysis
                .commit_types
                .iter()
                .filter(|(_, count)| **count > 0)
                .map(|(kind, count)| format!("{kind:?}: {count}").to_lowercase())
                .collect();
            if !kinds.is_empty() {
                lines.push(format!("  {}", self.dim(&kinds.join(", "))));
            }
            for commit in profile.recent_commits.iter().take(5) {
                let sha = if commit.sha.is_empty() { "−" } else { &commit.sha };
                lines.push(format!(
                    "  {} {} {}",
                    self.yellow(sha),
                    commit.message,
                    self.dim(&format!("({})", commit.author))
                ));
            }
        }

        if let Some(analysis) = &profile.contributor_analysis {
            lines.push(String::new());
            lines.push(self.cyan("Contributors"));
            let estimated = profile.top_contributors.iter().any(|c| c.estimated);
            lines.push(format!(
                "  {} listed, {} contributions, diversity {:.2}{}",
                analysis.total_contributors,
                analysis.total_contributions,
                analysis.diversity,
                if estimated {
                    self.dim(" (estimated from commits)")
                } else {
                    String::new()
                }
            ));
            for contributor in profile.top_contributors.iter().take(5) {
                lines.push(format!(
                    "  {:<20} {}",
                    contributor.name, contributor.contribution_count
                ));
            }
        }

        lines.join("\n")
    }

    fn format_score(&self, label: &str, score: f64) -> String {
        format!(
            "  {:<10} {} {:>5.1}",
            label,
            self.progress_bar(score),
            score
        )
    }

    // ========================================================================
    // Languages
    // ========================================================================

    /// Formats the language breakdown of one trending page.
    pub fn format_language_stats(&self, query: &TrendingQuery, stats: &LanguageStats) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "{} {}",
            self.bold("Languages"),
            self.dim(&format!("{query}"))
        ));
        lines.push("─".repeat(50));

        let total: usize = stats.distribution.iter().map(|(_, count)| count).sum();
        for (language, count) in &stats.distribution {
            let share = percent_of(*count, total);
            let stars = stats
                .stars_by_language
                .iter()
                .find(|(l, _)| l == language)
                .map_or(0, |(_, s)| *s);
            lines.push(format!(
                "{:<16} {} {:>3.0}%  {:>2} repos  ★ {}",
                language,
                self.progress_bar(share),
                share,
                count,
                self.format_number(stars)
            ));
        }

        if let Some(top) = &stats.most_popular {
            lines.push(String::new());
            lines.push(format!(
                "{} languages, most popular: {}",
                stats.total_languages,
                self.bold(top)
            ));
        }

        lines.join("\n")
    }

    /// Formats an error message.
    pub fn format_error(&self, target: &str, error: &str) -> String {
        format!("{}: {} - {}", self.bold(target), self.red("Error"), error)
    }

    // ========================================================================
    // Score Bar
    // ========================================================================

    /// Creates a score bar for a 0-100 value.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn progress_bar(&self, score: f64) -> String {
        let clamped = score.clamp(0.0, 100.0);
        let filled = ((clamped / 100.0) * self.bar_width as f64).round() as usize;
        let empty = self.bar_width.saturating_sub(filled);

        let bar = format!(
            "{}{}",
            BAR_FULL.to_string().repeat(filled),
            BAR_EMPTY.to_string().repeat(empty)
        );

        self.color_for_percent(clamped, &bar)
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn color_for_percent(&self, percent: f64, text: &str) -> String {
        if !self.use_colors {
            return text.to_string();
        }

        if percent < 20.0 {
            self.red(text)
        } else if percent < 50.0 {
            self.yellow(text)
        } else {
            self.green(text)
        }
    }

    fn color_for_level(&self, level: ActivityLevel) -> String {
        let label = level.label();
        match level {
            ActivityLevel::VeryHigh | ActivityLevel::High => self.green(label),
            ActivityLevel::Medium => self.yellow(label),
            ActivityLevel::Low | ActivityLevel::VeryLow => self.dim(label),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn format_number(&self, n: u64) -> String {
        let n = n as f64;
        if n >= 1_000_000.0 {
            format!("{:.1}M", n / 1_000_000.0)
        } else if n >= 1_000.0 {
            format!("{:.1}K", n / 1_000.0)
        } else {
            format!("{n:.0}")
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn blue(&self, text: &str) -> String {
        self.paint(BLUE, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn format_size(kb: u64) -> String {
    if kb >= 1024 * 1024 {
        format!("{:.1} GB", kb as f64 / (1024.0 * 1024.0))
    } else if kb >= 1024 {
        format!("{:.1} MB", kb as f64 / 1024.0)
    } else {
        format!("{kb} KB")
    }
}
