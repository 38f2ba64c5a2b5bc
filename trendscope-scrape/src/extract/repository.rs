//! Repository, commit history, contributor, and issue page extraction.

use std::sync::LazyLock;

use scraper::Html;
use tracing::debug;

use super::{RawCommit, RawContributor, RawRepositoryPage};
use crate::selector::{ContainerChain, CssAttr, FieldChain, TextMatches};

/// Commits read from a history page.
pub const MAX_COMMITS: usize = 10;

/// Contributors read from a contributors page.
pub const MAX_CONTRIBUTORS: usize = 10;

struct RepositorySelectors {
    description: FieldChain,
    language: FieldChain,
    stars: FieldChain,
    forks: FieldChain,
    watchers: FieldChain,
    size: FieldChain,
    issues: FieldChain,
}

static REPOSITORY: LazyLock<RepositorySelectors> = LazyLock::new(|| RepositorySelectors {
    description: FieldChain::new("description").texts(&[
        "p[itemprop='about']",
        "div.BorderGrid-cell p.f4",
        "p.f4.my-3",
    ]),
    language: FieldChain::new("language").texts(&[
        "span[itemprop='programmingLanguage']",
        "div.BorderGrid-cell li.d-inline span.text-bold",
    ]),
    stars: FieldChain::new("stars")
        .then(CssAttr::new("#repo-stars-counter-star", "title"))
        .texts(&[
            "#repo-stars-counter-star",
            "a.Link--primary[href$='/stargazers'] strong",
            "a[href$='/stargazers']",
        ]),
    forks: FieldChain::new("forks")
        .then(CssAttr::new("#repo-network-counter", "title"))
        .texts(&[
            "#repo-network-counter",
            "a.Link--primary[href$='/forks'] strong",
            "a[href$='/forks']",
        ]),
    watchers: FieldChain::new("watchers")
        .texts(&["a.Link--primary[href$='/watchers'] strong", "a[href$='/watchers']"])
        .then(CssAttr::new("#repo-notifications-counter", "title")),
    size: FieldChain::new("size").then(TextMatches::new(
        "span",
        r"(?i)\d+(?:\.\d+)?\s*(?:KB|MB|GB)\b",
    )),
    issues: FieldChain::new("open_issues")
        .then(CssAttr::new("#issues-repo-tab-count", "title"))
        .texts(&["#issues-repo-tab-count", "#issues-tab span.Counter"]),
});

struct CommitSelectors {
    rows: ContainerChain,
    href: FieldChain,
    message: FieldChain,
    author: FieldChain,
    datetime: FieldChain,
}

static COMMITS: LazyLock<CommitSelectors> = LazyLock::new(|| CommitSelectors {
    rows: ContainerChain::new(&[
        "li[data-testid='commit-row-item']",
        "li.js-commits-list-item",
        "div.Box-row",
    ]),
    href: FieldChain::new("commit_href")
        .then(CssAttr::new("a[href*='/commit/']", "href"))
        .then(CssAttr::new("clipboard-copy", "value")),
    message: FieldChain::new("message").texts(&[
        "a[data-pjax]",
        "p.mb-1 a",
        "h4 a",
        "a.Link--primary",
    ]),
    author: FieldChain::new("author").texts(&[
        "a.commit-author",
        "span.commit-author",
        "a[data-hovercard-type='user']",
    ]),
    datetime: FieldChain::new("datetime")
        .then(CssAttr::new("relative-time", "datetime"))
        .then(CssAttr::new("[datetime]", "datetime")),
});

struct ContributorSelectors {
    rows: ContainerChain,
    name: FieldChain,
    contributions: FieldChain,
}

static CONTRIBUTORS: LazyLock<ContributorSelectors> = LazyLock::new(|| ContributorSelectors {
    rows: ContainerChain::new(&["li.contrib-person"]),
    name: FieldChain::new("contributor").texts(&["a.text-normal", "h3 a", "a[data-hovercard-type='user']"]),
    contributions: FieldChain::new("contributions").texts(&["span.num", "a.Link--secondary"]),
});

/// Extracts the landing page fields of a repository.
pub fn extract_repository(html: &str) -> RawRepositoryPage {
    let document = Html::parse_document(html);
    let root = document.root_element();
    let sel = &*REPOSITORY;

    RawRepositoryPage {
        description: sel.description.extract(root),
        language: sel.language.extract(root),
        stars: sel.stars.extract(root),
        forks: sel.forks.extract(root),
        watchers: sel.watchers.extract(root),
        open_issues: sel.issues.extract(root),
        size: sel.size.extract(root),
    }
}

/// Extracts the open issue counter, present on every repository tab.
pub fn extract_issue_count(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    REPOSITORY.issues.extract(document.root_element())
}

/// Extracts up to [`MAX_COMMITS`] commit rows, newest first.
pub fn extract_commits(html: &str) -> Vec<RawCommit> {
    extract_commits_limited(html, MAX_COMMITS)
}

/// Extracts up to `limit` commit rows, newest first.
pub fn extract_commits_limited(html: &str, limit: usize) -> Vec<RawCommit> {
    let document = Html::parse_document(html);
    let sel = &*COMMITS;

    let commits: Vec<RawCommit> = sel
        .rows
        .select(&document)
        .into_iter()
        .take(limit)
        .map(|row| RawCommit {
            href: sel.href.extract(row),
            message: sel.message.extract(row),
            author: sel.author.extract(row),
            datetime: sel.datetime.extract(row),
        })
        .collect();

    debug!(count = commits.len(), "Extracted commit rows");
    commits
}

/// Extracts up to [`MAX_CONTRIBUTORS`] contributors.
pub fn extract_contributors(html: &str) -> Vec<RawContributor> {
    extract_contributors_limited(html, MAX_CONTRIBUTORS)
}

/// Extracts up to `limit` contributors.
pub fn extract_contributors_limited(html: &str, limit: usize) -> Vec<RawContributor> {
    let document = Html::parse_document(html);
    let sel = &*CONTRIBUTORS;

    let contributors: Vec<RawContributor> = sel
        .rows
        .select(&document)
        .into_iter()
        .take(limit)
        .map(|row| RawContributor {
            name: sel.name.extract(row),
            contributions: sel.contributions.extract(row),
        })
        .collect();

    debug!(count = contributors.len(), "Extracted contributors");
    contributors
}
