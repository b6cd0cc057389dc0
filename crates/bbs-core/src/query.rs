//! Thread search: free-text match, category filter and ordering.
//!
//! The evaluator is a pure function over a borrowed slice. It never reorders
//! or mutates the caller's collection; results are always a fresh `Vec`.
//!
//! Rules:
//! - A thread matches when the lower-cased query is a substring of its
//!   lower-cased title or body.
//! - A blank (empty or whitespace-only) query matches nothing.
//! - The category filter, when present, is strict equality on the id.
//! - Sorting is stable, so ties keep input order.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{CategoryId, Thread};

/// Result ordering for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Newest first (default).
    #[default]
    Latest,
    /// Oldest first.
    Oldest,
    /// Most viewed first.
    Popular,
    /// Most posts first.
    Replies,
}

impl SortBy {
    pub fn all() -> &'static [SortBy] {
        &[
            SortBy::Latest,
            SortBy::Oldest,
            SortBy::Popular,
            SortBy::Replies,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortBy::Latest => "latest",
            SortBy::Oldest => "oldest",
            SortBy::Popular => "popular",
            SortBy::Replies => "replies",
        }
    }

    /// Display label used by the search page.
    pub fn label(self) -> &'static str {
        match self {
            SortBy::Latest => "新着順",
            SortBy::Oldest => "古い順",
            SortBy::Popular => "人気順（閲覧数）",
            SortBy::Replies => "返信数順",
        }
    }

    /// Resolves an optional, possibly unknown, sort parameter.
    ///
    /// Absent or unrecognized values fall back to [`SortBy::Latest`].
    pub fn from_param(value: Option<&str>) -> SortBy {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSortByError(String);

impl fmt::Display for ParseSortByError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown sort mode '{}' (expected latest, oldest, popular or replies)",
            self.0
        )
    }
}

impl std::error::Error for ParseSortByError {}

impl FromStr for SortBy {
    type Err = ParseSortByError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(SortBy::Latest),
            "oldest" => Ok(SortBy::Oldest),
            "popular" => Ok(SortBy::Popular),
            "replies" => Ok(SortBy::Replies),
            _ => Err(ParseSortByError(s.to_string())),
        }
    }
}

/// A fully resolved search request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    pub text: String,
    pub category_id: Option<CategoryId>,
    pub sort_by: SortBy,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_category(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Returns references to the matching threads in result order.
pub fn matching<'a>(threads: &'a [Thread], query: &SearchQuery) -> Vec<&'a Thread> {
    if query.is_blank() {
        return Vec::new();
    }

    let needle = query.text.to_lowercase();
    let results = threads
        .iter()
        .filter(|thread| matches_text(thread, &needle))
        .filter(|thread| query.category_id.is_none_or(|id| thread.category_id == id));

    sorted(results, query.sort_by)
}

/// Returns owned copies of the matching threads in result order.
pub fn search(threads: &[Thread], query: &SearchQuery) -> Vec<Thread> {
    matching(threads, query).into_iter().cloned().collect()
}

/// Loose entry point: unknown or missing `sort_by` means `latest`.
pub fn evaluate(
    threads: &[Thread],
    query: &str,
    category_id: Option<CategoryId>,
    sort_by: Option<&str>,
) -> Vec<Thread> {
    let query = SearchQuery::new(query)
        .with_category(category_id)
        .with_sort(SortBy::from_param(sort_by));
    search(threads, &query)
}

/// Collects and stably orders threads by the given mode.
pub fn sorted<'a>(threads: impl IntoIterator<Item = &'a Thread>, sort_by: SortBy) -> Vec<&'a Thread> {
    let mut out: Vec<&Thread> = threads.into_iter().collect();
    match sort_by {
        SortBy::Latest => out.sort_by_key(|t| Reverse(t.created_at)),
        SortBy::Oldest => out.sort_by_key(|t| t.created_at),
        SortBy::Popular => out.sort_by_key(|t| Reverse(t.view_count)),
        SortBy::Replies => out.sort_by_key(|t| Reverse(t.post_count)),
    }
    out
}

/// Pinned threads first; both groups keep their input order.
pub fn pinned_first<'a>(threads: impl IntoIterator<Item = &'a Thread>) -> Vec<&'a Thread> {
    let (pinned, regular): (Vec<&Thread>, Vec<&Thread>) =
        threads.into_iter().partition(|t| t.is_pinned);
    pinned.into_iter().chain(regular).collect()
}

fn matches_text(thread: &Thread, needle: &str) -> bool {
    thread.title.to_lowercase().contains(needle) || thread.body.to_lowercase().contains(needle)
}
