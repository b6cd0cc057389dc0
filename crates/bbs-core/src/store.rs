//! Read-only, in-memory board store.
//!
//! Every view returns a fresh sequence; the canonical thread list keeps its
//! seed order so different views (recent, popular, by category) never
//! interfere with one another.

use std::collections::HashMap;

use anyhow::Result;

use crate::models::{Category, CategoryId, Post, PostId, Thread, ThreadId, User, UserId};
use crate::query::{self, SearchQuery, SortBy};
use crate::seed::Dataset;

/// Board-wide totals shown on the home page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardStats {
    pub threads: usize,
    pub posts: usize,
    pub users: usize,
}

#[derive(Debug, Clone)]
pub struct Store {
    data: Dataset,
    posts_by_thread: HashMap<ThreadId, Vec<usize>>,
}

impl Store {
    /// Builds a store over an already validated dataset.
    pub fn new(data: Dataset) -> Self {
        let mut posts_by_thread: HashMap<ThreadId, Vec<usize>> = HashMap::new();
        for (idx, post) in data.posts.iter().enumerate() {
            posts_by_thread.entry(post.thread_id).or_default().push(idx);
        }
        Self {
            data,
            posts_by_thread,
        }
    }

    /// Store over the embedded seed dataset.
    pub fn seeded() -> Result<Self> {
        Ok(Self::new(Dataset::seed()?))
    }

    pub fn threads(&self) -> &[Thread] {
        &self.data.threads
    }

    pub fn categories(&self) -> &[Category] {
        &self.data.categories
    }

    pub fn users(&self) -> &[User] {
        &self.data.users
    }

    pub fn thread(&self, id: ThreadId) -> Option<&Thread> {
        self.data.threads.iter().find(|t| t.id == id)
    }

    pub fn post(&self, id: PostId) -> Option<&Post> {
        self.data.posts.iter().find(|p| p.id == id)
    }

    /// Posts of a thread in seed order; empty for an unknown thread.
    pub fn posts_for_thread(&self, thread_id: ThreadId) -> Vec<&Post> {
        self.posts_by_thread
            .get(&thread_id)
            .map(|indices| indices.iter().map(|&i| &self.data.posts[i]).collect())
            .unwrap_or_default()
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.data.users.iter().find(|u| u.id == id)
    }

    /// The mock signed-in user (first seeded user).
    pub fn current_user(&self) -> Option<&User> {
        self.data.users.first()
    }

    pub fn threads_by_user(&self, user_id: UserId) -> Vec<&Thread> {
        self.data
            .threads
            .iter()
            .filter(|t| t.user_id == user_id)
            .collect()
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.data.categories.iter().find(|c| c.id == id)
    }

    pub fn category_by_slug(&self, slug: &str) -> Option<&Category> {
        self.data.categories.iter().find(|c| c.slug == slug)
    }

    /// Threads of the category with the given slug; empty when unknown.
    pub fn threads_by_category(&self, slug: &str) -> Vec<&Thread> {
        let Some(category) = self.category_by_slug(slug) else {
            return Vec::new();
        };
        self.data
            .threads
            .iter()
            .filter(|t| t.category_id == category.id)
            .collect()
    }

    /// Thread count per category, in category order.
    pub fn category_counts(&self) -> Vec<(&Category, usize)> {
        self.data
            .categories
            .iter()
            .map(|c| {
                let count = self
                    .data
                    .threads
                    .iter()
                    .filter(|t| t.category_id == c.id)
                    .count();
                (c, count)
            })
            .collect()
    }

    /// The first `limit` threads in canonical order.
    pub fn recent_threads(&self, limit: usize) -> Vec<&Thread> {
        self.data.threads.iter().take(limit).collect()
    }

    /// Top `limit` threads by view count.
    pub fn popular_threads(&self, limit: usize) -> Vec<&Thread> {
        let mut out = query::sorted(&self.data.threads, SortBy::Popular);
        out.truncate(limit);
        out
    }

    pub fn search(&self, query: &SearchQuery) -> Vec<Thread> {
        query::search(&self.data.threads, query)
    }

    pub fn stats(&self) -> BoardStats {
        BoardStats {
            threads: self.data.threads.len(),
            posts: self.data.posts.len(),
            users: self.data.users.len(),
        }
    }
}
