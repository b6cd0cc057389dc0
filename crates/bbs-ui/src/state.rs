//! Navigation state.
//!
//! `AppState` is mutated only by the reducer in `update`.

use bbs_core::models::{CategoryId, Thread, ThreadId, UserId};
use bbs_core::query::{SearchQuery, SortBy};

use crate::request::{Pending, RequestId, RequestSeq};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    Threads,
    ThreadDetail {
        thread_id: ThreadId,
    },
    CreateThread,
    Login,
    Register,
    Search,
    /// `None` shows the signed-in user's own profile.
    Profile {
        user_id: Option<UserId>,
    },
    Category {
        slug: String,
    },
}

impl Page {
    pub fn name(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Threads => "threads",
            Page::ThreadDetail { .. } => "thread-detail",
            Page::CreateThread => "create-thread",
            Page::Login => "login",
            Page::Register => "register",
            Page::Search => "search",
            Page::Profile { .. } => "profile",
            Page::Category { .. } => "category",
        }
    }
}

/// Search panel: inputs, last results, and the request in flight.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub text: String,
    pub category_id: Option<CategoryId>,
    pub sort_by: SortBy,
    pub results: Vec<Thread>,
    pub has_searched: bool,
    pub in_flight: Option<RequestId>,
}

impl SearchState {
    pub fn query(&self) -> SearchQuery {
        SearchQuery::new(self.text.clone())
            .with_category(self.category_id)
            .with_sort(self.sort_by)
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Info(text) | Notice::Error(text) => text,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub page: Page,
    pub user: Option<UserId>,
    pub search: SearchState,
    pub notice: Option<Notice>,
    pub pending: Pending,
    pub requests: RequestSeq,
    pub should_quit: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_loading(&self) -> bool {
        !self.pending.is_empty()
    }
}
