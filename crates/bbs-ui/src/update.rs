//! Reducer.
//!
//! `update` is the only place `AppState` changes. It performs no I/O; work
//! that needs the client is returned as `UiEffect`s for the runtime.

use bbs_core::client::{ApiError, ApiResult};
use bbs_core::models::User;
use bbs_core::query::SortBy;

use crate::effects::UiEffect;
use crate::events::{NavEvent, Outcome, SearchEvent, SubmitEvent, UiEvent};
use crate::request::{RequestId, RequestKind};
use crate::state::{AppState, Notice, Page};

pub fn update(state: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Nav(ev) => handle_nav(state, ev),
        UiEvent::Search(ev) => handle_search(state, ev),
        UiEvent::Submit(ev) => handle_submit(state, ev),
        UiEvent::Completed { id, outcome } => handle_completed(state, id, outcome),
        UiEvent::DismissNotice => {
            state.notice = None;
            vec![]
        }
        UiEvent::Quit => {
            state.should_quit = true;
            vec![UiEffect::Quit]
        }
    }
}

fn go_to(state: &mut AppState, page: Page) {
    tracing::debug!(from = state.page.name(), to = page.name(), "navigate");
    state.page = page;
    state.notice = None;
}

fn handle_nav(state: &mut AppState, event: NavEvent) -> Vec<UiEffect> {
    match event {
        NavEvent::Home => go_to(state, Page::Home),
        NavEvent::Threads | NavEvent::Back => go_to(state, Page::Threads),
        NavEvent::Login => go_to(state, Page::Login),
        NavEvent::Register => go_to(state, Page::Register),
        NavEvent::Logout => {
            state.user = None;
            go_to(state, Page::Home);
        }
        NavEvent::OpenThread(thread_id) => go_to(state, Page::ThreadDetail { thread_id }),
        NavEvent::OpenCategory(slug) => go_to(state, Page::Category { slug }),
        NavEvent::OpenProfile(user_id) => go_to(state, Page::Profile { user_id }),
        NavEvent::OpenSearch => go_to(state, Page::Search),
        NavEvent::CreateThread => {
            if state.is_logged_in() {
                go_to(state, Page::CreateThread);
            } else {
                go_to(state, Page::Login);
            }
        }
    }
    vec![]
}

fn handle_search(state: &mut AppState, event: SearchEvent) -> Vec<UiEffect> {
    match event {
        SearchEvent::Header(text) => {
            if text.trim().is_empty() {
                return vec![];
            }
            state.search.text = text;
            go_to(state, Page::Search);
            run_search(state)
        }
        SearchEvent::SetText(text) => {
            state.search.text = text;
            vec![]
        }
        SearchEvent::Submit => run_search(state),
        SearchEvent::SetCategory(category_id) => {
            state.search.category_id = category_id;
            vec![]
        }
        SearchEvent::SetSort(sort_by) => {
            state.search.sort_by = sort_by;
            vec![]
        }
        SearchEvent::ClearFilters => {
            state.search.category_id = None;
            state.search.sort_by = SortBy::default();
            if state.search.has_searched {
                run_search(state)
            } else {
                vec![]
            }
        }
    }
}

/// Starts a search for the current panel inputs, superseding any search
/// still in flight.
fn run_search(state: &mut AppState) -> Vec<UiEffect> {
    let query = state.search.query();
    if query.is_blank() {
        return vec![];
    }

    let mut effects = Vec::new();
    if let Some(old) = state.search.in_flight.take() {
        state.pending.finish(old, RequestKind::Search);
        effects.push(UiEffect::Cancel { id: old });
    }

    let id = start(state, RequestKind::Search);
    state.search.in_flight = Some(id);
    state.search.has_searched = true;
    effects.push(UiEffect::Search { id, query });
    effects
}

fn start(state: &mut AppState, kind: RequestKind) -> RequestId {
    let id = state.requests.next_id();
    state.pending.start(id, kind);
    id
}

fn handle_submit(state: &mut AppState, event: SubmitEvent) -> Vec<UiEffect> {
    match event {
        SubmitEvent::Login(form) => {
            let id = start(state, RequestKind::Login);
            vec![UiEffect::Login { id, form }]
        }
        SubmitEvent::Register(form) => {
            let id = start(state, RequestKind::Register);
            vec![UiEffect::Register { id, form }]
        }
        SubmitEvent::CreateThread(draft) => {
            if !state.is_logged_in() {
                go_to(state, Page::Login);
                return vec![];
            }
            let id = start(state, RequestKind::CreateThread);
            vec![UiEffect::CreateThread { id, draft }]
        }
        SubmitEvent::Reply(draft) => {
            if !state.is_logged_in() {
                go_to(state, Page::Login);
                return vec![];
            }
            let id = start(state, RequestKind::Reply);
            vec![UiEffect::Reply { id, draft }]
        }
        SubmitEvent::Edit(edit) => {
            let Some(editor) = state.user else {
                go_to(state, Page::Login);
                return vec![];
            };
            let id = start(state, RequestKind::EditPost);
            vec![UiEffect::EditPost { id, edit, editor }]
        }
        SubmitEvent::Delete(post_id) => {
            let Some(user_id) = state.user else {
                go_to(state, Page::Login);
                return vec![];
            };
            let id = start(state, RequestKind::DeletePost);
            vec![UiEffect::DeletePost {
                id,
                post_id,
                user_id,
            }]
        }
    }
}

fn handle_completed(state: &mut AppState, id: RequestId, outcome: Outcome) -> Vec<UiEffect> {
    let kind = match &outcome {
        Outcome::Login(_) => RequestKind::Login,
        Outcome::Register(_) => RequestKind::Register,
        Outcome::CreateThread(_) => RequestKind::CreateThread,
        Outcome::Search(_) => RequestKind::Search,
        Outcome::Reply(_) => RequestKind::Reply,
        Outcome::Edit(_) => RequestKind::EditPost,
        Outcome::Delete(_) => RequestKind::DeletePost,
    };
    if !state.pending.finish(id, kind) {
        tracing::debug!(?id, ?kind, "dropping stale completion");
        return vec![];
    }

    match outcome {
        Outcome::Login(result) | Outcome::Register(result) => signed_in(state, result),
        Outcome::CreateThread(result) => match result {
            Ok(()) => {
                go_to(state, Page::Threads);
                state.notice = Some(Notice::Info("スレッドを作成しました".to_string()));
            }
            Err(err) => fail(state, &err),
        },
        Outcome::Search(result) => {
            state.search.in_flight = None;
            match result {
                Ok(results) => state.search.results = results,
                Err(err) => {
                    state.search.results.clear();
                    state.notice = Some(Notice::Error(format!("検索エラー: {err}")));
                }
            }
        }
        Outcome::Reply(result) => acknowledge(state, result, "返信を投稿しました"),
        Outcome::Edit(result) => acknowledge(state, result, "投稿を更新しました"),
        Outcome::Delete(result) => acknowledge(state, result, "投稿を削除しました"),
    }
    vec![]
}

fn signed_in(state: &mut AppState, result: ApiResult<User>) {
    match result {
        Ok(user) => {
            state.user = Some(user.id);
            go_to(state, Page::Home);
        }
        Err(err) => fail(state, &err),
    }
}

fn acknowledge(state: &mut AppState, result: ApiResult<()>, message: &str) {
    match result {
        Ok(()) => state.notice = Some(Notice::Info(message.to_string())),
        Err(err) => fail(state, &err),
    }
}

fn fail(state: &mut AppState, err: &ApiError) {
    if matches!(err, ApiError::Cancelled) {
        return;
    }
    state.notice = Some(Notice::Error(err.to_string()));
}
