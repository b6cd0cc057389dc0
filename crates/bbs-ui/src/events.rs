//! UI events consumed by the reducer.

use bbs_core::client::ApiResult;
use bbs_core::forms::{LoginForm, PostEdit, RegisterForm, ReplyDraft, ThreadDraft};
use bbs_core::models::{CategoryId, PostId, Thread, ThreadId, User, UserId};
use bbs_core::query::SortBy;

use crate::request::RequestId;

#[derive(Debug, Clone)]
pub enum UiEvent {
    Nav(NavEvent),
    Search(SearchEvent),
    Submit(SubmitEvent),
    /// A request spawned by the runtime finished.
    Completed { id: RequestId, outcome: Outcome },
    DismissNotice,
    Quit,
}

/// Header links and in-page navigation.
#[derive(Debug, Clone)]
pub enum NavEvent {
    Home,
    Threads,
    Login,
    Register,
    Logout,
    OpenThread(ThreadId),
    /// Back from a thread to the thread list.
    Back,
    OpenCategory(String),
    OpenProfile(Option<UserId>),
    OpenSearch,
    /// "New thread" button; requires a signed-in user.
    CreateThread,
}

#[derive(Debug, Clone)]
pub enum SearchEvent {
    /// Search box in the header: jumps to the search page and runs it.
    Header(String),
    SetText(String),
    Submit,
    SetCategory(Option<CategoryId>),
    SetSort(SortBy),
    ClearFilters,
}

#[derive(Debug, Clone)]
pub enum SubmitEvent {
    Login(LoginForm),
    Register(RegisterForm),
    CreateThread(ThreadDraft),
    Reply(ReplyDraft),
    Edit(PostEdit),
    Delete(PostId),
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Login(ApiResult<User>),
    Register(ApiResult<User>),
    CreateThread(ApiResult<()>),
    Search(ApiResult<Vec<Thread>>),
    Reply(ApiResult<()>),
    Edit(ApiResult<()>),
    Delete(ApiResult<()>),
}
