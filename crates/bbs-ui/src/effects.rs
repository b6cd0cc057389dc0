//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! The reducer decides when to start or cancel a request; the runtime owns
//! the cancellation tokens and spawns the work.

use bbs_core::forms::{LoginForm, PostEdit, RegisterForm, ReplyDraft, ThreadDraft};
use bbs_core::models::{PostId, UserId};
use bbs_core::query::SearchQuery;

use crate::request::RequestId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    Quit,

    Login {
        id: RequestId,
        form: LoginForm,
    },
    Register {
        id: RequestId,
        form: RegisterForm,
    },
    CreateThread {
        id: RequestId,
        draft: ThreadDraft,
    },
    Search {
        id: RequestId,
        query: SearchQuery,
    },
    Reply {
        id: RequestId,
        draft: ReplyDraft,
    },
    EditPost {
        id: RequestId,
        edit: PostEdit,
        editor: UserId,
    },
    DeletePost {
        id: RequestId,
        post_id: PostId,
        user_id: UserId,
    },

    /// Cancel an in-flight request. Its completion still arrives and is
    /// dropped by the reducer.
    Cancel { id: RequestId },
}

impl UiEffect {
    /// The request this effect starts, if any.
    pub fn request_id(&self) -> Option<RequestId> {
        match self {
            UiEffect::Login { id, .. }
            | UiEffect::Register { id, .. }
            | UiEffect::CreateThread { id, .. }
            | UiEffect::Search { id, .. }
            | UiEffect::Reply { id, .. }
            | UiEffect::EditPost { id, .. }
            | UiEffect::DeletePost { id, .. } => Some(*id),
            UiEffect::Quit | UiEffect::Cancel { .. } => None,
        }
    }
}
