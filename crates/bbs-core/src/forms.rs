//! Form payloads and their validation.
//!
//! Validation runs before a submission reaches the client. Submissions that
//! pass are still never written back to the store.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{CategoryId, MAX_THREAD_IMAGES, PostId, ThreadId, UserId};
use crate::store::Store;

/// Maximum title length, in characters.
pub const MAX_TITLE_CHARS: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    Required(&'static str),
    TooLong { field: &'static str, max: usize },
    TooManyImages { max: usize },
    InvalidEmail,
    PasswordMismatch,
    UnknownCategory(CategoryId),
    UnknownThread(ThreadId),
    UnknownPost(PostId),
    NotAuthor(PostId),
    ThreadLocked(ThreadId),
    ReplyOutsideThread { post_id: PostId, thread_id: ThreadId },
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::Required(field) => write!(f, "{field} is required"),
            FormError::TooLong { field, max } => {
                write!(f, "{field} must be at most {max} characters")
            }
            FormError::TooManyImages { max } => write!(f, "at most {max} images can be attached"),
            FormError::InvalidEmail => write!(f, "email address is invalid"),
            FormError::PasswordMismatch => write!(f, "password confirmation does not match"),
            FormError::UnknownCategory(id) => write!(f, "category {id} does not exist"),
            FormError::UnknownThread(id) => write!(f, "thread {id} does not exist"),
            FormError::UnknownPost(id) => write!(f, "post {id} does not exist"),
            FormError::NotAuthor(id) => write!(f, "post {id} belongs to another user"),
            FormError::ThreadLocked(id) => write!(f, "thread {id} is locked"),
            FormError::ReplyOutsideThread { post_id, thread_id } => {
                write!(f, "post {post_id} is not part of thread {thread_id}")
            }
        }
    }
}

impl std::error::Error for FormError {}

fn required(value: &str, field: &'static str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        Err(FormError::Required(field))
    } else {
        Ok(())
    }
}

fn email(value: &str) -> Result<(), FormError> {
    required(value, "email")?;
    if value.contains('@') {
        Ok(())
    } else {
        Err(FormError::InvalidEmail)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadDraft {
    pub title: String,
    pub body: String,
    pub category_id: CategoryId,
    /// Attached image file names.
    #[serde(default)]
    pub images: Vec<String>,
}

impl ThreadDraft {
    pub fn validate(&self, store: &Store) -> Result<(), FormError> {
        store
            .category(self.category_id)
            .ok_or(FormError::UnknownCategory(self.category_id))?;
        required(&self.title, "title")?;
        if self.title.chars().count() > MAX_TITLE_CHARS {
            return Err(FormError::TooLong {
                field: "title",
                max: MAX_TITLE_CHARS,
            });
        }
        required(&self.body, "body")?;
        if self.images.len() > MAX_THREAD_IMAGES {
            return Err(FormError::TooManyImages {
                max: MAX_THREAD_IMAGES,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyDraft {
    pub thread_id: ThreadId,
    pub content: String,
    #[serde(default)]
    pub reply_to: Option<PostId>,
}

impl ReplyDraft {
    pub fn validate(&self, store: &Store) -> Result<(), FormError> {
        let thread = store
            .thread(self.thread_id)
            .ok_or(FormError::UnknownThread(self.thread_id))?;
        if thread.is_locked {
            return Err(FormError::ThreadLocked(thread.id));
        }
        required(&self.content, "content")?;
        if let Some(post_id) = self.reply_to {
            let post = store.post(post_id).ok_or(FormError::UnknownPost(post_id))?;
            if post.thread_id != thread.id {
                return Err(FormError::ReplyOutsideThread {
                    post_id,
                    thread_id: thread.id,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostEdit {
    pub post_id: PostId,
    pub content: String,
}

impl PostEdit {
    pub fn validate(&self, store: &Store, editor: UserId) -> Result<(), FormError> {
        check_author(store, self.post_id, editor)?;
        required(&self.content, "content")
    }
}

/// Only a post's author may edit or delete it.
pub fn check_author(store: &Store, post_id: PostId, user_id: UserId) -> Result<(), FormError> {
    let post = store.post(post_id).ok_or(FormError::UnknownPost(post_id))?;
    if post.user_id == user_id {
        Ok(())
    } else {
        Err(FormError::NotAuthor(post_id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember: bool,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FormError> {
        email(&self.email)?;
        required(&self.password, "password")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), FormError> {
        required(&self.name, "name")?;
        email(&self.email)?;
        required(&self.password, "password")?;
        if self.password == self.password_confirmation {
            Ok(())
        } else {
            Err(FormError::PasswordMismatch)
        }
    }
}
