//! Simulated request boundary.
//!
//! Every call waits a fixed latency, then validates and answers from the
//! read-only store. Submissions that validate are logged and discarded; the
//! store never changes.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::LatencyConfig;
use crate::forms::{self, FormError, LoginForm, PostEdit, RegisterForm, ReplyDraft, ThreadDraft};
use crate::models::{PostId, Thread, User, UserId};
use crate::query::SearchQuery;
use crate::store::Store;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    Cancelled,
    TimedOut(Duration),
    Invalid(FormError),
    /// The dataset has no user to sign in as.
    NoAccount,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Cancelled => write!(f, "Request cancelled"),
            ApiError::TimedOut(after) => {
                write!(f, "Request timed out after {} ms", after.as_millis())
            }
            ApiError::Invalid(err) => write!(f, "{err}"),
            ApiError::NoAccount => write!(f, "No account is available to sign in"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Invalid(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FormError> for ApiError {
    fn from(err: FormError) -> Self {
        ApiError::Invalid(err)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone)]
pub struct BoardClient {
    store: Arc<Store>,
    latency: LatencyConfig,
}

impl BoardClient {
    pub fn new(store: Arc<Store>, latency: LatencyConfig) -> Self {
        Self { store, latency }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Signs in as the mock current user once the form validates.
    pub async fn login(&self, form: LoginForm, cancel: &CancellationToken) -> ApiResult<User> {
        self.wait("login", self.latency.login_ms, cancel).await?;
        form.validate()?;
        let user = self.store.current_user().ok_or(ApiError::NoAccount)?;
        tracing::info!(email = %form.email, user_id = user.id, "login accepted");
        Ok(user.clone())
    }

    /// Registration never creates a user; it signs in as the mock user.
    pub async fn register(
        &self,
        form: RegisterForm,
        cancel: &CancellationToken,
    ) -> ApiResult<User> {
        self.wait("register", self.latency.register_ms, cancel)
            .await?;
        form.validate()?;
        let user = self.store.current_user().ok_or(ApiError::NoAccount)?;
        tracing::info!(name = %form.name, email = %form.email, "registration discarded");
        Ok(user.clone())
    }

    pub async fn create_thread(
        &self,
        draft: ThreadDraft,
        cancel: &CancellationToken,
    ) -> ApiResult<()> {
        self.wait("create_thread", self.latency.create_thread_ms, cancel)
            .await?;
        draft.validate(&self.store)?;
        tracing::info!(
            title = %draft.title,
            category_id = draft.category_id,
            images = draft.images.len(),
            "thread submission discarded"
        );
        Ok(())
    }

    pub async fn search(
        &self,
        query: SearchQuery,
        cancel: &CancellationToken,
    ) -> ApiResult<Vec<Thread>> {
        self.wait("search", self.latency.search_ms, cancel).await?;
        let results = self.store.search(&query);
        tracing::debug!(
            query = %query.text,
            category_id = ?query.category_id,
            sort = %query.sort_by,
            results = results.len(),
            "search finished"
        );
        Ok(results)
    }

    pub async fn reply(&self, draft: ReplyDraft, cancel: &CancellationToken) -> ApiResult<()> {
        self.wait("reply", self.latency.post_action_ms, cancel)
            .await?;
        draft.validate(&self.store)?;
        tracing::info!(
            thread_id = draft.thread_id,
            reply_to = ?draft.reply_to,
            "reply discarded"
        );
        Ok(())
    }

    pub async fn edit_post(
        &self,
        edit: PostEdit,
        editor: UserId,
        cancel: &CancellationToken,
    ) -> ApiResult<()> {
        self.wait("edit_post", self.latency.post_action_ms, cancel)
            .await?;
        edit.validate(&self.store, editor)?;
        tracing::info!(post_id = edit.post_id, editor, "post edit discarded");
        Ok(())
    }

    pub async fn delete_post(
        &self,
        post_id: PostId,
        user_id: UserId,
        cancel: &CancellationToken,
    ) -> ApiResult<()> {
        self.wait("delete_post", self.latency.post_action_ms, cancel)
            .await?;
        forms::check_author(&self.store, post_id, user_id)?;
        tracing::info!(post_id, user_id, "post deletion discarded");
        Ok(())
    }

    /// Sleeps for the simulated latency, racing cancellation and the
    /// configured timeout.
    async fn wait(&self, op: &'static str, delay_ms: u64, cancel: &CancellationToken) -> ApiResult<()> {
        tracing::debug!(op, delay_ms, "request started");
        let delay = Duration::from_millis(delay_ms);
        let sleep = async {
            tokio::select! {
                biased;
                () = cancel.cancelled() => Err(ApiError::Cancelled),
                () = tokio::time::sleep(delay) => Ok(()),
            }
        };

        let outcome = match self.latency.timeout() {
            Some(limit) => tokio::time::timeout(limit, sleep)
                .await
                .unwrap_or(Err(ApiError::TimedOut(limit))),
            None => sleep.await,
        };
        if let Err(err) = &outcome {
            tracing::debug!(op, error = %err, "request aborted");
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::Instant;

    use super::*;
    use crate::query::SortBy;

    fn client(latency: LatencyConfig) -> BoardClient {
        BoardClient::new(Arc::new(Store::seeded().unwrap()), latency)
    }

    fn login_form() -> LoginForm {
        LoginForm {
            email: "yamada@example.com".to_string(),
            password: "secret".to_string(),
            remember: false,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_honours_latency() {
        let client = client(LatencyConfig::default());
        let start = Instant::now();

        let user = client
            .login(login_form(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(user.id, 1);
        assert!(start.elapsed() >= Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_returns_sorted_results() {
        let client = client(LatencyConfig::default());
        let query = SearchQuery::new("laravel").with_sort(SortBy::Popular);

        let results = client
            .search(query, &CancellationToken::new())
            .await
            .unwrap();

        let ids: Vec<u64> = results.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 1, 4, 5]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_delay() {
        let client = client(LatencyConfig::default());
        let cancel = CancellationToken::new();
        let child = cancel.clone();

        let handle = tokio::spawn(async move {
            client
                .search(SearchQuery::new("laravel"), &child)
                .await
        });
        tokio::time::sleep(Duration::from_millis(100)).await;
        cancel.cancel();

        assert_eq!(handle.await.unwrap(), Err(ApiError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_cancelled_with_zero_delay() {
        let client = client(LatencyConfig::instant());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = client.delete_post(3, 1, &cancel).await;
        assert_eq!(result, Err(ApiError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_bounds_the_call() {
        let client = client(LatencyConfig {
            create_thread_ms: 2000,
            timeout_ms: 500,
            ..LatencyConfig::default()
        });
        let draft = ThreadDraft {
            title: "タイトル".to_string(),
            body: "本文".to_string(),
            category_id: 1,
            images: Vec::new(),
        };

        let result = client.create_thread(draft, &CancellationToken::new()).await;
        assert_eq!(result, Err(ApiError::TimedOut(Duration::from_millis(500))));
    }

    #[tokio::test]
    async fn test_reply_on_locked_thread_is_rejected() {
        let client = client(LatencyConfig::instant());
        let draft = ReplyDraft {
            thread_id: 5,
            content: "確認しました".to_string(),
            reply_to: None,
        };

        let err = client
            .reply(draft, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Invalid(FormError::ThreadLocked(5)));
        assert_eq!(err.to_string(), "thread 5 is locked");
    }

    #[tokio::test]
    async fn test_submissions_do_not_change_store() {
        let client = client(LatencyConfig::instant());
        let cancel = CancellationToken::new();
        let before = client.store().stats();

        client
            .reply(
                ReplyDraft {
                    thread_id: 1,
                    content: "参考になりました".to_string(),
                    reply_to: Some(1),
                },
                &cancel,
            )
            .await
            .unwrap();
        client.delete_post(3, 1, &cancel).await.unwrap();
        client
            .edit_post(
                PostEdit {
                    post_id: 5,
                    content: "修正".to_string(),
                },
                1,
                &cancel,
            )
            .await
            .unwrap();

        assert_eq!(client.store().stats(), before);
        assert_eq!(client.store().posts_for_thread(1).len(), 3);
    }

    #[tokio::test]
    async fn test_register_validates_confirmation() {
        let client = client(LatencyConfig::instant());
        let form = RegisterForm {
            name: "新規ユーザー".to_string(),
            email: "new@example.com".to_string(),
            password: "pw".to_string(),
            password_confirmation: "other".to_string(),
        };

        let err = client
            .register(form, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Invalid(FormError::PasswordMismatch));
    }

    #[tokio::test]
    async fn test_delete_unknown_post() {
        let client = client(LatencyConfig::instant());
        let err = client
            .delete_post(404, 1, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Invalid(FormError::UnknownPost(404)));
    }

    #[tokio::test]
    async fn test_delete_someone_elses_post() {
        let client = client(LatencyConfig::instant());
        let err = client
            .delete_post(1, 1, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Invalid(FormError::NotAuthor(1)));
    }
}
