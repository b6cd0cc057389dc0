//! Effect runtime.
//!
//! Owns the reducer state, the client and one cancellation token per
//! in-flight request. Requests run as tokio tasks and report back through an
//! inbox channel; `settle` feeds completions into the reducer until nothing
//! is left in flight.

use std::collections::HashMap;

use bbs_core::client::BoardClient;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::effects::UiEffect;
use crate::events::{Outcome, UiEvent};
use crate::request::RequestId;
use crate::state::AppState;
use crate::update;

pub struct Runtime {
    state: AppState,
    client: BoardClient,
    inbox_tx: mpsc::UnboundedSender<UiEvent>,
    inbox_rx: mpsc::UnboundedReceiver<UiEvent>,
    tokens: HashMap<RequestId, CancellationToken>,
}

impl Runtime {
    pub fn new(client: BoardClient) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::new(),
            client,
            inbox_tx,
            inbox_rx,
            tokens: HashMap::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn client(&self) -> &BoardClient {
        &self.client
    }

    /// Number of spawned requests whose completion has not been received.
    pub fn in_flight(&self) -> usize {
        self.tokens.len()
    }

    /// Runs one event through the reducer and executes its effects.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&mut self, event: UiEvent) {
        let effects = update::update(&mut self.state, event);
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Waits for every in-flight request, dispatching each completion.
    pub async fn settle(&mut self) {
        while !self.tokens.is_empty() {
            let Some(event) = self.inbox_rx.recv().await else {
                break;
            };
            if let UiEvent::Completed { id, .. } = &event {
                self.tokens.remove(id);
            }
            self.dispatch(event);
        }
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                for token in self.tokens.values() {
                    token.cancel();
                }
            }
            UiEffect::Cancel { id } => {
                if let Some(token) = self.tokens.get(&id) {
                    tracing::debug!(?id, "cancelling request");
                    token.cancel();
                }
            }
            UiEffect::Login { id, form } => self.spawn_request(id, |client, cancel| async move {
                Outcome::Login(client.login(form, &cancel).await)
            }),
            UiEffect::Register { id, form } => {
                self.spawn_request(id, |client, cancel| async move {
                    Outcome::Register(client.register(form, &cancel).await)
                });
            }
            UiEffect::CreateThread { id, draft } => {
                self.spawn_request(id, |client, cancel| async move {
                    Outcome::CreateThread(client.create_thread(draft, &cancel).await)
                });
            }
            UiEffect::Search { id, query } => self.spawn_request(id, |client, cancel| async move {
                Outcome::Search(client.search(query, &cancel).await)
            }),
            UiEffect::Reply { id, draft } => self.spawn_request(id, |client, cancel| async move {
                Outcome::Reply(client.reply(draft, &cancel).await)
            }),
            UiEffect::EditPost { id, edit, editor } => {
                self.spawn_request(id, move |client, cancel| async move {
                    Outcome::Edit(client.edit_post(edit, editor, &cancel).await)
                });
            }
            UiEffect::DeletePost {
                id,
                post_id,
                user_id,
            } => self.spawn_request(id, move |client, cancel| async move {
                Outcome::Delete(client.delete_post(post_id, user_id, &cancel).await)
            }),
        }
    }

    /// Spawns a request with its own token and reports the outcome as
    /// `UiEvent::Completed`.
    fn spawn_request<F, Fut>(&mut self, id: RequestId, f: F)
    where
        F: FnOnce(BoardClient, CancellationToken) -> Fut,
        Fut: Future<Output = Outcome> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        self.tokens.insert(id, cancel.clone());
        let tx = self.inbox_tx.clone();
        let fut = f(self.client.clone(), cancel);
        tokio::spawn(async move {
            let outcome = fut.await;
            let _ = tx.send(UiEvent::Completed { id, outcome });
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use bbs_core::config::LatencyConfig;
    use bbs_core::forms::LoginForm;
    use bbs_core::store::Store;

    use super::*;
    use crate::events::{NavEvent, SearchEvent, SubmitEvent};
    use crate::state::{Notice, Page};

    fn runtime(latency: LatencyConfig) -> Runtime {
        let store = Arc::new(Store::seeded().unwrap());
        Runtime::new(BoardClient::new(store, latency))
    }

    fn ids(runtime: &Runtime) -> Vec<u64> {
        runtime.state().search.results.iter().map(|t| t.id).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_header_search_settles_with_results() {
        let mut rt = runtime(LatencyConfig::default());
        rt.dispatch(UiEvent::Search(SearchEvent::Header("laravel".to_string())));
        assert_eq!(rt.in_flight(), 1);

        rt.settle().await;

        assert_eq!(rt.state().page, Page::Search);
        assert_eq!(ids(&rt), vec![5, 4, 2, 1]);
        assert!(!rt.state().is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_search_result_is_discarded() {
        let mut rt = runtime(LatencyConfig::default());
        rt.dispatch(UiEvent::Search(SearchEvent::Header("laravel".to_string())));
        tokio::time::sleep(Duration::from_millis(100)).await;
        rt.dispatch(UiEvent::Search(SearchEvent::SetText("Eloquent".to_string())));
        rt.dispatch(UiEvent::Search(SearchEvent::Submit));
        assert_eq!(rt.in_flight(), 2);

        rt.settle().await;

        assert_eq!(ids(&rt), vec![3]);
        assert_eq!(rt.in_flight(), 0);
        assert_eq!(rt.state().notice, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_through_runtime() {
        let mut rt = runtime(LatencyConfig::default());
        rt.dispatch(UiEvent::Nav(NavEvent::Login));
        rt.dispatch(UiEvent::Submit(SubmitEvent::Login(LoginForm {
            email: "yamada@example.com".to_string(),
            password: "secret".to_string(),
            remember: true,
        })));
        assert!(rt.state().is_loading());

        rt.settle().await;

        assert_eq!(rt.state().user, Some(1));
        assert_eq!(rt.state().page, Page::Home);
    }

    #[tokio::test]
    async fn test_delete_other_users_post_sets_error_notice() {
        let mut rt = runtime(LatencyConfig::instant());
        rt.dispatch(UiEvent::Submit(SubmitEvent::Login(LoginForm {
            email: "yamada@example.com".to_string(),
            password: "secret".to_string(),
            remember: false,
        })));
        rt.settle().await;
        rt.dispatch(UiEvent::Nav(NavEvent::OpenThread(1)));

        rt.dispatch(UiEvent::Submit(SubmitEvent::Delete(1)));
        rt.settle().await;

        assert_eq!(
            rt.state().notice,
            Some(Notice::Error("post 1 belongs to another user".to_string()))
        );
        assert_eq!(rt.state().page, Page::ThreadDetail { thread_id: 1 });
    }
}
