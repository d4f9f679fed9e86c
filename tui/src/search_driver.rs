use std::sync::Arc;
use std::time::Duration;

use spotlight_core::Commit;
use spotlight_core::DebounceToken;
use spotlight_core::SearchProvider;
use tokio::task::JoinHandle;

use crate::app_event::AppEvent;
use crate::app_event_sender::AppEventSender;

/// Timer and IO half of the query pipeline: owns the one pending debounce
/// sleep and dispatches committed fetches to the search provider. State
/// transitions stay in `spotlight_core`; everything here just reports back
/// through the app event channel.
pub(crate) struct SearchDriver {
    provider: Arc<dyn SearchProvider>,
    debounce: Duration,
    app_event_tx: AppEventSender,
    pending_debounce: Option<JoinHandle<()>>,
}

impl SearchDriver {
    pub(crate) fn new(
        provider: Arc<dyn SearchProvider>,
        debounce: Duration,
        app_event_tx: AppEventSender,
    ) -> Self {
        Self {
            provider,
            debounce,
            app_event_tx,
            pending_debounce: None,
        }
    }

    /// Arms the debounce sleep for a fresh keystroke token. The previously
    /// armed sleep is aborted so at most one is ever pending; the session
    /// additionally ignores stale tokens, so a late fire is harmless.
    pub(crate) fn arm_debounce(&mut self, token: DebounceToken) {
        if let Some(handle) = self.pending_debounce.take() {
            handle.abort();
        }
        let tx = self.app_event_tx.clone();
        let debounce = self.debounce;
        self.pending_debounce = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            tx.send(AppEvent::DebounceElapsed(token));
        }));
    }

    /// Acts on a committed query: fetches, or nothing (a clear needs no
    /// IO). Responses echo `seq`; the session discards stale ones, so an
    /// in-flight call superseded by a newer commit needs no cancellation.
    pub(crate) fn on_commit(&self, commit: Commit) {
        match commit {
            Commit::Cleared => {}
            Commit::Fetch { query, seq } => {
                let provider = self.provider.clone();
                let tx = self.app_event_tx.clone();
                tokio::spawn(async move {
                    tracing::debug!(seq, %query, "dispatching search");
                    match provider.search(&query).await {
                        Ok(hits) => tx.send(AppEvent::SearchResult { seq, query, hits }),
                        Err(err) => tx.send(AppEvent::SearchFailed {
                            seq,
                            query,
                            message: err.to_string(),
                        }),
                    }
                });
            }
        }
    }
}
