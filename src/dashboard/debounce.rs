use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::suggestion_list::SuggestionList;
use crate::suggestions::SuggestionApi;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Delays suggestion lookups until typing pauses.
///
/// Each keystroke aborts the pending timer and starts a new one. Once a timer
/// fires its lookup runs to completion, but the result is only shown if no
/// newer term has been typed since.
pub struct SuggestionDebouncer {
    api: Arc<dyn SuggestionApi>,
    list: Arc<Mutex<SuggestionList>>,
    delay: Duration,
    latest: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
}

impl SuggestionDebouncer {
    pub fn new(
        api: Arc<dyn SuggestionApi>,
        list: Arc<Mutex<SuggestionList>>,
        delay: Duration,
    ) -> Self {
        Self {
            api,
            list,
            delay,
            latest: Arc::new(AtomicU64::new(0)),
            pending: None,
        }
    }

    pub fn input(&mut self, term: &str) {
        if let Some(timer) = self.pending.take() {
            timer.abort();
        }

        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let term = term.to_string();
        let api = Arc::clone(&self.api);
        let list = Arc::clone(&self.list);
        let latest = Arc::clone(&self.latest);
        let delay = self.delay;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            // Detached so that later keystrokes cannot cancel a started lookup
            tokio::spawn(async move {
                let results = api.city_suggestions(&term).await;

                let mut list = list.lock().await;
                if latest.load(Ordering::SeqCst) != generation {
                    tracing::debug!(term = %term, "Discarding suggestions for a superseded term");
                    return;
                }
                list.set_results(&term, results);
            });
        }));
    }
}

impl Drop for SuggestionDebouncer {
    fn drop(&mut self) {
        if let Some(timer) = self.pending.take() {
            timer.abort();
        }
    }
}
