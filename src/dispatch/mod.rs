//! Query dispatcher
//!
//! Entry point for the host. Live input goes through the debounce
//! controller and either resolves in instant mode, returns a pending
//! placeholder while a requery timer is armed, or takes the clipboard and
//! history shortcuts. Settled input always resolves in settled mode.

use crate::aggregate::{AggregationEngine, Mode};
use crate::config::Settings;
use crate::debounce::{Decision, DebounceController, PendingCheck, Recheck};
use crate::host::{ClipboardAccess, Clock, LogSpeech, MonotonicClock, RequeryHost, SpeechOutput};
use crate::lookup::LookupBackend;
use crate::query::RawQuery;
use crate::results::{EntryKind, ResultEntry};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Secondary actions offered for a selected entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextAction {
    /// Put the entry's subtitle on the clipboard
    CopySubtitle,
    /// Read the entry's title aloud
    Read,
}

/// Receives raw input from the host and returns result lists
pub struct QueryDispatcher {
    debounce: Arc<DebounceController>,
    engine: AggregationEngine,
    backend: LookupBackend,
    host: Arc<dyn RequeryHost>,
    clipboard: Arc<dyn ClipboardAccess>,
    speech: Arc<dyn SpeechOutput>,
    clock: Arc<dyn Clock>,
    enable_auto_read: bool,
    debug: bool,
    live_calls: AtomicU64,
}

impl QueryDispatcher {
    /// Create a dispatcher over `backend`, configured from `settings`.
    ///
    /// Speech output defaults to [`LogSpeech`] and the clock to
    /// [`MonotonicClock`].
    pub fn new(
        backend: LookupBackend,
        settings: &Settings,
        host: Arc<dyn RequeryHost>,
        clipboard: Arc<dyn ClipboardAccess>,
    ) -> Self {
        let engine =
            AggregationEngine::from_settings(backend.lookup(), clipboard.clone(), &settings.query);
        let debounce = DebounceController::new(
            settings.query.settle_interval(),
            settings.query.requery_delay(),
        );

        Self {
            debounce: Arc::new(debounce),
            engine,
            backend,
            host,
            clipboard,
            speech: Arc::new(LogSpeech),
            clock: Arc::new(MonotonicClock::new()),
            enable_auto_read: settings.query.enable_auto_read,
            debug: settings.general.debug,
            live_calls: AtomicU64::new(0),
        }
    }

    pub fn with_speech(mut self, speech: Arc<dyn SpeechOutput>) -> Self {
        self.speech = speech;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn engine(&self) -> &AggregationEngine {
        &self.engine
    }

    pub fn debounce(&self) -> &DebounceController {
        &self.debounce
    }

    pub fn backend(&self) -> &LookupBackend {
        &self.backend
    }

    /// Handle one keystroke's worth of input
    pub async fn handle_live_input(&self, text: &str) -> Vec<ResultEntry> {
        self.live_calls.fetch_add(1, Ordering::Relaxed);

        if !self.backend.ensure_ready() {
            return vec![ResultEntry::initializing()];
        }

        let raw = RawQuery::new(text, self.clock.now_millis());
        let mut results = match self.debounce.observe(&raw) {
            Decision::Fire => {
                self.engine.metrics().inc_fired();
                self.engine.resolve(&raw.normalize(), Mode::Instant).await
            }
            Decision::Delay(pending) => {
                self.arm_requery(pending);
                vec![ResultEntry::pending(text)]
            }
            Decision::Suppress => Vec::new(),
            Decision::ClipboardOrHistory => return self.engine.clipboard_or_history().await,
            Decision::HistoryRequest => return self.engine.history(),
        };

        self.append_debug(&mut results, &raw);
        results
    }

    /// Handle input the host already considers settled
    pub async fn handle_settled_input(&self, text: &str) -> Vec<ResultEntry> {
        if !self.backend.ensure_ready() {
            return vec![ResultEntry::initializing()];
        }

        let raw = RawQuery::new(text, self.clock.now_millis());
        self.debounce.mark_fired(&raw);

        let query = raw.normalize();
        let mut results = self.engine.resolve(&query, Mode::Settled).await;

        // Clipboard and history results stand alone
        if !query.is_translatable() {
            return results;
        }
        self.engine.metrics().inc_fired();

        if self.enable_auto_read {
            if let Some(first) = results.first() {
                self.speech.read(&first.title);
            }
        }

        self.append_debug(&mut results, &raw);
        results.push(ResultEntry::raw_query(query.text));
        results
    }

    /// Actions available for a selected entry
    pub fn context_actions(&self, entry: &ResultEntry) -> Vec<ContextAction> {
        if entry.is_placeholder() || entry.kind == EntryKind::Diagnostic {
            return Vec::new();
        }

        let mut actions = Vec::with_capacity(2);
        if !entry.subtitle.is_empty() {
            actions.push(ContextAction::CopySubtitle);
        }
        actions.push(ContextAction::Read);
        actions
    }

    pub fn execute_action(&self, action: ContextAction, entry: &ResultEntry) {
        match action {
            ContextAction::CopySubtitle => self.clipboard.write_text(&entry.subtitle),
            ContextAction::Read => self.speech.read(&entry.title),
        }
    }

    /// Default action for a chosen entry: copy its text
    pub fn activate(&self, entry: &ResultEntry) {
        if !entry.is_placeholder() {
            self.clipboard.write_text(entry.copy_text());
        }
    }

    fn arm_requery(&self, pending: PendingCheck) {
        let debounce = self.debounce.clone();
        let host = self.host.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = pending.token.cancelled() => {
                    debug!("Requery timer for '{}' cancelled", pending.text);
                }
                _ = tokio::time::sleep(pending.delay) => {
                    if let Recheck::Requery(text) = debounce.recheck(&pending) {
                        debug!("Requesting requery for '{}'", text);
                        host.request_requery(&text);
                    }
                }
            }
        });
    }

    fn append_debug(&self, results: &mut Vec<ResultEntry>, raw: &RawQuery) {
        let query = raw.normalize();
        if !self.debug || !query.is_translatable() {
            return;
        }

        let counts = format!(
            "{},{}",
            self.live_calls.load(Ordering::Relaxed),
            self.engine.metrics().get_fired()
        );
        results.push(
            ResultEntry::new(counts, self.debounce.baseline()).with_kind(EntryKind::Diagnostic),
        );
        results.push(
            ResultEntry::new(query.text, format!("[{}]", raw.text))
                .with_kind(EntryKind::Diagnostic),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{ManualClock, MemoryClipboard, RecordingHost, RecordingSpeech};
    use crate::lookup::mock::MockLookup;
    use crate::results::RAW_QUERY_SUBTITLE;
    use std::time::Duration;

    struct Harness {
        dispatcher: QueryDispatcher,
        mock: Arc<MockLookup>,
        host: Arc<RecordingHost>,
        clock: Arc<ManualClock>,
        clipboard: Arc<MemoryClipboard>,
        speech: Arc<RecordingSpeech>,
    }

    impl Harness {
        fn new(mock: MockLookup, settings: Settings) -> Self {
            let mock = Arc::new(mock);
            let host = Arc::new(RecordingHost::new());
            let clock = Arc::new(ManualClock::new(0));
            let clipboard = Arc::new(MemoryClipboard::new());
            let speech = Arc::new(RecordingSpeech::new());

            let dispatcher = QueryDispatcher::new(
                LookupBackend::new(mock.clone()),
                &settings,
                host.clone(),
                clipboard.clone(),
            )
            .with_clock(clock.clone())
            .with_speech(speech.clone());

            Self {
                dispatcher,
                mock,
                host,
                clock,
                clipboard,
                speech,
            }
        }

        /// A harness whose backend has finished initializing
        async fn ready(settings: Settings) -> Self {
            let harness = Self::new(MockLookup::new(), settings);
            harness.dispatcher.backend().ensure_ready();
            tokio::time::sleep(Duration::from_millis(1)).await;
            assert!(harness.dispatcher.backend().is_ready());
            harness
        }

        /// Advance both the dispatcher clock and tokio time
        async fn advance(&self, millis: u64) {
            self.clock.advance(millis);
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
    }

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.query.cache_ttl_secs = 0;
        settings
    }

    #[tokio::test(start_paused = true)]
    async fn test_uninitialized_backend_returns_placeholder() {
        let harness = Harness::new(
            MockLookup::new().with_init_delay(Duration::from_millis(100)),
            settings(),
        );

        let first = harness.dispatcher.handle_live_input("hello").await;
        let second = harness.dispatcher.handle_settled_input("hello").await;
        assert_eq!(first, vec![ResultEntry::initializing()]);
        assert_eq!(second, vec![ResultEntry::initializing()]);

        tokio::time::sleep(Duration::from_millis(150)).await;

        let results = harness.dispatcher.handle_settled_input("hello").await;
        assert!(results[0].is_primary());
        assert_eq!(harness.mock.init_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_then_pause_fires_once() {
        let harness = Harness::ready(settings()).await;
        let dispatcher = &harness.dispatcher;

        let results = dispatcher.handle_live_input("he").await;
        assert_eq!(results, vec![ResultEntry::pending("he")]);

        harness.advance(50).await;
        dispatcher.handle_live_input("hell").await;
        harness.advance(70).await;
        let results = dispatcher.handle_live_input("hello").await;
        assert!(results[0].is_placeholder());

        harness.advance(330).await;
        let results = dispatcher.handle_live_input("hello").await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "[zh-CHS] hello");
        assert_eq!(harness.mock.translated_texts(), vec!["hello"]);
        assert_eq!(dispatcher.engine().metrics().get_fired(), 1);

        harness.advance(1000).await;
        assert!(harness.host.requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_paused_input_requests_requery() {
        let harness = Harness::ready(settings()).await;

        harness.dispatcher.handle_live_input("hello").await;
        harness.advance(499).await;
        assert!(harness.host.requests().is_empty());

        harness.advance(2).await;
        assert_eq!(harness.host.requests(), vec!["hello"]);
        assert_eq!(harness.mock.translate_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_timer_does_not_requery() {
        let harness = Harness::ready(settings()).await;

        harness.dispatcher.handle_live_input("hel").await;
        harness.advance(100).await;
        harness.dispatcher.handle_live_input("hello").await;
        harness.advance(1000).await;

        assert_eq!(harness.host.requests(), vec!["hello"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clearing_input_cancels_requery() {
        let harness = Harness::ready(settings()).await;

        harness.dispatcher.handle_live_input("hello").await;
        harness.advance(100).await;
        harness.dispatcher.handle_live_input("").await;
        harness.advance(1000).await;

        assert!(harness.host.requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_settled_input_appends_trailer_and_records_history() {
        let harness = Harness::ready(settings()).await;

        harness.dispatcher.handle_live_input("hello").await;
        harness.advance(100).await;
        let results = harness.dispatcher.handle_settled_input("hello").await;

        let trailer = results.last().unwrap();
        assert_eq!(trailer.title, "hello");
        assert_eq!(trailer.subtitle, RAW_QUERY_SUBTITLE);
        assert_eq!(results.len(), 5);
        assert_eq!(harness.dispatcher.engine().history_store().len(), 1);

        // The settled lookup supersedes the pending requery
        harness.advance(1000).await;
        assert!(harness.host.requests().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_history_token_bypasses_lookups() {
        let harness = Harness::ready(settings()).await;
        harness.dispatcher.handle_settled_input("hello").await;

        let results = harness.dispatcher.handle_live_input("h").await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind, EntryKind::History);
        assert_eq!(harness.mock.translate_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settled_history_token_returns_history_only() {
        let mut settings = settings();
        settings.general.debug = true;
        let harness = Harness::ready(settings).await;
        harness.dispatcher.handle_settled_input("hello").await;
        let translate_calls = harness.mock.translate_calls();
        let suggest_calls = harness.mock.suggest_calls();

        let results = harness.dispatcher.handle_settled_input("h").await;

        assert_eq!(results.len(), 1);
        assert!(results.iter().all(|e| e.kind == EntryKind::History));
        assert_eq!(results[0].title, "[zh-CHS] hello");
        assert_eq!(harness.mock.translate_calls(), translate_calls);
        assert_eq!(harness.mock.suggest_calls(), suggest_calls);

        // Empty settled input with nothing to translate shows history alone
        let results = harness.dispatcher.handle_settled_input("").await;
        assert!(results.iter().all(|e| e.kind == EntryKind::History));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_live_input_translates_clipboard() {
        let harness = Harness::ready(settings()).await;
        harness.clipboard.write_text("bonjour");

        let results = harness.dispatcher.handle_live_input("").await;

        assert_eq!(harness.mock.translated_texts(), vec!["bonjour"]);
        assert!(results
            .iter()
            .all(|e| e.trans_type.as_deref() == Some("clipboard")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_read_speaks_first_title() {
        let mut settings = settings();
        settings.query.enable_auto_read = true;
        let harness = Harness::ready(settings).await;

        harness.dispatcher.handle_settled_input("hello").await;
        assert_eq!(harness.speech.spoken(), vec!["[zh-CHS] hello"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debug_entries() {
        let mut settings = settings();
        settings.general.debug = true;
        let harness = Harness::ready(settings).await;

        let results = harness.dispatcher.handle_live_input(" hello ").await;

        let n = results.len();
        assert_eq!(results[n - 2].title, "1,0");
        assert_eq!(results[n - 2].subtitle, " hello ");
        assert_eq!(results[n - 1].title, "hello");
        assert_eq!(results[n - 1].subtitle, "[ hello ]");
        assert!(results[n - 2..].iter().all(|e| e.kind == EntryKind::Diagnostic));
    }

    #[tokio::test(start_paused = true)]
    async fn test_context_actions() {
        let harness = Harness::ready(settings()).await;
        let entry = ResultEntry::new("bonjour", "hello [fr]").with_copy_target("bonjour");

        let actions = harness.dispatcher.context_actions(&entry);
        assert_eq!(actions, vec![ContextAction::CopySubtitle, ContextAction::Read]);
        assert!(harness
            .dispatcher
            .context_actions(&ResultEntry::pending("he"))
            .is_empty());

        for action in actions {
            harness.dispatcher.execute_action(action, &entry);
        }
        assert_eq!(harness.clipboard.read_text().as_deref(), Some("hello [fr]"));
        assert_eq!(harness.speech.spoken(), vec!["bonjour"]);

        harness.dispatcher.activate(&entry);
        assert_eq!(harness.clipboard.read_text().as_deref(), Some("bonjour"));
    }
}
