//! In-memory fakes shared by the unit tests.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use loanchat_common::{ClientError, SessionToken};

use crate::dispatch::UiEffect;
use crate::retrieve::DocumentHost;
use crate::session::{Renderer, UploadStatus};
use crate::turn::{ActionCode, StageCode, TurnResult};
use crate::upload::UploadCandidate;
use crate::ConversationBackend;

pub(crate) fn reply(text: &str) -> TurnResult {
    TurnResult {
        response_text: text.to_string(),
        action: None,
        stage: StageCode::Active,
        pdf_available: false,
        pdf_path: None,
    }
}

pub(crate) fn reply_with(
    text: &str,
    action: Option<ActionCode>,
    stage: StageCode,
    pdf_path: Option<&str>,
) -> TurnResult {
    TurnResult {
        response_text: text.to_string(),
        action,
        stage,
        pdf_available: pdf_path.is_some(),
        pdf_path: pdf_path.map(String::from),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Start(SessionToken),
    Message(SessionToken, String),
    Upload(SessionToken, String),
    Reset(SessionToken),
}

pub(crate) struct FakeBackend {
    turns: Mutex<VecDeque<Result<TurnResult, ClientError>>>,
    calls: Mutex<Vec<Call>>,
    reset_error: Option<ClientError>,
    document: Result<Vec<u8>, ClientError>,
    fetches: AtomicUsize,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        Self {
            turns: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            reset_error: None,
            document: Err(ClientError::http(404, "NOT FOUND")),
            fetches: AtomicUsize::new(0),
            gate: Mutex::new(None),
        }
    }

    /// Queue the result of the next start/message/upload call.
    pub(crate) fn with_turn(self, result: Result<TurnResult, ClientError>) -> Self {
        self.turns.lock().unwrap().push_back(result);
        self
    }

    /// Put the reply to `start` ahead of anything already queued.
    pub(crate) fn with_greeting(self, text: &str) -> Self {
        self.turns.lock().unwrap().push_front(Ok(reply(text)));
        self
    }

    pub(crate) fn with_document(mut self, bytes: Vec<u8>) -> Self {
        self.document = Ok(bytes);
        self
    }

    pub(crate) fn with_fetch_error(mut self, err: ClientError) -> Self {
        self.document = Err(err);
        self
    }

    pub(crate) fn with_reset_error(mut self, err: ClientError) -> Self {
        self.reset_error = Some(err);
        self
    }

    /// Hold the next message or upload until the returned sender fires.
    pub(crate) fn gated(self) -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        *self.gate.lock().unwrap() = Some(rx);
        (self, tx)
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn next_turn(&self) -> Result<TurnResult, ClientError> {
        self.turns
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(reply("ok")))
    }

    async fn wait_for_gate(&self) {
        let gate = self.gate.lock().unwrap().take();
        if let Some(rx) = gate {
            let _ = rx.await;
        }
    }
}

#[async_trait]
impl ConversationBackend for FakeBackend {
    async fn start(&self, token: &SessionToken) -> Result<TurnResult, ClientError> {
        self.calls.lock().unwrap().push(Call::Start(token.clone()));
        self.next_turn()
    }

    async fn send_message(
        &self,
        token: &SessionToken,
        text: &str,
    ) -> Result<TurnResult, ClientError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Message(token.clone(), text.to_string()));
        self.wait_for_gate().await;
        self.next_turn()
    }

    async fn send_file(
        &self,
        candidate: &UploadCandidate,
        _bytes: Vec<u8>,
    ) -> Result<TurnResult, ClientError> {
        self.calls.lock().unwrap().push(Call::Upload(
            candidate.session_token.clone(),
            candidate.name.clone(),
        ));
        self.wait_for_gate().await;
        self.next_turn()
    }

    async fn reset(&self, token: &SessionToken) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push(Call::Reset(token.clone()));
        match &self.reset_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn fetch_document(&self, _url: &str) -> Result<Vec<u8>, ClientError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.document.clone()
    }

    fn api_base(&self) -> &str {
        "http://localhost:5002/api"
    }
}

pub(crate) struct FakeHost {
    allow_navigation: bool,
    fail_saves: bool,
    opened: Mutex<Vec<String>>,
    saved: Mutex<Vec<(String, Vec<u8>)>>,
}

impl FakeHost {
    pub(crate) fn allowing_navigation() -> Self {
        Self {
            allow_navigation: true,
            fail_saves: false,
            opened: Mutex::new(Vec::new()),
            saved: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn blocking_navigation() -> Self {
        Self {
            allow_navigation: false,
            ..Self::allowing_navigation()
        }
    }

    pub(crate) fn failing_saves(mut self) -> Self {
        self.fail_saves = true;
        self
    }

    pub(crate) fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    pub(crate) fn saved(&self) -> Vec<(String, Vec<u8>)> {
        self.saved.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentHost for FakeHost {
    async fn open_in_new_context(&self, url: &str) -> bool {
        if self.allow_navigation {
            self.opened.lock().unwrap().push(url.to_string());
        }
        self.allow_navigation
    }

    async fn save_file(&self, filename: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        if self.fail_saves {
            return Err(std::io::Error::other("disk full"));
        }
        self.saved
            .lock()
            .unwrap()
            .push((filename.to_string(), bytes.to_vec()));
        Ok(PathBuf::from("/saved").join(filename))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Rendered {
    User(String),
    Bot(String),
    Notice(String),
    Typing(bool),
    Upload(UploadStatus),
    Effect(UiEffect),
    Cleared,
}

#[derive(Default)]
pub(crate) struct RecordingRenderer {
    events: Mutex<Vec<Rendered>>,
}

impl RecordingRenderer {
    pub(crate) fn events(&self) -> Vec<Rendered> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn clear_events(&self) {
        self.events.lock().unwrap().clear();
    }

    fn push(&self, event: Rendered) {
        self.events.lock().unwrap().push(event);
    }
}

impl Renderer for RecordingRenderer {
    fn user_message(&self, text: &str) {
        self.push(Rendered::User(text.to_string()));
    }

    fn bot_message(&self, text: &str) {
        self.push(Rendered::Bot(text.to_string()));
    }

    fn notice(&self, text: &str) {
        self.push(Rendered::Notice(text.to_string()));
    }

    fn set_typing(&self, visible: bool) {
        self.push(Rendered::Typing(visible));
    }

    fn upload_status(&self, status: UploadStatus) {
        self.push(Rendered::Upload(status));
    }

    fn apply(&self, effect: &UiEffect) {
        self.push(Rendered::Effect(effect.clone()));
    }

    fn clear_transcript(&self) {
        self.push(Rendered::Cleared);
    }
}
