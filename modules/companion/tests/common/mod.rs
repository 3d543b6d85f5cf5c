//! Shared fakes for the integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;
use url::Url;

use companion::contract::model::UsageRecord;
use companion::domain::error::DomainError;
use companion::domain::events::CompanionEvent;
use companion::domain::ports::{
    AudioSample, Clock, DocumentStore, EventPublisher, GenerativeModel, RenderedPrompt,
    VoiceCloner,
};
use companion::domain::repo::UsageRepository;
use companion::domain::service::{Ports, Service, ServiceConfig};
use companion::infra::storage::{
    DocumentJournalRepository, DocumentProfileRepository, DocumentUsageRepository,
    InMemoryDocumentStore, InMemoryObjectStorage,
};

pub struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> Arc<Self> {
        Arc::new(Self(Mutex::new(
            Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap(),
        )))
    }

    pub fn advance(&self, by: Duration) {
        *self.0.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock()
    }
}

#[derive(Default)]
pub struct RecordingEvents(Mutex<Vec<CompanionEvent>>);

impl RecordingEvents {
    pub fn all(&self) -> Vec<CompanionEvent> {
        self.0.lock().clone()
    }
}

impl EventPublisher<CompanionEvent> for RecordingEvents {
    fn publish(&self, event: &CompanionEvent) {
        self.0.lock().push(event.clone());
    }
}

/// Answers prompts from a queue; `Err` strings become upstream failures.
#[derive(Default)]
pub struct ScriptedModel {
    answers: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<RenderedPrompt>>,
}

impl ScriptedModel {
    pub fn answer(&self, raw: impl Into<String>) {
        self.answers.lock().push_back(Ok(raw.into()));
    }

    pub fn fail(&self, message: impl Into<String>) {
        self.answers.lock().push_back(Err(message.into()));
    }

    pub fn prompts(&self) -> Vec<RenderedPrompt> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate(&self, prompt: &RenderedPrompt) -> Result<String, DomainError> {
        self.prompts.lock().push(prompt.clone());
        match self.answers.lock().pop_front() {
            Some(Ok(raw)) => Ok(raw),
            Some(Err(message)) => Err(DomainError::upstream("generative_model", message)),
            None => Err(DomainError::upstream("generative_model", "no scripted answer")),
        }
    }
}

pub struct FakeVoice {
    pub result: Mutex<Result<String, String>>,
    pub calls: Mutex<Vec<(String, AudioSample)>>,
}

impl Default for FakeVoice {
    fn default() -> Self {
        Self {
            result: Mutex::new(Ok("voice-123".to_string())),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl VoiceCloner for FakeVoice {
    async fn clone_voice(&self, name: &str, sample: AudioSample) -> Result<String, DomainError> {
        self.calls.lock().push((name.to_string(), sample));
        self.result
            .lock()
            .clone()
            .map_err(|m| DomainError::upstream("voice_cloning", m))
    }
}

/// Usage store that can be told to fail reads or writes.
pub struct FlakyUsageRepo {
    pub inner: DocumentUsageRepository,
    pub fail_reads: Mutex<bool>,
    pub fail_writes: Mutex<bool>,
}

#[async_trait]
impl UsageRepository for FlakyUsageRepo {
    async fn load(&self, user_id: &str) -> anyhow::Result<Option<UsageRecord>> {
        if *self.fail_reads.lock() {
            anyhow::bail!("usage backend unavailable");
        }
        self.inner.load(user_id).await
    }

    async fn store(&self, user_id: &str, record: &UsageRecord) -> anyhow::Result<()> {
        if *self.fail_writes.lock() {
            anyhow::bail!("usage backend unavailable");
        }
        self.inner.store(user_id, record).await
    }
}

/// Store whose every call fails.
pub struct BrokenStore;

#[async_trait]
impl DocumentStore for BrokenStore {
    async fn insert(
        &self,
        _c: &str,
        _id: &str,
        _doc: companion::domain::ports::Document,
    ) -> anyhow::Result<()> {
        anyhow::bail!("store offline")
    }

    async fn get(
        &self,
        _c: &str,
        _id: &str,
    ) -> anyhow::Result<Option<companion::domain::ports::Document>> {
        anyhow::bail!("store offline")
    }

    async fn set(
        &self,
        _c: &str,
        _id: &str,
        _doc: companion::domain::ports::Document,
        _merge: bool,
    ) -> anyhow::Result<()> {
        anyhow::bail!("store offline")
    }

    async fn query(
        &self,
        _q: &companion::domain::ports::Query,
    ) -> anyhow::Result<Vec<companion::domain::ports::DocumentSnapshot>> {
        anyhow::bail!("store offline")
    }
}

/// In-memory store that counts every call made to it.
#[derive(Default)]
pub struct CountingStore {
    inner: InMemoryDocumentStore,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for CountingStore {
    async fn insert(
        &self,
        c: &str,
        id: &str,
        doc: companion::domain::ports::Document,
    ) -> anyhow::Result<()> {
        self.hit();
        self.inner.insert(c, id, doc).await
    }

    async fn get(
        &self,
        c: &str,
        id: &str,
    ) -> anyhow::Result<Option<companion::domain::ports::Document>> {
        self.hit();
        self.inner.get(c, id).await
    }

    async fn set(
        &self,
        c: &str,
        id: &str,
        doc: companion::domain::ports::Document,
        merge: bool,
    ) -> anyhow::Result<()> {
        self.hit();
        self.inner.set(c, id, doc, merge).await
    }

    async fn query(
        &self,
        q: &companion::domain::ports::Query,
    ) -> anyhow::Result<Vec<companion::domain::ports::DocumentSnapshot>> {
        self.hit();
        self.inner.query(q).await
    }
}

pub struct Harness {
    pub service: Arc<Service>,
    pub docs: Arc<InMemoryDocumentStore>,
    pub storage: Arc<InMemoryObjectStorage>,
    pub usage: Arc<FlakyUsageRepo>,
    pub clock: Arc<ManualClock>,
    pub events: Arc<RecordingEvents>,
    pub model: Arc<ScriptedModel>,
    pub voice: Arc<FakeVoice>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(ServiceConfig::default())
    }

    pub fn with_config(config: ServiceConfig) -> Self {
        Self::build(config, None)
    }

    /// Journal and profile repositories backed by `store` instead of memory.
    pub fn with_document_store(store: Arc<dyn DocumentStore>) -> Self {
        Self::build(ServiceConfig::default(), Some(store))
    }

    fn build(config: ServiceConfig, store: Option<Arc<dyn DocumentStore>>) -> Self {
        let docs = Arc::new(InMemoryDocumentStore::new());
        let documents: Arc<dyn DocumentStore> = store.unwrap_or_else(|| docs.clone());
        let storage = Arc::new(InMemoryObjectStorage::new(
            Url::parse("https://cdn.example.com/media").unwrap(),
        ));
        let usage = Arc::new(FlakyUsageRepo {
            inner: DocumentUsageRepository::new(docs.clone()),
            fail_reads: Mutex::new(false),
            fail_writes: Mutex::new(false),
        });
        let clock = ManualClock::at(2024, 3, 1, 12, 0);
        let events = Arc::new(RecordingEvents::default());
        let model = Arc::new(ScriptedModel::default());
        let voice = Arc::new(FakeVoice::default());

        let ports = Ports {
            journal: Arc::new(DocumentJournalRepository::new(documents.clone())),
            usage: usage.clone(),
            profiles: Arc::new(DocumentProfileRepository::new(documents)),
            model: model.clone(),
            storage: storage.clone(),
            voice: voice.clone(),
            clock: clock.clone(),
            events: events.clone(),
        };

        Self {
            service: Arc::new(Service::new(ports, config)),
            docs,
            storage,
            usage,
            clock,
            events,
            model,
            voice,
        }
    }
}

/// A tiny WAV header as a data URI.
pub const WAV_DATA_URI: &str = "data:audio/wav;base64,UklGRiQAAABXQVZF";
