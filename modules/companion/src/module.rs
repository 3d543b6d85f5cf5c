use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use arc_swap::ArcSwapOption;
use tracing::{debug, info, warn};
use url::Url;

use crate::api::rest::routes;
use crate::config::CompanionConfig;
use crate::contract::client::CompanionApi;
use crate::domain::ports::DocumentStore;
use crate::domain::service::{Ports, Service, ServiceConfig};
use crate::gateways::local::CompanionLocalClient;
use crate::infra::clock::SystemClock;
use crate::infra::events::TracingEventPublisher;
use crate::infra::http::TracedClient;
use crate::infra::llm::HttpGenerativeClient;
use crate::infra::storage::{
    DocumentJournalRepository, DocumentProfileRepository, DocumentUsageRepository,
    InMemoryDocumentStore, InMemoryObjectStorage,
};
use crate::infra::voice::HttpVoiceCloner;

/// The companion module: owns the domain service and exposes it over REST
/// and as an in-process [`CompanionApi`] client.
#[derive(Default)]
pub struct Companion {
    // Behind ArcSwap so init can run after the module is shared.
    service: ArcSwapOption<Service>,
}

impl Companion {
    /// Wire the default adapters from configuration.
    pub fn init(&self, cfg: &CompanionConfig) -> anyhow::Result<()> {
        info!("Initializing companion module");
        debug!(
            "Loaded companion config: daily_limit_secs={}, max_tick_secs={}, utc_offset_minutes={}",
            cfg.daily_limit_secs, cfg.max_tick_secs, cfg.utc_offset_minutes
        );

        let service_config = cfg.to_service_config()?;
        let ports = default_ports(cfg)?;
        self.init_with_ports(ports, service_config);
        Ok(())
    }

    /// Wire caller-provided adapters.
    pub fn init_with_ports(&self, ports: Ports, config: ServiceConfig) {
        self.service.store(Some(Arc::new(Service::new(ports, config))));
        info!("Companion service ready");
    }

    pub fn service(&self) -> anyhow::Result<Arc<Service>> {
        self.service
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))
    }

    /// In-process client for other modules.
    pub fn client(&self) -> anyhow::Result<Arc<dyn CompanionApi>> {
        Ok(Arc::new(CompanionLocalClient::new(self.service()?)))
    }

    pub fn register_rest(&self, router: axum::Router) -> anyhow::Result<axum::Router> {
        info!("Registering companion REST routes");
        let router = routes::register_routes(router, self.service()?)?;
        info!("Companion REST routes registered successfully");
        Ok(router)
    }
}

/// In-memory persistence plus HTTP clients for the model and voice APIs.
pub fn default_ports(cfg: &CompanionConfig) -> anyhow::Result<Ports> {
    let http = TracedClient::with_timeout(Duration::from_secs(cfg.http_timeout_secs))
        .context("failed to build HTTP client")?;

    if cfg.generative.api_key.is_empty() {
        warn!("modules.companion.generative.api_key is empty, model calls will be rejected upstream");
    }
    if cfg.voice.api_key.is_empty() {
        warn!("modules.companion.voice.api_key is empty, voice cloning will be rejected upstream");
    }

    let generative_url = Url::parse(&cfg.generative.base_url)
        .with_context(|| format!("invalid generative.base_url '{}'", cfg.generative.base_url))?;
    let voice_url = Url::parse(&cfg.voice.base_url)
        .with_context(|| format!("invalid voice.base_url '{}'", cfg.voice.base_url))?;
    let public_url = Url::parse(&cfg.storage.public_base_url).with_context(|| {
        format!(
            "invalid storage.public_base_url '{}'",
            cfg.storage.public_base_url
        )
    })?;

    let documents: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());

    Ok(Ports {
        journal: Arc::new(DocumentJournalRepository::new(documents.clone())),
        usage: Arc::new(DocumentUsageRepository::new(documents.clone())),
        profiles: Arc::new(DocumentProfileRepository::new(documents)),
        model: Arc::new(HttpGenerativeClient::new(
            http.clone(),
            generative_url,
            cfg.generative.model.clone(),
            cfg.generative.api_key.clone(),
        )),
        storage: Arc::new(InMemoryObjectStorage::new(public_url)),
        voice: Arc::new(HttpVoiceCloner::new(
            http,
            voice_url,
            cfg.voice.api_key.clone(),
        )),
        clock: Arc::new(SystemClock),
        events: Arc::new(TracingEventPublisher),
    })
}
