use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::config::Config;
use crate::events::EventPublisher;
use crate::llm_client::PredictionBackend;
use crate::nlp_client::NlpBackend;
use crate::storage::DocumentArchive;
use crate::store::ResultStore;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Every external collaborator is a trait object built once at startup, so
/// handlers can be exercised against fakes.
#[derive(Clone)]
pub struct AppState {
    pub nlp: Arc<dyn NlpBackend>,
    pub llm: Arc<dyn PredictionBackend>,
    pub store: Arc<dyn ResultStore>,
    pub archive: Arc<dyn DocumentArchive>,
    pub events: Arc<dyn EventPublisher>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub config: Config,
}
