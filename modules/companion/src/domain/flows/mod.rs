//! Prompt dispatch.
//!
//! A [`Flow`] binds a typed input to a fixed prompt template and a typed
//! output. [`FlowDispatcher`] validates the input, renders the prompt, calls
//! the [`GenerativeModel`] port and parses the answer back into the output
//! type. Anything the model returns that does not parse and validate is an
//! upstream failure for that request only.

pub mod catalog;
mod parse;

use std::sync::Arc;

use schemars::{gen::SchemaGenerator, JsonSchema};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::contract::flows::{FlowRequest, FlowResponse};
use crate::domain::error::DomainError;
use crate::domain::ports::{GenerativeModel, MediaPart, RenderedPrompt};

pub use catalog::{AnalyzeJournal, CompanionChat, PredictMood, ScreeningAssessment, TranscribeJournal};

const MODEL_SERVICE: &str = "generative_model";

/// One model-backed feature.
pub trait Flow {
    const NAME: &'static str;
    type Input: Send + Sync;
    type Output: DeserializeOwned + JsonSchema + Send;

    /// Reject bad input before anything leaves the process.
    fn validate_input(input: &Self::Input) -> Result<(), DomainError>;

    /// Natural-language template with the input interpolated.
    fn template(input: &Self::Input) -> String;

    /// Media to send alongside the text, if the flow takes any.
    fn media(_input: &Self::Input) -> Result<Option<MediaPart>, DomainError> {
        Ok(None)
    }

    /// Checks the schema alone cannot express. The message ends up in logs only.
    fn validate_output(input: &Self::Input, output: &Self::Output) -> Result<(), String>;
}

/// Render the prompt for `F` without calling the model.
pub fn render<F: Flow>(input: &F::Input) -> Result<RenderedPrompt, DomainError> {
    let schema = SchemaGenerator::default().into_root_schema_for::<F::Output>();
    let response_schema = serde_json::to_value(&schema)
        .map_err(|e| DomainError::upstream(MODEL_SERVICE, format!("schema encoding: {}", e)))?;
    let schema_text = serde_json::to_string(&response_schema)
        .map_err(|e| DomainError::upstream(MODEL_SERVICE, format!("schema encoding: {}", e)))?;

    let text = format!(
        "{}\n\nRespond with a single JSON object that conforms to this JSON schema and nothing else:\n{}",
        F::template(input),
        schema_text
    );

    Ok(RenderedPrompt {
        flow: F::NAME,
        text,
        response_schema,
        media: F::media(input)?,
    })
}

pub struct FlowDispatcher {
    model: Arc<dyn GenerativeModel>,
}

impl FlowDispatcher {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    /// Run a single flow end to end.
    #[instrument(name = "companion.flows.run", skip_all, fields(flow = F::NAME))]
    pub async fn run<F: Flow>(&self, input: &F::Input) -> Result<F::Output, DomainError> {
        F::validate_input(input)?;
        let prompt = render::<F>(input)?;

        debug!(prompt_len = prompt.text.len(), "Dispatching prompt");
        let raw = self.model.generate(&prompt).await?;

        let output: F::Output = serde_json::from_str(parse::extract_json(&raw)).map_err(|e| {
            warn!(error = %e, "Model answer does not match the output schema");
            DomainError::upstream(
                MODEL_SERVICE,
                format!("malformed {} output: {}", F::NAME, e),
            )
        })?;

        F::validate_output(input, &output).map_err(|reason| {
            warn!(%reason, "Model answer failed output validation");
            DomainError::upstream(
                MODEL_SERVICE,
                format!("invalid {} output: {}", F::NAME, reason),
            )
        })?;

        Ok(output)
    }

    /// Route a tagged request to its flow.
    #[instrument(name = "companion.flows.dispatch", skip_all, fields(flow = request.name()))]
    pub async fn dispatch(&self, request: FlowRequest) -> Result<FlowResponse, DomainError> {
        match request {
            FlowRequest::PredictMood(input) => self
                .run::<PredictMood>(&input)
                .await
                .map(FlowResponse::PredictMood),
            FlowRequest::AnalyzeJournal(input) => self
                .run::<AnalyzeJournal>(&input)
                .await
                .map(FlowResponse::AnalyzeJournal),
            FlowRequest::CompanionChat(input) => self
                .run::<CompanionChat>(&input)
                .await
                .map(FlowResponse::CompanionChat),
            FlowRequest::ScreeningAssessment(input) => self
                .run::<ScreeningAssessment>(&input)
                .await
                .map(FlowResponse::ScreeningAssessment),
            FlowRequest::TranscribeJournal(input) => self
                .run::<TranscribeJournal>(&input)
                .await
                .map(FlowResponse::TranscribeJournal),
        }
    }
}
