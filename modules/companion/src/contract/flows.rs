//! Typed request/response schemas for every model-backed feature.
//!
//! Each pair is the contract of one flow: callers build the input, the
//! dispatcher renders it into a prompt and only ever hands back the parsed
//! output type. The JSON shape of the output types is also what the model is
//! instructed to produce (see `schemars`).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::model::JournalEntry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MoodPredictionInput {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MoodPrediction {
    /// Single-word mood label, e.g. "anxious".
    pub mood: String,
    /// Model confidence in `0.0..=1.0`.
    pub confidence: f32,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JournalAnalysisInput {
    pub entries: Vec<JournalEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JournalAnalysis {
    pub overall_mood: String,
    pub summary: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Companion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChatInput {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChatReply {
    pub reply: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScreeningAnswer {
    pub question: String,
    /// Likert score, 0 ("not at all") to 3 ("nearly every day").
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScreeningInput {
    /// Questionnaire name, e.g. "PHQ-9" or "GAD-7".
    pub questionnaire: String,
    pub answers: Vec<ScreeningAnswer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScreeningResult {
    pub total_score: u32,
    pub severity: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TranscriptionInput {
    /// Recorded audio as `data:audio/<type>;base64,<payload>`.
    pub audio_data_uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TranscribedEntry {
    pub mood: String,
    pub content: String,
}

/// A flow invocation, tagged by flow name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "flow", content = "input", rename_all = "snake_case")]
pub enum FlowRequest {
    PredictMood(MoodPredictionInput),
    AnalyzeJournal(JournalAnalysisInput),
    CompanionChat(ChatInput),
    ScreeningAssessment(ScreeningInput),
    TranscribeJournal(TranscriptionInput),
}

/// The schema-conformant result of a flow, tagged like its request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "flow", content = "output", rename_all = "snake_case")]
pub enum FlowResponse {
    PredictMood(MoodPrediction),
    AnalyzeJournal(JournalAnalysis),
    CompanionChat(ChatReply),
    ScreeningAssessment(ScreeningResult),
    TranscribeJournal(TranscribedEntry),
}

impl FlowRequest {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PredictMood(_) => "predict_mood",
            Self::AnalyzeJournal(_) => "analyze_journal",
            Self::CompanionChat(_) => "companion_chat",
            Self::ScreeningAssessment(_) => "screening_assessment",
            Self::TranscribeJournal(_) => "transcribe_journal",
        }
    }
}
