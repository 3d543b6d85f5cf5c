//! The model-backed features and their prompt templates.

use std::fmt::Write as _;

use crate::contract::flows::{
    ChatInput, ChatReply, ChatRole, JournalAnalysis, JournalAnalysisInput, MoodPrediction,
    MoodPredictionInput, ScreeningInput, ScreeningResult, TranscribedEntry, TranscriptionInput,
};
use crate::domain::error::DomainError;
use crate::domain::journal::RECENT_ENTRIES_LIMIT;
use crate::domain::media::DataUri;
use crate::domain::ports::MediaPart;

use super::Flow;

const MAX_TEXT_CHARS: usize = 8_000;
const MAX_CHAT_HISTORY: usize = 50;
const MAX_SCREENING_SCORE: u8 = 3;

const PERSONA: &str = "You are a warm, non-judgmental mental-health companion. \
You are not a therapist and never give a diagnosis.";

fn require_text(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::invalid_argument(field, "must not be empty"));
    }
    if value.chars().count() > MAX_TEXT_CHARS {
        return Err(DomainError::invalid_argument(
            field,
            format!("longer than {} characters", MAX_TEXT_CHARS),
        ));
    }
    Ok(())
}

fn require_output(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is empty", field));
    }
    Ok(())
}

pub struct PredictMood;

impl Flow for PredictMood {
    const NAME: &'static str = "predict_mood";
    type Input = MoodPredictionInput;
    type Output = MoodPrediction;

    fn validate_input(input: &Self::Input) -> Result<(), DomainError> {
        require_text("text", &input.text)
    }

    fn template(input: &Self::Input) -> String {
        format!(
            "{PERSONA}\n\nRead the message below and predict the writer's current mood \
as a single lowercase word. Give a confidence between 0 and 1 and one sentence of reasoning.\n\n\
Message:\n{}",
            input.text.trim()
        )
    }

    fn validate_output(_input: &Self::Input, output: &Self::Output) -> Result<(), String> {
        require_output("mood", &output.mood)?;
        if !output.confidence.is_finite() || !(0.0..=1.0).contains(&output.confidence) {
            return Err(format!("confidence {} outside 0..=1", output.confidence));
        }
        Ok(())
    }
}

pub struct AnalyzeJournal;

impl Flow for AnalyzeJournal {
    const NAME: &'static str = "analyze_journal";
    type Input = JournalAnalysisInput;
    type Output = JournalAnalysis;

    fn validate_input(input: &Self::Input) -> Result<(), DomainError> {
        if input.entries.is_empty() {
            return Err(DomainError::invalid_argument(
                "entries",
                "at least one journal entry is required",
            ));
        }
        if input.entries.len() > RECENT_ENTRIES_LIMIT {
            return Err(DomainError::invalid_argument(
                "entries",
                format!("at most {} entries are accepted", RECENT_ENTRIES_LIMIT),
            ));
        }
        Ok(())
    }

    fn template(input: &Self::Input) -> String {
        let mut out = format!(
            "{PERSONA}\n\nBelow are the user's most recent journal entries, newest first. \
Describe their overall mood in one or two words, summarise the emotional trend in a short \
paragraph and offer up to three gentle, practical suggestions.\n\nEntries:\n"
        );
        for entry in &input.entries {
            let _ = writeln!(out, "- {} (mood: {}): {}", entry.date, entry.mood, entry.content);
        }
        out
    }

    fn validate_output(_input: &Self::Input, output: &Self::Output) -> Result<(), String> {
        require_output("overall_mood", &output.overall_mood)?;
        require_output("summary", &output.summary)
    }
}

pub struct CompanionChat;

impl Flow for CompanionChat {
    const NAME: &'static str = "companion_chat";
    type Input = ChatInput;
    type Output = ChatReply;

    fn validate_input(input: &Self::Input) -> Result<(), DomainError> {
        require_text("message", &input.message)?;
        if input.history.len() > MAX_CHAT_HISTORY {
            return Err(DomainError::invalid_argument(
                "history",
                format!("at most {} turns are accepted", MAX_CHAT_HISTORY),
            ));
        }
        Ok(())
    }

    fn template(input: &Self::Input) -> String {
        let mut out = format!(
            "{PERSONA}\n\nContinue the conversation with a short, supportive reply. \
If the user mentions self-harm, encourage them to contact local emergency services or a crisis line.\n\n"
        );
        for turn in &input.history {
            let who = match turn.role {
                ChatRole::User => "User",
                ChatRole::Companion => "Companion",
            };
            let _ = writeln!(out, "{}: {}", who, turn.text);
        }
        let _ = writeln!(out, "User: {}", input.message.trim());
        out
    }

    fn validate_output(_input: &Self::Input, output: &Self::Output) -> Result<(), String> {
        require_output("reply", &output.reply)
    }
}

pub struct ScreeningAssessment;

impl ScreeningAssessment {
    fn total(input: &ScreeningInput) -> u32 {
        input.answers.iter().map(|a| u32::from(a.score)).sum()
    }
}

impl Flow for ScreeningAssessment {
    const NAME: &'static str = "screening_assessment";
    type Input = ScreeningInput;
    type Output = ScreeningResult;

    fn validate_input(input: &Self::Input) -> Result<(), DomainError> {
        if input.questionnaire.trim().is_empty() {
            return Err(DomainError::invalid_argument(
                "questionnaire",
                "must not be empty",
            ));
        }
        if input.answers.is_empty() {
            return Err(DomainError::invalid_argument(
                "answers",
                "at least one answer is required",
            ));
        }
        if let Some((i, a)) = input
            .answers
            .iter()
            .enumerate()
            .find(|(_, a)| a.score > MAX_SCREENING_SCORE)
        {
            return Err(DomainError::invalid_argument(
                format!("answers[{}].score", i),
                format!("{} is outside 0..={}", a.score, MAX_SCREENING_SCORE),
            ));
        }
        Ok(())
    }

    fn template(input: &Self::Input) -> String {
        let mut out = format!(
            "{PERSONA}\n\nThe user completed the {} screening questionnaire. Each answer is scored \
0 (not at all) to 3 (nearly every day). The total score is {}. Report that total, the \
conventional severity band for it and a short recommendation about seeking professional support.\n\n\
Answers:\n",
            input.questionnaire.trim(),
            Self::total(input)
        );
        for answer in &input.answers {
            let _ = writeln!(out, "- {} => {}", answer.question, answer.score);
        }
        out
    }

    fn validate_output(input: &Self::Input, output: &Self::Output) -> Result<(), String> {
        let expected = Self::total(input);
        if output.total_score != expected {
            return Err(format!(
                "total_score {} does not match answers ({})",
                output.total_score, expected
            ));
        }
        require_output("severity", &output.severity)?;
        require_output("recommendation", &output.recommendation)
    }
}

pub struct TranscribeJournal;

const AUDIO_FIELD: &str = "audio_data_uri";

impl Flow for TranscribeJournal {
    const NAME: &'static str = "transcribe_journal";
    type Input = TranscriptionInput;
    type Output = TranscribedEntry;

    fn validate_input(input: &Self::Input) -> Result<(), DomainError> {
        DataUri::parse_audio(AUDIO_FIELD, &input.audio_data_uri).map(|_| ())
    }

    fn template(_input: &Self::Input) -> String {
        format!(
            "{PERSONA}\n\nThe attached audio is a spoken journal entry. Transcribe it faithfully \
as the entry content and name the speaker's mood as a single lowercase word."
        )
    }

    fn media(input: &Self::Input) -> Result<Option<MediaPart>, DomainError> {
        let uri = DataUri::parse_audio(AUDIO_FIELD, &input.audio_data_uri)?;
        Ok(Some(MediaPart {
            mime_type: uri.mime_type,
            data_base64: uri.data_base64,
        }))
    }

    fn validate_output(_input: &Self::Input, output: &Self::Output) -> Result<(), String> {
        require_output("content", &output.content)?;
        require_output("mood", &output.mood)
    }
}
