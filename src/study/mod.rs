//! Study Features
//!
//! Worksheet generation, educational video search and chat, each a single
//! prompt → completion → parse round trip over the [`InferenceClient`].
//!
//! Parsing is tolerant: a completion that yields nothing usable degrades to
//! fixed fallback content instead of an error.

pub mod parser;
pub mod prompt;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::ai::{GenerationParams, InferenceClient};
use crate::config::StudyConfig;
use crate::constants::study as study_constants;
use crate::types::Result;

pub use parser::{ParsedWorksheet, normalize_video_id, parse_videos, parse_worksheet};
pub use prompt::{PromptBuilder, PromptSection, PromptTemplates};

// =============================================================================
// Content Types
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorksheetQuestion {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorksheetContent {
    pub title: String,
    pub instructions: String,
    pub questions: Vec<WorksheetQuestion>,
}

impl WorksheetContent {
    /// Fill gaps in a parse result with defaults derived from the inputs
    pub fn from_parsed(parsed: ParsedWorksheet, subject: &str, grade: &str, topic: &str) -> Self {
        Self {
            title: parsed
                .title
                .unwrap_or_else(|| default_worksheet_title(subject, grade, topic)),
            instructions: parsed
                .instructions
                .unwrap_or_else(|| default_worksheet_instructions(topic)),
            questions: parsed.questions,
        }
    }
}

pub fn default_worksheet_title(subject: &str, grade: &str, topic: &str) -> String {
    format!("{} Grade {} - {}", grade, subject, topic)
}

pub fn default_worksheet_instructions(topic: &str) -> String {
    format!(
        "Complete these {} questions. Show your work where applicable.",
        topic
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResult {
    pub title: String,
    /// Up to 11 characters of `[A-Za-z0-9_-]`
    pub video_id: String,
    pub description: String,
}

impl VideoResult {
    /// Canned entry used when nothing could be parsed
    pub fn fallback(query: &str) -> Self {
        Self {
            title: format!("Introduction to {}", query),
            video_id: study_constants::FALLBACK_VIDEO_ID.to_string(),
            description: format!("A comprehensive introduction to {} for students.", query),
        }
    }

    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }
}

/// Parse video suggestions, substituting the canned entry when nothing matched
pub fn videos_or_fallback(text: &str, query: &str) -> Vec<VideoResult> {
    let videos = parse_videos(text);
    if videos.is_empty() {
        vec![VideoResult::fallback(query)]
    } else {
        videos
    }
}

/// Trimmed reply, or the fixed apology when the model said nothing
pub fn chat_reply_or_apology(text: &str) -> String {
    let reply = text.trim();
    if reply.is_empty() {
        study_constants::CHAT_APOLOGY.to_string()
    } else {
        reply.to_string()
    }
}

/// Drop the prompt when the endpoint echoes it ahead of the completion
pub fn strip_prompt_echo<'a>(text: &'a str, prompt: &str) -> &'a str {
    text.trim_start()
        .strip_prefix(prompt.trim())
        .unwrap_or(text)
}

// =============================================================================
// Study Assistant
// =============================================================================

/// Entry point for the study features
#[derive(Debug, Clone)]
pub struct StudyAssistant {
    client: Arc<InferenceClient>,
    settings: StudyConfig,
}

impl StudyAssistant {
    pub fn new(client: Arc<InferenceClient>, settings: StudyConfig) -> Self {
        Self { client, settings }
    }

    /// Generate a worksheet; unparseable output falls back to defaults
    #[instrument(skip(self))]
    pub async fn generate_worksheet(
        &self,
        subject: &str,
        grade: &str,
        topic: &str,
    ) -> Result<WorksheetContent> {
        let prompt = PromptTemplates::worksheet(
            subject,
            grade,
            topic,
            self.settings.worksheet_question_count,
        );
        let params =
            GenerationParams::new(self.settings.worksheet_max_length, self.settings.temperature);

        let text = self.client.complete(&prompt, params).await?;
        let parsed = parse_worksheet(strip_prompt_echo(&text, &prompt));

        debug!(
            title_found = parsed.title.is_some(),
            instructions_found = parsed.instructions.is_some(),
            questions = parsed.questions.len(),
            "Parsed worksheet"
        );

        let worksheet = WorksheetContent::from_parsed(parsed, subject, grade, topic);
        info!(questions = worksheet.questions.len(), "Worksheet generated");
        Ok(worksheet)
    }

    /// Suggest videos; returns one canned result when nothing parses
    #[instrument(skip(self))]
    pub async fn search_educational_videos(&self, query: &str) -> Result<Vec<VideoResult>> {
        let prompt = PromptTemplates::videos(
            query,
            study_constants::VIDEO_SUGGESTION_COUNT,
            study_constants::VIDEO_ID_LEN,
        );
        let params =
            GenerationParams::new(self.settings.video_max_length, self.settings.temperature);

        let text = self.client.complete(&prompt, params).await?;
        let videos = videos_or_fallback(strip_prompt_echo(&text, &prompt), query);

        info!(count = videos.len(), "Video suggestions ready");
        Ok(videos)
    }

    /// Ask the educational assistant a question
    #[instrument(skip(self, message), fields(chars = message.len()))]
    pub async fn chat_with_ai(&self, message: &str) -> Result<String> {
        let prompt = PromptTemplates::chat(message);
        let params = GenerationParams::new(self.settings.chat_max_length, self.settings.temperature)
            .with_return_full_text(false);

        let text = self.client.complete(&prompt, params).await?;
        Ok(chat_reply_or_apology(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{
        CredentialPool, InferenceError, InferenceRequest, InferenceTransport, RotationPolicy,
        TransportResponse,
    };
    use async_trait::async_trait;
    use secrecy::SecretString;
    use serde_json::json;
    use std::sync::Mutex;

    /// Answers every request with the same completion text
    struct CannedTransport {
        text: String,
        seen: Mutex<Vec<serde_json::Value>>,
    }

    #[async_trait]
    impl InferenceTransport for CannedTransport {
        async fn post(
            &self,
            request: &InferenceRequest,
            _token: &SecretString,
        ) -> std::result::Result<TransportResponse, InferenceError> {
            self.seen
                .lock()
                .unwrap()
                .push(serde_json::to_value(request.body()).unwrap());
            let body = json!([{ "generated_text": self.text }]).to_string();
            Ok(TransportResponse::new(200, body))
        }
    }

    fn assistant(text: &str) -> (StudyAssistant, Arc<CannedTransport>) {
        let transport = Arc::new(CannedTransport {
            text: text.to_string(),
            seen: Mutex::new(Vec::new()),
        });
        let pool = CredentialPool::new(["k"], RotationPolicy::Sticky).unwrap();
        let client = InferenceClient::new("http://endpoint", pool, transport.clone());
        (
            StudyAssistant::new(Arc::new(client), StudyConfig::default()),
            transport,
        )
    }

    #[tokio::test]
    async fn test_worksheet_parsed_from_completion() {
        let (assistant, transport) = assistant(
            "Title: Plant Cells\nInstructions: Read carefully.\nQuestion: What makes plants green?\nAnswer: Chlorophyll\nQuestion: What is the cell's powerhouse?\nAnswer: Mitochondria",
        );

        let worksheet = assistant
            .generate_worksheet("Science", "4th", "Cells")
            .await
            .unwrap();

        assert_eq!(worksheet.title, "Plant Cells");
        assert_eq!(worksheet.instructions, "Read carefully.");
        assert_eq!(worksheet.questions.len(), 2);
        assert_eq!(worksheet.questions[1].answer, "Mitochondria");

        let sent = &transport.seen.lock().unwrap()[0];
        assert_eq!(sent["parameters"]["max_length"], json!(800));
        assert!(sent["parameters"].get("return_full_text").is_none());
    }

    #[tokio::test]
    async fn test_worksheet_defaults_when_unlabelled() {
        let (assistant, _) = assistant("I love fractions!");

        let worksheet = assistant
            .generate_worksheet("Math", "5th", "Fractions")
            .await
            .unwrap();

        assert_eq!(worksheet.title, "5th Grade Math - Fractions");
        assert_eq!(
            worksheet.instructions,
            "Complete these Fractions questions. Show your work where applicable."
        );
        assert!(worksheet.questions.is_empty());
    }

    #[tokio::test]
    async fn test_worksheet_ignores_echoed_prompt() {
        let prompt = PromptTemplates::worksheet("Math", "5th", "Fractions", 5);
        let (assistant, _) = assistant(&format!("{}\n\nQuestion: 1/2 of 4?\nAnswer: 2", prompt));

        let worksheet = assistant
            .generate_worksheet("Math", "5th", "Fractions")
            .await
            .unwrap();

        assert_eq!(worksheet.questions.len(), 1);
        assert_eq!(worksheet.questions[0].question, "1/2 of 4?");
        assert_eq!(worksheet.title, "5th Grade Math - Fractions");
    }

    #[tokio::test]
    async fn test_videos_fallback_when_unparseable() {
        let (assistant, _) = assistant("Sorry, I cannot browse the web.");

        let videos = assistant.search_educational_videos("gravity").await.unwrap();

        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].video_id, "dQw4w9WgXcQ");
        assert_eq!(videos[0].title, "Introduction to gravity");
        assert_eq!(
            videos[0].description,
            "A comprehensive introduction to gravity for students."
        );
    }

    #[tokio::test]
    async fn test_videos_parsed() {
        let (assistant, transport) = assistant(
            "Title: Gravity Basics\nID: grav1ty-001x\nDescription: Why things fall.\nTitle: Orbits\nID: orb_1\nDescription: Moons and planets.",
        );

        let videos = assistant.search_educational_videos("gravity").await.unwrap();

        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].video_id, "grav1ty-001");
        assert_eq!(videos[1].title, "Orbits");
        assert_eq!(
            transport.seen.lock().unwrap()[0]["parameters"]["max_length"],
            json!(500)
        );
    }

    #[tokio::test]
    async fn test_chat_trims_reply_and_disables_echo() {
        let (assistant, transport) = assistant("   The sky scatters blue light.  \n");

        let reply = assistant.chat_with_ai("Why is the sky blue?").await.unwrap();

        assert_eq!(reply, "The sky scatters blue light.");
        assert_eq!(
            transport.seen.lock().unwrap()[0]["parameters"]["return_full_text"],
            json!(false)
        );
    }

    #[tokio::test]
    async fn test_chat_empty_reply_apologizes() {
        let (assistant, _) = assistant(" \n\t ");

        let reply = assistant.chat_with_ai("Hello?").await.unwrap();

        assert_eq!(
            reply,
            "I apologize, but I could not generate a response. Please try again."
        );
    }

    #[test]
    fn test_strip_prompt_echo() {
        assert_eq!(strip_prompt_echo("PROMPT rest", "PROMPT"), " rest");
        assert_eq!(strip_prompt_echo("no echo", "PROMPT"), "no echo");
    }

    #[test]
    fn test_video_watch_url() {
        let video = VideoResult::fallback("x");
        assert_eq!(video.watch_url(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }
}
