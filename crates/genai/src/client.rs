//! Chat-completions client for an OpenAI-compatible endpoint.
//!
//! Every [`Generator`] operation is a single prompt/response exchange; the
//! response post-processing (outline line cleanup, chart JSON extraction)
//! lives here so handlers only ever see typed values.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;

use docforge_core::chart::ChartData;
use docforge_core::project::DocumentKind;

use crate::{ensure_success, GenAiError, Generator};

/// Bullet or numbering prefix on an outline line.
static LIST_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-*]\s+|\d+[.)]\s+)").expect("valid regex"));

/// HTTP client for an OpenAI-compatible chat-completions API.
pub struct GenAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GenAiClient {
    /// Create a new client.
    ///
    /// * `base_url` - API base, e.g. `https://api.openai.com/v1`.
    pub fn new(base_url: String, api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            api_key,
            model,
        }
    }

    /// Send one user prompt and return the first choice's text.
    async fn chat(&self, prompt: &str) -> Result<String, GenAiError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let response = ensure_success(response).await?;
        let parsed = response.json::<ChatResponse>().await?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| GenAiError::Malformed("chat response contained no choices".to_string()))
    }
}

/// Medium word used in prompts.
fn medium(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::FlowDocument => "document",
        DocumentKind::SlideDeck => "presentation",
    }
}

#[async_trait]
impl Generator for GenAiClient {
    async fn generate_outline(
        &self,
        topic: &str,
        kind: DocumentKind,
    ) -> Result<Vec<String>, GenAiError> {
        let prompt = format!(
            "Generate a structured outline for a {} about '{}'. \
             Return only the {} titles, one per line. \
             Do not include numbering or bullets.",
            medium(kind),
            topic,
            kind.unit_name(),
        );
        let text = self.chat(&prompt).await?;

        let titles = clean_outline_lines(&text);
        if titles.is_empty() {
            return Err(GenAiError::Malformed(
                "outline response contained no titles".to_string(),
            ));
        }
        Ok(titles)
    }

    async fn generate_content(
        &self,
        topic: &str,
        item_title: &str,
        kind: DocumentKind,
    ) -> Result<String, GenAiError> {
        let prompt = format!(
            "Write the content for a {} {} titled '{}' for a project about '{}'. \
             Keep it concise and relevant.",
            medium(kind),
            kind.unit_name(),
            item_title,
            topic,
        );
        self.chat(&prompt).await
    }

    async fn refine_content(
        &self,
        text: &str,
        instruction: &str,
    ) -> Result<String, GenAiError> {
        let prompt = format!(
            "Refine the following text based on this instruction: '{instruction}'.\n\nText:\n{text}"
        );
        self.chat(&prompt).await
    }

    async fn generate_chart(
        &self,
        topic: &str,
        item_title: &str,
    ) -> Result<ChartData, GenAiError> {
        let prompt = format!(
            "Generate chart data for a chart titled '{item_title}' in a project about \
             '{topic}'. Respond with a single JSON object with keys \"type\" (one of \
             \"bar\", \"pie\", \"line\"), \"title\", \"categories\" (list of strings) \
             and \"series\" (list of objects with \"name\" and \"values\"). \
             Return only the JSON."
        );
        let text = self.chat(&prompt).await?;
        parse_chart_json(&text)
    }

    async fn generate_image_query(
        &self,
        topic: &str,
        item_title: &str,
    ) -> Result<String, GenAiError> {
        let prompt = format!(
            "Suggest a short stock-photo search query (3 to 5 words) for an image \
             illustrating '{item_title}' in a project about '{topic}'. \
             Return only the query text."
        );
        let query = self.chat(&prompt).await?;

        let query = query.trim();
        if query.is_empty() {
            return Err(GenAiError::Malformed(
                "image query response was empty".to_string(),
            ));
        }
        Ok(query.to_string())
    }
}

// ---------------------------------------------------------------------------
// Response post-processing
// ---------------------------------------------------------------------------

/// Outline text to titles: trim lines, strip bullet/numbering prefixes,
/// drop blanks.
fn clean_outline_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| LIST_PREFIX_RE.replace(line.trim(), "").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Parse chart JSON, tolerating a markdown code fence around it.
fn parse_chart_json(text: &str) -> Result<ChartData, GenAiError> {
    serde_json::from_str(strip_code_fence(text))
        .map_err(|e| GenAiError::Malformed(format!("chart JSON did not parse: {e}")))
}

/// Remove a surrounding ``` fence (with optional `json` tag) if present.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
