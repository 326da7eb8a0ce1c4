//! LLM summary generation - builds the Norwegian prompt pair and calls an
//! OpenAI-compatible chat-completions endpoint (OpenRouter by default).
//!
//! The generated text is returned trimmed and otherwise verbatim; no fallback
//! summary is synthesized locally when the call fails.

use crate::error::ServerError;
use crate::models::AvailableConsultant;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";
pub const DEFAULT_REFERER: &str = "http://localhost:4000";

// Moderate randomness so repeated queries read naturally, bounded output
// length for 2-3 sentences.
const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 300;

/// Fixed instruction establishing role, language, and tone.
pub const SYSTEM_PROMPT: &str = "\
Du er en hjelpsom AI-assistent som spesialiserer deg på å oppsummere informasjon om konsulenter.
Du skal alltid svare på norsk med et klart og konsist sammendrag.";

/// Configuration for the text-generation gateway.
#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// Sent as the HTTP-Referer header; OpenRouter requires it.
    pub referer: String,
}

impl SummarizerConfig {
    /// Build a config from an API key with default gateway settings.
    /// A missing or blank key is a configuration error.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ServerError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ServerError::Config("OPENROUTER_API_KEY must be set".into()));
        }
        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            referer: DEFAULT_REFERER.to_string(),
        })
    }

    /// Read the configuration from the environment.
    ///
    /// `OPENROUTER_API_KEY` is required; without it the process must fail at
    /// startup instead of serving requests that can never succeed.
    /// `OPENROUTER_BASE_URL` and `KONSULENT_MODEL` override the defaults.
    pub fn from_env() -> Result<Self, ServerError> {
        let api_key = std::env::var("OPENROUTER_API_KEY")
            .map_err(|_| ServerError::Config("OPENROUTER_API_KEY must be set".into()))?;
        let mut config = Self::new(api_key)?;
        if let Ok(url) = std::env::var("OPENROUTER_BASE_URL") {
            config.base_url = url;
        }
        if let Ok(model) = std::env::var("KONSULENT_MODEL") {
            config.model = model;
        }
        Ok(config)
    }
}

/// Build the per-call prompt embedding the search criteria and the filtered
/// consultants serialized as JSON (wire field names, original skill casing).
pub fn build_user_prompt(
    filtered: &[AvailableConsultant],
    min_availability_percent: u8,
    required_skills: Option<&str>,
) -> Result<String, ServerError> {
    let data = serde_json::to_string_pretty(filtered)
        .map_err(|e| ServerError::Internal(format!("Failed to serialize filtered roster: {}", e)))?;

    let skill_line = match required_skills {
        Some(s) if !s.is_empty() => s,
        _ => "Ingen spesifikk ferdighet",
    };

    Ok(format!(
        "Basert på følgende søkekriterier:
- Minimum tilgjengelighet: {min_availability_percent}%
- Påkrevd ferdighet: {skill_line}

Filtrerte konsulenter som oppfyller kriteriene:
{data}

Generer et kort, naturlig sammendrag på norsk (2-3 setninger) som:
1. Starter med hvor mange konsulenter som ble funnet
2. Nevner søkekriteriene
3. Lister hver konsulent med navn og tilgjengelighet
4. Bruker naturlig norsk språk

Hvis ingen konsulenter ble funnet, skriv en kort melding om det.

Returner BARE sammendraget, ingen ekstra forklaring."
    ))
}

/// Calls the chat-completions gateway to phrase the summary.
#[derive(Debug)]
pub struct Summarizer {
    client: reqwest::Client,
    config: SummarizerConfig,
}

impl Summarizer {
    pub fn new(config: SummarizerConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            config,
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Generate a Norwegian summary of the filtered result set.
    ///
    /// POST {base_url}/chat/completions
    /// Headers:
    ///   Authorization: Bearer {api_key}
    ///   HTTP-Referer: {referer}
    pub async fn summarize(
        &self,
        filtered: &[AvailableConsultant],
        min_availability_percent: u8,
        required_skills: Option<&str>,
    ) -> Result<String, ServerError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let user_prompt = build_user_prompt(filtered, min_availability_percent, required_skills)?;

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": user_prompt }
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS
        });

        tracing::info!(
            "[Summarizer] Calling LLM: {} (model: {})",
            url,
            self.config.model
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("HTTP-Referer", &self.config.referer)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ServerError::Generation(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| ServerError::Generation(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            return Err(ServerError::Generation(format!(
                "LLM API returned {}: {}",
                status, response_text
            )));
        }

        let json: serde_json::Value = serde_json::from_str(&response_text)
            .map_err(|e| ServerError::Generation(format!("Failed to parse response JSON: {}", e)))?;

        let content = json
            .get("choices")
            .and_then(|c| c.as_array())
            .and_then(|arr| arr.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|msg| msg.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| {
                ServerError::Generation("LLM response carried no message content".into())
            })?;

        Ok(content.trim().to_string())
    }
}
