use async_trait::async_trait;
use log::{error, info};
use reqwest::Client;
use std::error::Error;
use std::fmt;
use std::time::Duration;
use tokio::time::timeout;

pub const DEFAULT_TRANSLATE_TIMEOUT_SECS: u64 = 15;

/// longest text the free endpoint accepts, in characters
pub const MAX_TEXT_CHARS: usize = 5000;

const GOOGLE_TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLanguage {
    Auto,
    Code(String),
}

impl SourceLanguage {
    pub fn as_param(&self) -> &str {
        match self {
            SourceLanguage::Auto => "auto",
            SourceLanguage::Code(code) => code,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    Network(String),
    HttpStatus(u16),
    MalformedResponse(String),
    /// empty text or longer than MAX_TEXT_CHARS
    InvalidLength(usize),
    Timeout(Duration),
}

impl fmt::Display for TranslationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationError::Network(e) => write!(f, "Translation request failed: {}", e),
            TranslationError::HttpStatus(status) => {
                write!(f, "Translation service returned HTTP {}", status)
            }
            TranslationError::MalformedResponse(e) => {
                write!(f, "Malformed translation response: {}", e)
            }
            TranslationError::InvalidLength(len) => write!(
                f,
                "Text length {} is outside the accepted range 1..={}",
                len, MAX_TEXT_CHARS
            ),
            TranslationError::Timeout(after) => {
                write!(f, "Translation timed out after {:?}", after)
            }
        }
    }
}

impl Error for TranslationError {}

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source: &SourceLanguage,
        target_code: &str,
    ) -> Result<String, TranslationError>;

    fn provider_name(&self) -> &str;
}

/// runs a translation with an upper bound on how long it may take
pub async fn translate_with_timeout(
    translator: &dyn Translator,
    limit: Duration,
    text: &str,
    source: &SourceLanguage,
    target_code: &str,
) -> Result<String, TranslationError> {
    match timeout(limit, translator.translate(text, source, target_code)).await {
        Ok(result) => result,
        Err(_elapsed) => {
            error!(
                "{} did not answer within {:?}",
                translator.provider_name(),
                limit
            );
            Err(TranslationError::Timeout(limit))
        }
    }
}

pub fn validate_text(text: &str) -> Result<(), TranslationError> {
    let len = text.chars().count();
    if text.trim().is_empty() || len > MAX_TEXT_CHARS {
        return Err(TranslationError::InvalidLength(len));
    }
    Ok(())
}

/// Google Translate through the public `client=gtx` endpoint (no API key)
#[derive(Clone)]
pub struct GoogleTranslator {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl GoogleTranslator {
    /// `timeout` bounds each request, connect through body
    pub fn new(timeout: Duration) -> Result<Self, TranslationError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TranslationError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: GOOGLE_TRANSLATE_URL.to_string(),
            timeout,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn request_error(&self, err: reqwest::Error) -> TranslationError {
        if err.is_timeout() {
            TranslationError::Timeout(self.timeout)
        } else if let Some(status) = err.status() {
            TranslationError::HttpStatus(status.as_u16())
        } else {
            TranslationError::Network(err.to_string())
        }
    }

    /// joins the translated segments of a `translate_a/single` response.
    ///
    /// The payload looks like `[[["Bonjour","Hello",null,null,10], ...], null, "en", ...]`;
    /// the first element holds one entry per sentence.
    pub fn parse_response(body: &serde_json::Value) -> Result<String, TranslationError> {
        let segments = body
            .get(0)
            .and_then(|value| value.as_array())
            .ok_or_else(|| {
                TranslationError::MalformedResponse("missing sentence array".to_string())
            })?;

        let translated: String = segments
            .iter()
            .filter_map(|segment| segment.get(0).and_then(|value| value.as_str()))
            .collect();

        if translated.is_empty() {
            return Err(TranslationError::MalformedResponse(
                "no translated segments".to_string(),
            ));
        }

        Ok(translated)
    }
}

impl fmt::Debug for GoogleTranslator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleTranslator")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(
        &self,
        text: &str,
        source: &SourceLanguage,
        target_code: &str,
    ) -> Result<String, TranslationError> {
        validate_text(text)?;

        info!(
            "Translating {} chars ({} -> {})",
            text.chars().count(),
            source.as_param(),
            target_code
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("client", "gtx"),
                ("sl", source.as_param()),
                ("tl", target_code),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslationError::HttpStatus(status.as_u16()));
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                TranslationError::Timeout(self.timeout)
            } else {
                TranslationError::MalformedResponse(e.to_string())
            }
        })?;

        Self::parse_response(&body)
    }

    fn provider_name(&self) -> &str {
        "Google Translate"
    }
}
