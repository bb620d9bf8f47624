//! Auxiliary provider clients for non-global AI tenants.

use std::time::Duration;

use tenancy::TenancyResult;
use url::Url;

use crate::http;

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1";
const ELEVENLABS_API_URL: &str = "https://api.elevenlabs.io/v1";
const OPENAI_API_URL: &str = "https://api.openai.com/v1";

/// Role a provider client fills for a tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProviderRole {
    /// LLM and speech-to-text.
    OpenRouter,
    /// Text-to-speech.
    ElevenLabs,
    /// Embeddings.
    OpenAi,
}

impl ProviderRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenRouter => "openrouter",
            Self::ElevenLabs => "elevenlabs",
            Self::OpenAi => "openai",
        }
    }
}

impl std::fmt::Display for ProviderRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authorized HTTP handle for one upstream provider.
pub struct ProviderClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ProviderClient {
    fn new(base_url: &str, headers: reqwest::header::HeaderMap, timeout: Duration) -> TenancyResult<Self> {
        Ok(Self {
            http: http::client(headers, timeout)?,
            base_url: http::base_url(base_url)?,
        })
    }

    pub fn open_router(api_key: &str, timeout: Duration) -> TenancyResult<Self> {
        Self::new(OPENROUTER_API_URL, http::bearer_headers(api_key)?, timeout)
    }

    pub fn eleven_labs(api_key: &str, timeout: Duration) -> TenancyResult<Self> {
        Self::new(
            ELEVENLABS_API_URL,
            http::key_header("xi-api-key", api_key)?,
            timeout,
        )
    }

    pub fn open_ai(api_key: &str, timeout: Duration) -> TenancyResult<Self> {
        Self::new(OPENAI_API_URL, http::bearer_headers(api_key)?, timeout)
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}
