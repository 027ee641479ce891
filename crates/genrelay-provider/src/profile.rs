use std::fmt;

use serde::{Deserialize, Serialize};

use genrelay_common::mask_secret;

/// The protocol dialect an upstream speaks. Closed set; adding a kind means
/// adding one adapter and one registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    #[serde(rename = "OpenAI-Compatible", alias = "OpenAI")]
    OpenAiCompatible,
    #[serde(rename = "Ollama")]
    Ollama,
    #[serde(rename = "Google Gemini")]
    GoogleGemini,
    #[serde(rename = "Anthropic")]
    Anthropic,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProviderKind::OpenAiCompatible => "OpenAI-Compatible",
            ProviderKind::Ollama => "Ollama",
            ProviderKind::GoogleGemini => "Google Gemini",
            ProviderKind::Anthropic => "Anthropic",
        };
        f.write_str(label)
    }
}

/// One upstream's connection profile, owned by the provider directory. The
/// relay core only reads it for the duration of a single generation call.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderProfile {
    pub id: u64,
    /// Identity of the tenant that configured this provider.
    pub owner: String,
    #[serde(default)]
    pub name: String,
    pub kind: ProviderKind,
    pub base_url: String,
    pub model: String,
    #[serde(default)]
    pub credential: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Whether tenants other than the owner may generate through it.
    #[serde(default)]
    pub open: bool,
}

fn default_enabled() -> bool {
    true
}

impl ProviderProfile {
    /// Ollama profiles whose base URL lacks `/v1` speak the native dialect;
    /// every other combination speaks OpenAI-compatible chat completions.
    pub fn native_ollama(&self) -> bool {
        self.kind == ProviderKind::Ollama && !self.base_url.contains("/v1")
    }

    pub fn trimmed_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn masked_credential(&self) -> String {
        mask_secret(&self.credential)
    }
}

// The credential must never leak through logs or debug output.
impl fmt::Debug for ProviderProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderProfile")
            .field("id", &self.id)
            .field("owner", &self.owner)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("credential", &self.masked_credential())
            .field("enabled", &self.enabled)
            .field("open", &self.open)
            .finish()
    }
}
