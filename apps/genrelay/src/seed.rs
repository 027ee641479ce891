use std::error::Error;
use std::fs;

use serde::Deserialize;

use genrelay_provider::ProviderProfile;

/// Startup state: who may call the relay and which upstreams it can reach.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Seed {
    #[serde(default)]
    pub(crate) providers: Vec<ProviderProfile>,
    #[serde(default)]
    pub(crate) tokens: Vec<TokenEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenEntry {
    pub(crate) token: String,
    pub(crate) user: String,
}

pub(crate) fn load_seed(path: &str) -> Result<Seed, Box<dyn Error + Send + Sync>> {
    let raw = fs::read(path)
        .map_err(|err| format!("cannot read seed file {path}: {err}"))?;
    let seed: Seed = serde_json::from_slice(&raw)
        .map_err(|err| format!("cannot parse seed file {path}: {err}"))?;
    Ok(seed)
}
