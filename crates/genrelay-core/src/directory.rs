use std::collections::HashMap;

use async_trait::async_trait;

use genrelay_provider::ProviderProfile;

/// The authenticated caller, as established by the transport layer. The
/// core trusts it without re-validating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub user: String,
}

impl CallerIdentity {
    pub fn new(user: impl Into<String>) -> Self {
        Self { user: user.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    #[error("provider not found")]
    NotFound,
    #[error("provider belongs to another tenant")]
    Forbidden,
}

/// Collaborator contract: resolves a provider reference to its connection
/// profile, scoped to the caller. Backing storage and credential decryption
/// are the directory's concern, not the relay core's.
#[async_trait]
pub trait ProviderDirectory: Send + Sync {
    async fn lookup(
        &self,
        identity: &CallerIdentity,
        provider_id: u64,
    ) -> Result<ProviderProfile, DirectoryError>;
}

/// In-memory directory seeded at startup.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    profiles: HashMap<u64, ProviderProfile>,
}

impl MemoryDirectory {
    pub fn new(profiles: Vec<ProviderProfile>) -> Self {
        Self {
            profiles: profiles
                .into_iter()
                .map(|profile| (profile.id, profile))
                .collect(),
        }
    }
}

#[async_trait]
impl ProviderDirectory for MemoryDirectory {
    async fn lookup(
        &self,
        identity: &CallerIdentity,
        provider_id: u64,
    ) -> Result<ProviderProfile, DirectoryError> {
        let profile = self
            .profiles
            .get(&provider_id)
            .ok_or(DirectoryError::NotFound)?;
        if profile.owner != identity.user && !profile.open {
            return Err(DirectoryError::Forbidden);
        }
        Ok(profile.clone())
    }
}
