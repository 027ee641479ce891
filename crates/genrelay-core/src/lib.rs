pub mod directory;
pub mod error;
pub mod orchestrator;
pub mod relay;
pub mod upstream;

pub use directory::{CallerIdentity, DirectoryError, MemoryDirectory, ProviderDirectory};
pub use error::GenerateError;
pub use orchestrator::{GenerateOutcome, GenerateRequest, Orchestrator};
pub use upstream::{
    ByteStream, TransportFailure, UpstreamBody, UpstreamClient, UpstreamClientConfig,
    UpstreamResponse, WreqUpstreamClient,
};
