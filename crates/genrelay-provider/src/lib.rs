pub mod adapter;
pub mod adapters;
pub mod errors;
pub mod profile;
pub mod registry;

mod openai_compat;

pub use adapter::{GenerationParams, ProviderAdapter, UpstreamRequest};
pub use errors::{BuildError, ParseError};
pub use profile::{ProviderKind, ProviderProfile};
pub use registry::{AdapterRegistry, default_adapters};
