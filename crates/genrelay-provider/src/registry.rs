use std::collections::HashMap;
use std::sync::Arc;

use crate::adapter::ProviderAdapter;
use crate::adapters::{AnthropicAdapter, GeminiAdapter, OllamaAdapter, OpenAiCompatAdapter};
use crate::profile::ProviderKind;

/// Dispatch table from provider kind to its dialect adapter. Supporting a
/// new kind is one adapter plus one entry here.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<ProviderKind, Arc<dyn ProviderAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) {
        self.adapters.insert(adapter.kind(), adapter);
    }

    pub fn get(&self, kind: ProviderKind) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters.get(&kind).cloned()
    }
}

/// The full built-in adapter set.
pub fn default_adapters() -> AdapterRegistry {
    let mut registry = AdapterRegistry::new();
    registry.register(Arc::new(OpenAiCompatAdapter));
    registry.register(Arc::new(OllamaAdapter));
    registry.register(Arc::new(GeminiAdapter));
    registry.register(Arc::new(AnthropicAdapter));
    registry
}
