//! Browser-type strategies

use std::sync::Arc;

use wayfarer_tabs::EngineFactory;

/// Maps browser-type tags to the factories that create their engines.
#[derive(Clone)]
pub struct EngineRegistry {
    /// Registration order; the first entry is the fallback
    factories: Vec<Arc<dyn EngineFactory>>,
}

impl EngineRegistry {
    pub fn new(default: Arc<dyn EngineFactory>) -> Self {
        Self {
            factories: vec![default],
        }
    }

    /// Register a factory, replacing any existing one with the same tag
    pub fn register(&mut self, factory: Arc<dyn EngineFactory>) {
        match self
            .factories
            .iter()
            .position(|f| f.kind() == factory.kind())
        {
            Some(index) => self.factories[index] = factory,
            None => self.factories.push(factory),
        }
    }

    pub fn get(&self, kind: &str) -> Option<Arc<dyn EngineFactory>> {
        self.factories
            .iter()
            .find(|f| f.kind() == kind)
            .map(Arc::clone)
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.iter().any(|f| f.kind() == kind)
    }

    pub fn default_kind(&self) -> &str {
        self.factories[0].kind()
    }

    /// Registered tags in registration order
    pub fn kinds(&self) -> Vec<&str> {
        self.factories.iter().map(|f| f.kind()).collect()
    }

    /// Factory for `kind`, or the default when `kind` is not registered
    pub fn resolve(&self, kind: &str) -> Arc<dyn EngineFactory> {
        match self.get(kind) {
            Some(factory) => factory,
            None => {
                let fallback = self.default_factory();
                tracing::warn!(
                    requested = %kind,
                    fallback = %fallback.kind(),
                    "Unknown browser type, using default"
                );
                fallback
            }
        }
    }

    fn default_factory(&self) -> Arc<dyn EngineFactory> {
        // `new` guarantees at least one entry and nothing removes entries
        Arc::clone(&self.factories[0])
    }
}
