use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::adapters::compiler::CompiledGenerator;

/// Active generator per simulation key.
///
/// Entries are whole `Arc` replacements, so a reader racing a deploy sees
/// either the old or the new generator.
#[derive(Clone, Default)]
pub struct SimulationRegistry {
    generators: Arc<RwLock<HashMap<String, Arc<CompiledGenerator>>>>,
}

impl SimulationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `generator` under `key`, replacing any previous one
    pub async fn set(&self, key: impl Into<String>, generator: Arc<CompiledGenerator>) {
        let mut generators = self.generators.write().await;
        generators.insert(key.into(), generator);
    }

    pub async fn get(&self, key: &str) -> Option<Arc<CompiledGenerator>> {
        let generators = self.generators.read().await;
        generators.get(key).cloned()
    }

    pub async fn is_deployed(&self, key: &str) -> bool {
        self.generators.read().await.contains_key(key)
    }
}
