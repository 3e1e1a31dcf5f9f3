//! Lookup contract for external materializers
//!
//! Materializers paint pixels and live outside this crate. Only the lookup is
//! defined here: the first registered materializer that supports a
//! (pattern, traits) pair handles it.

use crate::affinity::traits::ManifestationTraits;
use crate::render::resolved::ResolvedUI;
use crate::resolution::pattern::ResolutionPattern;

/// A concrete renderer for resolved output
pub trait Materializer: Send + Sync {
    /// Human-readable name, used in logs
    fn name(&self) -> &str;

    /// Whether this materializer can render the pair
    fn supports(&self, pattern: ResolutionPattern, traits: &ManifestationTraits) -> bool;
}

/// Ordered materializer registry
#[derive(Default)]
pub struct MaterializerRegistry {
    entries: Vec<Box<dyn Materializer>>,
}

impl MaterializerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Earlier registrations take precedence
    pub fn register(&mut self, materializer: Box<dyn Materializer>) {
        tracing::debug!("Registered materializer {}", materializer.name());
        self.entries.push(materializer);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find_materializer(
        &self,
        pattern: ResolutionPattern,
        traits: &ManifestationTraits,
    ) -> Option<&dyn Materializer> {
        self.entries
            .iter()
            .find(|m| m.supports(pattern, traits))
            .map(|m| &**m)
    }

    /// Look up the handler for a complete resolved UI
    pub fn find_for(&self, ui: &ResolvedUI) -> Option<&dyn Materializer> {
        let found = self.find_materializer(ui.pattern, &ui.traits);
        if found.is_none() {
            tracing::warn!(
                "No materializer for pattern {} (resolution {})",
                ui.pattern.as_str(),
                ui.resolution_id
            );
        }
        found
    }
}
