//! The `ResolvedUI` contract handed to the rendering layer

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::affinity::traits::ManifestationTraits;
use crate::core::types::ResolutionId;
use crate::resolution::pattern::ResolutionPattern;
use crate::resolution::types::{Manifestation, Resolution};

/// Everything a materializer receives; nothing else crosses the boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedUI {
    pub pattern: ResolutionPattern,
    pub class_name: String,
    pub style: BTreeMap<String, String>,
    pub aria: BTreeMap<String, String>,
    pub data: BTreeMap<String, String>,
    pub traits: ManifestationTraits,
    pub resolution_id: ResolutionId,
}

impl ResolvedUI {
    pub fn from_manifestation(manifestation: &Manifestation, resolution_id: ResolutionId) -> Self {
        Self {
            pattern: manifestation.pattern,
            class_name: manifestation.render.class_name(),
            style: manifestation.render.styles.clone(),
            aria: manifestation.render.aria.clone(),
            data: manifestation.render.data_attributes.clone(),
            traits: manifestation.traits,
            resolution_id,
        }
    }
}

impl Resolution {
    /// Project the selected manifestation onto the rendering contract
    pub fn to_resolved_ui(&self) -> ResolvedUI {
        ResolvedUI::from_manifestation(&self.manifestation, self.id)
    }

    /// Same projection for every alternative, in ranked order
    pub fn alternative_uis(&self) -> Vec<ResolvedUI> {
        self.alternatives
            .iter()
            .map(|m| ResolvedUI::from_manifestation(m, self.id))
            .collect()
    }
}
