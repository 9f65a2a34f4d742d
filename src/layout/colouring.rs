use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::log::{aggregate::GroupKey, entry::Entry};

use super::primitives::ColourRef;

/// Which palette decides the colour of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColourMode {
    #[default]
    Sector,
    Project,
    None,
}

/// Resolves colour references for entries and groups. Names missing from a palette fall back to
/// the UI colour.
#[derive(Debug, Clone, PartialEq)]
pub struct Colouring {
    pub mode: ColourMode,
    pub sectors: HashMap<String, String>,
    pub projects: HashMap<String, String>,
    pub fallback: ColourRef,
    /// Marks the highlighted bucket of a chart.
    pub accent: ColourRef,
}

impl Colouring {
    /// Every block gets `colour`.
    pub fn plain(colour: &str) -> Self {
        Self {
            mode: ColourMode::None,
            sectors: HashMap::new(),
            projects: HashMap::new(),
            fallback: ColourRef::new(colour),
            accent: ColourRef::new(colour),
        }
    }

    /// Colour of a chart bucket: the accent for the highlighted one, the UI colour otherwise.
    pub fn bucket(&self, highlighted: bool) -> ColourRef {
        if highlighted {
            self.accent.clone()
        } else {
            self.fallback.clone()
        }
    }

    pub fn entry(&self, entry: &Entry) -> ColourRef {
        match self.mode {
            ColourMode::Sector => self.lookup(GroupKey::Sector, &entry.sector),
            ColourMode::Project => self.lookup(GroupKey::Project, &entry.project),
            ColourMode::None => self.fallback.clone(),
        }
    }

    /// Colour of a group in grouped views. The palette is picked by `key`, the mode only decides
    /// whether palettes apply at all.
    pub fn group(&self, key: GroupKey, name: &str) -> ColourRef {
        match self.mode {
            ColourMode::None => self.fallback.clone(),
            ColourMode::Sector | ColourMode::Project => self.lookup(key, name),
        }
    }

    fn lookup(&self, key: GroupKey, name: &str) -> ColourRef {
        let palette = match key {
            GroupKey::Sector => &self.sectors,
            GroupKey::Project => &self.projects,
        };
        palette
            .get(name)
            .map(|v| ColourRef::new(v.as_str()))
            .unwrap_or_else(|| self.fallback.clone())
    }
}
