use indexmap::IndexMap;
use serde::Serialize;

use crate::errors::{CatalogError, Result};

/// Stat key -> value for one masterwork level.
pub type StatSet = IndexMap<String, f64>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub name: String,
    pub item_type: String,
    pub region: Option<String>,
    pub tier: Option<String>,
    pub location: Option<String>,
    pub fish_quality: Option<i32>,
    pub base_item: String,
    pub lore: String,
    pub masterwork: bool,
    // Indexed by masterwork level; `None` for levels not yet revealed.
    pub stats: Vec<Option<StatSet>>,
}

impl Item {
    pub fn new(name: String, item_type: String, base_item: String) -> Self {
        Self {
            name,
            item_type,
            region: None,
            tier: None,
            location: None,
            fish_quality: None,
            base_item,
            lore: String::new(),
            masterwork: false,
            stats: vec![Some(StatSet::new())],
        }
    }

    pub fn with_tier(mut self, tier: impl Into<String>) -> Self {
        self.tier = Some(tier.into());
        self
    }

    pub fn with_stats(mut self, stats: StatSet) -> Self {
        self.stats = vec![Some(stats)];
        self
    }

    /// Sizes the level sequence for `max_level` and places `stats` at `level`.
    pub fn with_masterwork(mut self, max_level: usize, level: usize, stats: StatSet) -> Result<Self> {
        self.masterwork = true;
        self.stats = vec![None; max_level + 1];
        self.add_masterwork_tier(level, stats)?;
        Ok(self)
    }

    /// Turns a plain item into a masterwork one sized for `max_level`,
    /// keeping its current stats at level 0.
    pub fn enable_masterwork(&mut self, max_level: usize) {
        if self.masterwork {
            return;
        }
        self.masterwork = true;
        if self.stats.len() <= max_level {
            self.stats.resize(max_level + 1, None);
        }
    }

    /// Never grows the sequence; a level past `max_masterwork` is an error.
    pub fn add_masterwork_tier(&mut self, level: usize, stats: StatSet) -> Result<()> {
        let max = self.max_masterwork();
        let slot = self.stats.get_mut(level).ok_or_else(|| {
            CatalogError::ParseError(format!(
                "masterwork level {} is past max level {} for {}",
                level, max, self.name
            ))
        })?;
        *slot = Some(stats);
        Ok(())
    }

    pub fn has_tier(&self) -> bool {
        self.tier.is_some()
    }

    pub fn has_region(&self) -> bool {
        self.region.is_some()
    }

    pub fn is_fish(&self) -> bool {
        self.fish_quality.is_some()
    }

    pub fn max_masterwork(&self) -> usize {
        self.stats.len().saturating_sub(1)
    }

    pub fn masterwork_levels(&self) -> Vec<usize> {
        self.stats
            .iter()
            .enumerate()
            .filter_map(|(level, slot)| slot.as_ref().map(|_| level))
            .collect()
    }

    pub fn stats_at(&self, level: usize) -> Option<&StatSet> {
        self.stats.get(level).and_then(Option::as_ref)
    }

    /// The lowest revealed level; the only level for non-masterwork items.
    pub fn base_stats(&self) -> Option<&StatSet> {
        self.stats.iter().find_map(Option::as_ref)
    }

    pub fn has_stat(&self, key: &str) -> bool {
        self.base_stats().is_some_and(|stats| stats.contains_key(key))
    }

    pub fn stat(&self, key: &str) -> Option<f64> {
        self.base_stats().and_then(|stats| stats.get(key).copied())
    }
}
