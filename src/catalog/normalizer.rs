use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use super::facets::{CharmFacets, ItemFacets};
use crate::errors::{CatalogError, Result};
use crate::formatter::{format_charm_tier, format_item_tier, ItemFormatter};
use crate::models::{Charm, CharmStat, EntityKind, Item, RawCharm, RawItem, StatSet, CHARM_TYPE};

/// Routes a record by its `type` field.
pub fn classify(record: &Value) -> Result<EntityKind> {
    let record_type = record
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| CatalogError::ParseError("record has no string `type` field".to_string()))?;

    if record_type == CHARM_TYPE {
        Ok(EntityKind::Charm)
    } else {
        Ok(EntityKind::Item)
    }
}

/// Accumulates one kind's entities and facets over a catalog pass.
pub trait RecordBuilder {
    type Entity;
    type Facets;

    fn kind(&self) -> EntityKind;

    /// Must leave the builder untouched when it returns an error.
    fn add(&mut self, record: &Value) -> Result<()>;

    fn finish(self) -> (Vec<Self::Entity>, Self::Facets);
}

pub struct ItemBuilder<'a> {
    rules: &'a dyn ItemFormatter,
    items: Vec<Item>,
    by_name: HashMap<String, usize>,
    facets: ItemFacets,
}

impl<'a> ItemBuilder<'a> {
    pub fn new(rules: &'a dyn ItemFormatter) -> Self {
        Self {
            rules,
            items: Vec::new(),
            by_name: HashMap::new(),
            facets: ItemFacets::default(),
        }
    }

    fn record_facets(&mut self, raw: &RawItem, tier: Option<&str>, stats: &StatSet) {
        self.facets.types.insert(&raw.item_type);
        if let Some(region) = &raw.region {
            self.facets.regions.insert(region);
        }
        if let Some(tier) = tier {
            self.facets.tiers.insert(tier);
        }
        if let Some(location) = &raw.location {
            self.facets.locations.insert(location);
        }
        self.facets.base_items.insert(&raw.base_item);
        for key in stats.keys() {
            self.facets.stats.insert(key);
        }
    }
}

impl RecordBuilder for ItemBuilder<'_> {
    type Entity = Item;
    type Facets = ItemFacets;

    fn kind(&self) -> EntityKind {
        EntityKind::Item
    }

    fn add(&mut self, record: &Value) -> Result<()> {
        let raw = RawItem::deserialize(record)?;

        let tier = raw.tier.as_deref().map(format_item_tier);
        let stats: StatSet = raw
            .stats
            .iter()
            .filter(|(key, _)| !self.rules.is_hidden_stat(key))
            .map(|(key, value)| (key.clone(), *value))
            .collect();

        let max_masterwork = self.rules.max_masterwork_for_tier(tier.as_deref().unwrap_or(""));
        let existing = self.by_name.get(&raw.name).copied();

        if let Some(level) = raw.masterwork {
            // A merge target already sized by an earlier masterwork record
            // keeps its size; anything else is sized for this record's tier.
            let max_level = match existing.map(|idx| &self.items[idx]) {
                Some(item) if item.masterwork => item.max_masterwork(),
                _ => max_masterwork,
            };
            if level > max_level {
                return Err(CatalogError::ParseError(format!(
                    "masterwork level {} is past max level {} for tier {}",
                    level,
                    max_level,
                    tier.as_deref().unwrap_or("(none)")
                )));
            }
        }

        self.record_facets(&raw, tier.as_deref(), &stats);

        if let (Some(level), Some(idx)) = (raw.masterwork, existing) {
            let item = &mut self.items[idx];
            item.enable_masterwork(max_masterwork);
            item.add_masterwork_tier(level, stats)?;
            return Ok(());
        }

        let mut item = Item::new(raw.name, raw.item_type, raw.base_item);
        item.region = raw.region;
        item.tier = tier;
        item.location = raw.location;
        item.fish_quality = raw.fish_quality;
        item.lore = raw.lore.unwrap_or_default();
        let item = match raw.masterwork {
            Some(level) => item.with_masterwork(max_masterwork, level, stats)?,
            None => item.with_stats(stats),
        };

        self.by_name.entry(item.name.clone()).or_insert(self.items.len());
        self.items.push(item);
        Ok(())
    }

    fn finish(self) -> (Vec<Item>, ItemFacets) {
        (self.items, self.facets)
    }
}

pub struct CharmBuilder<'a> {
    rules: &'a dyn ItemFormatter,
    charms: Vec<Charm>,
    facets: CharmFacets,
}

impl<'a> CharmBuilder<'a> {
    pub fn new(rules: &'a dyn ItemFormatter) -> Self {
        Self {
            rules,
            charms: Vec::new(),
            facets: CharmFacets::default(),
        }
    }
}

impl RecordBuilder for CharmBuilder<'_> {
    type Entity = Charm;
    type Facets = CharmFacets;

    fn kind(&self) -> EntityKind {
        EntityKind::Charm
    }

    fn add(&mut self, record: &Value) -> Result<()> {
        let raw = RawCharm::deserialize(record)?;

        let region = self.rules.charm_region().to_string();
        let tier = format_charm_tier(&raw.tier);

        self.facets.regions.insert(&region);
        self.facets.locations.insert(&raw.location);
        self.facets.tiers.insert(&tier);
        self.facets.classes.insert(&raw.class_name);
        self.facets.base_items.insert(&raw.base_item);

        let mut stats = Vec::with_capacity(raw.stats.len());
        for (key, value) in raw.stats {
            let skill_modifier = self.rules.skill_modifier_for(&key);
            self.facets.skill_mods.insert(&skill_modifier);
            self.facets.stats.insert(&key);
            stats.push(CharmStat {
                key,
                skill_modifier,
                value,
            });
        }

        self.charms.push(Charm {
            name: raw.name,
            region,
            location: raw.location,
            tier,
            power: raw.power,
            class_name: raw.class_name,
            base_item: raw.base_item,
            stats,
        });
        Ok(())
    }

    fn finish(self) -> (Vec<Charm>, CharmFacets) {
        (self.charms, self.facets)
    }
}
