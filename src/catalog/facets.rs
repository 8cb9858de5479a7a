use indexmap::IndexSet;
use serde::Serialize;

use crate::models::FilterOption;

/// Distinct values in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FacetSet(IndexSet<String>);

impl FacetSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the value was already present.
    pub fn insert(&mut self, value: &str) -> bool {
        if self.0.contains(value) {
            return false;
        }
        self.0.insert(value.to_string())
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.contains(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemFacets {
    pub types: FacetSet,
    pub regions: FacetSet,
    pub tiers: FacetSet,
    pub locations: FacetSet,
    pub stats: FacetSet,
    pub base_items: FacetSet,
}

impl ItemFacets {
    pub fn get(&self, option: FilterOption) -> Option<&FacetSet> {
        match option {
            FilterOption::Type => Some(&self.types),
            FilterOption::Region => Some(&self.regions),
            FilterOption::Tier => Some(&self.tiers),
            FilterOption::Location => Some(&self.locations),
            FilterOption::Stat => Some(&self.stats),
            FilterOption::BaseItem => Some(&self.base_items),
            FilterOption::Class | FilterOption::SkillModifier | FilterOption::Power => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CharmFacets {
    pub regions: FacetSet,
    pub tiers: FacetSet,
    pub locations: FacetSet,
    pub skill_mods: FacetSet,
    pub classes: FacetSet,
    pub stats: FacetSet,
    pub base_items: FacetSet,
}

impl CharmFacets {
    pub fn get(&self, option: FilterOption) -> Option<&FacetSet> {
        match option {
            FilterOption::Region => Some(&self.regions),
            FilterOption::Tier => Some(&self.tiers),
            FilterOption::Location => Some(&self.locations),
            FilterOption::SkillModifier => Some(&self.skill_mods),
            FilterOption::Class => Some(&self.classes),
            FilterOption::Stat => Some(&self.stats),
            FilterOption::BaseItem => Some(&self.base_items),
            FilterOption::Type | FilterOption::Power => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facet_set_keeps_first_seen_order() {
        let mut set = FacetSet::new();
        assert!(set.insert("Sword"));
        assert!(set.insert("Axe"));
        assert!(!set.insert("Sword"));
        assert!(set.insert("Bow"));

        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["Sword", "Axe", "Bow"]);
        assert_eq!(set.len(), 3);
        assert!(set.contains("Axe"));
    }

    #[test]
    fn test_facet_lookup_by_option() {
        let mut facets = CharmFacets::default();
        facets.classes.insert("Mage");

        assert_eq!(facets.get(FilterOption::Class).map(FacetSet::len), Some(1));
        assert!(facets.get(FilterOption::Power).is_none());
        assert!(ItemFacets::default().get(FilterOption::SkillModifier).is_none());
    }
}
