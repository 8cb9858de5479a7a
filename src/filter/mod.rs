mod engine;

pub use engine::{apply, retains, Query};

use crate::models::{Charm, FilterOption, Item};

/// What an entity exposes for a non-stat filter option.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute<'a> {
    /// Single text field; `None` when the entity lacks it.
    Text(Option<&'a str>),
    /// Several labels; the filter matches if any label equals its value.
    Labels(Vec<&'a str>),
    Number(f64),
    Unsupported,
}

pub trait Filterable {
    fn name(&self) -> &str;
    fn stat(&self, key: &str) -> Option<f64>;
    fn attribute(&self, option: FilterOption) -> Attribute<'_>;
}

impl Filterable for Item {
    fn name(&self) -> &str {
        &self.name
    }

    fn stat(&self, key: &str) -> Option<f64> {
        Item::stat(self, key)
    }

    fn attribute(&self, option: FilterOption) -> Attribute<'_> {
        match option {
            FilterOption::Tier => Attribute::Text(self.tier.as_deref()),
            FilterOption::Region => Attribute::Text(self.region.as_deref()),
            FilterOption::Type => Attribute::Text(Some(&self.item_type)),
            FilterOption::Location => Attribute::Text(self.location.as_deref()),
            FilterOption::BaseItem => Attribute::Text(Some(&self.base_item)),
            FilterOption::Stat
            | FilterOption::Class
            | FilterOption::SkillModifier
            | FilterOption::Power => Attribute::Unsupported,
        }
    }
}

impl Filterable for Charm {
    fn name(&self) -> &str {
        &self.name
    }

    fn stat(&self, key: &str) -> Option<f64> {
        Charm::stat(self, key)
    }

    fn attribute(&self, option: FilterOption) -> Attribute<'_> {
        match option {
            FilterOption::Tier => Attribute::Text(Some(&self.tier)),
            FilterOption::Region => Attribute::Text(Some(&self.region)),
            FilterOption::Location => Attribute::Text(Some(&self.location)),
            FilterOption::BaseItem => Attribute::Text(Some(&self.base_item)),
            FilterOption::Class => Attribute::Text(Some(&self.class_name)),
            FilterOption::SkillModifier => {
                Attribute::Labels(self.stats.iter().map(|s| s.skill_modifier.as_str()).collect())
            }
            FilterOption::Power => Attribute::Number(self.power as f64),
            FilterOption::Stat | FilterOption::Type => Attribute::Unsupported,
        }
    }
}
