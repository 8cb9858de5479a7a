use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Lookup rules the normalizer and the charm sort depend on.
pub trait ItemFormatter {
    fn is_hidden_stat(&self, key: &str) -> bool;
    fn skill_modifier_for(&self, charm_stat: &str) -> String;
    fn max_masterwork_for_tier(&self, tier: &str) -> usize;
    fn tier_rank(&self, tier: &str) -> i32;
    fn charm_region(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatRules {
    pub hidden_stats: Vec<String>,
    pub skill_suffixes: Vec<String>,
    pub tier_order: Vec<String>,
    pub charm_region: String,
    // Last so TOML output keeps plain values ahead of this table.
    pub masterwork_tiers: IndexMap<String, usize>,
}

impl Default for FormatRules {
    fn default() -> Self {
        let strings = |values: &[&str]| values.iter().map(|v| v.to_string()).collect::<Vec<_>>();

        Self {
            hidden_stats: strings(&[
                "mainhand",
                "offhand",
                "hide_info",
                "hide_enchants",
                "curse_of_vanishing",
            ]),
            skill_suffixes: strings(&[
                "damage", "cooldown", "radius", "duration", "range", "heal", "healing",
                "percent", "flat", "charges", "stacks", "speed", "amplifier", "potency",
                "knockback", "chance", "size", "width", "multiplier", "reduction",
            ]),
            tier_order: strings(&[
                "Common", "Uncommon", "Rare", "Artifact", "Epic", "Legendary", "Unique",
                "Patron", "Event", "Currency", "Event Currency",
            ]),
            charm_region: "Architect's Ring".to_string(),
            masterwork_tiers: [("Rare", 2), ("Artifact", 3), ("Epic", 3), ("Legendary", 4)]
                .into_iter()
                .map(|(tier, max)| (tier.to_string(), max))
                .collect(),
        }
    }
}

impl ItemFormatter for FormatRules {
    fn is_hidden_stat(&self, key: &str) -> bool {
        self.hidden_stats.iter().any(|hidden| hidden == key)
    }

    fn skill_modifier_for(&self, charm_stat: &str) -> String {
        let mut tokens: Vec<&str> = charm_stat.split('_').filter(|t| !t.is_empty()).collect();
        while tokens.len() > 1 {
            let last = tokens[tokens.len() - 1];
            if !self.skill_suffixes.iter().any(|s| s.eq_ignore_ascii_case(last)) {
                break;
            }
            tokens.pop();
        }
        tokens.iter().map(|t| title_case(t)).collect::<Vec<_>>().join(" ")
    }

    fn max_masterwork_for_tier(&self, tier: &str) -> usize {
        self.masterwork_tiers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(tier))
            .map(|(_, max)| *max)
            .unwrap_or(0)
    }

    fn tier_rank(&self, tier: &str) -> i32 {
        self.tier_order
            .iter()
            .position(|name| name.eq_ignore_ascii_case(tier))
            .map(|idx| idx as i32 + 1)
            .unwrap_or(0)
    }

    fn charm_region(&self) -> &str {
        &self.charm_region
    }
}

fn title_case(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// `event_CURRENCY` -> `Event Currency`
pub fn format_item_tier(raw: &str) -> String {
    raw.replace('_', " ")
        .split_whitespace()
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Charm tiers keep their casing; only underscores become spaces.
pub fn format_charm_tier(raw: &str) -> String {
    raw.replace('_', " ")
}
