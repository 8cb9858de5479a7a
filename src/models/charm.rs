use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharmStat {
    pub key: String,
    pub skill_modifier: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Charm {
    pub name: String,
    pub region: String,
    pub location: String,
    pub tier: String,
    pub power: i64,
    pub class_name: String,
    pub base_item: String,
    pub stats: Vec<CharmStat>,
}

impl Charm {
    pub fn has_stat(&self, key: &str) -> bool {
        self.stats.iter().any(|s| s.key == key)
    }

    pub fn stat(&self, key: &str) -> Option<f64> {
        self.stats.iter().find(|s| s.key == key).map(|s| s.value)
    }

    pub fn has_skill_modifier(&self, skill: &str) -> bool {
        self.stats.iter().any(|s| s.skill_modifier == skill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charm_stat_lookups() {
        let charm = Charm {
            name: "Wrathful Idol".to_string(),
            region: "Architect's Ring".to_string(),
            location: "Forum".to_string(),
            tier: "Rare".to_string(),
            power: 2,
            class_name: "Warlock".to_string(),
            base_item: "TOTEM_OF_UNDYING".to_string(),
            stats: vec![CharmStat {
                key: "earthen_wrath_damage_percent".to_string(),
                skill_modifier: "Earthen Wrath".to_string(),
                value: 12.5,
            }],
        };

        assert!(charm.has_stat("earthen_wrath_damage_percent"));
        assert_eq!(charm.stat("earthen_wrath_damage_percent"), Some(12.5));
        assert!(charm.has_skill_modifier("Earthen Wrath"));
        assert!(!charm.has_skill_modifier("Hex"));
        assert_eq!(charm.stat("missing"), None);
    }
}
