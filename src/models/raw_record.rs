use indexmap::IndexMap;
use serde::Deserialize;

/// `type` value that routes a record to the charm pass.
pub const CHARM_TYPE: &str = "Charm";

#[derive(Debug, Deserialize)]
pub struct RawItem {
    #[serde(rename = "type")]
    pub item_type: String,
    pub name: String,
    pub base_item: String,
    pub stats: IndexMap<String, f64>,
    pub region: Option<String>,
    pub tier: Option<String>,
    pub location: Option<String>,
    pub fish_quality: Option<i32>,
    pub masterwork: Option<usize>,
    pub lore: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawCharm {
    pub name: String,
    pub base_item: String,
    pub stats: IndexMap<String, f64>,
    pub location: String,
    pub tier: String,
    pub power: i64,
    pub class_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_item_optional_fields() {
        let raw: RawItem = serde_json::from_str(
            r#"{"type":"Sword","name":"Excalibur","base_item":"DIAMOND_SWORD","stats":{"strength":5}}"#,
        )
        .unwrap();

        assert_eq!(raw.item_type, "Sword");
        assert_eq!(raw.stats.get("strength"), Some(&5.0));
        assert!(raw.tier.is_none());
        assert!(raw.masterwork.is_none());
    }

    #[test]
    fn test_raw_charm_requires_power() {
        let result = serde_json::from_str::<RawCharm>(
            r#"{"type":"Charm","name":"Hexed","base_item":"BOOK","stats":{},"location":"Hub","tier":"Rare","class_name":"Alchemist"}"#,
        );
        assert!(result.is_err());
    }
}
