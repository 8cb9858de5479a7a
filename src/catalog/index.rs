use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Reverse;

use super::facets::{CharmFacets, FacetSet, ItemFacets};
use super::normalizer::{classify, CharmBuilder, ItemBuilder, RecordBuilder};
use crate::errors::{CatalogError, Result};
use crate::formatter::{FormatRules, ItemFormatter};
use crate::models::{Charm, EntityKind, FilterOption, Item};
use crate::storage::CatalogPersistence;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
    /// Skip records that fail to normalize and keep the rest.
    #[default]
    Lenient,
    /// Abort the whole kind on the first bad record.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRecord {
    pub id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    /// Records of this kind that were accepted, masterwork merges included.
    pub records: usize,
    pub skipped: Vec<SkippedRecord>,
}

/// Parsed catalog contents for both entity kinds.
pub struct Catalog {
    rules: Box<dyn ItemFormatter>,
    mode: LoadMode,
    items: Vec<Item>,
    charms: Vec<Charm>,
    item_facets: ItemFacets,
    charm_facets: CharmFacets,
    item_report: LoadReport,
    charm_report: LoadReport,
    item_load_failed: bool,
    charm_load_failed: bool,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(FormatRules::default(), LoadMode::default())
    }
}

impl Catalog {
    pub fn new(rules: impl ItemFormatter + 'static, mode: LoadMode) -> Self {
        Self {
            rules: Box::new(rules),
            mode,
            items: Vec::new(),
            charms: Vec::new(),
            item_facets: ItemFacets::default(),
            charm_facets: CharmFacets::default(),
            item_report: LoadReport::default(),
            charm_report: LoadReport::default(),
            item_load_failed: false,
            charm_load_failed: false,
        }
    }

    pub fn load_items(&mut self, store: &dyn CatalogPersistence) -> bool {
        self.load_items_from_str(&store.read_catalog_text())
    }

    pub fn load_charms(&mut self, store: &dyn CatalogPersistence) -> bool {
        self.load_charms_from_str(&store.read_catalog_text())
    }

    pub fn load_all(&mut self, store: &dyn CatalogPersistence) -> bool {
        let raw = store.read_catalog_text();
        self.load_all_from_str(&raw)
    }

    pub fn load_all_from_str(&mut self, raw: &str) -> bool {
        match parse_catalog(raw) {
            Ok(data) => self.load_all_from_map(&data),
            Err(e) => {
                let reason = e.to_string();
                self.finish_item_load(Err(e));
                self.finish_charm_load(Err(CatalogError::ParseError(reason)));
                false
            }
        }
    }

    /// Runs both passes over an already parsed catalog.
    pub fn load_all_from_map(&mut self, data: &Map<String, Value>) -> bool {
        let items = self.item_pass(data);
        let items_ok = self.finish_item_load(items);
        let charms = self.charm_pass(data);
        let charms_ok = self.finish_charm_load(charms);
        items_ok && charms_ok
    }

    /// Rebuilds the item collection; on failure the previous state is kept.
    pub fn load_items_from_str(&mut self, raw: &str) -> bool {
        let result = parse_catalog(raw).and_then(|data| self.item_pass(&data));
        self.finish_item_load(result)
    }

    /// Rebuilds the charm collection; on failure the previous state is kept.
    pub fn load_charms_from_str(&mut self, raw: &str) -> bool {
        let result = parse_catalog(raw).and_then(|data| self.charm_pass(&data));
        self.finish_charm_load(result)
    }

    fn item_pass(&self, data: &Map<String, Value>) -> Result<(Vec<Item>, ItemFacets, LoadReport)> {
        run_pass(data, self.mode, ItemBuilder::new(self.rules.as_ref()))
    }

    fn charm_pass(&self, data: &Map<String, Value>) -> Result<(Vec<Charm>, CharmFacets, LoadReport)> {
        run_pass(data, self.mode, CharmBuilder::new(self.rules.as_ref()))
    }

    fn finish_item_load(&mut self, result: Result<(Vec<Item>, ItemFacets, LoadReport)>) -> bool {
        match result {
            Ok((mut items, facets, report)) => {
                items.sort_by(|a, b| a.name.cmp(&b.name));
                info!(
                    "Loaded {} items from {} records ({} skipped)",
                    items.len(),
                    report.records,
                    report.skipped.len()
                );
                self.items = items;
                self.item_facets = facets;
                self.item_report = report;
                self.item_load_failed = false;
                true
            }
            Err(e) => {
                error!("Item load failed: {}", e);
                self.item_load_failed = true;
                false
            }
        }
    }

    fn finish_charm_load(&mut self, result: Result<(Vec<Charm>, CharmFacets, LoadReport)>) -> bool {
        match result {
            Ok((mut charms, facets, report)) => {
                let rules = self.rules.as_ref();
                // Stable: equal ranks keep catalog order.
                charms.sort_by_key(|charm| Reverse(rules.tier_rank(&charm.tier)));
                info!(
                    "Loaded {} charms ({} skipped)",
                    charms.len(),
                    report.skipped.len()
                );
                self.charms = charms;
                self.charm_facets = facets;
                self.charm_report = report;
                self.charm_load_failed = false;
                true
            }
            Err(e) => {
                error!("Charm load failed: {}", e);
                self.charm_load_failed = true;
                false
            }
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn charms(&self) -> &[Charm] {
        &self.charms
    }

    pub fn item_facets(&self) -> &ItemFacets {
        &self.item_facets
    }

    pub fn charm_facets(&self) -> &CharmFacets {
        &self.charm_facets
    }

    pub fn facet_values(&self, kind: EntityKind, option: FilterOption) -> Option<&FacetSet> {
        match kind {
            EntityKind::Item => self.item_facets.get(option),
            EntityKind::Charm => self.charm_facets.get(option),
        }
    }

    pub fn load_failed(&self, kind: EntityKind) -> bool {
        match kind {
            EntityKind::Item => self.item_load_failed,
            EntityKind::Charm => self.charm_load_failed,
        }
    }

    pub fn report(&self, kind: EntityKind) -> &LoadReport {
        match kind {
            EntityKind::Item => &self.item_report,
            EntityKind::Charm => &self.charm_report,
        }
    }

    pub fn is_empty(&self, kind: EntityKind) -> bool {
        match kind {
            EntityKind::Item => self.items.is_empty(),
            EntityKind::Charm => self.charms.is_empty(),
        }
    }
}

/// Parses catalog text into its top-level id -> record map.
pub fn parse_catalog(raw: &str) -> Result<Map<String, Value>> {
    Ok(serde_json::from_str(raw)?)
}

fn run_pass<B: RecordBuilder>(
    data: &Map<String, Value>,
    mode: LoadMode,
    mut builder: B,
) -> Result<(Vec<B::Entity>, B::Facets, LoadReport)> {
    let kind = builder.kind();
    let mut report = LoadReport::default();

    for (id, record) in data {
        let outcome = match classify(record) {
            Ok(record_kind) if record_kind == kind => builder.add(record).map(|_| true),
            Ok(_) => Ok(false),
            // Unclassifiable records belong to the item pass alone.
            Err(_) if kind != EntityKind::Item => Ok(false),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(true) => report.records += 1,
            Ok(false) => {}
            Err(e) => match mode {
                LoadMode::Strict => {
                    return Err(CatalogError::ParseError(format!("record {}: {}", id, e)));
                }
                LoadMode::Lenient => {
                    warn!("Skipping {:?} record {}: {}", kind, id, e);
                    report.skipped.push(SkippedRecord {
                        id: id.clone(),
                        reason: e.to_string(),
                    });
                }
            },
        }
    }

    let (entities, facets) = builder.finish();
    Ok((entities, facets, report))
}
