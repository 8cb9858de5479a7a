use tokio::runtime::Handle;

use crate::catalog::{Catalog, FacetSet, LoadReport};
use crate::config::Config;
use crate::fetcher::{CatalogFetcher, CatalogRefresher, RefreshOutcome, RefreshRequest};
use crate::filter::Query;
use crate::models::{Charm, EntityKind, Filter, FilterOption, Item};
use crate::storage::{CatalogPersistence, FileCatalogStore};

/// Entry point for a presentation layer: one catalog, one refresher and the
/// current query for each entity kind. All methods run on the owner thread.
pub struct Dictionary<F> {
    store: Box<dyn CatalogPersistence>,
    catalog: Catalog,
    refresher: CatalogRefresher<F>,
    item_query: Query,
    charm_query: Query,
}

impl<F: CatalogFetcher> Dictionary<F> {
    /// Loads whatever catalog the store already holds.
    pub fn new(store: Box<dyn CatalogPersistence>, catalog: Catalog, refresher: CatalogRefresher<F>) -> Self {
        let mut dictionary = Self {
            store,
            catalog,
            refresher,
            item_query: Query::new(),
            charm_query: Query::new(),
        };
        dictionary.reload();
        dictionary
    }

    pub fn from_config(config: &Config, fetcher: F, runtime: Handle) -> Self {
        let store = FileCatalogStore::new(&config.storage.catalog_path);
        let catalog = Catalog::new(config.formatting.clone(), config.loading.mode);
        let refresher = CatalogRefresher::new(fetcher, config.api.url.clone(), runtime);
        Self::new(Box::new(store), catalog, refresher)
    }

    /// Re-reads the stored catalog text into both collections.
    pub fn reload(&mut self) -> bool {
        self.catalog.load_all(self.store.as_ref())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn facet_values(&self, kind: EntityKind, option: FilterOption) -> Option<&FacetSet> {
        self.catalog.facet_values(kind, option)
    }

    pub fn query(&self, kind: EntityKind) -> &Query {
        match kind {
            EntityKind::Item => &self.item_query,
            EntityKind::Charm => &self.charm_query,
        }
    }

    fn query_mut(&mut self, kind: EntityKind) -> &mut Query {
        match kind {
            EntityKind::Item => &mut self.item_query,
            EntityKind::Charm => &mut self.charm_query,
        }
    }

    pub fn set_filters(&mut self, kind: EntityKind, filters: Vec<Filter>) {
        self.query_mut(kind).set_filters(filters);
    }

    pub fn reset_filters(&mut self, kind: EntityKind) {
        self.query_mut(kind).reset_filters();
    }

    pub fn set_name_filter(&mut self, kind: EntityKind, name: Option<String>) {
        self.query_mut(kind).set_name_filter(name);
    }

    pub fn refresh_items(&self) -> Vec<&Item> {
        self.item_query.apply(self.catalog.items())
    }

    pub fn refresh_charms(&self) -> Vec<&Charm> {
        self.charm_query.apply(self.catalog.charms())
    }

    pub fn load_failed(&self, kind: EntityKind) -> bool {
        self.catalog.load_failed(kind)
    }

    pub fn load_report(&self, kind: EntityKind) -> &LoadReport {
        self.catalog.report(kind)
    }

    pub fn is_fetching(&self) -> bool {
        self.refresher.is_fetching()
    }

    pub fn request_catalog_refresh(&mut self) -> RefreshRequest {
        self.refresher.request_refresh()
    }

    /// Call once per frame; yields the refresh outcome when it lands.
    pub fn tick(&mut self) -> Option<RefreshOutcome> {
        self.refresher.tick(self.store.as_ref(), &mut self.catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LoadMode;
    use crate::fetcher::StaticFetcher;
    use crate::formatter::FormatRules;
    use crate::models::Comparator;
    use crate::storage::MemoryCatalogStore;

    const STORED: &str = r#"{
        "a": {"type": "Sword", "name": "Excalibur", "base_item": "DIAMOND_SWORD", "tier": "rare", "stats": {"strength": 5}},
        "b": {"type": "Axe", "name": "Axiom", "base_item": "IRON_AXE", "tier": "epic", "stats": {"strength": 9, "agility": 1}},
        "c": {"type": "Charm", "name": "Hexed Doll", "base_item": "BOOK", "location": "Forum", "tier": "Rare", "power": 1, "class_name": "Warlock", "stats": {"hex_cooldown": -5}}
    }"#;

    const FETCHED: &str = r#"{
        "z": {"type": "Bow", "name": "Longshot", "base_item": "BOW", "stats": {"speed": 2}}
    }"#;

    fn dictionary(stored: &str, fetcher: StaticFetcher) -> Dictionary<StaticFetcher> {
        let store = MemoryCatalogStore::with_text(stored);
        let catalog = Catalog::new(FormatRules::default(), LoadMode::Lenient);
        let refresher = CatalogRefresher::new(fetcher, "http://catalog.test/items", Handle::current());
        Dictionary::new(Box::new(store), catalog, refresher)
    }

    #[tokio::test]
    async fn test_construction_loads_stored_catalog() {
        let dict = dictionary(STORED, StaticFetcher::ok(FETCHED));

        assert_eq!(dict.refresh_items().len(), 2);
        assert_eq!(dict.refresh_charms().len(), 1);
        let types = dict.facet_values(EntityKind::Item, FilterOption::Type).unwrap();
        assert_eq!(types.to_vec(), vec!["Sword", "Axe"]);
        assert!(!dict.load_failed(EntityKind::Item));
    }

    #[tokio::test]
    async fn test_queries_are_kept_per_kind() {
        let mut dict = dictionary(STORED, StaticFetcher::ok(FETCHED));

        dict.set_filters(
            EntityKind::Item,
            vec![Filter::new(FilterOption::Stat, Comparator::Has, "strength")],
        );
        let names: Vec<_> = dict.refresh_items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Axiom", "Excalibur"]);
        assert_eq!(dict.refresh_charms().len(), 1);

        dict.set_name_filter(EntityKind::Item, Some("EXC".to_string()));
        assert_eq!(dict.refresh_items().len(), 1);

        dict.reset_filters(EntityKind::Item);
        dict.set_name_filter(EntityKind::Item, None);
        assert_eq!(dict.refresh_items().len(), 2);
        assert!(dict.query(EntityKind::Charm).filters.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_swaps_in_fetched_catalog() {
        let mut dict = dictionary(STORED, StaticFetcher::ok(FETCHED));

        assert_eq!(dict.request_catalog_refresh(), RefreshRequest::Started);
        assert!(dict.is_fetching());

        let mut outcome = None;
        for _ in 0..1000 {
            outcome = dict.tick();
            if outcome.is_some() {
                break;
            }
            tokio::task::yield_now().await;
        }

        assert!(matches!(outcome, Some(RefreshOutcome::Updated { items: 1, charms: 0 })));
        assert_eq!(dict.refresh_items()[0].name, "Longshot");
        assert!(dict.catalog().is_empty(EntityKind::Charm));
        assert!(!dict.is_fetching());
    }

    #[tokio::test]
    async fn test_unreadable_store_starts_empty() {
        let dict = dictionary("not json", StaticFetcher::failing());

        assert!(dict.refresh_items().is_empty());
        assert!(dict.load_failed(EntityKind::Item));
        assert!(dict.load_failed(EntityKind::Charm));
        assert!(dict.load_report(EntityKind::Item).skipped.is_empty());
    }
}
