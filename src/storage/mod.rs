mod catalog_store;

pub use catalog_store::{
    CatalogPersistence,
    FileCatalogStore,
    MemoryCatalogStore,
    EMPTY_CATALOG,
};
