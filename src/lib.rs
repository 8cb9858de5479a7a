pub mod catalog;
pub mod config;
pub mod dictionary;
pub mod errors;
pub mod fetcher;
pub mod filter;
pub mod formatter;
pub mod models;
pub mod storage;

pub use catalog::{Catalog, LoadMode};
pub use config::Config;
pub use dictionary::Dictionary;
pub use errors::{CatalogError, Result};
pub use models::{Charm, EntityKind, Filter, FilterOption, Item};
