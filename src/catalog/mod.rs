mod facets;
mod index;
pub mod normalizer;

pub use facets::{
    CharmFacets,
    FacetSet,
    ItemFacets,
};

pub use index::{
    parse_catalog,
    Catalog,
    LoadMode,
    LoadReport,
    SkippedRecord,
};
