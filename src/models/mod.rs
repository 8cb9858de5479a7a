pub mod charm;
pub mod filter;
pub mod item;
pub mod raw_record;

pub use charm::{
    Charm,
    CharmStat,
};

pub use filter::{
    Comparator,
    EntityKind,
    Filter,
    FilterOption,
};

pub use item::{
    Item,
    StatSet,
};

pub use raw_record::{
    RawCharm,
    RawItem,
    CHARM_TYPE,
};
