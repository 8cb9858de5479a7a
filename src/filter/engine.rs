use std::cmp::Ordering;

use super::{Attribute, Filterable};
use crate::models::{Comparator, Filter, FilterOption};

/// Whether `entity` survives `filter`. Inactive filters and comparators the
/// option does not support keep everything.
pub fn retains<T: Filterable>(entity: &T, filter: &Filter) -> bool {
    let Some(comparator) = filter.comparator() else {
        return true;
    };
    if !filter.is_active() {
        return true;
    }

    if filter.option == FilterOption::Stat {
        let stat = entity.stat(&filter.value);
        return match comparator {
            Comparator::Has => stat.is_some(),
            Comparator::NotHas => stat.is_none(),
            ordering => stat
                .and_then(|value| ordering.compare(value, filter.constant))
                .unwrap_or(false),
        };
    }

    let matches = match entity.attribute(filter.option) {
        Attribute::Text(actual) => actual == Some(filter.value.as_str()),
        Attribute::Labels(labels) => labels.contains(&filter.value.as_str()),
        Attribute::Number(actual) => {
            return comparator.compare(actual, filter.constant).unwrap_or(true);
        }
        Attribute::Unsupported => return true,
    };

    match comparator {
        Comparator::Has => matches,
        Comparator::NotHas => !matches,
        _ => true,
    }
}

/// Filters `entities` without touching them: every filter in order, then the
/// name substring, then a stable sort on the stat filters' values.
pub fn apply<'a, T: Filterable>(
    entities: &'a [T],
    filters: &[Filter],
    name_filter: Option<&str>,
) -> Vec<&'a T> {
    let mut view: Vec<&T> = entities.iter().collect();

    for filter in filters {
        view.retain(|entity| retains(*entity, filter));
    }

    if let Some(needle) = name_filter {
        let needle = needle.to_lowercase();
        view.retain(|entity| entity.name().to_lowercase().contains(&needle));
    }

    let stat_filters: Vec<&Filter> = filters
        .iter()
        .filter(|f| f.option == FilterOption::Stat)
        .collect();
    if !stat_filters.is_empty() {
        view.sort_by(|a, b| compare_by_stats(*a, *b, &stat_filters));
    }

    view
}

// Higher values first; the first stat filter that differs decides.
fn compare_by_stats<T: Filterable>(a: &T, b: &T, stat_filters: &[&Filter]) -> Ordering {
    for filter in stat_filters {
        let delta = b.stat(&filter.value).unwrap_or(0.0) - a.stat(&filter.value).unwrap_or(0.0);
        if delta > 0.0 {
            return Ordering::Greater;
        }
        if delta < 0.0 {
            return Ordering::Less;
        }
    }
    Ordering::Equal
}

/// Filter list and name filter for one entity kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<Filter>,
    pub name_filter: Option<String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_filters(&mut self, filters: Vec<Filter>) {
        self.filters = filters;
    }

    pub fn reset_filters(&mut self) {
        self.filters.clear();
    }

    pub fn set_name_filter(&mut self, name: Option<String>) {
        self.name_filter = name;
    }

    pub fn clear_name_filter(&mut self) {
        self.name_filter = None;
    }

    pub fn apply<'a, T: Filterable>(&self, entities: &'a [T]) -> Vec<&'a T> {
        apply(entities, &self.filters, self.name_filter.as_deref())
    }
}
