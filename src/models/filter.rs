use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CatalogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Item,
    Charm,
}

impl FromStr for EntityKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "item" | "items" => Ok(EntityKind::Item),
            "charm" | "charms" => Ok(EntityKind::Charm),
            other => Err(CatalogError::ParseError(format!("unknown entity kind: {}", other))),
        }
    }
}

/// The facet a filter inspects; also names the facet value sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOption {
    Stat,
    Tier,
    Region,
    Type,
    Location,
    BaseItem,
    Class,
    SkillModifier,
    Power,
}

impl FilterOption {
    /// Numeric-only options compare against `constant` and ignore `value`.
    pub fn is_numeric_only(&self) -> bool {
        matches!(self, FilterOption::Power)
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilterOption::Stat => "Stat",
            FilterOption::Tier => "Tier",
            FilterOption::Region => "Region",
            FilterOption::Type => "Type",
            FilterOption::Location => "Location",
            FilterOption::BaseItem => "Base Item",
            FilterOption::Class => "Class",
            FilterOption::SkillModifier => "Skill Modifier",
            FilterOption::Power => "Charm Power",
        }
    }
}

impl fmt::Display for FilterOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FilterOption {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "stat" | "stats" => Ok(FilterOption::Stat),
            "tier" | "tiers" => Ok(FilterOption::Tier),
            "region" | "regions" => Ok(FilterOption::Region),
            "type" | "types" => Ok(FilterOption::Type),
            "location" | "locations" => Ok(FilterOption::Location),
            "baseitem" | "baseitems" => Ok(FilterOption::BaseItem),
            "class" | "classes" => Ok(FilterOption::Class),
            "skillmodifier" | "skillmod" | "skillmods" => Ok(FilterOption::SkillModifier),
            "power" | "charmpower" => Ok(FilterOption::Power),
            _ => Err(CatalogError::ParseError(format!("unknown filter option: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Has,
    NotHas,
    Gte,
    Gt,
    Eq,
    Lte,
    Lt,
}

impl Comparator {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Comparator::Has),
            1 => Some(Comparator::NotHas),
            2 => Some(Comparator::Gte),
            3 => Some(Comparator::Gt),
            4 => Some(Comparator::Eq),
            5 => Some(Comparator::Lte),
            6 => Some(Comparator::Lt),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Comparator::Has => 0,
            Comparator::NotHas => 1,
            Comparator::Gte => 2,
            Comparator::Gt => 3,
            Comparator::Eq => 4,
            Comparator::Lte => 5,
            Comparator::Lt => 6,
        }
    }

    /// `None` for `Has`/`NotHas`, which are not orderings.
    pub fn compare(&self, actual: f64, constant: f64) -> Option<bool> {
        match self {
            Comparator::Has | Comparator::NotHas => None,
            Comparator::Gte => Some(actual >= constant),
            Comparator::Gt => Some(actual > constant),
            Comparator::Eq => Some(actual == constant),
            Comparator::Lte => Some(actual <= constant),
            Comparator::Lt => Some(actual < constant),
        }
    }

    fn parse_code(s: &str) -> Result<u8, CatalogError> {
        let code = match s.to_lowercase().as_str() {
            "has" | "is" => 0,
            "not_has" | "nothas" | "not" | "!has" => 1,
            "gte" | ">=" => 2,
            "gt" | ">" => 3,
            "eq" | "==" | "=" => 4,
            "lte" | "<=" => 5,
            "lt" | "<" => 6,
            other => other
                .parse::<u8>()
                .map_err(|_| CatalogError::ParseError(format!("unknown comparator: {}", s)))?,
        };
        Ok(code)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub option: FilterOption,
    pub value: String,
    #[serde(default)]
    pub constant: f64,
    // Raw code so unknown comparators survive and evaluate as no-ops.
    pub comparator: u8,
}

impl Filter {
    pub fn new(option: FilterOption, comparator: Comparator, value: impl Into<String>) -> Self {
        Self {
            option,
            value: value.into(),
            constant: 0.0,
            comparator: comparator.code(),
        }
    }

    pub fn with_constant(mut self, constant: f64) -> Self {
        self.constant = constant;
        self
    }

    pub fn with_code(mut self, code: u8) -> Self {
        self.comparator = code;
        self
    }

    pub fn comparator(&self) -> Option<Comparator> {
        Comparator::from_code(self.comparator)
    }

    pub fn is_active(&self) -> bool {
        self.option.is_numeric_only() || !self.value.is_empty()
    }
}

/// `option:comparator:value[:constant]`, e.g. `stat:gte:strength:5`.
impl FromStr for Filter {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(4, ':');
        let option = parts
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| CatalogError::ParseError(format!("empty filter: {:?}", s)))?
            .parse::<FilterOption>()?;
        let comparator = match parts.next() {
            Some(c) => Comparator::parse_code(c)?,
            None => return Err(CatalogError::ParseError(format!("filter missing comparator: {}", s))),
        };
        let value = parts.next().unwrap_or("").to_string();
        let constant = match parts.next() {
            Some(c) => c
                .parse::<f64>()
                .map_err(|e| CatalogError::ParseError(format!("bad filter constant {:?}: {}", c, e)))?,
            None => 0.0,
        };

        Ok(Filter {
            option,
            value,
            constant,
            comparator,
        })
    }
}
