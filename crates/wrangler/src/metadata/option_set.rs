use serde::Serialize;
use std::{collections::BTreeMap, fmt, str::FromStr};
use tracing::warn;

/// The option categories a metadata block may carry. Anything else found in
/// a block is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionCategory {
    ParseDates,
    Dtype,
    IndexCol,
    Timezone,
}

impl OptionCategory {
    pub const ALL: [OptionCategory; 4] = [
        OptionCategory::ParseDates,
        OptionCategory::Dtype,
        OptionCategory::IndexCol,
        OptionCategory::Timezone,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            OptionCategory::ParseDates => "parse_dates",
            OptionCategory::Dtype => "dtype",
            OptionCategory::IndexCol => "index_col",
            OptionCategory::Timezone => "timezone",
        }
    }
}

impl FromStr for OptionCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OptionCategory::ALL
            .into_iter()
            .find(|c| c.key() == s)
            .ok_or_else(|| s.to_string())
    }
}

impl fmt::Display for OptionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Raw option values keyed by category, as written in a metadata block.
/// Values are interpreted later, when options are merged for a fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OptionSet {
    values: BTreeMap<OptionCategory, toml::Value>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the recognised top-level keys of a parsed block.
    pub fn from_table(table: toml::Table) -> Self {
        let mut options = OptionSet::new();
        for (key, value) in table {
            match key.parse::<OptionCategory>() {
                Ok(category) => options.insert(category, value),
                Err(unknown) => warn!("Ignoring unknown metadata option '{unknown}'"),
            }
        }
        options
    }

    pub fn get(&self, category: OptionCategory) -> Option<&toml::Value> {
        self.values.get(&category)
    }

    pub fn insert(&mut self, category: OptionCategory, value: toml::Value) {
        self.values.insert(category, value);
    }

    pub fn remove(&mut self, category: OptionCategory) -> Option<toml::Value> {
        self.values.remove(&category)
    }

    pub fn contains(&self, category: OptionCategory) -> bool {
        self.values.contains_key(&category)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (OptionCategory, &toml::Value)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }
}
