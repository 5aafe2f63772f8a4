use std::collections::HashMap;

use crate::config::YearsConfig;
use crate::operators::row::{Number, Row};

/// Per-region populations for the base and target years.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionAggregate {
    pub base_population: Number,
    pub target_population: Number,
    /// Set once by the finalizer.
    pub change_ratio: Option<f64>,
}

impl Default for RegionAggregate {
    fn default() -> Self {
        Self {
            base_population: Number::Int(0),
            target_population: Number::Int(0),
            change_ratio: None,
        }
    }
}

/// Region aggregates in first-seen order.
#[derive(Debug, Default)]
pub struct RegionTable {
    index: HashMap<String, usize>,
    entries: Vec<(String, RegionAggregate)>,
}

impl RegionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_insert(&mut self, region: &str) -> &mut RegionAggregate {
        let idx = match self.index.get(region) {
            Some(&idx) => idx,
            None => {
                let idx = self.entries.len();
                self.index.insert(region.to_string(), idx);
                self.entries.push((region.to_string(), RegionAggregate::default()));
                idx
            }
        };
        &mut self.entries[idx].1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegionAggregate)> {
        self.entries.iter().map(|(name, agg)| (name.as_str(), agg))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut RegionAggregate)> {
        self.entries
            .iter_mut()
            .map(|(name, agg)| (name.as_str(), agg))
    }

    pub fn into_entries(self) -> Vec<(String, RegionAggregate)> {
        self.entries
    }
}

/// Folds parsed rows into a [`RegionTable`], keeping only the configured years.
pub struct Aggregator {
    years: YearsConfig,
    table: RegionTable,
    matched_rows: usize,
    ignored_rows: usize,
}

impl Aggregator {
    pub fn new(years: YearsConfig) -> Self {
        Self {
            years,
            table: RegionTable::new(),
            matched_rows: 0,
            ignored_rows: 0,
        }
    }

    /// Record one row. Returns whether the row matched a tracked year.
    pub fn push(&mut self, row: Row) -> bool {
        let Number::Int(year) = row.year else {
            self.ignored_rows += 1;
            return false;
        };
        if year != self.years.base && year != self.years.target {
            self.ignored_rows += 1;
            return false;
        }

        let aggregate = self.table.get_or_insert(&row.region);
        if year == self.years.base {
            aggregate.base_population = row.population;
        } else {
            aggregate.target_population = row.population;
        }
        self.matched_rows += 1;
        true
    }

    pub fn matched_rows(&self) -> usize {
        self.matched_rows
    }

    pub fn ignored_rows(&self) -> usize {
        self.ignored_rows
    }

    pub fn table(&self) -> &RegionTable {
        &self.table
    }

    pub fn into_table(self) -> RegionTable {
        self.table
    }
}
