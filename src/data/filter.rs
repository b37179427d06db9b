use std::collections::BTreeSet;

use super::model::{Restaurant, RestaurantDataset};

// ---------------------------------------------------------------------------
// Filter predicate: selected cuisine tags + cost ceiling
// ---------------------------------------------------------------------------

/// User filter selection.
///
/// An empty cuisine set means "no cuisine constraint". The cost ceiling is
/// inclusive and always applies.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub cuisines: BTreeSet<String>,
    pub max_cost: f64,
}

impl FilterState {
    pub fn new(max_cost: f64) -> Self {
        Self {
            cuisines: BTreeSet::new(),
            max_cost,
        }
    }

    /// Add the tag if absent, remove it otherwise.
    pub fn toggle_cuisine(&mut self, tag: &str) {
        if !self.cuisines.remove(tag) {
            self.cuisines.insert(tag.to_string());
        }
    }

    /// Add the tag; selecting it again is a no-op.
    pub fn select_cuisine(&mut self, tag: &str) {
        self.cuisines.insert(tag.to_string());
    }

    pub fn clear_cuisines(&mut self) {
        self.cuisines.clear();
    }

    pub fn set_max_cost(&mut self, max_cost: f64) {
        self.max_cost = max_cost;
    }
}

/// Filter with the cuisine needles lower-cased once per pass.
struct CompiledFilter {
    needles: Vec<String>,
    max_cost: f64,
}

impl CompiledFilter {
    fn new(filters: &FilterState) -> Self {
        let needles = filters
            .cuisines
            .iter()
            .map(|tag| tag.trim().to_lowercase())
            .filter(|tag| !tag.is_empty())
            .collect();
        Self {
            needles,
            max_cost: filters.max_cost,
        }
    }

    fn matches(&self, record: &Restaurant) -> bool {
        // Missing cost never satisfies the ceiling.
        let within_budget = record
            .approx_cost
            .is_some_and(|cost| cost <= self.max_cost);
        if !within_budget {
            return false;
        }
        if self.needles.is_empty() {
            return true;
        }
        match &record.cuisines {
            Some(field) => {
                let haystack = field.to_lowercase();
                self.needles.iter().any(|n| haystack.contains(n.as_str()))
            }
            None => false,
        }
    }
}

/// Return indices of restaurants that pass the filter, in dataset order.
pub fn filtered_indices(dataset: &RestaurantDataset, filters: &FilterState) -> Vec<usize> {
    let compiled = CompiledFilter::new(filters);
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| compiled.matches(r))
        .map(|(i, _)| i)
        .collect()
}
