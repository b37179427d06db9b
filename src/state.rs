use std::cmp::Ordering;
use std::path::Path;
use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::data::aggregate::Insights;
use crate::data::filter::{filtered_indices, FilterState};
use crate::data::loader;
use crate::data::model::{Restaurant, RestaurantDataset};

// ---------------------------------------------------------------------------
// Top-rated table sorting
// ---------------------------------------------------------------------------

/// Columns of the top-rated table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopColumn {
    Name,
    Location,
    Cuisines,
    Rating,
    Cost,
}

impl TopColumn {
    pub const ALL: [TopColumn; 5] = [
        TopColumn::Name,
        TopColumn::Location,
        TopColumn::Cuisines,
        TopColumn::Rating,
        TopColumn::Cost,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TopColumn::Name => "Name",
            TopColumn::Location => "Location",
            TopColumn::Cuisines => "Cuisines",
            TopColumn::Rating => "Rating",
            TopColumn::Cost => "Cost for two",
        }
    }

    /// Missing values order before present ones.
    fn compare(self, a: &Restaurant, b: &Restaurant) -> Ordering {
        fn num(a: Option<f64>, b: Option<f64>) -> Ordering {
            match (a, b) {
                (Some(a), Some(b)) => a.total_cmp(&b),
                (a, b) => a.is_some().cmp(&b.is_some()),
            }
        }
        match self {
            TopColumn::Name => a.name.cmp(&b.name),
            TopColumn::Location => a.location.cmp(&b.location),
            TopColumn::Cuisines => a.cuisines.cmp(&b.cuisines),
            TopColumn::Rating => num(a.aggregate_rating, b.aggregate_rating),
            TopColumn::Cost => num(a.approx_cost, b.approx_cost),
        }
    }
}

/// User-chosen ordering of the top-rated table. Absent means rank order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSort {
    pub column: TopColumn,
    pub descending: bool,
}

/// Stable re-ordering of dataset rows for display.
pub fn sort_rows(dataset: &RestaurantDataset, rows: &[usize], sort: Option<TableSort>) -> Vec<usize> {
    let mut out = rows.to_vec();
    if let Some(TableSort { column, descending }) = sort {
        out.sort_by(|&a, &b| {
            let ord = column.compare(&dataset.records[a], &dataset.records[b]);
            if descending {
                ord.reverse()
            } else {
                ord
            }
        });
    }
    out
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset (None until a file loads).
    pub dataset: Option<Arc<RestaurantDataset>>,

    /// Cuisine selection and cost ceiling.
    pub filters: FilterState,

    /// Indices of restaurants passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Metrics, rankings and chart data for `visible_indices`.
    pub insights: Insights,

    /// Text typed into the cuisine search box.
    pub cuisine_search: String,

    /// Ordering of the top-rated table.
    pub top_sort: Option<TableSort>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let filters = FilterState::new(config.default_max_cost);
        Self {
            config,
            dataset: None,
            filters,
            visible_indices: Vec::new(),
            insights: Insights::default(),
            cuisine_search: String::new(),
            top_sort: None,
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset and recompute everything.
    /// The current filter selection carries over.
    pub fn set_dataset(&mut self, dataset: Arc<RestaurantDataset>) {
        self.dataset = Some(dataset);
        self.top_sort = None;
        self.status_message = None;
        self.refilter();
    }

    /// Load a dataset through the process-wide cache.
    pub fn load_path(&mut self, path: &Path) {
        match loader::load_cached(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Recompute `visible_indices` and `insights` after a filter change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        self.visible_indices = filtered_indices(ds, &self.filters);
        self.insights = Insights::compute(&ds.view(&self.visible_indices), &self.config.aggregation);
        log::debug!(
            "Filter {:?} kept {} of {} restaurants",
            self.filters,
            self.visible_indices.len(),
            ds.len()
        );
    }

    pub fn toggle_cuisine(&mut self, tag: &str) {
        self.filters.toggle_cuisine(tag);
        self.refilter();
    }

    pub fn clear_cuisines(&mut self) {
        self.filters.clear_cuisines();
        self.refilter();
    }

    pub fn set_max_cost(&mut self, max_cost: f64) {
        self.filters.set_max_cost(max_cost.clamp(0.0, self.config.cost_slider_max));
        self.refilter();
    }

    /// Header click: sort by a new column ascending, or flip direction of
    /// the current one.
    pub fn cycle_sort(&mut self, column: TopColumn) {
        self.top_sort = match self.top_sort {
            Some(s) if s.column == column => Some(TableSort {
                column,
                descending: !s.descending,
            }),
            _ => Some(TableSort {
                column,
                descending: false,
            }),
        };
    }

    /// Top-rated rows in display order.
    pub fn top_rows(&self) -> Vec<usize> {
        match &self.dataset {
            Some(ds) => sort_rows(ds, &self.insights.top_rated, self.top_sort),
            None => Vec::new(),
        }
    }

    /// Cuisine tags matching the search box, case-insensitive.
    pub fn cuisine_options(&self) -> Vec<String> {
        let Some(ds) = &self.dataset else {
            return Vec::new();
        };
        let needle = self.cuisine_search.trim().to_lowercase();
        ds.all_cuisines
            .iter()
            .filter(|tag| needle.is_empty() || tag.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::restaurant;

    fn state() -> AppState {
        let ds = RestaurantDataset::from_records(
            vec![
                restaurant("Wok Box", Some("Chinese, Thai"), Some(4.1), Some(500.0)),
                restaurant("Tandoor", Some("North Indian"), Some(3.9), Some(1000.0)),
                restaurant("Dosa Hut", Some("South Indian"), Some(4.4), Some(200.0)),
            ],
            Vec::new(),
        );
        let mut state = AppState::default();
        state.set_dataset(Arc::new(ds));
        state
    }

    #[test]
    fn dataset_ingest_applies_default_ceiling() {
        let s = state();
        assert_eq!(s.visible_indices, vec![0, 2]);
        assert_eq!(s.insights.summary.count, 2);
        assert_eq!(s.insights.top_rated, vec![2, 0]);
    }

    #[test]
    fn filter_changes_recompute_insights() {
        let mut s = state();
        s.set_max_cost(3000.0);
        assert_eq!(s.insights.summary.count, 3);

        s.toggle_cuisine("Indian");
        assert_eq!(s.visible_indices, vec![1, 2]);
        assert_eq!(s.insights.summary.mean_cost, Some(600));

        s.toggle_cuisine("Korean");
        s.toggle_cuisine("Indian");
        assert!(s.visible_indices.is_empty());
        assert_eq!(s.insights.summary.mean_rating, None);

        s.clear_cuisines();
        assert_eq!(s.visible_indices.len(), 3);
    }

    #[test]
    fn ceiling_is_clamped_to_slider_range() {
        let mut s = state();
        s.set_max_cost(99_999.0);
        assert_eq!(s.filters.max_cost, 3000.0);
        s.set_max_cost(-5.0);
        assert_eq!(s.filters.max_cost, 0.0);
        assert!(s.visible_indices.is_empty());
    }

    #[test]
    fn header_clicks_cycle_sort_direction() {
        let mut s = state();
        assert_eq!(s.top_rows(), vec![2, 0]);

        s.cycle_sort(TopColumn::Name);
        assert_eq!(s.top_rows(), vec![2, 0]); // Dosa Hut, Wok Box
        s.cycle_sort(TopColumn::Name);
        assert_eq!(s.top_rows(), vec![0, 2]);

        s.cycle_sort(TopColumn::Cost);
        assert_eq!(
            s.top_sort,
            Some(TableSort { column: TopColumn::Cost, descending: false })
        );
        assert_eq!(s.top_rows(), vec![2, 0]);
    }

    #[test]
    fn cuisine_search_narrows_options() {
        let mut s = state();
        assert_eq!(s.cuisine_options().len(), 4);
        s.cuisine_search = "indian".to_string();
        assert_eq!(s.cuisine_options(), vec!["North Indian".to_string(), "South Indian".to_string()]);
    }

    #[test]
    fn failed_load_reports_status() {
        let mut s = AppState::default();
        s.load_path(Path::new("/nonexistent/restaurants.csv"));
        assert!(s.dataset.is_none());
        assert!(s.status_message.is_some());
    }
}
