use std::collections::{BTreeMap, BTreeSet};

// ---------------------------------------------------------------------------
// Column names of the source table
// ---------------------------------------------------------------------------

pub const COL_NAME: &str = "name";
pub const COL_LOCATION: &str = "location";
pub const COL_CUISINES: &str = "cuisines";
pub const COL_RATING: &str = "aggregate_rating";
pub const COL_COST: &str = "approx_cost(for two people)";
pub const COL_ONLINE_ORDER: &str = "online_order";

/// Columns every dataset must provide, in display order.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_NAME,
    COL_LOCATION,
    COL_CUISINES,
    COL_RATING,
    COL_COST,
    COL_ONLINE_ORDER,
];

// ---------------------------------------------------------------------------
// Cell parsing helpers
// ---------------------------------------------------------------------------

/// Blank cells are treated as missing.
pub fn parse_text(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse a numeric cell as found in scraped restaurant listings.
///
/// Accepts thousands separators (`"1,200"`) and rating denominators
/// (`"4.1/5"`). Anything else that does not parse, or parses to a
/// non-finite value, is missing.
pub fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    let numerator = trimmed.split('/').next().unwrap_or(trimmed).trim();
    if numerator.is_empty() {
        return None;
    }
    let cleaned: String = numerator.chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Split a comma-delimited cuisines cell into trimmed, non-empty tags.
pub fn split_cuisines(field: &str) -> impl Iterator<Item = &str> {
    field.split(',').map(str::trim).filter(|t| !t.is_empty())
}

// ---------------------------------------------------------------------------
// Restaurant – one row of the dataset
// ---------------------------------------------------------------------------

/// A single restaurant listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Restaurant {
    pub name: String,
    pub location: Option<String>,
    /// Comma-delimited cuisine tags, as written in the source.
    pub cuisines: Option<String>,
    pub aggregate_rating: Option<f64>,
    /// Approximate cost for two people.
    pub approx_cost: Option<f64>,
    /// Boolean-valued text, typically `"Yes"` / `"No"`.
    pub online_order: Option<String>,
    /// Any further source columns, kept verbatim for the raw view.
    pub extra: BTreeMap<String, String>,
}

impl Restaurant {
    /// Cuisine tags of this record; empty when the field is missing.
    pub fn cuisine_tags(&self) -> impl Iterator<Item = &str> {
        self.cuisines.as_deref().into_iter().flat_map(split_cuisines)
    }

    /// Display text for a named column. Missing values render as an empty string.
    pub fn cell(&self, column: &str) -> String {
        match column {
            COL_NAME => self.name.clone(),
            COL_LOCATION => self.location.clone().unwrap_or_default(),
            COL_CUISINES => self.cuisines.clone().unwrap_or_default(),
            COL_RATING => self
                .aggregate_rating
                .map(|v| format!("{v:.1}"))
                .unwrap_or_default(),
            COL_COST => self
                .approx_cost
                .map(format_number)
                .unwrap_or_default(),
            COL_ONLINE_ORDER => self.online_order.clone().unwrap_or_default(),
            other => self.extra.get(other).cloned().unwrap_or_default(),
        }
    }
}

/// Whole numbers print without a fractional part.
pub fn format_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v:.2}")
    }
}

// ---------------------------------------------------------------------------
// RestaurantDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct RestaurantDataset {
    /// All restaurants (rows), in file order.
    pub records: Vec<Restaurant>,
    /// Column names in file order, required columns included.
    pub column_names: Vec<String>,
    /// Sorted set of distinct cuisine tags across the dataset.
    pub all_cuisines: BTreeSet<String>,
    /// Highest cost-for-two present, if any record has one.
    pub max_cost: Option<f64>,
}

impl RestaurantDataset {
    /// Build lookup data from the loaded records.
    ///
    /// An empty `column_names` falls back to the required columns.
    pub fn from_records(records: Vec<Restaurant>, column_names: Vec<String>) -> Self {
        let column_names = if column_names.is_empty() {
            REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect()
        } else {
            column_names
        };

        let all_cuisines: BTreeSet<String> = records
            .iter()
            .flat_map(|r| r.cuisine_tags())
            .map(str::to_string)
            .collect();

        let max_cost = records
            .iter()
            .filter_map(|r| r.approx_cost)
            .fold(None, |acc: Option<f64>, c| Some(acc.map_or(c, |m| m.max(c))));

        RestaurantDataset {
            records,
            column_names,
            all_cuisines,
            max_cost,
        }
    }

    /// Number of restaurants.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Indices of every row, in order.
    pub fn all_indices(&self) -> Vec<usize> {
        (0..self.records.len()).collect()
    }

    /// Borrow a view over the given row indices.
    pub fn view<'a>(&'a self, indices: &'a [usize]) -> View<'a> {
        View {
            dataset: self,
            indices,
        }
    }
}

// ---------------------------------------------------------------------------
// View – a read-only subset of the dataset
// ---------------------------------------------------------------------------

/// A derived, read-only projection: dataset rows selected by index.
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    dataset: &'a RestaurantDataset,
    indices: &'a [usize],
}

impl<'a> View<'a> {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Records of the view, in view order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Restaurant> + 'a {
        let records = &self.dataset.records;
        self.indices.iter().map(move |&i| &records[i])
    }

    /// `(dataset index, record)` pairs, in view order.
    pub fn iter_indexed(&self) -> impl Iterator<Item = (usize, &'a Restaurant)> + 'a {
        let records = &self.dataset.records;
        self.indices.iter().map(move |&i| (i, &records[i]))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal record used across the crate's tests.
    pub(crate) fn restaurant(
        name: &str,
        cuisines: Option<&str>,
        rating: Option<f64>,
        cost: Option<f64>,
    ) -> Restaurant {
        Restaurant {
            name: name.to_string(),
            location: Some("Indiranagar".to_string()),
            cuisines: cuisines.map(str::to_string),
            aggregate_rating: rating,
            approx_cost: cost,
            online_order: Some("Yes".to_string()),
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn parse_number_handles_listing_formats() {
        assert_eq!(parse_number("800"), Some(800.0));
        assert_eq!(parse_number(" 1,200 "), Some(1200.0));
        assert_eq!(parse_number("4.1/5"), Some(4.1));
        assert_eq!(parse_number("4.1 /5"), Some(4.1));
        assert_eq!(parse_number("NEW"), None);
        assert_eq!(parse_number("-"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn parse_text_treats_blank_as_missing() {
        assert_eq!(parse_text("   "), None);
        assert_eq!(parse_text(" BTM "), Some("BTM".to_string()));
    }

    #[test]
    fn cuisine_tags_are_trimmed_and_skip_empty_tokens() {
        let r = restaurant("A", Some("North Indian, Chinese,,  Thai "), None, None);
        let tags: Vec<&str> = r.cuisine_tags().collect();
        assert_eq!(tags, vec!["North Indian", "Chinese", "Thai"]);

        let none = restaurant("B", None, None, None);
        assert_eq!(none.cuisine_tags().count(), 0);
    }

    #[test]
    fn dataset_collects_cuisines_and_max_cost() {
        let ds = RestaurantDataset::from_records(
            vec![
                restaurant("A", Some("Thai, Chinese"), Some(4.0), Some(500.0)),
                restaurant("B", Some("Chinese"), None, None),
                restaurant("C", None, Some(3.0), Some(1500.0)),
            ],
            Vec::new(),
        );
        let tags: Vec<&str> = ds.all_cuisines.iter().map(String::as_str).collect();
        assert_eq!(tags, vec!["Chinese", "Thai"]);
        assert_eq!(ds.max_cost, Some(1500.0));
        assert_eq!(ds.column_names.len(), REQUIRED_COLUMNS.len());
    }

    #[test]
    fn view_iterates_selected_rows_in_order() {
        let ds = RestaurantDataset::from_records(
            vec![
                restaurant("A", None, None, None),
                restaurant("B", None, None, None),
                restaurant("C", None, None, None),
            ],
            Vec::new(),
        );
        let idx = vec![2, 0];
        let view = ds.view(&idx);
        let names: Vec<&str> = view.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A"]);
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn cell_renders_missing_as_empty() {
        let mut r = restaurant("A", None, Some(4.25), Some(1200.0));
        r.extra.insert("phone".to_string(), "080 1234".to_string());
        assert_eq!(r.cell(COL_CUISINES), "");
        assert_eq!(r.cell(COL_COST), "1200");
        assert_eq!(r.cell("phone"), "080 1234");
        assert_eq!(r.cell("unknown"), "");
    }
}
