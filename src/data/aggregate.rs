use std::cmp::Ordering;
use std::collections::HashMap;

use crate::config::AggregationConfig;

use super::model::{split_cuisines, View};

// ---------------------------------------------------------------------------
// Scalar summary
// ---------------------------------------------------------------------------

/// Headline metrics of a view. `None` marks a statistic with no defined
/// value, e.g. a mean over zero non-missing entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub count: usize,
    /// Mean rating over rated records, rounded to 2 decimals.
    pub mean_rating: Option<f64>,
    /// Mean cost-for-two over priced records, truncated.
    pub mean_cost: Option<i64>,
    /// Share of records with the online-order sentinel, as a percentage
    /// rounded to 2 decimals.
    pub online_pct: Option<f64>,
}

/// Exact halves round to the even digit (`4.125` → `4.12`).
fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}

/// Mean of the present values, skipping missing ones.
fn mean_skip_missing(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, n) = values
        .flatten()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

pub fn summarize(view: &View<'_>, online_sentinel: &str) -> Summary {
    let count = view.len();
    let mean_rating = mean_skip_missing(view.iter().map(|r| r.aggregate_rating)).map(round2);
    let mean_cost =
        mean_skip_missing(view.iter().map(|r| r.approx_cost)).map(|m| m.trunc() as i64);
    let online_pct = (!view.is_empty()).then(|| {
        let online = view
            .iter()
            .filter(|r| r.online_order.as_deref() == Some(online_sentinel))
            .count();
        round2(online as f64 / count as f64 * 100.0)
    });

    Summary {
        count,
        mean_rating,
        mean_cost,
        online_pct,
    }
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Dataset indices of the `n` best-rated records of the view.
///
/// Sorted by rating descending. The sort is stable, so equal ratings keep
/// view order; unrated records come last.
pub fn top_by_rating(view: &View<'_>, n: usize) -> Vec<usize> {
    let mut ranked: Vec<(usize, Option<f64>)> = view
        .iter_indexed()
        .map(|(i, r)| (i, r.aggregate_rating))
        .collect();
    ranked.sort_by(|(_, a), (_, b)| match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    ranked.into_iter().take(n).map(|(i, _)| i).collect()
}

// ---------------------------------------------------------------------------
// Frequency counts
// ---------------------------------------------------------------------------

/// One bar of a category chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// Count occurrences, most frequent first, keeping at most `top` entries.
/// Ties are ordered by first appearance.
pub fn value_counts<'a>(items: impl IntoIterator<Item = &'a str>, top: usize) -> Vec<CategoryCount> {
    let mut position: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();
    for item in items {
        match position.get(item) {
            Some(&p) => counts[p].count += 1,
            None => {
                position.insert(item, counts.len());
                counts.push(CategoryCount {
                    label: item.to_string(),
                    count: 1,
                });
            }
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(top);
    counts
}

/// Cuisine tags across the view, split on commas and flattened.
pub fn cuisine_counts(view: &View<'_>, top: usize) -> Vec<CategoryCount> {
    value_counts(
        view.iter()
            .filter_map(|r| r.cuisines.as_deref())
            .flat_map(split_cuisines),
        top,
    )
}

/// Restaurants per location; missing locations are not counted.
pub fn location_counts(view: &View<'_>, top: usize) -> Vec<CategoryCount> {
    value_counts(view.iter().filter_map(|r| r.location.as_deref()), top)
}

// ---------------------------------------------------------------------------
// Rating histogram
// ---------------------------------------------------------------------------

/// Equal-width histogram. `edges` has one more entry than `counts`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn bin_width(&self) -> f64 {
        match self.edges.as_slice() {
            [first, second, ..] => second - first,
            _ => 0.0,
        }
    }
}

/// Bin the present values into `bins` equal-width buckets over their range.
/// The last bucket is closed on the right. A zero-width range is widened to
/// one unit around the value.
pub fn histogram(values: &[f64], bins: usize) -> Histogram {
    if values.is_empty() || bins == 0 {
        return Histogram::default();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (lo, hi) = if (max - min).abs() < f64::EPSILON {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };
    let width = (hi - lo) / bins as f64;

    let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
    let mut counts = vec![0usize; bins];
    for &v in values {
        let bin = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[bin] += 1;
    }
    Histogram { edges, counts }
}

pub fn rating_histogram(view: &View<'_>, bins: usize) -> Histogram {
    let ratings: Vec<f64> = view.iter().filter_map(|r| r.aggregate_rating).collect();
    histogram(&ratings, bins)
}

// ---------------------------------------------------------------------------
// Insights – everything the dashboard shows for one filter state
// ---------------------------------------------------------------------------

/// All derived values for a view, recomputed on every filter change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Insights {
    pub summary: Summary,
    /// Dataset indices of the top-rated table rows.
    pub top_rated: Vec<usize>,
    pub cuisine_counts: Vec<CategoryCount>,
    pub location_counts: Vec<CategoryCount>,
    pub rating_histogram: Histogram,
}

impl Insights {
    pub fn compute(view: &View<'_>, cfg: &AggregationConfig) -> Self {
        Insights {
            summary: summarize(view, &cfg.online_sentinel),
            top_rated: top_by_rating(view, cfg.top_n),
            cuisine_counts: cuisine_counts(view, cfg.cuisine_top),
            location_counts: location_counts(view, cfg.location_top),
            rating_histogram: rating_histogram(view, cfg.rating_bins),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::restaurant;
    use crate::data::model::RestaurantDataset;
    use approx::assert_relative_eq;

    fn dataset() -> RestaurantDataset {
        let mut records = vec![
            restaurant("A", Some("Chinese, Thai"), Some(4.1), Some(500.0)),
            restaurant("B", Some("North Indian, Chinese"), Some(3.9), Some(700.0)),
            restaurant("C", Some("Chinese"), Some(4.1), Some(300.0)),
            restaurant("D", None, None, Some(450.0)),
            restaurant("E", Some("Thai"), Some(4.3), None),
        ];
        records[1].online_order = Some("No".to_string());
        records[3].online_order = None;
        records[2].location = Some("BTM".to_string());
        records[4].location = None;
        RestaurantDataset::from_records(records, Vec::new())
    }

    #[test]
    fn summary_skips_missing_values() {
        let ds = dataset();
        let idx = ds.all_indices();
        let s = summarize(&ds.view(&idx), "Yes");
        assert_eq!(s.count, 5);
        // (4.1 + 3.9 + 4.1 + 4.3) / 4
        assert_relative_eq!(s.mean_rating.unwrap(), 4.1);
        // (500 + 700 + 300 + 450) / 4 = 487.5
        assert_eq!(s.mean_cost, Some(487));
        // A, C and E say "Yes"; D's missing flag counts as "not online".
        assert_relative_eq!(s.online_pct.unwrap(), 60.0);
    }

    #[test]
    fn single_record_summary_matches_its_values() {
        let ds = RestaurantDataset::from_records(
            vec![
                restaurant("A", Some("Chinese,Thai"), Some(4.1), Some(500.0)),
                restaurant("B", Some("Indian"), Some(3.9), Some(1000.0)),
            ],
            Vec::new(),
        );
        let idx = vec![0];
        let s = summarize(&ds.view(&idx), "Yes");
        assert_eq!(s.count, 1);
        assert_relative_eq!(s.mean_rating.unwrap(), 4.10);
        assert_eq!(s.mean_cost, Some(500));
    }

    #[test]
    fn empty_view_is_defined() {
        let ds = dataset();
        let view = ds.view(&[]);
        let insights = Insights::compute(&view, &AggregationConfig::default());
        assert_eq!(insights.summary.count, 0);
        assert_eq!(insights.summary.mean_rating, None);
        assert_eq!(insights.summary.mean_cost, None);
        assert_eq!(insights.summary.online_pct, None);
        assert!(insights.top_rated.is_empty());
        assert!(insights.cuisine_counts.is_empty());
        assert!(insights.location_counts.is_empty());
        assert!(insights.rating_histogram.is_empty());
    }

    #[test]
    fn unrated_view_has_no_mean_rating() {
        let ds = dataset();
        let idx = vec![3];
        let s = summarize(&ds.view(&idx), "Yes");
        assert_eq!(s.count, 1);
        assert_eq!(s.mean_rating, None);
        assert_eq!(s.mean_cost, Some(450));
        assert_eq!(s.online_pct, Some(0.0));
    }

    #[test]
    fn percentage_rounds_to_two_decimals() {
        let mut records: Vec<_> = (0..3)
            .map(|i| restaurant(&i.to_string(), None, None, Some(100.0)))
            .collect();
        records[0].online_order = Some("No".to_string());
        records[1].online_order = Some("No".to_string());
        let ds = RestaurantDataset::from_records(records, Vec::new());
        let idx = ds.all_indices();
        let s = summarize(&ds.view(&idx), "Yes");
        assert_relative_eq!(s.online_pct.unwrap(), 33.33);
    }

    #[test]
    fn exact_halves_round_to_even() {
        let ds = RestaurantDataset::from_records(
            vec![
                restaurant("A", None, Some(4.0), Some(100.0)),
                restaurant("B", None, Some(4.25), Some(100.0)),
            ],
            Vec::new(),
        );
        let idx = ds.all_indices();
        let s = summarize(&ds.view(&idx), "Yes");
        assert_eq!(s.mean_rating, Some(4.12));

        let mut records: Vec<_> = (0..32)
            .map(|i| restaurant(&i.to_string(), None, None, Some(100.0)))
            .collect();
        for r in records.iter_mut().skip(1) {
            r.online_order = Some("No".to_string());
        }
        let ds = RestaurantDataset::from_records(records, Vec::new());
        let idx = ds.all_indices();
        let s = summarize(&ds.view(&idx), "Yes");
        assert_eq!(s.online_pct, Some(3.12));
    }

    #[test]
    fn top_by_rating_is_stable_and_puts_unrated_last() {
        let ds = dataset();
        let idx = ds.all_indices();
        let view = ds.view(&idx);
        assert_eq!(top_by_rating(&view, 10), vec![4, 0, 2, 1, 3]);
        assert_eq!(top_by_rating(&view, 2), vec![4, 0]);
        assert!(top_by_rating(&view, 0).is_empty());
    }

    #[test]
    fn top_by_rating_is_descending_with_bounded_length() {
        let ds = dataset();
        let idx = vec![1, 2, 0];
        let view = ds.view(&idx);
        for n in 0..6 {
            let top = top_by_rating(&view, n);
            assert_eq!(top.len(), n.min(view.len()));
            let ratings: Vec<f64> = top
                .iter()
                .filter_map(|&i| ds.records[i].aggregate_rating)
                .collect();
            assert!(ratings.windows(2).all(|w| w[0] >= w[1]));
        }
        // C precedes A in this view, so it wins the 4.1 tie.
        assert_eq!(top_by_rating(&view, 3), vec![2, 0, 1]);
    }

    #[test]
    fn cuisine_counts_flatten_tags() {
        let ds = dataset();
        let idx = ds.all_indices();
        let counts = cuisine_counts(&ds.view(&idx), 15);
        let pairs: Vec<(&str, usize)> = counts.iter().map(|c| (c.label.as_str(), c.count)).collect();
        assert_eq!(pairs, vec![("Chinese", 3), ("Thai", 2), ("North Indian", 1)]);
        assert_eq!(cuisine_counts(&ds.view(&idx), 1).len(), 1);
    }

    #[test]
    fn location_counts_skip_missing() {
        let ds = dataset();
        let idx = ds.all_indices();
        let counts = location_counts(&ds.view(&idx), 20);
        assert_eq!(
            counts,
            vec![
                CategoryCount { label: "Indiranagar".into(), count: 3 },
                CategoryCount { label: "BTM".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn value_count_ties_keep_first_appearance() {
        let counts = value_counts(["b", "a", "c", "a", "b"], 10);
        let labels: Vec<&str> = counts.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["b", "a", "c"]);
    }

    #[test]
    fn histogram_covers_range_with_closed_last_bin() {
        let h = histogram(&[1.0, 2.0, 3.0, 4.0, 5.0], 4);
        assert_eq!(h.edges, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(h.counts, vec![1, 1, 1, 2]);
        assert_relative_eq!(h.bin_width(), 1.0);
        assert_eq!(h.counts.iter().sum::<usize>(), 5);
    }

    #[test]
    fn histogram_of_a_single_value_is_widened() {
        let h = histogram(&[4.0, 4.0], 2);
        assert_eq!(h.edges, vec![3.5, 4.0, 4.5]);
        assert_eq!(h.counts, vec![0, 2]);
    }

    #[test]
    fn rating_histogram_ignores_unrated() {
        let ds = dataset();
        let idx = ds.all_indices();
        let h = rating_histogram(&ds.view(&idx), 20);
        assert_eq!(h.counts.len(), 20);
        assert_eq!(h.counts.iter().sum::<usize>(), 4);
    }
}
