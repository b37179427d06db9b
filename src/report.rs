use std::fmt::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use crate::data::aggregate::{CategoryCount, Insights};
use crate::data::model::{RestaurantDataset, COL_COST, COL_CUISINES, COL_LOCATION, COL_NAME, COL_RATING};
use crate::ui::tables::metric_cards;

/// Plain-text rendition of the dashboard for `--headless` runs.
pub fn render(dataset: &RestaurantDataset, insights: &Insights) -> Result<String> {
    let mut out = String::new();

    for (label, value) in metric_cards(&insights.summary) {
        writeln!(out, "{label:<20} {value}")?;
    }

    writeln!(out, "\nTop rated restaurants")?;
    if insights.top_rated.is_empty() {
        writeln!(out, "  (none)")?;
    } else {
        let batch = top_rated_batch(dataset, &insights.top_rated)?;
        let table = pretty_format_batches(&[batch]).context("formatting top-rated table")?;
        writeln!(out, "{table}")?;
    }

    write_counts(&mut out, "Cuisine distribution", &insights.cuisine_counts)?;
    write_counts(&mut out, "Restaurants by location", &insights.location_counts)?;

    writeln!(out, "\nRating distribution")?;
    let hist = &insights.rating_histogram;
    if hist.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for (count, edge) in hist.counts.iter().zip(hist.edges.windows(2)) {
        writeln!(out, "  {:>5.2} – {:<5.2} {count}", edge[0], edge[1])?;
    }

    Ok(out)
}

fn write_counts(out: &mut String, title: &str, counts: &[CategoryCount]) -> std::fmt::Result {
    writeln!(out, "\n{title}")?;
    if counts.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for c in counts {
        writeln!(out, "  {:<24} {}", c.label, c.count)?;
    }
    Ok(())
}

/// Arrow batch of the top-rated rows, columns as in the dashboard table.
fn top_rated_batch(dataset: &RestaurantDataset, rows: &[usize]) -> Result<RecordBatch> {
    let records: Vec<_> = rows.iter().map(|&i| &dataset.records[i]).collect();

    let schema = Arc::new(Schema::new(vec![
        Field::new(COL_NAME, DataType::Utf8, false),
        Field::new(COL_LOCATION, DataType::Utf8, true),
        Field::new(COL_CUISINES, DataType::Utf8, true),
        Field::new(COL_RATING, DataType::Float64, true),
        Field::new(COL_COST, DataType::Float64, true),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(records.iter().map(|r| r.name.as_str()))),
        Arc::new(StringArray::from_iter(records.iter().map(|r| r.location.as_deref()))),
        Arc::new(StringArray::from_iter(records.iter().map(|r| r.cuisines.as_deref()))),
        Arc::new(Float64Array::from_iter(records.iter().map(|r| r.aggregate_rating))),
        Arc::new(Float64Array::from_iter(records.iter().map(|r| r.approx_cost))),
    ];
    RecordBatch::try_new(schema, columns).context("building top-rated batch")
}
