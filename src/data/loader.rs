use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::model::{
    parse_number, parse_text, Restaurant, RestaurantDataset, COL_COST, COL_CUISINES,
    COL_LOCATION, COL_NAME, COL_ONLINE_ORDER, COL_RATING, REQUIRED_COLUMNS,
};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("{format} file is missing the '{column}' column")]
    MissingColumn {
        format: &'static str,
        column: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

fn cache() -> &'static Mutex<HashMap<PathBuf, Arc<RestaurantDataset>>> {
    static CACHE: OnceLock<Mutex<HashMap<PathBuf, Arc<RestaurantDataset>>>> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Load a dataset once per process; later calls for the same path return
/// the same shared table without touching storage.
pub fn load_cached(path: &Path) -> Result<Arc<RestaurantDataset>> {
    let key = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

    if let Some(ds) = cache()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .get(&key)
    {
        log::debug!("Dataset cache hit for {}", key.display());
        return Ok(Arc::clone(ds));
    }

    let dataset = Arc::new(load_file(path)?);
    if dataset.is_empty() {
        log::warn!("{} contains no restaurants", path.display());
    }
    log::info!(
        "Loaded {} restaurants ({} cuisines) from {}",
        dataset.len(),
        dataset.all_cuisines.len(),
        path.display()
    );
    cache()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .insert(key, Arc::clone(&dataset));
    Ok(dataset)
}

/// Load a restaurant dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the restaurant columns (recommended)
/// * `.json`    – `[{ "name": ..., "cuisines": ..., ... }, ...]`
/// * `.parquet` – flat table written by Pandas or Polars
pub fn load_file(path: &Path) -> Result<RestaurantDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let loaded = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => return Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    };
    loaded.with_context(|| format!("loading {}", path.display()))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Positions of the required columns within a header row.
struct ColumnIndex {
    name: usize,
    location: usize,
    cuisines: usize,
    rating: usize,
    cost: usize,
    online_order: usize,
}

impl ColumnIndex {
    fn resolve(headers: &[String], format: &'static str) -> Result<Self> {
        let find = |column: &'static str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| LoadError::MissingColumn { format, column }.into())
        };
        Ok(ColumnIndex {
            name: find(COL_NAME)?,
            location: find(COL_LOCATION)?,
            cuisines: find(COL_CUISINES)?,
            rating: find(COL_RATING)?,
            cost: find(COL_COST)?,
            online_order: find(COL_ONLINE_ORDER)?,
        })
    }

    fn is_required(&self, idx: usize) -> bool {
        [
            self.name,
            self.location,
            self.cuisines,
            self.rating,
            self.cost,
            self.online_order,
        ]
        .contains(&idx)
    }
}

/// CSV layout: header row with column names. The six restaurant columns are
/// required; every other column is kept as text for the raw view.
fn load_csv(path: &Path) -> Result<RestaurantDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let cols = ColumnIndex::resolve(&headers, "CSV")?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |idx: usize| row.get(idx).unwrap_or("");

        let mut extra = BTreeMap::new();
        for (idx, header) in headers.iter().enumerate() {
            if cols.is_required(idx) {
                continue;
            }
            if let Some(value) = parse_text(cell(idx)) {
                extra.insert(header.clone(), value);
            }
        }

        records.push(Restaurant {
            name: cell(cols.name).trim().to_string(),
            location: parse_text(cell(cols.location)),
            cuisines: parse_text(cell(cols.cuisines)),
            aggregate_rating: parse_number(cell(cols.rating)),
            approx_cost: parse_number(cell(cols.cost)),
            online_order: parse_text(cell(cols.online_order)),
            extra,
        });
    }

    Ok(RestaurantDataset::from_records(records, headers))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "name": "Jalsa",
///     "location": "Banashankari",
///     "cuisines": "North Indian, Mughlai, Chinese",
///     "aggregate_rating": 4.1,
///     "approx_cost(for two people)": 800,
///     "online_order": "Yes"
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<RestaurantDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut column_names: Vec<String> = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
    let mut records = Vec::with_capacity(rows.len());
    // A column exists if any row has the key; rows lacking it hold a missing value.
    let mut seen_required = [false; REQUIRED_COLUMNS.len()];

    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for (seen, column) in seen_required.iter_mut().zip(REQUIRED_COLUMNS) {
            *seen |= obj.contains_key(column);
        }

        let mut extra = BTreeMap::new();
        for (key, val) in obj {
            if REQUIRED_COLUMNS.contains(&key.as_str()) {
                continue;
            }
            if !column_names.contains(key) {
                column_names.push(key.clone());
            }
            if let Some(text) = json_text(Some(val)) {
                extra.insert(key.clone(), text);
            }
        }

        records.push(Restaurant {
            name: json_text(obj.get(COL_NAME)).unwrap_or_default(),
            location: json_text(obj.get(COL_LOCATION)),
            cuisines: json_text(obj.get(COL_CUISINES)),
            aggregate_rating: json_number(obj, COL_RATING),
            approx_cost: json_number(obj, COL_COST),
            online_order: json_flag(obj.get(COL_ONLINE_ORDER)),
            extra,
        });
    }

    if !rows.is_empty() {
        if let Some((_, &column)) = seen_required
            .iter()
            .zip(REQUIRED_COLUMNS.iter())
            .find(|(seen, _)| !**seen)
        {
            bail!(LoadError::MissingColumn {
                format: "JSON",
                column,
            });
        }
    }

    Ok(RestaurantDataset::from_records(records, column_names))
}

fn json_text(val: Option<&JsonValue>) -> Option<String> {
    match val? {
        JsonValue::String(s) => parse_text(s),
        JsonValue::Null => None,
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn json_number(obj: &Map<String, JsonValue>, key: &str) -> Option<f64> {
    match obj.get(key)? {
        JsonValue::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        JsonValue::String(s) => parse_number(s),
        _ => None,
    }
}

/// Booleans are normalised to the `"Yes"` / `"No"` text of the CSV export.
fn json_flag(val: Option<&JsonValue>) -> Option<String> {
    match val? {
        JsonValue::Bool(b) => Some(yes_no(*b)),
        other => json_text(Some(other)),
    }
}

fn yes_no(b: bool) -> String {
    if b { "Yes" } else { "No" }.to_string()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the restaurant columns.
///
/// Text columns may be Utf8 or LargeUtf8; numeric columns any integer or
/// float type (or text, parsed like CSV cells). Works with files written by
/// both **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<RestaurantDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let column_names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let cols = ColumnIndex::resolve(&column_names, "Parquet")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let column = |idx: usize| batch.column(idx).as_ref();

        for row in 0..batch.num_rows() {
            let mut extra = BTreeMap::new();
            for (idx, name) in column_names.iter().enumerate() {
                if cols.is_required(idx) {
                    continue;
                }
                if let Some(value) = extract_text(column(idx), row) {
                    extra.insert(name.clone(), value);
                }
            }

            records.push(Restaurant {
                name: extract_text(column(cols.name), row).unwrap_or_default(),
                location: extract_text(column(cols.location), row),
                cuisines: extract_text(column(cols.cuisines), row),
                aggregate_rating: extract_f64(column(cols.rating), row),
                approx_cost: extract_f64(column(cols.cost), row),
                online_order: extract_text(column(cols.online_order), row),
                extra,
            });
        }
    }

    Ok(RestaurantDataset::from_records(records, column_names))
}

// -- Parquet / Arrow helpers --

/// Read a cell as text. Booleans become `"Yes"` / `"No"`.
fn extract_text(col: &dyn Array, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .and_then(|s| parse_text(s.value(row))),
        DataType::LargeUtf8 => parse_text(col.as_string::<i64>().value(row)),
        DataType::Boolean => col
            .as_any()
            .downcast_ref::<BooleanArray>()
            .map(|b| yes_no(b.value(row))),
        _ => extract_f64(col, row).map(super::model::format_number),
    }
}

/// Read a cell as a number; text cells are parsed like CSV.
fn extract_f64(col: &dyn Array, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row) as f64),
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(row) as f64),
        DataType::Utf8 | DataType::LargeUtf8 => {
            return extract_text(col, row).as_deref().and_then(parse_number)
        }
        _ => None,
    };
    value.filter(|v| v.is_finite())
}
