use std::sync::Arc;

use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

const PREFIXES: [&str; 12] = [
    "Spice", "Royal", "Green", "Urban", "Little", "Golden", "Blue", "Old", "Cafe", "Tandoor",
    "Wok", "Coastal",
];
const SUFFIXES: [&str; 10] = [
    "Kitchen", "House", "Bistro", "Express", "Corner", "Garden", "Diner", "Point", "Hut", "Table",
];
const LOCATIONS: [&str; 14] = [
    "BTM", "Koramangala 5th Block", "HSR", "Indiranagar", "JP Nagar", "Jayanagar", "Whitefield",
    "Marathahalli", "Bannerghatta Road", "Bellandur", "Electronic City", "Banashankari",
    "Brigade Road", "MG Road",
];
const CUISINES: [&str; 16] = [
    "North Indian", "Chinese", "South Indian", "Fast Food", "Biryani", "Continental", "Desserts",
    "Cafe", "Beverages", "Italian", "Street Food", "Bakery", "Pizza", "Burger", "Thai",
    "Andhra",
];

/// One generated listing, serialized with the dataset's column names.
#[derive(Serialize)]
struct SampleRow {
    name: String,
    online_order: String,
    location: String,
    cuisines: Option<String>,
    aggregate_rating: Option<f64>,
    #[serde(rename = "approx_cost(for two people)")]
    approx_cost: Option<f64>,
    votes: u32,
}

fn generate(rng: &mut SimpleRng, n: usize) -> Vec<SampleRow> {
    (0..n)
        .map(|_| {
            let name = format!("{} {}", rng.pick(&PREFIXES), rng.pick(&SUFFIXES));

            let n_cuisines = 1 + rng.below(3);
            let mut tags: Vec<&str> = Vec::with_capacity(n_cuisines);
            while tags.len() < n_cuisines {
                let tag = rng.pick(&CUISINES);
                if !tags.contains(&tag) {
                    tags.push(tag);
                }
            }
            let cuisines = (!rng.chance(0.02)).then(|| tags.join(", "));

            let aggregate_rating =
                (!rng.chance(0.08)).then(|| ((2.5 + rng.next_f64() * 2.4) * 10.0).round() / 10.0);
            let approx_cost = (!rng.chance(0.03)).then(|| (2 + rng.below(59)) as f64 * 50.0);

            SampleRow {
                name,
                online_order: if rng.chance(0.6) { "Yes" } else { "No" }.to_string(),
                location: rng.pick(&LOCATIONS).to_string(),
                cuisines,
                aggregate_rating,
                approx_cost,
                votes: rng.below(2000) as u32,
            }
        })
        .collect()
}

fn write_parquet(rows: &[SampleRow], path: &str) {
    let schema = Arc::new(Schema::new(vec![
        Field::new("name", DataType::Utf8, false),
        Field::new("online_order", DataType::Utf8, false),
        Field::new("location", DataType::Utf8, false),
        Field::new("cuisines", DataType::Utf8, true),
        Field::new("aggregate_rating", DataType::Float64, true),
        Field::new("approx_cost(for two people)", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.name.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.online_order.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.location.as_str()))),
            Arc::new(StringArray::from_iter(rows.iter().map(|r| r.cuisines.as_deref()))),
            Arc::new(Float64Array::from_iter(rows.iter().map(|r| r.aggregate_rating))),
            Arc::new(Float64Array::from_iter(rows.iter().map(|r| r.approx_cost))),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng, 1500);

    let csv_path = "zomato.csv";
    let mut writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    for row in &rows {
        writer.serialize(row).expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV");

    let parquet_path = "zomato.parquet";
    write_parquet(&rows, parquet_path);

    println!(
        "Wrote {} restaurants to {csv_path} and {parquet_path}",
        rows.len()
    );
}
