use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Output row; column names match what the dashboard reads.
#[derive(Debug, Serialize)]
struct SampleLaunch {
    #[serde(rename = "Flight Number")]
    flight_number: i64,
    #[serde(rename = "Launch Site")]
    launch_site: &'static str,
    #[serde(rename = "class")]
    class: i64,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass_kg: f64,
    #[serde(rename = "Booster Version Category")]
    booster_version_category: &'static str,
}

/// Booster eras in flight order: (category, launches, success probability,
/// payload range in kg).
const ERAS: [(&str, usize, f64, (f64, f64)); 5] = [
    ("v1.0", 5, 0.2, (0.0, 700.0)),
    ("v1.1", 15, 0.35, (500.0, 4500.0)),
    ("FT", 24, 0.65, (1500.0, 7000.0)),
    ("B4", 11, 0.55, (2000.0, 9600.0)),
    ("B5", 1, 1.0, (3000.0, 9600.0)),
];

const SITES: [&str; 4] = ["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A", "CCAFS SLC-40"];

/// Relative launch frequency of each entry in `SITES`.
const SITE_WEIGHTS: [f64; 4] = [0.45, 0.18, 0.23, 0.14];

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

    /// Uniform in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn weighted_index(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().sum();
        let mut target = self.next_f64() * total;
        for (i, w) in weights.iter().enumerate() {
            if target < *w {
                return i;
            }
            target -= w;
        }
        weights.len() - 1
    }
}

fn generate(rng: &mut SimpleRng) -> Vec<SampleLaunch> {
    let mut launches = Vec::new();
    for (category, count, p_success, (lo, hi)) in ERAS {
        for _ in 0..count {
            // Round to whole kilograms, like the manifest data.
            let payload = (lo + rng.next_f64() * (hi - lo)).round();
            launches.push(SampleLaunch {
                flight_number: launches.len() as i64 + 1,
                launch_site: SITES[rng.weighted_index(&SITE_WEIGHTS)],
                class: i64::from(rng.chance(p_success)),
                payload_mass_kg: payload,
                booster_version_category: category,
            });
        }
    }
    launches
}

fn write_csv(path: &str, launches: &[SampleLaunch]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for launch in launches {
        writer.serialize(launch).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &str, launches: &[SampleLaunch]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Flight Number", DataType::Int64, false),
        Field::new("Launch Site", DataType::Utf8, false),
        Field::new("class", DataType::Int64, false),
        Field::new("Payload Mass (kg)", DataType::Float64, false),
        Field::new("Booster Version Category", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(
                launches.iter().map(|l| l.flight_number),
            )),
            Arc::new(StringArray::from_iter_values(
                launches.iter().map(|l| l.launch_site),
            )),
            Arc::new(Int64Array::from_iter_values(launches.iter().map(|l| l.class))),
            Arc::new(Float64Array::from_iter_values(
                launches.iter().map(|l| l.payload_mass_kg),
            )),
            Arc::new(StringArray::from_iter_values(
                launches.iter().map(|l| l.booster_version_category),
            )),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let launches = generate(&mut rng);

    let csv_path = "spacex_launch_dash.csv";
    let parquet_path = "spacex_launch_dash.parquet";
    write_csv(csv_path, &launches)?;
    write_parquet(parquet_path, &launches)?;

    let successes = launches.iter().filter(|l| l.class == 1).count();
    println!(
        "Wrote {} launches ({successes} successful) to {csv_path} and {parquet_path}",
        launches.len()
    );
    Ok(())
}
