use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{LaunchDataset, LaunchRecord};

/// Column names the dashboard reads. Any other columns are ignored.
pub const COL_LAUNCH_SITE: &str = "Launch Site";
pub const COL_PAYLOAD: &str = "Payload Mass (kg)";
pub const COL_CLASS: &str = "class";
pub const COL_BOOSTER: &str = "Booster Version Category";

const REQUIRED_COLUMNS: [&str; 4] = [COL_LAUNCH_SITE, COL_PAYLOAD, COL_CLASS, COL_BOOSTER];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a launch table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row; the four dashboard columns plus anything else
/// * `.json`    – `[{ "Launch Site": ..., "Payload Mass (kg)": ..., ... }, ...]`
/// * `.parquet` – the same column names, string and numeric types
pub fn load_file(path: &Path) -> Result<LaunchDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    log::info!(
        "Loaded {} launches from {} ({} sites, payload {})",
        dataset.len(),
        path.display(),
        dataset.sites.len(),
        dataset.default_payload_range()
    );
    Ok(dataset)
}

/// One row as it appears in CSV / JSON sources.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Launch Site")]
    launch_site: String,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass_kg: f64,
    #[serde(rename = "class")]
    class: i64,
    #[serde(rename = "Booster Version Category")]
    booster_version_category: String,
}

impl RawRecord {
    fn into_record(self) -> Result<LaunchRecord> {
        Ok(LaunchRecord::new(
            self.launch_site,
            self.payload_mass_kg,
            self.class,
            self.booster_version_category,
        )?)
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<LaunchDataset> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;

    let headers = reader.headers().context("reading CSV headers")?.clone();
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            bail!("CSV missing '{col}' column");
        }
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<RawRecord>().enumerate() {
        // Row numbers are 1-based and skip the header, like a spreadsheet.
        let line = row_no + 2;
        let raw = result.with_context(|| format!("CSV line {line}"))?;
        records.push(raw.into_record().with_context(|| format!("CSV line {line}"))?);
    }

    Ok(LaunchDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
fn load_json(path: &Path) -> Result<LaunchDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let rows: Vec<RawRecord> = serde_json::from_str(&text).context("parsing JSON records")?;

    let records = rows
        .into_iter()
        .enumerate()
        .map(|(i, raw)| raw.into_record().with_context(|| format!("JSON record {i}")))
        .collect::<Result<Vec<_>>>()?;

    Ok(LaunchDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding the launch table.
///
/// String columns may be Utf8 or LargeUtf8; payload may be any float or
/// integer type; `class` may be an integer or a whole-valued float (Pandas
/// writes the latter when the column ever held NaN).
fn load_parquet(path: &Path) -> Result<LaunchDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let site_col = column(&batch, COL_LAUNCH_SITE)?;
        let payload_col = column(&batch, COL_PAYLOAD)?;
        let class_col = column(&batch, COL_CLASS)?;
        let booster_col = column(&batch, COL_BOOSTER)?;

        for row in 0..batch.num_rows() {
            let row_no = records.len();
            let site = string_value(site_col, row, COL_LAUNCH_SITE)
                .with_context(|| format!("Row {row_no}"))?;
            let payload = numeric_value(payload_col, row, COL_PAYLOAD)
                .with_context(|| format!("Row {row_no}"))?;
            let class = class_value(class_col, row).with_context(|| format!("Row {row_no}"))?;
            let booster = string_value(booster_col, row, COL_BOOSTER)
                .with_context(|| format!("Row {row_no}"))?;

            records.push(
                LaunchRecord::new(site, payload, class, booster)
                    .with_context(|| format!("Row {row_no}"))?,
            );
        }
    }

    Ok(LaunchDataset::from_records(records))
}

// -- Arrow helpers --

fn column<'b>(batch: &'b RecordBatch, name: &str) -> Result<&'b ArrayRef> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))?;
    Ok(batch.column(idx))
}

fn string_value(col: &ArrayRef, row: usize, name: &str) -> Result<String> {
    if col.is_null(row) {
        bail!("null value in '{name}'");
    }
    if let Some(arr) = col.as_string_opt::<i32>() {
        return Ok(arr.value(row).to_string());
    }
    if let Some(arr) = col.as_string_opt::<i64>() {
        return Ok(arr.value(row).to_string());
    }
    bail!(
        "column '{name}' has type {:?}, expected a string column",
        col.data_type()
    )
}

fn numeric_value(col: &ArrayRef, row: usize, name: &str) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value in '{name}'");
    }
    let value = match col.data_type() {
        DataType::Float64 => col.as_primitive::<Float64Type>().value(row),
        DataType::Float32 => col.as_primitive::<Float32Type>().value(row) as f64,
        DataType::Int64 => col.as_primitive::<Int64Type>().value(row) as f64,
        DataType::Int32 => col.as_primitive::<Int32Type>().value(row) as f64,
        other => bail!("column '{name}' has type {other:?}, expected a numeric column"),
    };
    Ok(value)
}

fn class_value(col: &ArrayRef, row: usize) -> Result<i64> {
    let value = numeric_value(col, row, COL_CLASS)?;
    if value.fract() != 0.0 {
        bail!("'{COL_CLASS}' value {value} is not a whole number");
    }
    Ok(value as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;
    use tempfile::NamedTempFile;

    use crate::data::model::{Outcome, PayloadRange};

    fn temp_with(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_csv_ignores_extra_columns() {
        let file = temp_with(
            ".csv",
            "Flight Number,Launch Site,class,Payload Mass (kg),Booster Version,Booster Version Category\n\
             1,CCAFS LC-40,0,0.0,F9 v1.0  B0003,v1.0\n\
             2,KSC LC-39A,1,2490.0,F9 FT B1031.1,FT\n\
             3,VAFB SLC-4E,1,9600,F9 B5 B1048.1,B5\n",
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records[1].launch_site, "KSC LC-39A");
        assert_eq!(ds.records[1].outcome, Outcome::Success);
        assert_eq!(ds.records[0].booster_version_category, "v1.0");
        assert_eq!(ds.default_payload_range(), PayloadRange::new(0.0, 9600.0));
    }

    #[test]
    fn test_load_csv_missing_column() {
        let file = temp_with(".csv", "Launch Site,class,Payload Mass (kg)\nKSC LC-39A,1,100\n");
        let err = load_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Booster Version Category"));
    }

    #[test]
    fn test_load_csv_malformed_cell() {
        let file = temp_with(
            ".csv",
            "Launch Site,Payload Mass (kg),class,Booster Version Category\n\
             KSC LC-39A,heavy,1,FT\n",
        );
        let err = load_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("CSV line 2"));
    }

    #[test]
    fn test_load_csv_invalid_class() {
        let file = temp_with(
            ".csv",
            "Launch Site,Payload Mass (kg),class,Booster Version Category\n\
             KSC LC-39A,100,1,FT\n\
             KSC LC-39A,100,3,FT\n",
        );
        let err = load_file(file.path()).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("CSV line 3"), "{msg}");
        assert!(msg.contains("class 3"), "{msg}");
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_file(Path::new("/nonexistent/spacex_launch_dash.csv")).is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let file = temp_with(".xlsx", "");
        let err = load_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }

    #[test]
    fn test_load_json_records() {
        let file = temp_with(
            ".json",
            r#"[
                {"Launch Site": "CCAFS SLC-40", "Payload Mass (kg)": 3600, "class": 0, "Booster Version Category": "FT"},
                {"Launch Site": "KSC LC-39A", "Payload Mass (kg)": 5300.5, "class": 1, "Booster Version Category": "B4", "Mission": "ignored"}
            ]"#,
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].payload_mass_kg, 3600.0);
        assert!(ds.records[1].is_success());
    }

    #[test]
    fn test_load_json_negative_payload() {
        let file = temp_with(
            ".json",
            r#"[{"Launch Site": "KSC LC-39A", "Payload Mass (kg)": -5, "class": 1, "Booster Version Category": "B4"}]"#,
        );
        let err = load_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("JSON record 0"));
    }

    #[test]
    fn test_load_parquet() {
        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_LAUNCH_SITE, DataType::Utf8, false),
            Field::new(COL_PAYLOAD, DataType::Float64, false),
            Field::new(COL_CLASS, DataType::Int64, false),
            Field::new(COL_BOOSTER, DataType::Utf8, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["KSC LC-39A", "VAFB SLC-4E"])),
                Arc::new(Float64Array::from(vec![3000.0, 9600.0])),
                Arc::new(Int64Array::from(vec![1, 0])),
                Arc::new(StringArray::from(vec!["FT", "B5"])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[1].launch_site, "VAFB SLC-4E");
        assert_eq!(ds.records[1].outcome, Outcome::Failure);
        assert_eq!(ds.records[0].payload_mass_kg, 3000.0);
    }
}
