use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use emission_atlas::data::RawRow;

/// Smooth synthetic trend per (region, sector) so the charts have some shape.
fn emission(region_idx: usize, sector_idx: usize, year: i32) -> f64 {
    let base = 40.0 + 15.0 * region_idx as f64 + 7.5 * sector_idx as f64;
    let trend = 1.0 - 0.02 * (year - 2000) as f64;
    let wobble = ((year as f64 * 0.7 + sector_idx as f64).sin() * 3.0).abs();
    (base * trend + wobble).max(0.0)
}

/// Value with a decimal comma, as the source exports write it.
fn decimal_comma(v: f64) -> String {
    format!("{v:.2}").replacen('.', ",", 1)
}

fn build_rows() -> Vec<RawRow> {
    let regions = ["Austria", "Wien", "Niederösterreich", "Tirol", "Steiermark"];
    let classifications = [
        ("KSG", ["Industrie", "Energie", "Gebäude", "Verkehr", "Landwirtschaft", "Abfall", "F-Gase"]),
        ("CRF", ["Industry", "Energy", "Buildings", "Traffic", "Farming", "Waste management", "F-Gases"]),
    ];

    let mut rows = Vec::new();
    for (region_idx, region) in regions.iter().enumerate() {
        for (cls, sectors) in &classifications {
            for year in 2000..=2022 {
                let mut total = 0.0;
                for (sector_idx, sector) in sectors.iter().enumerate() {
                    let v = emission(region_idx, sector_idx, year);
                    total += v;
                    rows.push(RawRow::new(region, cls, sector, &year.to_string(), &decimal_comma(v)));
                }
                // Subtotal rows the aggregator drops.
                rows.push(RawRow::new(region, cls, "Total", &year.to_string(), &decimal_comma(total)));
                rows.push(RawRow::new(region, cls, "Energy & Industry", &year.to_string(), "0"));
            }
        }
    }

    // A few malformed rows.
    rows.push(RawRow::new("", "KSG", "Industrie", "2020", "1,0"));
    rows.push(RawRow::new("Wien", "KSG", "Industrie", "n/a", "1,0"));
    rows.push(RawRow::new("Wien", "KSG", "Industrie", "2020", "k.A."));
    rows
}

fn write_parquet(rows: &[RawRow], path: &str) -> Result<()> {
    let text = |f: fn(&RawRow) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    // Years go out as integers where they parse, null otherwise.
    let years = Int64Array::from(
        rows.iter()
            .map(|r| r.year.parse::<i64>().ok())
            .collect::<Vec<_>>(),
    );

    let schema = Arc::new(Schema::new(vec![
        Field::new("Region", DataType::Utf8, false),
        Field::new("Classification", DataType::Utf8, false),
        Field::new("Sector", DataType::Utf8, false),
        Field::new("Year", DataType::Int64, true),
        Field::new("Values", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text(|r| r.region.as_str()),
            text(|r| r.classification.as_str()),
            text(|r| r.sector.as_str()),
            Arc::new(years),
            text(|r| r.values.as_str()),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn write_csv(rows: &[RawRow], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let rows = build_rows();
    write_parquet(&rows, "sample_emissions.parquet")?;
    write_csv(&rows, "sample_emissions.csv")?;

    println!(
        "Wrote {} rows to sample_emissions.parquet and sample_emissions.csv",
        rows.len()
    );
    Ok(())
}
