use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;

use crate::metrics::SimulationResult;

pub(crate) fn export_to_parquet_impl(
    results: &[SimulationResult],
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    let batch = build_record_batch(results)?;
    let props = WriterProperties::builder().build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;

    Ok(())
}

fn build_record_batch(
    results: &[SimulationResult],
) -> Result<RecordBatch, arrow::error::ArrowError> {
    let schema = Arc::new(parquet_schema());
    let arrays = build_arrays(results);

    RecordBatch::try_new(schema, arrays)
}

fn parquet_schema() -> Schema {
    Schema::new(vec![
        Field::new("policy", DataType::Utf8, false),
        Field::new("seed", DataType::UInt64, false),
        Field::new("immediate_count", DataType::UInt64, false),
        Field::new("delayed_count", DataType::UInt64, false),
        Field::new("patients_served", DataType::UInt64, false),
        Field::new("total_survival_probability", DataType::Float64, false),
        Field::new("survival_rate", DataType::Float64, false),
        Field::new("completed", DataType::Boolean, false),
        Field::new("stalled_at", DataType::Float64, true),
        Field::new("events_processed", DataType::UInt64, false),
        Field::new("final_time", DataType::Float64, false),
        Field::new("policy_fallbacks", DataType::UInt64, false),
    ])
}

fn uint_column(results: &[SimulationResult], f: impl Fn(&SimulationResult) -> usize) -> ArrayRef {
    Arc::new(UInt64Array::from(
        results.iter().map(|r| f(r) as u64).collect::<Vec<_>>(),
    ))
}

fn float_column(results: &[SimulationResult], f: impl Fn(&SimulationResult) -> f64) -> ArrayRef {
    Arc::new(Float64Array::from(results.iter().map(f).collect::<Vec<_>>()))
}

fn build_arrays(results: &[SimulationResult]) -> Vec<ArrayRef> {
    vec![
        Arc::new(StringArray::from(
            results.iter().map(|r| r.policy.as_str()).collect::<Vec<_>>(),
        )),
        Arc::new(UInt64Array::from(
            results.iter().map(|r| r.seed).collect::<Vec<_>>(),
        )),
        uint_column(results, |r| r.immediate_count),
        uint_column(results, |r| r.delayed_count),
        uint_column(results, |r| r.patients_served),
        float_column(results, |r| r.total_survival_probability),
        float_column(results, |r| r.survival_rate),
        Arc::new(BooleanArray::from(
            results.iter().map(|r| r.completed).collect::<Vec<_>>(),
        )),
        Arc::new(Float64Array::from(
            results.iter().map(|r| r.stalled_at).collect::<Vec<_>>(),
        )),
        uint_column(results, |r| r.events_processed),
        float_column(results, |r| r.final_time),
        uint_column(results, |r| r.policy_fallbacks),
    ]
}
