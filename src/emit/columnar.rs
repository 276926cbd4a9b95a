use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::{
    array::{ArrayRef, Date32Builder, Float64Builder, Int64Builder, StringBuilder},
    datatypes::{DataType as ArrowType, Field, Schema},
    record_batch::RecordBatch,
};
use chrono::NaiveDate;
use parquet::{
    arrow::ArrowWriter,
    basic::{BrotliLevel, Compression},
    file::properties::WriterProperties,
};

use crate::table::{DataType, Table, Value};

/// Write one table as a Brotli-compressed parquet file for columnar
/// consumers. Returns the bytes written.
pub fn write_parquet<P: AsRef<Path>>(table: &Table, path: P) -> Result<u64> {
    let path = path.as_ref();
    let batch = to_record_batch(table).context("converting table to record batch")?;

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::BROTLI(BrotliLevel::try_new(5)?))
        .build();

    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
        .context("creating parquet writer")?;
    writer.write(&batch).context("writing batch to parquet")?;
    writer.close().context("closing parquet writer")?;

    let metadata = fs::metadata(path).context("reading file metadata")?;
    Ok(metadata.len())
}

fn to_record_batch(table: &Table) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(table.num_columns());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(table.num_columns());

    for column in table.columns() {
        let (arrow_type, array): (ArrowType, ArrayRef) = match column.dtype() {
            DataType::Float => {
                let mut b = Float64Builder::new();
                for value in column.values() {
                    b.append_option(value.as_f64());
                }
                (ArrowType::Float64, Arc::new(b.finish()))
            }
            DataType::Int => {
                let mut b = Int64Builder::new();
                for value in column.values() {
                    match value {
                        Value::Int(v) => b.append_value(*v),
                        _ => b.append_null(),
                    }
                }
                (ArrowType::Int64, Arc::new(b.finish()))
            }
            DataType::Str => {
                let mut b = StringBuilder::new();
                for value in column.values() {
                    match value {
                        Value::Str(s) => b.append_value(s),
                        _ => b.append_null(),
                    }
                }
                (ArrowType::Utf8, Arc::new(b.finish()))
            }
            DataType::Date => {
                let mut b = Date32Builder::new();
                for value in column.values() {
                    match value {
                        Value::Date(d) => b.append_value(days_since_epoch(*d)),
                        _ => b.append_null(),
                    }
                }
                (ArrowType::Date32, Arc::new(b.finish()))
            }
        };
        fields.push(Field::new(column.name(), arrow_type, true));
        arrays.push(array);
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).map_err(Into::into)
}

fn days_since_epoch(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("epoch is a valid date");
    date.signed_duration_since(epoch).num_days() as i32
}
