//! Parquet export of the long-form table.
//!
//! One row per long-form observation, with the run metadata JSON in the
//! file footer so the table stays self-describing.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::{EnabledStatistics, WriterProperties};
use parquet::format::KeyValue;

use crate::metadata::RunMetadata;
use crate::pipeline::{LongTable, SAMPLES_COLUMN, SAMPLE_TYPE_COLUMN, VALUE_COLUMN};

use super::WriterError;

/// Arrow schema of an exported long-form table
pub fn long_table_schema(index_name: &str) -> Schema {
    Schema::new(vec![
        Field::new(index_name, DataType::Utf8, false),
        Field::new(SAMPLE_TYPE_COLUMN, DataType::Utf8, false),
        Field::new(VALUE_COLUMN, DataType::Float64, false),
        Field::new(SAMPLES_COLUMN, DataType::Utf8, false),
    ])
}

/// Configuration for the long-table Parquet writer
#[derive(Debug, Clone)]
pub struct LongTableWriterConfig {
    /// ZSTD compression level
    pub compression_level: i32,

    /// Maximum rows per row group
    pub row_group_size: usize,

    /// Whether to write column chunk statistics
    pub write_statistics: bool,
}

impl Default for LongTableWriterConfig {
    fn default() -> Self {
        Self {
            compression_level: 3,
            row_group_size: 100_000,
            write_statistics: true,
        }
    }
}

impl LongTableWriterConfig {
    fn to_writer_properties(&self, metadata: &HashMap<String, String>) -> WriterProperties {
        let compression = Compression::ZSTD(
            ZstdLevel::try_new(self.compression_level).unwrap_or(ZstdLevel::default()),
        );

        let statistics = if self.write_statistics {
            EnabledStatistics::Chunk
        } else {
            EnabledStatistics::None
        };

        let kv_metadata: Vec<KeyValue> = metadata
            .iter()
            .map(|(k, v)| KeyValue {
                key: k.clone(),
                value: Some(v.clone()),
            })
            .collect();

        WriterProperties::builder()
            .set_compression(compression)
            .set_statistics_enabled(statistics)
            .set_max_row_group_size(self.row_group_size)
            .set_key_value_metadata(Some(kv_metadata))
            .build()
    }
}

/// Writer for long-form tables in Parquet format
pub struct LongTableWriter<W: Write + Send> {
    writer: ArrowWriter<W>,
    schema: Arc<Schema>,
    rows_written: usize,
}

impl<W: Write + Send> LongTableWriter<W> {
    /// Create a writer for tables whose entity column is `index_name`
    pub fn new(
        writer: W,
        index_name: &str,
        metadata: &RunMetadata,
        config: &LongTableWriterConfig,
    ) -> Result<Self, WriterError> {
        let schema = Arc::new(long_table_schema(index_name));
        let props = config.to_writer_properties(&metadata.to_parquet_metadata()?);
        let writer = ArrowWriter::try_new(writer, schema.clone(), Some(props))?;

        Ok(Self {
            writer,
            schema,
            rows_written: 0,
        })
    }

    /// Write every row of `table`
    pub fn write_table(&mut self, table: &LongTable) -> Result<(), WriterError> {
        if table.is_empty() {
            return Ok(());
        }

        let rows = table.rows();
        let arrays: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.entity.as_str()))),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.sample_type.as_str()),
            )),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.value))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.sample.as_str()))),
        ];

        let batch = RecordBatch::try_new(self.schema.clone(), arrays)?;
        self.writer.write(&batch)?;
        self.rows_written += rows.len();

        Ok(())
    }

    /// Flush buffered data and write the footer
    pub fn finish(self) -> Result<usize, WriterError> {
        self.writer.close()?;
        Ok(self.rows_written)
    }
}
