//! Partitioned Parquet writer
//!
//! Writes one table per call: clears any existing data under the table
//! prefix (overwrite semantics, no merge), groups rows by the rendered
//! partition values, and writes one part file per distinct combination.
//! Partition columns are dropped from file contents, Hive-style; their
//! values live in the path.

use crate::encode::encode_batch;
use crate::error::{EtlError, Result};
use crate::partition::{part_file_name, partition_path};
use arrow::array::{Array, Int32Array, Int64Array, RecordBatch, StringArray, UInt32Array};
use arrow::compute::take_record_batch;
use opendal::Operator;
use std::collections::HashMap;
use tracing::{debug, info};

/// Writes output tables to an operator rooted at the output location.
pub struct PartitionedWriter {
    operator: Operator,
}

impl PartitionedWriter {
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }

    /// Write a table, partitioned by `partition_cols` (may be empty).
    ///
    /// Existing data under `{table}/` is removed first. Returns the
    /// paths of the written part files.
    pub async fn write_table(
        &self,
        table: &str,
        batch: &RecordBatch,
        partition_cols: &[&str],
    ) -> Result<Vec<String>> {
        let table_dir = format!("{}/", table);
        self.operator
            .remove_all(&table_dir)
            .await
            .map_err(|e| EtlError::write(table_dir.as_str(), e))?;

        let paths = if partition_cols.is_empty() {
            vec![self.write_part(table, &[], batch).await?]
        } else {
            self.write_partitioned(table, batch, partition_cols).await?
        };

        info!(
            table,
            rows = batch.num_rows(),
            partitions = paths.len(),
            "Wrote table"
        );
        Ok(paths)
    }

    async fn write_partitioned(
        &self,
        table: &str,
        batch: &RecordBatch,
        partition_cols: &[&str],
    ) -> Result<Vec<String>> {
        let schema = batch.schema();

        let mut partition_indices = Vec::with_capacity(partition_cols.len());
        for col in partition_cols {
            let index = schema
                .index_of(col)
                .map_err(|_| EtlError::write(table, format!("missing partition column '{}'", col)))?;
            partition_indices.push(index);
        }

        // Partition columns move into the path; the files keep the rest.
        let kept: Vec<usize> = (0..schema.fields().len())
            .filter(|i| !partition_indices.contains(i))
            .collect();
        let projected = batch
            .project(&kept)
            .map_err(|e| EtlError::write(table, e))?;

        // Group row indices by rendered partition values, first-seen order.
        let mut group_index: HashMap<Vec<String>, usize> = HashMap::new();
        let mut groups: Vec<(Vec<String>, Vec<u32>)> = Vec::new();
        for row in 0..batch.num_rows() {
            let mut key = Vec::with_capacity(partition_indices.len());
            for &col in &partition_indices {
                key.push(render_value(table, batch.column(col).as_ref(), row)?);
            }
            match group_index.get(&key) {
                Some(&g) => groups[g].1.push(row as u32),
                None => {
                    group_index.insert(key.clone(), groups.len());
                    groups.push((key, vec![row as u32]));
                }
            }
        }

        let mut paths = Vec::with_capacity(groups.len());
        for (key, rows) in groups {
            let indices = UInt32Array::from(rows);
            let part = take_record_batch(&projected, &indices)
                .map_err(|e| EtlError::write(table, e))?;

            let partition: Vec<(String, String)> = partition_cols
                .iter()
                .map(|c| c.to_string())
                .zip(key)
                .collect();
            paths.push(self.write_part(table, &partition, &part).await?);
        }

        Ok(paths)
    }

    async fn write_part(
        &self,
        table: &str,
        partition: &[(String, String)],
        batch: &RecordBatch,
    ) -> Result<String> {
        let (bytes, hash) = encode_batch(batch).map_err(|e| EtlError::write(table, e))?;
        let path = partition_path(table, partition, &part_file_name(&hash));

        self.operator
            .write(&path, bytes)
            .await
            .map_err(|e| EtlError::write(path.as_str(), e))?;

        debug!(path, rows = batch.num_rows(), "Wrote part file");
        Ok(path)
    }
}

/// Render one partition column value for use in a path.
fn render_value(table: &str, array: &dyn Array, row: usize) -> Result<String> {
    if array.is_null(row) {
        // Hive convention for null partition values
        return Ok("__HIVE_DEFAULT_PARTITION__".to_string());
    }

    let rendered = if let Some(a) = array.as_any().downcast_ref::<Int32Array>() {
        a.value(row).to_string()
    } else if let Some(a) = array.as_any().downcast_ref::<Int64Array>() {
        a.value(row).to_string()
    } else if let Some(a) = array.as_any().downcast_ref::<StringArray>() {
        a.value(row).to_string()
    } else {
        return Err(EtlError::write(
            table,
            format!(
                "unsupported partition column type: {:?}",
                array.data_type()
            ),
        ));
    };

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use opendal::services;
    use songlake_core::batch::{artists_batch, time_batch};
    use songlake_core::transform::decompose_millis;
    use songlake_core::ArtistRow;

    fn memory_writer() -> (Operator, PartitionedWriter) {
        let op = Operator::new(services::Memory::default()).unwrap().finish();
        (op.clone(), PartitionedWriter::new(op))
    }

    fn artist(artist_id: &str) -> ArtistRow {
        ArtistRow {
            artist_id: artist_id.to_string(),
            name: "Muse".to_string(),
            location: None,
            latitude: None,
            longitude: None,
        }
    }

    #[tokio::test]
    async fn unpartitioned_table_is_one_file() {
        let (op, writer) = memory_writer();
        let batch = artists_batch(&[artist("A1"), artist("A2")]).unwrap();

        let paths = writer.write_table("artists", &batch, &[]).await.unwrap();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].starts_with("artists/part-"));
        assert!(paths[0].ends_with(".parquet"));

        let bytes = op.read(&paths[0]).await.unwrap().to_vec();
        assert_eq!(&bytes[0..4], b"PAR1");
    }

    #[tokio::test]
    async fn two_year_month_combinations_produce_two_partitions() {
        let (op, writer) = memory_writer();
        // Two 2018-11 timestamps and one 2018-12
        let rows = vec![
            decompose_millis(1541440395796).unwrap(),
            decompose_millis(1543190563796).unwrap(),
            decompose_millis(1544400000000).unwrap(),
        ];
        let batch = time_batch(&rows).unwrap();

        let paths = writer
            .write_table("time", &batch, &["year", "month"])
            .await
            .unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().any(|p| p.starts_with("time/year=2018/month=11/")));
        assert!(paths.iter().any(|p| p.starts_with("time/year=2018/month=12/")));

        // Partition columns are dropped from file contents
        let bytes = op.read(&paths[0]).await.unwrap().to_vec();
        assert_eq!(&bytes[0..4], b"PAR1");
    }

    #[tokio::test]
    async fn rewrite_overwrites_previous_contents() {
        let (op, writer) = memory_writer();

        let first = artists_batch(&[artist("A1"), artist("A2")]).unwrap();
        writer.write_table("artists", &first, &[]).await.unwrap();

        let second = artists_batch(&[artist("A3")]).unwrap();
        let paths = writer.write_table("artists", &second, &[]).await.unwrap();

        let entries = op.list_with("artists/").recursive(true).await.unwrap();
        let files: Vec<_> = entries
            .iter()
            .filter(|e| e.metadata().mode() == opendal::EntryMode::FILE)
            .collect();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path(), paths[0]);
    }

    #[tokio::test]
    async fn missing_partition_column_is_a_write_error() {
        let (_op, writer) = memory_writer();
        let batch = artists_batch(&[artist("A1")]).unwrap();

        let err = writer
            .write_table("artists", &batch, &["year"])
            .await
            .unwrap_err();
        assert!(matches!(err, EtlError::Write { .. }));
        assert!(err.to_string().contains("missing partition column"));
    }
}
