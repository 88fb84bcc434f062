// Parquet encoding with content hashing
//
// Serializes an Arrow RecordBatch to Parquet bytes in memory, computing
// a Blake3 hash of the encoded bytes in the same pass. The hash drives
// the part file name, which keeps re-runs byte-stable.

use anyhow::Result;
use arrow::array::RecordBatch;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::{EnabledStatistics, WriterProperties};
use std::io::{self, Write};
use std::sync::OnceLock;

struct HashingBuffer {
    buffer: Vec<u8>,
    hasher: blake3::Hasher,
}

impl HashingBuffer {
    fn new() -> Self {
        Self {
            buffer: Vec::new(),
            hasher: blake3::Hasher::new(),
        }
    }

    fn finish(self) -> (Vec<u8>, String) {
        let hash = self.hasher.finalize();
        (self.buffer, hex::encode(hash.as_bytes()))
    }
}

impl Write for HashingBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.hasher.update(buf);
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Get shared writer properties (cached)
///
/// ZSTD compression, dictionary encoding, page statistics, 32k rows per
/// row group.
fn writer_properties() -> &'static WriterProperties {
    static PROPERTIES: OnceLock<WriterProperties> = OnceLock::new();
    PROPERTIES.get_or_init(|| {
        let level = ZstdLevel::try_new(2).unwrap_or_default();
        WriterProperties::builder()
            .set_dictionary_enabled(true)
            .set_statistics_enabled(EnabledStatistics::Page)
            .set_compression(Compression::ZSTD(level))
            .set_write_batch_size(32 * 1024)
            .set_max_row_group_size(32 * 1024)
            .build()
    })
}

/// Encode a batch to Parquet bytes, returning the bytes and the hex
/// Blake3 hash of the encoded file.
pub(crate) fn encode_batch(batch: &RecordBatch) -> Result<(Vec<u8>, String)> {
    let mut sink = HashingBuffer::new();
    {
        let mut writer = parquet::arrow::ArrowWriter::try_new(
            &mut sink,
            batch.schema(),
            Some(writer_properties().clone()),
        )?;
        writer.write(batch)?;
        writer.close()?;
    }
    Ok(sink.finish())
}
