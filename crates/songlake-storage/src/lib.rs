// songlake-storage - I/O and persistence layer
//
// Everything that touches object storage lives here:
// - OpenDAL operator construction (filesystem / S3; Memory in tests)
// - Recursive JSON-lines source reader
// - Hive-style partition path generation
// - Parquet encoding with content hashing
// - Partitioned overwrite writer
//
// The OpenDAL Operator is the substitution seam: the whole pipeline runs
// against an in-memory backend in tests without touching pipeline logic.

mod encode;
mod error;
mod operator;
mod partition;
mod reader;
mod writer;

pub use error::{EtlError, Result};
pub use operator::build_operator;
pub use reader::SourceReader;
pub use writer::PartitionedWriter;
