//! Partition path generation
//!
//! Hive-style paths: `{table}/{col1}={v1}/{col2}={v2}/part-{hash16}.parquet`.
//! File names are derived from a content hash, so re-running the job
//! against unchanged input produces identical paths.

/// Build the object path for one partition's part file.
///
/// `partition` holds (column, rendered value) pairs in partition-column
/// order; an empty slice yields an unpartitioned `{table}/{file}` path.
pub fn partition_path(table: &str, partition: &[(String, String)], file_name: &str) -> String {
    let mut path = String::from(table);
    for (column, value) in partition {
        path.push('/');
        path.push_str(column);
        path.push('=');
        path.push_str(&sanitize_value(value));
    }
    path.push('/');
    path.push_str(file_name);
    path
}

/// Part file name from a content hash: `part-{first 16 hex chars}.parquet`.
pub fn part_file_name(hash_hex: &str) -> String {
    let prefix = if hash_hex.len() >= 16 {
        &hash_hex[..16]
    } else {
        hash_hex
    };
    format!("part-{}.parquet", prefix)
}

/// Sanitize a partition value for use in object paths.
///
/// Replaces path-hostile characters with underscores.
fn sanitize_value(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partitioned_path_format() {
        let partition = vec![
            ("year".to_string(), "2018".to_string()),
            ("month".to_string(), "11".to_string()),
        ];
        let path = partition_path("time", &partition, "part-deadbeef.parquet");
        assert_eq!(path, "time/year=2018/month=11/part-deadbeef.parquet");
    }

    #[test]
    fn unpartitioned_path_format() {
        let path = partition_path("artists", &[], "part-deadbeef.parquet");
        assert_eq!(path, "artists/part-deadbeef.parquet");
    }

    #[test]
    fn part_file_name_truncates_hash() {
        assert_eq!(
            part_file_name("deadbeefdeadbeefdeadbeefdeadbeef"),
            "part-deadbeefdeadbeef.parquet"
        );
        assert_eq!(part_file_name("abc"), "part-abc.parquet");
    }

    #[test]
    fn values_are_sanitized() {
        let partition = vec![("artist_id".to_string(), "A/R I:D".to_string())];
        let path = partition_path("songs", &partition, "f.parquet");
        assert_eq!(path, "songs/artist_id=A_R_I_D/f.parquet");
    }
}
