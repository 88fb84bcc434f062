// Arrow schemas for the five output tables.
//
// Each schema is built once and cached behind a OnceLock so batch
// construction and the writer share the same Arc.

use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use std::sync::{Arc, OnceLock};

fn timestamp_ms_utc() -> DataType {
    DataType::Timestamp(TimeUnit::Millisecond, Some("UTC".into()))
}

/// songs: {song_id, title, artist_id, year, duration}
pub fn songs_schema() -> Arc<Schema> {
    static SCHEMA: OnceLock<Arc<Schema>> = OnceLock::new();
    Arc::clone(SCHEMA.get_or_init(|| {
        Arc::new(Schema::new(vec![
            Field::new("song_id", DataType::Utf8, false),
            Field::new("title", DataType::Utf8, false),
            Field::new("artist_id", DataType::Utf8, false),
            Field::new("year", DataType::Int32, false),
            Field::new("duration", DataType::Float64, false),
        ]))
    }))
}

/// artists: {artist_id, name, location, latitude, longitude}
pub fn artists_schema() -> Arc<Schema> {
    static SCHEMA: OnceLock<Arc<Schema>> = OnceLock::new();
    Arc::clone(SCHEMA.get_or_init(|| {
        Arc::new(Schema::new(vec![
            Field::new("artist_id", DataType::Utf8, false),
            Field::new("name", DataType::Utf8, false),
            Field::new("location", DataType::Utf8, true),
            Field::new("latitude", DataType::Float64, true),
            Field::new("longitude", DataType::Float64, true),
        ]))
    }))
}

/// users: {user_id, first_name, last_name, gender, level}
pub fn users_schema() -> Arc<Schema> {
    static SCHEMA: OnceLock<Arc<Schema>> = OnceLock::new();
    Arc::clone(SCHEMA.get_or_init(|| {
        Arc::new(Schema::new(vec![
            Field::new("user_id", DataType::Utf8, false),
            Field::new("first_name", DataType::Utf8, true),
            Field::new("last_name", DataType::Utf8, true),
            Field::new("gender", DataType::Utf8, true),
            Field::new("level", DataType::Utf8, true),
        ]))
    }))
}

/// time: {start_time, hour, day, week, month, year, weekday}
pub fn time_schema() -> Arc<Schema> {
    static SCHEMA: OnceLock<Arc<Schema>> = OnceLock::new();
    Arc::clone(SCHEMA.get_or_init(|| {
        Arc::new(Schema::new(vec![
            Field::new("start_time", timestamp_ms_utc(), false),
            Field::new("hour", DataType::Int32, false),
            Field::new("day", DataType::Int32, false),
            Field::new("week", DataType::Int32, false),
            Field::new("month", DataType::Int32, false),
            Field::new("year", DataType::Int32, false),
            Field::new("weekday", DataType::Int32, false),
        ]))
    }))
}

/// songplays: {songplay_id, start_time, user_id, level, song_id,
/// artist_id, session_id, location, user_agent, year, month}
pub fn songplays_schema() -> Arc<Schema> {
    static SCHEMA: OnceLock<Arc<Schema>> = OnceLock::new();
    Arc::clone(SCHEMA.get_or_init(|| {
        Arc::new(Schema::new(vec![
            Field::new("songplay_id", DataType::Int64, false),
            Field::new("start_time", timestamp_ms_utc(), false),
            Field::new("user_id", DataType::Utf8, false),
            Field::new("level", DataType::Utf8, true),
            Field::new("song_id", DataType::Utf8, true),
            Field::new("artist_id", DataType::Utf8, true),
            Field::new("session_id", DataType::Int64, false),
            Field::new("location", DataType::Utf8, true),
            Field::new("user_agent", DataType::Utf8, true),
            Field::new("year", DataType::Int32, false),
            Field::new("month", DataType::Int32, false),
        ]))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schemas_are_cached() {
        assert!(Arc::ptr_eq(&songs_schema(), &songs_schema()));
        assert!(Arc::ptr_eq(&songplays_schema(), &songplays_schema()));
    }

    #[test]
    fn key_columns_are_non_nullable() {
        assert!(!songs_schema().field_with_name("song_id").unwrap().is_nullable());
        assert!(!artists_schema().field_with_name("artist_id").unwrap().is_nullable());
        assert!(!users_schema().field_with_name("user_id").unwrap().is_nullable());
        assert!(!time_schema().field_with_name("start_time").unwrap().is_nullable());
    }

    #[test]
    fn songplay_join_columns_are_nullable() {
        let schema = songplays_schema();
        assert!(schema.field_with_name("song_id").unwrap().is_nullable());
        assert!(schema.field_with_name("artist_id").unwrap().is_nullable());
    }
}
