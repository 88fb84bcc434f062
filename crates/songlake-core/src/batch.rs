// Row vectors to Arrow RecordBatch conversion.
//
// One builder pass per table against the cached schemas in
// crate::schema. The writer consumes these batches directly.

use crate::schema;
use crate::tables::{ArtistRow, SongRow, SongplayRow, TimeRow, UserRow};
use anyhow::{Context, Result};
use arrow::array::{
    Float64Builder, Int32Builder, Int64Builder, RecordBatch, StringBuilder,
    TimestampMillisecondBuilder,
};
use std::sync::Arc;

pub fn songs_batch(rows: &[SongRow]) -> Result<RecordBatch> {
    let capacity = rows.len();
    let mut song_id = StringBuilder::with_capacity(capacity, capacity * 18);
    let mut title = StringBuilder::with_capacity(capacity, capacity * 24);
    let mut artist_id = StringBuilder::with_capacity(capacity, capacity * 18);
    let mut year = Int32Builder::with_capacity(capacity);
    let mut duration = Float64Builder::with_capacity(capacity);

    for row in rows {
        song_id.append_value(&row.song_id);
        title.append_value(&row.title);
        artist_id.append_value(&row.artist_id);
        year.append_value(row.year);
        duration.append_value(row.duration);
    }

    RecordBatch::try_new(
        schema::songs_schema(),
        vec![
            Arc::new(song_id.finish()),
            Arc::new(title.finish()),
            Arc::new(artist_id.finish()),
            Arc::new(year.finish()),
            Arc::new(duration.finish()),
        ],
    )
    .context("Failed to build songs batch")
}

pub fn artists_batch(rows: &[ArtistRow]) -> Result<RecordBatch> {
    let capacity = rows.len();
    let mut artist_id = StringBuilder::with_capacity(capacity, capacity * 18);
    let mut name = StringBuilder::with_capacity(capacity, capacity * 24);
    let mut location = StringBuilder::with_capacity(capacity, capacity * 24);
    let mut latitude = Float64Builder::with_capacity(capacity);
    let mut longitude = Float64Builder::with_capacity(capacity);

    for row in rows {
        artist_id.append_value(&row.artist_id);
        name.append_value(&row.name);
        location.append_option(row.location.as_deref());
        latitude.append_option(row.latitude);
        longitude.append_option(row.longitude);
    }

    RecordBatch::try_new(
        schema::artists_schema(),
        vec![
            Arc::new(artist_id.finish()),
            Arc::new(name.finish()),
            Arc::new(location.finish()),
            Arc::new(latitude.finish()),
            Arc::new(longitude.finish()),
        ],
    )
    .context("Failed to build artists batch")
}

pub fn users_batch(rows: &[UserRow]) -> Result<RecordBatch> {
    let capacity = rows.len();
    let mut user_id = StringBuilder::with_capacity(capacity, capacity * 4);
    let mut first_name = StringBuilder::with_capacity(capacity, capacity * 12);
    let mut last_name = StringBuilder::with_capacity(capacity, capacity * 12);
    let mut gender = StringBuilder::with_capacity(capacity, capacity);
    let mut level = StringBuilder::with_capacity(capacity, capacity * 4);

    for row in rows {
        user_id.append_value(&row.user_id);
        first_name.append_option(row.first_name.as_deref());
        last_name.append_option(row.last_name.as_deref());
        gender.append_option(row.gender.as_deref());
        level.append_option(row.level.as_deref());
    }

    RecordBatch::try_new(
        schema::users_schema(),
        vec![
            Arc::new(user_id.finish()),
            Arc::new(first_name.finish()),
            Arc::new(last_name.finish()),
            Arc::new(gender.finish()),
            Arc::new(level.finish()),
        ],
    )
    .context("Failed to build users batch")
}

pub fn time_batch(rows: &[TimeRow]) -> Result<RecordBatch> {
    let capacity = rows.len();
    let mut start_time = TimestampMillisecondBuilder::with_capacity(capacity).with_timezone("UTC");
    let mut hour = Int32Builder::with_capacity(capacity);
    let mut day = Int32Builder::with_capacity(capacity);
    let mut week = Int32Builder::with_capacity(capacity);
    let mut month = Int32Builder::with_capacity(capacity);
    let mut year = Int32Builder::with_capacity(capacity);
    let mut weekday = Int32Builder::with_capacity(capacity);

    for row in rows {
        start_time.append_value(row.start_time_ms);
        hour.append_value(row.hour);
        day.append_value(row.day);
        week.append_value(row.week);
        month.append_value(row.month);
        year.append_value(row.year);
        weekday.append_value(row.weekday);
    }

    RecordBatch::try_new(
        schema::time_schema(),
        vec![
            Arc::new(start_time.finish()),
            Arc::new(hour.finish()),
            Arc::new(day.finish()),
            Arc::new(week.finish()),
            Arc::new(month.finish()),
            Arc::new(year.finish()),
            Arc::new(weekday.finish()),
        ],
    )
    .context("Failed to build time batch")
}

pub fn songplays_batch(rows: &[SongplayRow]) -> Result<RecordBatch> {
    let capacity = rows.len();
    let mut songplay_id = Int64Builder::with_capacity(capacity);
    let mut start_time = TimestampMillisecondBuilder::with_capacity(capacity).with_timezone("UTC");
    let mut user_id = StringBuilder::with_capacity(capacity, capacity * 4);
    let mut level = StringBuilder::with_capacity(capacity, capacity * 4);
    let mut song_id = StringBuilder::with_capacity(capacity, capacity * 18);
    let mut artist_id = StringBuilder::with_capacity(capacity, capacity * 18);
    let mut session_id = Int64Builder::with_capacity(capacity);
    let mut location = StringBuilder::with_capacity(capacity, capacity * 24);
    let mut user_agent = StringBuilder::with_capacity(capacity, capacity * 64);
    let mut year = Int32Builder::with_capacity(capacity);
    let mut month = Int32Builder::with_capacity(capacity);

    for row in rows {
        songplay_id.append_value(row.songplay_id);
        start_time.append_value(row.start_time_ms);
        user_id.append_value(&row.user_id);
        level.append_option(row.level.as_deref());
        song_id.append_option(row.song_id.as_deref());
        artist_id.append_option(row.artist_id.as_deref());
        session_id.append_value(row.session_id);
        location.append_option(row.location.as_deref());
        user_agent.append_option(row.user_agent.as_deref());
        year.append_value(row.year);
        month.append_value(row.month);
    }

    RecordBatch::try_new(
        schema::songplays_schema(),
        vec![
            Arc::new(songplay_id.finish()),
            Arc::new(start_time.finish()),
            Arc::new(user_id.finish()),
            Arc::new(level.finish()),
            Arc::new(song_id.finish()),
            Arc::new(artist_id.finish()),
            Arc::new(session_id.finish()),
            Arc::new(location.finish()),
            Arc::new(user_agent.finish()),
            Arc::new(year.finish()),
            Arc::new(month.finish()),
        ],
    )
    .context("Failed to build songplays batch")
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, StringArray};

    #[test]
    fn songs_batch_matches_schema() {
        let rows = vec![SongRow {
            song_id: "S1".to_string(),
            title: "Uprising".to_string(),
            artist_id: "A1".to_string(),
            year: 2009,
            duration: 230.81712,
        }];

        let batch = songs_batch(&rows).unwrap();
        assert_eq!(batch.num_rows(), 1);
        assert_eq!(batch.schema(), schema::songs_schema());
    }

    #[test]
    fn empty_tables_produce_empty_batches() {
        assert_eq!(users_batch(&[]).unwrap().num_rows(), 0);
        assert_eq!(time_batch(&[]).unwrap().num_rows(), 0);
        assert_eq!(songplays_batch(&[]).unwrap().num_rows(), 0);
    }

    #[test]
    fn songplays_batch_preserves_null_join_columns() {
        let rows = vec![SongplayRow {
            songplay_id: 0,
            start_time_ms: 1541440395796,
            user_id: "37".to_string(),
            level: Some("free".to_string()),
            song_id: None,
            artist_id: None,
            session_id: 814,
            location: None,
            user_agent: None,
            year: 2018,
            month: 11,
        }];

        let batch = songplays_batch(&rows).unwrap();
        let song_id = batch
            .column_by_name("song_id")
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert!(song_id.is_null(0));
    }
}
