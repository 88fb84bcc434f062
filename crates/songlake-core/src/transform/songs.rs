// songs and artists tables: column projection + de-duplication over the
// song metadata dataset.

use crate::model::SongRecord;
use crate::tables::{ArtistRow, SongRow};
use std::collections::HashSet;

/// Project song metadata to the songs table, keeping the first record
/// per song_id. Input order is preserved.
pub fn songs_table(records: &[SongRecord]) -> Vec<SongRow> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(records.len());
    let mut rows = Vec::with_capacity(records.len());

    for record in records {
        if !seen.insert(record.song_id.as_str()) {
            continue;
        }
        rows.push(SongRow {
            song_id: record.song_id.clone(),
            title: record.title.clone(),
            artist_id: record.artist_id.clone(),
            year: record.year,
            duration: record.duration,
        });
    }

    rows
}

/// Project song metadata to the artists table, keeping the first record
/// per artist_id. An artist appearing on several songs yields one row.
pub fn artists_table(records: &[SongRecord]) -> Vec<ArtistRow> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(records.len());
    let mut rows = Vec::with_capacity(records.len());

    for record in records {
        if !seen.insert(record.artist_id.as_str()) {
            continue;
        }
        rows.push(ArtistRow {
            artist_id: record.artist_id.clone(),
            name: record.artist_name.clone(),
            location: record.artist_location.clone(),
            latitude: record.artist_latitude,
            longitude: record.artist_longitude,
        });
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(song_id: &str, artist_id: &str, title: &str) -> SongRecord {
        SongRecord {
            song_id: song_id.to_string(),
            title: title.to_string(),
            artist_id: artist_id.to_string(),
            artist_name: format!("artist-{}", artist_id),
            artist_location: None,
            artist_latitude: None,
            artist_longitude: None,
            year: 2018,
            duration: 200.0,
        }
    }

    #[test]
    fn songs_dedupe_by_song_id_first_wins() {
        let records = vec![
            song("S1", "A1", "first title"),
            song("S2", "A1", "other"),
            song("S1", "A1", "second title"),
        ];

        let rows = songs_table(&records);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].song_id, "S1");
        assert_eq!(rows[0].title, "first title");
        assert_eq!(rows[1].song_id, "S2");
    }

    #[test]
    fn songs_cardinality_equals_input_when_ids_unique() {
        let records: Vec<_> = (0..10)
            .map(|i| song(&format!("S{}", i), "A1", "t"))
            .collect();
        assert_eq!(songs_table(&records).len(), records.len());
    }

    #[test]
    fn artists_dedupe_by_artist_id() {
        let records = vec![
            song("S1", "A1", "t1"),
            song("S2", "A1", "t2"),
            song("S3", "A2", "t3"),
        ];

        let rows = artists_table(&records);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].artist_id, "A1");
        assert_eq!(rows[1].artist_id, "A2");
    }
}
