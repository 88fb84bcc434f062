// users, time, and songplays tables, derived from the event log.
//
// Calendar decomposition happens in UTC, matching the source data's
// epoch-millisecond timestamps. Weekday numbering is 1 = Sunday through
// 7 = Saturday; week is the ISO week number.

use crate::model::{LogRecord, SongRecord};
use crate::tables::{SongplayRow, TimeRow, UserRow};
use crate::NEXT_SONG_PAGE;
use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Timelike, Utc};
use std::collections::{HashMap, HashSet};

/// Filter the event log to playback events (page == "NextSong").
pub fn next_song_events(records: &[LogRecord]) -> Vec<LogRecord> {
    records
        .iter()
        .filter(|r| r.page == NEXT_SONG_PAGE)
        .cloned()
        .collect()
}

/// Derive the users table, keyed by user_id.
///
/// The latest event for a user wins, so a free-tier user who upgraded
/// mid-log ends up with level = "paid". Rows keep first-seen order;
/// empty user ids (logged-out sessions) are skipped.
pub fn users_table(events: &[LogRecord]) -> Vec<UserRow> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut rows: Vec<UserRow> = Vec::new();

    for event in events {
        if event.user_id.is_empty() {
            continue;
        }
        let row = UserRow {
            user_id: event.user_id.clone(),
            first_name: event.first_name.clone(),
            last_name: event.last_name.clone(),
            gender: event.gender.clone(),
            level: event.level.clone(),
        };
        match index.get(event.user_id.as_str()) {
            Some(&i) => rows[i] = row,
            None => {
                index.insert(event.user_id.as_str(), rows.len());
                rows.push(row);
            }
        }
    }

    rows
}

/// Derive the time table: one row per distinct event timestamp, with
/// calendar fields decomposed in UTC. First occurrence wins.
pub fn time_table(events: &[LogRecord]) -> Result<Vec<TimeRow>> {
    let mut seen: HashSet<i64> = HashSet::with_capacity(events.len());
    let mut rows = Vec::with_capacity(events.len());

    for event in events {
        if !seen.insert(event.ts) {
            continue;
        }
        rows.push(decompose_millis(event.ts)?);
    }

    Ok(rows)
}

/// Derive the songplays table.
///
/// Each playback event is left-joined against song metadata on
/// (title, artist name, duration) to resolve song_id/artist_id; events
/// with no exact match keep both null. Duration is compared bitwise, so
/// only values identical to the metadata resolve. Duplicate join keys on
/// the song side resolve to the first metadata record.
pub fn songplays_table(events: &[LogRecord], songs: &[SongRecord]) -> Result<Vec<SongplayRow>> {
    // (title, artist_name, duration bits) -> (song_id, artist_id)
    let mut by_song: HashMap<(&str, &str, u64), (&str, &str)> =
        HashMap::with_capacity(songs.len());
    for song in songs {
        by_song
            .entry((
                song.title.as_str(),
                song.artist_name.as_str(),
                song.duration.to_bits(),
            ))
            .or_insert((song.song_id.as_str(), song.artist_id.as_str()));
    }

    let mut rows = Vec::with_capacity(events.len());
    for (id, event) in events.iter().enumerate() {
        let resolved = match (&event.song, &event.artist, event.length) {
            (Some(song), Some(artist), Some(length)) => by_song
                .get(&(song.as_str(), artist.as_str(), length.to_bits()))
                .copied(),
            _ => None,
        };

        let time = decompose_millis(event.ts)?;
        rows.push(SongplayRow {
            songplay_id: id as i64,
            start_time_ms: event.ts,
            user_id: event.user_id.clone(),
            level: event.level.clone(),
            song_id: resolved.map(|(song_id, _)| song_id.to_string()),
            artist_id: resolved.map(|(_, artist_id)| artist_id.to_string()),
            session_id: event.session_id,
            location: event.location.clone(),
            user_agent: event.user_agent.clone(),
            year: time.year,
            month: time.month,
        });
    }

    Ok(rows)
}

/// Decompose an epoch-millisecond timestamp into calendar fields (UTC).
pub fn decompose_millis(ts_millis: i64) -> Result<TimeRow> {
    let dt: DateTime<Utc> = DateTime::from_timestamp_millis(ts_millis)
        .with_context(|| format!("event timestamp out of range: {} ms", ts_millis))?;

    Ok(TimeRow {
        start_time_ms: ts_millis,
        hour: dt.hour() as i32,
        day: dt.day() as i32,
        week: dt.iso_week().week() as i32,
        month: dt.month() as i32,
        year: dt.year(),
        weekday: dt.weekday().number_from_sunday() as i32,
    })
}
