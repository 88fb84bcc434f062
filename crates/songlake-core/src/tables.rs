// Derived table row types.
//
// One struct per output table. The key column of each table is unique
// within that table; the transform layer enforces it.

/// songs table row, unique by song_id. Partitioned by (year, artist_id).
#[derive(Debug, Clone, PartialEq)]
pub struct SongRow {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: i32,
    pub duration: f64,
}

/// artists table row, unique by artist_id.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistRow {
    pub artist_id: String,
    pub name: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// users table row, unique by user_id. Latest event wins on duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRow {
    pub user_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
}

/// time table row, unique by start_time. Partitioned by (year, month).
///
/// All calendar fields are decomposed from the epoch-millisecond event
/// time in UTC; weekday is 1 = Sunday through 7 = Saturday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRow {
    pub start_time_ms: i64,
    pub hour: i32,
    pub day: i32,
    pub week: i32,
    pub month: i32,
    pub year: i32,
    pub weekday: i32,
}

/// songplays table row, one per NextSong event. Partitioned by (year, month).
///
/// song_id/artist_id are resolved by joining the event's (song, artist,
/// length) against song metadata; both stay null when nothing matches.
#[derive(Debug, Clone, PartialEq)]
pub struct SongplayRow {
    pub songplay_id: i64,
    pub start_time_ms: i64,
    pub user_id: String,
    pub level: Option<String>,
    pub song_id: Option<String>,
    pub artist_id: Option<String>,
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
    pub year: i32,
    pub month: i32,
}
