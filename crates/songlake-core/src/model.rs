// Source record types for the two input datasets.
//
// Each input file is one JSON object per line. Unknown fields are
// ignored (the raw files carry extras like num_songs, auth, method,
// status that no output table uses).

use serde::{Deserialize, Deserializer};

/// One row of song metadata, as found in song-data/ files.
#[derive(Debug, Clone, Deserialize)]
pub struct SongRecord {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub artist_name: String,
    pub artist_location: Option<String>,
    pub artist_latitude: Option<f64>,
    pub artist_longitude: Option<f64>,
    pub year: i32,
    pub duration: f64,
}

/// One user action event, as found in log-data/ files.
///
/// The wire format uses camelCase field names (`userId`, `sessionId`, ...).
/// `userId` appears both as a JSON string and as a bare number in the
/// source data, and is empty for logged-out sessions.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    #[serde(default, deserialize_with = "string_or_number")]
    pub user_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<String>,
    /// Event time, epoch milliseconds.
    pub ts: i64,
    pub page: String,
    pub song: Option<String>,
    pub artist: Option<String>,
    /// Play duration in seconds; joined against SongRecord::duration.
    pub length: Option<f64>,
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => String::new(),
        Some(Raw::Str(s)) => s,
        Some(Raw::Int(n)) => n.to_string(),
    })
}
