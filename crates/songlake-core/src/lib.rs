// songlake-core - pure transformation layer
//
// Source record parsing (serde), derived table rows, calendar
// decomposition, and Arrow RecordBatch construction. No I/O: everything
// here operates on in-memory slices so the same code runs against S3
// data and in-memory test fixtures.

pub mod batch;
pub mod model;
pub mod schema;
pub mod tables;
pub mod transform;

pub use model::{LogRecord, SongRecord};
pub use tables::{ArtistRow, SongRow, SongplayRow, TimeRow, UserRow};

/// Event page value that marks a playback event. Only these rows feed the
/// songplays, users, and time tables.
pub const NEXT_SONG_PAGE: &str = "NextSong";
