// Table derivation: pure projections, de-duplication, and the
// songplay join. Tie-breaks are deterministic: first occurrence wins
// everywhere except the users table, where the latest event wins.

mod plays;
mod songs;

pub use plays::{decompose_millis, next_song_events, songplays_table, time_table, users_table};
pub use songs::{artists_table, songs_table};
