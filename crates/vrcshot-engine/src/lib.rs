pub mod grouping;
pub mod players;

pub use grouping::{PhotoGroup, group_photos};
pub use players::{distinct_players, pair_player_sessions};
