//! Table partitioning and round seeding.

pub mod manual;
pub mod partition;
pub mod seeding;
pub mod shuffler;

pub use manual::{ManualPairing, validate_coverage};
pub use partition::{has_fallback_table, partition};
pub use seeding::{RoundSeeder, SeededRound, group_tables, rank_order};
pub use shuffler::SeatShuffler;
