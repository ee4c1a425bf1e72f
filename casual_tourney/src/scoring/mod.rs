//! Placement scoring and standings aggregation.

pub mod placement;
pub mod standings;

pub use placement::{MAX_RANKED, POINTS_BY_RANK, Placement, score_placements};
pub use standings::{OMW_FLOOR, RoundPoints, build_standings, round_points};
