pub mod engine;
pub mod results;
pub mod standings;

pub use engine::{grade, grade_week, Grade, GradedPick, PickStatus};
pub use results::{weekly_results, ResultCell, ResultsRow, WeeklyResults};
pub use standings::{rank_standings, season_standings, StandingsRow, StandingsScope};
