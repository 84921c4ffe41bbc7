use thiserror::Error;

use crate::season::types::{GameId, PickId};

/// Data-integrity failures. Any of these aborts the computation that hit it;
/// validation rejections and pending/tied games are not errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("No pick found for game {game_id}")]
    MissingPick { game_id: GameId },
    #[error("Pick references game {game_id}, which is not in this week")]
    UnknownGame { game_id: GameId },
    #[error("More than one pick for game {game_id}")]
    DuplicatePick { game_id: GameId },
    #[error("Pick {pick_id} is not one of this user's picks for the week")]
    UnknownPick { pick_id: PickId },
    #[error("Pick {pick_id} does not belong to {user}")]
    NotOwner { pick_id: PickId, user: String },
    #[error("Unknown user: {0}")]
    UnknownUser(String),
    #[error("Unknown game: {0}")]
    UnknownGameId(GameId),
    #[error("Week {week} of {year} does not exist")]
    UnknownWeek { year: i32, week: u32 },
    #[error("No weeks defined for {0}")]
    NoWeeksForYear(i32),
    #[error("No week has started yet")]
    NoCurrentWeek,
}
