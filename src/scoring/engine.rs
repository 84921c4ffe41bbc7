use crate::error::PoolError;
use crate::picks::align_picks;
use crate::season::types::{Game, GameId, Pick, PickId, Selection, Winner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickStatus {
    Correct,
    Incorrect,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grade {
    pub status: PickStatus,
    pub credited: u32,
}

impl Grade {
    pub fn is_correct(&self) -> bool {
        self.status == PickStatus::Correct
    }
}

/// A pick together with how it fared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradedPick {
    pub pick_id: PickId,
    pub game_id: GameId,
    pub selection: Selection,
    pub points: u32,
    pub grade: Grade,
}

/// Grade one pick against its game.
///
/// Pending games credit nothing whatever was picked. On a final score the
/// pick is correct only when its side scored strictly more; a tie or an empty
/// selection is incorrect.
pub fn grade(game: &Game, pick: &Pick) -> Grade {
    let Some(winner) = game.outcome.winner() else {
        return Grade {
            status: PickStatus::Pending,
            credited: 0,
        };
    };

    let correct = match (pick.selection, winner) {
        (Selection::Home, Winner::Home) | (Selection::Away, Winner::Away) => true,
        (_, Winner::Tie) => false,
        (Selection::None, _) | (Selection::Home, Winner::Away) | (Selection::Away, Winner::Home) => {
            false
        }
    };

    if correct {
        Grade {
            status: PickStatus::Correct,
            credited: pick.points,
        }
    } else {
        Grade {
            status: PickStatus::Incorrect,
            credited: 0,
        }
    }
}

/// Grade a user's picks for a week, in the order of `games`.
///
/// A user with no picks at all for the week (joined after picks were
/// generated) grades to nothing. A partial set is still an alignment error.
pub fn grade_week(games: &[Game], picks: Vec<Pick>) -> Result<Vec<GradedPick>, PoolError> {
    if picks.is_empty() {
        return Ok(Vec::new());
    }
    let aligned = align_picks(games, picks)?;
    Ok(games
        .iter()
        .zip(aligned)
        .map(|(game, pick)| GradedPick {
            pick_id: pick.id,
            game_id: game.id,
            selection: pick.selection,
            points: pick.points,
            grade: grade(game, &pick),
        })
        .collect())
}
