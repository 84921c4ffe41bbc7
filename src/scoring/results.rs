use super::engine::{grade, grade_week, GradedPick, PickStatus};
use super::standings::total_points;
use crate::error::PoolError;
use crate::season::provider::DataProvider;
use crate::season::types::{Game, GameId, Pick, Selection, Team, TeamId, User};
use std::collections::HashMap;

/// One user's entry for one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCell {
    /// Abbreviation of the picked team, empty when nothing was picked.
    pub label: String,
    pub points: u32,
    pub status: PickStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsRow {
    /// "AWY/HOM"
    pub matchup: String,
    pub cells: Vec<ResultCell>,
}

/// A week's grid: one row per game, one column per user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyResults {
    pub year: i32,
    pub week: u32,
    pub users: Vec<User>,
    pub rows: Vec<ResultsRow>,
    pub totals: Vec<u32>,
}

fn abbreviation(teams: &HashMap<TeamId, Team>, id: TeamId) -> String {
    teams
        .get(&id)
        .map(|t| t.abbreviation.clone())
        .unwrap_or_else(|| format!("#{}", id))
}

pub fn matchup_label(teams: &HashMap<TeamId, Team>, game: &Game) -> String {
    format!("{}/{}", abbreviation(teams, game.away), abbreviation(teams, game.home))
}

fn empty_cell(game: &Game) -> ResultCell {
    ResultCell {
        label: String::new(),
        points: 0,
        status: grade(game, &Pick::empty(0, "", game.id)).status,
    }
}

fn cell(teams: &HashMap<TeamId, Team>, game: &Game, graded: &GradedPick) -> ResultCell {
    let label = match graded.selection {
        Selection::Away => abbreviation(teams, game.away),
        Selection::Home => abbreviation(teams, game.home),
        Selection::None => String::new(),
    };
    ResultCell {
        label,
        points: graded.points,
        status: graded.grade.status,
    }
}

/// Lay out graded picks as a grid, one list per user in the order of
/// `users`. Games a user has no graded pick for get an empty cell.
pub(crate) fn build_results(
    year: i32,
    week: u32,
    teams: &HashMap<TeamId, Team>,
    users: Vec<User>,
    games: &[Game],
    graded: &[Vec<GradedPick>],
) -> WeeklyResults {
    let by_game: Vec<HashMap<GameId, &GradedPick>> = graded
        .iter()
        .map(|user_picks| user_picks.iter().map(|g| (g.game_id, g)).collect())
        .collect();

    let rows = games
        .iter()
        .map(|game| ResultsRow {
            matchup: matchup_label(teams, game),
            cells: by_game
                .iter()
                .map(|user_picks| match user_picks.get(&game.id) {
                    Some(graded) => cell(teams, game, graded),
                    None => empty_cell(game),
                })
                .collect(),
        })
        .collect();

    let totals = graded.iter().map(|user_picks| total_points(user_picks)).collect();

    WeeklyResults {
        year,
        week,
        users,
        rows,
        totals,
    }
}

/// Grade every user's picks for one week and lay them out as a grid.
/// Users are ordered by display name.
pub fn weekly_results<P: DataProvider + ?Sized>(
    provider: &P,
    year: i32,
    week: u32,
) -> Result<WeeklyResults, PoolError> {
    let teams = provider.teams();
    let mut users = provider.users();
    users.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    let games = provider.weekly_games(year, week)?;

    let graded = users
        .iter()
        .map(|user| grade_week(&games, provider.weekly_picks(&user.id, year, week)?))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(build_results(year, week, &teams, users, &games, &graded))
}
