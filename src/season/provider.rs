use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use super::types::{Game, GameId, Outcome, Pick, PickEdit, PickId, Pvs, Team, TeamId, User, Week};
use crate::error::PoolError;

/// What the pool needs from wherever games, picks and weeks are stored.
pub trait DataProvider {
    fn users(&self) -> Vec<User>;

    fn teams(&self) -> HashMap<TeamId, Team>;

    /// Games of a week, ordered by kickoff then id.
    fn weekly_games(&self, year: i32, week: u32) -> Result<Vec<Game>, PoolError>;

    /// A user's picks for a week, in storage order.
    fn weekly_picks(&self, user: &str, year: i32, week: u32) -> Result<Vec<Pick>, PoolError>;

    fn week_pvs(&self, year: i32, week: u32) -> Result<Pvs, PoolError>;

    /// The most recent week whose start is at or before `now`.
    fn current_week(&self, now: DateTime<Utc>) -> Result<(i32, u32), PoolError>;
}

pub const SEASON_DATA_VERSION: u32 = 1;

/// Whole-pool snapshot: the file-backed stand-in for the relational store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeasonData {
    pub version: u32,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub weeks: Vec<Week>,
    #[serde(default)]
    pub games: Vec<Game>,
    #[serde(default)]
    pub picks: Vec<Pick>,
}

impl Default for SeasonData {
    fn default() -> Self {
        Self::new()
    }
}

impl SeasonData {
    pub fn new() -> Self {
        Self {
            version: SEASON_DATA_VERSION,
            users: Vec::new(),
            teams: Vec::new(),
            weeks: Vec::new(),
            games: Vec::new(),
            picks: Vec::new(),
        }
    }

    fn week(&self, year: i32, week: u32) -> Result<&Week, PoolError> {
        self.weeks
            .iter()
            .find(|w| w.year == year && w.week == week)
            .ok_or(PoolError::UnknownWeek { year, week })
    }

    /// Write accepted edits for `user`. Every edit must target one of the
    /// user's picks; nothing is written unless all of them do.
    pub fn apply_edits(&mut self, user: &str, edits: &[PickEdit]) -> Result<(), PoolError> {
        for edit in edits {
            let pick = self
                .picks
                .iter()
                .find(|p| p.id == edit.pick_id)
                .ok_or(PoolError::UnknownPick {
                    pick_id: edit.pick_id,
                })?;
            if pick.user != user {
                return Err(PoolError::NotOwner {
                    pick_id: edit.pick_id,
                    user: user.to_string(),
                });
            }
        }

        let by_pick: HashMap<PickId, &PickEdit> = edits.iter().map(|e| (e.pick_id, e)).collect();
        for pick in self.picks.iter_mut() {
            if let Some(edit) = by_pick.get(&pick.id) {
                pick.selection = edit.selection;
                pick.points = edit.points;
            }
        }
        debug!(user, count = edits.len(), "applied pick edits");
        Ok(())
    }

    /// Create an empty pick for every user and game of `year` that lacks one.
    /// Returns the number of picks created.
    pub fn generate_season_picks(&mut self, year: i32) -> Result<usize, PoolError> {
        if !self.weeks.iter().any(|w| w.year == year) {
            return Err(PoolError::NoWeeksForYear(year));
        }

        let existing: HashSet<(String, GameId)> = self
            .picks
            .iter()
            .map(|p| (p.user.clone(), p.game_id))
            .collect();
        let mut next_id = self.picks.iter().map(|p| p.id).max().unwrap_or(0) + 1;

        let game_ids: Vec<GameId> = self
            .games
            .iter()
            .filter(|g| g.year == year)
            .map(|g| g.id)
            .collect();

        let mut created = 0;
        for user in &self.users {
            for &game_id in &game_ids {
                if existing.contains(&(user.id.clone(), game_id)) {
                    continue;
                }
                self.picks.push(Pick::empty(next_id, &user.id, game_id));
                next_id += 1;
                created += 1;
            }
        }

        info!(year, created, "generated season picks");
        Ok(created)
    }

    /// Record the result of a game.
    pub fn set_outcome(&mut self, game_id: GameId, outcome: Outcome) -> Result<(), PoolError> {
        let game = self
            .games
            .iter_mut()
            .find(|g| g.id == game_id)
            .ok_or(PoolError::UnknownGameId(game_id))?;
        game.outcome = outcome;
        Ok(())
    }

    fn has_user(&self, user: &str) -> bool {
        self.users.iter().any(|u| u.id == user)
    }
}

impl DataProvider for SeasonData {
    fn users(&self) -> Vec<User> {
        self.users.clone()
    }

    fn teams(&self) -> HashMap<TeamId, Team> {
        self.teams.iter().map(|t| (t.id, t.clone())).collect()
    }

    fn weekly_games(&self, year: i32, week: u32) -> Result<Vec<Game>, PoolError> {
        self.week(year, week)?;
        let mut games: Vec<Game> = self
            .games
            .iter()
            .filter(|g| g.year == year && g.week == week)
            .cloned()
            .collect();
        games.sort_by(|a, b| a.kickoff.cmp(&b.kickoff).then(a.id.cmp(&b.id)));
        Ok(games)
    }

    fn weekly_picks(&self, user: &str, year: i32, week: u32) -> Result<Vec<Pick>, PoolError> {
        if !self.has_user(user) {
            return Err(PoolError::UnknownUser(user.to_string()));
        }
        self.week(year, week)?;
        let week_games: HashSet<GameId> = self
            .games
            .iter()
            .filter(|g| g.year == year && g.week == week)
            .map(|g| g.id)
            .collect();
        Ok(self
            .picks
            .iter()
            .filter(|p| p.user == user && week_games.contains(&p.game_id))
            .cloned()
            .collect())
    }

    fn week_pvs(&self, year: i32, week: u32) -> Result<Pvs, PoolError> {
        Ok(self.week(year, week)?.pvs.clone())
    }

    fn current_week(&self, now: DateTime<Utc>) -> Result<(i32, u32), PoolError> {
        self.weeks
            .iter()
            .filter(|w| w.start <= now)
            .max_by(|a, b| a.start.cmp(&b.start).then((a.year, a.week).cmp(&(b.year, b.week))))
            .map(|w| (w.year, w.week))
            .ok_or(PoolError::NoCurrentWeek)
    }
}
