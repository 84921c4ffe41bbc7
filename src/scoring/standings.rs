use std::cmp::Ordering;
use std::collections::HashMap;

use super::engine::{grade_week, GradedPick};
use crate::error::PoolError;
use crate::season::provider::DataProvider;
use crate::season::types::User;

/// Which weeks a standings table covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandingsScope {
    /// A single week.
    Week { year: i32, week: u32 },
    /// Weeks 1 through `week` of the season.
    SeasonThrough { year: i32, week: u32 },
}

impl StandingsScope {
    pub fn year(&self) -> i32 {
        match *self {
            StandingsScope::Week { year, .. } | StandingsScope::SeasonThrough { year, .. } => year,
        }
    }

    pub fn weeks(&self) -> std::ops::RangeInclusive<u32> {
        match *self {
            StandingsScope::Week { week, .. } => week..=week,
            StandingsScope::SeasonThrough { week, .. } => 1..=week,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandingsRow {
    /// Competition rank: tied totals share a rank and the next rank skips.
    pub rank: usize,
    pub user: User,
    pub total: u32,
}

/// Sum of points credited on correct picks.
pub fn total_points(graded: &[GradedPick]) -> u32 {
    graded
        .iter()
        .filter(|g| g.grade.is_correct())
        .map(|g| g.grade.credited)
        .sum()
}

/// Rank users by their credited totals. Users missing from `graded` score 0.
/// Equal totals are ordered by display name, then user id.
pub fn rank_standings(users: &[User], graded: &HashMap<String, Vec<GradedPick>>) -> Vec<StandingsRow> {
    let mut rows: Vec<StandingsRow> = users
        .iter()
        .map(|user| StandingsRow {
            rank: 0,
            user: user.clone(),
            total: graded.get(&user.id).map(|g| total_points(g)).unwrap_or(0),
        })
        .collect();

    rows.sort_by(|a, b| {
        // Primary: total descending
        let total_cmp = b.total.cmp(&a.total);
        if total_cmp != Ordering::Equal {
            return total_cmp;
        }
        a.user
            .name
            .to_lowercase()
            .cmp(&b.user.name.to_lowercase())
            .then_with(|| a.user.id.cmp(&b.user.id))
    });

    let mut previous_total = None;
    let mut rank = 0;
    for (idx, row) in rows.iter_mut().enumerate() {
        if previous_total != Some(row.total) {
            rank = idx + 1;
            previous_total = Some(row.total);
        }
        row.rank = rank;
    }

    rows
}

/// Grade every user's picks over `scope` and rank them.
pub fn season_standings<P: DataProvider + ?Sized>(
    provider: &P,
    scope: StandingsScope,
) -> Result<Vec<StandingsRow>, PoolError> {
    let users = provider.users();
    let year = scope.year();
    let mut graded: HashMap<String, Vec<GradedPick>> = HashMap::new();

    for week in scope.weeks() {
        let games = provider.weekly_games(year, week)?;
        if games.is_empty() {
            tracing::debug!(year, week, "no games, skipping week");
            continue;
        }
        for user in &users {
            let picks = provider.weekly_picks(&user.id, year, week)?;
            let week_graded = grade_week(&games, picks)?;
            graded.entry(user.id.clone()).or_default().extend(week_graded);
        }
    }

    Ok(rank_standings(&users, &graded))
}
