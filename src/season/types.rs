use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type GameId = i64;
pub type PickId = i64;
pub type TeamId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub city: String,
    pub nickname: String,
    pub abbreviation: String,
    #[serde(default)]
    pub stadium: String,
}

impl Team {
    /// "City Nickname", e.g. "Green Bay Packers"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.city, self.nickname)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String, // login e-mail
    pub name: String,
}

/// Result of a game. Zero is a real score, so "not played yet" is its own variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Outcome {
    #[default]
    Pending,
    Final { home: u32, away: u32 },
}

/// Which side a final score favours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    Away,
    Home,
    Tie,
}

impl Outcome {
    pub fn is_pending(&self) -> bool {
        matches!(self, Outcome::Pending)
    }

    /// `None` while pending.
    pub fn winner(&self) -> Option<Winner> {
        match *self {
            Outcome::Pending => None,
            Outcome::Final { home, away } if home > away => Some(Winner::Home),
            Outcome::Final { home, away } if away > home => Some(Winner::Away),
            Outcome::Final { .. } => Some(Winner::Tie),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub year: i32,
    pub week: u32,
    pub home: TeamId,
    pub away: TeamId,
    pub kickoff: DateTime<Utc>,
    #[serde(default)]
    pub outcome: Outcome,
}

impl Game {
    /// Picks on this game are frozen once kickoff has passed.
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        now >= self.kickoff
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    #[default]
    None,
    Away,
    Home,
}

impl Selection {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "0" => Some(Selection::None),
            "away" | "1" => Some(Selection::Away),
            "home" | "2" => Some(Selection::Home),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    pub id: PickId,
    pub user: String,
    pub game_id: GameId,
    #[serde(default)]
    pub selection: Selection,
    #[serde(default)]
    pub points: u32,
}

impl Pick {
    /// An unpicked row, as created when a season's picks are generated.
    pub fn empty(id: PickId, user: &str, game_id: GameId) -> Self {
        Self {
            id,
            user: user.to_string(),
            game_id,
            selection: Selection::None,
            points: 0,
        }
    }
}

/// A proposed change to one pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickEdit {
    pub pick_id: PickId,
    pub selection: Selection,
    pub points: u32,
}

impl PickEdit {
    /// Parse `ID=SEL:POINTS`, e.g. `12=home:5` or `12=none`.
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        let (id, rest) = s
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("Expected ID=SELECTION:POINTS, got '{}'", s))?;
        let pick_id: PickId = id.trim().parse()?;
        let (sel, points): (&str, u32) = match rest.split_once(':') {
            Some((sel, points)) => (sel, points.trim().parse()?),
            None => (rest, 0),
        };
        let selection = Selection::parse(sel)
            .ok_or_else(|| anyhow::anyhow!("Selection must be away, home or none: '{}'", sel))?;
        Ok(Self {
            pick_id,
            selection,
            points,
        })
    }
}

/// The legal point values, e.g. `[1, 3, 5, 7]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointDomain(Vec<u32>);

impl Default for PointDomain {
    fn default() -> Self {
        Self(vec![1, 3, 5, 7])
    }
}

impl PointDomain {
    pub fn new(mut values: Vec<u32>) -> Self {
        values.sort_unstable();
        values.dedup();
        Self(values)
    }

    pub fn contains(&self, points: u32) -> bool {
        self.0.contains(&points)
    }

    pub fn values(&self) -> &[u32] {
        &self.0
    }
}

/// Per-week caps: point value -> maximum number of picks carrying it.
/// Values without an entry are unlimited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Pvs(BTreeMap<u32, u32>);

impl Pvs {
    pub fn new(limits: impl IntoIterator<Item = (u32, u32)>) -> Self {
        Self(limits.into_iter().collect())
    }

    pub fn limit(&self, points: u32) -> Option<u32> {
        self.0.get(&points).copied()
    }

    /// Constrained values with their limits, ascending.
    pub fn limits(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.0.iter().map(|(&v, &l)| (v, l))
    }

    /// Constrained values that the domain does not allow.
    pub fn outside_domain(&self, domain: &PointDomain) -> Vec<u32> {
        self.0
            .keys()
            .copied()
            .filter(|v| !domain.contains(*v))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    pub year: i32,
    pub week: u32,
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub pvs: Pvs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_outcome_winner() {
        assert_eq!(Outcome::Pending.winner(), None);
        assert_eq!(Outcome::Final { home: 21, away: 14 }.winner(), Some(Winner::Home));
        assert_eq!(Outcome::Final { home: 0, away: 3 }.winner(), Some(Winner::Away));
        assert_eq!(Outcome::Final { home: 20, away: 20 }.winner(), Some(Winner::Tie));
    }

    #[test]
    fn test_zero_zero_is_final_not_pending() {
        let outcome = Outcome::Final { home: 0, away: 0 };
        assert!(!outcome.is_pending());
        assert_eq!(outcome.winner(), Some(Winner::Tie));
    }

    #[test]
    fn test_game_locks_at_kickoff() {
        let kickoff = Utc.with_ymd_and_hms(2024, 9, 8, 17, 0, 0).unwrap();
        let game = Game {
            id: 1,
            year: 2024,
            week: 1,
            home: 1,
            away: 2,
            kickoff,
            outcome: Outcome::Pending,
        };
        assert!(!game.is_locked(kickoff - Duration::seconds(1)));
        assert!(game.is_locked(kickoff));
        assert!(game.is_locked(kickoff + Duration::hours(3)));
    }

    #[test]
    fn test_selection_parse() {
        assert_eq!(Selection::parse("HOME"), Some(Selection::Home));
        assert_eq!(Selection::parse("away"), Some(Selection::Away));
        assert_eq!(Selection::parse("0"), Some(Selection::None));
        assert_eq!(Selection::parse("draw"), None);
    }

    #[test]
    fn test_pick_edit_parse() {
        let edit = PickEdit::parse("12=home:5").unwrap();
        assert_eq!(edit.pick_id, 12);
        assert_eq!(edit.selection, Selection::Home);
        assert_eq!(edit.points, 5);

        let edit = PickEdit::parse("7=none").unwrap();
        assert_eq!(edit.selection, Selection::None);
        assert_eq!(edit.points, 0);

        assert!(PickEdit::parse("12home:5").is_err());
        assert!(PickEdit::parse("12=sideline:5").is_err());
        assert!(PickEdit::parse("x=home:5").is_err());
    }

    #[test]
    fn test_point_domain_normalizes() {
        let domain = PointDomain::new(vec![7, 1, 3, 3, 5]);
        assert_eq!(domain.values(), &[1, 3, 5, 7]);
        assert!(domain.contains(5));
        assert!(!domain.contains(4));
    }

    #[test]
    fn test_pvs_outside_domain() {
        let pvs = Pvs::new([(3, 2), (5, 2), (9, 1)]);
        assert_eq!(pvs.outside_domain(&PointDomain::default()), vec![9]);
        assert_eq!(pvs.limit(1), None);
        assert_eq!(pvs.limit(5), Some(2));
    }

    #[test]
    fn test_outcome_serde_tagged() {
        let json = serde_json::to_string(&Outcome::Final { home: 21, away: 14 }).unwrap();
        assert_eq!(json, r#"{"state":"final","home":21,"away":14}"#);
        let parsed: Outcome = serde_json::from_str(r#"{"state":"pending"}"#).unwrap();
        assert_eq!(parsed, Outcome::Pending);
    }
}
