use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use crate::error::PoolError;
use crate::season::types::{Game, GameId, Pick, PickEdit, PickId, PointDomain, Pvs};

/// Count of picks at one constrained point value against its weekly cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierCheck {
    pub points: u32,
    pub count: u32,
    pub limit: u32,
}

impl TierCheck {
    pub fn is_within(&self) -> bool {
        self.count <= self.limit
    }
}

/// An edit that picked a side but assigned a value outside the point domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidPoints {
    pub pick_id: PickId,
    pub points: u32,
}

/// Outcome of validating a batch of edits. Rejections are data, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    pub tiers: Vec<TierCheck>,
    pub invalid_points: Vec<InvalidPoints>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.invalid_points.is_empty() && self.tiers.iter().all(TierCheck::is_within)
    }

    /// Whether the count at `points` respects its cap. Unconstrained values
    /// always do.
    pub fn within(&self, points: u32) -> bool {
        self.tiers
            .iter()
            .find(|t| t.points == points)
            .map_or(true, TierCheck::is_within)
    }

    /// Constrained values whose cap was exceeded, ascending.
    pub fn exceeded(&self) -> Vec<u32> {
        self.tiers
            .iter()
            .filter(|t| !t.is_within())
            .map(|t| t.points)
            .collect()
    }

    /// Human-readable summary of every failed constraint.
    pub fn message(&self) -> String {
        if self.is_valid() {
            return String::new();
        }
        let mut message = String::from("Invalid Picks: ");
        for points in self.exceeded() {
            message.push_str(&format!("Too many {} point games. ", points_word(points)));
        }
        for invalid in &self.invalid_points {
            message.push_str(&format!(
                "Pick {} cannot be worth {} points. ",
                invalid.pick_id, invalid.points
            ));
        }
        message
    }
}

/// Spelled out for the default point values, digits for anything else.
fn points_word(points: u32) -> String {
    match points {
        1 => "one".to_string(),
        3 => "three".to_string(),
        5 => "five".to_string(),
        7 => "seven".to_string(),
        _ => points.to_string(),
    }
}

/// Index edits by pick, later edits to the same pick replacing earlier ones.
fn index_edits(existing: &[Pick], edits: &[PickEdit]) -> Result<HashMap<PickId, PickEdit>, PoolError> {
    let mut by_pick = HashMap::with_capacity(edits.len());
    for edit in edits {
        if !existing.iter().any(|p| p.id == edit.pick_id) {
            return Err(PoolError::UnknownPick {
                pick_id: edit.pick_id,
            });
        }
        by_pick.insert(edit.pick_id, *edit);
    }
    Ok(by_pick)
}

fn index_games(games: &[Game]) -> HashMap<GameId, &Game> {
    games.iter().map(|g| (g.id, g)).collect()
}

/// Decide whether applying `edits` to a user's week of picks keeps every
/// point value within the week's caps.
///
/// Locked picks keep their stored state even if an edit targets them. A
/// "none" edit is dropped, so the stored assignment it targets still counts
/// (nothing is cleared on save either). Users may under-point, so only caps
/// are enforced, never a full distribution.
pub fn validate_picks(
    domain: &PointDomain,
    pvs: &Pvs,
    games: &[Game],
    existing: &[Pick],
    edits: &[PickEdit],
    now: DateTime<Utc>,
) -> Result<ValidationReport, PoolError> {
    let games_by_id = index_games(games);
    let edits_by_pick = index_edits(existing, edits)?;

    let mut counts: BTreeMap<u32, u32> = BTreeMap::new();
    let mut invalid_points = Vec::new();

    for pick in existing {
        let game = games_by_id
            .get(&pick.game_id)
            .ok_or(PoolError::UnknownGame {
                game_id: pick.game_id,
            })?;

        let points = match edits_by_pick.get(&pick.id) {
            Some(_) if game.is_locked(now) => {
                warn!(pick = pick.id, game = game.id, "ignoring edit to locked pick");
                pick.points
            }
            Some(edit) if edit.selection.is_none() => pick.points,
            Some(edit) if !domain.contains(edit.points) => {
                invalid_points.push(InvalidPoints {
                    pick_id: edit.pick_id,
                    points: edit.points,
                });
                continue;
            }
            Some(edit) => edit.points,
            None => pick.points,
        };

        *counts.entry(points).or_default() += 1;
    }

    let tiers: Vec<TierCheck> = pvs
        .limits()
        .map(|(points, limit)| TierCheck {
            points,
            count: counts.get(&points).copied().unwrap_or(0),
            limit,
        })
        .collect();

    debug!(?counts, ?tiers, invalid = invalid_points.len(), "validated pick distribution");

    Ok(ValidationReport {
        tiers,
        invalid_points,
    })
}

/// The edits of an accepted batch that should be written back: edits to
/// locked picks and "none" edits are skipped, so stored assignments for
/// those picks stay as they were.
pub fn accepted_edits(
    games: &[Game],
    existing: &[Pick],
    edits: &[PickEdit],
    now: DateTime<Utc>,
) -> Result<Vec<PickEdit>, PoolError> {
    let games_by_id = index_games(games);
    let edits_by_pick = index_edits(existing, edits)?;

    let mut accepted = Vec::new();
    for pick in existing {
        let Some(edit) = edits_by_pick.get(&pick.id) else {
            continue;
        };
        let game = games_by_id
            .get(&pick.game_id)
            .ok_or(PoolError::UnknownGame {
                game_id: pick.game_id,
            })?;
        if game.is_locked(now) || edit.selection.is_none() {
            continue;
        }
        accepted.push(*edit);
    }
    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::season::types::{Outcome, Selection};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 8, 18, 0, 0).unwrap()
    }

    fn game(id: GameId, locked: bool) -> Game {
        let offset = if locked { -Duration::hours(1) } else { Duration::hours(1) };
        Game {
            id,
            year: 2024,
            week: 1,
            home: id * 2,
            away: id * 2 + 1,
            kickoff: now() + offset,
            outcome: Outcome::Pending,
        }
    }

    fn pick(id: PickId, game_id: GameId, selection: Selection, points: u32) -> Pick {
        Pick {
            id,
            user: "a@example.com".to_string(),
            game_id,
            selection,
            points,
        }
    }

    fn edit(pick_id: PickId, selection: Selection, points: u32) -> PickEdit {
        PickEdit {
            pick_id,
            selection,
            points,
        }
    }

    fn pvs() -> Pvs {
        Pvs::new([(3, 2), (5, 2), (7, 1)])
    }

    fn open_week(n: i64) -> (Vec<Game>, Vec<Pick>) {
        let games: Vec<Game> = (1..=n).map(|id| game(id, false)).collect();
        let picks = (1..=n)
            .map(|id| pick(id + 100, id, Selection::None, 0))
            .collect();
        (games, picks)
    }

    #[test]
    fn test_empty_submission_is_valid() {
        let (games, picks) = open_week(4);
        let report =
            validate_picks(&PointDomain::default(), &pvs(), &games, &picks, &[], now()).unwrap();
        assert!(report.is_valid());
        assert_eq!(report.message(), "");
    }

    #[test]
    fn test_one_over_three_point_limit() {
        let (games, picks) = open_week(6);
        let edits = vec![
            edit(101, Selection::Home, 3),
            edit(102, Selection::Home, 3),
            edit(103, Selection::Away, 3),
            edit(104, Selection::Away, 5),
            edit(105, Selection::Away, 7),
        ];
        let report =
            validate_picks(&PointDomain::default(), &pvs(), &games, &picks, &edits, now()).unwrap();
        assert_eq!(
            (report.within(3), report.within(5), report.within(7)),
            (false, true, true)
        );
        assert!(!report.is_valid());
        assert_eq!(report.exceeded(), vec![3]);
        assert_eq!(report.message(), "Invalid Picks: Too many three point games. ");
    }

    #[test]
    fn test_one_point_is_unlimited() {
        let (games, picks) = open_week(8);
        let edits: Vec<PickEdit> = (101..=108).map(|id| edit(id, Selection::Home, 1)).collect();
        let report =
            validate_picks(&PointDomain::default(), &pvs(), &games, &picks, &edits, now()).unwrap();
        assert!(report.is_valid());
        assert!(report.within(1));
    }

    #[test]
    fn test_locked_three_pointers_count_against_limit() {
        let games = vec![game(1, true), game(2, true), game(3, false)];
        let picks = vec![
            pick(101, 1, Selection::Home, 3),
            pick(102, 2, Selection::Away, 3),
            pick(103, 3, Selection::None, 0),
        ];
        let edits = vec![edit(103, Selection::Home, 3)];
        let report =
            validate_picks(&PointDomain::default(), &pvs(), &games, &picks, &edits, now()).unwrap();
        assert!(!report.within(3));
        assert_eq!(report.tiers[0].count, 3);
    }

    #[test]
    fn test_edit_to_locked_pick_is_ignored() {
        let games = vec![game(1, true), game(2, false)];
        let picks = vec![
            pick(101, 1, Selection::Home, 7),
            pick(102, 2, Selection::None, 0),
        ];
        let with_locked_edit = vec![edit(101, Selection::Away, 1), edit(102, Selection::Home, 5)];
        let without = vec![edit(102, Selection::Home, 5)];

        let domain = PointDomain::default();
        let a = validate_picks(&domain, &pvs(), &games, &picks, &with_locked_edit, now()).unwrap();
        let b = validate_picks(&domain, &pvs(), &games, &picks, &without, now()).unwrap();
        assert_eq!(a, b);

        // The locked seven-pointer still occupies the only seven slot
        let c = validate_picks(
            &domain,
            &pvs(),
            &games,
            &picks,
            &[edit(102, Selection::Home, 7)],
            now(),
        )
        .unwrap();
        assert!(!c.within(7));
    }

    #[test]
    fn test_none_edit_keeps_stored_pick_in_tally() {
        let games = vec![game(1, false), game(2, false)];
        let picks = vec![
            pick(101, 1, Selection::Home, 7),
            pick(102, 2, Selection::None, 0),
        ];
        // The "none" edit is never saved, so the stored seven still holds the slot
        let edits = vec![edit(101, Selection::None, 0), edit(102, Selection::Away, 7)];
        let report =
            validate_picks(&PointDomain::default(), &pvs(), &games, &picks, &edits, now()).unwrap();
        assert!(!report.is_valid());
        assert_eq!(report.tiers[2].count, 2);
        assert_eq!(report.exceeded(), vec![7]);
    }

    #[test]
    fn test_none_edit_on_empty_pick_counts_nothing() {
        let (games, picks) = open_week(2);
        let edits = vec![edit(101, Selection::None, 0), edit(102, Selection::Away, 7)];
        let report =
            validate_picks(&PointDomain::default(), &pvs(), &games, &picks, &edits, now()).unwrap();
        assert!(report.is_valid());
        assert_eq!(report.tiers[2].count, 1);
    }

    #[test]
    fn test_accepted_batch_stays_within_caps_once_saved() {
        let games = vec![game(1, false), game(2, false), game(3, false)];
        let mut picks = vec![
            pick(101, 1, Selection::Home, 7),
            pick(102, 2, Selection::None, 0),
            pick(103, 3, Selection::None, 0),
        ];
        let edits = vec![edit(101, Selection::None, 0), edit(102, Selection::Away, 5)];
        let report =
            validate_picks(&PointDomain::default(), &pvs(), &games, &picks, &edits, now()).unwrap();
        assert!(report.is_valid());

        for accepted in accepted_edits(&games, &picks, &edits, now()).unwrap() {
            let stored = picks.iter_mut().find(|p| p.id == accepted.pick_id).unwrap();
            stored.selection = accepted.selection;
            stored.points = accepted.points;
        }
        let saved =
            validate_picks(&PointDomain::default(), &pvs(), &games, &picks, &[], now()).unwrap();
        assert!(saved.is_valid());
        assert_eq!(saved.tiers, report.tiers);
    }

    #[test]
    fn test_message_for_unusual_point_value() {
        let (games, picks) = open_week(2);
        let edits = vec![edit(101, Selection::Home, 9), edit(102, Selection::Away, 9)];
        let report = validate_picks(
            &PointDomain::new(vec![1, 9]),
            &Pvs::new([(9, 1)]),
            &games,
            &picks,
            &edits,
            now(),
        )
        .unwrap();
        assert_eq!(report.message(), "Invalid Picks: Too many 9 point games. ");
    }

    #[test]
    fn test_out_of_domain_points_rejected() {
        let (games, picks) = open_week(2);
        let edits = vec![edit(101, Selection::Home, 4), edit(102, Selection::Home, 0)];
        let report =
            validate_picks(&PointDomain::default(), &pvs(), &games, &picks, &edits, now()).unwrap();
        assert!(!report.is_valid());
        assert_eq!(report.invalid_points.len(), 2);
        assert!(report.exceeded().is_empty());
        assert!(report.message().contains("Pick 101 cannot be worth 4 points."));
    }

    #[test]
    fn test_multiple_failures_reported_together() {
        let (games, picks) = open_week(6);
        let edits = vec![
            edit(101, Selection::Home, 5),
            edit(102, Selection::Home, 5),
            edit(103, Selection::Home, 5),
            edit(104, Selection::Home, 7),
            edit(105, Selection::Home, 7),
        ];
        let report =
            validate_picks(&PointDomain::default(), &pvs(), &games, &picks, &edits, now()).unwrap();
        assert_eq!(report.exceeded(), vec![5, 7]);
        assert_eq!(
            report.message(),
            "Invalid Picks: Too many five point games. Too many seven point games. "
        );
    }

    #[test]
    fn test_validation_is_repeatable() {
        let (games, picks) = open_week(3);
        let edits = vec![edit(101, Selection::Home, 3), edit(102, Selection::Away, 5)];
        let domain = PointDomain::default();
        let first = validate_picks(&domain, &pvs(), &games, &picks, &edits, now()).unwrap();
        let second = validate_picks(&domain, &pvs(), &games, &picks, &edits, now()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_last_edit_for_a_pick_wins() {
        let (games, picks) = open_week(1);
        let edits = vec![edit(101, Selection::Home, 7), edit(101, Selection::Home, 1)];
        let limits = Pvs::new([(7, 0)]);
        let report =
            validate_picks(&PointDomain::default(), &limits, &games, &picks, &edits, now()).unwrap();
        assert!(report.is_valid());
    }

    #[test]
    fn test_edit_for_unknown_pick_is_integrity_error() {
        let (games, picks) = open_week(2);
        let edits = vec![edit(999, Selection::Home, 3)];
        let result = validate_picks(&PointDomain::default(), &pvs(), &games, &picks, &edits, now());
        assert_eq!(result, Err(PoolError::UnknownPick { pick_id: 999 }));
    }

    #[test]
    fn test_pick_for_missing_game_is_integrity_error() {
        let games = vec![game(1, false)];
        let picks = vec![pick(101, 1, Selection::None, 0), pick(102, 2, Selection::None, 0)];
        let result = validate_picks(&PointDomain::default(), &pvs(), &games, &picks, &[], now());
        assert_eq!(result, Err(PoolError::UnknownGame { game_id: 2 }));
    }

    #[test]
    fn test_accepted_edits_skip_locked_and_none() {
        let games = vec![game(1, true), game(2, false), game(3, false)];
        let picks = vec![
            pick(101, 1, Selection::Home, 3),
            pick(102, 2, Selection::Home, 5),
            pick(103, 3, Selection::None, 0),
        ];
        let edits = vec![
            edit(101, Selection::Away, 7),
            edit(102, Selection::None, 0),
            edit(103, Selection::Away, 1),
        ];
        let accepted = accepted_edits(&games, &picks, &edits, now()).unwrap();
        assert_eq!(accepted, vec![edit(103, Selection::Away, 1)]);
    }
}
