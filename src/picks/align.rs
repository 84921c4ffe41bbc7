use std::collections::HashMap;
use std::hash::Hash;

use crate::error::PoolError;
use crate::season::types::{Game, Pick};

/// Why two sequences could not be put in the same order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlignError<K> {
    /// A reference entry has no matching item.
    Missing(K),
    /// An item's key is not in the reference sequence.
    Unmatched(K),
    /// Two items share a key.
    Duplicate(K),
}

/// Reorder `items` so that position `i` holds the item whose key equals the
/// key of `reference[i]`. The result has exactly one item per reference entry.
pub fn align_by_key<R, T, K, FR, FT>(
    reference: &[R],
    items: Vec<T>,
    reference_key: FR,
    item_key: FT,
) -> Result<Vec<T>, AlignError<K>>
where
    K: Eq + Hash,
    FR: Fn(&R) -> K,
    FT: Fn(&T) -> K,
{
    let mut by_key: HashMap<K, T> = HashMap::with_capacity(items.len());
    for item in items {
        let key = item_key(&item);
        if by_key.contains_key(&key) {
            return Err(AlignError::Duplicate(key));
        }
        by_key.insert(key, item);
    }

    let mut aligned = Vec::with_capacity(reference.len());
    for r in reference {
        let key = reference_key(r);
        match by_key.remove(&key) {
            Some(item) => aligned.push(item),
            None => return Err(AlignError::Missing(key)),
        }
    }

    // Anything left over had no place in the reference order
    if let Some(key) = by_key.into_keys().next() {
        return Err(AlignError::Unmatched(key));
    }

    Ok(aligned)
}

/// Line a user's picks up with the week's games.
pub fn align_picks(games: &[Game], picks: Vec<Pick>) -> Result<Vec<Pick>, PoolError> {
    align_by_key(games, picks, |g| g.id, |p| p.game_id).map_err(|e| match e {
        AlignError::Missing(game_id) => PoolError::MissingPick { game_id },
        AlignError::Unmatched(game_id) => PoolError::UnknownGame { game_id },
        AlignError::Duplicate(game_id) => PoolError::DuplicatePick { game_id },
    })
}
