// Final merge of squads collected across formations.

use std::collections::BTreeMap;

use crate::player::PlayerId;

use super::collector::rank_order;
use super::Squad;

/// Merge squads that select the same set of player IDs, keeping the higher
/// score, then return at most `limit` squads in rank order.
pub fn finalize(squads: Vec<Squad>, limit: usize) -> Vec<Squad> {
    let mut unique: BTreeMap<Vec<PlayerId>, Squad> = BTreeMap::new();
    for squad in squads {
        let key = squad.sorted_ids();
        match unique.get(&key) {
            Some(held) if held.score >= squad.score => {}
            _ => {
                unique.insert(key, squad);
            }
        }
    }

    let mut merged: Vec<Squad> = unique.into_values().collect();
    merged.sort_by(rank_order);
    merged.truncate(limit);
    merged
}
