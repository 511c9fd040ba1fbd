// Candidate pool construction: position buckets and bounding tables.
//
// Each optimization call builds a fresh pool from the caller's shortlist and
// weight map. Candidates live in one index-addressable array; buckets and the
// search refer to them by index only.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::player::{PlayerId, PoolPlayer, Position, TeamId};

// ---------------------------------------------------------------------------
// Candidate
// ---------------------------------------------------------------------------

/// A pooled player with its resolved weight.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidatePlayer {
    pub id: PlayerId,
    pub team: TeamId,
    /// Dense team index used for the per-team pick counters.
    pub team_slot: usize,
    pub position: Position,
    pub cost: f64,
    pub weight: f64,
}

/// Weight descending, then cost ascending, then ID ascending.
fn branch_order(a: &CandidatePlayer, b: &CandidatePlayer) -> Ordering {
    b.weight
        .total_cmp(&a.weight)
        .then(a.cost.total_cmp(&b.cost))
        .then(a.id.cmp(&b.id))
}

/// Cost ascending, then ID ascending.
fn cost_order(a: &CandidatePlayer, b: &CandidatePlayer) -> Ordering {
    a.cost.total_cmp(&b.cost).then(a.id.cmp(&b.id))
}

// ---------------------------------------------------------------------------
// Bucket
// ---------------------------------------------------------------------------

/// All candidates of one position, with prefix sums for bounding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bucket {
    /// Candidate indices in branch order (weight desc, cost asc, ID asc).
    pub by_weight: Vec<usize>,
    /// `weight_prefix[n]` is the sum of the first `n` weights of `by_weight`.
    pub weight_prefix: Vec<f64>,
    /// The same indices sorted by cost ascending.
    pub by_cost: Vec<usize>,
    /// `cost_prefix[n]` is the sum of the `n` cheapest costs.
    pub cost_prefix: Vec<f64>,
}

impl Bucket {
    fn from_indices(mut indices: Vec<usize>, candidates: &[CandidatePlayer]) -> Self {
        indices.sort_by(|&a, &b| branch_order(&candidates[a], &candidates[b]));

        let mut by_cost = indices.clone();
        by_cost.sort_by(|&a, &b| cost_order(&candidates[a], &candidates[b]));

        let weight_prefix = prefix_sums(indices.iter().map(|&i| candidates[i].weight));
        let cost_prefix = prefix_sums(by_cost.iter().map(|&i| candidates[i].cost));

        Bucket {
            by_weight: indices,
            weight_prefix,
            by_cost,
            cost_prefix,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.by_weight.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.by_weight.is_empty()
    }

    /// Optimistic weight for taking `n` players: the sum of the `n` largest
    /// weights, ignoring team cap and budget. Clamped to the bucket size.
    #[cfg(test)]
    fn best_weight(&self, n: usize) -> f64 {
        self.weight_prefix[n.min(self.len())]
    }

    /// Cheapest possible cost of taking `n` players, or `None` when the
    /// bucket holds fewer than `n`.
    pub fn cheapest_cost(&self, n: usize) -> Option<f64> {
        self.cost_prefix.get(n).copied()
    }

    /// A copy of this bucket without the candidates matched by `excluded`,
    /// preserving both orders.
    pub fn without<F>(&self, candidates: &[CandidatePlayer], excluded: F) -> Bucket
    where
        F: Fn(usize) -> bool,
    {
        let by_weight: Vec<usize> = self
            .by_weight
            .iter()
            .copied()
            .filter(|&i| !excluded(i))
            .collect();
        let by_cost: Vec<usize> = self
            .by_cost
            .iter()
            .copied()
            .filter(|&i| !excluded(i))
            .collect();
        let weight_prefix = prefix_sums(by_weight.iter().map(|&i| candidates[i].weight));
        let cost_prefix = prefix_sums(by_cost.iter().map(|&i| candidates[i].cost));

        Bucket {
            by_weight,
            weight_prefix,
            by_cost,
            cost_prefix,
        }
    }
}

fn prefix_sums<I: Iterator<Item = f64>>(values: I) -> Vec<f64> {
    let mut sums = vec![0.0];
    let mut acc = 0.0;
    for v in values {
        acc += v;
        sums.push(acc);
    }
    sums
}

// ---------------------------------------------------------------------------
// CandidatePool
// ---------------------------------------------------------------------------

/// The candidate array plus one bucket per position.
#[derive(Debug, Clone)]
pub struct CandidatePool {
    candidates: Vec<CandidatePlayer>,
    buckets: [Bucket; 4],
    index_by_id: HashMap<PlayerId, usize>,
    team_count: usize,
}

impl CandidatePool {
    /// Build the pool. IDs absent from `weights` get weight 0. Pool order is
    /// kept in the candidate array; buckets carry the sorted views.
    pub fn build(players: &[PoolPlayer], weights: &HashMap<PlayerId, f64>) -> Self {
        let mut team_slots: HashMap<TeamId, usize> = HashMap::new();
        let mut candidates = Vec::with_capacity(players.len());
        let mut index_by_id = HashMap::with_capacity(players.len());

        for p in players {
            let next_slot = team_slots.len();
            let team_slot = *team_slots.entry(p.team).or_insert(next_slot);
            index_by_id.insert(p.id, candidates.len());
            candidates.push(CandidatePlayer {
                id: p.id,
                team: p.team,
                team_slot,
                position: p.position,
                cost: p.cost,
                weight: weights.get(&p.id).copied().unwrap_or(0.0),
            });
        }

        let buckets = Position::ALL.map(|pos| {
            let indices: Vec<usize> = candidates
                .iter()
                .enumerate()
                .filter(|(_, c)| c.position == pos)
                .map(|(i, _)| i)
                .collect();
            Bucket::from_indices(indices, &candidates)
        });

        CandidatePool {
            candidates,
            buckets,
            index_by_id,
            team_count: team_slots.len(),
        }
    }

    pub fn candidates(&self) -> &[CandidatePlayer] {
        &self.candidates
    }

    pub fn candidate(&self, index: usize) -> &CandidatePlayer {
        &self.candidates[index]
    }

    pub fn bucket(&self, position: Position) -> &Bucket {
        &self.buckets[position.index()]
    }

    pub fn index_of(&self, id: PlayerId) -> Option<usize> {
        self.index_by_id.get(&id).copied()
    }

    /// Number of distinct real-world teams in the pool.
    pub fn team_count(&self) -> usize {
        self.team_count
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
