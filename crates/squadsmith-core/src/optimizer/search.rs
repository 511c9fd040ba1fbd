// Depth-first branch-and-bound over one formation.
//
// Positions are filled one at a time in GK, DEF, MID, FWD order. Within a
// position the search walks the weight-sorted lane and branches on each
// candidate: take it (if the team cap and budget allow) or skip it. Every
// node is checked against two bounds before branching:
//
// - score: current score + the best weights still reachable in this lane +
//   the best weights of every later lane. Once the collector is full, a node
//   whose bound does not beat the collector's cutoff is pruned.
// - cost: current cost + the cheapest way to fill this lane's remaining need
//   from the unvisited suffix + the cheapest fill of every later lane. A node
//   whose bound exceeds the budget, or whose lanes are too short to meet a
//   quota, is pruned.

use tracing::debug;

use crate::formation::Formation;
use crate::player::{PlayerId, Position};

use super::collector::SquadCollector;
use super::pool::{Bucket, CandidatePool};
use super::seed::Seed;
use super::state::SearchState;
use super::{Breakdown, SearchStats, Squad, BOUND_SLACK};

// ---------------------------------------------------------------------------
// Lane: one position's open candidates with suffix bounds
// ---------------------------------------------------------------------------

/// The candidates of one position that are free to pick (locks excluded),
/// with a table of cheapest suffix fills.
#[derive(Debug, Clone)]
pub struct Lane {
    bucket: Bucket,
    /// Deepest need this lane is asked to fill.
    depth: usize,
    /// `cheapest[start * (depth + 1) + k]`: cheapest cost of `k` candidates
    /// taken from `bucket.by_weight[start..]`, or infinity if fewer remain.
    cheapest: Vec<f64>,
}

impl Lane {
    pub fn new(bucket: Bucket, pool: &CandidatePool, depth: usize) -> Self {
        let n = bucket.len();
        let stride = depth + 1;
        let mut cheapest = vec![f64::INFINITY; (n + 1) * stride];
        // The `depth` smallest costs seen so far, ascending.
        let mut smallest: Vec<f64> = Vec::with_capacity(stride);

        for start in (0..=n).rev() {
            if start < n {
                let cost = pool.candidate(bucket.by_weight[start]).cost;
                let at = smallest.partition_point(|&c| c <= cost);
                if at < depth {
                    smallest.insert(at, cost);
                    smallest.truncate(depth);
                }
            }
            let row = start * stride;
            cheapest[row] = 0.0;
            let mut acc = 0.0;
            for (k, cost) in smallest.iter().enumerate() {
                acc += cost;
                cheapest[row + k + 1] = acc;
            }
        }

        Lane {
            bucket,
            depth,
            cheapest,
        }
    }

    fn len(&self) -> usize {
        self.bucket.len()
    }

    fn entry(&self, at: usize) -> usize {
        self.bucket.by_weight[at]
    }

    /// Best weight of `k` candidates from `start` on. The lane is weight
    /// sorted, so these are the next `k` entries.
    fn best_weight_from(&self, start: usize, k: usize) -> f64 {
        let end = (start + k).min(self.len());
        self.bucket.weight_prefix[end] - self.bucket.weight_prefix[start]
    }

    /// Cheapest cost of `k` candidates from `start` on.
    fn cheapest_from(&self, start: usize, k: usize) -> f64 {
        if k > self.depth {
            // Only reachable if a formation outgrows the catalog.
            return self.bucket.cheapest_cost(k).unwrap_or(f64::INFINITY);
        }
        self.cheapest[start * (self.depth + 1) + k]
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Raised when the node budget is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeLimitReached;

/// Branch-and-bound over the open slots of one seeded formation.
pub struct FormationSearch<'a> {
    pool: &'a CandidatePool,
    lanes: &'a [Lane; 4],
    formation: Formation,
    budget: f64,
    node_limit: Option<u64>,
    /// Positions that still need players, in visiting order.
    order: Vec<Position>,
    need: [usize; 4],
    /// `later_best[i]`: optimistic weight of every position after `order[i]`.
    later_best: Vec<f64>,
    /// `later_cheapest[i]`: cheapest fill of every position after `order[i]`.
    later_cheapest: Vec<f64>,
    state: SearchState,
    collector: &'a mut SquadCollector,
    stats: &'a mut SearchStats,
}

impl<'a> FormationSearch<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: &'a CandidatePool,
        lanes: &'a [Lane; 4],
        formation: Formation,
        seed: Seed,
        budget: f64,
        node_limit: Option<u64>,
        collector: &'a mut SquadCollector,
        stats: &'a mut SearchStats,
    ) -> Self {
        let order: Vec<Position> = Position::ALL
            .into_iter()
            .filter(|p| seed.need[p.index()] > 0)
            .collect();

        let mut later_best = vec![0.0; order.len()];
        let mut later_cheapest = vec![0.0; order.len()];
        for i in (0..order.len().saturating_sub(1)).rev() {
            let next = order[i + 1];
            let lane = &lanes[next.index()];
            let k = seed.need[next.index()];
            later_best[i] = later_best[i + 1] + lane.best_weight_from(0, k);
            later_cheapest[i] = later_cheapest[i + 1] + lane.cheapest_from(0, k);
        }

        FormationSearch {
            pool,
            lanes,
            formation,
            budget,
            node_limit,
            order,
            need: seed.need,
            later_best,
            later_cheapest,
            state: seed.state,
            collector,
            stats,
        }
    }

    /// Explore every completion of the seeded state.
    pub fn run(mut self) -> Result<(), NodeLimitReached> {
        let before = self.stats.nodes;
        self.fill(0)?;
        debug!(
            formation = %self.formation,
            nodes = self.stats.nodes - before,
            "formation explored"
        );
        Ok(())
    }

    /// Start filling `order[slot]`, or submit a squad once all are filled.
    fn fill(&mut self, slot: usize) -> Result<(), NodeLimitReached> {
        match self.order.get(slot) {
            None => {
                self.submit();
                Ok(())
            }
            Some(&position) => self.branch(slot, 0, self.need[position.index()]),
        }
    }

    /// Take-or-skip over `lane[start..]` with `left` picks still owed here.
    fn branch(&mut self, slot: usize, start: usize, left: usize) -> Result<(), NodeLimitReached> {
        self.stats.nodes += 1;
        if let Some(limit) = self.node_limit {
            if self.stats.nodes > limit {
                return Err(NodeLimitReached);
            }
        }

        let (pool, lanes) = (self.pool, self.lanes);
        let position = self.order[slot];
        let lane = &lanes[position.index()];

        if lane.len() - start < left {
            self.stats.budget_prunes += 1;
            return Ok(());
        }

        let cost_bound =
            self.state.cost() + lane.cheapest_from(start, left) + self.later_cheapest[slot];
        if cost_bound > self.budget + BOUND_SLACK {
            self.stats.budget_prunes += 1;
            return Ok(());
        }

        if let Some(cutoff) = self.collector.cutoff() {
            let score_bound =
                self.state.score() + lane.best_weight_from(start, left) + self.later_best[slot];
            if score_bound <= cutoff {
                self.stats.bound_prunes += 1;
                return Ok(());
            }
        }

        if left == 0 {
            return self.fill(slot + 1);
        }

        let index = lane.entry(start);
        let candidate = pool.candidate(index);

        if self.state.team_has_room(candidate) && self.state.fits_budget(candidate, self.budget) {
            let mark = self.state.apply(index, candidate);
            let taken = self.branch(slot, start + 1, left - 1);
            self.state.undo(mark);
            taken?;
        }

        self.branch(slot, start + 1, left)
    }

    /// Hand the completed XI to the collector.
    fn submit(&mut self) {
        self.stats.leaves += 1;
        let (score, cost) = (self.state.score(), self.state.cost());
        if !self.collector.admits(score, cost) {
            return;
        }

        let ids_at = |position: Position| -> Vec<PlayerId> {
            self.state
                .picks(position)
                .iter()
                .map(|&i| self.pool.candidate(i).id)
                .collect()
        };
        let breakdown = Breakdown {
            goalkeepers: ids_at(Position::Goalkeeper),
            defenders: ids_at(Position::Defender),
            midfielders: ids_at(Position::Midfielder),
            forwards: ids_at(Position::Forward),
        };
        let squad = Squad {
            ids: breakdown.all_ids(),
            score,
            total_cost: cost,
            formation: self.formation,
            breakdown,
        };
        self.collector.offer(squad);
    }
}
