// Top-K starting-XI optimizer.
//
// Given a shortlist, per-player weights, a budget and a set of locked
// players, find the three highest-scoring legal lineups across every
// formation shape. The search is exact: it either proves the top three or
// reports that the node limit was hit.

pub mod collector;
pub mod dedup;
pub mod pool;
pub mod search;
pub mod seed;
pub mod state;

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::formation::{Formation, FORMATIONS};
use crate::player::{PlayerId, PoolPlayer, Position};

use collector::SquadCollector;
use pool::CandidatePool;
use search::{FormationSearch, Lane, NodeLimitReached};
use seed::seed_locks;

/// Maximum players from one real-world team.
pub const TEAM_CAP: u8 = 3;

/// Number of squads returned.
pub const TOP_K: usize = 3;

/// Tolerance on the summed cost lower bound. Sums taken in a different order
/// than the running total may round a hair above it, and a bound must never
/// cut a branch whose picks fit. Feasibility itself is checked exactly.
pub(crate) const BOUND_SLACK: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Caller contract violations and search cutoffs. "No squad fits" is not an
/// error; it is an empty result.
#[derive(Debug, Error, PartialEq)]
pub enum OptimizeError {
    #[error("budget must be a finite, non-negative number, got {budget}")]
    InvalidBudget { budget: f64 },

    #[error("player {id} appears more than once in the pool")]
    DuplicatePlayer { id: PlayerId },

    #[error("player {id} has invalid cost {cost}")]
    InvalidCost { id: PlayerId, cost: f64 },

    #[error("player {id} has non-finite weight {weight}")]
    InvalidWeight { id: PlayerId, weight: f64 },

    #[error("locked player {id} is not in the pool")]
    UnknownLock { id: PlayerId },

    #[error("pool has no {position} candidates")]
    EmptyPosition { position: Position },

    #[error("search exceeded the node limit of {limit}")]
    NodeLimitReached { limit: u64 },
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Player IDs of a squad grouped by position. Locked players come first
/// within each position.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Breakdown {
    pub goalkeepers: Vec<PlayerId>,
    pub defenders: Vec<PlayerId>,
    pub midfielders: Vec<PlayerId>,
    pub forwards: Vec<PlayerId>,
}

impl Breakdown {
    pub fn get(&self, position: Position) -> &[PlayerId] {
        match position {
            Position::Goalkeeper => &self.goalkeepers,
            Position::Defender => &self.defenders,
            Position::Midfielder => &self.midfielders,
            Position::Forward => &self.forwards,
        }
    }

    /// Every ID in GK, DEF, MID, FWD order.
    pub fn all_ids(&self) -> Vec<PlayerId> {
        Position::ALL
            .iter()
            .flat_map(|&p| self.get(p).iter().copied())
            .collect()
    }
}

/// One complete, legal starting XI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Squad {
    pub ids: Vec<PlayerId>,
    pub score: f64,
    pub total_cost: f64,
    pub formation: Formation,
    pub breakdown: Breakdown,
}

impl Squad {
    /// The chosen IDs in ascending order; identifies the player set.
    pub fn sorted_ids(&self) -> Vec<PlayerId> {
        let mut ids = self.ids.clone();
        ids.sort_unstable();
        ids
    }
}

/// Inputs of one optimization call.
#[derive(Debug, Clone, Default)]
pub struct OptimizeRequest {
    pub pool: Vec<PoolPlayer>,
    /// Weight per player; absent IDs weigh 0.
    pub weights: HashMap<PlayerId, f64>,
    /// Maximum total cost of the eleven players.
    pub budget: f64,
    /// IDs mapped to `true` must be in every returned squad.
    pub locks: HashMap<PlayerId, bool>,
}

impl OptimizeRequest {
    pub fn new(pool: Vec<PoolPlayer>, budget: f64) -> Self {
        OptimizeRequest {
            pool,
            budget,
            ..Default::default()
        }
    }

    pub fn with_weights(mut self, weights: HashMap<PlayerId, f64>) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_locks<I: IntoIterator<Item = PlayerId>>(mut self, ids: I) -> Self {
        self.locks.extend(ids.into_iter().map(|id| (id, true)));
        self
    }

    /// IDs whose lock flag is set.
    pub fn locked_ids(&self) -> BTreeSet<PlayerId> {
        self.locks
            .iter()
            .filter(|(_, &locked)| locked)
            .map(|(&id, _)| id)
            .collect()
    }
}

/// Knobs that do not change the answer, only whether one is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptimizeOptions {
    /// Abort with `NodeLimitReached` after this many search nodes.
    pub node_limit: Option<u64>,
}

/// Counters gathered over one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub formations_tried: u32,
    pub formations_rejected: u32,
    pub nodes: u64,
    pub leaves: u64,
    pub bound_prunes: u64,
    pub budget_prunes: u64,
}

/// Result of a successful call: up to `TOP_K` squads in rank order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Optimization {
    pub squads: Vec<Squad>,
    pub stats: SearchStats,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(request: &OptimizeRequest) -> Result<(), OptimizeError> {
    if !request.budget.is_finite() || request.budget < 0.0 {
        return Err(OptimizeError::InvalidBudget {
            budget: request.budget,
        });
    }

    let mut seen: HashSet<PlayerId> = HashSet::with_capacity(request.pool.len());
    for p in &request.pool {
        if !seen.insert(p.id) {
            return Err(OptimizeError::DuplicatePlayer { id: p.id });
        }
        if !p.cost.is_finite() || p.cost < 0.0 {
            return Err(OptimizeError::InvalidCost {
                id: p.id,
                cost: p.cost,
            });
        }
        if let Some(&weight) = request.weights.get(&p.id) {
            if !weight.is_finite() {
                return Err(OptimizeError::InvalidWeight { id: p.id, weight });
            }
        }
    }

    if let Some(&id) = request.locked_ids().iter().find(|id| !seen.contains(id)) {
        return Err(OptimizeError::UnknownLock { id });
    }

    if !request.pool.is_empty() {
        for position in Position::ALL {
            if !request.pool.iter().any(|p| p.position == position) {
                return Err(OptimizeError::EmptyPosition { position });
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Find the top three starting XIs for `request`.
///
/// 1. Validate the request; caller bugs fail fast.
/// 2. Build the candidate pool (position buckets, prefix tables).
/// 3. For every formation: seed the locked players, skipping shapes the
///    locks make infeasible, then run the branch-and-bound over the open
///    slots. One collector is shared across formations so later shapes are
///    pruned against the best squads found so far.
/// 4. Merge duplicate player sets and return at most three squads sorted by
///    score descending, then cost ascending.
///
/// An empty `squads` list means no lineup satisfies the constraints.
pub fn optimize(
    request: &OptimizeRequest,
    options: &OptimizeOptions,
) -> Result<Optimization, OptimizeError> {
    validate(request)?;

    let mut stats = SearchStats::default();
    let pool = CandidatePool::build(&request.pool, &request.weights);
    if pool.is_empty() {
        return Ok(Optimization {
            squads: Vec::new(),
            stats,
        });
    }

    let locked: BTreeSet<usize> = request
        .locked_ids()
        .iter()
        .filter_map(|&id| pool.index_of(id))
        .collect();

    // Locks are either all placed or the formation is dropped, so the open
    // lanes are the same for every formation.
    let lanes = Position::ALL.map(|position| {
        let open = pool
            .bucket(position)
            .without(pool.candidates(), |i| locked.contains(&i));
        Lane::new(open, &pool, Formation::max_required(position))
    });

    let mut collector = SquadCollector::new(TOP_K);

    for formation in FORMATIONS {
        stats.formations_tried += 1;
        let seed = match seed_locks(&pool, formation, &locked, request.budget) {
            Ok(seed) => seed,
            Err(conflict) => {
                stats.formations_rejected += 1;
                debug!(%formation, ?conflict, "locks infeasible for formation");
                continue;
            }
        };

        FormationSearch::new(
            &pool,
            &lanes,
            formation,
            seed,
            request.budget,
            options.node_limit,
            &mut collector,
            &mut stats,
        )
        .run()
        .map_err(|NodeLimitReached| OptimizeError::NodeLimitReached {
            limit: options.node_limit.unwrap_or_default(),
        })?;
    }

    let squads = dedup::finalize(collector.into_squads(), TOP_K);

    info!(
        squads = squads.len(),
        nodes = stats.nodes,
        leaves = stats.leaves,
        bound_prunes = stats.bound_prunes,
        budget_prunes = stats.budget_prunes,
        "optimization finished"
    );

    Ok(Optimization { squads, stats })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
