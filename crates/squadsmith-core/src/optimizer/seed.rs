// Lock seeding: place every locked player before the search starts.

use std::collections::BTreeSet;

use crate::formation::Formation;
use crate::player::{PlayerId, Position};

use super::pool::CandidatePool;
use super::state::SearchState;

/// Why a formation could not take all locked players.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedConflict {
    /// More locked players at this position than the formation allows.
    QuotaExceeded(Position),
    /// Locked players would put a fourth player from one team in the XI.
    TeamCapExceeded(PlayerId),
    /// Locked players alone cost more than the budget.
    OverBudget(PlayerId),
}

/// A formation attempt after the locks have been placed.
#[derive(Debug, Clone)]
pub struct Seed {
    pub state: SearchState,
    /// Remaining need per position, indexed by `Position::index()`.
    pub need: [usize; 4],
}

/// Place every locked player for `formation`.
///
/// Locked players are visited position by position (GK, DEF, MID, FWD) and,
/// within a position, in the bucket's branch order. Each placement consumes
/// one unit of that position's need, one team pick, and its cost. The first
/// placement that would exhaust a quota, exceed the team cap, or exceed the
/// budget makes the whole formation infeasible.
pub fn seed_locks(
    pool: &CandidatePool,
    formation: Formation,
    locked: &BTreeSet<usize>,
    budget: f64,
) -> Result<Seed, SeedConflict> {
    let mut state = SearchState::new(pool.team_count());
    let mut need = formation.needs();

    for position in Position::ALL {
        for &index in &pool.bucket(position).by_weight {
            if !locked.contains(&index) {
                continue;
            }
            let candidate = pool.candidate(index);
            if need[position.index()] == 0 {
                return Err(SeedConflict::QuotaExceeded(position));
            }
            if !state.team_has_room(candidate) {
                return Err(SeedConflict::TeamCapExceeded(candidate.id));
            }
            if !state.fits_budget(candidate, budget) {
                return Err(SeedConflict::OverBudget(candidate.id));
            }
            state.apply(index, candidate);
            need[position.index()] -= 1;
        }
    }

    Ok(Seed { state, need })
}
