// Mutable search state for one formation attempt.

use crate::player::Position;

use super::pool::CandidatePlayer;
use super::TEAM_CAP;

/// Everything a single formation attempt mutates: per-team pick counters,
/// running cost and score, and the picks grouped by position. Candidates are
/// referenced by index into the pool; nothing here owns a player.
#[derive(Debug, Clone)]
pub struct SearchState {
    team_counts: Vec<u8>,
    cost: f64,
    score: f64,
    picks: [Vec<usize>; 4],
}

/// Values needed to revert one `apply`.
#[derive(Debug, Clone, Copy)]
pub struct Mark {
    cost: f64,
    score: f64,
    team_slot: usize,
    position: Position,
}

impl SearchState {
    pub fn new(team_count: usize) -> Self {
        SearchState {
            team_counts: vec![0; team_count],
            cost: 0.0,
            score: 0.0,
            picks: Default::default(),
        }
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    #[cfg(test)]
    fn team_count(&self, team_slot: usize) -> u8 {
        self.team_counts[team_slot]
    }

    /// Candidate indices picked at `position`, in pick order.
    pub fn picks(&self, position: Position) -> &[usize] {
        &self.picks[position.index()]
    }

    /// Whether the candidate's team is below the cap.
    pub fn team_has_room(&self, candidate: &CandidatePlayer) -> bool {
        self.team_counts[candidate.team_slot] < TEAM_CAP
    }

    /// Whether adding the candidate keeps the running cost within `budget`.
    /// `apply` adds the same way, so a squad's reported cost is the value
    /// checked here and never exceeds the budget.
    pub fn fits_budget(&self, candidate: &CandidatePlayer, budget: f64) -> bool {
        self.cost + candidate.cost <= budget
    }

    /// Add a candidate. The returned mark restores the previous state exactly
    /// when passed to `undo`.
    pub fn apply(&mut self, index: usize, candidate: &CandidatePlayer) -> Mark {
        let mark = Mark {
            cost: self.cost,
            score: self.score,
            team_slot: candidate.team_slot,
            position: candidate.position,
        };
        self.team_counts[candidate.team_slot] += 1;
        self.cost += candidate.cost;
        self.score += candidate.weight;
        self.picks[candidate.position.index()].push(index);
        mark
    }

    /// Revert the most recent `apply`.
    pub fn undo(&mut self, mark: Mark) {
        self.picks[mark.position.index()].pop();
        self.team_counts[mark.team_slot] -= 1;
        self.cost = mark.cost;
        self.score = mark.score;
    }
}
