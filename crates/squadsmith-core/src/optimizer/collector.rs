// Bounded top-K collector for completed squads.

use std::cmp::Ordering;

use super::Squad;

/// Ranking used everywhere squads are compared: score descending, then cost
/// ascending, then the sorted ID set ascending.
pub fn rank_order(a: &Squad, b: &Squad) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then(a.total_cost.total_cmp(&b.total_cost))
        .then_with(|| a.sorted_ids().cmp(&b.sorted_ids()))
}

/// Fixed-capacity list of the best squads seen so far, kept in rank order.
#[derive(Debug, Clone)]
pub struct SquadCollector {
    entries: Vec<Squad>,
    capacity: usize,
}

impl SquadCollector {
    pub fn new(capacity: usize) -> Self {
        SquadCollector {
            entries: Vec::with_capacity(capacity + 1),
            capacity,
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Score of the lowest-ranked entry, once the collector is full. Score
    /// pruning is only sound after that point.
    pub fn cutoff(&self) -> Option<f64> {
        if self.is_full() {
            self.entries.last().map(|s| s.score)
        } else {
            None
        }
    }

    /// Cheap pre-check before building a squad: could a squad with this score
    /// and cost rank inside the collector? Ties are admitted so the full
    /// comparison in `offer` can decide.
    pub fn admits(&self, score: f64, cost: f64) -> bool {
        match self.entries.last() {
            Some(worst) if self.is_full() => {
                score > worst.score || (score == worst.score && cost <= worst.total_cost)
            }
            _ => true,
        }
    }

    /// Insert `squad` at its rank, evicting the lowest entry when over
    /// capacity. Returns whether the squad was kept.
    pub fn offer(&mut self, squad: Squad) -> bool {
        let at = self
            .entries
            .partition_point(|held| rank_order(held, &squad) != Ordering::Greater);
        if at >= self.capacity {
            return false;
        }
        self.entries.insert(at, squad);
        self.entries.truncate(self.capacity);
        true
    }

    /// Held squads in rank order.
    #[cfg(test)]
    fn squads(&self) -> &[Squad] {
        &self.entries
    }

    pub fn into_squads(self) -> Vec<Squad> {
        self.entries
    }
}
