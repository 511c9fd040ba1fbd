// Legal starting-XI formation shapes.

use serde::Serialize;
use std::fmt;

use crate::player::Position;

/// Number of outfield players in every formation.
pub const OUTFIELD_PLAYERS: usize = 10;

/// Number of players in a starting XI.
pub const SQUAD_SIZE: usize = OUTFIELD_PLAYERS + 1;

/// Required defender/midfielder/forward counts. Exactly one goalkeeper is
/// implied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Formation {
    pub defenders: usize,
    pub midfielders: usize,
    pub forwards: usize,
}

/// The catalog of shapes the search tries, in order.
pub const FORMATIONS: [Formation; 6] = [
    Formation::new(3, 4, 3),
    Formation::new(3, 5, 2),
    Formation::new(4, 4, 2),
    Formation::new(4, 3, 3),
    Formation::new(5, 3, 2),
    Formation::new(5, 4, 1),
];

impl Formation {
    pub const fn new(defenders: usize, midfielders: usize, forwards: usize) -> Self {
        Formation {
            defenders,
            midfielders,
            forwards,
        }
    }

    /// How many players of `position` this shape requires.
    pub fn required(&self, position: Position) -> usize {
        match position {
            Position::Goalkeeper => 1,
            Position::Defender => self.defenders,
            Position::Midfielder => self.midfielders,
            Position::Forward => self.forwards,
        }
    }

    /// Required counts indexed by `Position::index()`.
    pub fn needs(&self) -> [usize; 4] {
        [1, self.defenders, self.midfielders, self.forwards]
    }

    /// Find the catalog shape matching the given outfield counts.
    pub fn lookup(defenders: usize, midfielders: usize, forwards: usize) -> Option<Formation> {
        FORMATIONS
            .iter()
            .copied()
            .find(|f| f.defenders == defenders && f.midfielders == midfielders && f.forwards == forwards)
    }

    /// Largest requirement for `position` across the whole catalog.
    pub fn max_required(position: Position) -> usize {
        FORMATIONS
            .iter()
            .map(|f| f.required(position))
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Display for Formation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.defenders, self.midfielders, self.forwards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shape_has_ten_outfielders() {
        for f in FORMATIONS {
            assert_eq!(
                f.defenders + f.midfielders + f.forwards,
                OUTFIELD_PLAYERS,
                "{f} does not sum to 10"
            );
            assert_eq!(f.needs().iter().sum::<usize>(), SQUAD_SIZE);
        }
    }

    #[test]
    fn shapes_are_distinct() {
        for (i, a) in FORMATIONS.iter().enumerate() {
            for b in &FORMATIONS[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn required_counts() {
        let f = Formation::new(4, 4, 2);
        assert_eq!(f.required(Position::Goalkeeper), 1);
        assert_eq!(f.required(Position::Defender), 4);
        assert_eq!(f.required(Position::Midfielder), 4);
        assert_eq!(f.required(Position::Forward), 2);
    }

    #[test]
    fn lookup_finds_catalog_shapes_only() {
        assert_eq!(Formation::lookup(3, 5, 2), Some(Formation::new(3, 5, 2)));
        assert_eq!(Formation::lookup(2, 5, 3), None);
        assert_eq!(Formation::lookup(4, 5, 1), None);
    }

    #[test]
    fn max_required_per_position() {
        assert_eq!(Formation::max_required(Position::Goalkeeper), 1);
        assert_eq!(Formation::max_required(Position::Defender), 5);
        assert_eq!(Formation::max_required(Position::Midfielder), 5);
        assert_eq!(Formation::max_required(Position::Forward), 3);
    }

    #[test]
    fn displays_as_dash_separated() {
        assert_eq!(Formation::new(3, 4, 3).to_string(), "3-4-3");
    }
}
