// Shortlisted players and the four playing positions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upstream player identifier.
pub type PlayerId = u32;

/// Upstream (real-world) team identifier.
pub type TeamId = u32;

/// Playing positions, in the order the search visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Position {
    /// All positions in visiting order (GK, DEF, MID, FWD).
    pub const ALL: [Position; 4] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ];

    /// Map the upstream `element_type` code (1 GK, 2 DEF, 3 MID, 4 FWD).
    pub fn from_element_type(code: u8) -> Option<Self> {
        match code {
            1 => Some(Position::Goalkeeper),
            2 => Some(Position::Defender),
            3 => Some(Position::Midfielder),
            4 => Some(Position::Forward),
            _ => None,
        }
    }

    /// Dense index into per-position arrays.
    pub fn index(&self) -> usize {
        match self {
            Position::Goalkeeper => 0,
            Position::Defender => 1,
            Position::Midfielder => 2,
            Position::Forward => 3,
        }
    }

    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "GKP",
            Position::Defender => "DEF",
            Position::Midfielder => "MID",
            Position::Forward => "FWD",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

/// A shortlisted player as supplied by the caller. Weights are supplied
/// separately, keyed by `id`. `cost` uses the same unit as the budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolPlayer {
    pub id: PlayerId,
    pub team: TeamId,
    pub position: Position,
    pub cost: f64,
}

impl PoolPlayer {
    pub fn new(id: PlayerId, team: TeamId, position: Position, cost: f64) -> Self {
        PoolPlayer {
            id,
            team,
            position,
            cost,
        }
    }
}
