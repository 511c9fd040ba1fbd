// Library root for the squad optimizer: domain types, the branch-and-bound
// lineup search, and configuration loading.

pub mod config;
pub mod formation;
pub mod optimizer;
pub mod player;

pub use formation::{Formation, FORMATIONS};
pub use optimizer::{
    optimize, Breakdown, OptimizeError, OptimizeOptions, OptimizeRequest, Optimization,
    SearchStats, Squad,
};
pub use player::{PlayerId, PoolPlayer, Position, TeamId};
