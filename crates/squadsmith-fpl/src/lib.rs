// Adapters from fantasy-league data files to optimizer input: the league
// bootstrap document (players and teams) and the user's shortlist.

pub mod bootstrap;
pub mod shortlist;

pub use bootstrap::{load_bootstrap, Bootstrap, BootstrapError, Element, Team};
pub use shortlist::{load_shortlist, Shortlist, ShortlistCounts, ShortlistError};
