// League bootstrap document: every player ("element") and team.

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use squadsmith_core::{PlayerId, PoolPlayer, Position, TeamId};

/// `now_cost` is quoted in tenths of a million.
const COST_UNITS_PER_MILLION: f64 = 10.0;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One player as listed in the bootstrap document.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: PlayerId,
    pub web_name: String,
    pub team: TeamId,
    pub position: Position,
    /// Price in millions.
    pub cost: f64,
}

impl Element {
    pub fn to_pool_player(&self) -> PoolPlayer {
        PoolPlayer::new(self.id, self.team, self.position, self.cost)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub short_name: String,
}

/// Players and teams, indexed by ID.
#[derive(Debug, Clone, Default)]
pub struct Bootstrap {
    elements: Vec<Element>,
    teams: Vec<Team>,
    element_index: HashMap<PlayerId, usize>,
    team_index: HashMap<TeamId, usize>,
}

impl Bootstrap {
    pub fn new(elements: Vec<Element>, teams: Vec<Team>) -> Self {
        let element_index = elements.iter().enumerate().map(|(i, e)| (e.id, i)).collect();
        let team_index = teams.iter().enumerate().map(|(i, t)| (t.id, i)).collect();
        Bootstrap {
            elements,
            teams,
            element_index,
            team_index,
        }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn element(&self, id: PlayerId) -> Option<&Element> {
        self.element_index.get(&id).map(|&i| &self.elements[i])
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.team_index.get(&id).map(|&i| &self.teams[i])
    }

    /// Short name of a team, falling back to its full name, then its ID.
    pub fn team_label(&self, id: TeamId) -> String {
        match self.team(id) {
            Some(t) if !t.short_name.is_empty() => t.short_name.clone(),
            Some(t) => t.name.clone(),
            None => format!("#{id}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Raw serde structs (private)
// ---------------------------------------------------------------------------

/// Only the fields the optimizer needs; everything else in the document is
/// ignored.
#[derive(Debug, Deserialize)]
struct RawBootstrap {
    elements: Vec<RawElement>,
    #[serde(default)]
    teams: Vec<Team>,
}

#[derive(Debug, Deserialize)]
struct RawElement {
    id: PlayerId,
    #[serde(default)]
    web_name: String,
    team: TeamId,
    element_type: u8,
    now_cost: f64,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

fn convert(raw: RawBootstrap) -> Bootstrap {
    let mut elements: Vec<Element> = Vec::with_capacity(raw.elements.len());
    let mut seen: HashSet<PlayerId> = HashSet::with_capacity(raw.elements.len());

    for e in raw.elements {
        let Some(position) = Position::from_element_type(e.element_type) else {
            warn!(
                "skipping element {} '{}': unknown element_type {}",
                e.id, e.web_name, e.element_type
            );
            continue;
        };
        if !e.now_cost.is_finite() || e.now_cost < 0.0 {
            warn!("skipping element {} '{}': invalid now_cost {}", e.id, e.web_name, e.now_cost);
            continue;
        }
        if !seen.insert(e.id) {
            warn!("duplicate element {}, keeping the first entry", e.id);
            continue;
        }
        elements.push(Element {
            id: e.id,
            web_name: e.web_name.trim().to_string(),
            team: e.team,
            position,
            cost: e.now_cost / COST_UNITS_PER_MILLION,
        });
    }

    Bootstrap::new(elements, raw.teams)
}

fn parse_bootstrap<R: Read>(rdr: R) -> Result<Bootstrap, serde_json::Error> {
    let raw: RawBootstrap = serde_json::from_reader(rdr)?;
    Ok(convert(raw))
}

/// Load the bootstrap document from a JSON file.
pub fn load_bootstrap(path: &Path) -> Result<Bootstrap, BootstrapError> {
    let file = std::fs::File::open(path).map_err(|e| BootstrapError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let bootstrap = parse_bootstrap(std::io::BufReader::new(file)).map_err(|e| {
        BootstrapError::Json {
            path: path.display().to_string(),
            source: e,
        }
    })?;

    if bootstrap.elements.is_empty() {
        return Err(BootstrapError::Validation(format!(
            "{} produced zero usable elements",
            path.display()
        )));
    }

    Ok(bootstrap)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
