// The user's shortlist: chosen player IDs, their weights and locks, and the
// money held back for the bench. Stored as JSON or as a CSV table.

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use squadsmith_core::{OptimizeRequest, PlayerId, PoolPlayer, Position};

use crate::bootstrap::Bootstrap;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ShortlistError {
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

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("unsupported shortlist format for {path}: expected .json or .csv")]
    UnsupportedFormat { path: String },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Shortlist
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Shortlist {
    /// Chosen players, in the order they were picked.
    pub ids: Vec<PlayerId>,
    #[serde(default)]
    pub weights: HashMap<PlayerId, f64>,
    #[serde(default)]
    pub locks: HashMap<PlayerId, bool>,
    /// Overrides the configured bench value when present.
    #[serde(default, alias = "benchValue")]
    pub bench_value: Option<f64>,
}

/// Shortlisted players per position, counted against the bootstrap data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShortlistCounts {
    pub total: usize,
    pub per_position: [usize; 4],
}

impl ShortlistCounts {
    /// Minimum shortlist: 14 players with at least 1 GK, 5 DEF, 5 MID, 3 FWD.
    pub const MIN_TOTAL: usize = 14;
    pub const MIN_PER_POSITION: [usize; 4] = [1, 5, 5, 3];

    pub fn get(&self, position: Position) -> usize {
        self.per_position[position.index()]
    }

    /// Whether the shortlist is large enough to be worth optimizing.
    pub fn is_complete(&self) -> bool {
        self.total >= Self::MIN_TOTAL
            && self
                .per_position
                .iter()
                .zip(Self::MIN_PER_POSITION)
                .all(|(&have, need)| have >= need)
    }

    /// Human-readable shortfalls, empty when complete.
    pub fn shortfalls(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.total < Self::MIN_TOTAL {
            out.push(format!("{} players (need {})", self.total, Self::MIN_TOTAL));
        }
        for position in Position::ALL {
            let (have, need) = (self.get(position), Self::MIN_PER_POSITION[position.index()]);
            if have < need {
                out.push(format!("{have} {position} (need {need})"));
            }
        }
        out
    }
}

impl Shortlist {
    pub fn locked(&self, id: PlayerId) -> bool {
        self.locks.get(&id).copied().unwrap_or(false)
    }

    /// Shortlisted elements present in `bootstrap`, in shortlist order.
    /// Missing and repeated IDs are skipped with a warning.
    fn resolve(&self, bootstrap: &Bootstrap) -> Vec<PoolPlayer> {
        let mut seen = HashSet::with_capacity(self.ids.len());
        let mut pool = Vec::with_capacity(self.ids.len());
        for &id in &self.ids {
            if !seen.insert(id) {
                warn!("player {id} is shortlisted twice, ignoring the repeat");
                continue;
            }
            match bootstrap.element(id) {
                Some(element) => pool.push(element.to_pool_player()),
                None => warn!("shortlisted player {id} not found in bootstrap data, skipping"),
            }
        }
        pool
    }

    pub fn counts(&self, bootstrap: &Bootstrap) -> ShortlistCounts {
        let mut counts = ShortlistCounts::default();
        for p in self.resolve(bootstrap) {
            counts.total += 1;
            counts.per_position[p.position.index()] += 1;
        }
        counts
    }

    /// Build the optimizer input. Weights and locks are carried only for
    /// players that made it into the pool; a dropped lock is warned about.
    pub fn to_request(&self, bootstrap: &Bootstrap, budget: f64) -> OptimizeRequest {
        let pool = self.resolve(bootstrap);
        let pooled: HashSet<PlayerId> = pool.iter().map(|p| p.id).collect();

        let weights = self
            .weights
            .iter()
            .filter(|(id, _)| pooled.contains(id))
            .map(|(&id, &w)| (id, w))
            .collect();

        let mut locks = HashMap::new();
        for &id in self.locks.keys().filter(|&&id| self.locked(id)) {
            if pooled.contains(&id) {
                locks.insert(id, true);
            } else {
                warn!("lock on player {id} dropped: player is not in the pool");
            }
        }

        OptimizeRequest {
            pool,
            weights,
            budget,
            locks,
        }
    }
}

// ---------------------------------------------------------------------------
// CSV rows (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawRow {
    id: PlayerId,
    #[serde(default)]
    weight: Option<f64>,
    #[serde(default)]
    locked: Option<String>,
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" | "no" | "n" => Some(false),
        "true" | "1" | "yes" | "y" | "x" => Some(true),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Reader-based loaders (private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn shortlist_from_csv<R: Read>(rdr: R) -> Result<Shortlist, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(rdr);
    let mut shortlist = Shortlist::default();

    for result in reader.deserialize::<RawRow>() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed shortlist row: {}", e);
                continue;
            }
        };
        let weight = raw.weight.unwrap_or(0.0);
        if !weight.is_finite() {
            warn!("skipping shortlist row for {}: non-finite weight", raw.id);
            continue;
        }
        let locked = match raw.locked.as_deref().map(parse_flag) {
            None => false,
            Some(Some(flag)) => flag,
            Some(None) => {
                warn!("player {}: unrecognised locked value, treating as unlocked", raw.id);
                false
            }
        };

        if shortlist.weights.contains_key(&raw.id) {
            warn!("duplicate shortlist row for {}, using latest values", raw.id);
        } else {
            shortlist.ids.push(raw.id);
        }
        shortlist.weights.insert(raw.id, weight);
        shortlist.locks.insert(raw.id, locked);
    }

    Ok(shortlist)
}

fn shortlist_from_json<R: Read>(rdr: R) -> Result<Shortlist, serde_json::Error> {
    serde_json::from_reader(rdr)
}

fn check(shortlist: &Shortlist) -> Result<(), ShortlistError> {
    if let Some((id, w)) = shortlist.weights.iter().find(|(_, w)| !w.is_finite()) {
        return Err(ShortlistError::Validation(format!(
            "weight for player {id} is not finite: {w}"
        )));
    }
    if let Some(bench) = shortlist.bench_value {
        if !bench.is_finite() || bench < 0.0 {
            return Err(ShortlistError::Validation(format!(
                "bench_value must be a non-negative number, got {bench}"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Public path-based loader
// ---------------------------------------------------------------------------

/// Load a shortlist, choosing the format from the file extension.
pub fn load_shortlist(path: &Path) -> Result<Shortlist, ShortlistError> {
    let display = path.display().to_string();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let file = || {
        std::fs::File::open(path)
            .map(std::io::BufReader::new)
            .map_err(|e| ShortlistError::Io {
                path: display.clone(),
                source: e,
            })
    };

    let shortlist = match extension.as_deref() {
        Some("json") => shortlist_from_json(file()?).map_err(|e| ShortlistError::Json {
            path: display.clone(),
            source: e,
        })?,
        Some("csv") => shortlist_from_csv(file()?).map_err(|e| ShortlistError::Csv {
            path: display.clone(),
            source: e,
        })?,
        _ => return Err(ShortlistError::UnsupportedFormat { path: display }),
    };

    check(&shortlist)?;
    Ok(shortlist)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::Element;

    fn element(id: PlayerId, position: Position) -> Element {
        Element {
            id,
            web_name: format!("P{id}"),
            team: id % 5,
            position,
            cost: 5.0,
        }
    }

    #[test]
    fn json_accepts_camel_case_bench_value() {
        let s = shortlist_from_json(
            r#"{"ids": [3, 1], "weights": {"3": 2.5}, "locks": {"1": true}, "benchValue": 18.5}"#
                .as_bytes(),
        )
        .unwrap();
        assert_eq!(s.ids, vec![3, 1]);
        assert_eq!(s.weights.get(&3), Some(&2.5));
        assert!(s.locked(1));
        assert!(!s.locked(3));
        assert_eq!(s.bench_value, Some(18.5));
    }

    #[test]
    fn json_defaults_missing_maps() {
        let s = shortlist_from_json(r#"{"ids": [5]}"#.as_bytes()).unwrap();
        assert!(s.weights.is_empty());
        assert!(s.locks.is_empty());
        assert_eq!(s.bench_value, None);
    }

    #[test]
    fn csv_parses_rows_and_flags() {
        let data = "id,weight,locked\n10,4.5,true\n11,,\n12,3,yes\n13,2,maybe\n";
        let s = shortlist_from_csv(data.as_bytes()).unwrap();
        assert_eq!(s.ids, vec![10, 11, 12, 13]);
        assert_eq!(s.weights[&11], 0.0);
        assert!(s.locked(10));
        assert!(!s.locked(11));
        assert!(s.locked(12));
        assert!(!s.locked(13));
    }

    #[test]
    fn csv_skips_malformed_and_non_finite_rows() {
        let data = "id,weight,locked\nabc,1,false\n20,NaN,false\n21,1.5,false\n";
        let s = shortlist_from_csv(data.as_bytes()).unwrap();
        assert_eq!(s.ids, vec![21]);
    }

    #[test]
    fn csv_duplicate_keeps_first_position_latest_values() {
        let data = "id,weight,locked\n7,1,false\n8,2,false\n7,9,true\n";
        let s = shortlist_from_csv(data.as_bytes()).unwrap();
        assert_eq!(s.ids, vec![7, 8]);
        assert_eq!(s.weights[&7], 9.0);
        assert!(s.locked(7));
    }

    #[test]
    fn request_keeps_shortlist_order_and_skips_missing() {
        let bootstrap = Bootstrap::new(
            vec![
                element(1, Position::Goalkeeper),
                element(2, Position::Defender),
                element(3, Position::Forward),
            ],
            Vec::new(),
        );
        let shortlist = Shortlist {
            ids: vec![3, 99, 1, 3],
            weights: HashMap::from([(3, 4.0), (99, 8.0)]),
            locks: HashMap::from([(99, true), (1, true), (3, false)]),
            bench_value: None,
        };
        let req = shortlist.to_request(&bootstrap, 83.0);

        let ids: Vec<PlayerId> = req.pool.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1]);
        assert_eq!(req.weights, HashMap::from([(3, 4.0)]));
        assert_eq!(req.locks, HashMap::from([(1, true)]));
        assert_eq!(req.budget, 83.0);
    }

    #[test]
    fn counts_report_shortfalls() {
        let mut elements = vec![element(1, Position::Goalkeeper)];
        elements.extend((10..15).map(|id| element(id, Position::Defender)));
        elements.extend((20..25).map(|id| element(id, Position::Midfielder)));
        elements.extend((30..32).map(|id| element(id, Position::Forward)));
        let ids = elements.iter().map(|e| e.id).collect();
        let bootstrap = Bootstrap::new(elements, Vec::new());
        let shortlist = Shortlist {
            ids,
            ..Default::default()
        };

        let counts = shortlist.counts(&bootstrap);
        assert_eq!(counts.total, 13);
        assert_eq!(counts.get(Position::Forward), 2);
        assert!(!counts.is_complete());
        assert_eq!(
            counts.shortfalls(),
            vec!["13 players (need 14)".to_string(), "2 FWD (need 3)".to_string()]
        );
    }

    #[test]
    fn check_rejects_negative_bench() {
        let s = Shortlist {
            bench_value: Some(-2.0),
            ..Default::default()
        };
        assert!(matches!(check(&s), Err(ShortlistError::Validation(_))));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_shortlist(Path::new("picks.txt")).unwrap_err();
        assert!(matches!(err, ShortlistError::UnsupportedFormat { .. }));
    }
}
