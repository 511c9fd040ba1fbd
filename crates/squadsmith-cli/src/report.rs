// Rendering of optimization results as plain text or JSON.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::Serialize;

use squadsmith_core::{Optimization, PlayerId, Position, SearchStats, Squad};
use squadsmith_fpl::Bootstrap;

const NO_SQUAD: &str = "no squad meets your constraints";

// ---------------------------------------------------------------------------
// JSON report
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct Report<'a> {
    generated_at: DateTime<Utc>,
    budget: f64,
    squads: Vec<ReportSquad>,
    stats: &'a SearchStats,
}

#[derive(Debug, Serialize)]
struct ReportSquad {
    rank: usize,
    formation: String,
    score: f64,
    total_cost: f64,
    ids: Vec<PlayerId>,
    players: Vec<ReportPlayer>,
}

#[derive(Debug, Serialize)]
struct ReportPlayer {
    id: PlayerId,
    name: String,
    team: String,
    position: Position,
    cost: f64,
}

fn report_player(bootstrap: &Bootstrap, id: PlayerId, position: Position) -> ReportPlayer {
    match bootstrap.element(id) {
        Some(e) => ReportPlayer {
            id,
            name: e.web_name.clone(),
            team: bootstrap.team_label(e.team),
            position,
            cost: e.cost,
        },
        None => ReportPlayer {
            id,
            name: format!("#{id}"),
            team: String::new(),
            position,
            cost: 0.0,
        },
    }
}

fn report_squad(bootstrap: &Bootstrap, rank: usize, squad: &Squad) -> ReportSquad {
    let players = Position::ALL
        .iter()
        .flat_map(|&pos| {
            squad
                .breakdown
                .get(pos)
                .iter()
                .map(move |&id| report_player(bootstrap, id, pos))
        })
        .collect();
    ReportSquad {
        rank,
        formation: squad.formation.to_string(),
        score: squad.score,
        total_cost: squad.total_cost,
        ids: squad.ids.clone(),
        players,
    }
}

pub fn render_json(
    optimization: &Optimization,
    bootstrap: &Bootstrap,
    budget: f64,
    generated_at: DateTime<Utc>,
) -> serde_json::Result<String> {
    let report = Report {
        generated_at,
        budget,
        squads: optimization
            .squads
            .iter()
            .enumerate()
            .map(|(i, s)| report_squad(bootstrap, i + 1, s))
            .collect(),
        stats: &optimization.stats,
    };
    serde_json::to_string_pretty(&report)
}

// ---------------------------------------------------------------------------
// Text report
// ---------------------------------------------------------------------------

pub fn render_text(optimization: &Optimization, bootstrap: &Bootstrap, budget: f64) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Starting XI budget: {budget:.1}m");

    if optimization.squads.is_empty() {
        out.push('\n');
        out.push_str(NO_SQUAD);
        return out;
    }

    for (i, squad) in optimization.squads.iter().enumerate() {
        let _ = writeln!(
            out,
            "\n#{}  {}  score {:.2}  cost {:.1}m",
            i + 1,
            squad.formation,
            squad.score,
            squad.total_cost
        );
        for position in Position::ALL {
            let line: Vec<String> = squad
                .breakdown
                .get(position)
                .iter()
                .map(|&id| {
                    let p = report_player(bootstrap, id, position);
                    if p.team.is_empty() {
                        p.name
                    } else {
                        format!("{} ({}) {:.1}", p.name, p.team, p.cost)
                    }
                })
                .collect();
            let _ = writeln!(out, "  {position}  {}", line.join(", "));
        }
    }

    // Trailing newline comes from println!.
    out.truncate(out.trim_end().len());
    out
}
