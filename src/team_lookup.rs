use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::dataset::{self, EloRow, GameRow, PickRow, WeekRef};

#[derive(Debug, Clone, Deserialize)]
pub struct TeamLookupRow {
    pub team_short: String,
    pub team_full: String,
    pub team_master_short: String,
}

pub fn load_team_lookup(path: &Path) -> Result<Vec<TeamLookupRow>> {
    dataset::read_table(
        path,
        "team lookup",
        &["team_short", "team_full", "team_master_short"],
    )
}

/// Maps any short-code or full-name variant to the one canonical short code.
/// Lookup is exact after trimming; there is no fuzzy matching.
#[derive(Debug, Clone, Default)]
pub struct TeamLookup {
    by_short: HashMap<String, String>,
    by_full: HashMap<String, String>,
}

impl TeamLookup {
    pub fn from_rows(rows: &[TeamLookupRow]) -> Self {
        let mut by_short: HashMap<String, String> = HashMap::new();
        let mut by_full: HashMap<String, String> = HashMap::new();
        for row in rows {
            let master = row.team_master_short.trim().to_string();
            by_short
                .entry(row.team_short.trim().to_string())
                .or_insert_with(|| master.clone());
            by_full
                .entry(row.team_full.trim().to_string())
                .or_insert_with(|| master.clone());
            // A canonical code always resolves to itself, so re-resolving
            // already-mastered data is a no-op.
            by_short.entry(master.clone()).or_insert(master);
        }
        Self { by_short, by_full }
    }

    pub fn resolve(&self, name: &str) -> Option<&str> {
        let key = name.trim();
        self.by_short
            .get(key)
            .or_else(|| self.by_full.get(key))
            .map(String::as_str)
    }
}

/// A canonicalized table plus how many name variants failed to resolve.
/// Unresolved names become `None` and surface only through this count;
/// they are never an error.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    pub rows: Vec<T>,
    pub unresolved: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CanonEloRow {
    pub season: i32,
    pub date: NaiveDate,
    pub team1: Option<String>,
    pub team2: Option<String>,
    pub elo_team1: f64,
    pub elo_team2: f64,
    pub prob_team1: f64,
    pub prob_team2: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CanonPickRow {
    pub season: i32,
    pub week: WeekRef,
    pub team: Option<String>,
    pub pick_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CanonGameRow {
    pub season: i32,
    pub date: NaiveDate,
    pub team1: Option<String>,
    pub team2: Option<String>,
    pub points_team1: i32,
    pub points_team2: i32,
}

pub fn canonicalize_elo(rows: &[EloRow], lookup: &TeamLookup) -> Resolved<CanonEloRow> {
    let mut unresolved = 0usize;
    let rows = rows
        .iter()
        .map(|row| CanonEloRow {
            season: row.season,
            date: row.date,
            team1: resolve_counted(lookup, &row.team1, &mut unresolved),
            team2: resolve_counted(lookup, &row.team2, &mut unresolved),
            elo_team1: row.elo_team1,
            elo_team2: row.elo_team2,
            prob_team1: row.prob_team1,
            prob_team2: row.prob_team2,
        })
        .collect();
    Resolved { rows, unresolved }
}

pub fn canonicalize_picks(rows: &[PickRow], lookup: &TeamLookup) -> Resolved<CanonPickRow> {
    let mut unresolved = 0usize;
    let rows = rows
        .iter()
        .map(|row| CanonPickRow {
            season: row.season,
            week: row.week,
            team: resolve_counted(lookup, &row.team, &mut unresolved),
            pick_pct: row.pick_pct,
        })
        .collect();
    Resolved { rows, unresolved }
}

pub fn canonicalize_games(rows: &[GameRow], lookup: &TeamLookup) -> Resolved<CanonGameRow> {
    let mut unresolved = 0usize;
    let rows = rows
        .iter()
        .map(|row| CanonGameRow {
            season: row.season,
            date: row.date,
            team1: resolve_counted(lookup, &row.team1, &mut unresolved),
            team2: resolve_counted(lookup, &row.team2, &mut unresolved),
            points_team1: row.points_team1,
            points_team2: row.points_team2,
        })
        .collect();
    Resolved { rows, unresolved }
}

fn resolve_counted(lookup: &TeamLookup, name: &str, unresolved: &mut usize) -> Option<String> {
    match lookup.resolve(name) {
        Some(code) => Some(code.to_string()),
        None => {
            *unresolved += 1;
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup() -> TeamLookup {
        TeamLookup::from_rows(&[
            TeamLookupRow {
                team_short: "GNB".to_string(),
                team_full: "Green Bay Packers".to_string(),
                team_master_short: "GB".to_string(),
            },
            TeamLookupRow {
                team_short: "CHI".to_string(),
                team_full: "Chicago Bears".to_string(),
                team_master_short: "CHI".to_string(),
            },
        ])
    }

    #[test]
    fn resolves_both_variant_schemes() {
        let lookup = lookup();
        assert_eq!(lookup.resolve("GNB"), Some("GB"));
        assert_eq!(lookup.resolve("Green Bay Packers"), Some("GB"));
        assert_eq!(lookup.resolve(" CHI "), Some("CHI"));
    }

    #[test]
    fn canonical_codes_resolve_to_themselves() {
        let lookup = lookup();
        // "GB" has no explicit lookup row, only a master column entry.
        assert_eq!(lookup.resolve("GB"), Some("GB"));
    }

    #[test]
    fn unknown_names_become_none_and_are_counted() {
        let lookup = lookup();
        assert_eq!(lookup.resolve("Duluth Eskimos"), None);

        let resolved = canonicalize_picks(
            &[
                PickRow {
                    season: 2012,
                    week: WeekRef::Round(1),
                    team: "GNB".to_string(),
                    pick_pct: 0.4,
                },
                PickRow {
                    season: 2012,
                    week: WeekRef::Round(1),
                    team: "Duluth Eskimos".to_string(),
                    pick_pct: 0.1,
                },
            ],
            &lookup,
        );
        assert_eq!(resolved.unresolved, 1);
        assert_eq!(resolved.rows[0].team.as_deref(), Some("GB"));
        assert_eq!(resolved.rows[1].team, None);
    }
}
