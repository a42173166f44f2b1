use crate::season_weeks::WeekIndex;
use crate::team_lookup::{CanonEloRow, CanonGameRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Win,
    Loss,
    Tie,
}

impl GameResult {
    pub fn from_points(points_for: i32, points_against: i32) -> Self {
        if points_for > points_against {
            GameResult::Win
        } else if points_for < points_against {
            GameResult::Loss
        } else {
            GameResult::Tie
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            GameResult::Win => "W",
            GameResult::Loss => "L",
            GameResult::Tie => "T",
        }
    }
}

/// One row per team per matchup, with the side-qualified probability fields
/// renamed to unqualified ones.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamProbRow {
    pub season: i32,
    pub week: u32,
    pub team: String,
    pub elo_rating: f64,
    pub win_prob: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamResultRow {
    pub season: i32,
    pub week: u32,
    pub team: String,
    pub result: GameResult,
}

/// Explode the matchup-shaped probability table into team-shaped long form:
/// two rows per fully-resolved matchup, no aggregation. Sides whose team name
/// failed identity resolution are skipped; they could never match a join key
/// and are already counted by the resolver.
pub fn matchup_probs_to_team_rows(rows: &[CanonEloRow], weeks: &WeekIndex) -> Vec<TeamProbRow> {
    let mut out = Vec::with_capacity(rows.len() * 2);
    for row in rows {
        let Some(week) = weeks.week_of(row.season, row.date) else {
            continue;
        };
        if let Some(team) = &row.team1 {
            out.push(TeamProbRow {
                season: row.season,
                week,
                team: team.clone(),
                elo_rating: row.elo_team1,
                win_prob: row.prob_team1,
            });
        }
        if let Some(team) = &row.team2 {
            out.push(TeamProbRow {
                season: row.season,
                week,
                team: team.clone(),
                elo_rating: row.elo_team2,
                win_prob: row.prob_team2,
            });
        }
    }
    out
}

/// Same structural transform for the score table, deriving each side's
/// win/loss/tie against the opposite side. Ties are explicit, never missing.
pub fn game_rows_to_team_results(rows: &[CanonGameRow], weeks: &WeekIndex) -> Vec<TeamResultRow> {
    let mut out = Vec::with_capacity(rows.len() * 2);
    for row in rows {
        let Some(week) = weeks.week_of(row.season, row.date) else {
            continue;
        };
        if let Some(team) = &row.team1 {
            out.push(TeamResultRow {
                season: row.season,
                week,
                team: team.clone(),
                result: GameResult::from_points(row.points_team1, row.points_team2),
            });
        }
        if let Some(team) = &row.team2 {
            out.push(TeamResultRow {
                season: row.season,
                week,
                team: team.clone(),
                result: GameResult::from_points(row.points_team2, row.points_team1),
            });
        }
    }
    out
}
