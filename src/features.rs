use std::collections::HashMap;

use crate::reshape::{GameResult, TeamProbRow, TeamResultRow};
use crate::season_weeks::NormalizedPickRow;

/// A pick-distribution row enriched with probability, outcome and rank
/// features. Every enrichment field is nullable: unresolved teams and
/// unmatched join keys keep the row and leave the fields empty.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedPick {
    pub season: i32,
    pub week: u32,
    pub team: Option<String>,
    pub pick_pct: f64,
    pub elo_rating: Option<f64>,
    pub win_prob: Option<f64>,
    pub result: Option<GameResult>,
    pub rank_week: Option<u32>,
    pub rank_season: Option<u32>,
}

/// Left-join probability and result rows onto the pick table by
/// `(season, week, team)`, then compute both rank features.
///
/// The long tables are expected to hold at most one row per key (a team plays
/// at most once per week); on duplicates the first occurrence in input order
/// wins, so the output never depends on hash iteration order.
pub fn enrich_picks(
    picks: &[NormalizedPickRow],
    probs: &[TeamProbRow],
    results: &[TeamResultRow],
) -> Vec<EnrichedPick> {
    let mut prob_by_key: HashMap<(i32, u32, &str), &TeamProbRow> = HashMap::new();
    for row in probs {
        prob_by_key
            .entry((row.season, row.week, row.team.as_str()))
            .or_insert(row);
    }
    let mut result_by_key: HashMap<(i32, u32, &str), GameResult> = HashMap::new();
    for row in results {
        result_by_key
            .entry((row.season, row.week, row.team.as_str()))
            .or_insert(row.result);
    }

    let mut out: Vec<EnrichedPick> = picks
        .iter()
        .map(|pick| {
            let key = pick
                .team
                .as_deref()
                .map(|team| (pick.season, pick.week, team));
            let prob = key.and_then(|k| prob_by_key.get(&k).copied());
            EnrichedPick {
                season: pick.season,
                week: pick.week,
                team: pick.team.clone(),
                pick_pct: pick.pick_pct,
                elo_rating: prob.map(|p| p.elo_rating),
                win_prob: prob.map(|p| p.win_prob),
                result: key.and_then(|k| result_by_key.get(&k).copied()),
                rank_week: None,
                rank_season: None,
            }
        })
        .collect();

    assign_week_ranks(&mut out);
    assign_season_ranks(&mut out);
    out
}

/// Rank 1 = largest favorite of the week. Only rows with a known team and a
/// non-null probability participate; equal probabilities are ordered by team
/// code so reruns agree.
fn assign_week_ranks(rows: &mut [EnrichedPick]) {
    let mut partitions: HashMap<(i32, u32), Vec<(usize, f64, String)>> = HashMap::new();
    for (idx, row) in rows.iter().enumerate() {
        let (Some(prob), Some(team)) = (row.win_prob, row.team.as_ref()) else {
            continue;
        };
        partitions
            .entry((row.season, row.week))
            .or_default()
            .push((idx, prob, team.clone()));
    }

    for mut members in partitions.into_values() {
        members.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.2.cmp(&b.2)));
        for (rank, (idx, _, _)) in members.into_iter().enumerate() {
            rows[idx].rank_week = Some(rank as u32 + 1);
        }
    }
}

/// Rank 1 = strongest season-long team by mean win probability. The mean
/// skips null probabilities rather than zeroing them; a team with no non-null
/// observation in a season is left out entirely and keeps a null rank.
fn assign_season_ranks(rows: &mut [EnrichedPick]) {
    let mut sums: HashMap<(i32, String), (f64, u32)> = HashMap::new();
    for row in rows.iter() {
        let (Some(prob), Some(team)) = (row.win_prob, row.team.as_ref()) else {
            continue;
        };
        let entry = sums.entry((row.season, team.clone())).or_insert((0.0, 0));
        entry.0 += prob;
        entry.1 += 1;
    }

    let mut by_season: HashMap<i32, Vec<(String, f64)>> = HashMap::new();
    for ((season, team), (sum, count)) in sums {
        by_season
            .entry(season)
            .or_default()
            .push((team, sum / count as f64));
    }

    let mut rank_of: HashMap<i32, HashMap<String, u32>> = HashMap::new();
    for (season, mut means) in by_season {
        means.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let ranks = rank_of.entry(season).or_default();
        for (rank, (team, _)) in means.into_iter().enumerate() {
            ranks.insert(team, rank as u32 + 1);
        }
    }

    for row in rows.iter_mut() {
        let Some(team) = row.team.as_deref() else {
            continue;
        };
        row.rank_season = rank_of
            .get(&row.season)
            .and_then(|ranks| ranks.get(team))
            .copied();
    }
}
