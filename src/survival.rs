use std::collections::HashMap;

use crate::features::EnrichedPick;
use crate::reshape::GameResult;

#[derive(Debug, Clone, PartialEq)]
pub struct SurvivalRow {
    pub season: i32,
    pub week: u32,
    pub survive_pct: Option<f64>,
    pub remaining_pct: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default)]
struct WeekMass {
    winning: f64,
    // Whether any pick in the partition has outcome data at all. Without it
    // the week's survival is undefined, which is different from 0.0 (results
    // known, nothing survived).
    observed: bool,
}

/// Per (season, week): the pick mass whose team won, and the running product
/// of that mass from the season start. An undefined week poisons the running
/// product for the rest of its season; it is never treated as 1.0. Each
/// season gets an explicit week-0 anchor at full strength, and the output is
/// sorted by (season, week).
pub fn survival_table(picks: &[EnrichedPick]) -> Vec<SurvivalRow> {
    let mut mass: HashMap<(i32, u32), WeekMass> = HashMap::new();
    for row in picks {
        let entry = mass.entry((row.season, row.week)).or_default();
        if let Some(result) = row.result {
            entry.observed = true;
            if result == GameResult::Win {
                entry.winning += row.pick_pct;
            }
        }
    }

    let mut weeks_by_season: HashMap<i32, Vec<u32>> = HashMap::new();
    for (season, week) in mass.keys() {
        weeks_by_season.entry(*season).or_default().push(*week);
    }
    let mut seasons: Vec<i32> = weeks_by_season.keys().copied().collect();
    seasons.sort_unstable();

    let mut out = Vec::new();
    for season in seasons {
        let mut weeks = weeks_by_season.remove(&season).unwrap_or_default();
        weeks.sort_unstable();

        // The pool at full strength before the first round.
        out.push(SurvivalRow {
            season,
            week: 0,
            survive_pct: None,
            remaining_pct: Some(1.0),
        });

        let mut remaining = Some(1.0_f64);
        for week in weeks {
            let survive = mass
                .get(&(season, week))
                .and_then(|m| m.observed.then_some(m.winning));
            remaining = match (remaining, survive) {
                (Some(r), Some(s)) => Some(r * s),
                _ => None,
            };
            out.push(SurvivalRow {
                season,
                week,
                survive_pct: survive,
                remaining_pct: remaining,
            });
        }
    }
    out
}
