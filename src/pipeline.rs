use serde::Serialize;

use crate::dataset::{EloRow, GameRow, PickRow, PrepConfig};
use crate::features::{self, EnrichedPick};
use crate::reshape;
use crate::season_weeks::{self, WeekIndex};
use crate::survival::{self, SurvivalRow};
use crate::team_lookup::{self, TeamLookup, TeamLookupRow};

/// The four input snapshots, loaded once before any derivation.
#[derive(Debug, Clone)]
pub struct PrepInputs {
    pub lookup: Vec<TeamLookupRow>,
    pub elo: Vec<EloRow>,
    pub picks: Vec<PickRow>,
    pub games: Vec<GameRow>,
}

/// Row and soft-failure counts for the run report. Unresolved names and
/// unmatched joins never abort a run; these counts are the only place they
/// become visible.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PrepSummary {
    pub min_season: i32,
    pub elo_rows: usize,
    pub pick_rows: usize,
    pub game_rows: usize,
    pub unresolved_elo: usize,
    pub unresolved_picks: usize,
    pub unresolved_games: usize,
    pub seasons: Vec<i32>,
    pub enriched_rows: usize,
    pub survival_rows: usize,
}

#[derive(Debug, Clone)]
pub struct PrepOutput {
    pub enriched: Vec<EnrichedPick>,
    pub survival: Vec<SurvivalRow>,
    pub summary: PrepSummary,
}

/// Run the whole preparation pipeline in its fixed dependency order:
/// season filter, identity resolution, week normalization, reshaping,
/// feature joins and ranks, survival aggregation. Pure function of its
/// inputs; the same snapshot always yields identical tables.
pub fn run_prep(inputs: &PrepInputs, cfg: PrepConfig) -> PrepOutput {
    let elo: Vec<EloRow> = inputs
        .elo
        .iter()
        .filter(|r| r.season >= cfg.min_season)
        .cloned()
        .collect();
    let picks: Vec<PickRow> = inputs
        .picks
        .iter()
        .filter(|r| r.season >= cfg.min_season)
        .cloned()
        .collect();
    let games: Vec<GameRow> = inputs
        .games
        .iter()
        .filter(|r| r.season >= cfg.min_season)
        .cloned()
        .collect();

    let lookup = TeamLookup::from_rows(&inputs.lookup);
    let canon_elo = team_lookup::canonicalize_elo(&elo, &lookup);
    let canon_picks = team_lookup::canonicalize_picks(&picks, &lookup);
    let canon_games = team_lookup::canonicalize_games(&games, &lookup);

    let elo_weeks = WeekIndex::from_dates(canon_elo.rows.iter().map(|r| (r.season, r.date)));
    let game_weeks = WeekIndex::from_dates(canon_games.rows.iter().map(|r| (r.season, r.date)));
    let normalized_picks = season_weeks::normalize_pick_weeks(&canon_picks.rows);

    let team_probs = reshape::matchup_probs_to_team_rows(&canon_elo.rows, &elo_weeks);
    let team_results = reshape::game_rows_to_team_results(&canon_games.rows, &game_weeks);

    let enriched = features::enrich_picks(&normalized_picks, &team_probs, &team_results);
    let survival = survival::survival_table(&enriched);

    let mut seasons: Vec<i32> = enriched.iter().map(|r| r.season).collect();
    seasons.sort_unstable();
    seasons.dedup();

    let summary = PrepSummary {
        min_season: cfg.min_season,
        elo_rows: elo.len(),
        pick_rows: picks.len(),
        game_rows: games.len(),
        unresolved_elo: canon_elo.unresolved,
        unresolved_picks: canon_picks.unresolved,
        unresolved_games: canon_games.unresolved,
        seasons,
        enriched_rows: enriched.len(),
        survival_rows: survival.len(),
    };

    PrepOutput {
        enriched,
        survival,
        summary,
    }
}
