use std::path::PathBuf;

use anyhow::{Context, Result};

use survivor_prep::dataset::{self, PrepConfig};
use survivor_prep::export;
use survivor_prep::pipeline::{self, PrepInputs};
use survivor_prep::team_lookup;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let teams_path =
        parse_path_arg("--teams").unwrap_or_else(|| PathBuf::from("data/team_lookup.csv"));
    let probs_path =
        parse_path_arg("--probs").unwrap_or_else(|| PathBuf::from("data/win_probabilities.csv"));
    let picks_path =
        parse_path_arg("--picks").unwrap_or_else(|| PathBuf::from("data/pick_distribution.csv"));
    let games_path =
        parse_path_arg("--games").unwrap_or_else(|| PathBuf::from("data/game_results.csv"));
    let out_dir = parse_path_arg("--out-dir").unwrap_or_else(|| PathBuf::from("out"));
    let min_season = parse_min_season_arg()
        .or_else(min_season_from_env)
        .unwrap_or(dataset::DEFAULT_MIN_SEASON);
    let with_workbook = has_flag("--xlsx");

    let inputs = PrepInputs {
        lookup: team_lookup::load_team_lookup(&teams_path)?,
        elo: dataset::load_elo_table(&probs_path)?,
        picks: dataset::load_pick_table(&picks_path)?,
        games: dataset::load_game_table(&games_path)?,
    };

    let output = pipeline::run_prep(&inputs, PrepConfig { min_season });

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("create output dir {}", out_dir.display()))?;
    export::write_enriched_csv(&out_dir.join("enriched_picks.csv"), &output.enriched)?;
    export::write_survival_csv(&out_dir.join("survival.csv"), &output.survival)?;
    export::write_report(&out_dir.join("prep_report.json"), &output.summary)?;
    if with_workbook {
        export::write_workbook(
            &out_dir.join("survivor_prep.xlsx"),
            &output.enriched,
            &output.survival,
        )?;
    }

    let summary = &output.summary;
    println!("Survivor prep complete");
    println!("Out: {}", out_dir.display());
    println!("Min season: {}", summary.min_season);
    println!(
        "Input rows: probs={} picks={} games={}",
        summary.elo_rows, summary.pick_rows, summary.game_rows
    );
    println!(
        "Unresolved team names: probs={} picks={} games={}",
        summary.unresolved_elo, summary.unresolved_picks, summary.unresolved_games
    );
    println!(
        "Derived rows: enriched={} survival={}",
        summary.enriched_rows, summary.survival_rows
    );
    for season in &summary.seasons {
        let Some(last) = output
            .survival
            .iter()
            .filter(|r| r.season == *season && r.week > 0)
            .next_back()
        else {
            continue;
        };
        println!(
            "season {}: {} weeks, final remaining {}",
            season,
            last.week,
            last.remaining_pct
                .map(|v| format!("{v:.4}"))
                .unwrap_or_else(|| "n/a".to_string())
        );
    }

    Ok(())
}

fn parse_path_arg(name: &str) -> Option<PathBuf> {
    let prefix = format!("{name}=");
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix(&prefix) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(PathBuf::from(next));
        }
    }
    None
}

fn parse_min_season_arg() -> Option<i32> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix("--min-season=") {
            if let Ok(season) = raw.trim().parse::<i32>() {
                return Some(season);
            }
        }
        if arg == "--min-season"
            && let Some(next) = args.get(idx + 1)
            && let Ok(season) = next.trim().parse::<i32>()
        {
            return Some(season);
        }
    }
    None
}

fn min_season_from_env() -> Option<i32> {
    std::env::var("APP_MIN_SEASON")
        .ok()
        .and_then(|raw| raw.trim().parse::<i32>().ok())
}

fn has_flag(flag: &str) -> bool {
    std::env::args().skip(1).any(|a| a == flag)
}
