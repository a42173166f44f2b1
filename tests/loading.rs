use std::path::PathBuf;

use survivor_prep::dataset::{self, WeekRef};
use survivor_prep::team_lookup;

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

#[test]
fn loaders_accept_well_formed_tables() {
    let lookup = team_lookup::load_team_lookup(&fixture_path("team_lookup.csv"))
        .expect("lookup fixture should load");
    assert_eq!(lookup.len(), 5);

    let elo = dataset::load_elo_table(&fixture_path("win_probabilities.csv"))
        .expect("probability fixture should load");
    assert_eq!(elo.len(), 5);
    assert_eq!(elo[1].team2, "Chicago Bears");
    assert_eq!(elo[1].prob_team1, 0.64);

    let games = dataset::load_game_table(&fixture_path("game_results.csv"))
        .expect("game fixture should load");
    assert_eq!(games.len(), 5);
    assert_eq!(games[1].points_team1, 24);
}

#[test]
fn pick_loader_handles_week_numbers_and_dates() {
    let picks = dataset::load_pick_table(&fixture_path("pick_distribution.csv"))
        .expect("round-numbered pick fixture should load");
    assert_eq!(picks[1].week, WeekRef::Round(1));

    let dated = dataset::load_pick_table(&fixture_path("pick_distribution_dated.csv"))
        .expect("dated pick fixture should load");
    assert!(matches!(dated[0].week, WeekRef::Date(_)));
}

#[test]
fn missing_column_fails_naming_table_and_column() {
    let err = dataset::load_pick_table(&fixture_path("pick_distribution_missing_col.csv"))
        .expect_err("a table without pick_pct must be rejected");
    let message = format!("{err:#}");
    assert!(message.contains("pick distribution"), "got: {message}");
    assert!(message.contains("pick_pct"), "got: {message}");
}

#[test]
fn unparseable_date_fails_with_line_context() {
    let err = dataset::load_game_table(&fixture_path("game_results_bad_date.csv"))
        .expect_err("a bad date must abort the load");
    let message = format!("{err:#}");
    assert!(message.contains("game results"), "got: {message}");
    assert!(message.contains("line 2"), "got: {message}");
}

#[test]
fn missing_file_reports_the_table_and_path() {
    let err = dataset::load_elo_table(&fixture_path("no_such_file.csv"))
        .expect_err("missing file must fail");
    let message = format!("{err:#}");
    assert!(message.contains("win probability"), "got: {message}");
    assert!(message.contains("no_such_file.csv"), "got: {message}");
}
