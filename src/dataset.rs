use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::{Deserialize, Deserializer};

pub const DATE_FMT: &str = "%Y-%m-%d";
pub const DEFAULT_MIN_SEASON: i32 = 2010;

/// Knobs for a preparation run. Seasons earlier than `min_season` are dropped
/// from every time-series table before any derivation.
#[derive(Debug, Clone, Copy)]
pub struct PrepConfig {
    pub min_season: i32,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            min_season: DEFAULT_MIN_SEASON,
        }
    }
}

mod date_format {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer};

    use super::DATE_FMT;

    pub fn deserialize<'de, D>(d: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(d)?;
        NaiveDate::parse_from_str(s.trim(), DATE_FMT).map_err(serde::de::Error::custom)
    }
}

/// The pick-distribution source carries either a raw round number or a game
/// date, depending on how faithfully the season was scraped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekRef {
    Round(u32),
    Date(NaiveDate),
}

impl<'de> Deserialize<'de> for WeekRef {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(d)?;
        let s = raw.trim();
        if let Ok(week) = s.parse::<u32>() {
            return Ok(WeekRef::Round(week));
        }
        NaiveDate::parse_from_str(s, DATE_FMT)
            .map(WeekRef::Date)
            .map_err(|_| {
                serde::de::Error::custom(format!(
                    "expected a week number or {DATE_FMT} date, got `{s}`"
                ))
            })
    }
}

/// One matchup per row from the win-probability model; `prob_team1` and
/// `prob_team2` sum to 1.0 upstream and are not re-validated here.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EloRow {
    pub season: i32,
    #[serde(deserialize_with = "date_format::deserialize")]
    pub date: NaiveDate,
    pub team1: String,
    pub team2: String,
    pub elo_team1: f64,
    pub elo_team2: f64,
    pub prob_team1: f64,
    pub prob_team2: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PickRow {
    pub season: i32,
    pub week: WeekRef,
    pub team: String,
    pub pick_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GameRow {
    pub season: i32,
    #[serde(deserialize_with = "date_format::deserialize")]
    pub date: NaiveDate,
    pub team1: String,
    pub team2: String,
    pub points_team1: i32,
    pub points_team2: i32,
}

pub fn load_elo_table(path: &Path) -> Result<Vec<EloRow>> {
    read_table(
        path,
        "win probability",
        &[
            "season",
            "date",
            "team1",
            "team2",
            "elo_team1",
            "elo_team2",
            "prob_team1",
            "prob_team2",
        ],
    )
}

pub fn load_pick_table(path: &Path) -> Result<Vec<PickRow>> {
    read_table(
        path,
        "pick distribution",
        &["season", "week", "team", "pick_pct"],
    )
}

pub fn load_game_table(path: &Path) -> Result<Vec<GameRow>> {
    read_table(
        path,
        "game results",
        &[
            "season",
            "date",
            "team1",
            "team2",
            "points_team1",
            "points_team2",
        ],
    )
}

/// Decode a whole CSV snapshot up front. Structural problems (missing column,
/// unparseable cell) abort the run with the table named; there is no partial
/// recovery for a batch input.
pub(crate) fn read_table<T>(path: &Path, table: &str, required: &[&str]) -> Result<Vec<T>>
where
    T: serde::de::DeserializeOwned,
{
    let file = File::open(path)
        .with_context(|| format!("open {table} table at {}", path.display()))?;
    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = rdr
        .headers()
        .with_context(|| format!("read {table} table headers"))?
        .clone();
    for col in required {
        if !headers.iter().any(|h| h == *col) {
            return Err(anyhow!("{table} table is missing required column `{col}`"));
        }
    }

    let mut out = Vec::new();
    for (idx, record) in rdr.deserialize::<T>().enumerate() {
        // Header is line 1, so the first data row is line 2.
        let row = record.with_context(|| format!("decode {table} table line {}", idx + 2))?;
        out.push(row);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_ref_parses_round_and_date() {
        let raw = "season,week,team,pick_pct\n2012,3,NE,0.25\n2012,2012-09-09,GB,0.40\n";
        let mut rdr = csv::Reader::from_reader(raw.as_bytes());
        let rows: Vec<PickRow> = rdr
            .deserialize()
            .collect::<Result<_, _>>()
            .expect("both week forms should parse");

        assert_eq!(rows[0].week, WeekRef::Round(3));
        assert_eq!(
            rows[1].week,
            WeekRef::Date(NaiveDate::from_ymd_opt(2012, 9, 9).expect("valid date"))
        );
    }

    #[test]
    fn week_ref_rejects_garbage() {
        let raw = "season,week,team,pick_pct\n2012,wk3,NE,0.25\n";
        let mut rdr = csv::Reader::from_reader(raw.as_bytes());
        let parsed: Result<Vec<PickRow>, _> = rdr.deserialize().collect();
        assert!(parsed.is_err());
    }
}
