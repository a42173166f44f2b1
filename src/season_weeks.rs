use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};

use crate::dataset::WeekRef;
use crate::team_lookup::CanonPickRow;

/// Round a game date to the nearest Sunday. Monday through Wednesday round
/// back, Thursday through Saturday round forward, so a Thursday opener lands
/// in the same anchor week as that weekend's Sunday and Monday games.
pub fn week_anchor(date: NaiveDate) -> NaiveDate {
    let back = date.weekday().num_days_from_sunday() as i64;
    if back <= 3 {
        date - Duration::days(back)
    } else {
        date + Duration::days(7 - back)
    }
}

/// Dense rank of distinct week anchors within each season: the earliest
/// anchor is week 1, same anchor means same week, no gaps. The ranking is
/// global per season, not per team.
#[derive(Debug, Clone, Default)]
pub struct WeekIndex {
    ranks: HashMap<(i32, NaiveDate), u32>,
}

impl WeekIndex {
    pub fn from_dates(dates: impl IntoIterator<Item = (i32, NaiveDate)>) -> Self {
        let mut per_season: HashMap<i32, Vec<NaiveDate>> = HashMap::new();
        for (season, date) in dates {
            per_season.entry(season).or_default().push(week_anchor(date));
        }

        let mut ranks = HashMap::new();
        for (season, mut anchors) in per_season {
            anchors.sort_unstable();
            anchors.dedup();
            for (idx, anchor) in anchors.into_iter().enumerate() {
                ranks.insert((season, anchor), idx as u32 + 1);
            }
        }
        Self { ranks }
    }

    pub fn week_of(&self, season: i32, date: NaiveDate) -> Option<u32> {
        self.ranks.get(&(season, week_anchor(date))).copied()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPickRow {
    pub season: i32,
    pub week: u32,
    pub team: Option<String>,
    pub pick_pct: f64,
}

/// Resolve the pick table's week-or-date column to a plain week number.
/// Rows that already carry a round number pass through; dated rows are
/// ranked against the other dated pick rows of their season.
pub fn normalize_pick_weeks(picks: &[CanonPickRow]) -> Vec<NormalizedPickRow> {
    let index = WeekIndex::from_dates(picks.iter().filter_map(|p| match p.week {
        WeekRef::Date(date) => Some((p.season, date)),
        WeekRef::Round(_) => None,
    }));

    picks
        .iter()
        .filter_map(|p| {
            let week = match p.week {
                WeekRef::Round(week) => week,
                WeekRef::Date(date) => index.week_of(p.season, date)?,
            };
            Some(NormalizedPickRow {
                season: p.season,
                week,
                team: p.team.clone(),
                pick_pct: p.pick_pct,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn anchor_rounds_to_nearest_sunday() {
        let sunday = date(2010, 9, 12);
        assert_eq!(week_anchor(sunday), sunday);
        // Monday night game belongs to the previous Sunday's slate.
        assert_eq!(week_anchor(date(2010, 9, 13)), sunday);
        // Thursday opener belongs to the upcoming Sunday's slate.
        assert_eq!(week_anchor(date(2010, 9, 9)), sunday);
        assert_eq!(week_anchor(date(2010, 9, 8)), date(2010, 9, 5));
    }

    #[test]
    fn weeks_are_dense_ranked_per_season() {
        let index = WeekIndex::from_dates([
            (2010, date(2010, 9, 19)),
            (2010, date(2010, 9, 9)),
            (2010, date(2010, 9, 12)),
            (2011, date(2011, 9, 11)),
        ]);

        assert_eq!(index.week_of(2010, date(2010, 9, 9)), Some(1));
        assert_eq!(index.week_of(2010, date(2010, 9, 13)), Some(1));
        assert_eq!(index.week_of(2010, date(2010, 9, 19)), Some(2));
        // Each season ranks independently.
        assert_eq!(index.week_of(2011, date(2011, 9, 11)), Some(1));
        assert_eq!(index.week_of(2011, date(2011, 9, 19)), None);
    }

    #[test]
    fn pick_weeks_pass_through_rounds_and_rank_dates() {
        let picks = vec![
            CanonPickRow {
                season: 2010,
                week: WeekRef::Round(4),
                team: Some("GB".to_string()),
                pick_pct: 0.3,
            },
            CanonPickRow {
                season: 2011,
                week: WeekRef::Date(date(2011, 9, 18)),
                team: Some("CHI".to_string()),
                pick_pct: 0.2,
            },
            CanonPickRow {
                season: 2011,
                week: WeekRef::Date(date(2011, 9, 11)),
                team: Some("GB".to_string()),
                pick_pct: 0.5,
            },
        ];

        let rows = normalize_pick_weeks(&picks);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].week, 4);
        assert_eq!(rows[1].week, 2);
        assert_eq!(rows[2].week, 1);
    }
}
