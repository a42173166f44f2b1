use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};
use serde::Serialize;

use crate::features::EnrichedPick;
use crate::pipeline::PrepSummary;
use crate::survival::SurvivalRow;

const ENRICHED_HEADER: [&str; 9] = [
    "season",
    "week",
    "team",
    "pick_pct",
    "elo_rating",
    "win_prob",
    "result",
    "rank_week",
    "rank_season",
];

const SURVIVAL_HEADER: [&str; 4] = ["season", "week", "survive_pct", "remaining_pct"];

pub fn write_enriched_csv(path: &Path, rows: &[EnrichedPick]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    wtr.write_record(ENRICHED_HEADER)
        .context("write enriched picks header")?;
    for row in rows {
        wtr.write_record(enriched_row(row))
            .context("write enriched picks row")?;
    }
    wtr.flush().context("flush enriched picks csv")?;
    Ok(())
}

pub fn write_survival_csv(path: &Path, rows: &[SurvivalRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    wtr.write_record(SURVIVAL_HEADER)
        .context("write survival header")?;
    for row in rows {
        wtr.write_record(survival_row(row))
            .context("write survival row")?;
    }
    wtr.flush().context("flush survival csv")?;
    Ok(())
}

/// Both derived tables in one workbook, for eyeballing in a spreadsheet.
pub fn write_workbook(
    path: &Path,
    enriched: &[EnrichedPick],
    survival: &[SurvivalRow],
) -> Result<()> {
    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("EnrichedPicks")?;
        let mut table = vec![header_row(&ENRICHED_HEADER)];
        table.extend(enriched.iter().map(enriched_row));
        write_rows(sheet, &table)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Survival")?;
        let mut table = vec![header_row(&SURVIVAL_HEADER)];
        table.extend(survival.iter().map(survival_row));
        write_rows(sheet, &table)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
struct PrepReport<'a> {
    generated_at: String,
    summary: &'a PrepSummary,
}

pub fn write_report(path: &Path, summary: &PrepSummary) -> Result<()> {
    let report = PrepReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        summary,
    };
    let raw = serde_json::to_string_pretty(&report).context("serialize prep report")?;
    fs::write(path, raw).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn enriched_row(row: &EnrichedPick) -> Vec<String> {
    vec![
        row.season.to_string(),
        row.week.to_string(),
        row.team.clone().unwrap_or_default(),
        row.pick_pct.to_string(),
        opt_to_string(row.elo_rating),
        opt_to_string(row.win_prob),
        row.result.map(|r| r.code().to_string()).unwrap_or_default(),
        opt_to_string(row.rank_week),
        opt_to_string(row.rank_season),
    ]
}

fn survival_row(row: &SurvivalRow) -> Vec<String> {
    vec![
        row.season.to_string(),
        row.week.to_string(),
        opt_to_string(row.survive_pct),
        opt_to_string(row.remaining_pct),
    ]
}

fn header_row(header: &[&str]) -> Vec<String> {
    header.iter().map(|h| h.to_string()).collect()
}

fn opt_to_string<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reshape::GameResult;

    #[test]
    fn enriched_row_leaves_nulls_empty() {
        let row = EnrichedPick {
            season: 2012,
            week: 3,
            team: None,
            pick_pct: 0.25,
            elo_rating: None,
            win_prob: None,
            result: None,
            rank_week: None,
            rank_season: None,
        };
        let cells = enriched_row(&row);
        assert_eq!(cells[0], "2012");
        assert_eq!(cells[2], "");
        assert_eq!(cells[5], "");
        assert_eq!(cells[6], "");
    }

    #[test]
    fn enriched_row_formats_result_codes() {
        let row = EnrichedPick {
            season: 2012,
            week: 1,
            team: Some("GB".to_string()),
            pick_pct: 0.4,
            elo_rating: Some(1540.0),
            win_prob: Some(0.61),
            result: Some(GameResult::Win),
            rank_week: Some(1),
            rank_season: Some(2),
        };
        let cells = enriched_row(&row);
        assert_eq!(cells[2], "GB");
        assert_eq!(cells[6], "W");
        assert_eq!(cells[7], "1");
        assert_eq!(cells[8], "2");
    }
}
