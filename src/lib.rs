//! Data preparation for historical survivor-pool pick analysis: masters team
//! names across inconsistent sources, derives season-relative weeks, joins
//! win-probability and outcome features onto weekly pick distributions, and
//! aggregates per-week survival statistics.

pub mod dataset;
pub mod export;
pub mod features;
pub mod pipeline;
pub mod reshape;
pub mod season_weeks;
pub mod survival;
pub mod team_lookup;
