use log::debug;

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::model::*;
use crate::stats::{linear_fit, mean};

/// Below this number of `(minutes, percent)` pairs, no trend is reported.
pub const MIN_TREND_POINTS: usize = 6;

/// Groups records by a key, keeping the groups in the order they first appear.
/// Records without a key are left out.
fn group_by<'a, F>(records: &'a [AuditRecord], key: F) -> Vec<(String, Vec<&'a AuditRecord>)>
where
    F: Fn(&AuditRecord) -> Option<&String>,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<&AuditRecord>)> = Vec::new();
    for r in records {
        if let Some(k) = key(r) {
            match positions.get(k) {
                Some(idx) => groups[*idx].1.push(r),
                None => {
                    positions.insert(k.clone(), groups.len());
                    groups.push((k.clone(), vec![r]));
                }
            }
        }
    }
    groups
}

fn percent_scores<'a, I>(records: I) -> Vec<f64>
where
    I: IntoIterator<Item = &'a AuditRecord>,
{
    records.into_iter().filter_map(|r| r.percent_score).collect()
}

pub fn team_summaries(records: &[AuditRecord]) -> Vec<TeamSummary> {
    let groups = group_by(records, |r| r.team.as_ref());
    debug!("team_summaries: {} teams", groups.len());
    groups
        .into_iter()
        .map(|(team, rs)| {
            let minutes: Vec<f64> = rs.iter().filter_map(|r| r.call_minutes).collect();
            TeamSummary {
                team,
                audit_count: rs.len(),
                score: ScoreStats::from_values(&percent_scores(rs.iter().copied())),
                mean_call_minutes: mean(&minutes),
            }
        })
        .collect()
}

/// Mean percent score per RM, best first. Records need both an RM name and a
/// score to take part. RMs with the same mean keep their order of appearance.
pub fn rm_ranking(records: &[AuditRecord]) -> RmRanking {
    let groups = group_by(records, |r| r.percent_score.and(r.rm_name.as_ref()));
    let mut entries: Vec<RmSummary> = groups
        .into_iter()
        .filter_map(|(rm_name, rs)| {
            let scores = percent_scores(rs.iter().copied());
            mean(&scores).map(|m| RmSummary {
                rm_name,
                audit_count: scores.len(),
                mean: m,
            })
        })
        .collect();
    entries.sort_by(|a, b| b.mean.partial_cmp(&a.mean).unwrap_or(Ordering::Equal));
    debug!("rm_ranking: {} RMs", entries.len());
    RmRanking { entries }
}

pub fn overall_stats(records: &[AuditRecord]) -> OverallStats {
    OverallStats {
        audit_count: records.len(),
        score: ScoreStats::from_values(&percent_scores(records)),
    }
}

/// The mean of each scoring parameter that has a column in the sheet.
/// Each parameter only looks at the records where it has a value.
pub fn parameter_averages(
    records: &[AuditRecord],
    parameters: &[ScoringParameter],
) -> Vec<ParameterAverage> {
    parameters
        .iter()
        .map(|p| {
            let values: Vec<f64> = records.iter().filter_map(|r| r.parameter(*p)).collect();
            ParameterAverage {
                parameter: *p,
                count: values.len(),
                mean: mean(&values),
            }
        })
        .collect()
}

/// Percent score against call minutes, when there are enough pairs to say something.
pub fn trend_fit(records: &[AuditRecord]) -> Option<TrendFit> {
    let points: Vec<(f64, f64)> = records
        .iter()
        .filter_map(|r| r.call_minutes.zip(r.percent_score))
        .collect();
    if points.len() < MIN_TREND_POINTS {
        debug!("trend_fit: only {} pairs, skipping", points.len());
        return None;
    }
    linear_fit(&points).map(|fit| TrendFit {
        slope: fit.slope,
        intercept: fit.intercept,
        r_squared: fit.r_squared,
        points: points.len(),
    })
}
