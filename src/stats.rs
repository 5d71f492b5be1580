use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Duration, NaiveDate};

use crate::models::{Alliance, ContributionRecord, PlayerWindowStats, Trend};
use crate::window::{average, in_range, WindowConfig, WINDOW_30D, WINDOW_3D, WINDOW_7D};

pub fn compute_stats(
    records: &[ContributionRecord],
    reference_date: NaiveDate,
) -> Vec<PlayerWindowStats> {
    let mut by_player: HashMap<(Alliance, &str), Vec<&ContributionRecord>> = HashMap::new();
    for record in records {
        by_player
            .entry((record.alliance_name, record.player_name.as_str()))
            .or_default()
            .push(record);
    }

    let mut out = Vec::with_capacity(by_player.len());
    for ((alliance_name, player_name), mut rows) in by_player {
        // Input order is not guaranteed sorted.
        rows.sort_by_key(|r| r.entry_date);

        let avg_cpd_3d = window_average(&rows, reference_date, &WINDOW_3D);
        let avg_cpd_7d = window_average(&rows, reference_date, &WINDOW_7D);
        let avg_cpd_30d = window_average(&rows, reference_date, &WINDOW_30D);

        // Previous 7d window ends one week before the reference date and does
        // not overlap the current one.
        let prev_end = reference_date - Duration::days(WINDOW_7D.days);
        let prev_avg = average(&cpd_in_window(&rows, prev_end, WINDOW_7D.days));

        out.push(PlayerWindowStats {
            player_name: player_name.to_string(),
            alliance_name,
            avg_cpd_3d,
            avg_cpd_7d,
            avg_cpd_30d,
            meets_3d: avg_cpd_3d >= WINDOW_3D.min_avg_cpd,
            meets_7d: avg_cpd_7d >= WINDOW_7D.min_avg_cpd,
            meets_30d: avg_cpd_30d >= WINDOW_30D.min_avg_cpd,
            trend_7d: classify_trend(avg_cpd_7d, prev_avg),
        });
    }
    out
}

pub fn unique_members_by_alliance(records: &[ContributionRecord]) -> BTreeMap<Alliance, usize> {
    let mut members: BTreeMap<Alliance, HashSet<&str>> = Alliance::ALL
        .iter()
        .map(|&alliance| (alliance, HashSet::new()))
        .collect();
    for record in records {
        if let Some(names) = members.get_mut(&record.alliance_name) {
            names.insert(record.player_name.as_str());
        }
    }
    members
        .into_iter()
        .map(|(alliance, names)| (alliance, names.len()))
        .collect()
}

fn cpd_in_window(rows: &[&ContributionRecord], end: NaiveDate, days: i64) -> Vec<f64> {
    rows.iter()
        .filter(|r| in_range(r.entry_date, end, days))
        .map(|r| r.contribution_per_day)
        .collect()
}

// Rounded once, after averaging.
fn window_average(rows: &[&ContributionRecord], end: NaiveDate, window: &WindowConfig) -> i64 {
    average(&cpd_in_window(rows, end, window.days)).round() as i64
}

fn classify_trend(current: i64, previous: f64) -> Trend {
    if current > 0 && previous > 0.0 {
        let delta = (current as f64 - previous) / previous * 100.0;
        if delta > 5.0 {
            Trend::Rising
        } else if delta < -5.0 {
            Trend::Dropping
        } else {
            Trend::Stable
        }
    } else if current > 0 {
        Trend::Rising
    } else if previous > 0.0 {
        Trend::Dropping
    } else {
        Trend::Stable
    }
}
