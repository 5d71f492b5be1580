use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::models::{Alliance, AllianceOverview, ContributionRecord, DayTotals, TrendPoint};

pub fn alliance_overview(
    records: &[ContributionRecord],
    as_of: NaiveDate,
) -> Vec<AllianceOverview> {
    let (prev_year, prev_month) = previous_month(as_of);

    Alliance::ALL
        .iter()
        .filter_map(|&alliance| {
            let day_entries: Vec<&ContributionRecord> = records
                .iter()
                .filter(|r| r.alliance_name == alliance && r.entry_date == as_of)
                .collect();
            if day_entries.is_empty() {
                return None;
            }

            let total_players = day_entries.len();
            let total_flights = day_entries.iter().map(|r| r.flights).sum();
            let total_contributed: f64 = day_entries.iter().map(|r| r.contributed).sum();
            let active_partners = day_entries.iter().filter(|r| r.online).count();
            let avg_share =
                day_entries.iter().map(|r| r.share).sum::<f64>() / total_players as f64;
            let avg_ytd =
                day_entries.iter().map(|r| r.ytd_average).sum::<f64>() / total_players as f64;
            let activity_rate = active_partners as f64 / total_players as f64 * 100.0;

            let new_joins = day_entries
                .iter()
                .filter(|r| r.joined.year() == as_of.year() && r.joined.month() == as_of.month())
                .count();

            let mtd_contributed = contributed_in_month(records, alliance, as_of.year(), as_of.month());
            let ytd_contributed: f64 = records
                .iter()
                .filter(|r| r.alliance_name == alliance && r.entry_date.year() == as_of.year())
                .map(|r| r.contributed)
                .sum();

            let prev_month_contributed =
                contributed_in_month(records, alliance, prev_year, prev_month);
            let month_growth_contributed = if prev_month_contributed > 0.0 {
                (mtd_contributed - prev_month_contributed) / prev_month_contributed * 100.0
            } else {
                0.0
            };

            let engagement_score = avg_ytd / 300.0 * 100.0 + activity_rate * 0.2;

            Some(AllianceOverview {
                alliance_name: alliance,
                total_players,
                total_flights,
                total_contributed,
                active_partners,
                activity_rate,
                avg_share,
                avg_ytd,
                new_joins,
                mtd_contributed,
                ytd_contributed,
                month_growth_contributed,
                engagement_score,
            })
        })
        .collect()
}

pub fn trend_points(records: &[ContributionRecord]) -> Vec<TrendPoint> {
    let mut by_date: BTreeMap<NaiveDate, BTreeMap<Alliance, DayTotals>> = BTreeMap::new();
    for record in records {
        let totals = by_date
            .entry(record.entry_date)
            .or_default()
            .entry(record.alliance_name)
            .or_default();
        totals.contributed += record.contributed;
        totals.flights += record.flights;
    }
    by_date
        .into_iter()
        .map(|(date, totals)| TrendPoint { date, totals })
        .collect()
}

fn contributed_in_month(
    records: &[ContributionRecord],
    alliance: Alliance,
    year: i32,
    month: u32,
) -> f64 {
    records
        .iter()
        .filter(|r| {
            r.alliance_name == alliance
                && r.entry_date.year() == year
                && r.entry_date.month() == month
        })
        .map(|r| r.contributed)
        .sum()
}

fn previous_month(date: NaiveDate) -> (i32, u32) {
    if date.month() == 1 {
        (date.year() - 1, 12)
    } else {
        (date.year(), date.month() - 1)
    }
}
