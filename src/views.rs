use std::collections::BTreeMap;

use crate::models::{Alliance, Donut, HeatmapRow, PipelineCounts, PlayerWindowStats, TopWorst, TopWorstEntry, Trend};

fn pct(count: usize, denominator: usize) -> i64 {
    // Denominator floored to 1 so an empty alliance reports 0, not NaN.
    let denominator = denominator.max(1);
    ((count as f64 / denominator as f64) * 100.0).round() as i64
}

pub fn heatmap_rows(stats: &[PlayerWindowStats]) -> Vec<HeatmapRow> {
    Alliance::ALL
        .iter()
        .map(|&alliance| {
            let members: Vec<&PlayerWindowStats> =
                stats.iter().filter(|s| s.alliance_name == alliance).collect();
            let n = members.len();
            HeatmapRow {
                alliance,
                pct_3d: pct(members.iter().filter(|s| s.meets_3d).count(), n),
                pct_7d: pct(members.iter().filter(|s| s.meets_7d).count(), n),
                pct_30d: pct(members.iter().filter(|s| s.meets_30d).count(), n),
            }
        })
        .collect()
}

pub fn donut(stats: &[PlayerWindowStats], alliance: Alliance) -> Donut {
    let members: Vec<&PlayerWindowStats> =
        stats.iter().filter(|s| s.alliance_name == alliance).collect();
    let n = members.len();
    let rising = pct(members.iter().filter(|s| s.trend_7d == Trend::Rising).count(), n);
    let stable = pct(members.iter().filter(|s| s.trend_7d == Trend::Stable).count(), n);
    // Dropping absorbs the rounding error so the three shares total exactly 100.
    Donut { rising, stable, dropping: 100 - rising - stable }
}

pub fn pipeline(stats: &[PlayerWindowStats]) -> BTreeMap<Alliance, PipelineCounts> {
    Alliance::ALL
        .iter()
        .map(|&alliance| {
            let members = stats.iter().filter(|s| s.alliance_name == alliance);
            let mut counts = PipelineCounts { ready_7d: 0, ready_30d: 0 };
            for member in members {
                if member.meets_7d {
                    counts.ready_7d += 1;
                }
                if member.meets_30d {
                    counts.ready_30d += 1;
                }
            }
            (alliance, counts)
        })
        .collect()
}

pub fn top_worst(stats: &[PlayerWindowStats], alliance: Alliance) -> TopWorst {
    let mut ranked: Vec<TopWorstEntry> = stats
        .iter()
        .filter(|s| s.alliance_name == alliance)
        .map(|s| TopWorstEntry { name: s.player_name.clone(), value: s.avg_cpd_7d })
        .collect();
    ranked.sort_by(|a, b| b.value.cmp(&a.value));

    let top5 = ranked.iter().take(5).cloned().collect();
    let worst5 = ranked.iter().rev().take(5).cloned().collect();
    TopWorst { top5, worst5 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(
        alliance: Alliance,
        player: &str,
        avg_7d: i64,
        meets: (bool, bool, bool),
        trend: Trend,
    ) -> PlayerWindowStats {
        PlayerWindowStats {
            player_name: player.to_string(),
            alliance_name: alliance,
            avg_cpd_3d: avg_7d,
            avg_cpd_7d: avg_7d,
            avg_cpd_30d: avg_7d,
            meets_3d: meets.0,
            meets_7d: meets.1,
            meets_30d: meets.2,
            trend_7d: trend,
        }
    }

    #[test]
    fn heatmap_covers_all_alliances_in_fixed_order() {
        let stats = vec![
            stat(Alliance::Codeshare, "ada", 700, (true, true, false), Trend::Stable),
            stat(Alliance::Codeshare, "bea", 400, (false, false, false), Trend::Stable),
        ];
        let rows = heatmap_rows(&stats);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].alliance, Alliance::Codeshare);
        assert_eq!(rows[0].pct_3d, 50);
        assert_eq!(rows[0].pct_7d, 50);
        assert_eq!(rows[0].pct_30d, 0);
    }

    #[test]
    fn heatmap_reports_zero_for_empty_alliance() {
        let rows = heatmap_rows(&[]);
        for row in rows {
            assert_eq!(row.pct_3d, 0);
            assert_eq!(row.pct_7d, 0);
            assert_eq!(row.pct_30d, 0);
        }
    }

    #[test]
    fn heatmap_rounds_to_nearest_percent() {
        let stats = vec![
            stat(Alliance::Exoshare, "ada", 700, (true, true, true), Trend::Stable),
            stat(Alliance::Exoshare, "bea", 700, (true, true, true), Trend::Stable),
            stat(Alliance::Exoshare, "cai", 400, (false, false, false), Trend::Stable),
        ];
        let rows = heatmap_rows(&stats);
        // 2 of 3 = 66.67 rounds to 67.
        assert_eq!(rows[1].pct_7d, 67);
    }

    #[test]
    fn donut_shares_always_total_one_hundred() {
        let stats = vec![
            stat(Alliance::Codeshare, "ada", 700, (true, true, true), Trend::Rising),
            stat(Alliance::Codeshare, "bea", 650, (true, true, true), Trend::Rising),
            stat(Alliance::Codeshare, "cai", 600, (true, true, true), Trend::Stable),
            stat(Alliance::Codeshare, "dev", 400, (false, false, false), Trend::Dropping),
            stat(Alliance::Codeshare, "eli", 300, (false, false, false), Trend::Dropping),
            stat(Alliance::Codeshare, "fay", 200, (false, false, false), Trend::Dropping),
        ];
        let donut = donut(&stats, Alliance::Codeshare);
        // 2/6 and 1/6 round to 33 and 17; dropping takes the remainder.
        assert_eq!(donut.rising, 33);
        assert_eq!(donut.stable, 17);
        assert_eq!(donut.dropping, 50);
        assert_eq!(donut.rising + donut.stable + donut.dropping, 100);
    }

    #[test]
    fn donut_of_empty_alliance_puts_everything_in_dropping() {
        let d = donut(&[], Alliance::Thermoshare);
        assert_eq!(d.rising, 0);
        assert_eq!(d.stable, 0);
        assert_eq!(d.dropping, 100);
    }

    #[test]
    fn pipeline_counts_ready_players_per_alliance() {
        let stats = vec![
            stat(Alliance::Codeshare, "ada", 700, (true, true, true), Trend::Stable),
            stat(Alliance::Codeshare, "bea", 650, (true, true, false), Trend::Stable),
            stat(Alliance::Exoshare, "cai", 400, (false, false, true), Trend::Stable),
        ];
        let counts = pipeline(&stats);
        assert_eq!(counts[&Alliance::Codeshare].ready_7d, 2);
        assert_eq!(counts[&Alliance::Codeshare].ready_30d, 1);
        assert_eq!(counts[&Alliance::Exoshare].ready_7d, 0);
        assert_eq!(counts[&Alliance::Exoshare].ready_30d, 1);
        assert_eq!(counts[&Alliance::Stratoshare].ready_7d, 0);
    }

    #[test]
    fn top_worst_orders_descending_and_reverses_worst() {
        let stats = vec![
            stat(Alliance::Codeshare, "ada", 700, (true, true, true), Trend::Stable),
            stat(Alliance::Codeshare, "bea", 400, (false, false, false), Trend::Stable),
            stat(Alliance::Codeshare, "cai", 600, (true, true, false), Trend::Stable),
        ];
        let ranked = top_worst(&stats, Alliance::Codeshare);

        let top: Vec<i64> = ranked.top5.iter().map(|e| e.value).collect();
        assert_eq!(top, vec![700, 600, 400]);
        // Single worst performer comes first.
        assert_eq!(ranked.worst5[0].value, 400);
        assert_eq!(ranked.worst5[0].name, "bea");
    }

    #[test]
    fn top_worst_returns_short_lists_unpadded() {
        let stats = vec![
            stat(Alliance::Stratoshare, "ada", 700, (true, true, true), Trend::Stable),
        ];
        let ranked = top_worst(&stats, Alliance::Stratoshare);
        assert_eq!(ranked.top5.len(), 1);
        assert_eq!(ranked.worst5.len(), 1);
    }

    #[test]
    fn top_worst_ignores_other_alliances() {
        let stats = vec![
            stat(Alliance::Codeshare, "ada", 700, (true, true, true), Trend::Stable),
            stat(Alliance::Exoshare, "bea", 900, (true, true, true), Trend::Stable),
        ];
        let ranked = top_worst(&stats, Alliance::Codeshare);
        assert_eq!(ranked.top5.len(), 1);
        assert_eq!(ranked.top5[0].name, "ada");
    }
}
