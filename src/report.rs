use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{Alliance, ContributionRecord};
use crate::overview;
use crate::risk;
use crate::stats;
use crate::views;

pub fn build_report(
    records: &[ContributionRecord],
    as_of: NaiveDate,
    alliance: Option<Alliance>,
) -> String {
    let player_stats = stats::compute_stats(records, as_of);
    let members = stats::unique_members_by_alliance(records);
    let overview_rows = overview::alliance_overview(records, as_of);
    let heatmap = views::heatmap_rows(&player_stats);
    let pipeline = views::pipeline(&player_stats);
    let risks = risk::demotion_risks(&player_stats);
    let candidates = risk::optimization_candidates(records, alliance);

    let focus: Vec<Alliance> = match alliance {
        Some(a) => vec![a],
        None => Alliance::ALL.to_vec(),
    };

    let mut output = String::new();
    let scope_label = alliance.map_or("all alliances".to_string(), |a| a.to_string());

    let _ = writeln!(output, "# Alliance Contribution Report");
    let _ = writeln!(output, "Generated for {} (windows ending {})", scope_label, as_of);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Alliance Overview");

    if overview_rows.is_empty() {
        let _ = writeln!(output, "No entries on the reference date.");
    } else {
        for row in overview_rows.iter() {
            let _ = writeln!(
                output,
                "- {}: {} players ({} online, {:.0}% active), {} flights, {:.0} contributed, MTD {:.0}, YTD {:.0}, growth {:+.1}%, engagement {:.1}",
                row.alliance_name,
                row.total_players,
                row.active_partners,
                row.activity_rate,
                row.total_flights,
                row.total_contributed,
                row.mtd_contributed,
                row.ytd_contributed,
                row.month_growth_contributed,
                row.engagement_score
            );
        }
    }

    let trend = overview::trend_points(records);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Contribution Trend");
    if trend.is_empty() {
        let _ = writeln!(output, "No entries in the slice.");
    } else {
        let start = trend.len().saturating_sub(7);
        for point in &trend[start..] {
            let parts: Vec<String> = point
                .totals
                .iter()
                .map(|(alliance, totals)| format!("{} {:.0}", alliance, totals.contributed))
                .collect();
            let _ = writeln!(output, "- {}: {}", point.date, parts.join(", "));
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Membership");
    for (alliance, count) in members.iter() {
        let _ = writeln!(output, "- {}: {} members", alliance, count);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Requirement Heatmap");
    for row in heatmap.iter() {
        let _ = writeln!(
            output,
            "- {}: 3d {}%, 7d {}%, 30d {}%",
            row.alliance, row.pct_3d, row.pct_7d, row.pct_30d
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Trend Mix");
    for &a in focus.iter() {
        let donut = views::donut(&player_stats, a);
        let _ = writeln!(
            output,
            "- {}: rising {}%, stable {}%, dropping {}%",
            a, donut.rising, donut.stable, donut.dropping
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Promotion Pipeline");
    for (alliance, counts) in pipeline.iter() {
        let _ = writeln!(
            output,
            "- {}: {} ready on 7d, {} ready on 30d",
            alliance, counts.ready_7d, counts.ready_30d
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top & Bottom Performers (7d average)");
    for &a in focus.iter() {
        let ranked = views::top_worst(&player_stats, a);
        if ranked.top5.is_empty() {
            let _ = writeln!(output, "- {}: no players in this window.", a);
            continue;
        }
        let top: Vec<String> = ranked
            .top5
            .iter()
            .map(|e| format!("{} ({})", e.name, e.value))
            .collect();
        let worst: Vec<String> = ranked
            .worst5
            .iter()
            .map(|e| format!("{} ({})", e.name, e.value))
            .collect();
        let _ = writeln!(output, "- {} top: {}", a, top.join(", "));
        let _ = writeln!(output, "- {} bottom: {}", a, worst.join(", "));
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Demotion Risks");
    if risks.is_empty() {
        let _ = writeln!(output, "No players below requirement thresholds.");
    } else {
        for entry in risks.iter() {
            let _ = writeln!(
                output,
                "- {} ({}): {}",
                entry.player_name,
                entry.alliance_name,
                entry.reason.as_str()
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Optimization Candidates");
    if candidates.is_empty() {
        let _ = writeln!(output, "No active players below the efficiency bar.");
    } else {
        for candidate in candidates.iter() {
            let _ = writeln!(
                output,
                "- {} ({}): {} per flight across {} flights",
                candidate.player_name,
                candidate.alliance_name,
                candidate.revenue_per_flight,
                candidate.flights
            );
        }
    }

    output
}
