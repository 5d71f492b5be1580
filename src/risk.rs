use std::collections::HashMap;

use crate::models::{
    Alliance, ContributionRecord, DemotionRiskEntry, OptimizationCandidate, PlayerWindowStats,
    RiskReason,
};

// Activity floor: players with fewer flights in the slice carry too little
// signal to rank on efficiency.
pub const MIN_FLIGHTS_FOR_RANKING: u32 = 150;
pub const CANDIDATE_LIMIT: usize = 20;

pub fn demotion_risks(stats: &[PlayerWindowStats]) -> Vec<DemotionRiskEntry> {
    let mut risks: Vec<DemotionRiskEntry> = stats
        .iter()
        .filter_map(|s| {
            let reason = match (!s.meets_7d, !s.meets_30d) {
                (true, true) => RiskReason::Both,
                (false, true) => RiskReason::Below30d,
                (true, false) => RiskReason::Below7d,
                (false, false) => return None,
            };
            Some(DemotionRiskEntry {
                player_name: s.player_name.clone(),
                alliance_name: s.alliance_name,
                reason,
            })
        })
        .collect();

    // Most severe first, then alphabetical for operator triage.
    risks.sort_by(|a, b| {
        a.reason
            .cmp(&b.reason)
            .then_with(|| a.alliance_name.as_str().cmp(b.alliance_name.as_str()))
            .then_with(|| a.player_name.cmp(&b.player_name))
    });
    risks
}

pub fn optimization_candidates(
    records: &[ContributionRecord],
    alliance: Option<Alliance>,
) -> Vec<OptimizationCandidate> {
    let mut totals: HashMap<(Alliance, &str), (u32, f64)> = HashMap::new();
    for record in records {
        if let Some(scope) = alliance {
            if record.alliance_name != scope {
                continue;
            }
        }
        let entry = totals
            .entry((record.alliance_name, record.player_name.as_str()))
            .or_insert((0, 0.0));
        entry.0 += record.flights;
        entry.1 += record.contributed;
    }

    let mut candidates: Vec<OptimizationCandidate> = totals
        .into_iter()
        .map(|((alliance_name, player_name), (flights, contributed))| {
            let revenue_per_flight = if flights > 0 {
                (contributed / flights as f64).round() as i64
            } else {
                0
            };
            OptimizationCandidate {
                player_name: player_name.to_string(),
                alliance_name,
                flights,
                contributed,
                revenue_per_flight,
            }
        })
        .filter(|candidate| candidate.flights >= MIN_FLIGHTS_FOR_RANKING)
        .collect();

    // Worst efficiency first; alliance/player break ties deterministically.
    candidates.sort_by(|a, b| {
        a.revenue_per_flight
            .cmp(&b.revenue_per_flight)
            .then_with(|| a.alliance_name.as_str().cmp(b.alliance_name.as_str()))
            .then_with(|| a.player_name.cmp(&b.player_name))
    });
    candidates.truncate(CANDIDATE_LIMIT);
    candidates
}
