use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alliance {
    Codeshare,
    Exoshare,
    Thermoshare,
    Stratoshare,
}

impl Alliance {
    pub const ALL: [Alliance; 4] = [
        Alliance::Codeshare,
        Alliance::Exoshare,
        Alliance::Thermoshare,
        Alliance::Stratoshare,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Alliance::Codeshare => "codeshare",
            Alliance::Exoshare => "exoshare",
            Alliance::Thermoshare => "thermoshare",
            Alliance::Stratoshare => "stratoshare",
        }
    }
}

impl fmt::Display for Alliance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Alliance {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "codeshare" => Ok(Alliance::Codeshare),
            "exoshare" => Ok(Alliance::Exoshare),
            "thermoshare" => Ok(Alliance::Thermoshare),
            "stratoshare" => Ok(Alliance::Stratoshare),
            other => bail!("unknown alliance: {other}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionRecord {
    pub entry_date: NaiveDate,
    pub player_name: String,
    pub alliance_name: Alliance,
    pub contributed: f64,
    pub contribution_per_day: f64,
    pub flights: u32,
    pub share: f64,
    pub joined: NaiveDate,
    pub online: bool,
    pub ytd_average: f64,
    pub season: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Stable,
    Dropping,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Rising => "rising",
            Trend::Stable => "stable",
            Trend::Dropping => "dropping",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerWindowStats {
    pub player_name: String,
    pub alliance_name: Alliance,
    pub avg_cpd_3d: i64,
    pub avg_cpd_7d: i64,
    pub avg_cpd_30d: i64,
    pub meets_3d: bool,
    pub meets_7d: bool,
    pub meets_30d: bool,
    pub trend_7d: Trend,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeatmapRow {
    pub alliance: Alliance,
    pub pct_3d: i64,
    pub pct_7d: i64,
    pub pct_30d: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Donut {
    pub rising: i64,
    pub stable: i64,
    pub dropping: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineCounts {
    pub ready_7d: usize,
    pub ready_30d: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopWorstEntry {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopWorst {
    pub top5: Vec<TopWorstEntry>,
    pub worst5: Vec<TopWorstEntry>,
}

// Ordering doubles as severity rank: both thresholds missed is worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskReason {
    #[serde(rename = "both")]
    Both,
    #[serde(rename = "below_30d")]
    Below30d,
    #[serde(rename = "below_7d")]
    Below7d,
}

impl RiskReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskReason::Both => "both",
            RiskReason::Below30d => "below_30d",
            RiskReason::Below7d => "below_7d",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DemotionRiskEntry {
    pub player_name: String,
    pub alliance_name: Alliance,
    pub reason: RiskReason,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizationCandidate {
    pub player_name: String,
    pub alliance_name: Alliance,
    pub flights: u32,
    pub contributed: f64,
    pub revenue_per_flight: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AllianceOverview {
    pub alliance_name: Alliance,
    pub total_players: usize,
    pub total_flights: u32,
    pub total_contributed: f64,
    pub active_partners: usize,
    pub activity_rate: f64,
    pub avg_share: f64,
    pub avg_ytd: f64,
    pub new_joins: usize,
    pub mtd_contributed: f64,
    pub ytd_contributed: f64,
    pub month_growth_contributed: f64,
    pub engagement_score: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct DayTotals {
    pub contributed: f64,
    pub flights: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub totals: std::collections::BTreeMap<Alliance, DayTotals>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alliance_parses_known_keys() {
        assert_eq!("codeshare".parse::<Alliance>().unwrap(), Alliance::Codeshare);
        assert_eq!("stratoshare".parse::<Alliance>().unwrap(), Alliance::Stratoshare);
    }

    #[test]
    fn alliance_rejects_unknown_key() {
        let err = "megashare".parse::<Alliance>().unwrap_err();
        assert!(err.to_string().contains("unknown alliance"));
    }

    #[test]
    fn risk_reason_orders_by_severity() {
        assert!(RiskReason::Both < RiskReason::Below30d);
        assert!(RiskReason::Below30d < RiskReason::Below7d);
    }
}
