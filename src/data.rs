use std::io::Read;
use std::path::Path;

use anyhow::Context;
use chrono::{Duration, NaiveDate};

use crate::models::{Alliance, ContributionRecord};

pub fn load_csv(path: &Path) -> anyhow::Result<Vec<ContributionRecord>> {
    let reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    read_records(reader).with_context(|| format!("failed to read {}", path.display()))
}

fn read_records<R: Read>(mut reader: csv::Reader<R>) -> anyhow::Result<Vec<ContributionRecord>> {
    let mut records = Vec::new();
    for result in reader.deserialize::<ContributionRecord>() {
        records.push(result?);
    }
    Ok(records)
}

// The data source supplies "today" as the latest entry date present.
pub fn latest_entry_date(records: &[ContributionRecord]) -> Option<NaiveDate> {
    records.iter().map(|r| r.entry_date).max()
}

const SAMPLE_DAYS: i64 = 37;

struct SamplePlayer {
    alliance: Alliance,
    name: &'static str,
    base_cpd: f64,
    drift_per_day: f64,
    flights_per_day: u32,
    share: f64,
    joined: (i32, u32, u32),
    online: bool,
    ytd_average: f64,
}

// Deterministic stand-in for a live feed: one entry per player per day for
// the trailing SAMPLE_DAYS, ending 2025-09-02.
pub fn sample_records() -> anyhow::Result<Vec<ContributionRecord>> {
    let players = [
        SamplePlayer {
            alliance: Alliance::Codeshare,
            name: "Skyhawk",
            base_cpd: 640.0,
            drift_per_day: 1.5,
            flights_per_day: 28,
            share: 2.1,
            joined: (2024, 11, 3),
            online: true,
            ytd_average: 310.0,
        },
        SamplePlayer {
            alliance: Alliance::Codeshare,
            name: "Tailwind",
            base_cpd: 580.0,
            drift_per_day: -3.0,
            flights_per_day: 22,
            share: 1.6,
            joined: (2025, 2, 18),
            online: true,
            ytd_average: 260.0,
        },
        SamplePlayer {
            alliance: Alliance::Codeshare,
            name: "Nimbus",
            base_cpd: 470.0,
            drift_per_day: 0.0,
            flights_per_day: 3,
            share: 0.7,
            joined: (2025, 9, 1),
            online: false,
            ytd_average: 120.0,
        },
        SamplePlayer {
            alliance: Alliance::Exoshare,
            name: "Redline",
            base_cpd: 700.0,
            drift_per_day: 0.5,
            flights_per_day: 34,
            share: 2.8,
            joined: (2024, 7, 21),
            online: true,
            ytd_average: 340.0,
        },
        SamplePlayer {
            alliance: Alliance::Exoshare,
            name: "Vapor",
            base_cpd: 530.0,
            drift_per_day: 2.5,
            flights_per_day: 18,
            share: 1.3,
            joined: (2025, 5, 9),
            online: true,
            ytd_average: 230.0,
        },
        SamplePlayer {
            alliance: Alliance::Exoshare,
            name: "Glide",
            base_cpd: 610.0,
            drift_per_day: -5.0,
            flights_per_day: 26,
            share: 1.9,
            joined: (2025, 1, 2),
            online: false,
            ytd_average: 280.0,
        },
        SamplePlayer {
            alliance: Alliance::Thermoshare,
            name: "Updraft",
            base_cpd: 660.0,
            drift_per_day: 0.0,
            flights_per_day: 30,
            share: 2.4,
            joined: (2024, 10, 12),
            online: true,
            ytd_average: 320.0,
        },
        SamplePlayer {
            alliance: Alliance::Thermoshare,
            name: "Convect",
            base_cpd: 420.0,
            drift_per_day: 1.0,
            flights_per_day: 15,
            share: 0.9,
            joined: (2025, 8, 30),
            online: true,
            ytd_average: 150.0,
        },
        SamplePlayer {
            alliance: Alliance::Stratoshare,
            name: "Jetstream",
            base_cpd: 690.0,
            drift_per_day: -1.0,
            flights_per_day: 32,
            share: 2.6,
            joined: (2024, 9, 5),
            online: true,
            ytd_average: 330.0,
        },
        SamplePlayer {
            alliance: Alliance::Stratoshare,
            name: "Overcast",
            base_cpd: 510.0,
            drift_per_day: -2.0,
            flights_per_day: 20,
            share: 1.1,
            joined: (2025, 6, 14),
            online: false,
            ytd_average: 190.0,
        },
    ];

    let end = NaiveDate::from_ymd_opt(2025, 9, 2).context("invalid date")?;
    let start = end - Duration::days(SAMPLE_DAYS - 1);

    let mut records = Vec::with_capacity(players.len() * SAMPLE_DAYS as usize);
    for player in &players {
        let (jy, jm, jd) = player.joined;
        let joined = NaiveDate::from_ymd_opt(jy, jm, jd).context("invalid date")?;
        for offset in 0..SAMPLE_DAYS {
            let entry_date = start + Duration::days(offset);
            // Small deterministic wobble so no two days look identical.
            let wobble = ((offset * 7 + player.name.len() as i64) % 5 - 2) as f64 * 6.0;
            let cpd = (player.base_cpd + player.drift_per_day * offset as f64 + wobble).max(0.0);
            records.push(ContributionRecord {
                entry_date,
                player_name: player.name.to_string(),
                alliance_name: player.alliance,
                contributed: cpd,
                contribution_per_day: cpd,
                flights: player.flights_per_day,
                share: player.share,
                joined,
                online: player.online,
                ytd_average: player.ytd_average,
                season: "S9".to_string(),
            });
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_covers_all_alliances_daily() {
        let records = sample_records().unwrap();
        for alliance in Alliance::ALL {
            assert!(records.iter().any(|r| r.alliance_name == alliance));
        }
        assert_eq!(records.len() % SAMPLE_DAYS as usize, 0);
    }

    #[test]
    fn sample_ends_on_the_fixed_reference_date() {
        let records = sample_records().unwrap();
        let expected = NaiveDate::from_ymd_opt(2025, 9, 2).unwrap();
        assert_eq!(latest_entry_date(&records), Some(expected));
    }

    #[test]
    fn latest_entry_date_of_empty_slice_is_none() {
        assert_eq!(latest_entry_date(&[]), None);
    }

    #[test]
    fn csv_rows_deserialize_into_records() {
        let csv = "\
entry_date,player_name,alliance_name,contributed,contribution_per_day,flights,share,joined,online,ytd_average,season
2025-09-02,Skyhawk,codeshare,640.5,640.5,28,2.1,2024-11-03,true,310.0,S9
";
        let reader = csv::Reader::from_reader(csv.as_bytes());
        let records = read_records(reader).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].alliance_name, Alliance::Codeshare);
        assert_eq!(records[0].entry_date, NaiveDate::from_ymd_opt(2025, 9, 2).unwrap());
        assert!(records[0].online);
    }

    #[test]
    fn unknown_alliance_key_fails_fast() {
        let csv = "\
entry_date,player_name,alliance_name,contributed,contribution_per_day,flights,share,joined,online,ytd_average,season
2025-09-02,Skyhawk,megashare,640.5,640.5,28,2.1,2024-11-03,true,310.0,S9
";
        let reader = csv::Reader::from_reader(csv.as_bytes());
        assert!(read_records(reader).is_err());
    }

    #[test]
    fn malformed_date_fails_fast() {
        let csv = "\
entry_date,player_name,alliance_name,contributed,contribution_per_day,flights,share,joined,online,ytd_average,season
2025-99-99,Skyhawk,codeshare,640.5,640.5,28,2.1,2024-11-03,true,310.0,S9
";
        let reader = csv::Reader::from_reader(csv.as_bytes());
        assert!(read_records(reader).is_err());
    }
}
