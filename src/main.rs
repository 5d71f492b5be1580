use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod data;
mod models;
mod overview;
mod report;
mod risk;
mod stats;
mod views;
mod window;

use models::{Alliance, ContributionRecord};

#[derive(Parser)]
#[command(name = "alliance-contribution-tracker")]
#[command(about = "Contribution analytics for the alliance partner dashboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-player window statistics and trends
    Stats {
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        as_of: Option<NaiveDate>,
        #[arg(long)]
        alliance: Option<Alliance>,
        #[arg(long)]
        json: bool,
    },
    /// Alliance summary for the reference date
    Overview {
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        as_of: Option<NaiveDate>,
        #[arg(long)]
        json: bool,
    },
    /// Players below requirement thresholds
    Risks {
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        as_of: Option<NaiveDate>,
        #[arg(long, default_value_t = 20)]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    /// Low revenue-per-flight candidates
    Optimize {
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        alliance: Option<Alliance>,
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        as_of: Option<NaiveDate>,
        #[arg(long)]
        alliance: Option<Alliance>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Stats { csv, as_of, alliance, json } => {
            let records = load_records(csv.as_deref())?;
            let as_of = resolve_as_of(&records, as_of)?;
            let mut player_stats = stats::compute_stats(&records, as_of);
            if let Some(scope) = alliance {
                player_stats.retain(|s| s.alliance_name == scope);
            }
            player_stats.sort_by(|a, b| {
                a.alliance_name
                    .cmp(&b.alliance_name)
                    .then_with(|| a.player_name.cmp(&b.player_name))
            });

            if json {
                println!("{}", serde_json::to_string_pretty(&player_stats)?);
                return Ok(());
            }

            println!("Player window statistics as of {as_of}:");
            for s in player_stats.iter() {
                println!(
                    "- {} ({}): 3d {} [{}], 7d {} [{}], 30d {} [{}], trend {}",
                    s.player_name,
                    s.alliance_name,
                    s.avg_cpd_3d,
                    mark(s.meets_3d),
                    s.avg_cpd_7d,
                    mark(s.meets_7d),
                    s.avg_cpd_30d,
                    mark(s.meets_30d),
                    s.trend_7d.as_str()
                );
            }
        }
        Commands::Overview { csv, as_of, json } => {
            let records = load_records(csv.as_deref())?;
            let as_of = resolve_as_of(&records, as_of)?;
            let rows = overview::alliance_overview(&records, as_of);

            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
                return Ok(());
            }

            if rows.is_empty() {
                println!("No entries on {as_of}.");
                return Ok(());
            }

            println!("Alliance overview for {as_of}:");
            for row in rows.iter() {
                println!(
                    "- {}: {} players, {} online ({:.0}% active), {} flights, {:.0} contributed, engagement {:.1}",
                    row.alliance_name,
                    row.total_players,
                    row.active_partners,
                    row.activity_rate,
                    row.total_flights,
                    row.total_contributed,
                    row.engagement_score
                );
            }
        }
        Commands::Risks { csv, as_of, limit, json } => {
            let records = load_records(csv.as_deref())?;
            let as_of = resolve_as_of(&records, as_of)?;
            let player_stats = stats::compute_stats(&records, as_of);
            let risks = risk::demotion_risks(&player_stats);

            if json {
                println!("{}", serde_json::to_string_pretty(&risks)?);
                return Ok(());
            }

            if risks.is_empty() {
                println!("No players below requirement thresholds.");
                return Ok(());
            }

            println!("Demotion risks as of {as_of}:");
            for entry in risks.iter().take(limit) {
                println!(
                    "- {} ({}): {}",
                    entry.player_name,
                    entry.alliance_name,
                    entry.reason.as_str()
                );
            }
        }
        Commands::Optimize { csv, alliance, json } => {
            let records = load_records(csv.as_deref())?;
            let candidates = risk::optimization_candidates(&records, alliance);

            if json {
                println!("{}", serde_json::to_string_pretty(&candidates)?);
                return Ok(());
            }

            if candidates.is_empty() {
                println!("No active players below the efficiency bar.");
                return Ok(());
            }

            println!("Optimization candidates (worst efficiency first):");
            for candidate in candidates.iter() {
                println!(
                    "- {} ({}): {} per flight across {} flights",
                    candidate.player_name,
                    candidate.alliance_name,
                    candidate.revenue_per_flight,
                    candidate.flights
                );
            }
        }
        Commands::Report { csv, as_of, alliance, out } => {
            let records = load_records(csv.as_deref())?;
            let as_of = resolve_as_of(&records, as_of)?;
            let report = report::build_report(&records, as_of, alliance);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

fn load_records(csv: Option<&Path>) -> anyhow::Result<Vec<ContributionRecord>> {
    match csv {
        Some(path) => data::load_csv(path),
        None => data::sample_records(),
    }
}

fn resolve_as_of(
    records: &[ContributionRecord],
    as_of: Option<NaiveDate>,
) -> anyhow::Result<NaiveDate> {
    as_of
        .or_else(|| data::latest_entry_date(records))
        .context("no records available to derive a reference date")
}

fn mark(pass: bool) -> &'static str {
    if pass {
        "ok"
    } else {
        "miss"
    }
}
