use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use fis_cohort_stats::{cohort, db, load, report, topn};
use fis_cohort_stats::{Discipline, Gender, RankingTable};

#[derive(Parser)]
#[command(name = "fis-cohort-stats")]
#[command(about = "Birth-year cohort statistics over FIS points lists", long_about = None)]
struct Cli {
    /// Points list export; the warehouse at DATABASE_URL is used when omitted
    #[arg(long, global = true)]
    csv: Option<PathBuf>,
    #[arg(long, global = true, value_enum, default_value_t = Format::Markdown)]
    format: Format,
    /// Write the report to a file instead of stdout
    #[arg(long, global = true)]
    out: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Markdown,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Best-ranked athletes of one birth year
    Ranked {
        /// Defaults to the most recent birth year in the list
        #[arg(long)]
        birth_year: Option<i32>,
        #[arg(long, default_value = "M")]
        gender: Gender,
        #[arg(long, default_values = ["SL", "GS", "SG", "DH"])]
        discipline: Vec<Discipline>,
        #[arg(long, default_value_t = 3)]
        top: usize,
        /// Entries in the national sections; defaults to --top
        #[arg(long)]
        national_top: Option<usize>,
        /// Only list national athletes
        #[arg(long)]
        national: bool,
    },
    /// Mean ranking of consecutive birth-year classes at the same FIS year
    Mean {
        #[arg(long, default_value_t = 1998)]
        birth_year: i32,
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(i32).range(1..=5))]
        fis_year: i32,
        #[arg(long, default_value = "M")]
        gender: Gender,
        #[arg(long, default_value = "DH")]
        discipline: Discipline,
        #[arg(long, default_values_t = [3, 10, 15])]
        top: Vec<usize>,
    },
    /// National athletes in the top 30, 50 and 70 per birth-year class
    Count {
        #[arg(long, default_value_t = 1998)]
        birth_year: i32,
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(i32).range(1..=5))]
        fis_year: i32,
        #[arg(long, default_value = "M")]
        gender: Gender,
        #[arg(long, default_value = "DH")]
        discipline: Discipline,
    },
    /// Development of one birth year across consecutive seasons
    Development {
        #[arg(long, default_value_t = 1998)]
        birth_year: i32,
        #[arg(long, default_value = "M")]
        gender: Gender,
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(3..=50))]
        top: u32,
        #[arg(long, default_value_t = 1)]
        fis_year: i32,
        #[arg(long, default_values = ["DH", "SG", "SL", "GS"])]
        discipline: Vec<Discipline>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("fis_cohort_stats=info"));
    tracing_subscriber::fmt()
        .compact()
        .with_target(true)
        .without_time()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

async fn load_table(csv: Option<&Path>) -> anyhow::Result<RankingTable> {
    if let Some(path) = csv {
        return load::load_csv(path)
            .with_context(|| format!("failed to load points list from {}", path.display()));
    }

    let database_url = std::env::var("DATABASE_URL")
        .context("pass --csv or set DATABASE_URL to the points list warehouse")?;
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;
    db::fetch_latest_list(&pool)
        .await
        .context("failed to fetch the latest points list")
}

fn emit(out: Option<&Path>, content: String) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Report written to {}.", path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let table = load_table(cli.csv.as_deref()).await?;
    let generated = Utc::now().date_naive();

    let content = match cli.command {
        Commands::Ranked {
            birth_year,
            gender,
            discipline,
            top,
            national_top,
            national,
        } => {
            let birth_year = match birth_year {
                Some(year) => year,
                None => *table
                    .birth_years()
                    .first()
                    .context("points list has no birth years")?,
            };

            let limits = topn::RankedLimits {
                overall: top,
                national: national_top.unwrap_or(top),
            };
            let sections =
                topn::ranked_sections(&table, birth_year, gender, &discipline, limits, national);

            match cli.format {
                Format::Markdown => {
                    report::ranked_report(birth_year, gender, generated, &sections)
                }
                Format::Json => {
                    let keyed: BTreeMap<String, _> = sections.into_iter().collect();
                    report::to_json(&keyed)?
                }
            }
        }
        Commands::Mean {
            birth_year,
            fis_year,
            gender,
            discipline,
            top,
        } => {
            let mut series = Vec::new();
            for n in top {
                let rows = cohort::collect_mean_series(
                    birth_year, fis_year, gender, n, discipline, &table,
                )?;
                series.push((n, rows));
            }

            match cli.format {
                Format::Markdown => report::mean_report(discipline, gender, generated, &series),
                Format::Json => {
                    let keyed: BTreeMap<String, _> = series
                        .into_iter()
                        .map(|(n, rows)| (format!("top{n}"), rows))
                        .collect();
                    report::to_json(&keyed)?
                }
            }
        }
        Commands::Count {
            birth_year,
            fis_year,
            gender,
            discipline,
        } => {
            let rows =
                cohort::collect_count_series(birth_year, fis_year, gender, discipline, &table)?;
            match cli.format {
                Format::Markdown => report::count_report(discipline, gender, generated, &rows),
                Format::Json => report::to_json(&rows)?,
            }
        }
        Commands::Development {
            birth_year,
            gender,
            top,
            fis_year,
            discipline,
        } => {
            let top = top as usize;
            let mut series = Vec::new();
            for d in discipline {
                let rows = cohort::collect_development_series(
                    birth_year, fis_year, gender, top, d, &table,
                )?;
                series.push((d, rows));
            }

            match cli.format {
                Format::Markdown => {
                    report::development_report(birth_year, gender, top, generated, &series)
                }
                Format::Json => {
                    let keyed: BTreeMap<String, _> = series
                        .into_iter()
                        .map(|(d, rows)| (d.code().to_string(), rows))
                        .collect();
                    report::to_json(&keyed)?
                }
            }
        }
    };

    emit(cli.out.as_deref(), content)
}
