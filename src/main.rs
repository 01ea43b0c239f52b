//! Command-line interface for seed-loader
//!
//! # Usage Examples
//!
//! ```bash
//! # Load mans360_test_seed.sql from the working directory
//! seed-loader script
//!
//! # Drop all seed tables and types, then reload
//! seed-loader script --reset
//!
//! # Load from an Excel workbook
//! seed-loader workbook --file MANAS360_Test_Data_Complete.xlsx
//!
//! # Print counts only
//! seed-loader validate
//!
//! # Write .env.template
//! seed-loader env-template
//! ```
//!
//! Connection settings come from `--db-*` flags or the `MANS360_DB_*`
//! environment variables, optionally set through a `.env` file.

use anyhow::Context;
use clap::{Parser, Subcommand};
use seed_loader::env_template::DEFAULT_TEMPLATE_PATH;
use seed_loader::{connect, write_env_template, DbOpts, EnvFile, PgConnection};
use seed_populate_postgresql::SeedLoader;
use seed_source::{SeedSource, DEFAULT_SCRIPT, DEFAULT_WORKBOOK};
use seed_verify_postgresql::Verifier;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "seed-loader")]
#[command(about = "Load MANAS360 seed data into PostgreSQL and validate it")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a SQL seed script in one transaction
    Script {
        /// SQL script path
        #[arg(long, default_value = DEFAULT_SCRIPT)]
        file: PathBuf,

        /// Drop all seed tables and enum types before loading
        #[arg(long)]
        reset: bool,

        #[command(flatten)]
        db: DbOpts,
    },

    /// Load the four seed sheets of an Excel workbook in one transaction
    Workbook {
        /// Workbook path
        #[arg(long, default_value = DEFAULT_WORKBOOK)]
        file: PathBuf,

        #[command(flatten)]
        db: DbOpts,
    },

    /// Print the validation report without writing anything
    Validate {
        #[command(flatten)]
        db: DbOpts,
    },

    /// Write a .env template with every connection variable
    EnvTemplate {
        /// Output path
        #[arg(long, default_value = DEFAULT_TEMPLATE_PATH)]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Commands {
    fn mode(&self) -> &'static str {
        match self {
            Commands::Script { .. } => "script",
            Commands::Workbook { .. } => "workbook",
            Commands::Validate { .. } => "validate",
            Commands::EnvTemplate { .. } => "env-template",
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // stdout carries the validation report only.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Must precede parsing so that .env values reach the env-backed flags.
    let env_file = EnvFile::load();
    env_file.log();

    let cli = Cli::parse();

    tracing::info!(
        "MANAS360 seed loader: mode={} time={}",
        cli.command.mode(),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    match cli.command {
        Commands::Script { file, reset, db } => {
            run_load(SeedSource::Script(file), reset, &db).await
        }
        Commands::Workbook { file, db } => {
            run_load(SeedSource::Workbook(file), false, &db).await
        }
        Commands::Validate { db } => {
            let conn = connect(&db).await?;
            let result = run_validate(&conn).await;
            conn.close().await;
            result
        }
        Commands::EnvTemplate { output, force } => write_env_template(&output, force),
    }
}

async fn run_load(source: SeedSource, reset: bool, db: &DbOpts) -> anyhow::Result<()> {
    // A missing file is reported before any connection is made.
    let opened = source
        .open()
        .await
        .with_context(|| format!("Failed to open {} seed", source.kind()))?;

    let mut conn = connect(db).await?;
    let result = load_and_validate(&mut conn, opened, reset).await;
    conn.close().await;
    result
}

async fn load_and_validate(
    conn: &mut PgConnection,
    opened: seed_source::OpenedSource,
    reset: bool,
) -> anyhow::Result<()> {
    let mut loader = SeedLoader::new(&mut conn.client);
    if reset {
        loader.reset().await.context("Reset failed")?;
    }
    let summary = loader.load(opened).await.context("Load failed")?;
    tracing::info!("Seed data loaded: {}", summary);

    run_validate(conn).await
}

async fn run_validate(conn: &PgConnection) -> anyhow::Result<()> {
    let report = Verifier::new(&conn.client).run().await?;
    print!("{report}");
    Ok(())
}
