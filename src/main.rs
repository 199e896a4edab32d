use clap::{Parser, Subcommand};
use duckranges::importer::QueryResult;
use duckranges::{validate_file_path, IntervalDF};
use peak_alloc::PeakAlloc;
use polars::prelude::IdxSize;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::debug;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

#[global_allocator]
static PEAK_ALLOC: PeakAlloc = PeakAlloc;

/// Load genomic intervals into Polars and check the chr/start/end columns.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// print debug information
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load a Parquet file or a directory of Parquet files
    Inspect {
        /// path to a .parquet/.parq file or a directory of them
        path: PathBuf,
        /// number of rows to print
        #[arg(long, default_value_t = 5)]
        head: usize,
    },
    /// Run a SQL query through DuckDB and load its result
    Query {
        /// the query to run
        #[arg(long)]
        sql: String,
        /// DuckDB database file; an in-memory database is used if omitted
        #[arg(long)]
        database: Option<PathBuf>,
        /// number of rows to print
        #[arg(long, default_value_t = 5)]
        head: usize,
    },
    /// Validate a path and print its resolved form
    Validate {
        path: PathBuf,
        /// allowed extension, may be repeated (e.g. --ext .parquet --ext .parq)
        #[arg(long = "ext")]
        extensions: Vec<String>,
        /// do not require the path to exist
        #[arg(long)]
        no_check_exists: bool,
        /// accept a directory
        #[arg(long)]
        dirs_allowed: bool,
    },
}

fn head_limit(head: usize) -> anyhow::Result<IdxSize> {
    IdxSize::try_from(head)
        .map_err(|_| anyhow::anyhow!("--head {} is larger than {}", head, IdxSize::MAX))
}

fn print_interval_df(idf: &IntervalDF, head: usize) -> anyhow::Result<()> {
    println!("columns: {:?}", idf.columns()?);
    let df = idf.lazy_df().clone().limit(head_limit(head)?).collect()?;
    println!("{:?}", df);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .init();

    let start = Instant::now();
    match cli.command {
        Commands::Inspect { path, head } => {
            let idf = IntervalDF::new(path)?;
            print_interval_df(&idf, head)?;
        }
        Commands::Query {
            sql,
            database,
            head,
        } => {
            let conn = match database {
                Some(db) => duckdb::Connection::open(db)?,
                None => duckdb::Connection::open_in_memory()?,
            };
            let idf = IntervalDF::new(QueryResult::new(&conn, sql)?)?;
            print_interval_df(&idf, head)?;
        }
        Commands::Validate {
            path,
            extensions,
            no_check_exists,
            dirs_allowed,
        } => {
            let allowed = if extensions.is_empty() {
                None
            } else {
                Some(extensions.as_slice())
            };
            let resolved = validate_file_path(path, allowed, !no_check_exists, dirs_allowed)?;
            println!("{}", resolved.display());
        }
    }
    let duration: Duration = start.elapsed();
    debug!("finished in {:?}", duration);
    debug!("peak memory usage was {} MB", PEAK_ALLOC.peak_usage_as_mb());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_limit() {
        assert_eq!(head_limit(5).unwrap(), 5);
        let too_large = IdxSize::MAX as usize + 1;
        assert!(head_limit(too_large).is_err());
    }
}
