//! Rowkeeper Codegen - entity generation tool
//!
//! Introspects a SQLite database and writes one metadata file per table
//! (always regenerated) plus one behavior stub per table (only if missing).

use clap::{Parser, Subcommand};
use rowkeeper::SqliteExecutor;
use rowkeeper_codegen::Generator;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rowkeeper-codegen")]
#[command(about = "Generate rowkeeper entity files from a SQLite schema", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate entity files from the database schema
    Generate {
        /// SQLite database file to introspect
        #[arg(short, long)]
        database: PathBuf,

        /// Output directory for generated code
        #[arg(short, long, default_value = "src/entities")]
        output: PathBuf,

        /// Only generate these tables (repeatable)
        #[arg(short, long = "table")]
        tables: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            database,
            output,
            tables,
        } => {
            generate_entities(&database, &output, tables)?;
        }
    }

    Ok(())
}

fn generate_entities(database: &PathBuf, output: &PathBuf, tables: Vec<String>) -> anyhow::Result<()> {
    if !database.exists() {
        anyhow::bail!("database {} does not exist", database.display());
    }
    log::info!("introspecting {}", database.display());

    let db = SqliteExecutor::open(database)?;
    let report = Generator::new(&db, output).only_tables(tables).run()?;

    for path in &report.written {
        println!("✅ Generated: {}", path.display());
    }
    for path in &report.kept {
        println!("⏭️  Kept existing stub: {}", path.display());
    }
    for (table, reason) in &report.skipped_tables {
        println!("⚠️  Skipped {table}: {reason}");
    }

    Ok(())
}
