use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use rusqlite::{Connection, OpenFlags};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use ordermetrics::shaper::catalog_metadata;
use ordermetrics::{
    compile_with, describe, emit_sql, parser, run_query, Dialect, QueryExecutor, QueryRequest,
    ServiceConfig,
};

#[derive(Parser)]
#[command(name = "ordermetrics")]
#[command(about = "Compile and run analytics requests against the order database")]
#[command(version)]
struct Args {
    /// Service configuration (YAML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a request and print the SQL, parameters and output columns
    Compile {
        /// Request JSON file, or - for stdin
        #[arg(long, default_value = "-")]
        request: String,

        /// Override the configured dialect
        #[arg(long)]
        dialect: Option<Dialect>,
    },
    /// List metrics, dimensions and (with a database) filter values
    Metadata {
        /// SQLite database to read filter values from; falls back to the configured one
        #[arg(long)]
        database: Option<PathBuf>,
    },
    /// Check that the database answers a trivial query
    Health {
        /// SQLite database; falls back to the configured one
        #[arg(long)]
        database: Option<PathBuf>,
    },
    /// Compile and execute a request against a SQLite database
    Query {
        /// Request JSON file, or - for stdin
        #[arg(long, default_value = "-")]
        request: String,

        /// SQLite database; falls back to the configured one
        #[arg(long)]
        database: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => parser::parse_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ServiceConfig::default(),
    };

    match args.command {
        Commands::Compile { request, dialect } => handle_compile(&config, &request, dialect),
        Commands::Metadata { database } => handle_metadata(&config, database),
        Commands::Health { database } => handle_health(&config, database),
        Commands::Query { request, database } => handle_query(&config, &request, database),
    }
}

fn read_request(source: &str) -> anyhow::Result<QueryRequest> {
    let text = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading request from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source).with_context(|| format!("reading request {}", source))?
    };
    serde_json::from_str(&text).context("parsing request JSON")
}

fn database_path(config: &ServiceConfig, database: Option<PathBuf>) -> Option<PathBuf> {
    database.or_else(|| config.database.as_ref().map(PathBuf::from))
}

fn open_database(path: &Path) -> anyhow::Result<Connection> {
    Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .with_context(|| format!("opening database {}", path.display()))
}

/// Handle the 'compile' subcommand - no storage access
fn handle_compile(config: &ServiceConfig, source: &str, dialect: Option<Dialect>) -> anyhow::Result<()> {
    let request = read_request(source)?;
    let compiled = compile_with(&request, &config.compile_options())?;
    let rendered = emit_sql(&compiled.plan, dialect.unwrap_or(config.dialect))?;

    let params: Vec<serde_json::Value> = rendered.params.iter().map(|p| p.to_json()).collect();
    let out = json!({
        "sql": rendered.sql,
        "params": params,
        "columns": compiled.columns,
        "ignored_filters": compiled.ignored_filters,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

/// Handle the 'metadata' subcommand
fn handle_metadata(config: &ServiceConfig, database: Option<PathBuf>) -> anyhow::Result<()> {
    let metadata = match database_path(config, database) {
        Some(path) => describe(&open_database(&path)?)?,
        None => catalog_metadata(),
    };
    println!("{}", serde_json::to_string_pretty(&metadata)?);
    Ok(())
}

/// Handle the 'health' subcommand
fn handle_health(config: &ServiceConfig, database: Option<PathBuf>) -> anyhow::Result<()> {
    let Some(path) = database_path(config, database) else {
        bail!("no database given; pass --database or set `database` in the config");
    };
    let checked = open_database(&path).and_then(|conn| Ok(conn.ping()?));
    match checked {
        Ok(()) => {
            let body = json!({ "status": "healthy", "database": "connected" });
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(())
        }
        Err(err) => {
            let body = json!({ "status": 503, "detail": format!("Database connection failed: {:#}", err) });
            println!("{}", serde_json::to_string_pretty(&body)?);
            Err(err)
        }
    }
}

/// Handle the 'query' subcommand - compile, execute, print the response body
fn handle_query(config: &ServiceConfig, source: &str, database: Option<PathBuf>) -> anyhow::Result<()> {
    let path = match database_path(config, database) {
        Some(path) => path,
        None => bail!("no database given; pass --database or set `database` in the config"),
    };
    let request = read_request(source)?;
    let conn = open_database(&path)?;

    match run_query(&conn, &request, &config.compile_options()) {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Err(err) => {
            let body = json!({ "status": err.http_status(), "detail": err.to_string() });
            println!("{}", serde_json::to_string_pretty(&body)?);
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_flag_overrides_config() {
        let config = parser::parse_str("database: analytics.db\n").unwrap();
        assert_eq!(
            database_path(&config, Some(PathBuf::from("other.db"))),
            Some(PathBuf::from("other.db"))
        );
        assert_eq!(database_path(&config, None), Some(PathBuf::from("analytics.db")));
        assert_eq!(database_path(&ServiceConfig::default(), None), None);
    }

    #[test]
    fn test_health_fails_for_missing_database() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.db");
        assert!(handle_health(&ServiceConfig::default(), Some(missing)).is_err());
        assert!(handle_health(&ServiceConfig::default(), None).is_err());
    }
}
