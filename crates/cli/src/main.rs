mod config;
mod error;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use access::{AccessDecision, AccessMap, Authenticator, Catalog, Evaluator, Session};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use storage::{DATE_FORMAT, JsonStore, PrincipalStore, SqliteStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::{Backend, Config};
use error::{Error, Result};

const CONFIG_FILE: &str = "warden.toml";

#[derive(Parser)]
#[command(name = "warden")]
#[command(about = "Time-bounded access to dashboards", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show which resources a user can access
    Access {
        username: String,
        /// Evaluate as of this date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Print the decisions as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check a login; the secret is read from stdin
    Login {
        username: String,
        /// Evaluate as of this date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Copy principals from a JSON file into a SQLite database
    Import {
        /// Source JSON file
        json: PathBuf,
        /// Destination SQLite database (created if missing)
        db: PathBuf,
    },
}

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Access {
            username,
            date,
            json,
        } => cmd_access(&cli.config, &username, date.as_deref(), json),
        Commands::Login { username, date } => cmd_login(&cli.config, &username, date.as_deref()),
        Commands::Import { json, db } => cmd_import(&json, &db),
    }
}

fn cmd_access(config_path: &Path, username: &str, date: Option<&str>, json: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let today = parse_date(date)?;
    let store = open_store(&config)?;
    let evaluator = Evaluator::new(store, config.catalog);

    let access = evaluator.evaluate(username, today)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&access)?);
        return Ok(());
    }

    print_access(&evaluator, &access);
    Ok(())
}

fn cmd_login(config_path: &Path, username: &str, date: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;
    let today = parse_date(date)?;

    print!("Password: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let secret = line.trim_end_matches(['\r', '\n']);

    let (evaluator, session) =
        login(open_store(&config)?, config.catalog, username, secret, today)?;

    println!("Welcome, {}.", session.username());

    let access = session.access(&evaluator)?;
    print_access(&evaluator, &access);
    Ok(())
}

/// Authenticate and evaluate against one store snapshot.
fn login<S: PrincipalStore>(
    store: S,
    catalog: Catalog,
    username: &str,
    secret: &str,
    today: NaiveDate,
) -> Result<(Evaluator<S>, Session)> {
    let session = Authenticator::new(&store).login(username, secret, today)?;
    Ok((Evaluator::new(store, catalog), session))
}

fn cmd_import(json_path: &Path, db_path: &Path) -> Result<()> {
    let source = JsonStore::open(json_path)?;
    let target = SqliteStore::open(db_path)?;

    let mut imported = 0usize;
    for username in source.usernames() {
        if let Some(principal) = source.lookup(username)? {
            target.upsert(&principal)?;
            imported += 1;
        }
    }

    info!(imported, db = %db_path.display(), "import finished");
    println!("Imported {imported} principal(s) into {}", db_path.display());
    Ok(())
}

fn print_access<S: PrincipalStore>(evaluator: &Evaluator<S>, access: &AccessMap) {
    if access.is_empty() {
        println!("No access.");
        return;
    }

    println!("{:<16}  {:<24}  STATUS", "RESOURCE", "TITLE");
    println!("{}", "-".repeat(64));

    for (id, decision) in access.iter() {
        let title = evaluator
            .catalog()
            .get(id)
            .map(|r| r.display_name())
            .unwrap_or(id);
        let status = match decision {
            AccessDecision::Granted { days_remaining } => {
                format!("granted, expires in {days_remaining} day(s)")
            }
            AccessDecision::Denied => "denied".to_string(),
        };
        println!("{id:<16}  {title:<24}  {status}");
    }
}

fn parse_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(s) => {
            NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| Error::InvalidDate(s.to_string()))
        }
        None => Ok(Local::now().date_naive()),
    }
}

fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        Ok(Config::load(path)?)
    } else {
        Ok(Config::default_config())
    }
}

fn open_store(config: &Config) -> Result<Box<dyn PrincipalStore>> {
    let path = &config.store.path;
    match config.store.backend {
        Backend::Json => Ok(Box::new(JsonStore::open(path)?)),
        Backend::Sqlite => {
            if !path.exists() {
                return Err(Error::DatabaseNotFound { path: path.clone() });
            }
            Ok(Box::new(SqliteStore::open(path)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_explicit_date() {
        let date = parse_date(Some("2024-01-05")).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    }

    #[test]
    fn test_parse_bad_date() {
        assert!(matches!(
            parse_date(Some("05/01/2024")),
            Err(Error::InvalidDate(_))
        ));
    }

    #[test]
    fn test_cli_parses_access() {
        let cli = Cli::try_parse_from([
            "warden",
            "access",
            "alice",
            "--date",
            "2024-01-05",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from(CONFIG_FILE));
        assert!(matches!(
            cli.command,
            Commands::Access { ref username, json: true, .. } if username == "alice"
        ));
    }

    #[test]
    fn test_missing_sqlite_db_reported() {
        let config = Config::parse(
            r#"
[store]
backend = "sqlite"
path = "/nonexistent/warden/principals.db"
"#,
        )
        .unwrap();
        assert!(matches!(open_store(&config), Err(Error::DatabaseNotFound { .. })));
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join(CONFIG_FILE)).unwrap();

        assert_eq!(config.store.backend, Backend::Json);
        assert_eq!(config.store.path, PathBuf::from("user_data.json"));
        assert_eq!(config.catalog, Catalog::default());
    }

    #[test]
    fn test_import_then_evaluate_from_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("user_data.json");
        let db = dir.path().join("principals.db");
        std::fs::write(
            &json,
            r#"{
                "alice": {"password": "pw", "expiry_date": "2024-01-10", "permissions": ["dashboard1", "dashboard3"]},
                "bob": {"password": "pw", "expiry_date": "2024-03-01", "permissions": "dashboard2"}
            }"#,
        )
        .unwrap();

        cmd_import(&json, &db).unwrap();

        let store = SqliteStore::open(&db).unwrap();
        let alice = store.lookup("alice").unwrap().unwrap();
        assert!(alice.is_granted("dashboard1"));
        assert!(alice.is_granted("dashboard3"));
        assert!(store.lookup("bob").unwrap().unwrap().is_granted("dashboard2"));

        let config_path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &config_path,
            format!("[store]\nbackend = \"sqlite\"\npath = {:?}\n", db.display().to_string()),
        )
        .unwrap();
        let config = load_config(&config_path).unwrap();
        let evaluator = Evaluator::new(open_store(&config).unwrap(), config.catalog);
        let access = evaluator
            .evaluate("alice", parse_date(Some("2024-01-05")).unwrap())
            .unwrap();
        assert_eq!(access.granted().collect::<Vec<_>>(), ["dashboard1", "dashboard3"]);

        cmd_access(&config_path, "alice", Some("2024-01-05"), true).unwrap();
    }

    #[test]
    fn test_import_aborts_on_malformed_record() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("user_data.json");
        let db = dir.path().join("principals.db");
        std::fs::write(
            &json,
            r#"{
                "mallory": {"password": "pw", "expiry_date": "next week", "permissions": []},
                "zoe": {"password": "pw", "expiry_date": "2024-01-10", "permissions": ["dashboard1"]}
            }"#,
        )
        .unwrap();

        let err = cmd_import(&json, &db).unwrap_err();
        assert!(matches!(
            err,
            Error::Storage(storage::Error::MalformedRecord { .. })
        ));
        assert!(err.to_string().contains("mallory"));
        assert_eq!(SqliteStore::open(&db).unwrap().lookup("zoe").unwrap(), None);
    }

    #[test]
    fn test_import_refuses_grant_with_separator() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("user_data.json");
        let db = dir.path().join("principals.db");
        std::fs::write(
            &json,
            r#"{"ivan": {"password": "pw", "expiry_date": "2024-01-10", "permissions": ["dashboard1,dashboard2"]}}"#,
        )
        .unwrap();

        assert!(cmd_import(&json, &db).is_err());
        assert_eq!(SqliteStore::open(&db).unwrap().lookup("ivan").unwrap(), None);
    }

    #[test]
    fn test_login_evaluates_against_same_store() {
        let store = JsonStore::parse(
            r#"{"alice": {"password": "pw", "expiry_date": "2024-01-10", "permissions": ["dashboard2"]}}"#,
        )
        .unwrap();
        let today = parse_date(Some("2024-01-05")).unwrap();

        let (evaluator, session) = login(&store, Catalog::default(), "alice", "pw", today).unwrap();
        let decisions = session.access(&evaluator).unwrap();
        assert_eq!(decisions.granted().collect::<Vec<_>>(), ["dashboard2"]);

        let err = login(&store, Catalog::default(), "alice", "nope", today).unwrap_err();
        assert!(matches!(
            err,
            Error::Auth(access::AuthFailure::InvalidCredential)
        ));
    }
}
