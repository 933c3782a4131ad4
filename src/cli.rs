use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;

use crate::api::rest::RestClient;
use crate::api::Backend;
use crate::config::AppConfig;
use crate::error::is_auth_error;
use crate::export::{self, Report};
use crate::model::report::DateRange;
use crate::session::SessionStore;

const PASSWORD_ENV: &str = "DEVTRACK_PASSWORD";

#[derive(Debug, PartialEq)]
pub enum Command {
    Tui,
    Login {
        email: String,
        password: Option<String>,
    },
    Logout,
    Export {
        report: Report,
        output: Option<PathBuf>,
        range: DateRange,
    },
    Help,
}

/// Parse everything after the binary name.
///
/// Supported forms:
///   devtrack
///   devtrack login <email> [-p <password>]
///   devtrack logout
///   devtrack export <utilization|projects> [-o <file>] [--from <date>] [--to <date>]
///   devtrack help
pub fn parse_args(args: &[String]) -> Result<Command> {
    let Some(cmd) = args.first() else {
        return Ok(Command::Tui);
    };
    let rest = &args[1..];

    match cmd.as_str() {
        "login" => parse_login_args(rest),
        "logout" => Ok(Command::Logout),
        "export" => parse_export_args(rest),
        "help" | "-h" | "--help" => Ok(Command::Help),
        other => bail!("Unknown command '{other}'. Run `devtrack help` for usage."),
    }
}

fn flag_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    match args.get(i) {
        Some(v) => Ok(v.as_str()),
        None => bail!("Missing value for {flag}"),
    }
}

fn parse_login_args(args: &[String]) -> Result<Command> {
    let mut email = None;
    let mut password = None;
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "-p" | "--password" => {
                i += 1;
                password = Some(flag_value(args, i, "-p/--password")?.to_string());
            }
            value if email.is_none() => email = Some(value.to_string()),
            value => bail!("Unexpected argument '{value}'"),
        }
        i += 1;
    }

    match email {
        Some(email) if !email.trim().is_empty() => Ok(Command::Login { email, password }),
        _ => bail!("Usage: devtrack login <email> [-p <password>]"),
    }
}

fn parse_date(value: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("{flag} expects YYYY-MM-DD, got '{value}'"))
}

fn parse_export_args(args: &[String]) -> Result<Command> {
    let mut report = None;
    let mut output = None;
    let mut range = DateRange::default();
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => {
                i += 1;
                output = Some(PathBuf::from(flag_value(args, i, "-o/--output")?));
            }
            "--from" => {
                i += 1;
                range.from = Some(parse_date(flag_value(args, i, "--from")?, "--from")?);
            }
            "--to" => {
                i += 1;
                range.to = Some(parse_date(flag_value(args, i, "--to")?, "--to")?);
            }
            name if report.is_none() => match Report::parse(name) {
                Some(r) => report = Some(r),
                None => bail!("Unknown report '{name}'. Expected utilization or projects"),
            },
            value => bail!("Unexpected argument '{value}'"),
        }
        i += 1;
    }

    let Some(report) = report else {
        bail!("Usage: devtrack export <utilization|projects> [-o <file>] [--from <date>] [--to <date>]");
    };
    if report == Report::ProjectStatus && range != DateRange::default() {
        bail!("--from/--to only apply to the utilization report");
    }
    Ok(Command::Export {
        report,
        output,
        range,
    })
}

pub async fn handle_login(config: &AppConfig, email: &str, password: Option<String>) -> Result<()> {
    let password = match password.or_else(|| std::env::var(PASSWORD_ENV).ok()) {
        Some(p) if !p.is_empty() => p,
        _ => bail!("No password given. Pass -p <password> or set {PASSWORD_ENV}"),
    };

    let client = RestClient::new(&config.api)?;
    let session = client.login(email, &password).await?;
    SessionStore::new().save(&session)?;

    log::info!("Logged in as {}", session.email());
    println!("Logged in as {} ({})", session.user.display_name(), session.email());
    Ok(())
}

pub fn handle_logout() -> Result<()> {
    let store = SessionStore::new();
    match store.load() {
        Some(session) => {
            store.clear()?;
            log::info!("Logged out {}", session.email());
            println!("Logged out {}", session.email());
        }
        None => println!("Not logged in"),
    }
    Ok(())
}

pub async fn handle_export(
    config: &AppConfig,
    report: Report,
    output: Option<PathBuf>,
    range: DateRange,
) -> Result<()> {
    let store = SessionStore::new();
    let Some(session) = store.load() else {
        bail!("Not logged in. Run `devtrack login <email>` first");
    };
    let client = RestClient::new(&config.api)?;

    let result = match report {
        Report::Utilization => match client.utilization(&session, range).await {
            Ok(rows) => write_rows(&rows, report, output, config),
            Err(e) => Err(e),
        },
        Report::ProjectStatus => match client.project_status(&session).await {
            Ok(rows) => write_rows(&rows, report, output, config),
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(path) => {
            println!("Exported {}", path.display());
            Ok(())
        }
        Err(e) if is_auth_error(&e) => {
            store.clear()?;
            bail!("Session expired. Run `devtrack login <email>` again")
        }
        Err(e) => Err(e.context("Export failed")),
    }
}

fn write_rows<T: serde::Serialize>(
    rows: &[T],
    report: Report,
    output: Option<PathBuf>,
    config: &AppConfig,
) -> Result<PathBuf> {
    match output {
        Some(path) => {
            export::write_csv(rows, &path, config.export.quoting)?;
            Ok(path)
        }
        None => export::write_report(rows, report, &config.export),
    }
}

pub fn print_help() {
    println!("devtrack — terminal dashboard for projects, work items and team reports\n");
    println!("USAGE:");
    println!("  devtrack                     Launch the TUI dashboard");
    println!("  devtrack login <email>       Sign in and store the session");
    println!("  devtrack logout              Forget the stored session");
    println!("  devtrack export <report>     Write a report as CSV");
    println!("  devtrack help                Show this message");
    println!();
    println!("LOGIN OPTIONS:");
    println!("  -p, --password <pw>  Password (or set {PASSWORD_ENV})");
    println!();
    println!("EXPORT OPTIONS:");
    println!("  <report>             utilization | projects");
    println!("  -o, --output <file>  Write to <file> instead of the export directory");
    println!("  --from <YYYY-MM-DD>  Utilization range start (utilization only)");
    println!("  --to <YYYY-MM-DD>    Utilization range end (utilization only)");
    println!();
    println!("EXAMPLES:");
    println!("  devtrack login john.doe@example.com -p password123");
    println!("  devtrack export utilization --from 2024-01-01 -o q1.csv");
}
