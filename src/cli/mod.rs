//! One-shot command-line front end: parse the global `--db` flag, look the
//! command up in the registry, and hand the rest of the tokens to its handler.

pub mod commands;
pub mod context;
pub mod export;
pub mod registry;
pub mod table;

use std::env;
use std::path::PathBuf;

pub use context::CliContext;

use crate::errors::CliError;
use registry::CommandRegistry;

const DB_ENV_VAR: &str = "BILLBOOK_DB";
const DEFAULT_DB_FILE: &str = "expenses.db";

/// Runs a single invocation: `args` is everything after the binary name.
pub fn run_cli(args: &[String]) -> Result<(), CliError> {
    let (db_path, rest) = extract_db_path(args)?;
    let registry = commands::registry();

    let command = match rest.first().map(String::as_str) {
        None | Some("help") | Some("--help") | Some("-h") => {
            print_help(&registry);
            return Ok(());
        }
        Some(name) => name,
    };

    let entry = registry
        .get(command)
        .ok_or_else(|| CliError::UnknownCommand(command.to_string()))?;
    let mut context = CliContext::new(db_path);
    let handler_args: Vec<&str> = rest[1..].iter().map(String::as_str).collect();
    (entry.handler)(&mut context, &handler_args)
}

/// Pulls a leading or trailing `--db <path>` out of the token stream; falls
/// back to `BILLBOOK_DB`, then to `expenses.db` in the working directory.
fn extract_db_path(args: &[String]) -> Result<(PathBuf, Vec<String>), CliError> {
    let mut rest = Vec::with_capacity(args.len());
    let mut db_path = None;
    let mut index = 0;
    while index < args.len() {
        if args[index] == "--db" {
            index += 1;
            let value = args.get(index).ok_or_else(|| {
                CliError::InvalidArguments("--db requires a value".to_string())
            })?;
            db_path = Some(PathBuf::from(value));
        } else {
            rest.push(args[index].clone());
        }
        index += 1;
    }
    let db_path = db_path
        .or_else(|| env::var(DB_ENV_VAR).ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE));
    Ok((db_path, rest))
}

fn print_help(registry: &CommandRegistry) {
    println!("billbook - track recurring expenses and payments");
    println!();
    println!("usage: billbook [--db <path>] <command> [args]");
    println!();
    println!("Commands:");
    let width = registry
        .entries()
        .map(|entry| entry.name.len())
        .max()
        .unwrap_or(0);
    for entry in registry.entries() {
        println!("  {:width$}  {}", entry.name, entry.description);
    }
    println!();
    println!("Run with --db <path> or set {DB_ENV_VAR} to choose the database file.");
}
