use std::path::Path;

use crate::cli::commands::{usage_error, CommandArgs};
use crate::cli::context::CliContext;
use crate::cli::export::{export_tables, ExportTable};
use crate::cli::registry::{CommandEntry, CommandResult};
use crate::errors::CliError;

pub(crate) fn init_definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "init",
        "Create the database file and schema",
        "init [--db <path>]",
        cmd_init,
    )]
}

pub(crate) fn export_definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "export",
        "Export expenses and/or payments as CSV",
        "export <output.csv> [--table expenses|payments|all]",
        cmd_export,
    )]
}

fn cmd_init(context: &mut CliContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(usage_error("init [--db <path>]"));
    }
    context.database()?;
    println!("Initialized database at {}", context.db_path().display());
    Ok(())
}

fn cmd_export(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let parsed = CommandArgs::parse(args, &[])?;
    let output = parsed
        .positional(0)
        .filter(|_| parsed.positional_count() == 1)
        .ok_or_else(|| usage_error("export <output.csv> [--table expenses|payments|all]"))?;
    let table = match parsed.flag("table") {
        Some(choice) => ExportTable::parse(choice).ok_or_else(|| {
            CliError::InvalidArguments(format!(
                "unknown table `{choice}` (expected expenses, payments, or all)"
            ))
        })?,
        None => ExportTable::All,
    };

    let db = context.database()?;
    let written = export_tables(&db, Path::new(output), table).map_err(CliError::Core)?;
    for (label, path) in &written {
        println!("Exported {} to {}", label, path.display());
    }
    Ok(())
}
