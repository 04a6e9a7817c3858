use chrono::Duration;

use crate::cli::commands::{usage_error, CommandArgs};
use crate::cli::context::CliContext;
use crate::cli::registry::{CommandEntry, CommandResult};
use crate::cli::table::Table;
use crate::core::services::{AddExpenseInput, ExpenseService};
use crate::errors::CliError;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "add",
            "Add a tracked expense",
            "add <name> <amount> [--currency <code>] [--category <name>] \
             [--recurrence <keyword>] [--start <date>] [--next <date>] [--notes <text>]",
            cmd_add,
        ),
        CommandEntry::new(
            "list",
            "List tracked expenses ordered by next due date",
            "list [--all | --inactive]",
            cmd_list,
        ),
        CommandEntry::new(
            "upcoming",
            "Show active expenses due within a window",
            "upcoming [--days <n>]",
            cmd_upcoming,
        ),
    ]
}

fn cmd_add(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let parsed = CommandArgs::parse(args, &[])?;
    if parsed.positional_count() != 2 {
        return Err(usage_error(
            "add <name> <amount> [--currency <code>] [--category <name>] \
             [--recurrence <keyword>] [--start <date>] [--next <date>] [--notes <text>]",
        ));
    }
    let input = AddExpenseInput {
        name: parsed.positional(0).unwrap_or_default().to_string(),
        amount: parsed.positional(1).unwrap_or_default().to_string(),
        currency: parsed
            .flag_owned("currency")
            .unwrap_or_else(|| "USD".to_string()),
        category: parsed.flag_owned("category"),
        recurrence: parsed
            .flag_owned("recurrence")
            .unwrap_or_else(|| "monthly".to_string()),
        start: parsed.flag_owned("start"),
        next_due: parsed.flag_owned("next"),
        notes: parsed.flag_owned("notes"),
    };

    let db = context.database()?;
    let expense = ExpenseService::add_expense(&db, input, context.today()).map_err(CliError::Core)?;
    println!(
        "Added expense #{}: {} {} ({})",
        expense.id,
        expense.name,
        expense.amount_display(),
        expense.recurrence
    );
    Ok(())
}

fn cmd_list(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let parsed = CommandArgs::parse(args, &["all", "inactive"])?;
    if parsed.positional_count() != 0 {
        return Err(usage_error("list [--all | --inactive]"));
    }
    let show_all = parsed.has("all");
    let only_inactive = parsed.has("inactive");

    let db = context.database()?;
    let mut expenses = db
        .list_expenses(show_all || only_inactive)
        .map_err(CliError::Core)?;
    if only_inactive {
        expenses.retain(|expense| !expense.active);
    }

    let mut table = Table::new(&[
        "id", "name", "amount", "recurrence", "next_due", "active", "category",
    ]);
    for expense in &expenses {
        table.add_row(vec![
            expense.id.to_string(),
            expense.name.clone(),
            expense.amount_display(),
            expense.recurrence.to_string(),
            expense
                .next_due_date
                .map(|date| date.to_string())
                .unwrap_or_else(|| "-".to_string()),
            if expense.active { "yes" } else { "no" }.to_string(),
            expense.category.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }
    println!("{}", table.render());
    Ok(())
}

fn cmd_upcoming(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let parsed = CommandArgs::parse(args, &[])?;
    if parsed.positional_count() != 0 {
        return Err(usage_error("upcoming [--days <n>]"));
    }
    let days = match parsed.flag("days") {
        Some(raw) => raw
            .parse::<i64>()
            .map_err(|_| CliError::InvalidArguments(format!("invalid day count `{raw}`")))?,
        None => 30,
    };

    let today = context.today();
    let cutoff = today + Duration::days(days);
    let db = context.database()?;
    let expenses = db.upcoming_expenses(cutoff).map_err(CliError::Core)?;

    let mut table = Table::new(&["id", "name", "due", "amount", "recurrence", "category"]);
    for expense in &expenses {
        table.add_row(vec![
            expense.id.to_string(),
            expense.name.clone(),
            expense
                .next_due_date
                .map(|date| date.to_string())
                .unwrap_or_else(|| "-".to_string()),
            expense.amount_display(),
            expense.recurrence.to_string(),
            expense.category.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }
    println!("{}", table.render());
    Ok(())
}
