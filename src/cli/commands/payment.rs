use crate::cli::commands::{usage_error, CommandArgs};
use crate::cli::context::CliContext;
use crate::cli::registry::{CommandEntry, CommandResult};
use crate::cli::table::Table;
use crate::core::services::{PaymentInput, PaymentService};
use crate::errors::CliError;
use crate::money::format_cents;
use crate::recurrence::{parse_year_month, YearMonth};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "pay",
            "Record a payment and advance the due date",
            "pay <id|name> [--amount <value>] [--date <date>] [--method <text>] [--notes <text>]",
            cmd_pay,
        ),
        CommandEntry::new(
            "month",
            "Summarize payments for a calendar month",
            "month [--month <YYYY-MM>]",
            cmd_month,
        ),
        CommandEntry::new(
            "payments",
            "List recorded payments, newest first",
            "payments [--id <expense-id>] [--name <expense-name>] [--month <YYYY-MM>]",
            cmd_payments,
        ),
    ]
}

fn cmd_pay(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let parsed = CommandArgs::parse(args, &[])?;
    if parsed.positional_count() != 1 {
        return Err(usage_error(
            "pay <id|name> [--amount <value>] [--date <date>] [--method <text>] [--notes <text>]",
        ));
    }
    let reference = parsed.positional(0).unwrap_or_default();
    let input = PaymentInput {
        amount: parsed.flag_owned("amount"),
        date: parsed.flag_owned("date"),
        method: parsed.flag_owned("method"),
        notes: parsed.flag_owned("notes"),
    };

    let mut db = context.database()?;
    let receipt = PaymentService::record_payment(&mut db, reference, input, context.today())
        .map_err(CliError::Core)?;
    if receipt.deactivated {
        println!(
            "Recorded payment #{}. Deactivated one-off expense '{}'.",
            receipt.payment_id, receipt.expense_name
        );
    } else if let Some(next_due) = receipt.next_due {
        println!(
            "Recorded payment #{}. Next due on {}.",
            receipt.payment_id, next_due
        );
    } else {
        println!("Recorded payment #{}.", receipt.payment_id);
    }
    Ok(())
}

fn cmd_month(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let parsed = CommandArgs::parse(args, &[])?;
    if parsed.positional_count() != 0 {
        return Err(usage_error("month [--month <YYYY-MM>]"));
    }
    let year_month = match parsed.flag("month") {
        Some(raw) => parse_year_month(raw).map_err(CliError::Core)?,
        None => YearMonth::from_date(context.today()),
    };

    let db = context.database()?;
    let summary = PaymentService::month_summary(&db, year_month).map_err(CliError::Core)?;
    println!(
        "Payments in {}: {} across {} payments",
        year_month,
        format_cents(summary.total_cents),
        summary.count
    );
    Ok(())
}

fn cmd_payments(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let parsed = CommandArgs::parse(args, &[])?;
    if parsed.positional_count() != 0 {
        return Err(usage_error(
            "payments [--id <expense-id>] [--name <expense-name>] [--month <YYYY-MM>]",
        ));
    }
    let expense_id = match parsed.flag("id") {
        Some(raw) => Some(
            raw.parse::<i64>()
                .map_err(|_| CliError::InvalidArguments(format!("invalid expense id `{raw}`")))?,
        ),
        None => None,
    };
    let month = match parsed.flag("month") {
        Some(raw) => Some(parse_year_month(raw).map_err(CliError::Core)?),
        None => None,
    };

    let db = context.database()?;
    let filter = PaymentService::build_filter(&db, expense_id, parsed.flag("name"), month)
        .map_err(CliError::Core)?;
    let payments = db.list_payments(filter).map_err(CliError::Core)?;

    let mut table = Table::new(&["id", "expense_id", "paid_date", "amount", "method"]);
    for payment in &payments {
        table.add_row(vec![
            payment.id.to_string(),
            payment.expense_id.to_string(),
            payment.paid_date.to_string(),
            format_cents(payment.amount_cents),
            payment.method.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }
    println!("{}", table.render());
    Ok(())
}
