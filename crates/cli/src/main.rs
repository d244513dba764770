mod prompt;
mod report;

use std::{error::Error, fs::File};

use clap::{Args, Parser, Subcommand};
use engine::{
    CategoryFilter, Currency, EngineError, ExchangeRates, ExpenseDraft, ExpenseId, ExpensePatch, GroupKey,
    HiddenGroups, IncomeDraft, Language, Period, PeriodBook, RecurringDraft, RecurringSortKey,
    SortConfig, SortDirection, SortKey, parse_month, project, project_templates,
};
use finance_client::{Client, ClientError};

type CliResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

#[derive(Parser, Debug)]
#[command(name = "bilancio")]
#[command(about = "Monthly expense reports from the finance backend")]
struct Cli {
    /// Backend base URL (also read from `BILANCIO_BASE_URL`).
    #[arg(
        long,
        global = true,
        env = "BILANCIO_BASE_URL",
        default_value = "http://127.0.0.1:3000"
    )]
    base_url: String,

    /// Bearer token; without it every write is refused.
    #[arg(long, global = true, env = "BILANCIO_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Currency every total is reported in.
    #[arg(
        long,
        global = true,
        env = "BILANCIO_REPORTING_CURRENCY",
        default_value = "EUR"
    )]
    reporting_currency: Currency,

    /// Month names language (en, es, it).
    #[arg(long, global = true, default_value = "it", value_parser = parse_language)]
    language: Language,

    #[arg(long, global = true, env = "BILANCIO_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Totals per category and currency, income and remaining.
    Report(ReportArgs),
    /// List the expenses of a month.
    Expenses(ExpensesArgs),
    Add(AddArgs),
    Edit(EditArgs),
    /// Flip an expense between pending and paid.
    Toggle(TargetArgs),
    Delete(TargetArgs),
    Income(Income),
    /// Conversion factors into the reporting currency.
    Rates,
    /// Carry pending expenses forward into a month.
    Migrate(PeriodArgs),
    Recurring(Recurring),
}

#[derive(Args, Debug, Clone, Default)]
struct PeriodArgs {
    /// Month as a number or a name in English, Spanish or Italian.
    #[arg(long)]
    month: Option<String>,
    #[arg(long)]
    year: Option<i32>,
}

impl PeriodArgs {
    /// Missing parts default to the current month.
    fn resolve(&self) -> Result<Period, EngineError> {
        let current = Period::current();
        let year = self.year.unwrap_or(current.year());
        match &self.month {
            Some(month) => Period::new(parse_month(month)?, year),
            None => Period::new(current.month(), year),
        }
    }
}

#[derive(Args, Debug)]
struct ReportArgs {
    #[command(flatten)]
    period: PeriodArgs,
    /// Group to leave out of the totals, as `Category_CUR`. Repeatable.
    #[arg(long = "hide", value_parser = parse_group_key)]
    hidden: Vec<GroupKey>,
}

#[derive(Args, Debug)]
struct ExpensesArgs {
    #[command(flatten)]
    period: PeriodArgs,
    #[arg(long)]
    category: Option<String>,
    /// name, category, amount or status.
    #[arg(long)]
    sort: Option<SortKey>,
    #[arg(long, requires = "sort")]
    desc: bool,
    /// Write the listed rows to this CSV file instead of printing them.
    #[arg(long)]
    csv: Option<String>,
}

#[derive(Args, Debug)]
struct AddArgs {
    #[command(flatten)]
    period: PeriodArgs,
    #[arg(long)]
    name: String,
    #[arg(long)]
    category: String,
    /// Whole amount, digits only.
    #[arg(long)]
    amount: String,
    /// Defaults to the reporting currency.
    #[arg(long)]
    currency: Option<Currency>,
}

#[derive(Args, Debug)]
struct EditArgs {
    #[command(flatten)]
    period: PeriodArgs,
    id: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    amount: Option<String>,
    #[arg(long)]
    currency: Option<Currency>,
}

#[derive(Args, Debug)]
struct TargetArgs {
    #[command(flatten)]
    period: PeriodArgs,
    id: String,
    /// Skip the confirmation prompt.
    #[arg(long, short)]
    yes: bool,
}

#[derive(Args, Debug)]
struct Income {
    #[command(subcommand)]
    command: IncomeCommand,
}

#[derive(Subcommand, Debug)]
enum IncomeCommand {
    Set(IncomeSetArgs),
    Clear(IncomeClearArgs),
}

#[derive(Args, Debug)]
struct IncomeSetArgs {
    #[command(flatten)]
    period: PeriodArgs,
    #[arg(long)]
    amount: String,
    #[arg(long)]
    currency: Option<Currency>,
}

#[derive(Args, Debug)]
struct IncomeClearArgs {
    #[command(flatten)]
    period: PeriodArgs,
    #[arg(long, short)]
    yes: bool,
}

#[derive(Args, Debug)]
struct Recurring {
    #[command(subcommand)]
    command: RecurringCommand,
}

#[derive(Subcommand, Debug)]
enum RecurringCommand {
    List(RecurringListArgs),
    Add(RecurringAddArgs),
    Delete(RecurringDeleteArgs),
}

#[derive(Args, Debug)]
struct RecurringListArgs {
    /// Case-insensitive match on title or category.
    #[arg(long)]
    search: Option<String>,
    /// title, amount, category or currency.
    #[arg(long, value_parser = parse_recurring_sort)]
    sort: Option<RecurringSortKey>,
    #[arg(long, requires = "sort")]
    desc: bool,
}

#[derive(Args, Debug)]
struct RecurringAddArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    amount: String,
    #[arg(long)]
    category: String,
    #[arg(long)]
    currency: Option<Currency>,
}

#[derive(Args, Debug)]
struct RecurringDeleteArgs {
    id: String,
    #[arg(long, short)]
    yes: bool,
}

fn parse_language(raw: &str) -> Result<Language, String> {
    Language::try_from(raw).map_err(|err| err.to_string())
}

/// Parses the `Category_CUR` form groups are printed in.
fn parse_group_key(raw: &str) -> Result<GroupKey, String> {
    let (category, code) = raw
        .rsplit_once('_')
        .ok_or_else(|| format!("expected Category_CUR, got {raw}"))?;
    if category.trim().is_empty() {
        return Err(format!("missing category in {raw}"));
    }
    let currency = Currency::try_from(code).map_err(|err| err.to_string())?;
    Ok(GroupKey::new(category, currency))
}

fn parse_recurring_sort(raw: &str) -> Result<RecurringSortKey, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "title" => Ok(RecurringSortKey::Title),
        "amount" => Ok(RecurringSortKey::Amount),
        "category" => Ok(RecurringSortKey::Category),
        "currency" => Ok(RecurringSortKey::Currency),
        other => Err(format!("unknown sort key: {other}")),
    }
}

fn sort_config<K>(key: Option<K>, desc: bool) -> SortConfig<K> {
    SortConfig {
        key,
        direction: if desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        },
    }
}

fn find_expense<'a>(book: &'a PeriodBook, id: &ExpenseId) -> CliResult<&'a engine::Expense> {
    book.find(id)
        .ok_or_else(|| format!("no expense {id} in {}", book.period()).into())
}

fn confirmed(yes: bool, prompt: &str) -> CliResult<bool> {
    if yes {
        return Ok(true);
    }
    let answer = prompt::confirm(prompt)?;
    if !answer {
        eprintln!("aborted");
    }
    Ok(answer)
}

/// A report never waits on the rate table: without it every currency
/// converts at 1.
fn rates_or_unconverted(
    result: Result<ExchangeRates, ClientError>,
    reporting: Currency,
) -> ExchangeRates {
    result.unwrap_or_else(|err| {
        tracing::warn!(error = %err, "exchange rates unavailable");
        eprintln!("rates unavailable, amounts unconverted ({err})");
        ExchangeRates::new(reporting)
    })
}

async fn run(cli: Cli, client: Client) -> CliResult<()> {
    let reporting = cli.reporting_currency;

    match cli.command {
        Command::Report(args) => {
            let period = args.period.resolve()?;
            let book = client.period_get(period).await?;
            let rates = rates_or_unconverted(client.exchange_rates(reporting).await, reporting);
            let hidden: HiddenGroups = args.hidden.into_iter().collect();
            print!("{}", report::render_report(&book, &rates, &hidden, cli.language));
        }
        Command::Expenses(args) => {
            let period = args.period.resolve()?;
            let book = client.period_get(period).await?;
            let filter = args
                .category
                .map_or(CategoryFilter::All, CategoryFilter::Only);
            let rows = project(book.expenses(), &filter, &sort_config(args.sort, args.desc));
            match args.csv {
                Some(path) => {
                    report::write_csv(&rows, File::create(&path)?)?;
                    eprintln!("wrote {} rows to {path}", rows.len());
                }
                None => print!("{}", report::render_expenses(&rows)),
            }
        }
        Command::Add(args) => {
            let period = args.period.resolve()?;
            let fields = ExpenseDraft {
                name: args.name,
                category: args.category,
                amount: args.amount,
                currency: Some(args.currency.unwrap_or(reporting)),
            }
            .validate()?;
            let expense = client.expense_create(period, &fields).await?;
            println!("added {} ({}) to {period}", expense.name, expense.id);
        }
        Command::Edit(args) => {
            let period = args.period.resolve()?;
            let id = ExpenseId::new(args.id);
            let book = client.period_get(period).await?;
            let mut draft = ExpenseDraft::from_expense(find_expense(&book, &id)?);
            if let Some(name) = args.name {
                draft.name = name;
            }
            if let Some(category) = args.category {
                draft.category = category;
            }
            if let Some(amount) = args.amount {
                draft.amount = amount;
            }
            if let Some(currency) = args.currency {
                draft.currency = Some(currency);
            }
            let patch = ExpensePatch::edit(draft.validate()?);
            client.expense_update(period, &id, &patch).await?;
            println!("updated {id}, now pending");
        }
        Command::Toggle(args) => {
            let period = args.period.resolve()?;
            let id = ExpenseId::new(args.id);
            let book = client.period_get(period).await?;
            let expense = find_expense(&book, &id)?;
            let to = expense.status.toggled();
            let prompt = format!("Mark \"{}\" as {}?", expense.name, to.as_str());
            if confirmed(args.yes, &prompt)? {
                client
                    .expense_update(period, &id, &ExpensePatch::status(to))
                    .await?;
                println!("{id} is now {}", to.as_str());
            }
        }
        Command::Delete(args) => {
            let period = args.period.resolve()?;
            let id = ExpenseId::new(args.id);
            let book = client.period_get(period).await?;
            let expense = find_expense(&book, &id)?;
            let prompt = format!("Delete \"{}\"?", expense.name);
            if confirmed(args.yes, &prompt)? {
                client.expense_delete(period, &id).await?;
                println!("deleted {id}");
            }
        }
        Command::Income(Income {
            command: IncomeCommand::Set(args),
        }) => {
            let period = args.period.resolve()?;
            let income = IncomeDraft {
                amount: args.amount,
                currency: Some(args.currency.unwrap_or(reporting)),
            }
            .validate()?;
            client.income_put(period, &income).await?;
            println!("income for {period} set");
        }
        Command::Income(Income {
            command: IncomeCommand::Clear(args),
        }) => {
            let period = args.period.resolve()?;
            if confirmed(args.yes, &format!("Remove the income of {period}?"))? {
                client.income_delete(period).await?;
                println!("income for {period} removed");
            }
        }
        Command::Rates => {
            let rates = client.exchange_rates(reporting).await?;
            print!("{}", report::render_rates(&rates));
        }
        Command::Migrate(args) => {
            let period = args.resolve()?;
            client.migrate_pending(period).await?;
            println!("pending expenses carried into {period}");
        }
        Command::Recurring(Recurring {
            command: RecurringCommand::List(args),
        }) => {
            let templates = client.recurring_list().await?;
            let needle = args.search.unwrap_or_default();
            let rows = project_templates(&templates, &needle, &sort_config(args.sort, args.desc));
            print!("{}", report::render_templates(&rows));
        }
        Command::Recurring(Recurring {
            command: RecurringCommand::Add(args),
        }) => {
            let fields = RecurringDraft {
                title: args.title,
                amount: args.amount,
                category: args.category,
                currency: Some(args.currency.unwrap_or(reporting)),
            }
            .validate()?;
            client.recurring_create(&fields).await?;
            client.migrate_recurring().await?;
            println!("added recurring expense {}", fields.title);
        }
        Command::Recurring(Recurring {
            command: RecurringCommand::Delete(args),
        }) => {
            let id = ExpenseId::new(args.id);
            if confirmed(args.yes, &format!("Delete recurring expense {id}?"))? {
                client.recurring_delete(&id).await?;
                client.migrate_recurring().await?;
                println!("deleted recurring expense {id}");
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "bilancio_cli={level},finance_client={level},engine={level}",
            level = cli.log_level
        ))
        .with_writer(std::io::stderr)
        .init();

    let client = Client::new(&cli.base_url, cli.token.clone())?;
    tracing::debug!(base_url = %client.base_url(), writable = client.can_write(), "client ready");
    if let Err(err) = run(cli, client).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_survives_missing_rates() {
        let failed = Err(ClientError::Server("rates upstream down".to_string()));
        let rates = rates_or_unconverted(failed, Currency::Eur);
        assert_eq!(rates.reporting(), Currency::Eur);
        assert_eq!(rates.factor(Currency::Usd), 1.0);
        assert!(!rates.knows(Currency::Usd));

        let known = ExchangeRates::new(Currency::Eur).with_factor(Currency::Usd, 0.9);
        assert_eq!(rates_or_unconverted(Ok(known), Currency::Eur).factor(Currency::Usd), 0.9);
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "bilancio",
            "report",
            "--month",
            "marzo",
            "--year",
            "2025",
            "--hide",
            "Casa_EUR",
            "--reporting-currency",
            "usd",
        ])
        .unwrap();

        assert_eq!(cli.reporting_currency, Currency::Usd);
        let Command::Report(args) = cli.command else {
            panic!("expected report");
        };
        assert_eq!(args.period.resolve().unwrap(), Period::new(3, 2025).unwrap());
        assert_eq!(args.hidden, [GroupKey::new("Casa", Currency::Eur)]);
    }

    #[test]
    fn sort_keys_parse_by_label() {
        let cli =
            Cli::try_parse_from(["bilancio", "expenses", "--sort", "Amount", "--desc"]).unwrap();
        let Command::Expenses(args) = cli.command else {
            panic!("expected expenses");
        };
        assert_eq!(args.sort, Some(SortKey::Amount));
        assert!(args.desc);

        assert!(Cli::try_parse_from(["bilancio", "expenses", "--sort", "date"]).is_err());
        assert!(Cli::try_parse_from(["bilancio", "expenses", "--desc"]).is_err());
    }

    #[test]
    fn group_keys_split_on_last_underscore() {
        assert_eq!(
            parse_group_key("Cibo_fuori_MXN").unwrap(),
            GroupKey::new("Cibo_fuori", Currency::Mxn)
        );
        assert!(parse_group_key("Casa").is_err());
        assert!(parse_group_key("_EUR").is_err());
        assert!(parse_group_key("Casa_GBP").is_err());
    }

    #[test]
    fn nested_commands_parse() {
        let cli = Cli::try_parse_from([
            "bilancio", "income", "clear", "--month", "12", "--year", "2024", "-y",
        ])
        .unwrap();
        let Command::Income(Income {
            command: IncomeCommand::Clear(args),
        }) = cli.command
        else {
            panic!("expected income clear");
        };
        assert!(args.yes);
        assert_eq!(args.period.resolve().unwrap(), Period::new(12, 2024).unwrap());

        let cli =
            Cli::try_parse_from(["bilancio", "recurring", "list", "--sort", "title"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Recurring(Recurring {
                command: RecurringCommand::List(RecurringListArgs {
                    sort: Some(RecurringSortKey::Title),
                    ..
                })
            })
        ));
    }

    #[test]
    fn missing_period_parts_use_today() {
        let current = Period::current();
        let args = PeriodArgs {
            month: None,
            year: Some(2020),
        };
        assert_eq!(args.resolve().unwrap().month(), current.month());
        assert_eq!(PeriodArgs::default().resolve().unwrap(), current);
        assert!(
            PeriodArgs {
                month: Some("brumaire".to_string()),
                year: None,
            }
            .resolve()
            .is_err()
        );
    }
}
