use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use savingquest::config::{default_data_directory, AppConfig};
use savingquest::domain::{date_formatter, day_ordinal};
use savingquest::{logging, App};
use shared::{NumericSample, ScheduleOutcome};
use std::path::PathBuf;
use tracing::info;

/// MySavingQuest command line tools
#[derive(Parser, Debug)]
#[command(name = "savingquest", version, about = "MySavingQuest formatting, chart and reminder tools")]
struct Cli {
    /// Data directory (defaults to $SAVINGQUEST_DATA_DIR or the platform data directory)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Format amounts and dates the way the app displays them
    #[command(subcommand)]
    Format(FormatCommand),

    /// Manage local reminder alarms
    #[command(subcommand)]
    Alarm(AlarmCommand),

    /// Print chart geometry for a series as JSON
    Chart(ChartArgs),
}

#[derive(Subcommand, Debug)]
enum FormatCommand {
    /// Compact amount, e.g. 1.5M
    Compact {
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// Integer with thousands separators
    Commas {
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },
    /// Currency amount with two decimals
    Currency {
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// Ordinal day of month, e.g. 21st
    Ordinal { day: u32 },
    /// Recurring-bill description for an ISO date
    Recurring { iso_date: String },
    /// Epoch millis as ISO-8601 (UTC) and display date (local)
    Date { millis: i64 },
    /// 24-hour HH:mm:ss as 12-hour time
    Time { time: String },
}

#[derive(Subcommand, Debug)]
enum AlarmCommand {
    /// Schedule (or replace) a reminder
    Schedule(AlarmArgs),
    /// Re-schedule an existing reminder
    Update(AlarmArgs),
    /// Cancel a reminder
    Cancel { id: i32 },
    /// List persisted reminders
    List,
    /// Drop reminders whose time has passed
    Prune,
    /// Re-register pending reminders with the alarm service
    Restore,
}

#[derive(Args, Debug)]
struct AlarmArgs {
    #[arg(long)]
    id: i32,
    /// Trigger time: epoch millis or ISO-8601 (UTC when no offset is given)
    #[arg(long)]
    at: String,
    #[arg(long)]
    title: String,
    #[arg(long, default_value = "")]
    message: String,
}

#[derive(Args, Debug)]
struct ChartArgs {
    /// Series values
    #[arg(required = true, allow_negative_numbers = true)]
    values: Vec<f64>,
    /// Comma-separated labels, one per value (defaults to 1, 2, 3, ...)
    #[arg(long, value_delimiter = ',')]
    keys: Vec<String>,
    /// Include the filled area path
    #[arg(long)]
    fill: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_directory = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_directory()?,
    };
    let config = AppConfig::load_or_create(&data_directory)?;
    logging::init_logging(&config.logging)?;
    info!("Using data directory {}", data_directory.display());

    let mut app = App::from_config(config, &data_directory);

    match cli.command {
        Command::Format(command) => run_format(&app, command),
        Command::Alarm(command) => run_alarm(&mut app, command),
        Command::Chart(args) => run_chart(&app, args),
    }
}

fn run_format(app: &App, command: FormatCommand) -> Result<()> {
    let output = match command {
        FormatCommand::Compact { value } => app.formatter.format_compact(value),
        FormatCommand::Commas { value } => app.formatter.format_with_commas(value),
        FormatCommand::Currency { value } => app.formatter.format_currency(value),
        FormatCommand::Ordinal { day } => day_ordinal(day),
        FormatCommand::Recurring { iso_date } => date_formatter::format_recurring_day(&iso_date),
        FormatCommand::Date { millis } => format!(
            "{} ({})",
            date_formatter::convert_date_millis_to_iso_string(millis),
            date_formatter::format_display_date(millis)
        ),
        FormatCommand::Time { time } => date_formatter::convert_24_to_12_hour(&time),
    };
    println!("{}", output);
    Ok(())
}

fn run_alarm(app: &mut App, command: AlarmCommand) -> Result<()> {
    let now = date_formatter::current_time_millis();

    match command {
        AlarmCommand::Schedule(args) => {
            let at = parse_trigger_time(&args.at)?;
            match app.scheduler.schedule(at, args.id, &args.title, &args.message)? {
                ScheduleOutcome::Scheduled => println!("Scheduled reminder {}", args.id),
                ScheduleOutcome::PermissionDenied => {
                    println!("Reminder {} not scheduled: exact alarm permission missing", args.id)
                }
            }
        }
        AlarmCommand::Update(args) => {
            let at = parse_trigger_time(&args.at)?;
            if app.scheduler.update(args.id, at, &args.title, &args.message)? {
                println!("Updated reminder {}", args.id);
            } else {
                bail!("No reminder with id {}", args.id);
            }
        }
        AlarmCommand::Cancel { id } => {
            app.scheduler.cancel(id)?;
            println!("Cancelled reminder {}", id);
        }
        AlarmCommand::List => {
            let alarms = app.scheduler.list()?;
            if alarms.is_empty() {
                println!("No pending reminders");
            }
            for alarm in alarms {
                let status = if alarm.is_due(now) { " (past)" } else { "" };
                println!(
                    "{:>6}  {}  {}: {}{}",
                    alarm.id,
                    date_formatter::convert_date_millis_to_iso_string(alarm.trigger_time_millis),
                    alarm.title,
                    alarm.message,
                    status
                );
            }
        }
        AlarmCommand::Prune => {
            let pruned = app.scheduler.prune_expired(now)?;
            println!("Pruned {} reminders", pruned.len());
        }
        AlarmCommand::Restore => {
            let summary = app.scheduler.restore_pending(now)?;
            println!(
                "Restored {} reminders ({} pruned, {} denied)",
                summary.restored, summary.pruned, summary.denied
            );
        }
    }
    Ok(())
}

fn run_chart(app: &App, args: ChartArgs) -> Result<()> {
    if !args.keys.is_empty() && args.keys.len() != args.values.len() {
        bail!("Got {} keys for {} values", args.keys.len(), args.values.len());
    }

    let samples: Vec<NumericSample> = args
        .values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let key = args.keys.get(i).cloned().unwrap_or_else(|| (i + 1).to_string());
            NumericSample::new(key, *value)
        })
        .collect();

    let mut config = app.chart.config().clone();
    config.style.fill = config.style.fill || args.fill;
    let chart = savingquest::domain::LineChart::new(config, app.formatter.clone());

    let rendered = chart
        .render(&samples)
        .context("Series has no finite values to chart")?;
    println!("{}", serde_json::to_string_pretty(&rendered)?);
    Ok(())
}

fn parse_trigger_time(at: &str) -> Result<i64> {
    if let Ok(millis) = at.trim().parse::<i64>() {
        return Ok(millis);
    }
    match date_formatter::iso_string_to_timestamp(at) {
        0 => bail!("Unrecognized trigger time '{}'", at),
        millis => Ok(millis),
    }
}
