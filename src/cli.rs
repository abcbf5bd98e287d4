use crate::config::AppConfig;
use crate::error::AppError;
use crate::menu::Menu;
use crate::render;
use crate::telemetry;
use crate::tracker::dates;
use crate::tracker::{
    export_csv, ApplicationForm, ApplicationStatus, ApplicationStore, JsonFileStorage,
    UpdateOutcome,
};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "job-tracker",
    about = "Track job applications, their status and upcoming closing dates",
    version
)]
struct Cli {
    /// Override the configured backing file (JOB_TRACKER_DATA_FILE)
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the interactive menu (default command)
    Menu,
    /// Record a new application
    Add(AddArgs),
    /// List applications, optionally filtered by status
    List(ListArgs),
    /// Overwrite the status and notes of an application
    Update(UpdateArgs),
    /// Search company, position and reference number
    Search(SearchArgs),
    /// Show totals per status and deadlines closing within 7 days
    Stats(StatsArgs),
    /// Write all applications as CSV
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct AddArgs {
    #[arg(long)]
    company: String,
    #[arg(long)]
    position: String,
    #[arg(long, default_value = "")]
    reference: String,
    /// Application date (YYYY-MM-DD); unparseable or missing means today
    #[arg(long, default_value = "")]
    applied: String,
    /// Closing date (YYYY-MM-DD); unparseable or missing leaves it unset
    #[arg(long, default_value = "")]
    closing: String,
    /// How the application was sent (Email/Online/Post)
    #[arg(long, default_value = "")]
    method: String,
    #[arg(long, default_value = "Applied")]
    status: String,
    #[arg(long, default_value = "")]
    contact_person: String,
    #[arg(long, default_value = "")]
    contact_email: String,
    #[arg(long, default_value = "")]
    notes: String,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Only applications whose status matches, ignoring case
    #[arg(long)]
    status: Option<String>,
}

#[derive(Args, Debug)]
struct UpdateArgs {
    /// Application ID
    id: String,
    #[arg(long)]
    status: String,
    /// Replacement notes; existing notes are overwritten
    #[arg(long, default_value = "")]
    notes: String,
}

#[derive(Args, Debug)]
struct SearchArgs {
    term: String,
}

#[derive(Args, Debug)]
struct StatsArgs {
    /// Reference day for the deadline window (defaults to today)
    #[arg(long, value_parser = parse_date)]
    today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Destination file; stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    dates::parse_date(raw).ok_or_else(|| format!("failed to parse '{raw}' as YYYY-MM-DD"))
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    if let Some(data_file) = cli.data_file {
        config.storage.data_file = data_file;
    }

    telemetry::init(&config.telemetry)?;
    info!(?config.environment, data_file = %config.storage.data_file.display(), "job tracker starting");

    let mut store = ApplicationStore::open(JsonFileStorage::new(&config.storage.data_file));
    let command = cli.command.unwrap_or(Command::Menu);

    if !matches!(command, Command::Menu) {
        if let Some(err) = store.load_error() {
            eprintln!("warning: {err}; continuing with an empty application list");
        }
    }

    match command {
        Command::Menu => {
            let stdin = io::stdin();
            Menu::new(&mut store, stdin.lock(), io::stdout()).run()?;
        }
        Command::Add(args) => {
            let form = ApplicationForm {
                company: args.company,
                position: args.position,
                reference_number: args.reference,
                application_date: args.applied,
                closing_date: args.closing,
                application_method: args.method,
                status: args.status,
                contact_person: args.contact_person,
                contact_email: args.contact_email,
                notes: args.notes,
            };
            let application = store.add(form.resolve(dates::today()))?;
            println!("Application added successfully! (ID: {})", application.id);
        }
        Command::List(ListArgs { status }) => {
            let listing = match status {
                Some(status) => render::application_list(
                    store.list_by_status(&status),
                    "No applications found with this status.",
                ),
                None => render::application_list(store.list_all(), "No applications found."),
            };
            print!("{listing}");
        }
        Command::Update(args) => {
            if ApplicationStatus::from_text(&args.status) == ApplicationStatus::Other {
                info!(status = %args.status, "storing non-standard status");
            }
            match store.update_status_raw(&args.id, args.status, args.notes)? {
                UpdateOutcome::Updated(application) => {
                    println!("Application {} updated successfully!", application.id)
                }
                UpdateOutcome::NotFound(id) => println!("Application {id} not found!"),
                UpdateOutcome::InvalidId(raw) => println!("Invalid ID: '{raw}'"),
            }
        }
        Command::Search(SearchArgs { term }) => {
            print!(
                "{}",
                render::application_list(store.search(&term), "No applications found.")
            );
        }
        Command::Stats(StatsArgs { today }) => {
            let stats = store.statistics(today.unwrap_or_else(dates::today));
            print!("{}", render::statistics_block(&stats));
        }
        Command::Export(ExportArgs { output }) => {
            let rows = match output {
                Some(path) => export_csv(store.list_all(), BufWriter::new(File::create(path)?))?,
                None => export_csv(store.list_all(), io::stdout().lock())?,
            };
            info!(rows, "applications exported");
        }
    }

    Ok(())
}
