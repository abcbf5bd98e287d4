//! Interactive seven-option menu over an [`ApplicationStore`].

use std::io::{self, BufRead, Write};

use chrono::NaiveDate;
use tracing::debug;

use crate::render;
use crate::tracker::dates;
use crate::tracker::{
    ApplicationForm, ApplicationId, ApplicationStatus, ApplicationStorage, ApplicationStore,
    StoreError, UpdateOutcome,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Add,
    ViewAll,
    ViewByStatus,
    UpdateStatus,
    Search,
    Statistics,
    Exit,
}

impl MenuChoice {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1" => Some(Self::Add),
            "2" => Some(Self::ViewAll),
            "3" => Some(Self::ViewByStatus),
            "4" => Some(Self::UpdateStatus),
            "5" => Some(Self::Search),
            "6" => Some(Self::Statistics),
            "7" => Some(Self::Exit),
            _ => None,
        }
    }
}

pub struct Menu<'a, S, R, W> {
    store: &'a mut ApplicationStore<S>,
    input: R,
    output: W,
    clock: fn() -> NaiveDate,
}

impl<'a, S, R, W> Menu<'a, S, R, W>
where
    S: ApplicationStorage,
    R: BufRead,
    W: Write,
{
    pub fn new(store: &'a mut ApplicationStore<S>, input: R, output: W) -> Self {
        Self {
            store,
            input,
            output,
            clock: dates::today,
        }
    }

    /// Replace the source of "today" used for default dates and deadline windows.
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    /// Run until the user picks Exit or input ends.
    pub fn run(mut self) -> io::Result<()> {
        writeln!(self.output, "=== JOB APPLICATION TRACKER ===")?;
        if let Some(err) = self.store.load_error() {
            writeln!(self.output, "Error loading data: {err}")?;
        }

        loop {
            self.display_menu()?;
            let Some(choice) = self.read_line()? else {
                break;
            };

            match MenuChoice::parse(&choice) {
                Some(MenuChoice::Add) => self.add_application()?,
                Some(MenuChoice::ViewAll) => self.view_all()?,
                Some(MenuChoice::ViewByStatus) => self.view_by_status()?,
                Some(MenuChoice::UpdateStatus) => self.update_status()?,
                Some(MenuChoice::Search) => self.search()?,
                Some(MenuChoice::Statistics) => self.statistics()?,
                Some(MenuChoice::Exit) => {
                    writeln!(self.output, "Good luck with your job search!")?;
                    break;
                }
                None => writeln!(self.output, "Invalid choice. Please try again.")?,
            }

            write!(self.output, "\nPress Enter to continue...")?;
            self.output.flush()?;
            if self.read_line()?.is_none() {
                break;
            }
        }

        self.output.flush()
    }

    fn display_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n=== JOB APPLICATION TRACKER MENU ===")?;
        writeln!(self.output, "1. Add New Application")?;
        writeln!(self.output, "2. View All Applications")?;
        writeln!(self.output, "3. View Applications by Status")?;
        writeln!(self.output, "4. Update Application Status")?;
        writeln!(self.output, "5. Search Applications")?;
        writeln!(self.output, "6. Show Statistics")?;
        writeln!(self.output, "7. Exit")?;
        write!(self.output, "Choose an option (1-7): ")?;
        self.output.flush()
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn prompt(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "{label}: ")?;
        self.output.flush()?;
        Ok(self.read_line()?.unwrap_or_default())
    }

    fn add_application(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n=== ADD NEW JOB APPLICATION ===")?;
        let choices = ApplicationStatus::prompt_choices();

        let form = ApplicationForm {
            company: self.prompt("Company")?,
            position: self.prompt("Position")?,
            reference_number: self.prompt("Reference Number")?,
            application_date: self.prompt("Application Date (yyyy-mm-dd)")?,
            closing_date: self.prompt("Closing Date (yyyy-mm-dd)")?,
            application_method: self.prompt("Application Method (Email/Online/Post)")?,
            status: self.prompt(&format!("Status ({choices})"))?,
            contact_person: self.prompt("Contact Person")?,
            contact_email: self.prompt("Contact Email")?,
            notes: self.prompt("Notes")?,
        };

        match self.store.add(form.resolve((self.clock)())) {
            Ok(application) => writeln!(
                self.output,
                "Application added successfully! (ID: {})",
                application.id
            ),
            Err(err @ StoreError::IdsExhausted { .. }) => {
                writeln!(self.output, "Cannot add application: {err}")
            }
            Err(err) => writeln!(self.output, "Error saving data: {err}"),
        }
    }

    fn view_all(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n=== ALL JOB APPLICATIONS ===")?;
        let listing = render::application_list(self.store.list_all(), "No applications found.");
        write!(self.output, "{listing}")
    }

    fn view_by_status(&mut self) -> io::Result<()> {
        let choices = ApplicationStatus::prompt_choices();
        let status = self.prompt(&format!("Enter status to filter ({choices})"))?;
        writeln!(
            self.output,
            "\n=== APPLICATIONS WITH STATUS: {} ===",
            status.to_uppercase()
        )?;
        let listing = render::application_list(
            self.store.list_by_status(&status),
            "No applications found with this status.",
        );
        write!(self.output, "{listing}")
    }

    fn update_status(&mut self) -> io::Result<()> {
        let raw_id = self.prompt("Enter Application ID to update")?;
        let Ok(id) = raw_id.parse::<ApplicationId>() else {
            return writeln!(self.output, "Invalid ID!");
        };
        if self.store.get(id).is_none() {
            return writeln!(self.output, "Application not found!");
        }

        let choices = ApplicationStatus::prompt_choices();
        let status = self.prompt(&format!("New Status ({choices})"))?;
        let notes = self.prompt("Update Notes")?;

        match self.store.update_status(id, status, notes) {
            Ok(UpdateOutcome::Updated(_)) => {
                writeln!(self.output, "Application updated successfully!")
            }
            Ok(UpdateOutcome::NotFound(_)) => writeln!(self.output, "Application not found!"),
            Ok(UpdateOutcome::InvalidId(_)) => writeln!(self.output, "Invalid ID!"),
            Err(err) => writeln!(self.output, "Error saving data: {err}"),
        }
    }

    fn search(&mut self) -> io::Result<()> {
        let term = self.prompt("Search term (company/position/reference)")?;
        debug!(term = %term, "menu search");
        writeln!(
            self.output,
            "\n=== SEARCH RESULTS FOR: '{}' ===",
            term.to_lowercase()
        )?;
        let listing = render::application_list(self.store.search(&term), "No applications found.");
        write!(self.output, "{listing}")
    }

    fn statistics(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n=== APPLICATION STATISTICS ===")?;
        let stats = self.store.statistics((self.clock)());
        write!(self.output, "{}", render::statistics_block(&stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::MemoryStorage;
    use std::io::Cursor;

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid date")
    }

    fn run_script(store: &mut ApplicationStore<&MemoryStorage>, script: &str) -> String {
        let mut output = Vec::new();
        Menu::new(store, Cursor::new(script.as_bytes()), &mut output)
            .with_clock(fixed_today)
            .run()
            .expect("menu runs");
        String::from_utf8(output).expect("utf8 output")
    }

    #[test]
    fn add_then_statistics_round_through_the_menu() {
        let storage = MemoryStorage::new();
        let mut store = ApplicationStore::open(&storage);
        let script = "1\nAcme Corp\nBackend Engineer\nREF-9\nnot a date\n2025-01-05\nOnline\nApplied\nDana\ndana@acme.test\nfirst round\n\n6\n\n7\n";

        let output = run_script(&mut store, script);

        assert!(output.contains("Application added successfully! (ID: 1)"));
        assert!(output.contains("Total Applications: 1"));
        assert!(output.contains("Acme Corp - Backend Engineer - Due: 2025-01-05"));
        assert!(output.contains("Good luck with your job search!"));
        let stored = store.get(ApplicationId(1)).expect("stored");
        assert_eq!(stored.application_date, fixed_today());
        assert_eq!(storage.save_count(), 1);
    }

    #[test]
    fn update_reports_invalid_and_missing_ids() {
        let storage = MemoryStorage::new();
        let mut store = ApplicationStore::open(&storage);

        let output = run_script(&mut store, "4\nabc\n\n4\n42\n\n7\n");

        assert!(output.contains("Invalid ID!"));
        assert!(output.contains("Application not found!"));
        assert_eq!(storage.save_count(), 0);
    }

    #[test]
    fn unknown_choice_and_end_of_input_exit_cleanly() {
        let storage = MemoryStorage::new();
        let mut store = ApplicationStore::open(&storage);

        let output = run_script(&mut store, "9\n\n");

        assert!(output.contains("Invalid choice. Please try again."));
        assert!(!output.contains("Good luck"));
    }

    #[test]
    fn reports_load_failure_on_start() {
        let storage = MemoryStorage::with_contents("{ not json");
        let mut store = ApplicationStore::open(&storage);

        let output = run_script(&mut store, "2\n\n7\n");

        assert!(output.contains("Error loading data:"));
        assert!(output.contains("No applications found."));
    }
}
