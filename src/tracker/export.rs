//! CSV export for spreadsheets.

use std::io::Write;

use serde::Serialize;

use super::domain::JobApplication;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

const HEADERS: [&str; 11] = [
    "ID",
    "Company",
    "Position",
    "Reference Number",
    "Application Date",
    "Closing Date",
    "Application Method",
    "Status",
    "Contact Person",
    "Contact Email",
    "Notes",
];

/// One record in [`HEADERS`] order. Field order is the column order.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    id: u32,
    company: &'a str,
    position: &'a str,
    reference_number: &'a str,
    application_date: String,
    closing_date: String,
    application_method: &'a str,
    status: &'a str,
    contact_person: &'a str,
    contact_email: &'a str,
    notes: &'a str,
}

impl<'a> From<&'a JobApplication> for ExportRow<'a> {
    fn from(application: &'a JobApplication) -> Self {
        Self {
            id: application.id.0,
            company: &application.company,
            position: &application.position,
            reference_number: &application.reference_number,
            application_date: application.application_date.format("%Y-%m-%d").to_string(),
            closing_date: application
                .closing_date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            application_method: &application.application_method,
            status: &application.status,
            contact_person: &application.contact_person,
            contact_email: &application.contact_email,
            notes: &application.notes,
        }
    }
}

/// Write a header row and one row per application, in the order given. The header is written
/// even when there are no applications. Returns the row count.
pub fn export_csv<'a, W, I>(applications: I, writer: W) -> Result<usize, ExportError>
where
    W: Write,
    I: IntoIterator<Item = &'a JobApplication>,
{
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(HEADERS)?;
    let mut rows = 0;

    for application in applications {
        csv_writer.serialize(ExportRow::from(application))?;
        rows += 1;
    }

    csv_writer.flush()?;
    Ok(rows)
}
