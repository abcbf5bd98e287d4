//! Terminal formatting for applications and statistics.

use std::fmt::Write;

use crate::tracker::{ApplicationStatistics, ApplicationStatus, JobApplication};

pub const SEPARATOR: &str = "------------------------";

pub fn application_block(application: &JobApplication) -> String {
    let closes = application
        .closing_date
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "not set".to_string());
    let status_note = match application.normalized_status() {
        ApplicationStatus::Other if !application.status.trim().is_empty() => " (custom)",
        _ => "",
    };

    let mut out = String::new();
    let _ = writeln!(out, "ID: {}", application.id);
    let _ = writeln!(out, "Company: {}", application.company);
    let _ = writeln!(out, "Position: {}", application.position);
    let _ = writeln!(out, "Ref No: {}", application.reference_number);
    let _ = writeln!(out, "Applied: {}", application.application_date.format("%Y-%m-%d"));
    let _ = writeln!(out, "Closes: {closes}");
    let _ = writeln!(out, "Method: {}", application.application_method);
    let _ = writeln!(out, "Status: {}{status_note}", application.status);
    let _ = writeln!(
        out,
        "Contact: {} ({})",
        application.contact_person, application.contact_email
    );
    let _ = writeln!(out, "Notes: {}", application.notes);
    out
}

/// Each application followed by a separator line, or a "none found" line.
pub fn application_list<'a, I>(applications: I, empty_message: &str) -> String
where
    I: IntoIterator<Item = &'a JobApplication>,
{
    let mut out = String::new();
    for application in applications {
        out.push_str(&application_block(application));
        out.push_str(SEPARATOR);
        out.push('\n');
    }

    if out.is_empty() {
        out.push_str(empty_message);
        out.push('\n');
    }
    out
}

pub fn statistics_block(stats: &ApplicationStatistics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total Applications: {}", stats.total);
    for entry in &stats.by_status {
        let _ = writeln!(out, "{}: {}", entry.status, entry.count);
    }

    if !stats.upcoming_deadlines.is_empty() {
        let _ = writeln!(out, "\n=== UPCOMING DEADLINES (Next 7 days) ===");
        for application in &stats.upcoming_deadlines {
            if let Some(closing) = application.closing_date {
                let _ = writeln!(
                    out,
                    "{} - {} - Due: {}",
                    application.company,
                    application.position,
                    closing.format("%Y-%m-%d")
                );
            }
        }
    }
    out
}
